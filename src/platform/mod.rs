//=========================================================================
// Platform Subsystem
//
// Binds the experience to a real page in the browser.
//
// Architecture:
// ```text
//  DOM listeners                         Runtime (Rc<RefCell<_>>)
//  ┌──────────────────────────┐          ┌──────────────────────────┐
//  │ body click (once)        │          │ Driver                   │
//  │ #catch-btn click/hover   │          │  ├─ EventCollector       │
//  │ .close-btn click         │ Sender   │  └─ Experience           │
//  │ .star click (data-order) ├─────────→│        ↓                 │
//  │ #next-to-wishing-jar     │ Platform │  Pump { commands, ... }  │
//  │ #send-to-jar-btn         │ Event    │        ↓                 │
//  └──────────────────────────┘          │ Dom::apply()             │
//           ↑                            │ setTimeout(next deadline)│
//           └── Tick / AudioRejected ────┤ audio.play() promise     │
//                                        └──────────────────────────┘
// ```
//
// Every callback sends its event and then pumps. A pump that finds the
// runtime already borrowed defers itself to a zero-delay timeout so the
// event is never lost.
//
//=========================================================================

//=== Submodules ==========================================================

mod dom;
mod logger;

//=== External Crates =====================================================

use std::cell::RefCell;
use std::rc::Rc;

use crossbeam_channel::{Sender, TrySendError};
use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    AddEventListenerOptions, Element, Event, HtmlInputElement, HtmlMediaElement,
    HtmlTextAreaElement, Performance,
};

//=== Internal Imports ====================================================

use crate::core::input::InputEvent;
use crate::core::platform_bridge::{PlatformError, PlatformEvent, TickControl};
use crate::core::render::{Command, Target, STAR_SELECTOR};
use crate::core::timeline::{Clock, Millis};
use crate::engine::{Driver, ExperienceBuilder};
use dom::{js_error, Dom, DomLayout};

//=== Entry Point =========================================================

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let builder = ExperienceBuilder::new();
    logger::init(builder.log_level());

    bind(builder).map_err(|e| {
        error!("Failed to start: {}", e);
        JsValue::from_str(&e.to_string())
    })
}

//=== PerformanceClock ====================================================

/// Milliseconds since page load, from `performance.now()`.
struct PerformanceClock {
    performance: Performance,
}

impl Clock for PerformanceClock {
    fn now(&self) -> Millis {
        self.performance.now().max(0.0) as Millis
    }
}

//=== Runtime =============================================================

struct Runtime {
    driver: Driver<PerformanceClock>,
    dom: Dom,
    timer: Option<i32>,
    closed: bool,
}

type Shared = Rc<RefCell<Runtime>>;

//--- bind() --------------------------------------------------------------
//
// Resolves the page contract, builds the driver, shows the first scene and
// attaches every listener.
//
fn bind(builder: ExperienceBuilder) -> Result<(), PlatformError> {
    let dom = Dom::new()?;
    let performance = dom
        .window()
        .performance()
        .ok_or_else(|| PlatformError::Js("performance clock unavailable".into()))?;

    let stars = collect_stars(&dom)?;
    let builder = match u32::try_from(stars.len()) {
        Ok(count) if count > 0 => builder.with_star_count(count),
        _ => {
            warn!("No usable stars on the page; keeping default count");
            builder
        }
    };

    let mut driver = builder.build_driver(PerformanceClock { performance });
    let sender = driver.sender();

    let initial = {
        let layout = DomLayout::new(&dom);
        driver
            .start(&layout)
            .map_err(|e| PlatformError::Js(e.to_string()))?
    };

    let runtime: Shared = Rc::new(RefCell::new(Runtime {
        driver,
        dom: dom.clone(),
        timer: None,
        closed: false,
    }));
    apply_pump(&runtime, initial.commands, initial.next_deadline, &sender);

    //--- Listeners --------------------------------------------------------
    let body = dom.document().body().ok_or(PlatformError::NoDocument)?;
    listen_once(&body, "click", &runtime, &sender, || InputEvent::PageClick)?;

    let catch = dom.require(Target::CatchButton)?;
    listen(&catch, "click", &runtime, &sender, || InputEvent::CatchClick)?;
    listen(&catch, "mouseover", &runtime, &sender, || InputEvent::CatchHover)?;

    let close = dom.select(".close-btn")?;
    listen(&close, "click", &runtime, &sender, || InputEvent::CloseLetter)?;

    for (star, event) in stars {
        listen(&star, "click", &runtime, &sender, move || event.clone())?;
    }

    let next = dom.require(Target::NextButton)?;
    listen(&next, "click", &runtime, &sender, || InputEvent::NextToJar)?;

    let send = dom.require(Target::SendButton)?;
    let wish_input = dom.require(Target::WishInput)?;
    listen(&send, "click", &runtime, &sender, move || InputEvent::SubmitWish {
        text: read_text(&wish_input),
    })?;

    let unload_sender = sender.clone();
    let unload_runtime = runtime.clone();
    let on_unload = Closure::wrap(Box::new(move |_event: Event| {
        send_event(&unload_sender, PlatformEvent::Unload);
        pump(&unload_runtime, &unload_sender);
    }) as Box<dyn FnMut(_)>);
    dom.window()
        .add_event_listener_with_callback("pagehide", on_unload.as_ref().unchecked_ref())
        .map_err(js_error)?;
    on_unload.forget();

    info!("Page bound");
    Ok(())
}

//=== Listeners ===========================================================

/// Star elements paired with the click event each one produces.
///
/// Each event names the star by its document position, so the handler
/// measures and marks the element that was actually clicked.
fn collect_stars(dom: &Dom) -> Result<Vec<(Element, InputEvent)>, PlatformError> {
    let nodes = dom
        .document()
        .query_selector_all(STAR_SELECTOR)
        .map_err(js_error)?;
    let mut stars = Vec::with_capacity(nodes.length() as usize);

    for index in 0..nodes.length() {
        let Some(star) = nodes.item(index).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let attribute = star.get_attribute("data-order").unwrap_or_default();
        match InputEvent::star_from_attribute(index, &attribute) {
            Some(event) => stars.push((star, event)),
            None => warn!("Star with data-order {:?} ignored", attribute),
        }
    }

    Ok(stars)
}

fn listen<F>(
    element: &Element,
    kind: &str,
    runtime: &Shared,
    sender: &Sender<PlatformEvent>,
    make_event: F,
) -> Result<(), PlatformError>
where
    F: Fn() -> InputEvent + 'static,
{
    let runtime = runtime.clone();
    let sender = sender.clone();
    let closure = Closure::wrap(Box::new(move |_event: Event| {
        send_event(&sender, PlatformEvent::Input(make_event()));
        pump(&runtime, &sender);
    }) as Box<dyn FnMut(_)>);

    element
        .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        .map_err(js_error)?;
    closure.forget();
    Ok(())
}

fn listen_once<F>(
    element: &Element,
    kind: &str,
    runtime: &Shared,
    sender: &Sender<PlatformEvent>,
    make_event: F,
) -> Result<(), PlatformError>
where
    F: FnOnce() -> InputEvent + 'static,
{
    let runtime = runtime.clone();
    let sender = sender.clone();
    let closure = Closure::once(move |_event: Event| {
        send_event(&sender, PlatformEvent::Input(make_event()));
        pump(&runtime, &sender);
    });

    let options = AddEventListenerOptions::new();
    options.set_once(true);
    element
        .add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(js_error)?;
    closure.forget();
    Ok(())
}

fn read_text(element: &Element) -> String {
    if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        return area.value();
    }
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    element.text_content().unwrap_or_default()
}

fn send_event(sender: &Sender<PlatformEvent>, event: PlatformEvent) {
    match sender.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => warn!("Event channel full, dropping {:?}", event),
        Err(TrySendError::Disconnected(_)) => debug!("Event channel closed"),
    }
}

//=== Pumping =============================================================

fn pump(runtime: &Shared, sender: &Sender<PlatformEvent>) {
    let result = {
        let Ok(mut rt) = runtime.try_borrow_mut() else {
            debug!("Runtime busy, deferring pump");
            defer_pump(runtime, sender);
            return;
        };
        if rt.closed {
            return;
        }

        let dom = rt.dom.clone();
        let layout = DomLayout::new(&dom);
        let result = rt.driver.pump(&layout);
        if result.control == TickControl::Exit {
            rt.closed = true;
        }
        result
    };

    apply_pump(runtime, result.commands, result.next_deadline, sender);
}

fn apply_pump(
    runtime: &Shared,
    commands: Vec<Command>,
    next_deadline: Option<Millis>,
    sender: &Sender<PlatformEvent>,
) {
    let (dom, now, closed) = {
        let rt = runtime.borrow();
        (rt.dom.clone(), rt.driver.experience().clock().now(), rt.closed)
    };

    for command in &commands {
        match command {
            Command::PlayMusic => play_music(&dom, runtime, sender),
            other => {
                if let Err(e) = dom.apply(other) {
                    warn!("Could not apply {:?}: {}", other, e);
                }
            }
        }
    }

    if closed {
        return;
    }
    if let Some(deadline) = next_deadline {
        arm_timer(runtime, sender, deadline.saturating_sub(now));
    }
}

/// Replaces the pending wake-up with one `delay` ms from now.
fn arm_timer(runtime: &Shared, sender: &Sender<PlatformEvent>, delay: Millis) {
    let Ok(mut rt) = runtime.try_borrow_mut() else {
        defer_pump(runtime, sender);
        return;
    };

    if let Some(handle) = rt.timer.take() {
        rt.dom.window().clear_timeout_with_handle(handle);
    }

    let callback_runtime = runtime.clone();
    let callback_sender = sender.clone();
    let callback = Closure::once_into_js(move || {
        if let Ok(mut rt) = callback_runtime.try_borrow_mut() {
            rt.timer = None;
        }
        send_event(&callback_sender, PlatformEvent::Tick);
        pump(&callback_runtime, &callback_sender);
    });

    let timeout = i32::try_from(delay).unwrap_or(i32::MAX);
    match rt
        .dom
        .window()
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), timeout)
    {
        Ok(handle) => rt.timer = Some(handle),
        Err(e) => error!("Could not arm timer: {}", js_error(e)),
    }
}

/// Pumps again on a fresh task, outside any current borrow.
fn defer_pump(runtime: &Shared, sender: &Sender<PlatformEvent>) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let runtime = runtime.clone();
    let sender = sender.clone();
    let callback = Closure::once_into_js(move || pump(&runtime, &sender));
    if let Err(e) =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0)
    {
        error!("Could not defer pump: {}", js_error(e));
    }
}

//=== Audio ===============================================================

fn play_music(dom: &Dom, runtime: &Shared, sender: &Sender<PlatformEvent>) {
    let Some(media) = dom
        .element(Target::Music)
        .and_then(|e| e.dyn_into::<HtmlMediaElement>().ok())
    else {
        send_event(sender, PlatformEvent::AudioRejected("no #bg-music element".into()));
        defer_pump(runtime, sender);
        return;
    };

    let promise = match media.play() {
        Ok(promise) => promise,
        Err(e) => {
            send_event(sender, PlatformEvent::AudioRejected(js_error(e).to_string()));
            defer_pump(runtime, sender);
            return;
        }
    };

    let runtime = runtime.clone();
    let sender = sender.clone();
    spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            send_event(&sender, PlatformEvent::AudioRejected(js_error(e).to_string()));
            pump(&runtime, &sender);
        }
    });
}

//=========================================================================
// DOM Access
//=========================================================================
//
// Element lookup, page geometry and command application.
//
// Architecture:
//   Target ──locator()──→ Dom::element() ──→ web_sys::Element
//   Command ──────────────→ Dom::apply()  ──→ class / text / style / nodes
//   Layout  ←─────────────  DomLayout     ←── getBoundingClientRect
//
// Elements are looked up again for every command; orbs and lines come
// and go, and the page stays the single source of truth.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CssStyleDeclaration, Document, Element, HtmlElement, SvgElement, Window};

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::PlatformError;
use crate::core::render::{
    px, Command, Layout, LineId, Locator, OrbId, Point, Rect, Size, Target, CLASS_WISH_ORB,
};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const LINE_STROKE: &str = "rgba(255, 255, 255, 0.7)";
const LINE_STROKE_WIDTH: &str = "3";

/// Converts a thrown JS value into a platform error.
pub(super) fn js_error(err: JsValue) -> PlatformError {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return PlatformError::Js(format!(
            "{}: {}",
            String::from(error.name()),
            String::from(error.message())
        ));
    }
    PlatformError::Js(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

//=== Dom =================================================================

/// Handle on the page's window and document.
#[derive(Clone)]
pub(super) struct Dom {
    window: Window,
    document: Document,
}

impl Dom {
    pub(super) fn new() -> Result<Self, PlatformError> {
        let window = web_sys::window().ok_or(PlatformError::NoWindow)?;
        let document = window.document().ok_or(PlatformError::NoDocument)?;
        Ok(Self { window, document })
    }

    pub(super) fn window(&self) -> &Window {
        &self.window
    }

    pub(super) fn document(&self) -> &Document {
        &self.document
    }

    //--- Lookup -----------------------------------------------------------

    /// Finds the element behind `target`, if it is on the page.
    pub(super) fn element(&self, target: Target) -> Option<Element> {
        match target.locator() {
            Locator::Id(id) => self.document.get_element_by_id(&id),
            Locator::Nth { selector, index } => self
                .document
                .query_selector_all(selector)
                .ok()?
                .item(index)?
                .dyn_into::<Element>()
                .ok(),
        }
    }

    /// Like [`element`](Self::element), but a missing element is an error.
    pub(super) fn require(&self, target: Target) -> Result<Element, PlatformError> {
        self.element(target)
            .ok_or_else(|| PlatformError::MissingElement(target.to_string()))
    }

    /// Finds the first element matching a CSS selector.
    pub(super) fn select(&self, selector: &str) -> Result<Element, PlatformError> {
        self.document
            .query_selector(selector)
            .map_err(js_error)?
            .ok_or_else(|| PlatformError::MissingElement(selector.to_string()))
    }

    //--- Commands ---------------------------------------------------------

    /// Applies one view command.
    ///
    /// `PlayMusic` is left to the caller, which owns the async playback.
    pub(super) fn apply(&self, command: &Command) -> Result<(), PlatformError> {
        match command {
            Command::AddClass { target, class } => {
                self.require(*target)?.class_list().add_1(class).map_err(js_error)
            }
            Command::RemoveClass { target, class } => {
                self.require(*target)?.class_list().remove_1(class).map_err(js_error)
            }
            Command::SetText { target, text } => {
                self.require(*target)?.set_text_content(Some(text));
                Ok(())
            }
            Command::SetStyle {
                target,
                property,
                value,
            } => {
                let element = self.require(*target)?;
                style_of(&element)
                    .ok_or_else(|| PlatformError::Js(format!("{target} has no inline style")))?
                    .set_property(property, value)
                    .map_err(js_error)
            }
            Command::DrawLine { line, from, to } => self.draw_line(*line, *from, *to),
            Command::SpawnOrb { orb, left, top } => self.spawn_orb(*orb, *left, *top),
            Command::RemoveOrb(orb) => {
                match self.element(Target::Orb(*orb)) {
                    Some(element) => element.remove(),
                    None => debug!("Orb {} already gone", orb),
                }
                Ok(())
            }
            Command::Alert(message) => self.window.alert_with_message(message).map_err(js_error),
            Command::PlayMusic => Ok(()),
        }
    }

    fn draw_line(&self, line: LineId, from: Point, to: Point) -> Result<(), PlatformError> {
        let canvas = self.require(Target::ConstellationCanvas)?;
        let element = self
            .document
            .create_element_ns(Some(SVG_NS), "line")
            .map_err(js_error)?;

        element.set_id(&format!("constellation-line-{line}"));
        for (name, value) in [
            ("x1", from.x.to_string()),
            ("y1", from.y.to_string()),
            ("x2", to.x.to_string()),
            ("y2", to.y.to_string()),
            ("stroke", LINE_STROKE.to_string()),
            ("stroke-width", LINE_STROKE_WIDTH.to_string()),
            ("style", "opacity: 0".to_string()),
        ] {
            element.set_attribute(name, &value).map_err(js_error)?;
        }

        canvas.append_child(&element).map_err(js_error)?;
        Ok(())
    }

    fn spawn_orb(&self, orb: OrbId, left: f64, top: f64) -> Result<(), PlatformError> {
        let body = self.document.body().ok_or(PlatformError::NoDocument)?;
        let element = self
            .document
            .create_element("div")
            .map_err(js_error)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| PlatformError::Js("orb is not an HTML element".into()))?;

        element.set_id(&format!("wish-orb-{orb}"));
        element.class_list().add_1(CLASS_WISH_ORB).map_err(js_error)?;

        let style = element.style();
        style.set_property("left", &px(left)).map_err(js_error)?;
        style.set_property("top", &px(top)).map_err(js_error)?;

        body.append_child(&element).map_err(js_error)?;
        Ok(())
    }
}

fn style_of(element: &Element) -> Option<CssStyleDeclaration> {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        return Some(html.style());
    }
    element.dyn_ref::<SvgElement>().map(SvgElement::style)
}

//=== DomLayout ===========================================================

/// Live page geometry.
pub(super) struct DomLayout<'a> {
    dom: &'a Dom,
}

impl<'a> DomLayout<'a> {
    pub(super) fn new(dom: &'a Dom) -> Self {
        Self { dom }
    }
}

impl Layout for DomLayout<'_> {
    fn viewport(&self) -> Size {
        let root = self.dom.document.document_element();
        let client = |read: fn(&Element) -> i32| root.as_ref().map_or(0.0, |e| f64::from(read(e)));
        let inner = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };

        Size::new(
            client(Element::client_width).max(inner(self.dom.window.inner_width())),
            client(Element::client_height).max(inner(self.dom.window.inner_height())),
        )
    }

    fn rect(&self, target: Target) -> Option<Rect> {
        let bounds = self.dom.element(target)?.get_bounding_client_rect();
        Some(Rect::new(bounds.left(), bounds.top(), bounds.width(), bounds.height()))
    }
}

//=========================================================================
// Scene Manager
//=========================================================================
//
// Scene registry and sequencer.
//
// Scenes are stored in a HashMap by key. Exactly one registered scene is
// active; every other one is either fading out or hidden. Fade-outs are
// completed by `HideScene` steps on the timeline.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{BTreeMap, HashMap};

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{Scene, SceneId, SceneTransition, SceneVisibility};
use crate::core::error::SequenceError;
use crate::core::globals::GlobalContext;
use crate::core::input::{Handled, IgnoreReason, InputEvent};
use crate::core::render::{Command, Layout, Target, CLASS_ACTIVE, CLASS_HIDDEN};
use crate::core::timeline::{Millis, SceneStep, Step};

//=== TransitionOutcome ===================================================

/// Result of a successful transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub previous: Option<SceneId>,
    pub current: SceneId,
}

//=== Scene Manager =======================================================

/// Owns the scenes and their visibility.
pub struct SceneManager {
    scenes: HashMap<SceneId, Box<dyn Scene>>,
    visibility: BTreeMap<SceneId, SceneVisibility>,
    active: Option<SceneId>,
    initial: Option<SceneId>,
    fade_out: Millis,
}

impl SceneManager {
    /// Upper bound on chained transitions applied in one pass.
    const MAX_CHAINED_TRANSITIONS: usize = 8;

    //--- Construction -----------------------------------------------------

    /// Creates an empty manager; outgoing scenes hide after `fade_out` ms.
    pub fn new(fade_out: Millis) -> Self {
        Self {
            scenes: HashMap::new(),
            visibility: BTreeMap::new(),
            active: None,
            initial: None,
            fade_out,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene. New scenes start hidden.
    pub fn register_scene<T>(&mut self, key: SceneId, scene: T)
    where
        T: Scene + 'static,
    {
        if self.scenes.insert(key, Box::new(scene)).is_some() {
            warn!("Scene {} was already registered and has been replaced", key);
        }
        self.visibility.entry(key).or_insert(SceneVisibility::Hidden);
    }

    /// Registers a scene and marks it as the one `start()` activates.
    pub fn register_default<T>(&mut self, key: SceneId, scene: T)
    where
        T: Scene + 'static,
    {
        self.register_scene(key, scene);
        if let Some(previous) = self.initial.replace(key) {
            warn!("Default scene {} replaced by {}", previous, key);
        }
    }

    /// Activates the default scene.
    pub fn start(
        &mut self,
        ctx: &mut GlobalContext,
        layout: &dyn Layout,
    ) -> Result<TransitionOutcome, SequenceError> {
        let initial = self.initial.unwrap_or(SceneId::Catch);
        debug!("Starting scene manager with initial scene: {}", initial);
        self.transition_to(initial, ctx, layout)
    }

    //--- Transitions ------------------------------------------------------

    /// Makes `key` the active scene.
    ///
    /// Every other scene loses the active class; scenes that were on screen
    /// are hidden once the fade-out window has elapsed. On error nothing
    /// changes.
    pub fn transition_to(
        &mut self,
        key: SceneId,
        ctx: &mut GlobalContext,
        layout: &dyn Layout,
    ) -> Result<TransitionOutcome, SequenceError> {
        if !self.scenes.contains_key(&key) {
            warn!("Attempted to activate unregistered scene {}", key);
            return Err(SequenceError::SceneNotRegistered(key));
        }

        let previous = self.active;
        let hidden_at = ctx.now().saturating_add(self.fade_out);

        for (&scene, visibility) in self.visibility.iter_mut() {
            let target = Target::Scene(scene);

            if scene == key {
                ctx.emit(Command::remove_class(target, CLASS_HIDDEN));
                ctx.emit(Command::add_class(target, CLASS_ACTIVE));
                *visibility = SceneVisibility::Active;
                continue;
            }

            ctx.emit(Command::remove_class(target, CLASS_ACTIVE));
            match *visibility {
                SceneVisibility::Active => {
                    *visibility = SceneVisibility::FadingOut { hidden_at };
                    ctx.schedule(self.fade_out, Step::HideScene(scene));
                }
                SceneVisibility::FadingOut { .. } => {}
                SceneVisibility::Hidden => {
                    ctx.emit(Command::add_class(target, CLASS_HIDDEN));
                }
            }
        }

        self.active = Some(key);

        if let Some(prev) = previous.filter(|&prev| prev != key) {
            if let Some(scene) = self.scenes.get_mut(&prev) {
                scene.on_exit(ctx, layout);
            }
        }
        if previous != Some(key) {
            if let Some(scene) = self.scenes.get_mut(&key) {
                scene.on_enter(ctx, layout);
            }
        }

        info!(
            "Scene transition: {} -> {}",
            previous.map_or_else(|| "none".to_string(), |p| p.to_string()),
            key
        );

        Ok(TransitionOutcome {
            previous,
            current: key,
        })
    }

    /// Parses a container id and transitions to it.
    pub fn transition_to_id(
        &mut self,
        id: &str,
        ctx: &mut GlobalContext,
        layout: &dyn Layout,
    ) -> Result<TransitionOutcome, SequenceError> {
        let key = id.parse::<SceneId>().inspect_err(|e| warn!("{}", e))?;
        self.transition_to(key, ctx, layout)
    }

    /// Applies every transition requested on the message bus.
    ///
    /// Requests raised by `on_enter` hooks are applied in the same pass.
    pub fn process_transitions(&mut self, ctx: &mut GlobalContext, layout: &dyn Layout) {
        for _ in 0..Self::MAX_CHAINED_TRANSITIONS {
            let requests = ctx.message_bus.take::<SceneTransition>();
            if requests.is_empty() {
                return;
            }

            for SceneTransition::To(key) in requests {
                if let Err(e) = self.transition_to(key, ctx, layout) {
                    warn!("Ignoring transition request: {}", e);
                }
            }
        }

        warn!("Transition chain exceeded {} passes", Self::MAX_CHAINED_TRANSITIONS);
    }

    //--- Dispatch ---------------------------------------------------------

    /// Offers an input event to its owning scene, if that scene is active.
    pub fn dispatch_input(
        &mut self,
        input: &InputEvent,
        ctx: &mut GlobalContext,
        layout: &dyn Layout,
    ) -> Handled {
        let Some(owner) = input.scene() else {
            return Handled::Ignored(IgnoreReason::Unrelated);
        };

        if self.active != Some(owner) {
            debug!("Ignoring {:?}: scene {} is not active", input, owner);
            return Handled::Ignored(IgnoreReason::SceneInactive);
        }

        match self.scenes.get_mut(&owner) {
            Some(scene) => scene.handle_input(input, ctx, layout),
            None => Handled::Ignored(IgnoreReason::SceneInactive),
        }
    }

    /// Runs a scene-owned animation step.
    pub fn dispatch_step(&mut self, step: SceneStep, ctx: &mut GlobalContext, layout: &dyn Layout) {
        let owner = step.owner();
        match self.scenes.get_mut(&owner) {
            Some(scene) => scene.on_step(step, ctx, layout),
            None => warn!("Dropping {:?}: scene {} not registered", step, owner),
        }
    }

    /// Completes a fade-out.
    ///
    /// Only hides a scene that is still fading out and whose current fade
    /// window has elapsed at `ctx.now()`. A scene re-activated during its
    /// fade stays visible; a hide step left over from an earlier fade does
    /// not cut a later fade short.
    pub fn hide_scene(&mut self, key: SceneId, ctx: &mut GlobalContext) {
        let Some(visibility) = self.visibility.get_mut(&key) else {
            warn!("Hide step for unregistered scene {}", key);
            return;
        };

        match *visibility {
            SceneVisibility::FadingOut { hidden_at } if ctx.now() >= hidden_at => {
                *visibility = SceneVisibility::Hidden;
                ctx.emit(Command::add_class(Target::Scene(key), CLASS_HIDDEN));
                debug!("Scene {} hidden ({} still on screen)", key, self.visible_count());
            }
            SceneVisibility::FadingOut { hidden_at } => {
                debug!("Early hide step for scene {} (due at {}ms)", key, hidden_at)
            }
            _ => debug!("Stale hide step for scene {}", key),
        }
    }

    //--- Queries ----------------------------------------------------------

    /// The active scene, once started.
    pub fn active_scene(&self) -> Option<SceneId> {
        self.active
    }

    /// Visibility of a registered scene.
    pub fn visibility(&self, key: SceneId) -> Option<SceneVisibility> {
        self.visibility.get(&key).copied()
    }

    /// Number of scenes currently marked active.
    pub fn active_count(&self) -> usize {
        self.visibility
            .values()
            .filter(|v| matches!(v, SceneVisibility::Active))
            .count()
    }

    /// Number of scenes not fully hidden.
    pub fn visible_count(&self) -> usize {
        self.visibility.values().filter(|v| !v.is_hidden()).count()
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{Rect, Size};
    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Test Helpers -----------------------------------------------------

    struct NoLayout;

    impl Layout for NoLayout {
        fn viewport(&self) -> Size {
            Size::new(1024.0, 768.0)
        }
        fn rect(&self, _target: Target) -> Option<Rect> {
            None
        }
    }

    /// Records lifecycle calls and optionally requests a follow-up scene.
    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
        name: &'static str,
        chain_to: Option<SceneId>,
    }

    impl Scene for Recorder {
        fn on_enter(&mut self, ctx: &mut GlobalContext, _layout: &dyn Layout) {
            self.log.borrow_mut().push(format!("enter {}", self.name));
            if let Some(next) = self.chain_to.take() {
                ctx.request_transition(next);
            }
        }

        fn on_exit(&mut self, _ctx: &mut GlobalContext, _layout: &dyn Layout) {
            self.log.borrow_mut().push(format!("exit {}", self.name));
        }

        fn handle_input(
            &mut self,
            _input: &InputEvent,
            _ctx: &mut GlobalContext,
            _layout: &dyn Layout,
        ) -> Handled {
            self.log.borrow_mut().push(format!("input {}", self.name));
            Handled::Consumed
        }
    }

    /// Catch and constellation recorders; the jar is left unregistered.
    fn manager_with_recorders() -> (SceneManager, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = SceneManager::new(800);
        for (key, name) in [
            (SceneId::Catch, "catch"),
            (SceneId::Constellation, "constellation"),
        ] {
            manager.register_scene(
                key,
                Recorder {
                    log: log.clone(),
                    name,
                    chain_to: None,
                },
            );
        }
        (manager, log)
    }

    //--- Transition Tests -------------------------------------------------

    #[test]
    fn transition_activates_exactly_one_scene() {
        let (mut manager, _) = manager_with_recorders();
        let mut ctx = GlobalContext::new();

        let outcome = manager.transition_to(SceneId::Catch, &mut ctx, &NoLayout);
        assert_eq!(
            outcome,
            Ok(TransitionOutcome {
                previous: None,
                current: SceneId::Catch
            })
        );
        assert_eq!(manager.active_count(), 1);
        assert_eq!(manager.visible_count(), 1);
        assert_eq!(manager.visibility(SceneId::Constellation), Some(SceneVisibility::Hidden));
    }

    #[test]
    fn outgoing_scene_fades_then_hides() {
        let (mut manager, _) = manager_with_recorders();
        let mut ctx = GlobalContext::new();
        manager.transition_to(SceneId::Catch, &mut ctx, &NoLayout).unwrap();
        ctx.take_commands();

        ctx.set_now(100);
        manager.transition_to(SceneId::Constellation, &mut ctx, &NoLayout).unwrap();
        assert_eq!(
            manager.visibility(SceneId::Catch),
            Some(SceneVisibility::FadingOut { hidden_at: 900 })
        );
        assert_eq!(manager.active_count(), 1);
        assert_eq!(manager.visible_count(), 2);

        let commands = ctx.take_commands();
        assert!(commands.contains(&Command::remove_class(
            Target::Scene(SceneId::Catch),
            CLASS_ACTIVE
        )));
        assert!(!commands.contains(&Command::add_class(
            Target::Scene(SceneId::Catch),
            CLASS_HIDDEN
        )));

        let due = ctx.timeline.take_due(900);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].step, Step::HideScene(SceneId::Catch));

        ctx.set_now(900);
        manager.hide_scene(SceneId::Catch, &mut ctx);
        assert_eq!(manager.visibility(SceneId::Catch), Some(SceneVisibility::Hidden));
        assert_eq!(
            ctx.take_commands(),
            vec![Command::add_class(Target::Scene(SceneId::Catch), CLASS_HIDDEN)]
        );
    }

    #[test]
    fn stale_hide_keeps_reactivated_scene_visible() {
        let (mut manager, _) = manager_with_recorders();
        let mut ctx = GlobalContext::new();
        manager.transition_to(SceneId::Catch, &mut ctx, &NoLayout).unwrap();
        manager.transition_to(SceneId::Constellation, &mut ctx, &NoLayout).unwrap();
        manager.transition_to(SceneId::Catch, &mut ctx, &NoLayout).unwrap();

        ctx.set_now(800);
        manager.hide_scene(SceneId::Catch, &mut ctx);
        assert_eq!(manager.visibility(SceneId::Catch), Some(SceneVisibility::Active));
    }

    #[test]
    fn earlier_hide_step_does_not_cut_a_later_fade_short() {
        let (mut manager, _) = manager_with_recorders();
        let mut ctx = GlobalContext::new();
        manager.transition_to(SceneId::Catch, &mut ctx, &NoLayout).unwrap();

        manager.transition_to(SceneId::Constellation, &mut ctx, &NoLayout).unwrap();
        ctx.set_now(100);
        manager.transition_to(SceneId::Catch, &mut ctx, &NoLayout).unwrap();
        ctx.set_now(200);
        manager.transition_to(SceneId::Constellation, &mut ctx, &NoLayout).unwrap();
        ctx.take_commands();

        // The hide step from the first fade is due at 800.
        ctx.set_now(800);
        manager.hide_scene(SceneId::Catch, &mut ctx);
        assert_eq!(
            manager.visibility(SceneId::Catch),
            Some(SceneVisibility::FadingOut { hidden_at: 1000 })
        );
        assert!(ctx.take_commands().is_empty());

        ctx.set_now(1000);
        manager.hide_scene(SceneId::Catch, &mut ctx);
        assert_eq!(manager.visibility(SceneId::Catch), Some(SceneVisibility::Hidden));
        assert_eq!(
            ctx.take_commands(),
            vec![Command::add_class(Target::Scene(SceneId::Catch), CLASS_HIDDEN)]
        );
    }

    #[test]
    fn unregistered_scene_is_a_validated_no_op() {
        let (mut manager, log) = manager_with_recorders();
        let mut ctx = GlobalContext::new();
        manager.transition_to(SceneId::Catch, &mut ctx, &NoLayout).unwrap();
        ctx.take_commands();
        let pending = ctx.timeline.len();

        let result = manager.transition_to(SceneId::WishingJar, &mut ctx, &NoLayout);
        assert_eq!(result, Err(SequenceError::SceneNotRegistered(SceneId::WishingJar)));
        assert_eq!(manager.active_scene(), Some(SceneId::Catch));
        assert!(ctx.take_commands().is_empty());
        assert_eq!(ctx.timeline.len(), pending);
        assert_eq!(log.borrow().as_slice(), ["enter catch"]);
    }

    #[test]
    fn unknown_identifier_is_rejected() {
        let (mut manager, _) = manager_with_recorders();
        let mut ctx = GlobalContext::new();

        let result = manager.transition_to_id("scene9", &mut ctx, &NoLayout);
        assert_eq!(result, Err(SequenceError::UnknownScene("scene9".to_string())));
        assert_eq!(manager.active_scene(), None);
        assert!(ctx.take_commands().is_empty());

        let result = manager.transition_to_id("scene3", &mut ctx, &NoLayout);
        assert!(result.is_ok());
        assert_eq!(manager.active_scene(), Some(SceneId::Constellation));
    }

    #[test]
    fn lifecycle_hooks_run_in_order() {
        let (mut manager, log) = manager_with_recorders();
        let mut ctx = GlobalContext::new();
        manager.transition_to(SceneId::Catch, &mut ctx, &NoLayout).unwrap();
        manager.transition_to(SceneId::Constellation, &mut ctx, &NoLayout).unwrap();

        assert_eq!(
            log.borrow().as_slice(),
            ["enter catch", "exit catch", "enter constellation"]
        );
    }

    #[test]
    fn queued_transitions_chain_through_on_enter() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = SceneManager::new(800);
        manager.register_default(
            SceneId::Catch,
            Recorder {
                log: log.clone(),
                name: "catch",
                chain_to: None,
            },
        );
        manager.register_scene(
            SceneId::Constellation,
            Recorder {
                log: log.clone(),
                name: "constellation",
                chain_to: Some(SceneId::WishingJar),
            },
        );
        manager.register_scene(
            SceneId::WishingJar,
            Recorder {
                log: log.clone(),
                name: "jar",
                chain_to: None,
            },
        );

        let mut ctx = GlobalContext::new();
        manager.start(&mut ctx, &NoLayout).unwrap();
        ctx.request_transition(SceneId::Constellation);
        manager.process_transitions(&mut ctx, &NoLayout);

        assert_eq!(manager.active_scene(), Some(SceneId::WishingJar));
        assert_eq!(manager.active_count(), 1);
    }

    //--- Dispatch Tests ---------------------------------------------------

    #[test]
    fn input_for_inactive_scene_is_ignored() {
        let (mut manager, log) = manager_with_recorders();
        let mut ctx = GlobalContext::new();
        manager.transition_to(SceneId::Catch, &mut ctx, &NoLayout).unwrap();

        let handled = manager.dispatch_input(&InputEvent::NextToJar, &mut ctx, &NoLayout);
        assert_eq!(handled, Handled::Ignored(IgnoreReason::SceneInactive));

        let handled = manager.dispatch_input(&InputEvent::CatchClick, &mut ctx, &NoLayout);
        assert_eq!(handled, Handled::Consumed);
        assert_eq!(log.borrow().last().map(String::as_str), Some("input catch"));
    }

    #[test]
    fn page_wide_input_is_unrelated() {
        let (mut manager, _) = manager_with_recorders();
        let mut ctx = GlobalContext::new();
        manager.transition_to(SceneId::Catch, &mut ctx, &NoLayout).unwrap();

        let handled = manager.dispatch_input(&InputEvent::PageClick, &mut ctx, &NoLayout);
        assert_eq!(handled, Handled::Ignored(IgnoreReason::Unrelated));
    }
}

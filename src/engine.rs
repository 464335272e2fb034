//=========================================================================
// Wishing Stars Experience
//
// Main entry point and coordinator for the four-scene greeting.
//
// Architecture:
// ```text
//   ExperienceBuilder ──build(clock)──> Experience ──> Commands
//         │                                │
//         ├─ with_fade_out()               ├─ start()
//         ├─ with_tap_range()              ├─ handle_input()
//         └─ with_channel_capacity()       └─ advance()
//
//   ExperienceBuilder ──build_driver(clock)──> Driver ──pump()──> Pump
//                                                 ↑
//                              PlatformEvent ─────┘ (channel)
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ops::RangeInclusive;

use crossbeam_channel::{bounded, Sender};
use log::{debug, info, warn, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;

//=== Internal Dependencies ===============================================

use crate::core::error::SequenceError;
use crate::core::globals::{GlobalContext, GlobalSystems};
use crate::core::input::{Handled, IgnoreReason, InputEvent};
use crate::core::platform_bridge::{EventCollector, PlatformEvent, TickControl};
use crate::core::render::{Command, Layout};
use crate::core::scene::{SceneId, SceneVisibility, TransitionOutcome};
use crate::core::timeline::{Clock, Millis};
use crate::scenes::{CatchScene, ConstellationScene, LetterModal, WishingJarScene};

//=== ExperienceBuilder ===================================================

/// Builder for configuring and constructing an [`Experience`].
///
/// # Default Values
///
/// - **Scene fade-out**: 800 ms
/// - **Letter open / close delay**: 500 ms / 500 ms
/// - **Line fade**: starts after 10 ms, lasts 500 ms
/// - **Constellation reveal delay**: 500 ms
/// - **Orb launch / land**: 100 ms / 2100 ms after submission
/// - **Orb half width**: 12.5 px
/// - **Required taps**: drawn uniformly from 5..=9
/// - **Hover breakpoint**: viewports wider than 768 px
/// - **Stars**: 5
/// - **Seed**: from entropy
/// - **Channel capacity**: 128 events
/// - **Log level**: `Info`
///
/// # Examples
///
/// ```
/// use wishing_stars::{ExperienceBuilder, VirtualClock};
///
/// let experience = ExperienceBuilder::new()
///     .with_tap_range(7..=7)
///     .with_seed(42)
///     .build(VirtualClock::new());
///
/// assert_eq!(experience.required_taps(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct ExperienceBuilder {
    fade_out: Millis,
    letter_open_delay: Millis,
    letter_close_delay: Millis,
    line_fade_delay: Millis,
    line_fade: Millis,
    reveal_delay: Millis,
    orb_launch: Millis,
    orb_land: Millis,
    orb_half_width: f64,
    tap_range: RangeInclusive<u32>,
    wide_viewport_min: f64,
    star_count: u32,
    seed: Option<u64>,
    channel_capacity: usize,
    log_level: LevelFilter,
}

impl ExperienceBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            fade_out: 800,
            letter_open_delay: 500,
            letter_close_delay: 500,
            line_fade_delay: 10,
            line_fade: 500,
            reveal_delay: 500,
            orb_launch: 100,
            orb_land: 2100,
            orb_half_width: 12.5,
            tap_range: 5..=9,
            wide_viewport_min: 768.0,
            star_count: 5,
            seed: None,
            channel_capacity: 128,
            log_level: LevelFilter::Info,
        }
    }

    /// Sets how long an outgoing scene stays on screen before it is hidden.
    ///
    /// Should match the CSS opacity transition of `.scene`.
    ///
    /// Default: 800
    pub fn with_fade_out(mut self, millis: Millis) -> Self {
        self.fade_out = millis;
        self
    }

    /// Sets the delays around the letter modal: from the final tap to the
    /// modal opening, and from dismissal to the constellation.
    ///
    /// Default: 500, 500
    pub fn with_letter_delays(mut self, open: Millis, close: Millis) -> Self {
        self.letter_open_delay = open;
        self.letter_close_delay = close;
        self
    }

    /// Sets when a drawn line starts fading in and how long the fade takes.
    ///
    /// Default: 10, 500
    pub fn with_line_fade(mut self, delay: Millis, duration: Millis) -> Self {
        self.line_fade_delay = delay;
        self.line_fade = duration;
        self
    }

    /// Sets the pause between the last star and the reveal.
    ///
    /// Default: 500
    pub fn with_reveal_delay(mut self, millis: Millis) -> Self {
        self.reveal_delay = millis;
        self
    }

    /// Sets when the orb starts moving and when it lands, both measured
    /// from submission.
    ///
    /// Default: 100, 2100
    ///
    /// # Panics
    ///
    /// Panics if `land < launch`.
    pub fn with_orb_timing(mut self, launch: Millis, land: Millis) -> Self {
        assert!(
            land >= launch,
            "Orb must land after launch, got launch {} land {}",
            launch,
            land
        );
        self.orb_launch = launch;
        self.orb_land = land;
        self
    }

    /// Sets half the orb's rendered width, used to center it on the input.
    ///
    /// Default: 12.5
    ///
    /// # Panics
    ///
    /// Panics if `half_width` is negative or not finite.
    pub fn with_orb_half_width(mut self, half_width: f64) -> Self {
        assert!(
            half_width.is_finite() && half_width >= 0.0,
            "Orb half width must be a non-negative number, got {}",
            half_width
        );
        self.orb_half_width = half_width;
        self
    }

    /// Sets the range the required tap count is drawn from.
    ///
    /// Default: 5..=9
    ///
    /// # Panics
    ///
    /// Panics if the range is empty or starts at zero.
    pub fn with_tap_range(mut self, range: RangeInclusive<u32>) -> Self {
        assert!(
            !range.is_empty() && *range.start() >= 1,
            "Tap range must be non-empty and start at 1, got {:?}",
            range
        );
        self.tap_range = range;
        self
    }

    /// Sets the viewport width above which hovering moves the button.
    ///
    /// Default: 768.0
    pub fn with_hover_breakpoint(mut self, width: f64) -> Self {
        self.wide_viewport_min = width;
        self
    }

    /// Sets the number of stars in the constellation.
    ///
    /// Default: 5
    ///
    /// # Panics
    ///
    /// Panics if `count == 0`.
    pub fn with_star_count(mut self, count: u32) -> Self {
        assert!(count > 0, "Star count must be positive");
        self.star_count = count;
        self
    }

    /// Fixes the random seed (tap threshold and button positions).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the channel capacity for page → experience events.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the maximum level the browser console logger emits.
    ///
    /// Default: `Info`
    pub fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    /// Builds the experience with every scene registered.
    ///
    /// Nothing is shown until [`Experience::start`] is called.
    pub fn build<C: Clock>(self, clock: C) -> Experience<C> {
        info!(
            "Building experience (fade: {}ms, taps: {:?}, stars: {})",
            self.fade_out, self.tap_range, self.star_count
        );

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let catch = CatchScene::new(
            self.tap_range,
            self.wide_viewport_min,
            self.letter_open_delay,
            LetterModal::new(self.letter_close_delay),
            rng,
        );
        let required_taps = catch.counter().required();

        let mut systems = GlobalSystems::new(self.fade_out);
        let scenes = &mut systems.scene_manager;
        scenes.register_default(SceneId::Catch, catch);
        scenes.register_scene(
            SceneId::Constellation,
            ConstellationScene::new(
                self.star_count,
                self.line_fade_delay,
                self.line_fade,
                self.reveal_delay,
            ),
        );
        scenes.register_scene(
            SceneId::WishingJar,
            WishingJarScene::new(self.orb_launch, self.orb_land, self.orb_half_width),
        );

        Experience {
            systems,
            ctx: GlobalContext::new(),
            clock,
            required_taps,
            started: false,
        }
    }

    /// Builds the experience behind a channel-fed [`Driver`].
    pub fn build_driver<C: Clock>(self, clock: C) -> Driver<C> {
        let (sender, receiver) = bounded(self.channel_capacity);
        info!("Event channel created (capacity: {})", self.channel_capacity);

        Driver {
            experience: self.build(clock),
            collector: EventCollector::new(receiver),
            sender,
        }
    }
}

impl Default for ExperienceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Experience ==========================================================

/// The running greeting.
///
/// Every call runs to completion: input is handled, transitions are
/// applied, and the resulting page mutations queue up for
/// [`take_commands`](Self::take_commands). Steps scheduled for later fire
/// from [`advance`](Self::advance) once the clock has passed their due
/// time.
pub struct Experience<C: Clock> {
    systems: GlobalSystems,
    ctx: GlobalContext,
    clock: C,
    required_taps: u32,
    started: bool,
}

impl<C: Clock> Experience<C> {
    //--- Lifecycle --------------------------------------------------------

    /// Shows the first scene and hides the others.
    pub fn start(&mut self, layout: &dyn Layout) -> Result<TransitionOutcome, SequenceError> {
        self.ctx.set_now(self.clock.now());
        let outcome = self.systems.scene_manager.start(&mut self.ctx, layout)?;
        self.started = true;
        info!("Experience started ({} taps to catch)", self.required_taps);
        Ok(outcome)
    }

    /// Handles one page interaction.
    ///
    /// Steps that fell due before the interaction fire first.
    pub fn handle_input(&mut self, input: &InputEvent, layout: &dyn Layout) -> Handled {
        if !self.started {
            warn!("Input {:?} before start", input);
            return Handled::Ignored(IgnoreReason::NotReady);
        }

        self.advance(layout);
        self.systems.handle_input(input, &mut self.ctx, layout)
    }

    /// Fires every step due by the clock's current time.
    ///
    /// Returns the number of steps fired.
    pub fn advance(&mut self, layout: &dyn Layout) -> usize {
        let now = self.clock.now();
        self.systems.run_due_steps(now, &mut self.ctx, layout)
    }

    /// Forces a transition by container id (`"scene1"`, `"scene3"` or
    /// `"scene4"`).
    pub fn transition_to(
        &mut self,
        id: &str,
        layout: &dyn Layout,
    ) -> Result<TransitionOutcome, SequenceError> {
        self.ctx.set_now(self.clock.now());
        self.systems
            .scene_manager
            .transition_to_id(id, &mut self.ctx, layout)
    }

    /// Reports that the browser refused to play the music.
    pub fn audio_rejected(&mut self, reason: &str) {
        self.systems.audio.audio_rejected(reason);
    }

    /// Drains the page mutations produced so far.
    pub fn take_commands(&mut self) -> Vec<Command> {
        self.ctx.take_commands()
    }

    //--- Queries ----------------------------------------------------------

    /// When the next scheduled step falls due, if any.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.ctx.timeline.next_deadline()
    }

    pub fn active_scene(&self) -> Option<SceneId> {
        self.systems.scene_manager.active_scene()
    }

    pub fn visibility(&self, scene: SceneId) -> Option<SceneVisibility> {
        self.systems.scene_manager.visibility(scene)
    }

    /// Taps needed to catch the button this session.
    pub fn required_taps(&self) -> u32 {
        self.required_taps
    }

    pub fn music_requested(&self) -> bool {
        self.systems.audio.requested()
    }

    pub fn systems(&self) -> &GlobalSystems {
        &self.systems
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

//=== Driver ==============================================================

/// Result of one [`Driver::pump`].
#[derive(Debug, Clone, PartialEq)]
pub struct Pump {
    /// Page mutations to apply, in order.
    pub commands: Vec<Command>,

    /// When to pump again if nothing else happens.
    pub next_deadline: Option<Millis>,

    pub control: TickControl,
}

/// Channel-fed wrapper around an [`Experience`].
///
/// The page binding sends [`PlatformEvent`]s through [`sender`](Self::sender)
/// and calls [`pump`](Self::pump) after each listener or timer callback.
pub struct Driver<C: Clock> {
    experience: Experience<C>,
    collector: EventCollector,
    sender: Sender<PlatformEvent>,
}

impl<C: Clock> Driver<C> {
    /// A handle for sending page events.
    pub fn sender(&self) -> Sender<PlatformEvent> {
        self.sender.clone()
    }

    /// Starts the experience and returns the initial page mutations.
    pub fn start(&mut self, layout: &dyn Layout) -> Result<Pump, SequenceError> {
        self.experience.start(layout)?;
        Ok(Pump {
            commands: self.experience.take_commands(),
            next_deadline: self.experience.next_deadline(),
            control: TickControl::Continue,
        })
    }

    /// Drains queued events, fires due steps and collects the mutations.
    pub fn pump(&mut self, layout: &dyn Layout) -> Pump {
        let control = self.collector.collect_frame();
        debug!(
            "Pump: {} inputs, {} timer wake-ups",
            self.collector.inputs().len(),
            self.collector.ticks()
        );

        for reason in self.collector.take_audio_failures() {
            self.experience.audio_rejected(&reason);
        }
        for input in self.collector.take_inputs() {
            self.experience.handle_input(&input, layout);
        }
        self.experience.advance(layout);

        if control == TickControl::Exit {
            info!("Experience shutting down");
        }

        Pump {
            commands: self.experience.take_commands(),
            next_deadline: self.experience.next_deadline(),
            control,
        }
    }

    pub fn experience(&self) -> &Experience<C> {
        &self.experience
    }

    pub fn experience_mut(&mut self) -> &mut Experience<C> {
        &mut self.experience
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

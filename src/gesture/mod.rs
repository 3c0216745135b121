//! Drag-to-outcome state machine for the tear and swipe-navigation gestures.
//!
//! The machine is pure: it consumes per-update translations and produces
//! progress feedback plus exactly one outcome per pointer-down session. It
//! knows nothing about event sources or rendering; drivers adapt their input
//! (touch, trackpad, terminal mouse) into `begin`/`handle_move`/`handle_end`
//! calls and act on the returned outcome.

/// Tuning constants for gesture recognition. Defaults are the shipped
/// values; the config section of the client may override them.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// Ignore movement until one axis exceeds this distance (px).
    pub activation_distance: f32,
    /// A drag is vertical (and therefore not ours) when |dy| exceeds
    /// |dx| times this factor. Ties favor not hijacking scroll.
    pub vertical_dominance_factor: f32,
    /// Tear commits at this fraction of full tear progress.
    pub tear_threshold: f32,
    /// Pixels of rightward travel that count as full tear progress.
    pub tear_progress_divisor: f32,
    /// Medium haptic tick granularity, in width-relative progress.
    pub haptic_interval: f32,
    /// Swipe navigation commits beyond this fraction of container width.
    pub completion_ratio: f32,
    /// Swipe navigation also commits beyond this release velocity (px/s).
    pub velocity_threshold: f32,
    /// Drags starting inside this top strip of the overview never become
    /// navigation gestures (the strip belongs to scrollable content).
    pub top_exclusion_height: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            activation_distance: 12.0,
            vertical_dominance_factor: 1.15,
            tear_threshold: 0.95,
            tear_progress_divisor: 200.0,
            haptic_interval: 0.04,
            completion_ratio: 0.28,
            velocity_threshold: 520.0,
            top_exclusion_height: 108.0,
        }
    }
}

/// Which layer is frontmost when the gesture starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    Main,
    Overview,
}

/// Everything the machine needs to know about the world at pointer-down.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureContext {
    pub view: ActiveView,
    pub container_width: f32,
    /// The drag started on the note card's tear strip.
    pub in_tear_strip: bool,
    pub text_selection_active: bool,
    /// Start location in container coordinates (x, y).
    pub start_location: (f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    TearToArchive,
    ToOverview,
    ToMain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haptic {
    Medium,
    Heavy,
}

/// Direction is locked at the moment of activation and never re-evaluated;
/// `Cancelled` is sticky for the rest of the pointer-down session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Tracking(Direction),
    Cancelled,
}

/// Continuous feedback for rendering and haptics while tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureFeedback {
    pub direction: Option<Direction>,
    /// Normalized [0, 1] commit progress.
    pub progress: f32,
    /// Pixel offset to apply to the dragged surface.
    pub offset: f32,
    pub haptic: Option<Haptic>,
}

impl GestureFeedback {
    fn none() -> Self {
        Self {
            direction: None,
            progress: 0.0,
            offset: 0.0,
            haptic: None,
        }
    }
}

/// Exactly one of these per gesture session.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    Cancelled,
    Committed {
        direction: Direction,
        haptic: Option<Haptic>,
    },
}

#[derive(Debug, Clone)]
pub struct GestureStateMachine {
    config: GestureConfig,
    phase: Phase,
    session: Option<GestureContext>,
    /// Highest haptic step fired this session; a step never retriggers.
    haptic_step: f32,
}

impl GestureStateMachine {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            session: None,
            haptic_step: 0.0,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn direction(&self) -> Option<Direction> {
        match self.phase {
            Phase::Tracking(direction) => Some(direction),
            _ => None,
        }
    }

    pub fn in_session(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a pointer-down session. Any prior session state is discarded.
    pub fn begin(&mut self, context: GestureContext) {
        self.phase = Phase::Idle;
        self.haptic_step = 0.0;
        self.session = Some(context);
    }

    /// Feeds one translation update. Returns feedback for rendering; all
    /// fields are zero until the gesture activates and after it cancels.
    pub fn handle_move(&mut self, dx: f32, dy: f32) -> GestureFeedback {
        let context = match &self.session {
            Some(c) => c.clone(),
            None => return GestureFeedback::none(),
        };
        if self.phase == Phase::Cancelled {
            return GestureFeedback::none();
        }
        if context.text_selection_active {
            self.phase = Phase::Cancelled;
            return GestureFeedback::none();
        }

        if self.phase == Phase::Idle {
            match self.try_activate(&context, dx, dy) {
                Activation::NotYet => return GestureFeedback::none(),
                Activation::Rejected => {
                    self.phase = Phase::Cancelled;
                    return GestureFeedback::none();
                }
                Activation::Locked(direction) => {
                    self.phase = Phase::Tracking(direction);
                }
            }
        }

        let direction = match self.phase {
            Phase::Tracking(direction) => direction,
            _ => return GestureFeedback::none(),
        };

        let width = context.container_width.max(1.0);
        match direction {
            Direction::TearToArchive => {
                let travel = dx.max(0.0);
                let progress = (travel / self.config.tear_progress_divisor).clamp(0.0, 1.0);
                let haptic = self.tear_haptic_tick(travel, width);
                GestureFeedback {
                    direction: Some(direction),
                    progress,
                    offset: travel,
                    haptic,
                }
            }
            Direction::ToOverview => {
                let travel = (-dx).max(0.0);
                GestureFeedback {
                    direction: Some(direction),
                    progress: self.swipe_progress(travel, width),
                    offset: dx.clamp(-width, 0.0),
                    haptic: None,
                }
            }
            Direction::ToMain => {
                let travel = dx.max(0.0);
                GestureFeedback {
                    direction: Some(direction),
                    progress: self.swipe_progress(travel, width),
                    offset: dx.clamp(0.0, width),
                    haptic: None,
                }
            }
        }
    }

    /// Ends the session with the final translation and a signed horizontal
    /// release velocity (px/s, positive rightward). Resets the machine.
    pub fn handle_end(&mut self, dx: f32, _dy: f32, velocity: f32) -> GestureOutcome {
        let outcome = self.resolve_end(dx, velocity);
        self.reset();
        outcome
    }

    /// Scene-lifecycle interruption: reset everything immediately. A gesture
    /// is never left half-committed across a lifecycle boundary.
    pub fn interrupt(&mut self) {
        self.reset();
    }

    fn resolve_end(&self, dx: f32, velocity: f32) -> GestureOutcome {
        let context = match &self.session {
            Some(c) => c,
            None => return GestureOutcome::Cancelled,
        };
        if context.text_selection_active {
            return GestureOutcome::Cancelled;
        }
        let direction = match self.phase {
            Phase::Tracking(direction) => direction,
            _ => return GestureOutcome::Cancelled,
        };

        let committed = match direction {
            Direction::TearToArchive => {
                let progress = (dx.max(0.0) / self.config.tear_progress_divisor).clamp(0.0, 1.0);
                progress >= self.config.tear_threshold
            }
            Direction::ToOverview => {
                let threshold = context.container_width * self.config.completion_ratio;
                -dx > threshold || -velocity > self.config.velocity_threshold
            }
            Direction::ToMain => {
                let threshold = context.container_width * self.config.completion_ratio;
                dx > threshold || velocity > self.config.velocity_threshold
            }
        };

        if committed {
            let haptic = match direction {
                Direction::TearToArchive => Some(Haptic::Heavy),
                _ => None,
            };
            GestureOutcome::Committed { direction, haptic }
        } else {
            GestureOutcome::Cancelled
        }
    }

    fn try_activate(&self, context: &GestureContext, dx: f32, dy: f32) -> Activation {
        let (abs_x, abs_y) = (dx.abs(), dy.abs());
        if abs_x.max(abs_y) <= self.config.activation_distance {
            return Activation::NotYet;
        }

        // Mostly-vertical drags belong to scrollable subviews.
        if abs_y > abs_x * self.config.vertical_dominance_factor {
            return Activation::Rejected;
        }

        if context.view == ActiveView::Overview
            && context.start_location.1 <= self.config.top_exclusion_height
        {
            return Activation::Rejected;
        }

        let direction = match (context.view, context.in_tear_strip) {
            (ActiveView::Main, true) if dx > 0.0 => Some(Direction::TearToArchive),
            (ActiveView::Main, false) if dx < 0.0 => Some(Direction::ToOverview),
            (ActiveView::Overview, _) if dx > 0.0 => Some(Direction::ToMain),
            _ => None,
        };

        match direction {
            Some(direction) => Activation::Locked(direction),
            None => Activation::Rejected,
        }
    }

    fn swipe_progress(&self, travel: f32, width: f32) -> f32 {
        let divisor = (self.config.completion_ratio * width).max(1.0);
        (travel / divisor).clamp(0.0, 1.0)
    }

    /// Medium tick each time width-relative progress crosses into a new
    /// haptic interval, at most once per step per session.
    fn tear_haptic_tick(&mut self, travel: f32, width: f32) -> Option<Haptic> {
        let width_progress = (travel / width).min(1.0);
        let step = (width_progress / self.config.haptic_interval).floor();
        if step > self.haptic_step && width_progress > 0.05 {
            self.haptic_step = step;
            Some(Haptic::Medium)
        } else {
            None
        }
    }

    fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.session = None;
        self.haptic_step = 0.0;
    }
}

impl Default for GestureStateMachine {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

enum Activation {
    NotYet,
    Rejected,
    Locked(Direction),
}

//! Application state management
//!
//! Defines the explicit application state owned by the controller and the
//! Idle/Spinning state machine guarding the wheel.

use crate::domain::entries::EntryList;
use crate::domain::groups::GroupSet;
use crate::domain::spin::SpinSession;

/// Wheel state - either idle or animating one spin
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WheelState {
    /// Waiting for a spin request
    #[default]
    Idle,
    /// A spin is animating; holds its session
    Spinning(SpinSession),
}

impl WheelState {
    pub fn is_spinning(&self) -> bool {
        matches!(self, WheelState::Spinning(_))
    }

    pub fn session(&self) -> Option<&SpinSession> {
        match self {
            WheelState::Spinning(session) => Some(session),
            WheelState::Idle => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut SpinSession> {
        match self {
            WheelState::Spinning(session) => Some(session),
            WheelState::Idle => None,
        }
    }
}

/// Which surface is in front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Wheel,
    Groups,
}

/// Possible wheel state transition events
#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    /// A new spin was planned and should start
    SpinStarted(SpinSession),
    /// The animation reached its final frame
    SpinFinished,
}

/// State machine for wheel state transitions
pub struct StateMachine;

impl StateMachine {
    /// Processes a state event and returns the new state
    ///
    /// A second spin while one is running is ignored, so at most one
    /// session exists at a time.
    pub fn process_event(current_state: WheelState, event: StateEvent) -> WheelState {
        match (current_state, event) {
            (WheelState::Idle, StateEvent::SpinStarted(session)) => {
                tracing::debug!("wheel: Idle -> Spinning");
                WheelState::Spinning(session)
            }

            (WheelState::Spinning(_), StateEvent::SpinFinished) => {
                tracing::debug!("wheel: Spinning -> Idle");
                WheelState::Idle
            }

            // Invalid transitions - ignore event
            (state, _) => state,
        }
    }
}

/// Hints last used to build groups, replayed by "regenerate"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupHints {
    pub count: Option<usize>,
    pub size: Option<usize>,
}

/// Everything the widget remembers during a session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub entries: EntryList,
    /// Unbounded wheel rotation in radians
    pub rotation: f64,
    pub wheel: WheelState,
    pub winner: Option<String>,
    pub winner_modal_open: bool,
    pub keep_winners: bool,
    pub groups: Option<GroupSet>,
    pub group_hints: GroupHints,
    pub mode: Mode,
}

impl AppState {
    pub fn new(keep_winners: bool) -> Self {
        Self {
            keep_winners,
            ..Self::default()
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.wheel.is_spinning()
    }
}

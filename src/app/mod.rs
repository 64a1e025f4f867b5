//! Application orchestration layer
//!
//! This module coordinates between the pure domain, the collaborator ports
//! and the clock. It owns the application state and handles every user
//! action.

pub mod controller;
pub mod state;
pub mod timers;

pub use controller::{AppError, Collaborators, SpinStatus, WheelController};
pub use state::{AppState, Mode, WheelState};

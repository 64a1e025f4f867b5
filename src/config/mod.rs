//! Configuration module for prize-wheel
//!
//! Holds the tunables shared by the controller, the renderer and the CLI:
//! spin timing, auto-removal, group defaults and canvas geometry.

pub mod wheel;

pub use wheel::{ConfigError, WheelConfig};

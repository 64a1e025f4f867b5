//! Wheel rendering

pub mod renderer;

pub use renderer::{PixmapRenderer, RendererError, WheelLayout, WheelRenderer};

pub mod shortcuts;

pub use shortcuts::{Focus, Key, Shortcut};

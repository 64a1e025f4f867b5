//! Collaborator interfaces and their host implementations
//!
//! The picking core never draws, plays sounds, touches files or reads the
//! time directly. It talks to the traits in `ports`; this module also
//! provides terminal/file system implementations for the CLI, and recording
//! doubles for tests behind the `test-util` feature.

pub mod clock;
pub mod files;
pub mod ports;
#[cfg(any(test, feature = "test-util"))]
pub mod recording;
pub mod terminal;

pub use clock::{Clock, ManualClock, SystemClock};
pub use files::DiskFiles;
pub use ports::{AudioCue, CueError, FileIo, FileIoError, Notifier, Renderer};
pub use terminal::{TerminalCue, TerminalNotifier};

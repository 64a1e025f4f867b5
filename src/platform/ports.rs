//! Traits the controller uses to reach the outside world

use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::groups::GroupSet;

/// Draws the wheel and post-spin results
pub trait Renderer {
    /// Redraws the wheel for `entries` at absolute `rotation` (radians)
    fn draw_wheel(&mut self, entries: &[String], rotation: f64);

    /// Draws the empty-wheel placeholder
    fn draw_placeholder(&mut self);

    /// Presents the winner once a spin has completed
    fn show_winner(&mut self, _winner: &str) {}

    /// Presents a freshly generated group set
    fn show_groups(&mut self, _groups: &GroupSet) {}
}

/// A shared renderer handle, so the host can inspect what was drawn
impl<R: Renderer + ?Sized> Renderer for Rc<RefCell<R>> {
    fn draw_wheel(&mut self, entries: &[String], rotation: f64) {
        self.borrow_mut().draw_wheel(entries, rotation);
    }

    fn draw_placeholder(&mut self) {
        self.borrow_mut().draw_placeholder();
    }

    fn show_winner(&mut self, winner: &str) {
        self.borrow_mut().show_winner(winner);
    }

    fn show_groups(&mut self, groups: &GroupSet) {
        self.borrow_mut().show_groups(groups);
    }
}

/// Audio cue failure; the core logs and otherwise ignores these
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("audio cue `{cue}` failed: {reason}")]
pub struct CueError {
    pub cue: &'static str,
    pub reason: String,
}

/// Fire-and-forget sound effects
pub trait AudioCue {
    fn play_tick(&mut self) -> Result<(), CueError>;
    fn play_spin_start(&mut self) -> Result<(), CueError>;
    fn play_applause(&mut self) -> Result<(), CueError>;
    fn play_success(&mut self) -> Result<(), CueError>;

    /// Stops the looping spin sound when the wheel settles
    fn stop_spin(&mut self) -> Result<(), CueError> {
        Ok(())
    }
}

/// Errors surfaced by file and clipboard collaborators
#[derive(Debug, thiserror::Error)]
pub enum FileIoError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("clipboard is not available: {0}")]
    ClipboardUnavailable(String),

    #[error("no file was selected")]
    NothingSelected,
}

/// Save, load and clipboard operations
pub trait FileIo {
    /// Offers `content` for download under `filename`
    fn export_text(&mut self, filename: &str, content: &str) -> Result<(), FileIoError>;

    /// Reads back a user-chosen text file
    fn import_text(&mut self) -> Result<String, FileIoError>;

    /// Places `content` on the clipboard
    fn copy_to_clipboard(&mut self, content: &str) -> Result<(), FileIoError>;
}

/// User-facing messages and confirmations
pub trait Notifier {
    /// Validation failure the user should see
    fn warn(&mut self, message: &str);

    /// Positive feedback, such as a completed copy
    fn info(&mut self, message: &str);

    /// Asks the user to confirm an irreversible action
    fn confirm(&mut self, message: &str) -> bool;
}

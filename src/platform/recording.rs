//! In-memory collaborators that record every call
//!
//! Each double is a cheap handle around shared state: keep one clone for
//! assertions and hand the other to the controller.

use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::groups::GroupSet;
use crate::platform::ports::{AudioCue, CueError, FileIo, FileIoError, Notifier, Renderer};

/// Sound cue kinds, in the order they were played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Tick,
    SpinStart,
    StopSpin,
    Applause,
    Success,
}

#[derive(Debug, Default)]
struct RenderLog {
    frames: Vec<(usize, f64)>,
    placeholders: usize,
    winners: Vec<String>,
    groups: Vec<GroupSet>,
}

/// Renderer that remembers what it was asked to draw
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    log: Rc<RefCell<RenderLog>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of wheel frames drawn
    pub fn frame_count(&self) -> usize {
        self.log.borrow().frames.len()
    }

    /// Rotation of the most recent wheel frame
    pub fn last_rotation(&self) -> Option<f64> {
        self.log.borrow().frames.last().map(|&(_, rotation)| rotation)
    }

    /// Entry count of the most recent wheel frame
    pub fn last_entry_count(&self) -> Option<usize> {
        self.log.borrow().frames.last().map(|&(count, _)| count)
    }

    pub fn placeholder_count(&self) -> usize {
        self.log.borrow().placeholders
    }

    pub fn winners(&self) -> Vec<String> {
        self.log.borrow().winners.clone()
    }

    pub fn shown_groups(&self) -> Vec<GroupSet> {
        self.log.borrow().groups.clone()
    }
}

impl Renderer for RecordingRenderer {
    fn draw_wheel(&mut self, entries: &[String], rotation: f64) {
        self.log.borrow_mut().frames.push((entries.len(), rotation));
    }

    fn draw_placeholder(&mut self) {
        self.log.borrow_mut().placeholders += 1;
    }

    fn show_winner(&mut self, winner: &str) {
        self.log.borrow_mut().winners.push(winner.to_owned());
    }

    fn show_groups(&mut self, groups: &GroupSet) {
        self.log.borrow_mut().groups.push(groups.clone());
    }
}

/// Audio double; can be told to fail every cue
#[derive(Debug, Clone, Default)]
pub struct RecordingCue {
    played: Rc<RefCell<Vec<Cue>>>,
    failing: bool,
}

impl RecordingCue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cue player whose every call errors after recording
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn played(&self) -> Vec<Cue> {
        self.played.borrow().clone()
    }

    pub fn count(&self, cue: Cue) -> usize {
        self.played.borrow().iter().filter(|&&c| c == cue).count()
    }

    fn record(&mut self, cue: Cue, name: &'static str) -> Result<(), CueError> {
        self.played.borrow_mut().push(cue);
        if self.failing {
            return Err(CueError {
                cue: name,
                reason: "playback blocked".to_owned(),
            });
        }
        Ok(())
    }
}

impl AudioCue for RecordingCue {
    fn play_tick(&mut self) -> Result<(), CueError> {
        self.record(Cue::Tick, "tick")
    }

    fn play_spin_start(&mut self) -> Result<(), CueError> {
        self.record(Cue::SpinStart, "spin-start")
    }

    fn play_applause(&mut self) -> Result<(), CueError> {
        self.record(Cue::Applause, "applause")
    }

    fn play_success(&mut self) -> Result<(), CueError> {
        self.record(Cue::Success, "success")
    }

    fn stop_spin(&mut self) -> Result<(), CueError> {
        self.record(Cue::StopSpin, "spin-stop")
    }
}

#[derive(Debug, Default)]
struct NoticeLog {
    warnings: Vec<String>,
    infos: Vec<String>,
    confirmations: Vec<String>,
}

/// Notifier double with a fixed answer to confirmations
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    log: Rc<RefCell<NoticeLog>>,
    confirm_answer: Rc<RefCell<bool>>,
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingNotifier {
    /// A notifier that confirms everything
    pub fn new() -> Self {
        Self {
            log: Rc::default(),
            confirm_answer: Rc::new(RefCell::new(true)),
        }
    }

    pub fn set_confirm_answer(&self, answer: bool) {
        *self.confirm_answer.borrow_mut() = answer;
    }

    pub fn warnings(&self) -> Vec<String> {
        self.log.borrow().warnings.clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.log.borrow().infos.clone()
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.log.borrow().confirmations.clone()
    }
}

impl Notifier for RecordingNotifier {
    fn warn(&mut self, message: &str) {
        self.log.borrow_mut().warnings.push(message.to_owned());
    }

    fn info(&mut self, message: &str) {
        self.log.borrow_mut().infos.push(message.to_owned());
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.log.borrow_mut().confirmations.push(message.to_owned());
        *self.confirm_answer.borrow()
    }
}

#[derive(Debug, Default)]
struct FileLog {
    exports: Vec<(String, String)>,
    clipboard: Option<String>,
    import: Option<String>,
    clipboard_broken: bool,
}

/// File and clipboard double held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryFiles {
    log: Rc<RefCell<FileLog>>,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content the next `import_text` call returns
    pub fn set_import(&self, content: &str) {
        self.log.borrow_mut().import = Some(content.to_owned());
    }

    pub fn break_clipboard(&self) {
        self.log.borrow_mut().clipboard_broken = true;
    }

    pub fn exports(&self) -> Vec<(String, String)> {
        self.log.borrow().exports.clone()
    }

    pub fn clipboard(&self) -> Option<String> {
        self.log.borrow().clipboard.clone()
    }
}

impl FileIo for MemoryFiles {
    fn export_text(&mut self, filename: &str, content: &str) -> Result<(), FileIoError> {
        self.log
            .borrow_mut()
            .exports
            .push((filename.to_owned(), content.to_owned()));
        Ok(())
    }

    fn import_text(&mut self) -> Result<String, FileIoError> {
        self.log
            .borrow_mut()
            .import
            .take()
            .ok_or(FileIoError::NothingSelected)
    }

    fn copy_to_clipboard(&mut self, content: &str) -> Result<(), FileIoError> {
        let mut log = self.log.borrow_mut();
        if log.clipboard_broken {
            return Err(FileIoError::ClipboardUnavailable("permission denied".to_owned()));
        }
        log.clipboard = Some(content.to_owned());
        Ok(())
    }
}

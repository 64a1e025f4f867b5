//! Application controller and coordination layer
//!
//! The controller owns the application state and drives every user action:
//! entry editing, spinning, group generation and exports. Side effects go
//! through the collaborator traits; time comes from an injected clock.
//!
//! All validation happens before any mutation. A rejected action is
//! reported through the notifier, returned as an `AppError`, and leaves the
//! state untouched.

use std::time::Duration;

use rand::Rng;
use thiserror::Error;

use crate::app::state::{AppState, GroupHints, Mode, StateEvent, StateMachine};
use crate::app::timers::{TimerAction, TimerQueue};
use crate::config::{ConfigError, WheelConfig};
use crate::domain::entries::{EntryError, EntryList};
use crate::domain::groups::{self, GroupError, GroupSet};
use crate::domain::spin::{SpinError, SpinPlan, SpinSession};
use crate::input::shortcuts::{self, Focus, Key, Shortcut};
use crate::platform::{AudioCue, Clock, CueError, FileIo, FileIoError, Notifier, Renderer};

pub const ENTRIES_FILENAME: &str = "wheel-entries.txt";
pub const GROUPS_FILENAME: &str = "groups.txt";
const CLEAR_PROMPT: &str = "Are you sure you want to clear all entries?";
const COPIED_MESSAGE: &str = "Groups copied to clipboard!";

/// Application errors surfaced to the user
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Entry(#[from] EntryError),

    #[error(transparent)]
    Spin(#[from] SpinError),

    #[error(transparent)]
    Group(#[from] GroupError),

    /// Entry edits are refused while the wheel turns
    #[error("Please wait for the wheel to stop spinning!")]
    Busy,

    #[error("File operation failed: {0}")]
    File(#[from] FileIoError),

    #[error("Failed to copy. Please try again.")]
    CopyFailed(#[source] FileIoError),
}

/// Outcome of a spin request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinStatus {
    /// A new spin started toward the given slice
    Started { winner_index: usize },
    /// A spin was already running; nothing changed
    AlreadySpinning,
}

/// The outside world the controller talks to
pub struct Collaborators {
    pub renderer: Box<dyn Renderer>,
    pub audio: Box<dyn AudioCue>,
    pub notifier: Box<dyn Notifier>,
    pub files: Box<dyn FileIo>,
}

/// Main application controller
///
/// Single-threaded: the host calls `pump` on every display refresh (or on
/// a fixed interval) and dispatches user actions in between.
pub struct WheelController<C: Clock, G: Rng> {
    state: AppState,
    config: WheelConfig,
    clock: C,
    rng: G,
    timers: TimerQueue,
    frame_requested: bool,
    renderer: Box<dyn Renderer>,
    audio: Box<dyn AudioCue>,
    notifier: Box<dyn Notifier>,
    files: Box<dyn FileIo>,
}

impl<C: Clock, G: Rng> WheelController<C, G> {
    /// Creates a controller with an empty entry list and draws the placeholder
    ///
    /// The configuration is validated first; an invalid one is returned as
    /// an error before anything is drawn.
    pub fn new(
        config: WheelConfig,
        clock: C,
        rng: G,
        collaborators: Collaborators,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let Collaborators {
            renderer,
            audio,
            notifier,
            files,
        } = collaborators;

        let mut controller = Self {
            state: AppState::new(config.keep_winners),
            config,
            clock,
            rng,
            timers: TimerQueue::new(),
            frame_requested: false,
            renderer,
            audio,
            notifier,
            files,
        };
        controller.redraw();
        Ok(controller)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn entries(&self) -> &EntryList {
        &self.state.entries
    }

    pub fn winner(&self) -> Option<&str> {
        self.state.winner.as_deref()
    }

    pub fn is_spinning(&self) -> bool {
        self.state.is_spinning()
    }

    /// True while a frame or a deferred action is still outstanding
    pub fn is_busy(&self) -> bool {
        self.state.is_spinning() || self.frame_requested || !self.timers.is_empty()
    }

    /// Due time of the next deferred action
    pub fn next_timer_due(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    pub fn set_keep_winners(&mut self, keep: bool) {
        self.state.keep_winners = keep;
    }

    // ---------------------------------------------------------------
    // Entry store
    // ---------------------------------------------------------------

    /// Replaces the entry list with names parsed from `raw`
    ///
    /// # Returns
    /// Number of entries now on the wheel
    pub fn set_entries(&mut self, raw: &str) -> Result<usize, AppError> {
        self.ensure_idle()?;
        let entries = match EntryList::parse(raw) {
            Ok(entries) => entries,
            Err(e) => return self.reject(e.into()),
        };

        tracing::info!(count = entries.len(), "entries updated");
        self.state.entries = entries;
        self.redraw();
        self.cue(|audio| audio.play_success());
        Ok(self.state.entries.len())
    }

    /// Shuffles the entry list in place
    pub fn shuffle_entries(&mut self) -> Result<(), AppError> {
        self.ensure_idle()?;
        if self.state.entries.is_empty() {
            return self.reject(EntryError::NoEntries { action: "shuffle" }.into());
        }

        self.state.entries.shuffle(&mut self.rng);
        tracing::info!(count = self.state.entries.len(), "entries shuffled");
        self.redraw();
        self.cue(|audio| audio.play_success());
        Ok(())
    }

    /// Clears every entry after the user confirms
    ///
    /// # Returns
    /// true if the list was cleared, false if the user declined
    pub fn clear_all(&mut self) -> Result<bool, AppError> {
        self.ensure_idle()?;
        if !self.notifier.confirm(CLEAR_PROMPT) {
            tracing::debug!("clear declined");
            return Ok(false);
        }

        self.state.entries.clear();
        self.state.winner = None;
        self.timers.clear();
        tracing::info!("entries cleared");
        self.redraw();
        Ok(true)
    }

    /// Removes the most recent winner from the entry list
    pub fn remove_winner(&mut self) -> Result<(), AppError> {
        self.ensure_idle()?;
        let Some(winner) = self.state.winner.take() else {
            return self.reject(EntryError::NoWinner.into());
        };

        self.timers.cancel(&TimerAction::RemoveWinner(winner.clone()));
        self.remove_past_winner(&winner);
        Ok(())
    }

    fn remove_past_winner(&mut self, name: &str) {
        if self.state.winner.as_deref() == Some(name) {
            self.state.winner = None;
        }
        if self.state.entries.remove_entry(name) {
            tracing::info!(winner = %name, remaining = self.state.entries.len(), "winner removed");
            self.redraw();
            self.cue(|audio| audio.play_success());
        } else {
            tracing::debug!(winner = %name, "winner already gone from the wheel");
        }
    }

    /// Exports the entry list as `wheel-entries.txt`
    pub fn save_list(&mut self) -> Result<(), AppError> {
        if self.state.entries.is_empty() {
            return self.reject(EntryError::NoEntries { action: "save" }.into());
        }

        let text = self.state.entries.to_text();
        if let Err(e) = self.files.export_text(ENTRIES_FILENAME, &text) {
            return self.reject(e.into());
        }
        Ok(())
    }

    /// Loads a text file chosen through the file collaborator
    pub fn load_list(&mut self) -> Result<usize, AppError> {
        self.ensure_idle()?;
        let content = match self.files.import_text() {
            Ok(content) => content,
            Err(e) => return self.reject(e.into()),
        };
        self.set_entries(&content)
    }

    // ---------------------------------------------------------------
    // Wheel selector
    // ---------------------------------------------------------------

    /// Starts a spin toward a uniformly random entry
    ///
    /// Draws the first frame immediately; the host keeps calling `pump`
    /// until the spin completes.
    pub fn spin(&mut self) -> Result<SpinStatus, AppError> {
        if self.state.is_spinning() {
            return Ok(SpinStatus::AlreadySpinning);
        }

        let limits = self.config.spin_limits();
        let plan = match SpinPlan::random(
            self.state.entries.len(),
            self.state.rotation,
            &limits,
            &mut self.rng,
        ) {
            Ok(plan) => plan,
            Err(e) => return self.reject(e.into()),
        };
        Ok(self.start_spin(plan))
    }

    /// Starts a spin from a prepared plan
    ///
    /// The plan must have been built for the current entry count and
    /// rotation; a mismatching plan is rejected.
    pub fn spin_with_plan(&mut self, plan: SpinPlan) -> Result<SpinStatus, AppError> {
        if self.state.is_spinning() {
            return Ok(SpinStatus::AlreadySpinning);
        }
        if self.state.entries.is_empty() {
            return self.reject(SpinError::NoEntries.into());
        }
        if plan.entry_count() != self.state.entries.len() {
            return self.reject(
                SpinError::WinnerOutOfRange {
                    index: plan.winner_index(),
                    count: self.state.entries.len(),
                }
                .into(),
            );
        }
        if (plan.start_rotation() - self.state.rotation).abs() > f64::EPSILON {
            return self.reject(SpinError::StartMismatch.into());
        }
        Ok(self.start_spin(plan))
    }

    fn start_spin(&mut self, plan: SpinPlan) -> SpinStatus {
        let winner_index = plan.winner_index();
        tracing::info!(
            entries = plan.entry_count(),
            winner_index,
            duration_ms = plan.duration().as_millis() as u64,
            extra_turns = plan.extra_turns(),
            "spin started"
        );

        let session = SpinSession::start(plan, self.clock.now());
        let current = std::mem::take(&mut self.state.wheel);
        self.state.wheel = StateMachine::process_event(current, StateEvent::SpinStarted(session));
        self.cue(|audio| audio.play_spin_start());

        self.frame_requested = true;
        self.on_frame();
        SpinStatus::Started { winner_index }
    }

    /// Runs one animation frame if one was requested
    ///
    /// # Returns
    /// true if another frame is wanted
    pub fn on_frame(&mut self) -> bool {
        if !self.frame_requested {
            return false;
        }
        self.frame_requested = false;

        let now = self.clock.now();
        let Some(session) = self.state.wheel.session_mut() else {
            return false;
        };
        let frame = session.frame(now);
        let planned_winner = session.plan().winner_index();

        self.state.rotation = frame.rotation;
        if frame.tick {
            tracing::trace!(segment = ?frame.segment, "tick");
            self.cue(|audio| audio.play_tick());
        }
        self.renderer
            .draw_wheel(self.state.entries.as_slice(), self.state.rotation);

        if frame.finished {
            self.finish_spin(frame.segment, planned_winner, now);
        } else {
            self.frame_requested = true;
        }
        self.frame_requested
    }

    fn finish_spin(&mut self, segment: Option<usize>, planned_winner: usize, now: Duration) {
        let current = std::mem::take(&mut self.state.wheel);
        self.state.wheel = StateMachine::process_event(current, StateEvent::SpinFinished);
        self.cue(|audio| audio.stop_spin());

        debug_assert_eq!(segment, Some(planned_winner));
        let Some(winner) = segment
            .and_then(|index| self.state.entries.get(index))
            .map(str::to_owned)
        else {
            tracing::error!(?segment, planned_winner, "spin ended on no entry");
            return;
        };

        tracing::info!(%winner, index = planned_winner, "winner determined");
        self.state.winner = Some(winner.clone());
        self.state.winner_modal_open = true;
        self.renderer.show_winner(&winner);
        self.cue(|audio| audio.play_applause());

        if !self.state.keep_winners {
            let due = now + self.config.removal_delay();
            tracing::debug!(%winner, due_ms = due.as_millis() as u64, "auto-removal scheduled");
            self.timers.schedule(due, TimerAction::RemoveWinner(winner));
        }
    }

    /// Fires deferred actions that are due
    ///
    /// Actions that come due during a spin wait until it completes, so the
    /// wheel never loses a slice mid-animation. A removal takes out the
    /// name it was scheduled for and clears the winner only if that name
    /// is still the winner.
    ///
    /// # Returns
    /// Number of actions fired
    pub fn run_due_timers(&mut self) -> usize {
        if self.state.is_spinning() {
            return 0;
        }

        let due = self.timers.take_due(self.clock.now());
        let fired = due.len();
        for action in due {
            match action {
                TimerAction::RemoveWinner(name) => self.remove_past_winner(&name),
            }
        }
        fired
    }

    /// One host tick: a pending frame, then due timers
    ///
    /// # Returns
    /// true while more work is outstanding
    pub fn pump(&mut self) -> bool {
        self.on_frame();
        self.run_due_timers();
        self.is_busy()
    }

    /// Pumps until idle, sleeping through `wait` between ticks
    ///
    /// `wait` receives the suggested pause; hosts pass a real sleep, tests
    /// pass a clock advance.
    pub fn run_until_idle(&mut self, interval: Duration, mut wait: impl FnMut(Duration)) {
        while self.pump() {
            let pause = if self.frame_requested {
                interval
            } else {
                self.timers
                    .next_due()
                    .map_or(interval, |due| due.saturating_sub(self.clock.now()).max(interval))
            };
            wait(pause);
        }
    }

    // ---------------------------------------------------------------
    // Group partitioner
    // ---------------------------------------------------------------

    /// Builds a fresh group set from the current entries
    pub fn generate_groups(
        &mut self,
        count_hint: Option<usize>,
        size_hint: Option<usize>,
    ) -> Result<&GroupSet, AppError> {
        let set = match groups::partition_with_default(
            self.state.entries.as_slice(),
            count_hint,
            size_hint,
            self.config.default_group_count,
            &mut self.rng,
        ) {
            Ok(set) => set,
            Err(e) => return self.reject(e.into()),
        };

        tracing::info!(groups = set.len(), members = set.member_count(), "groups generated");
        self.state.group_hints = GroupHints {
            count: count_hint,
            size: size_hint,
        };
        self.renderer.show_groups(&set);
        self.cue(|audio| audio.play_success());
        Ok(self.state.groups.insert(set))
    }

    /// Same as `generate_groups` with raw form field text
    pub fn generate_groups_from_form(
        &mut self,
        count_field: &str,
        size_field: &str,
    ) -> Result<&GroupSet, AppError> {
        self.generate_groups(groups::parse_hint(count_field), groups::parse_hint(size_field))
    }

    /// Reshuffles using the hints of the last generation
    pub fn regenerate_groups(&mut self) -> Result<&GroupSet, AppError> {
        let GroupHints { count, size } = self.state.group_hints;
        self.generate_groups(count, size)
    }

    /// Exports the current groups as `groups.txt`
    pub fn download_groups(&mut self) -> Result<(), AppError> {
        let Some(text) = self.state.groups.as_ref().map(GroupSet::to_text) else {
            return self.reject(GroupError::NoGroups { action: "download" }.into());
        };
        if let Err(e) = self.files.export_text(GROUPS_FILENAME, &text) {
            return self.reject(e.into());
        }
        Ok(())
    }

    /// Copies the current groups to the clipboard
    pub fn copy_groups(&mut self) -> Result<(), AppError> {
        let Some(text) = self.state.groups.as_ref().map(GroupSet::to_text) else {
            return self.reject(GroupError::NoGroups { action: "copy" }.into());
        };
        match self.files.copy_to_clipboard(&text) {
            Ok(()) => {
                self.notifier.info(COPIED_MESSAGE);
                Ok(())
            }
            Err(e) => self.reject(AppError::CopyFailed(e)),
        }
    }

    // ---------------------------------------------------------------
    // Modes, modal and keyboard
    // ---------------------------------------------------------------

    pub fn switch_mode(&mut self, mode: Mode) {
        if self.state.mode != mode {
            tracing::debug!(?mode, "mode switched");
            self.state.mode = mode;
        }
    }

    pub fn close_winner_modal(&mut self) {
        self.state.winner_modal_open = false;
    }

    /// Handles a key press
    ///
    /// # Returns
    /// The shortcut that fired, if any
    pub fn handle_key(&mut self, key: Key, focus: Focus) -> Option<Shortcut> {
        let shortcut = shortcuts::resolve(key, focus, self.state.mode, self.state.is_spinning())?;
        match shortcut {
            Shortcut::Spin => {
                // Rejections are already reported through the notifier
                let _ = self.spin();
            }
            Shortcut::CloseModal => self.close_winner_modal(),
        }
        Some(shortcut)
    }

    // ---------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------

    fn ensure_idle(&mut self) -> Result<(), AppError> {
        if self.state.is_spinning() {
            return self.reject(AppError::Busy);
        }
        Ok(())
    }

    fn reject<T>(&mut self, error: AppError) -> Result<T, AppError> {
        tracing::warn!(%error, "action rejected");
        self.notifier.warn(&error.to_string());
        Err(error)
    }

    fn redraw(&mut self) {
        if self.state.entries.is_empty() {
            self.renderer.draw_placeholder();
        } else {
            self.renderer
                .draw_wheel(self.state.entries.as_slice(), self.state.rotation);
        }
    }

    fn cue(&mut self, play: impl FnOnce(&mut dyn AudioCue) -> Result<(), CueError>) {
        if let Err(e) = play(&mut *self.audio) {
            tracing::debug!(error = %e, "audio cue ignored");
        }
    }
}

impl<C: Clock, G: Rng> std::fmt::Debug for WheelController<C, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WheelController")
            .field("state", &self.state)
            .field("pending_timers", &self.timers.len())
            .field("frame_requested", &self.frame_requested)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualClock;
    use crate::platform::recording::{
        Cue, MemoryFiles, RecordingCue, RecordingNotifier, RecordingRenderer,
    };
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Harness {
        controller: WheelController<ManualClock, StdRng>,
        clock: ManualClock,
        renderer: RecordingRenderer,
        audio: RecordingCue,
        notifier: RecordingNotifier,
        files: MemoryFiles,
    }

    fn harness_with(config: WheelConfig, audio: RecordingCue) -> Harness {
        let clock = ManualClock::new();
        let renderer = RecordingRenderer::new();
        let notifier = RecordingNotifier::new();
        let files = MemoryFiles::new();

        let controller = WheelController::new(
            config,
            clock.clone(),
            StdRng::seed_from_u64(2024),
            Collaborators {
                renderer: Box::new(renderer.clone()),
                audio: Box::new(audio.clone()),
                notifier: Box::new(notifier.clone()),
                files: Box::new(files.clone()),
            },
        )
        .unwrap();

        Harness {
            controller,
            clock,
            renderer,
            audio,
            notifier,
            files,
        }
    }

    fn harness() -> Harness {
        harness_with(WheelConfig::default(), RecordingCue::new())
    }

    impl Harness {
        fn finish_spin(&mut self) {
            let clock = self.clock.clone();
            while self.controller.is_spinning() {
                clock.advance_ms(16);
                self.controller.pump();
            }
        }
    }

    #[test]
    fn new_controller_draws_placeholder() {
        let h = harness();
        assert_eq!(h.renderer.placeholder_count(), 1);
        assert!(!h.controller.is_busy());
    }

    #[test]
    fn set_entries_parses_and_redraws() {
        let mut h = harness();
        assert_eq!(h.controller.set_entries("a\n\nb \n c\n").unwrap(), 3);
        assert_eq!(h.controller.entries().as_slice(), ["a", "b", "c"]);
        assert_eq!(h.renderer.last_entry_count(), Some(3));
        assert_eq!(h.audio.count(Cue::Success), 1);
    }

    #[test]
    fn blank_input_warns_and_keeps_previous_entries() {
        let mut h = harness();
        h.controller.set_entries("Alice\nBob").unwrap();

        assert!(matches!(
            h.controller.set_entries("   \n"),
            Err(AppError::Entry(EntryError::EmptyInput))
        ));
        assert_eq!(h.controller.entries().len(), 2);
        assert_eq!(h.notifier.warnings(), ["Please enter some names first!"]);
    }

    #[test]
    fn spin_on_empty_list_warns_and_stays_idle() {
        let mut h = harness();
        assert!(matches!(
            h.controller.spin(),
            Err(AppError::Spin(SpinError::NoEntries))
        ));
        assert!(!h.controller.is_spinning());
        assert_eq!(h.notifier.warnings(), ["Please add some entries first!"]);
        assert_eq!(h.audio.count(Cue::SpinStart), 0);
    }

    #[test]
    fn second_spin_is_a_noop() {
        let mut h = harness();
        h.controller.set_entries("Alice\nBob\nCarol").unwrap();

        let SpinStatus::Started { winner_index } = h.controller.spin().unwrap() else {
            panic!("spin did not start");
        };
        let before = h.controller.state().wheel.clone();

        assert_eq!(h.controller.spin().unwrap(), SpinStatus::AlreadySpinning);
        assert_eq!(h.controller.state().wheel, before);
        assert_eq!(h.audio.count(Cue::SpinStart), 1);
        assert!(winner_index < 3);
    }

    #[test]
    fn spin_reports_planned_winner_after_animation() {
        let mut h = harness();
        h.controller.set_entries("Alice\nBob\nCarol\nDan").unwrap();

        let SpinStatus::Started { winner_index } = h.controller.spin().unwrap() else {
            panic!("spin did not start");
        };
        assert!(h.controller.winner().is_none());

        h.finish_spin();

        let expected = h.controller.entries().get(winner_index).unwrap().to_owned();
        assert_eq!(h.controller.winner(), Some(expected.as_str()));
        assert_eq!(h.renderer.winners(), [expected]);
        assert!(h.controller.state().winner_modal_open);
        assert_eq!(h.audio.count(Cue::Applause), 1);
        assert_eq!(h.audio.count(Cue::StopSpin), 1);
    }

    #[test]
    fn winner_is_not_reported_before_duration_elapses() {
        let mut h = harness();
        h.controller.set_entries("Alice\nBob").unwrap();
        h.controller.spin().unwrap();

        h.clock.advance_ms(4999);
        h.controller.pump();
        assert!(h.controller.is_spinning());
        assert!(h.controller.winner().is_none());
    }

    #[test]
    fn entry_edits_are_refused_while_spinning() {
        let mut h = harness();
        h.controller.set_entries("Alice\nBob").unwrap();
        h.controller.spin().unwrap();

        assert!(matches!(h.controller.set_entries("Zed"), Err(AppError::Busy)));
        assert!(matches!(h.controller.shuffle_entries(), Err(AppError::Busy)));
        assert_eq!(h.controller.entries().as_slice(), ["Alice", "Bob"]);
    }

    #[test]
    fn ticks_play_once_per_segment_crossing() {
        let mut h = harness();
        h.controller.set_entries("a\nb\nc\nd\ne\nf").unwrap();
        h.controller.spin().unwrap();
        h.finish_spin();

        // At least five full turns across six slices
        assert!(h.audio.count(Cue::Tick) >= 5 * 6);
    }

    #[test]
    fn audio_failures_are_ignored() {
        let mut h = harness_with(WheelConfig::default(), RecordingCue::failing());
        h.controller.set_entries("Alice\nBob").unwrap();
        h.controller.spin().unwrap();
        h.finish_spin();

        assert!(h.controller.winner().is_some());
        assert!(h.notifier.warnings().is_empty());
        assert_eq!(h.audio.count(Cue::Applause), 1);
    }

    #[test]
    fn winner_is_removed_after_delay_when_not_kept() {
        let config = WheelConfig {
            keep_winners: false,
            ..WheelConfig::default()
        };
        let mut h = harness_with(config, RecordingCue::new());
        h.controller.set_entries("Alice\nBob\nCarol").unwrap();
        h.controller.spin().unwrap();
        h.finish_spin();

        let winner = h.controller.winner().unwrap().to_owned();
        assert!(h.controller.is_busy());

        h.clock.advance_ms(2999);
        h.controller.pump();
        assert!(h.controller.entries().contains(&winner));

        h.clock.advance_ms(1);
        h.controller.pump();
        assert!(!h.controller.entries().contains(&winner));
        assert!(h.controller.winner().is_none());
        assert!(!h.controller.is_busy());
    }

    #[test]
    fn kept_winner_stays_on_wheel() {
        let mut h = harness();
        h.controller.set_entries("Alice\nBob").unwrap();
        h.controller.spin().unwrap();
        h.finish_spin();

        h.clock.advance_ms(10_000);
        h.controller.pump();
        assert_eq!(h.controller.entries().len(), 2);
        assert!(h.controller.winner().is_some());
    }

    #[test]
    fn manual_removal_cancels_pending_timer() {
        let config = WheelConfig {
            keep_winners: false,
            ..WheelConfig::default()
        };
        let mut h = harness_with(config, RecordingCue::new());
        h.controller.set_entries("Ann\nAnn\nBo").unwrap();
        let plan = SpinPlan::new(0, 3, Duration::from_millis(5000), 5, 0.0).unwrap();
        h.controller.spin_with_plan(plan).unwrap();
        h.finish_spin();

        h.controller.remove_winner().unwrap();
        assert_eq!(h.controller.entries().as_slice(), ["Ann", "Bo"]);
        assert!(h.controller.next_timer_due().is_none());

        h.clock.advance_ms(5000);
        h.controller.pump();
        assert_eq!(h.controller.entries().as_slice(), ["Ann", "Bo"]);
    }

    #[test]
    fn spin_with_mismatched_plan_is_rejected() {
        let mut h = harness();
        h.controller.set_entries("a\nb").unwrap();
        let plan = SpinPlan::new(2, 3, Duration::from_millis(5000), 5, 0.0).unwrap();

        assert!(matches!(
            h.controller.spin_with_plan(plan),
            Err(AppError::Spin(SpinError::WinnerOutOfRange { index: 2, count: 2 }))
        ));
        assert!(!h.controller.is_spinning());
    }

    #[test]
    fn plan_from_a_stale_rotation_is_rejected() {
        let mut h = harness();
        h.controller.set_entries("a\nb\nc").unwrap();
        h.controller.spin().unwrap();
        h.finish_spin();

        let rotation = h.controller.state().rotation;
        assert!(rotation > 0.0);
        let draws = h.renderer.frame_count();

        let stale = SpinPlan::new(0, 3, Duration::from_millis(5000), 5, 0.0).unwrap();
        assert!(matches!(
            h.controller.spin_with_plan(stale),
            Err(AppError::Spin(SpinError::StartMismatch))
        ));
        assert!(!h.controller.is_spinning());
        assert_eq!(h.controller.state().rotation, rotation);
        assert_eq!(h.renderer.frame_count(), draws);

        // A plan from where the wheel rests is accepted
        let fresh = SpinPlan::new(0, 3, Duration::from_millis(5000), 5, rotation).unwrap();
        assert_eq!(
            h.controller.spin_with_plan(fresh).unwrap(),
            SpinStatus::Started { winner_index: 0 }
        );
    }

    #[test]
    fn new_rejects_inverted_spin_range() {
        let config = WheelConfig {
            min_spin_ms: 9000,
            max_spin_ms: 5000,
            ..WheelConfig::default()
        };
        let renderer = RecordingRenderer::new();
        let result = WheelController::new(
            config,
            ManualClock::new(),
            StdRng::seed_from_u64(1),
            Collaborators {
                renderer: Box::new(renderer.clone()),
                audio: Box::new(RecordingCue::new()),
                notifier: Box::new(RecordingNotifier::new()),
                files: Box::new(MemoryFiles::new()),
            },
        );

        assert!(matches!(
            result,
            Err(ConfigError::InvalidRange { min: 9000, max: 5000, .. })
        ));
        assert_eq!(renderer.placeholder_count(), 0);
    }

    #[test]
    fn remove_winner_without_winner_warns() {
        let mut h = harness();
        h.controller.set_entries("Alice").unwrap();
        assert!(matches!(
            h.controller.remove_winner(),
            Err(AppError::Entry(EntryError::NoWinner))
        ));
        assert_eq!(h.notifier.warnings(), ["No winner to remove!"]);
    }

    #[test]
    fn clear_requires_confirmation() {
        let mut h = harness();
        h.controller.set_entries("Alice\nBob").unwrap();

        h.notifier.set_confirm_answer(false);
        assert!(!h.controller.clear_all().unwrap());
        assert_eq!(h.controller.entries().len(), 2);

        h.notifier.set_confirm_answer(true);
        assert!(h.controller.clear_all().unwrap());
        assert!(h.controller.entries().is_empty());
        assert_eq!(h.notifier.confirmations().len(), 2);
        assert_eq!(h.renderer.placeholder_count(), 2);
    }

    #[test]
    fn shuffle_empty_list_warns() {
        let mut h = harness();
        assert!(h.controller.shuffle_entries().is_err());
        assert_eq!(h.notifier.warnings(), ["No entries to shuffle!"]);
    }

    #[test]
    fn save_and_load_round_trip_through_files() {
        let mut h = harness();
        h.controller.set_entries("Alice\n  Bob  ").unwrap();
        h.controller.save_list().unwrap();
        assert_eq!(
            h.files.exports(),
            [(ENTRIES_FILENAME.to_owned(), "Alice\nBob".to_owned())]
        );

        h.files.set_import("Zed\nYara\n");
        assert_eq!(h.controller.load_list().unwrap(), 2);
        assert_eq!(h.controller.entries().as_slice(), ["Zed", "Yara"]);
    }

    #[test]
    fn save_empty_list_warns() {
        let mut h = harness();
        assert!(h.controller.save_list().is_err());
        assert_eq!(h.notifier.warnings(), ["No entries to save!"]);
        assert!(h.files.exports().is_empty());
    }

    #[test]
    fn groups_cover_every_entry() {
        let mut h = harness();
        h.controller.set_entries("a\nb\nc\nd\ne\nf\ng").unwrap();

        let set = h.controller.generate_groups(None, Some(3)).unwrap().clone();
        assert_eq!(set.len(), 3);
        assert_eq!(set.member_count(), 7);
        assert_eq!(h.renderer.shown_groups(), [set]);
    }

    #[test]
    fn groups_need_two_names() {
        let mut h = harness();
        h.controller.set_entries("solo").unwrap();
        assert!(h.controller.generate_groups(Some(2), None).is_err());
        assert_eq!(
            h.notifier.warnings(),
            ["You need at least 2 names to create groups!"]
        );
        assert!(h.controller.state().groups.is_none());
    }

    #[test]
    fn regenerate_reuses_last_hints() {
        let mut h = harness();
        h.controller.set_entries("a\nb\nc\nd\ne\nf").unwrap();
        h.controller.generate_groups_from_form("2", "").unwrap();

        let again = h.controller.regenerate_groups().unwrap();
        assert_eq!(again.len(), 2);
    }

    #[test]
    fn download_and_copy_need_groups() {
        let mut h = harness();
        assert!(h.controller.download_groups().is_err());
        assert!(h.controller.copy_groups().is_err());
        assert_eq!(
            h.notifier.warnings(),
            ["No groups to download!", "No groups to copy!"]
        );
    }

    #[test]
    fn copy_reports_success_and_failure() {
        let mut h = harness();
        h.controller.set_entries("a\nb\nc").unwrap();
        h.controller.generate_groups(Some(1), None).unwrap();

        h.controller.copy_groups().unwrap();
        assert_eq!(h.notifier.infos(), ["Groups copied to clipboard!"]);
        assert!(h.files.clipboard().unwrap().starts_with("Group 1:\n"));

        h.files.break_clipboard();
        assert!(matches!(h.controller.copy_groups(), Err(AppError::CopyFailed(_))));
        assert_eq!(h.notifier.warnings(), ["Failed to copy. Please try again."]);
    }

    #[test]
    fn download_exports_group_text() {
        let mut h = harness();
        h.controller.set_entries("a\nb").unwrap();
        h.controller.generate_groups(Some(2), None).unwrap();
        h.controller.download_groups().unwrap();

        let exports = h.files.exports();
        assert_eq!(exports.len(), 1);
        assert_eq!(exports[0].0, GROUPS_FILENAME);
        assert!(exports[0].1.contains("Group 2:\n"));
    }

    #[test]
    fn space_spins_and_escape_closes_modal() {
        let mut h = harness();
        h.controller.set_entries("Alice\nBob").unwrap();

        assert_eq!(h.controller.handle_key(Key::Space, Focus::TextInput), None);
        assert!(!h.controller.is_spinning());

        assert_eq!(
            h.controller.handle_key(Key::Space, Focus::Page),
            Some(Shortcut::Spin)
        );
        assert!(h.controller.is_spinning());
        h.finish_spin();
        assert!(h.controller.state().winner_modal_open);

        h.controller.handle_key(Key::Escape, Focus::Page);
        assert!(!h.controller.state().winner_modal_open);
    }

    #[test]
    fn space_does_nothing_in_group_mode() {
        let mut h = harness();
        h.controller.set_entries("Alice\nBob").unwrap();
        h.controller.switch_mode(Mode::Groups);

        assert_eq!(h.controller.handle_key(Key::Space, Focus::Page), None);
        assert!(!h.controller.is_spinning());
    }

    #[test]
    fn run_until_idle_drives_spin_and_removal() {
        let config = WheelConfig {
            keep_winners: false,
            ..WheelConfig::default()
        };
        let mut h = harness_with(config, RecordingCue::new());
        h.controller.set_entries("Alice\nBob\nCarol").unwrap();
        h.controller.spin().unwrap();

        let clock = h.clock.clone();
        h.controller
            .run_until_idle(Duration::from_millis(16), |pause| clock.advance(pause));

        assert!(!h.controller.is_busy());
        assert_eq!(h.controller.entries().len(), 2);
        assert!(h.controller.winner().is_none());
    }
}

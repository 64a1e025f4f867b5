//! Terminal stand-ins for alerts and sound effects

use std::io::{self, BufRead, Write};

use crate::platform::ports::{AudioCue, CueError, Notifier};

/// Prints warnings to stderr and asks confirmations on stdin
#[derive(Debug, Clone, Default)]
pub struct TerminalNotifier {
    assume_yes: bool,
}

impl TerminalNotifier {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Notifier for TerminalNotifier {
    fn warn(&mut self, message: &str) {
        tracing::warn!(%message, "user warning");
        eprintln!("warning: {message}");
    }

    fn info(&mut self, message: &str) {
        println!("{message}");
    }

    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{message} [y/N] ");
        let _ = io::stderr().flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"),
            Err(e) => {
                tracing::debug!(error = %e, "confirmation read failed");
                false
            }
        }
    }
}

/// Renders sound cues as terminal output
///
/// Ticks print a dot, applause rings the bell. Output goes to stderr so the
/// winner line on stdout stays clean for scripting.
#[derive(Debug, Clone, Default)]
pub struct TerminalCue {
    quiet: bool,
}

impl TerminalCue {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn emit(&self, cue: &'static str, text: &str) -> Result<(), CueError> {
        if self.quiet {
            return Ok(());
        }

        let mut stderr = io::stderr().lock();
        stderr
            .write_all(text.as_bytes())
            .and_then(|()| stderr.flush())
            .map_err(|e| CueError {
                cue,
                reason: e.to_string(),
            })
    }
}

impl AudioCue for TerminalCue {
    fn play_tick(&mut self) -> Result<(), CueError> {
        self.emit("tick", ".")
    }

    fn play_spin_start(&mut self) -> Result<(), CueError> {
        self.emit("spin-start", "spinning ")
    }

    fn play_applause(&mut self) -> Result<(), CueError> {
        self.emit("applause", "\x07")
    }

    fn play_success(&mut self) -> Result<(), CueError> {
        Ok(())
    }

    fn stop_spin(&mut self) -> Result<(), CueError> {
        self.emit("spin-stop", "\n")
    }
}

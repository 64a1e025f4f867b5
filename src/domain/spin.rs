//! Spin planning and per-frame animation state
//!
//! A spin is decided entirely up front: the winner, the duration and the
//! number of extra turns are drawn when the spin starts, and the forward
//! rotation is derived so the pointer ends on the winner's slice midpoint.
//! Frames then only interpolate along the eased curve.

use std::time::Duration;

use rand::Rng;

use crate::domain::geometry::{ease_out_cubic, forward_rotation, segment_at_pointer, slice_midpoint};

/// Errors that can occur while planning a spin
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpinError {
    /// Nothing to spin
    #[error("Please add some entries first!")]
    NoEntries,

    /// Winner index outside the entry list
    #[error("Winner index {index} is out of range for {count} entries")]
    WinnerOutOfRange { index: usize, count: usize },

    /// Spin duration must be positive
    #[error("Spin duration must be greater than zero")]
    ZeroDuration,

    /// Duration or turn range is empty
    #[error("Invalid spin limits: {field} minimum {min} exceeds maximum {max}")]
    InvalidLimits {
        field: &'static str,
        min: u64,
        max: u64,
    },

    /// Plan was built for a different wheel position
    #[error("Spin plan starts at a different rotation than the wheel")]
    StartMismatch,
}

/// Ranges a spin draws its duration and extra turns from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinLimits {
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
    pub min_extra_turns: u32,
    pub max_extra_turns: u32,
}

impl SpinLimits {
    pub const DEFAULT_MIN_DURATION_MS: u64 = 5000;
    pub const DEFAULT_MAX_DURATION_MS: u64 = 8000;
    pub const DEFAULT_MIN_EXTRA_TURNS: u32 = 5;
    pub const DEFAULT_MAX_EXTRA_TURNS: u32 = 10;

    /// Checks both ranges are non-empty and the duration is positive
    pub fn validate(&self) -> Result<(), SpinError> {
        if self.min_duration_ms > self.max_duration_ms {
            return Err(SpinError::InvalidLimits {
                field: "duration_ms",
                min: self.min_duration_ms,
                max: self.max_duration_ms,
            });
        }
        if self.max_duration_ms == 0 {
            return Err(SpinError::ZeroDuration);
        }
        if self.min_extra_turns > self.max_extra_turns {
            return Err(SpinError::InvalidLimits {
                field: "extra_turns",
                min: u64::from(self.min_extra_turns),
                max: u64::from(self.max_extra_turns),
            });
        }
        Ok(())
    }
}

impl Default for SpinLimits {
    fn default() -> Self {
        Self {
            min_duration_ms: Self::DEFAULT_MIN_DURATION_MS,
            max_duration_ms: Self::DEFAULT_MAX_DURATION_MS,
            min_extra_turns: Self::DEFAULT_MIN_EXTRA_TURNS,
            max_extra_turns: Self::DEFAULT_MAX_EXTRA_TURNS,
        }
    }
}

/// Everything decided at the moment a spin starts
#[derive(Debug, Clone, PartialEq)]
pub struct SpinPlan {
    winner_index: usize,
    entry_count: usize,
    duration: Duration,
    extra_turns: u32,
    start_rotation: f64,
    forward: f64,
}

impl SpinPlan {
    /// Builds a plan for a known winner
    ///
    /// # Arguments
    /// * `winner_index` - Slice the wheel must stop on
    /// * `entry_count` - Number of slices on the wheel
    /// * `duration` - Animation length
    /// * `extra_turns` - Full revolutions before settling
    /// * `start_rotation` - Wheel rotation when the spin starts
    pub fn new(
        winner_index: usize,
        entry_count: usize,
        duration: Duration,
        extra_turns: u32,
        start_rotation: f64,
    ) -> Result<Self, SpinError> {
        if entry_count == 0 {
            return Err(SpinError::NoEntries);
        }
        if winner_index >= entry_count {
            return Err(SpinError::WinnerOutOfRange {
                index: winner_index,
                count: entry_count,
            });
        }
        if duration.is_zero() {
            return Err(SpinError::ZeroDuration);
        }

        let target = slice_midpoint(winner_index, entry_count);
        let forward = forward_rotation(start_rotation, target, extra_turns);

        Ok(Self {
            winner_index,
            entry_count,
            duration,
            extra_turns,
            start_rotation,
            forward,
        })
    }

    /// Draws winner, duration and extra turns uniformly at random
    pub fn random<R: Rng + ?Sized>(
        entry_count: usize,
        start_rotation: f64,
        limits: &SpinLimits,
        rng: &mut R,
    ) -> Result<Self, SpinError> {
        if entry_count == 0 {
            return Err(SpinError::NoEntries);
        }
        limits.validate()?;

        let winner_index = rng.random_range(0..entry_count);
        let duration_ms = rng.random_range(limits.min_duration_ms..=limits.max_duration_ms);
        let extra_turns = rng.random_range(limits.min_extra_turns..=limits.max_extra_turns);

        Self::new(
            winner_index,
            entry_count,
            Duration::from_millis(duration_ms),
            extra_turns,
            start_rotation,
        )
    }

    pub fn winner_index(&self) -> usize {
        self.winner_index
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn extra_turns(&self) -> u32 {
        self.extra_turns
    }

    pub fn start_rotation(&self) -> f64 {
        self.start_rotation
    }

    /// Total forward rotation applied over the whole animation
    pub fn forward_rotation(&self) -> f64 {
        self.forward
    }

    /// Midpoint of the winner's slice at zero rotation
    pub fn target_angle(&self) -> f64 {
        slice_midpoint(self.winner_index, self.entry_count)
    }

    /// Absolute rotation the wheel rests at when the spin ends
    pub fn final_rotation(&self) -> f64 {
        self.start_rotation + self.forward
    }

    /// Absolute rotation at linear `progress` in `[0, 1]`
    pub fn rotation_at(&self, progress: f64) -> f64 {
        self.start_rotation + self.forward * ease_out_cubic(progress)
    }
}

/// One animation step computed from the clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinFrame {
    /// Absolute wheel rotation to display
    pub rotation: f64,
    /// Linear progress in `[0, 1]`
    pub progress: f64,
    /// Slice currently under the pointer
    pub segment: Option<usize>,
    /// True when the pointer entered a new slice on this frame
    pub tick: bool,
    /// True on the final frame
    pub finished: bool,
}

/// Live state of a spin between start and completion
#[derive(Debug, Clone, PartialEq)]
pub struct SpinSession {
    plan: SpinPlan,
    started_at: Duration,
    last_segment: Option<usize>,
}

impl SpinSession {
    /// Starts a session at clock time `now`
    pub fn start(plan: SpinPlan, now: Duration) -> Self {
        Self {
            plan,
            started_at: now,
            last_segment: None,
        }
    }

    pub fn plan(&self) -> &SpinPlan {
        &self.plan
    }

    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    pub fn last_segment(&self) -> Option<usize> {
        self.last_segment
    }

    /// Advances the animation to clock time `now`
    ///
    /// Records the slice under the pointer and flags a tick the first time
    /// each new slice is reached.
    pub fn frame(&mut self, now: Duration) -> SpinFrame {
        let elapsed = now.saturating_sub(self.started_at);
        let progress = (elapsed.as_secs_f64() / self.plan.duration.as_secs_f64()).min(1.0);
        let finished = progress >= 1.0;

        let rotation = if finished {
            self.plan.final_rotation()
        } else {
            self.plan.rotation_at(progress)
        };

        let segment = segment_at_pointer(rotation, self.plan.entry_count);
        let tick = segment.is_some() && segment != self.last_segment;
        if tick {
            self.last_segment = segment;
        }

        SpinFrame {
            rotation,
            progress,
            segment,
            tick,
            finished,
        }
    }
}

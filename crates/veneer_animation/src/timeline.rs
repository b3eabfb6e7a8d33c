//! Scheduled timelines
//!
//! The two kinds of entries an [`AnimationScheduler`](crate::AnimationScheduler)
//! advances each frame:
//!
//! - [`PhaseTimeline`] holds an index into an ordered list of phases and moves
//!   it forward after each phase's hold duration.
//! - [`Clock`] accumulates elapsed time for keyframe timelines and symbol
//!   effects, either stopping at a fixed end or wrapping around a period.

use smallvec::SmallVec;

use crate::animation::DEFAULT_PHASE_DURATION_MS;

/// Whether a sequence repeats or plays through once
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Loop forever, wrapping back to the start
    #[default]
    Continuous,
    /// Play from the start to the end, then hold the end
    Once,
}

// ============================================================================
// Phase Timeline
// ============================================================================

/// Index-advancing timeline over a list of phase hold durations
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseTimeline {
    durations: SmallVec<[f32; 8]>,
    mode: PlaybackMode,
    index: usize,
    elapsed_ms: f32,
    finished: bool,
}

impl PhaseTimeline {
    /// Create a timeline holding phase `i` for `durations[i]` milliseconds
    ///
    /// Non-positive or non-finite durations are replaced with the default hold
    /// time so a timeline can never spin without advancing the clock.
    pub fn new(durations: impl IntoIterator<Item = f32>, mode: PlaybackMode) -> Self {
        let durations: SmallVec<[f32; 8]> = durations
            .into_iter()
            .map(|d| {
                if d.is_finite() && d > 0.0 {
                    d
                } else {
                    tracing::warn!(duration_ms = d, "invalid phase duration, using default");
                    DEFAULT_PHASE_DURATION_MS
                }
            })
            .collect();
        let mut timeline = Self {
            durations,
            mode,
            index: 0,
            elapsed_ms: 0.0,
            finished: false,
        };
        timeline.restart();
        timeline
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Index of the phase currently displayed
    pub fn index(&self) -> usize {
        self.index
    }

    /// Time spent in the current phase
    pub fn elapsed_in_phase_ms(&self) -> f32 {
        self.elapsed_ms
    }

    /// Sum of all hold durations
    pub fn cycle_duration_ms(&self) -> f32 {
        self.durations.iter().sum()
    }

    /// True until a once-through timeline reaches its last phase
    pub fn is_playing(&self) -> bool {
        !self.finished
    }

    /// Jump back to the first phase and play again
    pub fn restart(&mut self) {
        self.index = 0;
        self.elapsed_ms = 0.0;
        self.finished = self.durations.is_empty()
            || (self.mode == PlaybackMode::Once && self.durations.len() == 1);
    }

    /// Advance the clock by `dt_ms`, moving through as many phases as elapsed
    pub fn advance(&mut self, dt_ms: f32) {
        if self.finished || dt_ms <= 0.0 || !dt_ms.is_finite() {
            return;
        }
        self.elapsed_ms += dt_ms;

        if self.mode == PlaybackMode::Continuous {
            let cycle = self.cycle_duration_ms();
            if self.elapsed_ms >= cycle {
                self.elapsed_ms %= cycle;
            }
        }

        let last = self.durations.len() - 1;
        while self.elapsed_ms >= self.durations[self.index] {
            self.elapsed_ms -= self.durations[self.index];
            match self.mode {
                PlaybackMode::Continuous => {
                    self.index = (self.index + 1) % self.durations.len();
                }
                PlaybackMode::Once => {
                    self.index += 1;
                    if self.index == last {
                        self.elapsed_ms = 0.0;
                        self.finished = true;
                        break;
                    }
                }
            }
        }
    }
}

// ============================================================================
// Clock
// ============================================================================

/// How a clock's elapsed time is bounded
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClockLimit {
    /// Stop at this time
    Finite(f32),
    /// Wrap around this period and never stop
    Periodic(f32),
}

/// Elapsed-time accumulator for keyframe timelines and effects
#[derive(Clone, Debug, PartialEq)]
pub struct Clock {
    elapsed_ms: f32,
    limit: ClockLimit,
    playing: bool,
}

impl Clock {
    /// A running clock with the given limit
    pub fn new(limit: ClockLimit) -> Self {
        let mut clock = Self::idle(limit);
        clock.restart();
        clock
    }

    /// A clock that stops after `duration_ms`
    pub fn once(duration_ms: f32) -> Self {
        Self::new(ClockLimit::Finite(duration_ms))
    }

    /// A clock that wraps every `period_ms`
    pub fn looping(period_ms: f32) -> Self {
        Self::new(ClockLimit::Periodic(period_ms))
    }

    /// A clock parked at zero until restarted
    pub fn idle(limit: ClockLimit) -> Self {
        Self {
            elapsed_ms: 0.0,
            limit,
            playing: false,
        }
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    pub fn limit(&self) -> ClockLimit {
        self.limit
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Reset to zero and start running
    pub fn restart(&mut self) {
        self.elapsed_ms = 0.0;
        self.playing = match self.limit {
            ClockLimit::Finite(d) => d > 0.0,
            ClockLimit::Periodic(_) => true,
        };
    }

    /// Advance by `dt_ms`
    pub fn advance(&mut self, dt_ms: f32) {
        if !self.playing || dt_ms <= 0.0 || !dt_ms.is_finite() {
            return;
        }
        self.elapsed_ms += dt_ms;
        match self.limit {
            ClockLimit::Finite(duration) => {
                if self.elapsed_ms >= duration {
                    self.elapsed_ms = duration;
                    self.playing = false;
                }
            }
            ClockLimit::Periodic(period) => {
                if period > 0.0 && self.elapsed_ms >= period {
                    self.elapsed_ms %= period;
                }
            }
        }
    }
}

//! Animation scheduler
//!
//! Owns every running phase timeline and clock and advances them each frame.
//! Components register their timeline through a [`SchedulerHandle`] and keep
//! the returned id; dropping the component removes the entry, which is how an
//! unmounted animator's pending phase advances are cancelled. Restarting an
//! entry resets it in place, so a component never has two timelines alive.
//!
//! Time advances either from the wall clock (`tick`, or the background thread
//! started with `start_background`) or deterministically (`tick_by`).

use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::config::SchedulerConfig;
use crate::error::{AnimationError, Result};
use crate::timeline::{Clock, PhaseTimeline};

// ============================================================================
// Global Animation Scheduler State
// ============================================================================

/// Global scheduler handle for access from anywhere in the application
static GLOBAL_SCHEDULER: OnceLock<SchedulerHandle> = OnceLock::new();

/// Install the global animation scheduler handle
///
/// Fails if a handle was already installed.
pub fn try_set_global_scheduler(handle: SchedulerHandle) -> Result<()> {
    GLOBAL_SCHEDULER
        .set(handle)
        .map_err(|_| AnimationError::GlobalSchedulerAlreadySet)
}

/// Install the global animation scheduler handle, ignoring repeated calls
pub fn set_global_scheduler(handle: SchedulerHandle) {
    if try_set_global_scheduler(handle).is_err() {
        tracing::warn!("set_global_scheduler() called more than once, keeping the first handle");
    }
}

/// Get the global animation scheduler handle
///
/// # Panics
///
/// Panics if no global scheduler has been installed.
pub fn get_scheduler() -> SchedulerHandle {
    match GLOBAL_SCHEDULER.get() {
        Some(handle) => handle.clone(),
        None => panic!(
            "Animation scheduler not initialized. Call set_global_scheduler() at app startup."
        ),
    }
}

/// Try to get the global scheduler (returns None if not initialized)
pub fn try_get_scheduler() -> Option<SchedulerHandle> {
    GLOBAL_SCHEDULER.get().cloned()
}

/// Check if the global scheduler has been initialized
pub fn is_scheduler_initialized() -> bool {
    GLOBAL_SCHEDULER.get().is_some()
}

new_key_type! {
    /// Handle to a registered phase timeline
    pub struct PhaseTimelineId;
    /// Handle to a registered clock
    pub struct ClockId;
}

/// Snapshot of a phase timeline
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseState {
    pub index: usize,
    pub elapsed_ms: f32,
    pub playing: bool,
}

/// Snapshot of a clock
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClockState {
    pub elapsed_ms: f32,
    pub playing: bool,
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    phases: SlotMap<PhaseTimelineId, PhaseTimeline>,
    clocks: SlotMap<ClockId, Clock>,
    last_frame: Instant,
    config: SchedulerConfig,
}

impl SchedulerInner {
    fn advance(&mut self, dt_ms: f32) -> bool {
        for (_, timeline) in self.phases.iter_mut() {
            timeline.advance(dt_ms);
        }
        for (_, clock) in self.clocks.iter_mut() {
            clock.advance(dt_ms);
        }

        // Finished entries stay registered until their owner drops them so
        // they can be restarted.
        self.has_active()
    }

    fn has_active(&self) -> bool {
        self.phases.iter().any(|(_, t)| t.is_playing())
            || self.clocks.iter().any(|(_, c)| c.is_playing())
    }

    /// Wall-clock delta since the last frame, clamped to the configured maximum
    fn frame_delta_ms(&mut self) -> f32 {
        let now = Instant::now();
        let dt_ms = (now - self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;
        dt_ms.min(self.config.max_frame_delta_ms)
    }
}

fn lock(inner: &Mutex<SchedulerInner>) -> MutexGuard<'_, SchedulerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Callback type for waking up the main thread from the animation thread
///
/// This is called when there are active animations that need to be rendered.
pub type WakeCallback = Arc<dyn Fn() + Send + Sync>;

/// The animation scheduler that ticks all registered timelines
///
/// Held by the application; components receive a [`SchedulerHandle`].
///
/// # Background Thread Mode
///
/// ```ignore
/// let mut scheduler = AnimationScheduler::new();
/// scheduler.set_wake_callback(move || proxy.wake());
/// scheduler.start_background(); // ticks at the configured frame rate
/// ```
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    /// Stop signal for background thread
    stop_flag: Arc<AtomicBool>,
    /// Set by the background thread while timelines are playing
    needs_redraw: Arc<AtomicBool>,
    /// Background thread handle (if running)
    thread_handle: Option<JoinHandle<()>>,
    /// Optional callback to wake up the main thread
    wake_callback: Option<WakeCallback>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Create a scheduler with explicit frame pacing
    ///
    /// An invalid configuration is logged and replaced by the defaults.
    pub fn with_config(config: SchedulerConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                tracing::warn!("{err}; using default scheduler configuration");
                SchedulerConfig::default()
            }
        };
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                phases: SlotMap::with_key(),
                clocks: SlotMap::with_key(),
                last_frame: Instant::now(),
                config,
            })),
            stop_flag: Arc::new(AtomicBool::new(false)),
            needs_redraw: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
            wake_callback: None,
        }
    }

    pub fn config(&self) -> SchedulerConfig {
        lock(&self.inner).config.clone()
    }

    /// Set a wake callback that will be called when animations need a redraw
    ///
    /// Must be set before `start_background()` to take effect.
    pub fn set_wake_callback<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.wake_callback = Some(Arc::new(callback));
    }

    /// Start ticking on a background thread at the configured frame rate
    ///
    /// The thread raises the `needs_redraw` flag (and calls the wake callback)
    /// on every frame in which something is still playing.
    pub fn start_background(&mut self) {
        if self.thread_handle.is_some() {
            return; // Already running
        }

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);
        let needs_redraw = Arc::clone(&self.needs_redraw);
        let wake_callback = self.wake_callback.clone();
        let frame_duration = lock(&self.inner).config.frame_duration();

        tracing::debug!(?frame_duration, "starting animation thread");

        self.thread_handle = Some(thread::spawn(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                let start = Instant::now();

                let has_active = {
                    let mut inner = lock(&inner);
                    let dt_ms = inner.frame_delta_ms();
                    inner.advance(dt_ms)
                };

                if has_active {
                    needs_redraw.store(true, Ordering::Release);
                    if let Some(ref callback) = wake_callback {
                        callback();
                    }
                }

                // Sleep for remaining frame time
                let elapsed = start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        }));
    }

    /// Stop the background thread
    pub fn stop_background(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
            tracing::debug!("animation thread stopped");
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    /// Check if the background thread is running
    pub fn is_background_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Check and clear the needs_redraw flag
    pub fn take_needs_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::Acquire)
    }

    /// Manually request a redraw
    pub fn request_redraw(&self) {
        self.needs_redraw.store(true, Ordering::Release);
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Advance everything by the wall-clock time since the previous frame
    ///
    /// Returns true if anything is still playing.
    pub fn tick(&self) -> bool {
        let mut inner = lock(&self.inner);
        let dt_ms = inner.frame_delta_ms();
        inner.advance(dt_ms)
    }

    /// Advance everything by exactly `dt_ms`
    ///
    /// Returns true if anything is still playing.
    pub fn tick_by(&self, dt_ms: f32) -> bool {
        let mut inner = lock(&self.inner);
        inner.last_frame = Instant::now();
        inner.advance(dt_ms)
    }

    /// Check if anything is still playing
    pub fn has_active_animations(&self) -> bool {
        lock(&self.inner).has_active()
    }

    /// Number of registered phase timelines
    pub fn phase_count(&self) -> usize {
        lock(&self.inner).phases.len()
    }

    /// Number of registered clocks
    pub fn clock_count(&self) -> usize {
        lock(&self.inner).clocks.len()
    }

    /// Number of registered entries of any kind
    pub fn timer_count(&self) -> usize {
        let inner = lock(&self.inner);
        inner.phases.len() + inner.clocks.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        self.stop_background();
    }
}

/// A weak handle to the animation scheduler
///
/// Passed to components that need to register timelines. It won't keep the
/// scheduler alive; every operation is a no-op once the scheduler is gone.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl SchedulerHandle {
    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    fn with_inner<R>(&self, f: impl FnOnce(&mut SchedulerInner) -> R) -> Option<R> {
        self.inner.upgrade().map(|inner| {
            let mut guard = lock(&inner);
            f(&mut guard)
        })
    }

    // =========================================================================
    // Phase Timeline Operations
    // =========================================================================

    /// Register a phase timeline and return its ID
    pub fn register_phases(&self, timeline: PhaseTimeline) -> Option<PhaseTimelineId> {
        self.with_inner(|inner| {
            // Reset last_frame so the first wall-clock tick is not a huge step
            inner.last_frame = Instant::now();
            let phases = timeline.len();
            let id = inner.phases.insert(timeline);
            tracing::debug!(?id, phases, "registered phase timeline");
            id
        })
    }

    /// Reset a phase timeline to its first phase and play it again
    pub fn restart_phases(&self, id: PhaseTimelineId) {
        self.with_inner(|inner| {
            if let Some(timeline) = inner.phases.get_mut(id) {
                timeline.restart();
                tracing::debug!(?id, "restarted phase timeline");
            }
        });
    }

    /// Current state of a phase timeline
    pub fn phase_state(&self, id: PhaseTimelineId) -> Option<PhaseState> {
        self.with_inner(|inner| {
            inner.phases.get(id).map(|t| PhaseState {
                index: t.index(),
                elapsed_ms: t.elapsed_in_phase_ms(),
                playing: t.is_playing(),
            })
        })
        .flatten()
    }

    /// Remove a phase timeline, cancelling any pending advances
    pub fn remove_phases(&self, id: PhaseTimelineId) {
        self.with_inner(|inner| {
            if inner.phases.remove(id).is_some() {
                tracing::debug!(?id, "removed phase timeline");
            }
        });
    }

    // =========================================================================
    // Clock Operations
    // =========================================================================

    /// Register a clock and return its ID
    pub fn register_clock(&self, clock: Clock) -> Option<ClockId> {
        self.with_inner(|inner| {
            inner.last_frame = Instant::now();
            let id = inner.clocks.insert(clock);
            tracing::debug!(?id, "registered clock");
            id
        })
    }

    /// Reset a clock to zero and start it
    pub fn restart_clock(&self, id: ClockId) {
        self.with_inner(|inner| {
            if let Some(clock) = inner.clocks.get_mut(id) {
                clock.restart();
                tracing::trace!(?id, "restarted clock");
            }
        });
    }

    /// Current state of a clock
    pub fn clock_state(&self, id: ClockId) -> Option<ClockState> {
        self.with_inner(|inner| {
            inner.clocks.get(id).map(|c| ClockState {
                elapsed_ms: c.elapsed_ms(),
                playing: c.is_playing(),
            })
        })
        .flatten()
    }

    /// Remove a clock
    pub fn remove_clock(&self, id: ClockId) {
        self.with_inner(|inner| {
            if inner.clocks.remove(id).is_some() {
                tracing::debug!(?id, "removed clock");
            }
        });
    }
}

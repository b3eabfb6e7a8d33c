//! Keyframe tracks
//!
//! A [`KeyframeTrack`] animates one property of a composite value through an
//! ordered list of [`Keyframe`] segments. Each segment interpolates from the
//! previous segment's value (or the track's starting value) to its own value.
//!
//! Tracks are collected into a [`KeyframeTimeline`], which samples all of them
//! at the same instant. Tracks run concurrently and need not share a length:
//! a track that has finished holds its last value while the others continue.
//!
//! ```ignore
//! #[derive(Clone)]
//! struct Badge { scale: f32, offset: Vec2 }
//!
//! let timeline = KeyframeTimeline::new()
//!     .track(
//!         KeyframeTrack::new(|b: &Badge| b.scale, |b, v| b.scale = v)
//!             .spring(1.3, SpringConfig::bouncy())
//!             .linear(1.0, 200.0),
//!     )
//!     .track(
//!         KeyframeTrack::new(|b: &Badge| b.offset, |b, v| b.offset = v)
//!             .move_to(Vec2::new(0.0, -8.0))
//!             .cubic(Vec2::ZERO, 400.0),
//!     );
//! ```

use crate::animation::{spring_progress, DEFAULT_PHASE_DURATION_MS};
use crate::easing::Easing;
use crate::spring::SpringConfig;
use crate::values::Interpolate;

// ============================================================================
// Keyframe
// ============================================================================

/// One segment of a keyframe track
#[derive(Clone, Debug, PartialEq)]
pub enum Keyframe<P> {
    /// Constant-velocity interpolation
    Linear { value: P, duration_ms: f32 },
    /// Interpolation eased by a cubic bezier `[x1, y1, x2, y2]`
    Cubic {
        value: P,
        duration_ms: f32,
        control: [f32; 4],
    },
    /// Damped spring response, retimed to `duration_ms` when given
    Spring {
        value: P,
        config: SpringConfig,
        duration_ms: Option<f32>,
    },
    /// Immediate jump
    Move { value: P },
}

impl<P> Keyframe<P> {
    pub fn linear(value: P, duration_ms: f32) -> Self {
        Keyframe::Linear { value, duration_ms }
    }

    /// Cubic segment with the standard ease-in-out curve
    pub fn cubic(value: P, duration_ms: f32) -> Self {
        Self::cubic_with(value, duration_ms, Easing::DEFAULT_CUBIC)
    }

    pub fn cubic_with(value: P, duration_ms: f32, control: [f32; 4]) -> Self {
        Keyframe::Cubic {
            value,
            duration_ms,
            control,
        }
    }

    /// Spring segment that runs until the spring settles
    pub fn spring(value: P, config: SpringConfig) -> Self {
        Keyframe::Spring {
            value,
            config,
            duration_ms: None,
        }
    }

    /// Spring segment forced to finish after `duration_ms`
    pub fn spring_with_duration(value: P, config: SpringConfig, duration_ms: f32) -> Self {
        Keyframe::Spring {
            value,
            config,
            duration_ms: Some(duration_ms),
        }
    }

    pub fn move_to(value: P) -> Self {
        Keyframe::Move { value }
    }

    /// Target value of this segment
    pub fn value(&self) -> &P {
        match self {
            Keyframe::Linear { value, .. }
            | Keyframe::Cubic { value, .. }
            | Keyframe::Spring { value, .. }
            | Keyframe::Move { value } => value,
        }
    }

    /// Time this segment occupies on its track
    pub fn duration_ms(&self) -> f32 {
        let duration = match self {
            Keyframe::Linear { duration_ms, .. } | Keyframe::Cubic { duration_ms, .. } => {
                *duration_ms
            }
            Keyframe::Spring {
                duration_ms: Some(duration),
                ..
            } => *duration,
            Keyframe::Spring {
                config,
                duration_ms: None,
                ..
            } => {
                let settle = config.settling_duration_ms();
                if settle.is_finite() {
                    settle
                } else {
                    tracing::warn!("spring keyframe never settles, using default duration");
                    DEFAULT_PHASE_DURATION_MS
                }
            }
            Keyframe::Move { .. } => 0.0,
        };
        if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        }
    }

    /// Interpolation factor `local_ms` into this segment
    ///
    /// Spring segments may overshoot 1.0.
    pub fn progress(&self, local_ms: f32) -> f32 {
        let duration = self.duration_ms();
        if duration <= 0.0 {
            return 1.0;
        }
        match self {
            Keyframe::Linear { .. } => (local_ms / duration).clamp(0.0, 1.0),
            Keyframe::Cubic { control, .. } => {
                Easing::from_control_points(*control).apply(local_ms / duration)
            }
            Keyframe::Spring { config, .. } => spring_progress(config, Some(duration), local_ms),
            Keyframe::Move { .. } => 1.0,
        }
    }
}

// ============================================================================
// Keyframe Track
// ============================================================================

type Getter<V, P> = Box<dyn Fn(&V) -> P + Send + Sync>;
type Setter<V, P> = Box<dyn Fn(&mut V, P) + Send + Sync>;

/// Keyframes for one property of `V`
pub struct KeyframeTrack<V, P> {
    get: Getter<V, P>,
    set: Setter<V, P>,
    keyframes: Vec<Keyframe<P>>,
}

impl<V, P: Interpolate> KeyframeTrack<V, P> {
    /// Track reading the property with `get` and writing it with `set`
    pub fn new<G, S>(get: G, set: S) -> Self
    where
        G: Fn(&V) -> P + Send + Sync + 'static,
        S: Fn(&mut V, P) + Send + Sync + 'static,
    {
        Self {
            get: Box::new(get),
            set: Box::new(set),
            keyframes: Vec::new(),
        }
    }

    pub fn add_keyframe(&mut self, keyframe: Keyframe<P>) {
        self.keyframes.push(keyframe);
    }

    pub fn keyframe(mut self, keyframe: Keyframe<P>) -> Self {
        self.add_keyframe(keyframe);
        self
    }

    pub fn linear(self, value: P, duration_ms: f32) -> Self {
        self.keyframe(Keyframe::linear(value, duration_ms))
    }

    pub fn cubic(self, value: P, duration_ms: f32) -> Self {
        self.keyframe(Keyframe::cubic(value, duration_ms))
    }

    pub fn cubic_with(self, value: P, duration_ms: f32, control: [f32; 4]) -> Self {
        self.keyframe(Keyframe::cubic_with(value, duration_ms, control))
    }

    pub fn spring(self, value: P, config: SpringConfig) -> Self {
        self.keyframe(Keyframe::spring(value, config))
    }

    pub fn spring_with_duration(self, value: P, config: SpringConfig, duration_ms: f32) -> Self {
        self.keyframe(Keyframe::spring_with_duration(value, config, duration_ms))
    }

    pub fn move_to(self, value: P) -> Self {
        self.keyframe(Keyframe::move_to(value))
    }

    pub fn keyframes(&self) -> &[Keyframe<P>] {
        &self.keyframes
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Sum of all segment durations
    pub fn duration_ms(&self) -> f32 {
        self.keyframes.iter().map(Keyframe::duration_ms).sum()
    }

    /// Property value `elapsed_ms` into the track, starting from `start`
    pub fn sample(&self, start: &P, elapsed_ms: f32) -> P {
        let mut from = start;
        let mut segment_start = 0.0;
        for keyframe in &self.keyframes {
            let duration = keyframe.duration_ms();
            if elapsed_ms < segment_start + duration {
                let local = (elapsed_ms - segment_start).max(0.0);
                return from.lerp(keyframe.value(), keyframe.progress(local));
            }
            segment_start += duration;
            from = keyframe.value();
        }
        from.clone()
    }
}

impl<V: Interpolate> KeyframeTrack<V, V> {
    /// Track animating the whole value
    pub fn whole() -> Self {
        Self::new(|v: &V| v.clone(), |v, p| *v = p)
    }
}

/// A keyframe track with its property type erased
pub trait AnyTrack<V>: Send + Sync {
    fn duration_ms(&self) -> f32;

    fn is_empty(&self) -> bool;

    /// Write this track's property into `value`, sampled `elapsed_ms` after
    /// starting from `initial`
    fn apply(&self, initial: &V, value: &mut V, elapsed_ms: f32);
}

impl<V, P> AnyTrack<V> for KeyframeTrack<V, P>
where
    V: 'static,
    P: Interpolate + Send + Sync + 'static,
{
    fn duration_ms(&self) -> f32 {
        KeyframeTrack::duration_ms(self)
    }

    fn is_empty(&self) -> bool {
        KeyframeTrack::is_empty(self)
    }

    fn apply(&self, initial: &V, value: &mut V, elapsed_ms: f32) {
        if self.keyframes.is_empty() {
            return;
        }
        let start = (self.get)(initial);
        (self.set)(value, self.sample(&start, elapsed_ms));
    }
}

// ============================================================================
// Keyframe Timeline
// ============================================================================

/// Concurrent keyframe tracks over one value
pub struct KeyframeTimeline<V> {
    tracks: Vec<Box<dyn AnyTrack<V>>>,
}

impl<V: Clone + 'static> KeyframeTimeline<V> {
    pub fn new() -> Self {
        Self { tracks: Vec::new() }
    }

    pub fn add_track<P>(&mut self, track: KeyframeTrack<V, P>)
    where
        P: Interpolate + Send + Sync + 'static,
    {
        self.tracks.push(Box::new(track));
    }

    pub fn track<P>(mut self, track: KeyframeTrack<V, P>) -> Self
    where
        P: Interpolate + Send + Sync + 'static,
    {
        self.add_track(track);
        self
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// True when no track has any keyframes
    pub fn is_empty(&self) -> bool {
        self.tracks.iter().all(|track| track.is_empty())
    }

    /// Length of the longest track
    pub fn duration_ms(&self) -> f32 {
        self.tracks
            .iter()
            .map(|track| track.duration_ms())
            .fold(0.0, f32::max)
    }

    /// Value `elapsed_ms` into the timeline, starting from `initial`
    pub fn sample(&self, initial: &V, elapsed_ms: f32) -> V {
        let mut value = initial.clone();
        for track in &self.tracks {
            track.apply(initial, &mut value, elapsed_ms);
        }
        value
    }
}

impl<V: Clone + 'static> Default for KeyframeTimeline<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Dot {
        x: f32,
        scale: f32,
    }

    #[test]
    fn test_linear_segment() {
        let track = KeyframeTrack::<f32, f32>::whole().linear(2.0, 1000.0);
        assert_eq!(track.sample(&1.0, 0.0), 1.0);
        assert!((track.sample(&1.0, 500.0) - 1.5).abs() < 1e-5);
        assert_eq!(track.sample(&1.0, 1000.0), 2.0);
        assert_eq!(track.sample(&1.0, 5000.0), 2.0);
    }

    #[test]
    fn test_segments_chain_from_previous_value() {
        let track = KeyframeTrack::<f32, f32>::whole()
            .linear(10.0, 100.0)
            .linear(20.0, 100.0);
        assert_eq!(track.duration_ms(), 200.0);
        assert!((track.sample(&0.0, 50.0) - 5.0).abs() < 1e-4);
        assert!((track.sample(&0.0, 150.0) - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_move_jumps() {
        let track = KeyframeTrack::<f32, f32>::whole()
            .move_to(5.0)
            .linear(15.0, 100.0);
        assert_eq!(track.sample(&0.0, 0.0), 5.0);
        assert!((track.sample(&0.0, 50.0) - 10.0).abs() < 1e-4);
        assert_eq!(Keyframe::move_to(1.0_f32).duration_ms(), 0.0);
    }

    #[test]
    fn test_cubic_segment_is_eased() {
        let track = KeyframeTrack::<f32, f32>::whole().cubic(1.0, 100.0);
        let early = track.sample(&0.0, 25.0);
        assert!(early < 0.25);
        assert!((track.sample(&0.0, 50.0) - 0.5).abs() < 0.01);
        assert_eq!(track.sample(&0.0, 100.0), 1.0);
    }

    #[test]
    fn test_spring_segment() {
        let timed = Keyframe::spring_with_duration(1.0_f32, SpringConfig::bouncy(), 400.0);
        assert_eq!(timed.duration_ms(), 400.0);
        assert_eq!(timed.progress(400.0), 1.0);

        let settled = Keyframe::spring(1.0_f32, SpringConfig::stiff());
        let duration = settled.duration_ms();
        assert!(duration > 0.0 && duration.is_finite());
        assert!((settled.progress(duration) - 1.0).abs() < 0.01);

        // Underdamped springs overshoot the target
        let bouncy = KeyframeTrack::<f32, f32>::whole().spring(1.0, SpringConfig::bouncy());
        let peak = (0..100)
            .map(|i| bouncy.sample(&0.0, i as f32 * 10.0))
            .fold(0.0, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_invalid_durations_clamp_to_zero() {
        assert_eq!(Keyframe::linear(1.0_f32, -10.0).duration_ms(), 0.0);
        assert_eq!(Keyframe::linear(1.0_f32, f32::NAN).duration_ms(), 0.0);
        assert_eq!(Keyframe::linear(1.0_f32, -10.0).progress(0.0), 1.0);
    }

    #[test]
    fn test_tracks_run_independently() {
        let timeline = KeyframeTimeline::new()
            .track(KeyframeTrack::new(|d: &Dot| d.x, |d, x| d.x = x).linear(10.0, 100.0))
            .track(
                KeyframeTrack::new(|d: &Dot| d.scale, |d, s| d.scale = s)
                    .move_to(2.0)
                    .linear(3.0, 400.0),
            );
        let initial = Dot { x: 0.0, scale: 1.0 };

        assert_eq!(timeline.track_count(), 2);
        assert_eq!(timeline.duration_ms(), 400.0);

        let start = timeline.sample(&initial, 0.0);
        assert_eq!(start, Dot { x: 0.0, scale: 2.0 });

        // x has finished and holds while scale continues
        let mid = timeline.sample(&initial, 200.0);
        assert_eq!(mid.x, 10.0);
        assert!((mid.scale - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_empty_timeline() {
        let mut timeline = KeyframeTimeline::<f32>::new();
        assert!(timeline.is_empty());
        assert_eq!(timeline.duration_ms(), 0.0);

        timeline.add_track(KeyframeTrack::<f32, f32>::whole());
        assert!(timeline.is_empty());
        assert_eq!(timeline.sample(&3.0, 100.0), 3.0);
    }
}

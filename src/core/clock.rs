//=========================================================================
// Clock
//=========================================================================
//
// Frame timing with pause, single-step and time scaling.
//
// Hierarchy:
//   System clock (root)  ── tick_realtime() / advance(fixed) ──> delta
//       └─ Game clock    ── advance(parent delta) ──> scaled delta
//
// A derived clock never reads the wall clock itself; its owner feeds it
// the parent's delta once per frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Instant;

//=== Clock ===============================================================

/// Tracks elapsed and per-frame time.
///
/// Effective delta for a frame is `parent_delta * time_scale`, or zero
/// while paused. [`Clock::step_single_frame`] lets exactly one frame of
/// motion through and then pauses again.
#[derive(Debug, Clone)]
pub struct Clock {
    delta_seconds: f64,
    total_seconds: f64,
    time_scale: f64,
    paused: bool,
    step_single_frame: bool,
    frame_count: u64,
    max_delta_seconds: f64,
    last_tick: Option<Instant>,
}

impl Clock {
    /// Default clamp for real-time deltas (debugger pauses, window drags).
    pub const DEFAULT_MAX_DELTA_SECONDS: f64 = 0.1;

    pub fn new() -> Self {
        Self {
            delta_seconds: 0.0,
            total_seconds: 0.0,
            time_scale: 1.0,
            paused: false,
            step_single_frame: false,
            frame_count: 0,
            max_delta_seconds: Self::DEFAULT_MAX_DELTA_SECONDS,
            last_tick: None,
        }
    }

    /// Creates a root clock whose real-time deltas are clamped to `max_delta_seconds`.
    pub fn with_max_delta(max_delta_seconds: f64) -> Self {
        Self {
            max_delta_seconds,
            ..Self::new()
        }
    }

    //--- Advancing --------------------------------------------------------

    /// Measures wall time since the previous call and advances by it.
    ///
    /// The first call advances by zero. The measured delta is clamped to
    /// the configured maximum.
    pub fn tick_realtime(&mut self) {
        let now = Instant::now();
        let raw = self
            .last_tick
            .map(|last| now.duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last_tick = Some(now);
        self.advance(raw.min(self.max_delta_seconds));
    }

    /// Advances by `parent_delta_seconds` (negative values count as zero).
    pub fn advance(&mut self, parent_delta_seconds: f64) {
        let delta = if self.paused {
            0.0
        } else {
            parent_delta_seconds.max(0.0) * self.time_scale
        };

        if self.step_single_frame {
            self.step_single_frame = false;
            self.paused = true;
        }

        self.delta_seconds = delta;
        self.total_seconds += delta;
        self.frame_count += 1;
    }

    //--- Controls ---------------------------------------------------------

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Unpauses for exactly the next [`advance`](Self::advance), then pauses.
    pub fn step_single_frame(&mut self) {
        self.step_single_frame = true;
        self.paused = false;
    }

    pub fn set_time_scale(&mut self, time_scale: f64) {
        self.time_scale = time_scale.max(0.0);
    }

    //--- Queries ----------------------------------------------------------

    pub fn delta_seconds(&self) -> f64 {
        self.delta_seconds
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_seconds
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_total() {
        let mut clock = Clock::new();
        clock.advance(0.25);
        clock.advance(0.5);
        assert_eq!(clock.delta_seconds(), 0.5);
        assert_eq!(clock.total_seconds(), 0.75);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn paused_clock_reports_zero_delta() {
        let mut clock = Clock::new();
        clock.pause();
        clock.advance(0.5);
        assert_eq!(clock.delta_seconds(), 0.0);
        assert_eq!(clock.total_seconds(), 0.0);
        assert_eq!(clock.frame_count(), 1, "Frames still count while paused");
    }

    #[test]
    fn time_scale_multiplies_parent_delta() {
        let mut clock = Clock::new();
        clock.set_time_scale(0.1);
        clock.advance(1.0);
        assert!((clock.delta_seconds() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn single_step_moves_exactly_one_frame() {
        let mut clock = Clock::new();
        clock.pause();
        clock.step_single_frame();

        clock.advance(0.5);
        assert_eq!(clock.delta_seconds(), 0.5);
        assert!(clock.is_paused(), "Clock re-pauses after the stepped frame");

        clock.advance(0.5);
        assert_eq!(clock.delta_seconds(), 0.0);
        assert_eq!(clock.total_seconds(), 0.5);
    }

    #[test]
    fn toggle_pause_flips_state() {
        let mut clock = Clock::new();
        clock.toggle_pause();
        assert!(clock.is_paused());
        clock.toggle_pause();
        assert!(!clock.is_paused());
    }

    #[test]
    fn negative_delta_is_ignored() {
        let mut clock = Clock::new();
        clock.advance(-1.0);
        assert_eq!(clock.total_seconds(), 0.0);
    }

    #[test]
    fn first_realtime_tick_is_zero() {
        let mut clock = Clock::with_max_delta(0.1);
        clock.tick_realtime();
        assert_eq!(clock.delta_seconds(), 0.0);
        clock.tick_realtime();
        assert!(clock.delta_seconds() <= 0.1);
    }

    #[test]
    fn derived_clock_follows_parent() {
        let mut system = Clock::new();
        let mut game = Clock::new();
        game.set_time_scale(2.0);

        system.advance(0.125);
        game.advance(system.delta_seconds());

        assert_eq!(game.delta_seconds(), 0.25);
    }
}

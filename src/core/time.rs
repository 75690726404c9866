//! Clock sources and the per-frame time snapshot

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::config::FixedStepMode;

/// A monotonic, pausable clock the scheduler reads once per frame.
pub trait Clock {
    /// Start or resume the clock
    fn start(&mut self);

    /// Pause the clock. Elapsed time is kept.
    fn stop(&mut self);

    /// Total running time since the first `start`, excluding paused spans
    fn elapsed(&self) -> Duration;

    /// Whether the clock is currently advancing
    fn is_running(&self) -> bool;

    /// Elapsed time in seconds
    fn elapsed_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

/// Wall clock built on [`Instant`]
#[derive(Debug, Default)]
pub struct Stopwatch {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl Stopwatch {
    /// Create a stopped stopwatch at zero
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for Stopwatch {
    fn start(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    fn elapsed(&self) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + since.elapsed(),
            None => self.accumulated,
        }
    }

    fn is_running(&self) -> bool {
        self.running_since.is_some()
    }
}

#[derive(Debug, Default)]
struct ManualState {
    elapsed: Cell<Duration>,
    running: Cell<bool>,
}

/// Clock that only moves when told to.
///
/// Clones share the same state, so a test or a headless driver can keep one
/// copy to advance time while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    state: Rc<ManualState>,
}

impl ManualClock {
    /// Create a stopped clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `delta`. Ignored while the clock is stopped.
    pub fn advance(&self, delta: Duration) {
        if self.state.running.get() {
            self.state.elapsed.set(self.state.elapsed.get() + delta);
        }
    }

    /// Advance by a number of milliseconds
    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }
}

impl Clock for ManualClock {
    fn start(&mut self) {
        self.state.running.set(true);
    }

    fn stop(&mut self) {
        self.state.running.set(false);
    }

    fn elapsed(&self) -> Duration {
        self.state.elapsed.get()
    }

    fn is_running(&self) -> bool {
        self.state.running.get()
    }
}

/// Lifecycle of the time snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeState {
    /// No frame has been timed yet
    Uninitialized,
    /// The clock is advancing
    Running,
    /// The clock is stopped; elapsed time is retained
    Paused,
}

/// Time snapshot for the current frame.
///
/// Written only by the scheduler; everything else reads it.
#[derive(Debug, Clone)]
pub struct Time {
    state: TimeState,
    time: Duration,
    delta: Duration,
    fixed_delta: Duration,
    last_update: Duration,
    last_fixed_update: Duration,
    frame_count: u64,
}

impl Time {
    /// Create an uninitialized snapshot
    pub fn new() -> Self {
        Self {
            state: TimeState::Uninitialized,
            time: Duration::ZERO,
            delta: Duration::ZERO,
            fixed_delta: Duration::ZERO,
            last_update: Duration::ZERO,
            last_fixed_update: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Zero every field and mark the snapshot as running
    pub(crate) fn reset(&mut self) {
        *self = Self::new();
        self.state = TimeState::Running;
    }

    pub(crate) fn set_state(&mut self, state: TimeState) {
        self.state = state;
    }

    /// Record the clock reading for a new frame
    pub(crate) fn update(&mut self, elapsed: Duration) {
        self.time = elapsed;
        self.frame_count += 1;
    }

    /// Recompute the variable-rate delta. Called right before Update dispatch.
    pub(crate) fn update_delta(&mut self) {
        self.delta = self.time.saturating_sub(self.last_update);
        self.last_update = self.time;
    }

    /// Run the fixed-step gate for this frame and return how many fixed steps
    /// are due.
    pub(crate) fn advance_fixed(
        &mut self,
        interval: Duration,
        mode: FixedStepMode,
        max_steps: u32,
    ) -> u32 {
        let behind = self.time.saturating_sub(self.last_fixed_update);
        if interval.is_zero() || behind < interval {
            return 0;
        }

        match mode {
            FixedStepMode::Reanchor => {
                self.fixed_delta = behind;
                self.last_fixed_update = self.time;
                1
            }
            FixedStepMode::Accumulate => {
                let interval_nanos = interval.as_nanos();
                let pending = u32::try_from(behind.as_nanos() / interval_nanos).unwrap_or(u32::MAX);
                let run = pending.min(max_steps.max(1));
                if run < pending {
                    log::debug!(
                        "Dropping {} fixed steps of backlog at t={:.3}s",
                        pending - run,
                        self.time.as_secs_f64()
                    );
                }
                // Stay on the interval grid: keep only the sub-step remainder
                let remainder = behind.as_nanos() % interval_nanos;
                self.last_fixed_update = self.time - Duration::from_nanos(remainder as u64);
                self.fixed_delta = interval;
                run
            }
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> TimeState {
        self.state
    }

    /// Elapsed running time at the start of this frame
    pub fn elapsed(&self) -> Duration {
        self.time
    }

    /// Elapsed running time in seconds
    pub fn elapsed_seconds(&self) -> f32 {
        self.time.as_secs_f32()
    }

    /// Time since the previous Update phase
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Time since the previous Update phase, in seconds
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Step length used by the most recent fixed step
    pub fn fixed_delta(&self) -> Duration {
        self.fixed_delta
    }

    /// Step length used by the most recent fixed step, in seconds
    pub fn fixed_delta_seconds(&self) -> f32 {
        self.fixed_delta.as_secs_f32()
    }

    /// Clock reading at the most recent fixed step
    pub fn last_fixed_update(&self) -> Duration {
        self.last_fixed_update
    }

    /// Number of frames timed so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(6);

    #[test]
    fn test_manual_clock_pauses() {
        let mut clock = ManualClock::new();
        clock.advance_millis(100);
        assert_eq!(clock.elapsed(), Duration::ZERO);

        clock.start();
        clock.advance_millis(100);
        clock.stop();
        clock.advance_millis(100);
        assert_eq!(clock.elapsed(), Duration::from_millis(100));

        clock.start();
        clock.advance_millis(50);
        assert_eq!(clock.elapsed(), Duration::from_millis(150));
    }

    #[test]
    fn test_manual_clock_clones_share_state() {
        let mut clock = ManualClock::new();
        let driver = clock.clone();
        clock.start();
        driver.advance_millis(16);
        assert_eq!(clock.elapsed(), Duration::from_millis(16));
    }

    #[test]
    fn test_stopwatch_keeps_elapsed_when_stopped() {
        let mut watch = Stopwatch::new();
        assert!(!watch.is_running());
        watch.start();
        std::thread::sleep(Duration::from_millis(2));
        watch.stop();
        let frozen = watch.elapsed();
        assert!(frozen >= Duration::from_millis(2));
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(watch.elapsed(), frozen);
    }

    #[test]
    fn test_delta_tracks_update_calls() {
        let mut time = Time::new();
        time.reset();

        time.update(Duration::from_millis(10));
        time.update_delta();
        assert_eq!(time.delta(), Duration::from_millis(10));

        time.update(Duration::from_millis(25));
        time.update_delta();
        assert_eq!(time.delta(), Duration::from_millis(15));
        assert_eq!(time.frame_count(), 2);
    }

    #[test]
    fn test_reanchor_gate() {
        let mut time = Time::new();
        time.reset();

        time.update(Duration::from_millis(4));
        assert_eq!(time.advance_fixed(STEP, FixedStepMode::Reanchor, 1), 0);

        time.update(Duration::from_millis(8));
        assert_eq!(time.advance_fixed(STEP, FixedStepMode::Reanchor, 1), 1);
        assert_eq!(time.fixed_delta(), Duration::from_millis(8));
        assert_eq!(time.last_fixed_update(), Duration::from_millis(8));

        // Next step needs 6ms after the re-anchored time
        time.update(Duration::from_millis(12));
        assert_eq!(time.advance_fixed(STEP, FixedStepMode::Reanchor, 1), 0);
        time.update(Duration::from_millis(16));
        assert_eq!(time.advance_fixed(STEP, FixedStepMode::Reanchor, 1), 1);
    }

    #[test]
    fn test_accumulate_gate_stays_on_grid() {
        let mut time = Time::new();
        time.reset();

        time.update(Duration::from_millis(8));
        assert_eq!(time.advance_fixed(STEP, FixedStepMode::Accumulate, 1), 1);
        assert_eq!(time.fixed_delta(), STEP);
        assert_eq!(time.last_fixed_update(), STEP);

        time.update(Duration::from_millis(12));
        assert_eq!(time.advance_fixed(STEP, FixedStepMode::Accumulate, 1), 1);
        assert_eq!(time.last_fixed_update(), Duration::from_millis(12));
    }

    #[test]
    fn test_accumulate_gate_caps_backlog() {
        let mut time = Time::new();
        time.reset();

        time.update(Duration::from_millis(31));
        assert_eq!(time.advance_fixed(STEP, FixedStepMode::Accumulate, 3), 3);
        // The whole backlog is consumed even though only three steps run
        assert_eq!(time.last_fixed_update(), Duration::from_millis(30));

        time.update(Duration::from_millis(35));
        assert_eq!(time.advance_fixed(STEP, FixedStepMode::Accumulate, 3), 0);
    }
}

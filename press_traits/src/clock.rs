//! Time sources behind the control loop.
//!
//! Every duration the press cares about — the cycle period, the baseline
//! capture gaps, the stroke and cooldown windows — is measured through the
//! [`Clock`] trait, so tests can drive a whole run off a virtual timeline.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Monotonic time source injected into the cycle engine.
///
/// `now` must never go backwards; `ms_since` derives the millisecond
/// timestamps that the valve interlock compares and telemetry carries.
/// `sleep` paces the loop and is allowed to be virtual.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, d: Duration);

    /// Milliseconds elapsed since `epoch`, saturating at 0 on underflow.
    fn ms_since(&self, epoch: Instant) -> u64 {
        let dur = self.now().saturating_duration_since(epoch);
        dur.as_millis() as u64
    }
}

/// Wall-time implementation over `std::time::Instant`, used outside tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn sleep(&self, d: Duration) {
        if d.is_zero() {
            return;
        }
        thread::sleep(d);
    }
}

/// Hand-cranked clock for deterministic runs: `sleep` advances the virtual
/// timeline instead of blocking, so a ten-second cooldown passes instantly.
///
/// Clones share one timeline, which lets a test keep a handle while the
/// engine owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Move the timeline forward by `d`.
    pub fn advance(&self, d: Duration) {
        if let Ok(mut off) = self.offset.lock() {
            *off = off.saturating_add(d);
        }
    }

    /// Jump to an absolute offset from the origin, forwards or backwards.
    pub fn set_offset(&self, d: Duration) {
        if let Ok(mut off) = self.offset.lock() {
            *off = d;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let off = self.offset.lock().map(|g| *g).unwrap_or(Duration::ZERO);
        self.origin + off
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_sleep_is_virtual() {
        let clk = ManualClock::new();
        let epoch = clk.now();
        // a full stroke plus cooldown, without blocking the test thread
        clk.sleep(Duration::from_millis(2_000));
        clk.sleep(Duration::from_millis(10_000));
        assert_eq!(clk.ms_since(epoch), 12_000);
    }

    #[test]
    fn clones_share_one_timeline() {
        let clk = ManualClock::new();
        let view = clk.clone();
        let epoch = view.now();
        clk.advance(Duration::from_millis(500));
        assert_eq!(view.ms_since(epoch), 500);
    }

    #[test]
    fn ms_since_saturates_when_the_epoch_is_ahead() {
        let clk = ManualClock::new();
        clk.advance(Duration::from_millis(300));
        let epoch = clk.now();
        clk.set_offset(Duration::ZERO);
        assert_eq!(clk.ms_since(epoch), 0);
    }
}

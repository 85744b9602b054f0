//! Deterministic time system
//!
//! Fixed 60Hz tick rate plus a timer queue drained at tick boundaries.

use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;

/// Fixed simulation tick rate (60 Hz = 16.666ms per tick)
pub const TICK_RATE_HZ: u32 = 60;
pub const TICK_DURATION: Duration = Duration::from_micros(16_666); // ~16.666ms

/// Length of one fixed tick in seconds.
pub const TICK_SECONDS: f32 = 1.0 / TICK_RATE_HZ as f32;

/// Simulation time tracker
#[derive(Clone, Debug, Default)]
pub struct SimulationTime {
    tick_count: u64,
    elapsed: f64,
}

impl SimulationTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick_count += 1;
        self.elapsed += f64::from(dt);
    }

    /// Total simulated seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn total_time(&self) -> Duration {
        Duration::try_from_secs_f64(self.elapsed).unwrap_or_default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TimerError {
    #[error("timer interval must be positive, got {0}")]
    NonPositiveInterval(f64),
}

// Absorbs accumulated float drift so a 20 s timer fires on the tick that reaches 20 s.
const DUE_EPSILON: f64 = 1e-6;

/// Most times a single timer fires in one [`TimerQueue::advance`]. Any
/// backlog beyond this is dropped and the timer restarts a full interval out.
pub const MAX_FIRES_PER_ADVANCE: usize = 64;

#[derive(Clone, Debug)]
struct Timer {
    interval: f64,
    remaining: f64,
}

/// Periodic triggers keyed by `K`.
///
/// Timers only move when [`TimerQueue::advance`] is called, so a frozen
/// session simply stops advancing its queue.
#[derive(Clone, Debug)]
pub struct TimerQueue<K> {
    timers: Vec<(K, Timer)>,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self { timers: Vec::new() }
    }
}

impl<K: Copy + PartialEq + Debug> TimerQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) a periodic timer. It first fires after `first_delay`
    /// seconds, then every `interval` seconds.
    pub fn arm(&mut self, key: K, interval: f64, first_delay: f64) -> Result<(), TimerError> {
        if !(interval > 0.0) {
            return Err(TimerError::NonPositiveInterval(interval));
        }
        let timer = Timer {
            interval,
            remaining: first_delay.max(0.0),
        };
        match self.timers.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = timer,
            None => self.timers.push((key, timer)),
        }
        tracing::trace!(?key, interval, first_delay, "timer armed");
        Ok(())
    }

    pub fn disarm(&mut self, key: K) -> bool {
        let before = self.timers.len();
        self.timers.retain(|(k, _)| *k != key);
        before != self.timers.len()
    }

    pub fn disarm_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_armed(&self, key: K) -> bool {
        self.timers.iter().any(|(k, _)| *k == key)
    }

    /// Seconds until `key` next fires.
    pub fn remaining(&self, key: K) -> Option<f64> {
        self.timers
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, t)| t.remaining)
    }

    /// Advance every timer by `dt` seconds and return the keys that fired,
    /// ordered by due time (ties in arming order). A timer whose interval is
    /// shorter than `dt` fires several times, up to [`MAX_FIRES_PER_ADVANCE`].
    pub fn advance(&mut self, dt: f64) -> Vec<K> {
        let mut fired: Vec<(f64, usize, K)> = Vec::new();
        for (order, (key, timer)) in self.timers.iter_mut().enumerate() {
            timer.remaining -= dt;
            let mut fires = 0;
            while timer.remaining <= DUE_EPSILON {
                if fires == MAX_FIRES_PER_ADVANCE {
                    tracing::warn!(?key, interval = timer.interval, "timer backlog dropped");
                    timer.remaining = timer.interval;
                    break;
                }
                fired.push((timer.remaining, order, *key));
                timer.remaining += timer.interval;
                fires += 1;
            }
        }
        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, _, key)| key).collect()
    }
}

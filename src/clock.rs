//! Monotonic wall time for timeouts, and bounded jitter for desynchronizing
//! broadcast collisions.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// A source of "now", abstracted so the event loop can be driven by a fake
/// clock in tests without sleeping real wall time.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall-clock time measured as seconds elapsed since this `SystemClock` was
/// constructed.
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// Default jitter used when the random draw is degenerate.
pub const DEFAULT_JITTER_SECS: f64 = 2.0;

/// Draw a uniform jitter in `[0, max_secs]`. No external RNG crate is
/// pulled in for this; a process-local `RandomState` hash of the current
/// instant is a sufficiently uniform source for desynchronizing broadcasts.
pub fn jitter_secs(max_secs: f64) -> f64 {
    if max_secs <= 0.0 {
        return 0.0;
    }
    let wall_nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(wall_nanos);
    hasher.write_usize(std::process::id() as usize);
    let draw = hasher.finish();
    let fraction = (draw % 1_000_003) as f64 / 1_000_003.0;
    if !(0.0..=1.0).contains(&fraction) {
        return DEFAULT_JITTER_SECS.min(max_secs);
    }
    fraction * max_secs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_stays_within_bounds() {
        for _ in 0..50 {
            let j = jitter_secs(3.0);
            assert!((0.0..=3.0).contains(&j));
        }
    }

    #[test]
    fn jitter_of_zero_max_is_zero() {
        assert_eq!(jitter_secs(0.0), 0.0);
    }

    #[test]
    fn system_clock_is_monotonic_non_negative() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
        assert!(first >= 0.0);
    }
}

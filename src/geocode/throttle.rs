//! Fixed-delay pacing gate for the geocoding service.
//!
//! Nominatim's usage policy allows at most one request per second. The gate
//! serializes calls from a single owner and inserts whatever delay is still
//! owed before each one. Modeled as an explicit dependency with an
//! injectable sleeper so the pacing policy is testable without wall-clock
//! waits.

use std::time::{Duration, Instant};

/// Blocks the caller for the owed pacing delay.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock sleeper used outside tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// The pacing gate: at most one `wait()` completion per interval.
pub struct Throttle<S: Sleeper = ThreadSleeper> {
    interval: Duration,
    last: Option<Instant>,
    sleeper: S,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self::with_sleeper(interval, ThreadSleeper)
    }
}

impl<S: Sleeper> Throttle<S> {
    pub fn with_sleeper(interval: Duration, sleeper: S) -> Self {
        Self {
            interval,
            last: None,
            sleeper,
        }
    }

    /// Block until one full interval has passed since the previous call.
    /// The first call never waits.
    pub fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = Instant::now().duration_since(last);
            if elapsed < self.interval {
                self.sleeper.sleep(self.interval - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}

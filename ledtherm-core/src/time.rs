//! Clocks and delays
//!
//! Two separate concerns:
//! - [`Clock`]: local wall-clock time stamped onto finished records
//! - [`Scheduler`]: the blocking delays that set the measurement cadence
//!
//! Both are traits so the loop can run against real time on hardware and
//! against a virtual timeline in tests, where 15 seconds of cadence per cycle
//! must cost nothing.

use core::time::Duration;

use crate::record::LocalTimestamp;

/// Source of local wall-clock time
pub trait Clock {
    /// Current local time
    fn now(&self) -> LocalTimestamp;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> LocalTimestamp {
        (**self).now()
    }
}

/// Local time from the operating system (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> LocalTimestamp {
        LocalTimestamp::from(chrono::Local::now().naive_local())
    }
}

/// Clock frozen at one instant, for tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    timestamp: LocalTimestamp,
}

impl FixedClock {
    /// Clock that always reports `timestamp`
    pub fn new(timestamp: LocalTimestamp) -> Self {
        Self { timestamp }
    }

    /// Move the clock to a new instant
    pub fn set(&mut self, timestamp: LocalTimestamp) {
        self.timestamp = timestamp;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> LocalTimestamp {
        self.timestamp
    }
}

/// Blocking delay provider
///
/// Every delay in the loop goes through here, so the loop itself contains no
/// sleeps.
pub trait Scheduler {
    /// Block for `duration`
    fn sleep(&mut self, duration: Duration);
}

impl<T: Scheduler + ?Sized> Scheduler for &mut T {
    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Real delays on the current thread (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadScheduler;

#[cfg(feature = "std")]
impl Scheduler for ThreadScheduler {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Scheduler that only advances a virtual timeline
///
/// Records how much time the loop asked for without blocking.
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualScheduler {
    elapsed: Duration,
    sleeps: usize,
}

impl VirtualScheduler {
    /// Fresh timeline at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Total time requested so far
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of sleep calls so far
    pub fn sleeps(&self) -> usize {
        self.sleeps
    }
}

impl Scheduler for VirtualScheduler {
    fn sleep(&mut self, duration: Duration) {
        self.elapsed += duration;
        self.sleeps += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_scheduler_accumulates() {
        let mut scheduler = VirtualScheduler::new();
        scheduler.sleep(Duration::from_secs(5));
        scheduler.sleep(Duration::from_millis(10));

        assert_eq!(scheduler.elapsed(), Duration::from_millis(5_010));
        assert_eq!(scheduler.sleeps(), 2);
    }

    #[test]
    fn fixed_clock_reports_set_time() {
        let start = LocalTimestamp::new(2024, 3, 1, 12, 0, 0);
        let mut clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);

        let later = LocalTimestamp::new(2024, 3, 1, 12, 0, 15);
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[cfg(feature = "std")]
    #[test]
    fn system_clock_is_plausible() {
        let now = SystemClock.now();
        assert!(now.year >= 2024);
        assert!((1..=12).contains(&now.month));
    }
}

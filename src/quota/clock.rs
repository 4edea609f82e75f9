//! Calendar day source for daily counter resets

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const SECONDS_PER_DAY: u64 = 86_400;

/// Supplies the current day number; counters reset when it changes
pub trait DayClock: Send + Sync {
    fn today(&self) -> u64;
}

/// Days since the Unix epoch, in UTC
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemDayClock;

impl DayClock for SystemDayClock {
    fn today(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() / SECONDS_PER_DAY)
            .unwrap_or(0)
    }
}

/// Clock advanced by hand, for simulations and tests
#[derive(Debug, Default)]
pub struct ManualDayClock {
    day: AtomicU64,
}

impl ManualDayClock {
    pub fn new(day: u64) -> Self {
        Self {
            day: AtomicU64::new(day),
        }
    }

    pub fn set(&self, day: u64) {
        self.day.store(day, Ordering::Relaxed);
    }

    pub fn advance(&self) {
        self.day.fetch_add(1, Ordering::Relaxed);
    }
}

impl DayClock for ManualDayClock {
    fn today(&self) -> u64 {
        self.day.load(Ordering::Relaxed)
    }
}

impl<C: DayClock + ?Sized> DayClock for std::sync::Arc<C> {
    fn today(&self) -> u64 {
        (**self).today()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_past_epoch() {
        // 2020-01-01 is day 18262
        assert!(SystemDayClock.today() > 18_262);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualDayClock::new(7);
        assert_eq!(clock.today(), 7);
        clock.advance();
        assert_eq!(clock.today(), 8);
        clock.set(2);
        assert_eq!(clock.today(), 2);
    }
}

//! Daily usage counter storage

use std::collections::HashMap;
use std::sync::Mutex;

use crate::world::ActorId;
use super::clock::DayClock;

/// Per-actor daily counters read and bumped by the removal engine.
///
/// Methods take `&self` so one store can be shared with the host's own
/// cooldown and usage checks.
pub trait QuotaStore: Send + Sync {
    fn daily_blocks_broken(&self, actor: &ActorId) -> u32;
    fn increment_daily_blocks_broken(&self, actor: &ActorId);
    fn daily_uses(&self, actor: &ActorId) -> u32;
    fn increment_daily_uses(&self, actor: &ActorId);
}

/// Counters for one actor on one day
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DailyUsage {
    pub day: u64,
    pub uses: u32,
    pub blocks_broken: u32,
}

/// In-memory [`QuotaStore`] that resets an actor's counters on the first
/// access of a new day. Nothing is persisted.
pub struct MemoryQuotaStore<C: DayClock> {
    clock: C,
    usage: Mutex<HashMap<ActorId, DailyUsage>>,
}

impl<C: DayClock> MemoryQuotaStore<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            usage: Mutex::new(HashMap::new()),
        }
    }

    /// Current counters for an actor, after any day rollover
    pub fn usage(&self, actor: &ActorId) -> DailyUsage {
        self.with_usage(actor, |usage| *usage)
    }

    fn with_usage<R>(&self, actor: &ActorId, f: impl FnOnce(&mut DailyUsage) -> R) -> R {
        let today = self.clock.today();
        let mut map = self.usage.lock().unwrap_or_else(|e| e.into_inner());
        let usage = map.entry(*actor).or_insert(DailyUsage {
            day: today,
            ..DailyUsage::default()
        });
        if usage.day != today {
            log::debug!("Resetting daily counters for {} (day {} -> {})", actor, usage.day, today);
            *usage = DailyUsage {
                day: today,
                ..DailyUsage::default()
            };
        }
        f(usage)
    }
}

impl<C: DayClock> QuotaStore for MemoryQuotaStore<C> {
    fn daily_blocks_broken(&self, actor: &ActorId) -> u32 {
        self.with_usage(actor, |usage| usage.blocks_broken)
    }

    fn increment_daily_blocks_broken(&self, actor: &ActorId) {
        self.with_usage(actor, |usage| usage.blocks_broken = usage.blocks_broken.saturating_add(1));
    }

    fn daily_uses(&self, actor: &ActorId) -> u32 {
        self.with_usage(actor, |usage| usage.uses)
    }

    fn increment_daily_uses(&self, actor: &ActorId) {
        self.with_usage(actor, |usage| usage.uses = usage.uses.saturating_add(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::quota::ManualDayClock;

    #[test]
    fn test_counters_are_per_actor() {
        let store = MemoryQuotaStore::new(ManualDayClock::new(0));
        let a = ActorId::random();
        let b = ActorId::random();

        store.increment_daily_blocks_broken(&a);
        store.increment_daily_blocks_broken(&a);
        store.increment_daily_uses(&b);

        assert_eq!(store.daily_blocks_broken(&a), 2);
        assert_eq!(store.daily_uses(&a), 0);
        assert_eq!(store.daily_blocks_broken(&b), 0);
        assert_eq!(store.daily_uses(&b), 1);
    }

    #[test]
    fn test_counters_reset_on_new_day() {
        let clock = Arc::new(ManualDayClock::new(10));
        let store = MemoryQuotaStore::new(Arc::clone(&clock));
        let actor = ActorId::random();

        store.increment_daily_blocks_broken(&actor);
        store.increment_daily_uses(&actor);
        assert_eq!(store.usage(&actor), DailyUsage { day: 10, uses: 1, blocks_broken: 1 });

        clock.advance();
        assert_eq!(store.daily_blocks_broken(&actor), 0);
        assert_eq!(store.usage(&actor).day, 11);
    }
}

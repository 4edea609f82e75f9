//! Per-actor daily usage counters and the quota rules built on them

pub mod clock;
pub mod store;

pub use clock::{DayClock, ManualDayClock, SystemDayClock};
pub use store::{DailyUsage, MemoryQuotaStore, QuotaStore};

use crate::config::RemovalConfig;
use crate::world::Actor;

/// Whether a VIP allowance exempts the actor from the daily block limit.
///
/// With `limit-vip-usage` off every VIP is exempt. With it on, a VIP stays
/// exempt while their count has not passed `vip-blocks-per-day`.
pub fn has_vip_allowance(actor: &Actor, blocks_broken: u32, config: &RemovalConfig) -> bool {
    if !config.limit_vip_usage {
        return actor.is_vip();
    }
    actor.is_vip() && blocks_broken <= config.vip_blocks_per_day
}

/// Whether canopy removal must stop for `actor` because of the daily limit
pub fn block_quota_exhausted<Q: QuotaStore + ?Sized>(actor: &Actor, store: &Q, config: &RemovalConfig) -> bool {
    if !config.leaf_removal_counts_towards_limit {
        return false;
    }
    let broken = store.daily_blocks_broken(&actor.id);
    !has_vip_allowance(actor, broken, config) && broken >= config.max_blocks_per_day
}

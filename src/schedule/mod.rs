//! Tick-based task scheduling with optional region affinity
//!
//! Hosts either run every task on one main thread ([`GlobalScheduler`]) or
//! partition the world into regions with one queue each
//! ([`RegionScheduler`]). Callers only say "run this after N ticks, pinned to
//! this region" through [`TickScheduler`] and never branch on host topology.

pub mod queue;
pub mod global;
pub mod region;

pub use queue::TaskQueue;
pub use global::GlobalScheduler;
pub use region::RegionScheduler;

use crate::world::{Position, RegionKey};

/// Where a task must run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Affinity {
    /// Any thread that drives the global queue
    Global,
    /// The thread owning this region
    Region(RegionKey),
}

impl Affinity {
    /// Pin to the region owning `pos`
    pub fn of(pos: Position) -> Self {
        Affinity::Region(pos.region())
    }
}

/// A task popped from a scheduler
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scheduled<T> {
    /// Tick the task became due
    pub due: u64,
    pub affinity: Affinity,
    pub task: T,
}

/// "Run this after N ticks, optionally pinned to a region"
pub trait TickScheduler<T> {
    /// Queue `task` to become due `delay` ticks from now.
    ///
    /// A zero delay makes the task due on the current tick, so it is picked
    /// up by the same drain that scheduled it.
    fn schedule(&mut self, delay: u64, affinity: Affinity, task: T);

    /// Current tick
    fn now(&self) -> u64;

    /// Move the clock forward one tick and return the new tick
    fn advance(&mut self) -> u64;

    /// Next due task, earliest due tick first, then in scheduling order
    fn pop_ready(&mut self) -> Option<Scheduled<T>>;

    /// Number of tasks not yet popped
    fn pending(&self) -> usize;
}

//! Per-region scheduler for region-partitioned hosts

use std::collections::HashMap;

use crate::world::RegionKey;
use super::{Affinity, Scheduled, TaskQueue, TickScheduler};

/// One queue per region plus a global queue.
///
/// A host with a thread per region drains [`pop_ready_in`](Self::pop_ready_in)
/// for the regions it owns; [`TickScheduler::pop_ready`] serves single-threaded
/// drivers and yields tasks from all queues in global `(due, seq)` order.
pub struct RegionScheduler<T> {
    tick: u64,
    next_seq: u64,
    global: TaskQueue<T>,
    regions: HashMap<RegionKey, TaskQueue<T>>,
}

impl<T> Default for RegionScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RegionScheduler<T> {
    pub fn new() -> Self {
        Self {
            tick: 0,
            next_seq: 0,
            global: TaskQueue::new(),
            regions: HashMap::new(),
        }
    }

    /// Pop a due task pinned to `region`
    pub fn pop_ready_in(&mut self, region: RegionKey) -> Option<Scheduled<T>> {
        let queue = self.regions.get_mut(&region)?;
        let task = queue.pop_if_ready(self.tick);
        if queue.is_empty() {
            self.regions.remove(&region);
        }
        task
    }

    /// Pop a due task from the global queue
    pub fn pop_ready_global(&mut self) -> Option<Scheduled<T>> {
        self.global.pop_if_ready(self.tick)
    }

    /// Regions that currently hold queued tasks
    pub fn active_regions(&self) -> impl Iterator<Item = RegionKey> + '_ {
        self.regions.keys().copied()
    }

    /// Tasks queued for one region
    pub fn pending_in(&self, region: RegionKey) -> usize {
        self.regions.get(&region).map_or(0, TaskQueue::len)
    }
}

impl<T> TickScheduler<T> for RegionScheduler<T> {
    fn schedule(&mut self, delay: u64, affinity: Affinity, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = self.tick.saturating_add(delay);
        match affinity {
            Affinity::Global => self.global.push(due, seq, affinity, task),
            Affinity::Region(key) => self.regions.entry(key).or_default().push(due, seq, affinity, task),
        }
    }

    fn now(&self) -> u64 {
        self.tick
    }

    fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn pop_ready(&mut self) -> Option<Scheduled<T>> {
        let now = self.tick;
        let mut best: Option<(Option<RegionKey>, (u64, u64))> = self
            .global
            .peek_key()
            .filter(|(due, _)| *due <= now)
            .map(|key| (None, key));

        for (region, queue) in &self.regions {
            if let Some(key) = queue.peek_key().filter(|(due, _)| *due <= now) {
                if best.is_none_or(|(_, best_key)| key < best_key) {
                    best = Some((Some(*region), key));
                }
            }
        }

        match best? {
            (None, _) => self.pop_ready_global(),
            (Some(region), _) => self.pop_ready_in(region),
        }
    }

    fn pending(&self) -> usize {
        self.global.len() + self.regions.values().map(TaskQueue::len).sum::<usize>()
    }
}

//! Single main-thread scheduler

use super::{Affinity, Scheduled, TaskQueue, TickScheduler};

/// Scheduler for hosts that run all world mutation on one thread.
///
/// Region affinity is recorded but not used for dispatch.
pub struct GlobalScheduler<T> {
    tick: u64,
    next_seq: u64,
    queue: TaskQueue<T>,
}

impl<T> Default for GlobalScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GlobalScheduler<T> {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Scheduler whose clock starts at `tick`
    pub fn starting_at(tick: u64) -> Self {
        Self {
            tick,
            next_seq: 0,
            queue: TaskQueue::new(),
        }
    }
}

impl<T> TickScheduler<T> for GlobalScheduler<T> {
    fn schedule(&mut self, delay: u64, affinity: Affinity, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(self.tick.saturating_add(delay), seq, affinity, task);
    }

    fn now(&self) -> u64 {
        self.tick
    }

    fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn pop_ready(&mut self) -> Option<Scheduled<T>> {
        self.queue.pop_if_ready(self.tick)
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

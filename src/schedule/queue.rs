//! Due-tick ordered task queue

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::{Affinity, Scheduled};

struct Entry<T> {
    due: u64,
    seq: u64,
    affinity: Affinity,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap yields the earliest (due, seq) first
    fn cmp(&self, other: &Self) -> Ordering {
        (other.due, other.seq).cmp(&(self.due, self.seq))
    }
}

/// Min-queue on `(due tick, sequence number)`
///
/// Sequence numbers are supplied by the owner so several queues can share one
/// global ordering.
pub struct TaskQueue<T> {
    heap: BinaryHeap<Entry<T>>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    pub fn push(&mut self, due: u64, seq: u64, affinity: Affinity, task: T) {
        self.heap.push(Entry {
            due,
            seq,
            affinity,
            task,
        });
    }

    /// `(due, seq)` of the head, if any
    pub fn peek_key(&self) -> Option<(u64, u64)> {
        self.heap.peek().map(|e| (e.due, e.seq))
    }

    /// Pop the head if it is due at or before `now`
    pub fn pop_if_ready(&mut self, now: u64) -> Option<Scheduled<T>> {
        if self.heap.peek()?.due > now {
            return None;
        }
        self.heap.pop().map(|e| Scheduled {
            due: e.due,
            affinity: e.affinity,
            task: e.task,
        })
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_by_due_then_seq() {
        let mut queue = TaskQueue::new();
        queue.push(5, 0, Affinity::Global, "late");
        queue.push(2, 2, Affinity::Global, "second");
        queue.push(2, 1, Affinity::Global, "first");

        assert!(queue.pop_if_ready(1).is_none());
        assert_eq!(queue.pop_if_ready(4).map(|s| s.task), Some("first"));
        assert_eq!(queue.pop_if_ready(4).map(|s| s.task), Some("second"));
        assert!(queue.pop_if_ready(4).is_none());
        assert_eq!(queue.peek_key(), Some((5, 0)));
        assert_eq!(queue.pop_if_ready(5).map(|s| s.due), Some(5));
        assert!(queue.is_empty());
    }
}

//! Slicing the candidate list into batches
//!
//! One slice runs per scheduling turn. After a slice the session either
//! continues with the next one, or ends: the list is exhausted, the actor ran
//! out of daily quota, or the slice made no progress. The last rule keeps a
//! session whose remaining candidates are all protected from spinning.
//! Candidates that were already gone count as progress.

use std::ops::Range;

use crate::quota::block_quota_exhausted;
use crate::world::{BlockWorld, Position};
use super::executor::{remove_canopy_block, RemovalHooks, RemovalOutcome};
use super::session::{RemovalSession, SessionPhase};

/// What follows a slice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SliceVerdict {
    /// Run the slice starting at `next_start` on the next turn
    Continue { next_start: usize },
    Exhausted,
    Stalled,
    QuotaExhausted,
}

impl SliceVerdict {
    /// Whether the session ends after this slice
    pub fn is_final(self) -> bool {
        !matches!(self, SliceVerdict::Continue { .. })
    }
}

/// Summary of one executed slice
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SliceResult {
    /// Candidate indices covered by the slice
    pub range: Range<usize>,
    pub removed: usize,
    pub skipped: usize,
    /// Outcome of every candidate the slice reached, in order. A slice cut
    /// short by the daily limit ends with a `QuotaExceeded` entry.
    pub outcomes: Vec<(Position, RemovalOutcome)>,
    pub verdict: SliceVerdict,
}

/// Indices of the slice starting at `start`
pub fn slice_range(len: usize, start: usize, batch_size: usize) -> Range<usize> {
    let start = start.min(len);
    start..start.saturating_add(batch_size.max(1)).min(len)
}

/// Verdict for a slice ending at `end` that resolved `progressed`
/// candidates, counting removals and blocks that were already gone
pub fn verdict_after(end: usize, len: usize, progressed: usize) -> SliceVerdict {
    if end >= len {
        SliceVerdict::Exhausted
    } else if progressed == 0 {
        SliceVerdict::Stalled
    } else {
        SliceVerdict::Continue { next_start: end }
    }
}

/// Every slice of a list when nothing stalls
pub fn plan_slices(len: usize, batch_size: usize) -> Vec<Range<usize>> {
    let mut slices = Vec::new();
    let mut start = 0;
    while start < len {
        let range = slice_range(len, start, batch_size);
        start = range.end;
        slices.push(range);
    }
    slices
}

/// Run the slice starting at `start` through the executor
pub fn run_slice<W: BlockWorld + ?Sized>(
    world: &mut W,
    session: &mut RemovalSession,
    start: usize,
    hooks: &RemovalHooks,
) -> SliceResult {
    let len = session.candidates().len();
    let range = slice_range(len, start, session.config().effective_batch_size());
    session.set_phase(SessionPhase::BatchProcessing {
        slice: session.report.slices,
    });

    let mut removed = 0;
    let mut skipped = 0;
    let mut vanished = 0;
    let mut quota_hit = false;
    let mut outcomes = Vec::with_capacity(range.len());

    for index in range.clone() {
        let pos = session.candidates()[index];
        let outcome = if block_quota_exhausted(session.actor(), &*hooks.quota, session.config()) {
            RemovalOutcome::QuotaExceeded
        } else {
            remove_canopy_block(world, session, pos, hooks)
        };
        log::trace!("Candidate {} at {}: {:?}", index, pos, outcome);
        outcomes.push((pos, outcome));

        match outcome {
            RemovalOutcome::Removed => removed += 1,
            RemovalOutcome::QuotaExceeded => {
                log::debug!("Session {} stopped at the daily block limit", session.id());
                quota_hit = true;
                break;
            }
            // Already gone counts as progress: the block is no longer floating
            RemovalOutcome::NotCanopy => {
                vanished += 1;
                skipped += 1;
            }
            _ => skipped += 1,
        }
    }

    session.report.slices += 1;
    session.report.removed += removed;
    session.report.skipped += skipped;

    let verdict = if quota_hit {
        SliceVerdict::QuotaExhausted
    } else {
        verdict_after(range.end, len, removed + vanished)
    };

    log::debug!(
        "Session {} slice {:?}: removed {}, skipped {}, {:?}",
        session.id(),
        range,
        removed,
        skipped,
        verdict
    );

    SliceResult {
        range,
        removed,
        skipped,
        outcomes,
        verdict,
    }
}

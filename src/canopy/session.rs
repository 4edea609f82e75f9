//! Removal sessions and the per-actor session store

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::config::RemovalConfig;
use crate::core::{Error, Result};
use crate::world::{Actor, ActorId, BlockView, Position};
use super::classifier::OrphanClassifier;
use super::scan::scan_for_orphans;

/// Identity of one session: the actor plus the tick it was created on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId {
    pub actor: ActorId,
    pub created_tick: u64,
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.actor, self.created_tick)
    }
}

/// Lifecycle of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the scan due at `scan_at`
    Scheduled { scan_at: u64 },
    Scanning,
    /// Slice `slice` (zero-based) is the next or current one
    BatchProcessing { slice: usize },
    Completed,
}

/// Why a session ended
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionEnd {
    /// Still running
    #[default]
    Running,
    /// The scan found no orphaned canopy
    NothingFound,
    /// Every candidate was processed
    Exhausted,
    /// A slice made no progress while candidates remained
    Stalled,
    /// The actor hit the daily block limit
    QuotaExhausted,
}

/// Counters reported when a session completes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionReport {
    pub session: SessionId,
    /// Canopy positions examined by the scan
    pub scanned: usize,
    /// Examined positions classified as orphaned
    pub candidates: usize,
    pub removed: usize,
    /// Candidates processed without being removed
    pub skipped: usize,
    /// Slices executed
    pub slices: usize,
    pub end: SessionEnd,
}

impl SessionReport {
    fn new(session: SessionId) -> Self {
        Self {
            session,
            scanned: 0,
            candidates: 0,
            removed: 0,
            skipped: 0,
            slices: 0,
            end: SessionEnd::Running,
        }
    }
}

/// One removal operation covering the canopy consequences of a felling.
///
/// `scanned_canopy` holds resolved positions: those the scan judged still
/// supported, and candidates the executor has finished with. A candidate
/// waiting for its slice is in neither set, and one being committed is only
/// in `in_flight`, so the two sets never overlap.
pub struct RemovalSession {
    id: SessionId,
    actor: Actor,
    origin: Position,
    nether_felling: bool,
    config: Arc<RemovalConfig>,
    removed_trunks: HashSet<Position>,
    scanned_canopy: HashSet<Position>,
    in_flight: HashSet<Position>,
    candidates: Vec<Position>,
    phase: SessionPhase,
    pub(crate) report: SessionReport,
}

impl RemovalSession {
    pub fn new(
        actor: Actor,
        origin: Position,
        nether_felling: bool,
        config: Arc<RemovalConfig>,
        created_tick: u64,
    ) -> Self {
        let id = SessionId {
            actor: actor.id,
            created_tick,
        };
        let scan_at = created_tick.saturating_add(config.effective_delay_ticks());
        Self {
            id,
            actor,
            origin,
            nether_felling,
            config,
            removed_trunks: HashSet::new(),
            scanned_canopy: HashSet::new(),
            in_flight: HashSet::new(),
            candidates: Vec::new(),
            phase: SessionPhase::Scheduled { scan_at },
            report: SessionReport::new(id),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Position of the trunk block that started the felling
    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn nether_felling(&self) -> bool {
        self.nether_felling
    }

    /// Configuration captured when the session was created
    pub fn config(&self) -> &RemovalConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn report(&self) -> &SessionReport {
        &self.report
    }

    pub fn removed_trunks(&self) -> &HashSet<Position> {
        &self.removed_trunks
    }

    pub fn scanned_canopy(&self) -> &HashSet<Position> {
        &self.scanned_canopy
    }

    pub fn in_flight(&self) -> &HashSet<Position> {
        &self.in_flight
    }

    /// Candidate list produced by the scan, in processing order
    pub fn candidates(&self) -> &[Position] {
        &self.candidates
    }

    /// Record a felled trunk position. The set only ever grows.
    pub fn track_removed_trunk(&mut self, pos: Position) -> bool {
        self.removed_trunks.insert(pos)
    }

    /// Scan around the origin and append newly found orphans to the
    /// candidate list. Returns the number of new candidates.
    pub fn run_scan<V: BlockView + ?Sized>(&mut self, view: &V, parallel: bool) -> usize {
        self.phase = SessionPhase::Scanning;

        // Candidates still waiting for their slice are not resolved yet but
        // must not be found twice.
        let pending: HashSet<Position>;
        let skip = if self.candidates.is_empty() {
            &self.scanned_canopy
        } else {
            pending = self.scanned_canopy.iter().chain(&self.candidates).copied().collect();
            &pending
        };

        let classifier = OrphanClassifier::new(&self.removed_trunks, &self.config, self.nether_felling);
        let outcome = scan_for_orphans(view, self.origin, &self.config, &classifier, skip, parallel);

        self.scanned_canopy.extend(outcome.retained());
        self.report.scanned += outcome.examined.len();
        self.report.candidates += outcome.candidates.len();

        log::debug!(
            "Session {} scanned {} canopy blocks, {} orphaned",
            self.id,
            outcome.examined.len(),
            outcome.candidates.len()
        );

        let found = outcome.candidates.len();
        self.candidates.extend(outcome.candidates);
        found
    }

    pub(crate) fn set_phase(&mut self, phase: SessionPhase) {
        self.phase = phase;
    }

    /// Mark a candidate as being committed. False if it already is.
    pub(crate) fn begin_commit(&mut self, pos: Position) -> bool {
        self.scanned_canopy.remove(&pos);
        self.in_flight.insert(pos)
    }

    /// Mark a candidate as resolved, whatever its outcome
    pub(crate) fn resolve(&mut self, pos: Position) {
        self.in_flight.remove(&pos);
        self.scanned_canopy.insert(pos);
    }
}

impl fmt::Debug for RemovalSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemovalSession")
            .field("id", &self.id)
            .field("origin", &self.origin)
            .field("phase", &self.phase)
            .field("removed_trunks", &self.removed_trunks.len())
            .field("scanned_canopy", &self.scanned_canopy.len())
            .field("candidates", &self.candidates.len())
            .finish()
    }
}

/// Active sessions, at most one per actor
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<ActorId, RemovalSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session, rejecting it if its actor already has one.
    /// The existing session is left untouched.
    pub fn admit(&mut self, session: RemovalSession) -> Result<&mut RemovalSession> {
        match self.sessions.entry(session.actor.id) {
            Entry::Occupied(_) => Err(Error::SessionActive {
                actor: session.actor.id,
            }),
            Entry::Vacant(slot) => Ok(slot.insert(session)),
        }
    }

    pub fn is_active(&self, actor: &ActorId) -> bool {
        self.sessions.contains_key(actor)
    }

    pub fn get(&self, actor: &ActorId) -> Option<&RemovalSession> {
        self.sessions.get(actor)
    }

    pub fn get_mut(&mut self, actor: &ActorId) -> Option<&mut RemovalSession> {
        self.sessions.get_mut(actor)
    }

    /// Session with exactly this id; a later session of the same actor does not match
    pub fn by_id_mut(&mut self, id: SessionId) -> Option<&mut RemovalSession> {
        self.sessions.get_mut(&id.actor).filter(|s| s.id == id)
    }

    /// Remove and return an actor's session
    pub fn finish(&mut self, actor: &ActorId) -> Option<RemovalSession> {
        self.sessions.remove(actor)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RemovalSession> {
        self.sessions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Material, SparseWorld, WorldId};

    fn pos(x: i32, y: i32, z: i32) -> Position {
        Position::new(WorldId(0), x, y, z)
    }

    fn session_for(actor: &Actor, tick: u64) -> RemovalSession {
        RemovalSession::new(actor.clone(), pos(0, 0, 0), false, Arc::new(RemovalConfig::default()), tick)
    }

    #[test]
    fn test_scan_delay_has_minimum() {
        let actor = Actor::new(ActorId::random());
        let session = session_for(&actor, 100);
        assert_eq!(session.phase(), SessionPhase::Scheduled { scan_at: 160 });
    }

    #[test]
    fn test_removed_trunks_only_grow() {
        let actor = Actor::new(ActorId::random());
        let mut session = session_for(&actor, 0);
        assert!(session.track_removed_trunk(pos(0, 0, 0)));
        assert!(!session.track_removed_trunk(pos(0, 0, 0)));
        assert!(session.track_removed_trunk(pos(0, 1, 0)));
        assert_eq!(session.removed_trunks().len(), 2);
    }

    #[test]
    fn test_second_session_rejected() {
        let actor = Actor::new(ActorId::random());
        let mut store = SessionStore::new();

        let first = store.admit(session_for(&actor, 0)).expect("first session admitted");
        first.track_removed_trunk(pos(0, 0, 0));

        let err = store.admit(session_for(&actor, 5)).unwrap_err();
        assert!(matches!(err, Error::SessionActive { actor: a } if a == actor.id));

        let kept = store.get(&actor.id).expect("first session still active");
        assert_eq!(kept.id().created_tick, 0);
        assert_eq!(kept.removed_trunks().len(), 1);
        assert!(kept.scanned_canopy().is_empty());
    }

    #[test]
    fn test_lookup_by_stale_id_misses() {
        let actor = Actor::new(ActorId::random());
        let mut store = SessionStore::new();
        let old_id = SessionId { actor: actor.id, created_tick: 1 };

        store.admit(session_for(&actor, 2)).expect("admitted");
        assert!(store.by_id_mut(old_id).is_none());
        assert!(store.by_id_mut(SessionId { actor: actor.id, created_tick: 2 }).is_some());

        assert!(store.finish(&actor.id).is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn test_scan_and_commit_keep_sets_disjoint() {
        let mut world = SparseWorld::new();
        let trunk = world.plant_tree(pos(0, 0, 0), 4, Material::OakLog, Material::OakLeaves, 1);
        for p in &trunk {
            world.place(*p, Material::Air);
        }

        let actor = Actor::new(ActorId::random());
        let mut session = session_for(&actor, 0);
        for p in trunk {
            session.track_removed_trunk(p);
        }

        let found = session.run_scan(&world, false);
        assert_eq!(found, session.candidates().len());
        assert!(found > 0);
        assert_eq!(session.report().candidates, found);

        let first = session.candidates()[0];
        assert!(!session.scanned_canopy().contains(&first));
        assert!(session.begin_commit(first));
        assert!(!session.begin_commit(first));
        assert!(session.scanned_canopy().is_disjoint(session.in_flight()));
        session.resolve(first);
        assert!(session.scanned_canopy().contains(&first));
        assert!(session.in_flight().is_empty());

        // A repeat scan never returns a position already seen
        assert_eq!(session.run_scan(&world, false), 0);
    }
}

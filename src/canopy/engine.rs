//! The canopy engine: admission, trunk intake and tick-driven execution
//!
//! A felling starts a session with [`CanopyEngine::begin_removal_session`]
//! (or [`CanopyEngine::begin_felling`], which works out the nether context),
//! then reports every broken trunk through
//! [`CanopyEngine::track_removed_trunk`]. The scan is queued after the
//! configured delay, pinned to the origin's region. Its classification may
//! fan out over the rayon pool but only reads the world; the first slice is
//! then queued for the region owning the first candidate, and every later
//! slice one tick after its predecessor. The host calls
//! [`CanopyEngine::run_tick`] once per simulation tick.

use std::sync::Arc;

use crate::config::ConfigProvider;
use crate::core::{Error, Result};
use crate::schedule::{Affinity, GlobalScheduler, RegionScheduler, TickScheduler};
use crate::world::{Actor, ActorId, BlockView, BlockWorld, Material, Position, RegionKey, PERMISSION_CLEAR_CANOPY};
use super::batch::{run_slice, SliceVerdict};
use super::executor::RemovalHooks;
use super::predicates::is_nether_felling;
use super::session::{RemovalSession, SessionEnd, SessionId, SessionPhase, SessionReport, SessionStore};

/// Work queued on the scheduler on behalf of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionTask {
    Scan(SessionId),
    Batch { session: SessionId, start: usize },
}

impl SessionTask {
    pub fn session(&self) -> SessionId {
        match *self {
            SessionTask::Scan(id) => id,
            SessionTask::Batch { session, .. } => session,
        }
    }
}

/// Orphaned canopy removal engine
pub struct CanopyEngine<S: TickScheduler<SessionTask> = GlobalScheduler<SessionTask>> {
    config: Arc<ConfigProvider>,
    scheduler: S,
    sessions: SessionStore,
    hooks: RemovalHooks,
}

impl<S: TickScheduler<SessionTask>> CanopyEngine<S> {
    pub fn new(config: Arc<ConfigProvider>, scheduler: S, hooks: RemovalHooks) -> Self {
        Self {
            config,
            scheduler,
            sessions: SessionStore::new(),
            hooks,
        }
    }

    pub fn config(&self) -> &Arc<ConfigProvider> {
        &self.config
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn hooks(&self) -> &RemovalHooks {
        &self.hooks
    }

    /// Active session of an actor
    pub fn session(&self, actor: &ActorId) -> Option<&RemovalSession> {
        self.sessions.get(actor)
    }

    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    /// Open a session for a felling that started at `origin`.
    ///
    /// Rejected when canopy removal is disabled, the actor lacks
    /// `atcplus.leaves`, or the actor already has an active session. The
    /// configuration snapshot taken here is used for the whole session.
    pub fn begin_removal_session(&mut self, origin: Position, actor: &Actor, nether_context: bool) -> Result<SessionId> {
        let config = self.config.snapshot();
        if !config.enable_leaf_removal {
            return Err(Error::LeafRemovalDisabled);
        }
        if !actor.has_permission(PERMISSION_CLEAR_CANOPY) {
            return Err(Error::MissingPermission {
                actor: actor.id,
                permission: PERMISSION_CLEAR_CANOPY,
            });
        }
        if self.sessions.is_active(&actor.id) {
            log::debug!("Ignoring felling by {}: a session is already running", actor.id);
            return Err(Error::SessionActive { actor: actor.id });
        }

        let nether_felling = config.enable_nether_fungi && nether_context;
        let delay = config.effective_delay_ticks();
        let session = RemovalSession::new(actor.clone(), origin, nether_felling, config, self.scheduler.now());
        let id = session.id();
        self.sessions.admit(session)?;
        self.scheduler.schedule(delay, Affinity::of(origin), SessionTask::Scan(id));

        log::info!(
            "Started canopy session {} at {} (scan in {} ticks{})",
            id,
            origin,
            delay,
            if nether_felling { ", nether" } else { "" }
        );
        Ok(id)
    }

    /// [`begin_removal_session`](Self::begin_removal_session), deriving the
    /// nether context from the felled material and the world's dimension.
    pub fn begin_felling<V: BlockView + ?Sized>(
        &mut self,
        view: &V,
        origin: Position,
        felled: Material,
        actor: &Actor,
    ) -> Result<SessionId> {
        let config = self.config.snapshot();
        let nether = is_nether_felling(&config, felled, view.dimension(origin.world));
        self.begin_removal_session(origin, actor, nether)
    }

    /// Record a trunk block broken by the felling routine
    pub fn track_removed_trunk(&mut self, pos: Position, actor: &ActorId) -> Result<()> {
        let session = self
            .sessions
            .get_mut(actor)
            .ok_or(Error::UnknownSession { actor: *actor })?;
        session.track_removed_trunk(pos);
        Ok(())
    }

    /// Advance one tick and run everything that became due.
    /// Returns the reports of sessions that completed during the tick.
    pub fn run_tick<W: BlockWorld + ?Sized>(&mut self, world: &mut W) -> Vec<SessionReport> {
        self.scheduler.advance();
        self.drain(world)
    }

    /// Run every task due at the current tick, including tasks queued with
    /// no delay while draining.
    pub fn drain<W: BlockWorld + ?Sized>(&mut self, world: &mut W) -> Vec<SessionReport> {
        let mut completed = Vec::new();
        while let Some(job) = self.scheduler.pop_ready() {
            if let Some(report) = self.dispatch(world, job.task) {
                completed.push(report);
            }
        }
        completed
    }

    /// Tick until nothing is queued or `max_ticks` ticks have passed
    pub fn run_until_idle<W: BlockWorld + ?Sized>(&mut self, world: &mut W, max_ticks: u64) -> Vec<SessionReport> {
        let mut reports = self.drain(world);
        for _ in 0..max_ticks {
            if self.scheduler.pending() == 0 {
                break;
            }
            reports.extend(self.run_tick(world));
        }
        reports
    }

    fn dispatch<W: BlockWorld + ?Sized>(&mut self, world: &mut W, task: SessionTask) -> Option<SessionReport> {
        match task {
            SessionTask::Scan(id) => self.scan(world, id),
            SessionTask::Batch { session, start } => self.batch(world, session, start),
        }
    }

    fn scan<W: BlockWorld + ?Sized>(&mut self, world: &mut W, id: SessionId) -> Option<SessionReport> {
        let Some(session) = self.sessions.by_id_mut(id) else {
            log::debug!("Dropping scan for finished session {}", id);
            return None;
        };

        let parallel = session.config().leaf_removal_async;
        session.run_scan(&*world, parallel);

        let Some(&first) = session.candidates().first() else {
            return self.complete(id, SessionEnd::NothingFound);
        };
        session.set_phase(SessionPhase::BatchProcessing { slice: 0 });
        self.scheduler.schedule(0, Affinity::of(first), SessionTask::Batch { session: id, start: 0 });
        None
    }

    fn batch<W: BlockWorld + ?Sized>(&mut self, world: &mut W, id: SessionId, start: usize) -> Option<SessionReport> {
        let Some(session) = self.sessions.by_id_mut(id) else {
            log::debug!("Dropping batch for finished session {}", id);
            return None;
        };

        let result = run_slice(world, session, start, &self.hooks);
        match result.verdict {
            SliceVerdict::Continue { next_start } => {
                session.set_phase(SessionPhase::BatchProcessing {
                    slice: session.report().slices,
                });
                let next = session.candidates()[next_start];
                self.scheduler.schedule(
                    1,
                    Affinity::of(next),
                    SessionTask::Batch {
                        session: id,
                        start: next_start,
                    },
                );
                None
            }
            SliceVerdict::Exhausted => self.complete(id, SessionEnd::Exhausted),
            SliceVerdict::Stalled => {
                log::warn!(
                    "Session {} made no progress in slice {:?}, ending with {} candidates left",
                    id,
                    result.range,
                    session.candidates().len() - result.range.end
                );
                self.complete(id, SessionEnd::Stalled)
            }
            SliceVerdict::QuotaExhausted => self.complete(id, SessionEnd::QuotaExhausted),
        }
    }

    fn complete(&mut self, id: SessionId, end: SessionEnd) -> Option<SessionReport> {
        let mut session = self.sessions.finish(&id.actor)?;
        session.set_phase(SessionPhase::Completed);
        session.report.end = end;
        let report = session.report;
        log::info!(
            "Canopy session {} finished ({:?}): scanned {}, removed {}, skipped {} in {} slices",
            id,
            end,
            report.scanned,
            report.removed,
            report.skipped,
            report.slices
        );
        Some(report)
    }
}

impl CanopyEngine<RegionScheduler<SessionTask>> {
    /// Run the due tasks pinned to one region, as that region's thread would.
    /// Global tasks are left for [`drain`](Self::drain).
    pub fn drain_region<W: BlockWorld + ?Sized>(&mut self, world: &mut W, region: RegionKey) -> Vec<SessionReport> {
        let mut completed = Vec::new();
        while let Some(job) = self.scheduler.pop_ready_in(region) {
            if let Some(report) = self.dispatch(world, job.task) {
                completed.push(report);
            }
        }
        completed
    }
}

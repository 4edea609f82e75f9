//! Removal executor and the collaborator hooks it consults

use std::sync::Arc;

use crate::quota::QuotaStore;
use crate::world::{Actor, ActorId, BlockWorld, Material, Position};
use super::predicates::is_canopy;
use super::session::RemovalSession;

/// A land-claim system that may protect positions from an actor
pub trait LandPermission: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    fn allows(&self, pos: Position, actor: &Actor) -> bool;
}

/// Notification raised just before a canopy block is broken
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BreakEvent {
    pub pos: Position,
    pub material: Material,
    pub actor: ActorId,
    cancelled: bool,
}

impl BreakEvent {
    pub fn new(pos: Position, material: Material, actor: ActorId) -> Self {
        Self {
            pos,
            material,
            actor,
            cancelled: false,
        }
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Listener that can veto a break
pub trait BreakListener: Send + Sync {
    fn on_break(&self, event: &mut BreakEvent);
}

/// Fire-and-forget visual feedback for a removed block
pub trait EffectSink: Send + Sync {
    fn canopy_removed(&self, actor: &ActorId, pos: Position, material: Material);
}

/// External collaborators consulted while removing canopy
pub struct RemovalHooks {
    pub permissions: Vec<Box<dyn LandPermission>>,
    pub listeners: Vec<Box<dyn BreakListener>>,
    pub effects: Vec<Box<dyn EffectSink>>,
    pub quota: Arc<dyn QuotaStore>,
}

impl RemovalHooks {
    /// Hooks with no claim systems, listeners or effects
    pub fn new(quota: Arc<dyn QuotaStore>) -> Self {
        Self {
            permissions: Vec::new(),
            listeners: Vec::new(),
            effects: Vec::new(),
            quota,
        }
    }

    pub fn with_permission(mut self, hook: impl LandPermission + 'static) -> Self {
        self.permissions.push(Box::new(hook));
        self
    }

    pub fn with_listener(mut self, listener: impl BreakListener + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn with_effects(mut self, sink: impl EffectSink + 'static) -> Self {
        self.effects.push(Box::new(sink));
        self
    }
}

/// What happened to one candidate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemovalOutcome {
    Removed,
    /// Already being committed; nothing done
    AlreadyInFlight,
    /// A land-claim hook protects the position
    PermissionDenied,
    /// A break listener vetoed the removal
    EventCancelled,
    /// The actor's daily block limit was reached before this candidate
    QuotaExceeded,
    /// The block is no longer canopy
    NotCanopy,
}

impl RemovalOutcome {
    pub fn is_removed(self) -> bool {
        self == RemovalOutcome::Removed
    }
}

/// Remove one candidate on behalf of the session's actor.
///
/// Every outcome other than [`RemovalOutcome::AlreadyInFlight`] resolves the
/// candidate for the rest of the session; nothing is retried.
pub fn remove_canopy_block<W: BlockWorld + ?Sized>(
    world: &mut W,
    session: &mut RemovalSession,
    pos: Position,
    hooks: &RemovalHooks,
) -> RemovalOutcome {
    if session.in_flight().contains(&pos) {
        return RemovalOutcome::AlreadyInFlight;
    }

    let material = world.material_at(pos);
    if !is_canopy(material, session.config()) {
        session.resolve(pos);
        return RemovalOutcome::NotCanopy;
    }

    if let Some(hook) = hooks.permissions.iter().find(|h| !h.allows(pos, session.actor())) {
        log::trace!("{} denies canopy removal at {} for {}", hook.name(), pos, session.actor().id);
        session.resolve(pos);
        return RemovalOutcome::PermissionDenied;
    }

    session.begin_commit(pos);

    let mut event = BreakEvent::new(pos, material, session.actor().id);
    for listener in &hooks.listeners {
        listener.on_break(&mut event);
    }
    if event.is_cancelled() {
        log::trace!("Break of {} at {} cancelled by listener", material, pos);
        session.resolve(pos);
        return RemovalOutcome::EventCancelled;
    }

    let config = session.config();
    if config.leaf_removal_drop_items {
        world.break_naturally(pos);
    } else {
        world.set_material(pos, Material::Air);
    }

    if config.leaf_removal_counts_towards_limit {
        hooks.quota.increment_daily_blocks_broken(&session.actor().id);
    }

    if config.leaf_removal_visual_effects {
        for sink in &hooks.effects {
            sink.canopy_removed(&session.actor().id, pos, material);
        }
    }

    session.resolve(pos);
    RemovalOutcome::Removed
}

//! Error types for the canopy removal engine

use thiserror::Error;

use crate::world::ActorId;

/// Main error type for the engine
///
/// Only admission and configuration problems surface here. Per-block
/// failures during removal are reported as
/// [`RemovalOutcome`](crate::canopy::executor::RemovalOutcome) values instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Leaf removal is disabled")]
    LeafRemovalDisabled,

    #[error("Actor {actor} lacks permission {permission}")]
    MissingPermission {
        actor: ActorId,
        permission: &'static str,
    },

    #[error("A removal session is already active for actor {actor}")]
    SessionActive { actor: ActorId },

    #[error("No removal session for actor {actor}")]
    UnknownSession { actor: ActorId },
}

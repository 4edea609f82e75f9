//! Orphaned canopy detection and removal
//!
//! Leaves first: block predicates, bounded connectivity searches, the orphan
//! classifier, the radius scan, sessions, the per-block executor, batch
//! slicing and finally the tick-driven engine.

pub mod predicates;
pub mod search;
pub mod classifier;
pub mod scan;
pub mod session;
pub mod executor;
pub mod batch;
pub mod engine;

pub use predicates::BlockKind;
pub use classifier::{OrphanClassifier, RADIUS_MODE_DISTANCE, SMART_SHORTCUT_DISTANCE};
pub use scan::ScanOutcome;
pub use session::{RemovalSession, SessionEnd, SessionId, SessionPhase, SessionReport, SessionStore};
pub use executor::{BreakEvent, BreakListener, EffectSink, LandPermission, RemovalHooks, RemovalOutcome};
pub use batch::{SliceResult, SliceVerdict};
pub use engine::{CanopyEngine, SessionTask};

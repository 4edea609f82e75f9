//! Actors (players) that trigger felling

use std::collections::HashSet;
use std::fmt;

use uuid::Uuid;

/// Permission required to have orphaned canopy cleared after felling
pub const PERMISSION_CLEAR_CANOPY: &str = "atcplus.leaves";
/// Permission granting the VIP quota allowance
pub const PERMISSION_VIP: &str = "atcplus.vip";

/// Stable identity of an actor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Fresh random identity
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An actor together with the permissions it holds
#[derive(Clone, Debug)]
pub struct Actor {
    pub id: ActorId,
    permissions: HashSet<String>,
}

impl Actor {
    /// Create an actor with no permissions
    pub fn new(id: ActorId) -> Self {
        Self {
            id,
            permissions: HashSet::new(),
        }
    }

    /// Builder-style permission grant
    pub fn with_permission(mut self, permission: &str) -> Self {
        self.permissions.insert(permission.to_string());
        self
    }

    /// Check a permission node
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Whether this actor holds the VIP permission
    pub fn is_vip(&self) -> bool {
        self.has_permission(PERMISSION_VIP)
    }
}

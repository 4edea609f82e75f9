//! Block-level world model: positions, materials, actors and world access

pub mod position;
pub mod material;
pub mod actor;
pub mod sparse;

pub use position::{Position, RegionKey, WorldId, NEIGHBOR_OFFSETS, REGION_SHIFT};
pub use material::Material;
pub use actor::{Actor, ActorId, PERMISSION_CLEAR_CANOPY, PERMISSION_VIP};
pub use sparse::{BlockView, BlockWorld, Dimension, SparseWorld};

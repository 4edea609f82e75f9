//! World access traits and a sparse in-memory world

use std::collections::HashMap;

use crate::core::types::IVec3;
use super::material::Material;
use super::position::{Position, WorldId};

/// Environment a world belongs to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Dimension {
    #[default]
    Overworld,
    Nether,
    End,
}

/// Read-only block queries
///
/// `Sync` so that scans can classify candidates from worker threads.
pub trait BlockView: Sync {
    /// Material at a position (air where nothing is stored)
    fn material_at(&self, pos: Position) -> Material;

    /// Environment of a world
    fn dimension(&self, world: WorldId) -> Dimension;
}

/// Block mutation, only ever called on the thread owning the position's region
pub trait BlockWorld: BlockView {
    /// Replace a block without producing drops
    fn set_material(&mut self, pos: Position, material: Material);

    /// Break a block as a player would, producing its drops.
    /// Returns false when there was nothing to break.
    fn break_naturally(&mut self, pos: Position) -> bool;
}

/// Sparse block storage keyed by position
///
/// Only non-air blocks are stored. Natural breaks record the dropped material
/// so callers can inspect what was yielded.
#[derive(Debug, Default)]
pub struct SparseWorld {
    /// Non-air blocks
    blocks: HashMap<Position, Material>,
    /// Dimension per world; unlisted worlds are overworld
    dimensions: HashMap<WorldId, Dimension>,
    /// Materials yielded by natural breaks, in break order
    drops: Vec<(Position, Material)>,
    /// Positions changed since the last `take_modified`
    modified: Vec<Position>,
}

impl SparseWorld {
    /// Create a new empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the dimension of a world
    pub fn set_dimension(&mut self, world: WorldId, dimension: Dimension) {
        self.dimensions.insert(world, dimension);
    }

    /// Place a block, returning the previous material
    pub fn place(&mut self, pos: Position, material: Material) -> Material {
        self.modified.push(pos);
        if material.is_air() {
            self.blocks.remove(&pos).unwrap_or_default()
        } else {
            self.blocks.insert(pos, material).unwrap_or_default()
        }
    }

    /// Grow a simple tree: a vertical trunk of `height` blocks starting at
    /// `base`, topped by a cube of canopy of the given radius around the top.
    /// Canopy never overwrites trunk. Returns the trunk positions bottom-up.
    pub fn plant_tree(
        &mut self,
        base: Position,
        height: i32,
        trunk: Material,
        canopy: Material,
        canopy_radius: i32,
    ) -> Vec<Position> {
        let trunk_positions: Vec<Position> = (0..height)
            .map(|dy| base.offset(IVec3::new(0, dy, 0)))
            .collect();
        for &pos in &trunk_positions {
            self.place(pos, trunk);
        }

        let top = base.offset(IVec3::new(0, height - 1, 0));
        for x in -canopy_radius..=canopy_radius {
            for y in 0..=canopy_radius {
                for z in -canopy_radius..=canopy_radius {
                    let pos = top.offset(IVec3::new(x, y, z));
                    if self.material_at(pos).is_air() {
                        self.place(pos, canopy);
                    }
                }
            }
        }

        trunk_positions
    }

    /// Number of non-air blocks of a material
    pub fn count(&self, material: Material) -> usize {
        self.blocks.values().filter(|&&m| m == material).count()
    }

    /// Number of stored (non-air) blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Drops produced by natural breaks so far
    pub fn drops(&self) -> &[(Position, Material)] {
        &self.drops
    }

    /// Take the list of modified positions and clear the internal list
    pub fn take_modified(&mut self) -> Vec<Position> {
        std::mem::take(&mut self.modified)
    }
}

impl BlockView for SparseWorld {
    fn material_at(&self, pos: Position) -> Material {
        self.blocks.get(&pos).copied().unwrap_or_default()
    }

    fn dimension(&self, world: WorldId) -> Dimension {
        self.dimensions.get(&world).copied().unwrap_or_default()
    }
}

impl BlockWorld for SparseWorld {
    fn set_material(&mut self, pos: Position, material: Material) {
        self.place(pos, material);
    }

    fn break_naturally(&mut self, pos: Position) -> bool {
        let previous = self.place(pos, Material::Air);
        if previous.is_air() {
            return false;
        }
        self.drops.push((pos, previous));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: WorldId = WorldId(0);

    #[test]
    fn test_place_and_query() {
        let mut world = SparseWorld::new();
        let pos = Position::new(W, 1, 2, 3);
        assert_eq!(world.material_at(pos), Material::Air);

        assert_eq!(world.place(pos, Material::OakLog), Material::Air);
        assert_eq!(world.material_at(pos), Material::OakLog);
        assert_eq!(world.place(pos, Material::Air), Material::OakLog);
        assert_eq!(world.block_count(), 0);
    }

    #[test]
    fn test_break_naturally_records_drop() {
        let mut world = SparseWorld::new();
        let pos = Position::new(W, 0, 0, 0);
        world.place(pos, Material::OakLeaves);

        assert!(world.break_naturally(pos));
        assert!(!world.break_naturally(pos));
        assert_eq!(world.drops(), &[(pos, Material::OakLeaves)]);
    }

    #[test]
    fn test_set_material_has_no_drops() {
        let mut world = SparseWorld::new();
        let pos = Position::new(W, 0, 0, 0);
        world.place(pos, Material::OakLeaves);
        world.set_material(pos, Material::Air);
        assert!(world.drops().is_empty());
        assert_eq!(world.take_modified(), vec![pos, pos]);
        assert!(world.take_modified().is_empty());
    }

    #[test]
    fn test_plant_tree() {
        let mut world = SparseWorld::new();
        let trunk = world.plant_tree(Position::new(W, 0, 0, 0), 5, Material::OakLog, Material::OakLeaves, 2);

        assert_eq!(trunk.len(), 5);
        assert_eq!(trunk[4], Position::new(W, 0, 4, 0));
        assert_eq!(world.count(Material::OakLog), 5);
        // 5x3x5 cube around the top, minus the trunk block inside it
        assert_eq!(world.count(Material::OakLeaves), 5 * 3 * 5 - 1);
    }

    #[test]
    fn test_dimension_default() {
        let mut world = SparseWorld::new();
        assert_eq!(world.dimension(WorldId(7)), Dimension::Overworld);
        world.set_dimension(WorldId(7), Dimension::Nether);
        assert_eq!(world.dimension(WorldId(7)), Dimension::Nether);
    }
}

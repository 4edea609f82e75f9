//! Orphan classification under the three removal modes

use std::collections::HashSet;

use crate::config::{RemovalConfig, RemovalMode};
use crate::world::{BlockView, Position};
use super::predicates::is_nether_family_canopy;
use super::search::{has_active_trunk_within, reaches_active_trunk, reaches_removed_trunk};

/// Proximity distance used by [`RemovalMode::Radius`]
pub const RADIUS_MODE_DISTANCE: i32 = 4;

/// Proximity short-circuit distance used by [`RemovalMode::Smart`]
pub const SMART_SHORTCUT_DISTANCE: i32 = 6;

/// Decides whether canopy blocks lost their support after a felling.
///
/// Borrowed from a session for the duration of one scan.
#[derive(Clone, Copy, Debug)]
pub struct OrphanClassifier<'a> {
    removed: &'a HashSet<Position>,
    config: &'a RemovalConfig,
    nether_felling: bool,
}

impl<'a> OrphanClassifier<'a> {
    pub fn new(removed: &'a HashSet<Position>, config: &'a RemovalConfig, nether_felling: bool) -> Self {
        Self {
            removed,
            config,
            nether_felling,
        }
    }

    /// Whether the canopy block at `pos` is orphaned
    pub fn is_orphaned<V: BlockView + ?Sized>(&self, view: &V, pos: Position) -> bool {
        let material = view.material_at(pos);

        // Nether caps are only pruned when provably attached to the felled stem
        if self.config.enable_nether_fungi && self.nether_felling && is_nether_family_canopy(material) {
            return reaches_removed_trunk(view, pos, self.removed);
        }

        match self.config.leaf_removal_mode {
            RemovalMode::Aggressive => true,
            RemovalMode::Radius => {
                !has_active_trunk_within(view, pos, self.removed, self.config, RADIUS_MODE_DISTANCE)
            }
            RemovalMode::Smart => {
                !has_active_trunk_within(view, pos, self.removed, self.config, SMART_SHORTCUT_DISTANCE)
                    || !reaches_active_trunk(view, pos, self.removed, self.config)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Material, SparseWorld, WorldId};

    const W: WorldId = WorldId(0);

    fn pos(x: i32, y: i32, z: i32) -> Position {
        Position::new(W, x, y, z)
    }

    fn config_with(mode: RemovalMode) -> RemovalConfig {
        RemovalConfig {
            leaf_removal_mode: mode,
            ..RemovalConfig::default()
        }
    }

    /// Felled trunk at x=0, y=0..4 with canopy on top, plus a standing tree
    /// at x=10 whose canopy touches its trunk.
    fn felled_and_standing() -> (SparseWorld, HashSet<Position>) {
        let mut world = SparseWorld::new();
        world.place(pos(0, 5, 0), Material::OakLeaves);
        for y in 0..5 {
            world.place(pos(10, y, 0), Material::OakLog);
        }
        world.place(pos(10, 5, 0), Material::OakLeaves);
        let removed = (0..5).map(|y| pos(0, y, 0)).collect();
        (world, removed)
    }

    #[test]
    fn test_felled_canopy_orphaned_under_smart() {
        let (world, removed) = felled_and_standing();
        let config = config_with(RemovalMode::Smart);
        let classifier = OrphanClassifier::new(&removed, &config, false);
        assert!(classifier.is_orphaned(&world, pos(0, 5, 0)));
    }

    #[test]
    fn test_standing_canopy_kept_under_smart_removed_under_aggressive() {
        let (world, removed) = felled_and_standing();

        let smart = config_with(RemovalMode::Smart);
        assert!(!OrphanClassifier::new(&removed, &smart, false).is_orphaned(&world, pos(10, 5, 0)));

        let aggressive = config_with(RemovalMode::Aggressive);
        assert!(OrphanClassifier::new(&removed, &aggressive, false).is_orphaned(&world, pos(10, 5, 0)));
    }

    #[test]
    fn test_radius_mode_uses_fixed_distance() {
        let mut world = SparseWorld::new();
        world.place(pos(0, 0, 0), Material::OakLeaves);
        world.place(pos(5, 0, 0), Material::OakLog);
        let removed = HashSet::new();
        let config = config_with(RemovalMode::Radius);
        let classifier = OrphanClassifier::new(&removed, &config, false);

        assert!(classifier.is_orphaned(&world, pos(0, 0, 0)));

        world.place(pos(4, 0, 0), Material::OakLog);
        assert!(!classifier.is_orphaned(&world, pos(0, 0, 0)));
    }

    #[test]
    fn test_smart_needs_canopy_path() {
        // Trunk within 6 but separated by stone: proximity passes, path fails
        let mut world = SparseWorld::new();
        world.place(pos(0, 0, 0), Material::OakLeaves);
        world.place(pos(1, 0, 0), Material::Stone);
        world.place(pos(2, 0, 0), Material::OakLog);
        let removed = HashSet::new();

        let smart = config_with(RemovalMode::Smart);
        assert!(OrphanClassifier::new(&removed, &smart, false).is_orphaned(&world, pos(0, 0, 0)));

        let radius = config_with(RemovalMode::Radius);
        assert!(!OrphanClassifier::new(&removed, &radius, false).is_orphaned(&world, pos(0, 0, 0)));
    }

    #[test]
    fn test_mode_ordering() {
        let (world, removed) = felled_and_standing();
        for candidate in [pos(0, 5, 0), pos(10, 5, 0)] {
            let aggressive = config_with(RemovalMode::Aggressive);
            assert!(OrphanClassifier::new(&removed, &aggressive, false).is_orphaned(&world, candidate));

            let radius = config_with(RemovalMode::Radius);
            if OrphanClassifier::new(&removed, &radius, false).is_orphaned(&world, candidate) {
                assert!(!has_active_trunk_within(&world, candidate, &removed, &radius, RADIUS_MODE_DISTANCE));
            }

            let smart = config_with(RemovalMode::Smart);
            if OrphanClassifier::new(&removed, &smart, false).is_orphaned(&world, candidate) {
                assert!(!reaches_active_trunk(&world, candidate, &removed, &smart));
            }
        }
    }

    #[test]
    fn test_nether_canopy_requires_removed_connection() {
        let mut world = SparseWorld::new();
        world.place(pos(0, 5, 0), Material::NetherWartBlock);
        world.place(pos(20, 5, 0), Material::NetherWartBlock);
        let removed: HashSet<Position> = (0..5).map(|y| pos(0, y, 0)).collect();

        for mode in [RemovalMode::Aggressive, RemovalMode::Radius, RemovalMode::Smart] {
            let config = config_with(mode);
            let classifier = OrphanClassifier::new(&removed, &config, true);
            assert!(classifier.is_orphaned(&world, pos(0, 5, 0)));
            assert!(!classifier.is_orphaned(&world, pos(20, 5, 0)), "{mode:?}");
        }
    }

    #[test]
    fn test_nether_branch_needs_nether_context() {
        let mut world = SparseWorld::new();
        world.place(pos(20, 5, 0), Material::NetherWartBlock);
        let removed: HashSet<Position> = [pos(0, 0, 0)].into_iter().collect();
        let config = config_with(RemovalMode::Aggressive);

        // Outside a nether felling the block falls through to the mode rule
        assert!(OrphanClassifier::new(&removed, &config, false).is_orphaned(&world, pos(20, 5, 0)));

        let disabled = RemovalConfig {
            enable_nether_fungi: false,
            ..config_with(RemovalMode::Aggressive)
        };
        assert!(OrphanClassifier::new(&removed, &disabled, true).is_orphaned(&world, pos(20, 5, 0)));
    }
}

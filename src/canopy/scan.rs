//! Radius scan producing the orphaned-canopy candidate list

use std::collections::HashSet;

use rayon::prelude::*;

use crate::config::RemovalConfig;
use crate::core::types::IVec3;
use crate::world::{BlockView, Position};
use super::classifier::OrphanClassifier;
use super::predicates::is_canopy;

/// Result of one radius scan
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Canopy positions examined by this scan, in scan order
    pub examined: Vec<Position>,
    /// The orphaned subset of `examined`, in scan order
    pub candidates: Vec<Position>,
}

impl ScanOutcome {
    /// Examined positions that were judged still supported
    pub fn retained(&self) -> impl Iterator<Item = Position> + '_ {
        let candidates: HashSet<&Position> = self.candidates.iter().collect();
        self.examined.iter().filter(move |p| !candidates.contains(p)).copied()
    }
}

/// Canopy positions inside the Chebyshev cube of `radius` around `origin`
/// that are not in `skip`, ordered by x, then y, then z.
pub fn canopy_in_radius<V: BlockView + ?Sized>(
    view: &V,
    origin: Position,
    radius: i32,
    config: &RemovalConfig,
    skip: &HashSet<Position>,
) -> Vec<Position> {
    let mut found = Vec::new();
    for x in -radius..=radius {
        for y in -radius..=radius {
            for z in -radius..=radius {
                let pos = origin.offset(IVec3::new(x, y, z));
                if !skip.contains(&pos) && is_canopy(view.material_at(pos), config) {
                    found.push(pos);
                }
            }
        }
    }
    found
}

/// Examine every unresolved canopy block around `origin` and classify it.
///
/// With `parallel` set, classification runs on the rayon pool; the world is
/// only read, and candidate order matches the sequential scan.
pub fn scan_for_orphans<V: BlockView + ?Sized>(
    view: &V,
    origin: Position,
    config: &RemovalConfig,
    classifier: &OrphanClassifier<'_>,
    skip: &HashSet<Position>,
    parallel: bool,
) -> ScanOutcome {
    let examined = canopy_in_radius(view, origin, config.effective_radius(), config, skip);

    let verdicts: Vec<bool> = if parallel {
        examined.par_iter().map(|&pos| classifier.is_orphaned(view, pos)).collect()
    } else {
        examined.iter().map(|&pos| classifier.is_orphaned(view, pos)).collect()
    };

    let candidates = examined
        .iter()
        .zip(verdicts)
        .filter_map(|(&pos, orphaned)| orphaned.then_some(pos))
        .collect();

    ScanOutcome { examined, candidates }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemovalMode;
    use crate::world::{Material, SparseWorld, WorldId};

    const W: WorldId = WorldId(0);

    fn pos(x: i32, y: i32, z: i32) -> Position {
        Position::new(W, x, y, z)
    }

    /// Felled oak at the origin, its canopy left floating, and a standing
    /// oak five blocks away on x.
    fn felled_next_to_standing() -> (SparseWorld, HashSet<Position>) {
        let mut world = SparseWorld::new();
        let felled = world.plant_tree(pos(0, 0, 0), 5, Material::OakLog, Material::OakLeaves, 1);
        world.plant_tree(pos(5, 0, 0), 5, Material::OakLog, Material::OakLeaves, 1);
        for p in &felled {
            world.place(*p, Material::Air);
        }
        (world, felled.into_iter().collect())
    }

    #[test]
    fn test_scan_order_is_xyz() {
        let mut world = SparseWorld::new();
        world.place(pos(1, 0, 0), Material::OakLeaves);
        world.place(pos(0, 1, 0), Material::OakLeaves);
        world.place(pos(0, 0, 1), Material::OakLeaves);
        world.place(pos(-1, 0, 0), Material::OakLeaves);
        let config = RemovalConfig::default();

        let found = canopy_in_radius(&world, pos(0, 0, 0), 2, &config, &HashSet::new());
        assert_eq!(found, vec![pos(-1, 0, 0), pos(0, 0, 1), pos(0, 1, 0), pos(1, 0, 0)]);
    }

    #[test]
    fn test_scan_separates_orphans() {
        let (world, removed) = felled_next_to_standing();
        let config = RemovalConfig {
            leaf_removal_radius: 6,
            ..RemovalConfig::default()
        };
        let classifier = OrphanClassifier::new(&removed, &config, false);

        let outcome = scan_for_orphans(&world, pos(0, 0, 0), &config, &classifier, &HashSet::new(), false);

        assert!(!outcome.candidates.is_empty());
        assert!(outcome.candidates.iter().all(|p| p.coords.x <= 1));
        assert!(outcome.retained().all(|p| p.coords.x >= 4));
        assert!(outcome.retained().count() > 0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (world, removed) = felled_next_to_standing();
        let config = RemovalConfig {
            leaf_removal_mode: RemovalMode::Smart,
            ..RemovalConfig::default()
        };
        let classifier = OrphanClassifier::new(&removed, &config, false);

        let sequential = scan_for_orphans(&world, pos(0, 0, 0), &config, &classifier, &HashSet::new(), false);
        let parallel = scan_for_orphans(&world, pos(0, 0, 0), &config, &classifier, &HashSet::new(), true);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_scan_skips_resolved_positions() {
        let (world, removed) = felled_next_to_standing();
        let config = RemovalConfig::default();
        let classifier = OrphanClassifier::new(&removed, &config, false);

        let first = scan_for_orphans(&world, pos(0, 0, 0), &config, &classifier, &HashSet::new(), false);
        let resolved: HashSet<Position> = first.examined.iter().copied().collect();

        let second = scan_for_orphans(&world, pos(0, 0, 0), &config, &classifier, &resolved, false);
        assert!(second.examined.is_empty());
        assert!(second.candidates.iter().all(|p| !resolved.contains(p)));
    }
}

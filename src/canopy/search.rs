//! Bounded connectivity searches over the 26-neighbour block graph
//!
//! Both searches are depth-first with a shared visited set and give up once a
//! depth or visited-count bound is hit. Giving up counts as "not connected":
//! the bounds keep worst-case cost fixed on huge or pathological structures.
//!
//! The traversal uses an explicit stack of `(position, next neighbour)` frames
//! and visits neighbours in the same order a recursive walk would, so the
//! bounds cut off exactly the same part of the graph.

use std::collections::HashSet;

use crate::config::RemovalConfig;
use crate::core::types::IVec3;
use crate::world::{BlockView, Position, NEIGHBOR_OFFSETS};
use super::predicates::{is_canopy, is_nether_family_canopy, is_nether_family_trunk, is_trunk};

/// Depth and visited-count limits of one search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchBounds {
    /// Deepest frame that may still be entered
    pub max_depth: usize,
    /// Frames may only be entered while the visited set holds at most this many positions
    pub max_visited: usize,
}

/// Limits for the search towards a standing trunk
pub const ACTIVE_TRUNK_BOUNDS: SearchBounds = SearchBounds {
    max_depth: 8,
    max_visited: 100,
};

/// Limits for the nether-family search towards a felled trunk
pub const REMOVED_TRUNK_BOUNDS: SearchBounds = SearchBounds {
    max_depth: 12,
    max_visited: 200,
};

/// What the search should do with a neighbour
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Probe {
    Found,
    Descend,
    Skip,
}

fn bounded_dfs(start: Position, bounds: SearchBounds, mut probe: impl FnMut(Position) -> Probe) -> bool {
    let mut visited: HashSet<Position> = HashSet::with_capacity(bounds.max_visited + 1);
    visited.insert(start);
    let mut stack: Vec<(Position, usize)> = Vec::with_capacity(bounds.max_depth + 1);
    stack.push((start, 0));

    while let Some(frame) = stack.last_mut() {
        let (pos, next) = *frame;
        if next == NEIGHBOR_OFFSETS.len() {
            stack.pop();
            continue;
        }
        frame.1 += 1;

        let neighbor = pos.offset(NEIGHBOR_OFFSETS[next]);
        match probe(neighbor) {
            Probe::Found => return true,
            Probe::Skip => {}
            Probe::Descend => {
                // The child frame sits at depth == current stack length
                if stack.len() > bounds.max_depth || visited.len() > bounds.max_visited {
                    continue;
                }
                if visited.insert(neighbor) {
                    stack.push((neighbor, 0));
                }
            }
        }
    }

    false
}

/// Whether `start` connects to a standing trunk through canopy blocks.
///
/// A trunk counts as standing when it is a configured trunk type and its
/// position is not in `removed`. The start block itself is never tested.
pub fn reaches_active_trunk<V: BlockView + ?Sized>(
    view: &V,
    start: Position,
    removed: &HashSet<Position>,
    config: &RemovalConfig,
) -> bool {
    reaches_active_trunk_bounded(view, start, removed, config, ACTIVE_TRUNK_BOUNDS)
}

/// [`reaches_active_trunk`] with explicit bounds
pub fn reaches_active_trunk_bounded<V: BlockView + ?Sized>(
    view: &V,
    start: Position,
    removed: &HashSet<Position>,
    config: &RemovalConfig,
    bounds: SearchBounds,
) -> bool {
    bounded_dfs(start, bounds, |pos| {
        let material = view.material_at(pos);
        if is_trunk(material, config) && !removed.contains(&pos) {
            Probe::Found
        } else if is_canopy(material, config) {
            Probe::Descend
        } else {
            Probe::Skip
        }
    })
}

/// Whether `start` connects to a felled trunk position through nether-family
/// canopy or stem blocks.
///
/// An empty `removed` set means nothing is known about the felled tree, and
/// the answer is a permissive `true`.
pub fn reaches_removed_trunk<V: BlockView + ?Sized>(
    view: &V,
    start: Position,
    removed: &HashSet<Position>,
) -> bool {
    reaches_removed_trunk_bounded(view, start, removed, REMOVED_TRUNK_BOUNDS)
}

/// [`reaches_removed_trunk`] with explicit bounds
pub fn reaches_removed_trunk_bounded<V: BlockView + ?Sized>(
    view: &V,
    start: Position,
    removed: &HashSet<Position>,
    bounds: SearchBounds,
) -> bool {
    if removed.is_empty() || removed.contains(&start) {
        return true;
    }
    bounded_dfs(start, bounds, |pos| {
        if removed.contains(&pos) {
            return Probe::Found;
        }
        let material = view.material_at(pos);
        if is_nether_family_canopy(material) || is_nether_family_trunk(material) {
            Probe::Descend
        } else {
            Probe::Skip
        }
    })
}

/// Whether a standing trunk lies inside the Chebyshev cube of `radius`
/// around `center`, excluding the center itself.
pub fn has_active_trunk_within<V: BlockView + ?Sized>(
    view: &V,
    center: Position,
    removed: &HashSet<Position>,
    config: &RemovalConfig,
    radius: i32,
) -> bool {
    for x in -radius..=radius {
        for y in -radius..=radius {
            for z in -radius..=radius {
                if x == 0 && y == 0 && z == 0 {
                    continue;
                }
                let pos = center.offset(IVec3::new(x, y, z));
                if is_trunk(view.material_at(pos), config) && !removed.contains(&pos) {
                    return true;
                }
            }
        }
    }
    false
}

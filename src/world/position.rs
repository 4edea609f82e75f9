//! Block positions and region keys

use std::fmt;

use crate::core::types::IVec3;

/// Identifier of a loaded world (dimension instance)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldId(pub u32);

/// Integer block position inside a world
///
/// Plain value type: equality and hashing are structural.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub world: WorldId,
    pub coords: IVec3,
}

/// Regions are square columns of `1 << REGION_SHIFT` blocks on X and Z.
pub const REGION_SHIFT: i32 = 9;

/// The 26 offsets of the full 3x3x3 neighbourhood, excluding the centre.
pub const NEIGHBOR_OFFSETS: [IVec3; 26] = {
    let mut offsets = [IVec3::ZERO; 26];
    let mut i = 0;
    let mut x = -1;
    while x <= 1 {
        let mut y = -1;
        while y <= 1 {
            let mut z = -1;
            while z <= 1 {
                if !(x == 0 && y == 0 && z == 0) {
                    offsets[i] = IVec3::new(x, y, z);
                    i += 1;
                }
                z += 1;
            }
            y += 1;
        }
        x += 1;
    }
    offsets
};

impl Position {
    /// Create a new position
    pub const fn new(world: WorldId, x: i32, y: i32, z: i32) -> Self {
        Self {
            world,
            coords: IVec3::new(x, y, z),
        }
    }

    /// Position shifted by an offset, in the same world
    pub fn offset(self, delta: IVec3) -> Self {
        Self {
            world: self.world,
            coords: self.coords + delta,
        }
    }

    /// All 26 neighbours of this position
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        NEIGHBOR_OFFSETS.into_iter().map(move |d| self.offset(d))
    }

    /// Chebyshev (chessboard) distance, or `None` across worlds
    pub fn chebyshev_distance(&self, other: &Position) -> Option<i32> {
        if self.world != other.world {
            return None;
        }
        let d = (self.coords - other.coords).abs();
        Some(d.max_element())
    }

    /// Region owning this position
    pub fn region(&self) -> RegionKey {
        RegionKey {
            world: self.world,
            x: self.coords.x >> REGION_SHIFT,
            z: self.coords.z >> REGION_SHIFT,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@({}, {}, {})",
            self.world.0, self.coords.x, self.coords.y, self.coords.z
        )
    }
}

/// Key of the spatial region that owns a set of positions
///
/// On region-partitioned hosts every region is driven by its own thread; all
/// mutation of a position must happen on its region's thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionKey {
    pub world: WorldId,
    pub x: i32,
    pub z: i32,
}

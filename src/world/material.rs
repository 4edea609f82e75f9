//! Block materials

use std::fmt;
use std::str::FromStr;

macro_rules! materials {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Block material, named like the host server's material registry.
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Material {
            #[default]
            $($variant),*
        }

        impl Material {
            /// Every known material, in declaration order
            pub const ALL: &'static [Material] = &[$(Material::$variant),*];

            /// Registry name (SCREAMING_SNAKE_CASE)
            pub fn name(self) -> &'static str {
                match self {
                    $(Material::$variant => $name),*
                }
            }

            /// Look up a material by registry name
            pub fn from_name(name: &str) -> Option<Material> {
                match name {
                    $($name => Some(Material::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

materials! {
    Air => "AIR",
    Stone => "STONE",
    Water => "WATER",
    OakPlanks => "OAK_PLANKS",

    // Soils
    Dirt => "DIRT",
    GrassBlock => "GRASS_BLOCK",
    Podzol => "PODZOL",
    CoarseDirt => "COARSE_DIRT",
    RootedDirt => "ROOTED_DIRT",
    CrimsonNylium => "CRIMSON_NYLIUM",
    WarpedNylium => "WARPED_NYLIUM",
    Netherrack => "NETHERRACK",

    // Overworld trunks
    OakLog => "OAK_LOG",
    SpruceLog => "SPRUCE_LOG",
    BirchLog => "BIRCH_LOG",
    JungleLog => "JUNGLE_LOG",
    AcaciaLog => "ACACIA_LOG",
    DarkOakLog => "DARK_OAK_LOG",
    MangroveLog => "MANGROVE_LOG",
    CherryLog => "CHERRY_LOG",
    PaleOakLog => "PALE_OAK_LOG",
    StrippedOakLog => "STRIPPED_OAK_LOG",

    // Nether stems
    CrimsonStem => "CRIMSON_STEM",
    StrippedCrimsonStem => "STRIPPED_CRIMSON_STEM",
    CrimsonHyphae => "CRIMSON_HYPHAE",
    StrippedCrimsonHyphae => "STRIPPED_CRIMSON_HYPHAE",
    WarpedStem => "WARPED_STEM",
    StrippedWarpedStem => "STRIPPED_WARPED_STEM",
    WarpedHyphae => "WARPED_HYPHAE",
    StrippedWarpedHyphae => "STRIPPED_WARPED_HYPHAE",

    // Canopy
    OakLeaves => "OAK_LEAVES",
    SpruceLeaves => "SPRUCE_LEAVES",
    BirchLeaves => "BIRCH_LEAVES",
    JungleLeaves => "JUNGLE_LEAVES",
    AcaciaLeaves => "ACACIA_LEAVES",
    DarkOakLeaves => "DARK_OAK_LEAVES",
    MangroveLeaves => "MANGROVE_LEAVES",
    CherryLeaves => "CHERRY_LEAVES",
    PaleOakLeaves => "PALE_OAK_LEAVES",
    AzaleaLeaves => "AZALEA_LEAVES",
    NetherWartBlock => "NETHER_WART_BLOCK",
    WarpedWartBlock => "WARPED_WART_BLOCK",
    Shroomlight => "SHROOMLIGHT",
}

impl Material {
    /// Whether the block is empty space
    pub fn is_air(self) -> bool {
        self == Material::Air
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Material {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Material::from_name(s.trim()).ok_or_else(|| format!("unknown material: {s}"))
    }
}

//! Block classification against the configured type sets

use crate::config::RemovalConfig;
use crate::world::{Dimension, Material};

/// Nether fungus stems and hyphae, stripped or not
pub const NETHER_FAMILY_TRUNKS: [Material; 8] = [
    Material::CrimsonStem,
    Material::StrippedCrimsonStem,
    Material::CrimsonHyphae,
    Material::StrippedCrimsonHyphae,
    Material::WarpedStem,
    Material::StrippedWarpedStem,
    Material::WarpedHyphae,
    Material::StrippedWarpedHyphae,
];

/// Blocks forming a nether fungus cap
pub const NETHER_FAMILY_CANOPY: [Material; 3] = [
    Material::NetherWartBlock,
    Material::WarpedWartBlock,
    Material::Shroomlight,
];

/// What role a block plays for canopy removal
///
/// Derived per query from the live world and the session's configuration,
/// never cached beyond a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Trunk { nether_family: bool },
    Canopy { nether_family: bool },
    Soil,
    Other,
}

impl BlockKind {
    /// Classify a material
    pub fn of(material: Material, config: &RemovalConfig) -> Self {
        if is_trunk(material, config) || is_nether_family_trunk(material) {
            BlockKind::Trunk {
                nether_family: is_nether_family_trunk(material),
            }
        } else if is_canopy(material, config) || is_nether_family_canopy(material) {
            BlockKind::Canopy {
                nether_family: is_nether_family_canopy(material),
            }
        } else if is_soil(material, config) {
            BlockKind::Soil
        } else {
            BlockKind::Other
        }
    }
}

/// Configured trunk type
pub fn is_trunk(material: Material, config: &RemovalConfig) -> bool {
    config.log_types.contains(&material)
}

/// Configured canopy type
pub fn is_canopy(material: Material, config: &RemovalConfig) -> bool {
    config.leaf_types.contains(&material)
}

/// Configured soil type
pub fn is_soil(material: Material, config: &RemovalConfig) -> bool {
    config.valid_soil_types.contains(&material)
}

pub fn is_nether_family_trunk(material: Material) -> bool {
    NETHER_FAMILY_TRUNKS.contains(&material)
}

pub fn is_nether_family_canopy(material: Material) -> bool {
    NETHER_FAMILY_CANOPY.contains(&material)
}

/// Whether a felling action should use nether-family canopy semantics.
///
/// Requires nether handling to be enabled, and either a nether stem as the
/// felled trunk or a felling that happened in the nether.
pub fn is_nether_felling(config: &RemovalConfig, felled: Material, dimension: Dimension) -> bool {
    config.enable_nether_fungi
        && (is_nether_family_trunk(felled) || dimension == Dimension::Nether)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_kinds() {
        let config = RemovalConfig::default();
        assert_eq!(BlockKind::of(Material::OakLog, &config), BlockKind::Trunk { nether_family: false });
        assert_eq!(BlockKind::of(Material::WarpedStem, &config), BlockKind::Trunk { nether_family: true });
        assert_eq!(BlockKind::of(Material::BirchLeaves, &config), BlockKind::Canopy { nether_family: false });
        assert_eq!(BlockKind::of(Material::Shroomlight, &config), BlockKind::Canopy { nether_family: true });
        assert_eq!(BlockKind::of(Material::Podzol, &config), BlockKind::Soil);
        assert_eq!(BlockKind::of(Material::Stone, &config), BlockKind::Other);
        assert_eq!(BlockKind::of(Material::Air, &config), BlockKind::Other);
    }

    #[test]
    fn test_configured_sets_drive_predicates() {
        let mut config = RemovalConfig::default();
        config.leaf_types.remove(&Material::OakLeaves);
        assert!(!is_canopy(Material::OakLeaves, &config));
        assert!(is_canopy(Material::SpruceLeaves, &config));

        config.log_types.clear();
        assert!(!is_trunk(Material::OakLog, &config));
        // Family membership is intrinsic, not configured
        assert!(is_nether_family_trunk(Material::CrimsonHyphae));
    }

    #[test]
    fn test_nether_felling_context() {
        let mut config = RemovalConfig::default();
        assert!(is_nether_felling(&config, Material::CrimsonStem, Dimension::Overworld));
        assert!(is_nether_felling(&config, Material::OakLog, Dimension::Nether));
        assert!(!is_nether_felling(&config, Material::OakLog, Dimension::Overworld));

        config.enable_nether_fungi = false;
        assert!(!is_nether_felling(&config, Material::CrimsonStem, Dimension::Nether));
    }
}

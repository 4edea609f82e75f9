//! Leaf removal configuration document
//!
//! Keys are kebab-case and every key is optional: anything missing falls back
//! to the built-in default, so older documents keep working after upgrades.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::types::Result;
use crate::world::Material;

/// Lower bound on the delay between felling and the first scan, so the felling
/// routine has finished reporting trunks before anything is classified.
pub const MIN_SCAN_DELAY_TICKS: u64 = 60;

/// Rule used to decide whether a canopy block lost its support
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RemovalMode {
    /// Every canopy block in range is removed
    Aggressive,
    /// Removed when no standing trunk is within a fixed distance
    Radius,
    /// Proximity short-circuit followed by a connectivity search
    #[default]
    Smart,
}

impl RemovalMode {
    /// Parse a mode name; unknown names select `Smart`
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "aggressive" => RemovalMode::Aggressive,
            "radius" => RemovalMode::Radius,
            _ => RemovalMode::Smart,
        }
    }

    /// Canonical lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            RemovalMode::Aggressive => "aggressive",
            RemovalMode::Radius => "radius",
            RemovalMode::Smart => "smart",
        }
    }
}

impl Serialize for RemovalMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RemovalMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(RemovalMode::parse_lenient(&name))
    }
}

/// Configuration snapshot consumed by the removal engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RemovalConfig {
    /// Master switch for canopy removal
    pub enable_leaf_removal: bool,
    /// Requested delay before the first scan (raised to `MIN_SCAN_DELAY_TICKS`)
    pub leaf_removal_delay_ticks: u64,
    /// Half-size of the scanned cube around the felled trunk
    pub leaf_removal_radius: i32,
    /// Break naturally (with drops) instead of clearing to air
    pub leaf_removal_drop_items: bool,
    /// Emit a visual effect per removed block
    pub leaf_removal_visual_effects: bool,
    /// Classify scan candidates on the worker pool
    pub leaf_removal_async: bool,
    /// Candidates processed per scheduling turn
    pub leaf_removal_batch_size: usize,
    /// Removed canopy counts toward the daily block quota
    pub leaf_removal_counts_towards_limit: bool,
    pub leaf_removal_mode: RemovalMode,
    /// Nether fungus handling
    pub enable_nether_fungi: bool,
    pub max_blocks_per_day: u32,
    /// When false, VIP actors ignore the daily block quota entirely
    pub limit_vip_usage: bool,
    pub vip_blocks_per_day: u32,
    #[serde(serialize_with = "serialize_materials", deserialize_with = "deserialize_materials")]
    pub log_types: HashSet<Material>,
    #[serde(serialize_with = "serialize_materials", deserialize_with = "deserialize_materials")]
    pub leaf_types: HashSet<Material>,
    #[serde(serialize_with = "serialize_materials", deserialize_with = "deserialize_materials")]
    pub valid_soil_types: HashSet<Material>,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        use Material::*;
        Self {
            enable_leaf_removal: true,
            leaf_removal_delay_ticks: 40,
            leaf_removal_radius: 8,
            leaf_removal_drop_items: false,
            leaf_removal_visual_effects: true,
            leaf_removal_async: true,
            leaf_removal_batch_size: 20,
            leaf_removal_counts_towards_limit: false,
            leaf_removal_mode: RemovalMode::Smart,
            enable_nether_fungi: true,
            max_blocks_per_day: 500,
            limit_vip_usage: true,
            vip_blocks_per_day: 500,
            log_types: [
                OakLog, SpruceLog, BirchLog, JungleLog, AcaciaLog, DarkOakLog, MangroveLog,
                CherryLog, PaleOakLog, CrimsonStem, StrippedCrimsonStem, CrimsonHyphae,
                StrippedCrimsonHyphae, WarpedStem, StrippedWarpedStem, WarpedHyphae,
                StrippedWarpedHyphae,
            ]
            .into_iter()
            .collect(),
            leaf_types: [
                OakLeaves, SpruceLeaves, BirchLeaves, JungleLeaves, AcaciaLeaves, DarkOakLeaves,
                MangroveLeaves, CherryLeaves, PaleOakLeaves, NetherWartBlock, WarpedWartBlock,
                Shroomlight,
            ]
            .into_iter()
            .collect(),
            valid_soil_types: [
                Dirt, GrassBlock, Podzol, CoarseDirt, RootedDirt, CrimsonNylium, WarpedNylium,
                Netherrack,
            ]
            .into_iter()
            .collect(),
        }
    }
}

impl RemovalConfig {
    /// Parse a JSON document, filling missing keys with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON document from disk
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded removal config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Write the full document (defaults included) as pretty JSON
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Scan delay actually applied
    pub fn effective_delay_ticks(&self) -> u64 {
        self.leaf_removal_delay_ticks.max(MIN_SCAN_DELAY_TICKS)
    }

    /// Batch size actually applied (never zero)
    pub fn effective_batch_size(&self) -> usize {
        self.leaf_removal_batch_size.max(1)
    }

    /// Scan radius actually applied (never negative)
    pub fn effective_radius(&self) -> i32 {
        self.leaf_removal_radius.max(0)
    }
}

fn serialize_materials<S: Serializer>(
    set: &HashSet<Material>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut names: Vec<&str> = set.iter().map(|m| m.name()).collect();
    names.sort_unstable();
    names.serialize(serializer)
}

/// Unknown names are dropped here so they never reach a session.
fn deserialize_materials<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<HashSet<Material>, D::Error> {
    let names = Vec::<String>::deserialize(deserializer)?;
    Ok(names
        .iter()
        .filter_map(|name| {
            let material = Material::from_name(name.trim());
            if material.is_none() {
                log::warn!("Ignoring unknown material '{}' in removal config", name);
            }
            material
        })
        .collect())
}

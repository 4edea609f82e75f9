//! Fell a tree in an in-memory world and watch its canopy get cleared.
//!
//! Usage:
//!   cargo run --bin fell_demo -- [--mode smart|radius|aggressive] [--config removal.json] [--batch N]

use std::sync::Arc;

use canopy_sweep::canopy::{CanopyEngine, RemovalHooks};
use canopy_sweep::config::{ConfigProvider, RemovalConfig, RemovalMode};
use canopy_sweep::core::{logging, Result};
use canopy_sweep::quota::{MemoryQuotaStore, SystemDayClock};
use canopy_sweep::schedule::{GlobalScheduler, TickScheduler};
use canopy_sweep::world::{Actor, ActorId, Material, Position, SparseWorld, WorldId, PERMISSION_CLEAR_CANOPY};

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();

    let mut config = match arg_value(&args, "--config") {
        Some(path) => RemovalConfig::load_from_path(path)?,
        None => RemovalConfig::default(),
    };
    if let Some(mode) = arg_value(&args, "--mode") {
        config.leaf_removal_mode = RemovalMode::parse_lenient(mode);
    }
    if let Some(batch) = arg_value(&args, "--batch").and_then(|s| s.parse().ok()) {
        config.leaf_removal_batch_size = batch;
    }

    let world_id = WorldId(0);
    let mut world = SparseWorld::new();
    for x in -12..=20 {
        for z in -12..=12 {
            world.place(Position::new(world_id, x, -1, z), Material::GrassBlock);
        }
    }
    let felled = world.plant_tree(Position::new(world_id, 0, 0, 0), 6, Material::OakLog, Material::OakLeaves, 2);
    let standing = world.plant_tree(Position::new(world_id, 8, 0, 0), 6, Material::BirchLog, Material::BirchLeaves, 2);

    println!("=== Felling demo ({} mode) ===", config.leaf_removal_mode.as_str());
    println!(
        "Felled oak at {} ({} logs), standing birch at {}",
        felled[0],
        felled.len(),
        standing[0]
    );
    println!(
        "Canopy before: {} oak leaves, {} birch leaves",
        world.count(Material::OakLeaves),
        world.count(Material::BirchLeaves)
    );

    let provider = Arc::new(ConfigProvider::new(config));
    let quota = Arc::new(MemoryQuotaStore::new(SystemDayClock));
    let mut engine = CanopyEngine::new(provider, GlobalScheduler::new(), RemovalHooks::new(quota));

    let actor = Actor::new(ActorId::random()).with_permission(PERMISSION_CLEAR_CANOPY);
    engine.begin_felling(&world, felled[0], Material::OakLog, &actor)?;

    // The felling routine breaks the trunk top-down and reports each block
    for &pos in felled.iter().rev() {
        world.place(pos, Material::Air);
        engine.track_removed_trunk(pos, &actor.id)?;
    }

    // Only count what the engine changes from here on
    world.take_modified();

    let mut ticks = 0u64;
    while engine.scheduler().pending() > 0 && ticks < 1_000 {
        for report in engine.run_tick(&mut world) {
            println!(
                "Tick {}: session {} ended ({:?}), scanned {}, removed {}, skipped {}, {} slices",
                engine.now(),
                report.session,
                report.end,
                report.scanned,
                report.removed,
                report.skipped,
                report.slices
            );
        }
        ticks += 1;
    }

    println!(
        "Canopy after: {} oak leaves, {} birch leaves",
        world.count(Material::OakLeaves),
        world.count(Material::BirchLeaves)
    );
    println!("Blocks changed by the engine: {}", world.take_modified().len());
    log::info!("Demo finished after {} ticks", ticks);

    Ok(())
}

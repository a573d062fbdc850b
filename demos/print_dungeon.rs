//! Example: Generate and print a dungeon
//!
//! Demonstrates the basic usage of the generation pipeline.
//! Pass a seed as the first argument to get a different layout.

use dungeon_layout::*;

fn main() {
    println!("Dungeon Layout Generation Example");
    println!("=================================\n");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);

    let config = DungeonConfigBuilder::new()
        .seed(seed)
        .room_count(20, 40)
        .hallway_width(3)
        .unwrap()
        .build()
        .unwrap();

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Room Count: {}..={}", config.room_count.min, config.room_count.max);
    println!("  Scatter Radius: {}..={}", config.radius.min, config.radius.max);
    println!("  Hallway Width: {}", config.hallway_width);
    println!("  Extra Edges: {:.0}%", config.extra_edge_fraction * 100.0);
    println!();

    println!("Generating dungeon...");
    let dungeon = Dungeon::generate(config).expect("Failed to generate dungeon");
    println!("Generated {}x{} grid\n", dungeon.width(), dungeon.height());

    println!("{}", dungeon);

    let floor = dungeon.grid().count(|tile| !tile.is_empty());
    let total = dungeon.width() * dungeon.height();

    println!("Statistics:");
    println!("  Main rooms: {}", dungeon.main_rooms().count());
    println!("  Attached rooms: {}", dungeon.attached_rooms().count());
    println!("  Discarded rooms: {}", dungeon.discarded_rooms().count());
    println!("  Hallways: {}", dungeon.hallways().len());
    println!("  Orphan hallways: {}", dungeon.orphan_hallways().count());
    println!("  Separation passes: {}", dungeon.separation_passes());
    if total > 0 {
        println!("  Floor coverage: {:.1}%", floor as f32 / total as f32 * 100.0);
    }
    println!();

    println!("Largest rooms:");
    for room in dungeon.main_rooms().take(5) {
        let links = dungeon.connected_room_ids(room.id).unwrap_or_default();
        println!(
            "  Room {}: at ({}, {}), {}x{}, linked to {} room(s)",
            room.id,
            room.x(),
            room.y(),
            room.width,
            room.height,
            links.len()
        );
    }

    println!("\nGeneration complete!");
}

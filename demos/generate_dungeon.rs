//! Example: Generate a dungeon graph
//!
//! Demonstrates the basic usage of the generation pipeline.

use dungeon_graph::*;

fn main() {
    println!("Dungeon Graph Generation Example");
    println!("=================================\n");

    // Create a configuration for a small dungeon
    let config = DungeonConfigBuilder::new()
        .seed(42)
        .vertex_count(24)
        .unwrap()
        .loop_count(4)
        .room_size_range(1.0, 3.0)
        .unwrap()
        .area(100.0, 60.0)
        .unwrap()
        .generate_roles(true)
        .build()
        .unwrap();

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Rooms: {}", config.vertex_count);
    println!("  Requested loops: {}", config.loop_count);
    println!("  Area: {} x {}", config.area_width, config.area_height);
    println!("  Sample region: {}", config.sample_region.name());
    println!();

    // Generate the dungeon
    println!("Generating dungeon...");
    let dungeon = Dungeon::generate(config).expect("Failed to generate dungeon");
    println!(
        "Generated {} rooms and {} corridors ({} loops accepted)\n",
        dungeon.room_count(),
        dungeon.corridor_count(),
        dungeon.loops_added()
    );

    // Analyze the generated graph
    let total_connections: usize = dungeon.rooms().iter().map(|r| r.connections.len()).sum();
    let avg_connections = total_connections as f64 / dungeon.room_count() as f64;

    println!("Statistics:");
    println!("  Average connections per room: {:.2}", avg_connections);
    println!("  Fully connected: {}", dungeon.is_connected());
    println!();

    // Show details for first few rooms
    println!("Sample rooms:");
    for room in dungeon.rooms().iter().take(5) {
        println!(
            "  Room {}: center=({:.2}, {:.2}), size={:.2}, role={:?}, connections={:?}",
            room.id,
            room.position.x,
            room.position.y,
            room.size,
            room.role,
            room.connections
        );
    }

    println!("\nGeneration complete!");
}

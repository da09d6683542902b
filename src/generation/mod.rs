//! Core dungeon graph generation pipeline
//!
//! Generates a connected, loop-augmented room graph: blue-noise sampling,
//! Delaunay triangulation, a randomized spanning tree, loop augmentation,
//! and optional gameplay role tagging.

mod delaunay;
mod poisson;
mod roles;
mod spanning;

pub use delaunay::{next_halfedge, prev_halfedge, triangulate, Triangulation, EMPTY};
pub use poisson::{generate_poisson_points, sample_poisson};
pub use roles::assign_roles;
pub use spanning::{add_loop_edges, randomized_spanning_tree};

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

use crate::config::DungeonConfig;
use crate::error::Result;
use crate::room::{CorridorEdge, RoomVertex};

/// Raw output of the generation pipeline
///
/// Holds the rooms with their final positions, sizes, connections, and
/// roles, plus the accepted corridor list. `loops_added` reports how many
/// loop edges actually landed; it can fall short of the configured count
/// when the augmentation retry budget runs out.
#[derive(Debug, Clone)]
pub struct RawLayout {
    /// Rooms in generation order
    pub vertices: Vec<RoomVertex>,
    /// Accepted corridors (spanning tree plus loops)
    pub edges: Vec<CorridorEdge>,
    /// Loop edges accepted during augmentation
    pub loops_added: usize,
}

/// Run the full generation pipeline for a configuration
///
/// All stages draw from one random stream seeded with `config.seed`, in a
/// fixed order: sampling, sizes, edge weights, loop picks, roles. That order
/// is part of the determinism contract; the same configuration always yields
/// the same layout.
///
/// # Errors
///
/// Returns `InvalidConfig` for a configuration that fails validation,
/// `DegenerateGeometry` when the sampled points cannot be triangulated, and
/// `GenerationFailed` on an internal connectivity inconsistency.
pub fn generate_layout(config: &DungeonConfig) -> Result<RawLayout> {
    config.validate()?;

    let total_start = Instant::now();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    // Stage 1: blue-noise sampling, truncated to the requested room count
    // and scaled into the target area
    let stage_start = Instant::now();
    let mut points = generate_poisson_points(config.vertex_count, config.sample_region, &mut rng);
    points.truncate(config.vertex_count);
    eprintln!(
        "[Dungeon] Sampled {} rooms ({}) in {:?}",
        points.len(),
        config.sample_region.name(),
        stage_start.elapsed()
    );

    let scale = DVec2::new(config.area_width, config.area_height);
    let positions: Vec<DVec2> = points.iter().map(|&p| p * scale).collect();

    // Stage 2: room sizes, drawn in room order
    let mut vertices: Vec<RoomVertex> = positions
        .iter()
        .enumerate()
        .map(|(i, &position)| {
            let size = rng.gen_range(config.min_room_size..=config.max_room_size);
            RoomVertex::new(i, position, size)
        })
        .collect();

    // Stage 3: Delaunay triangulation
    let stage_start = Instant::now();
    let triangulation = triangulate(&positions)?;
    eprintln!(
        "[Dungeon] Triangulated {} triangles in {:?}",
        triangulation.triangle_count(),
        stage_start.elapsed()
    );

    // Stages 4-5: random edge weights and spanning tree
    let stage_start = Instant::now();
    let mut edges = randomized_spanning_tree(&triangulation, &mut vertices, &mut rng)?;
    eprintln!(
        "[Dungeon] Spanning tree with {} corridors in {:?}",
        edges.len(),
        stage_start.elapsed()
    );

    // Stage 6: loop augmentation, capped to the actual room count
    let stage_start = Instant::now();
    let loop_target = config.loop_count.min(vertices.len());
    let loops_added =
        add_loop_edges(&triangulation, &mut vertices, &mut edges, loop_target, &mut rng);
    eprintln!(
        "[Dungeon] Accepted {} of {} loops in {:?}",
        loops_added,
        loop_target,
        stage_start.elapsed()
    );

    // Stage 7: optional role tagging
    if config.generate_roles {
        assign_roles(&mut vertices, config.treasure_fraction, &mut rng);
    }

    eprintln!(
        "[Dungeon] Generated {} rooms and {} corridors in {:?}",
        vertices.len(),
        edges.len(),
        total_start.elapsed()
    );

    Ok(RawLayout {
        vertices,
        edges,
        loops_added,
    })
}

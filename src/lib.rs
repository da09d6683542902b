//! Procedural dungeon graph generation
//!
//! A standalone library for generating connected, loop-augmented dungeon
//! graphs: blue-noise room placement, Delaunay triangulation, a randomized
//! spanning tree, and a configurable number of extra loop corridors.
//! Suitable for use with any game engine (Bevy, Godot, etc.)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dungeon_graph::*;
//!
//! // Generate a dungeon
//! let config = DungeonConfigBuilder::new()
//!     .seed(42)
//!     .vertex_count(32).unwrap()
//!     .loop_count(4)
//!     .build().unwrap();
//!
//! let dungeon = Dungeon::generate(config).unwrap();
//! println!("Generated {} rooms and {} corridors",
//!     dungeon.room_count(), dungeon.corridor_count());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-room lookups using KD-tree
//! - `serde`: Enables serialization support for configuration and rooms

// Modules
pub mod error;
pub mod config;
pub mod room;
pub mod generation;
pub mod dungeon;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{DungeonError, Result};
pub use config::{DungeonConfig, DungeonConfigBuilder, SampleRegion};
pub use room::{CorridorEdge, RoomRole, RoomVertex};
pub use dungeon::Dungeon;
pub use generation::{RawLayout, Triangulation};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;

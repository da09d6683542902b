//! Dungeon main structure

use crate::config::DungeonConfig;
use crate::error::Result;
use crate::generation::generate_layout;
use crate::room::{CorridorEdge, RoomVertex};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;
#[cfg(feature = "spatial-index")]
use glam::DVec2;

/// A complete generated dungeon graph
///
/// Stores the rooms and corridors produced by one generation run, along with
/// the configuration that produced them. The graph is immutable after
/// generation; rerunning [`Dungeon::generate`] with the same configuration
/// reproduces it exactly.
///
/// # Examples
///
/// ```
/// use dungeon_graph::*;
///
/// let config = DungeonConfigBuilder::new()
///     .seed(42)
///     .vertex_count(24)
///     .unwrap()
///     .loop_count(4)
///     .build()
///     .unwrap();
///
/// let dungeon = Dungeon::generate(config).unwrap();
/// println!("Generated {} rooms", dungeon.room_count());
///
/// // Query rooms
/// if let Some(room) = dungeon.get_room(0) {
///     println!("Room 0 connects to {:?}", room.connections);
/// }
/// ```
#[derive(Clone)]
pub struct Dungeon {
    /// Configuration used to generate this dungeon
    config: DungeonConfig,

    /// All rooms in the dungeon (indexed by room ID)
    rooms: Vec<RoomVertex>,

    /// All corridors between rooms
    corridors: Vec<CorridorEdge>,

    /// Loop edges accepted during augmentation
    loops_added: usize,

    /// Spatial index for fast position-to-room lookups (optional, requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl Dungeon {
    /// Generate a dungeon from a configuration
    ///
    /// Runs the full pipeline: blue-noise sampling, Delaunay triangulation,
    /// randomized spanning tree, loop augmentation, and optional role
    /// tagging. The result is fully determined by the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when the configuration fails validation and
    /// `DegenerateGeometry` when the sampled points cannot be triangulated.
    /// No partial dungeon is produced on error.
    ///
    /// # Example
    ///
    /// ```
    /// use dungeon_graph::*;
    ///
    /// let config = DungeonConfigBuilder::new()
    ///     .seed(12345)
    ///     .vertex_count(16)
    ///     .unwrap()
    ///     .build()
    ///     .unwrap();
    ///
    /// let dungeon = Dungeon::generate(config).unwrap();
    /// assert!(dungeon.is_connected());
    /// ```
    pub fn generate(config: DungeonConfig) -> Result<Self> {
        let layout = generate_layout(&config)?;

        // Build spatial index (requires spatial-index feature)
        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let positions: Vec<DVec2> = layout.vertices.iter().map(|r| r.position).collect();
            SpatialIndex::new(&positions)
        };

        Ok(Self {
            config,
            rooms: layout.vertices,
            corridors: layout.edges,
            loops_added: layout.loops_added,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Get the configuration used to generate this dungeon
    #[inline]
    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    /// Get the number of rooms
    #[inline]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Get the number of corridors
    #[inline]
    pub fn corridor_count(&self) -> usize {
        self.corridors.len()
    }

    /// Get the number of loop edges accepted during augmentation
    ///
    /// May be smaller than the configured loop count when the retry budget
    /// ran out; the corridor count always equals
    /// `room_count - 1 + loops_added`.
    #[inline]
    pub fn loops_added(&self) -> usize {
        self.loops_added
    }

    /// Get a room by ID
    ///
    /// Returns `None` if the room ID is out of bounds.
    #[inline]
    pub fn get_room(&self, id: usize) -> Option<&RoomVertex> {
        self.rooms.get(id)
    }

    /// Get all rooms as a slice
    #[inline]
    pub fn rooms(&self) -> &[RoomVertex] {
        &self.rooms
    }

    /// Get all corridors as a slice
    #[inline]
    pub fn corridors(&self) -> &[CorridorEdge] {
        &self.corridors
    }

    /// Get the IDs of rooms directly connected to a room
    ///
    /// Returns an empty slice if the room ID is invalid.
    pub fn get_connections(&self, room_id: usize) -> &[usize] {
        self.rooms
            .get(room_id)
            .map(|r| r.connections.as_slice())
            .unwrap_or(&[])
    }

    /// Check that every room is reachable from room 0
    ///
    /// Generation guarantees this; the check exists for consumers that
    /// mutate a copy of the graph or want a sanity assertion.
    pub fn is_connected(&self) -> bool {
        if self.rooms.is_empty() {
            return true;
        }

        let mut seen = vec![false; self.rooms.len()];
        let mut stack = vec![0usize];
        seen[0] = true;
        let mut count = 1;

        while let Some(id) = stack.pop() {
            for &next in &self.rooms[id].connections {
                if !seen[next] {
                    seen[next] = true;
                    count += 1;
                    stack.push(next);
                }
            }
        }

        count == self.rooms.len()
    }

    /// Find the room nearest a position (requires spatial-index feature)
    ///
    /// Uses a KD-tree for O(log n) nearest-neighbor lookup. Useful for
    /// mapping a click or spawn position back to a room ID.
    #[cfg(feature = "spatial-index")]
    pub fn find_room_at(&self, position: DVec2) -> usize {
        self.spatial_index.find_nearest(position)
    }

    /// Find rooms within a given hop count from a center room (BFS)
    ///
    /// # Arguments
    ///
    /// * `center_id` - Starting room ID
    /// * `hops` - Maximum number of corridor hops (0 = just the center room)
    ///
    /// # Returns
    ///
    /// Vector of room IDs within range, including the center room.
    /// Returns empty vec if `center_id` is invalid.
    pub fn find_rooms_within_radius(&self, center_id: usize, hops: usize) -> Vec<usize> {
        if center_id >= self.rooms.len() {
            return vec![];
        }

        let mut visited = std::collections::HashSet::new();
        let mut current = vec![center_id];
        visited.insert(center_id);

        // BFS with hop limit
        for _ in 0..hops {
            let mut next = Vec::new();
            for &room_id in &current {
                for &neighbor in self.get_connections(room_id) {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            current = next;
        }

        visited.into_iter().collect()
    }

    /// Consume the dungeon, returning the room and corridor collections
    ///
    /// This is the hand-off shape for rendering or placement layers that
    /// only need the graph data.
    pub fn into_parts(self) -> (Vec<RoomVertex>, Vec<CorridorEdge>) {
        (self.rooms, self.corridors)
    }
}

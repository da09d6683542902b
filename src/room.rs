//! Room and Corridor Structures
//!
//! Represents individual rooms in the dungeon graph with position, size,
//! connectivity, and gameplay role.

use glam::DVec2;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gameplay role assigned to a room
///
/// Roles are only assigned when role generation is enabled; otherwise every
/// room keeps [`RoomRole::Plain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoomRole {
    /// No role assigned
    #[default]
    Plain,
    /// Entry room (always room 0)
    Start,
    /// Final room (always the highest room id)
    Boss,
    /// Loot room
    Treasure,
    /// Combat room
    Enemy,
}

impl RoomRole {
    /// Check if this role marks one of the dungeon's landmark rooms
    pub fn is_special(&self) -> bool {
        matches!(self, RoomRole::Start | RoomRole::Boss | RoomRole::Treasure)
    }

    /// Check if this room spawns combat encounters
    pub fn is_combat(&self) -> bool {
        matches!(self, RoomRole::Enemy | RoomRole::Boss)
    }
}

/// A single room in the dungeon graph
///
/// Each room represents one vertex of the layout with:
/// - A unique ID for identification
/// - A position in the target area for placing geometry
/// - A size for scaling room interiors
/// - Corridor connectivity for traversal and pathfinding
/// - An optional gameplay role
///
/// # Design Notes
///
/// Rooms are NOT serialized individually. They are regenerated from
/// DungeonConfig when loading a save file, ensuring consistency and compact
/// save files.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct RoomVertex {
    /// Unique identifier for this room (0 to room_count-1)
    ///
    /// Room IDs are stable and deterministic - the same configuration
    /// will always produce the same room IDs in the same positions.
    pub id: usize,

    /// Position of the room center in the target area
    ///
    /// Positions come from blue-noise sampling, so no two rooms sit closer
    /// than the sampling radius (scaled into the area dimensions).
    pub position: DVec2,

    /// Size of the room, rolled uniformly from the configured range
    ///
    /// The crate treats this as an opaque scalar; consumers decide whether
    /// it is a radius, a side length, or something else.
    pub size: f64,

    /// IDs of rooms reachable through a single corridor
    ///
    /// Mirrors the corridor list: `a` appears in `b`'s connections exactly
    /// when `b` appears in `a`'s. Used for traversal, pathfinding, and
    /// flood-fill algorithms.
    pub connections: Vec<usize>,

    /// Gameplay role of this room
    pub role: RoomRole,
}

impl RoomVertex {
    /// Create a new room with no connections and no role
    ///
    /// This is typically called during dungeon generation, not by user code.
    pub fn new(id: usize, position: DVec2, size: f64) -> Self {
        Self {
            id,
            position,
            size,
            connections: Vec::new(),
            role: RoomRole::Plain,
        }
    }

    /// Get the number of corridors leaving this room
    #[inline]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Check if a corridor directly links this room to another
    #[inline]
    pub fn is_connected_to(&self, other_room_id: usize) -> bool {
        self.connections.contains(&other_room_id)
    }

    /// Get the Euclidean distance to another room's center
    #[inline]
    pub fn distance_to(&self, other: &RoomVertex) -> f64 {
        self.position.distance(other.position)
    }
}

/// An undirected corridor between two rooms
///
/// Equality and hashing ignore endpoint order, so `CorridorEdge::new(2, 5)`
/// and `CorridorEdge::new(5, 2)` are the same edge. This is what makes
/// duplicate detection during loop augmentation work with a plain `HashSet`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct CorridorEdge {
    /// First endpoint room ID
    pub a: usize,
    /// Second endpoint room ID
    pub b: usize,
}

impl CorridorEdge {
    /// Create a new corridor between two rooms
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    /// Endpoint pair with the smaller room ID first
    #[inline]
    pub fn endpoints(&self) -> (usize, usize) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }

    /// Check if this corridor touches the given room
    #[inline]
    pub fn connects(&self, room_id: usize) -> bool {
        self.a == room_id || self.b == room_id
    }

    /// Get the endpoint opposite to `room_id`, if this corridor touches it
    pub fn other(&self, room_id: usize) -> Option<usize> {
        if self.a == room_id {
            Some(self.b)
        } else if self.b == room_id {
            Some(self.a)
        } else {
            None
        }
    }
}

impl PartialEq for CorridorEdge {
    fn eq(&self, other: &Self) -> bool {
        self.endpoints() == other.endpoints()
    }
}

impl Eq for CorridorEdge {}

impl Hash for CorridorEdge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.endpoints().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_room_creation() {
        let room = RoomVertex::new(3, DVec2::new(10.0, 20.0), 2.5);

        assert_eq!(room.id, 3);
        assert_eq!(room.position, DVec2::new(10.0, 20.0));
        assert_eq!(room.size, 2.5);
        assert_eq!(room.connection_count(), 0);
        assert_eq!(room.role, RoomRole::Plain);
    }

    #[test]
    fn test_room_connectivity() {
        let mut room = RoomVertex::new(0, DVec2::ZERO, 1.0);
        room.connections.push(1);
        room.connections.push(4);

        assert_eq!(room.connection_count(), 2);
        assert!(room.is_connected_to(1));
        assert!(room.is_connected_to(4));
        assert!(!room.is_connected_to(2));
    }

    #[test]
    fn test_room_distance() {
        let a = RoomVertex::new(0, DVec2::new(0.0, 0.0), 1.0);
        let b = RoomVertex::new(1, DVec2::new(3.0, 4.0), 1.0);

        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert!((b.distance_to(&a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_edge_is_undirected() {
        let e1 = CorridorEdge::new(2, 5);
        let e2 = CorridorEdge::new(5, 2);

        assert_eq!(e1, e2);
        assert_eq!(e1.endpoints(), (2, 5));
        assert_eq!(e2.endpoints(), (2, 5));

        let mut set = HashSet::new();
        set.insert(e1);
        set.insert(e2);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_edge_connects_and_other() {
        let edge = CorridorEdge::new(1, 7);

        assert!(edge.connects(1));
        assert!(edge.connects(7));
        assert!(!edge.connects(3));

        assert_eq!(edge.other(1), Some(7));
        assert_eq!(edge.other(7), Some(1));
        assert_eq!(edge.other(3), None);
    }

    #[test]
    fn test_role_helpers() {
        assert!(!RoomRole::Plain.is_special());
        assert!(RoomRole::Start.is_special());
        assert!(RoomRole::Boss.is_special());
        assert!(RoomRole::Treasure.is_special());
        assert!(!RoomRole::Enemy.is_special());

        assert!(RoomRole::Enemy.is_combat());
        assert!(RoomRole::Boss.is_combat());
        assert!(!RoomRole::Treasure.is_combat());
        assert_eq!(RoomRole::default(), RoomRole::Plain);
    }
}

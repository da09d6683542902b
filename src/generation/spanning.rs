//! Randomized Spanning Tree and Loop Augmentation
//!
//! Reduces the dense Delaunay edge set to a connected corridor graph. A
//! spanning tree guarantees every room is reachable while keeping corridors
//! minimal; a few triangulation edges are then reintroduced as loops so the
//! layout is not a strict tree.
//!
//! # Algorithm
//!
//! Every undirected triangulation edge receives a random 32-bit weight, and
//! Prim's algorithm grows a minimum spanning tree over those weights from
//! room 0 using a priority queue. Because the weights are random rather than
//! geometric, the result is a randomized spanning tree: the same point set
//! produces differently shaped trees under different seeds.
//!
//! Loop augmentation then picks random halfedges and reinstates their edges
//! when the endpoints are not yet directly connected. Duplicate picks burn a
//! shared retry budget instead of a loop slot; when the budget runs out the
//! layout simply keeps fewer loops.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{DungeonError, Result};
use crate::generation::delaunay::Triangulation;
use crate::room::{CorridorEdge, RoomVertex};

/// Sentinel parent for the root entry of the spanning tree queue
const NO_PARENT: usize = usize::MAX;

/// Duplicate picks allowed during loop augmentation, per room
const RETRIES_PER_ROOM: usize = 3;

#[derive(Clone, Copy, PartialEq, Eq)]
struct QueueEntry {
    weight: u32,
    vertex: usize,
    parent: usize,
}

// BinaryHeap is a max-heap, so we reverse the ordering for min-heap behavior.
// Comparing the full entry keeps pop order deterministic on weight ties.
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.vertex.cmp(&self.vertex))
            .then_with(|| other.parent.cmp(&self.parent))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Grow a randomized spanning tree over the triangulation edges
///
/// Draws one random weight per undirected edge (in halfedge order, which
/// pins down the random stream), then runs Prim's algorithm from room 0.
/// Accepted edges are returned and mirrored into the rooms' connection
/// lists.
///
/// # Errors
///
/// Returns `GenerationFailed` if the triangulation edges do not connect all
/// rooms, which indicates an inconsistent triangulation.
pub fn randomized_spanning_tree(
    triangulation: &Triangulation,
    rooms: &mut [RoomVertex],
    rng: &mut ChaCha8Rng,
) -> Result<Vec<CorridorEdge>> {
    let n = rooms.len();

    // weight every undirected edge up front; the draw order is part of the
    // reproducibility contract
    let mut adjacency: Vec<Vec<(usize, u32)>> = vec![Vec::new(); n];
    for (a, b) in triangulation.undirected_edges() {
        let weight = rng.gen::<u32>();
        adjacency[a].push((b, weight));
        adjacency[b].push((a, weight));
    }

    let mut visited = vec![false; n];
    let mut visited_count = 0;
    let mut edges = Vec::with_capacity(n.saturating_sub(1));
    let mut queue = BinaryHeap::new();

    queue.push(QueueEntry {
        weight: 0,
        vertex: 0,
        parent: NO_PARENT,
    });

    while let Some(entry) = queue.pop() {
        if visited[entry.vertex] {
            continue;
        }
        visited[entry.vertex] = true;
        visited_count += 1;

        if entry.parent != NO_PARENT {
            edges.push(CorridorEdge::new(entry.parent, entry.vertex));
            rooms[entry.parent].connections.push(entry.vertex);
            rooms[entry.vertex].connections.push(entry.parent);
        }

        for &(neighbor, weight) in &adjacency[entry.vertex] {
            if !visited[neighbor] {
                queue.push(QueueEntry {
                    weight,
                    vertex: neighbor,
                    parent: entry.vertex,
                });
            }
        }
    }

    if visited_count != n {
        return Err(DungeonError::GenerationFailed(format!(
            "spanning tree reached only {} of {} rooms",
            visited_count, n
        )));
    }

    Ok(edges)
}

/// Reintroduce up to `loop_count` triangulation edges as loops
///
/// Each attempt picks a uniformly random halfedge and accepts its edge when
/// the endpoints are not yet directly connected. A pick that lands on an
/// existing connection does not consume a loop slot; instead it burns one
/// unit of a shared retry budget of three times the room count. An exhausted
/// budget ends augmentation early, so the returned count may be smaller than
/// requested.
pub fn add_loop_edges(
    triangulation: &Triangulation,
    rooms: &mut [RoomVertex],
    edges: &mut Vec<CorridorEdge>,
    loop_count: usize,
    rng: &mut ChaCha8Rng,
) -> usize {
    let budget = RETRIES_PER_ROOM * rooms.len();
    let mut retries = 0;
    let mut added = 0;

    while added < loop_count && retries < budget {
        let e = rng.gen_range(0..triangulation.halfedges.len());
        let (a, b) = triangulation.halfedge_endpoints(e);

        if rooms[a].is_connected_to(b) || rooms[b].is_connected_to(a) {
            retries += 1;
            continue;
        }

        edges.push(CorridorEdge::new(a, b));
        rooms[a].connections.push(b);
        rooms[b].connections.push(a);
        added += 1;
    }

    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SampleRegion;
    use crate::generation::delaunay::triangulate;
    use crate::generation::poisson::generate_poisson_points;
    use glam::DVec2;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn fixture(count: usize, seed: u64) -> (Vec<RoomVertex>, Triangulation, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut points = generate_poisson_points(count, SampleRegion::Square, &mut rng);
        points.truncate(count);

        let rooms = points
            .iter()
            .enumerate()
            .map(|(i, &p)| RoomVertex::new(i, p, 1.0))
            .collect();
        let triangulation = triangulate(&points).unwrap();
        (rooms, triangulation, rng)
    }

    fn reachable_from_zero(rooms: &[RoomVertex]) -> usize {
        let mut seen = vec![false; rooms.len()];
        let mut stack = vec![0usize];
        seen[0] = true;
        let mut count = 0;

        while let Some(v) = stack.pop() {
            count += 1;
            for &next in &rooms[v].connections {
                if !seen[next] {
                    seen[next] = true;
                    stack.push(next);
                }
            }
        }
        count
    }

    #[test]
    fn test_spanning_tree_connects_all_rooms() {
        let (mut rooms, triangulation, mut rng) = fixture(30, 42);
        let edges = randomized_spanning_tree(&triangulation, &mut rooms, &mut rng).unwrap();

        assert_eq!(edges.len(), rooms.len() - 1);
        assert_eq!(reachable_from_zero(&rooms), rooms.len());
    }

    #[test]
    fn test_spanning_tree_edges_are_triangulation_edges() {
        let (mut rooms, triangulation, mut rng) = fixture(25, 7);
        let edges = randomized_spanning_tree(&triangulation, &mut rooms, &mut rng).unwrap();

        let allowed: HashSet<(usize, usize)> = triangulation.undirected_edges().collect();
        let mut seen = HashSet::new();
        for edge in &edges {
            let pair = edge.endpoints();
            assert_ne!(edge.a, edge.b, "self edge in spanning tree");
            assert!(allowed.contains(&pair), "edge {:?} not in triangulation", pair);
            assert!(seen.insert(pair), "duplicate edge {:?}", pair);
        }
    }

    #[test]
    fn test_spanning_tree_determinism() {
        let (mut rooms1, tri1, mut rng1) = fixture(30, 99);
        let edges1 = randomized_spanning_tree(&tri1, &mut rooms1, &mut rng1).unwrap();

        let (mut rooms2, tri2, mut rng2) = fixture(30, 99);
        let edges2 = randomized_spanning_tree(&tri2, &mut rooms2, &mut rng2).unwrap();

        assert_eq!(edges1, edges2);
    }

    #[test]
    fn test_different_seeds_give_different_trees() {
        let (mut rooms1, tri1, mut rng1) = fixture(30, 1);
        let edges1: HashSet<CorridorEdge> = randomized_spanning_tree(&tri1, &mut rooms1, &mut rng1)
            .unwrap()
            .into_iter()
            .collect();

        let (mut rooms2, tri2, mut rng2) = fixture(30, 2);
        let edges2: HashSet<CorridorEdge> = randomized_spanning_tree(&tri2, &mut rooms2, &mut rng2)
            .unwrap()
            .into_iter()
            .collect();

        assert_ne!(edges1, edges2);
    }

    #[test]
    fn test_loops_extend_the_tree() {
        let (mut rooms, triangulation, mut rng) = fixture(30, 42);
        let mut edges = randomized_spanning_tree(&triangulation, &mut rooms, &mut rng).unwrap();
        let tree_len = edges.len();

        let added = add_loop_edges(&triangulation, &mut rooms, &mut edges, 3, &mut rng);

        assert_eq!(added, 3);
        assert_eq!(edges.len(), tree_len + added);

        // still connected, still no duplicates, still triangulation edges
        assert_eq!(reachable_from_zero(&rooms), rooms.len());
        let allowed: HashSet<(usize, usize)> = triangulation.undirected_edges().collect();
        let unique: HashSet<CorridorEdge> = edges.iter().copied().collect();
        assert_eq!(unique.len(), edges.len());
        for edge in &edges {
            assert!(allowed.contains(&edge.endpoints()));
        }
    }

    #[test]
    fn test_zero_loops_requested() {
        let (mut rooms, triangulation, mut rng) = fixture(20, 5);
        let mut edges = randomized_spanning_tree(&triangulation, &mut rooms, &mut rng).unwrap();
        let tree_len = edges.len();

        let added = add_loop_edges(&triangulation, &mut rooms, &mut edges, 0, &mut rng);

        assert_eq!(added, 0);
        assert_eq!(edges.len(), tree_len);
    }

    #[test]
    fn test_loop_budget_exhaustion_is_soft() {
        // three rooms that are already fully connected; every pick is a
        // duplicate, so the retry budget runs out without adding anything
        let points = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(0.5, 1.0),
        ];
        let triangulation = triangulate(&points).unwrap();

        let mut rooms: Vec<RoomVertex> = points
            .iter()
            .enumerate()
            .map(|(i, &p)| RoomVertex::new(i, p, 1.0))
            .collect();
        for i in 0..3 {
            for j in 0..3 {
                if i != j {
                    rooms[i].connections.push(j);
                }
            }
        }

        let mut edges = vec![
            CorridorEdge::new(0, 1),
            CorridorEdge::new(1, 2),
            CorridorEdge::new(2, 0),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let added = add_loop_edges(&triangulation, &mut rooms, &mut edges, 4, &mut rng);

        assert_eq!(added, 0);
        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn test_minimal_three_room_tree() {
        let (mut rooms, triangulation, mut rng) = fixture(3, 11);
        let edges = randomized_spanning_tree(&triangulation, &mut rooms, &mut rng).unwrap();

        assert_eq!(edges.len(), 2);
        assert_eq!(reachable_from_zero(&rooms), 3);
    }
}

//! Spatial indexing for fast position-to-room lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use glam::DVec2;
#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

/// Wrapper around KD-tree for spatial queries
///
/// Provides O(log n) nearest-neighbor lookups to convert 2D positions
/// into room IDs. Useful for mapping cursor or spawn positions back to
/// the room graph.
///
/// # Performance
///
/// - Construction: O(n log n), negligible for typical dungeon sizes
/// - Query: O(log n)
/// - Memory: ~24 bytes per room
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build spatial index from room centers
    ///
    /// Creates an immutable KD-tree from the provided room center positions.
    /// This is called once during dungeon generation.
    ///
    /// # Arguments
    ///
    /// * `centers` - Slice of DVec2 positions representing room centers
    ///
    /// # Example
    ///
    /// ```
    /// use dungeon_graph::*;
    /// use glam::DVec2;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let centers = vec![
    ///     DVec2::new(10.0, 10.0),
    ///     DVec2::new(90.0, 10.0),
    ///     DVec2::new(50.0, 80.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&centers);
    /// let room_id = index.find_nearest(DVec2::new(12.0, 9.0));
    /// assert_eq!(room_id, 0); // Closest to first center
    /// # }
    /// ```
    pub fn new(centers: &[DVec2]) -> Self {
        // Convert DVec2 to [f64; 2] array format for kiddo
        let points: Vec<[f64; 2]> = centers.iter().map(|c| [c.x, c.y]).collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// Find the nearest room to a position
    ///
    /// # Arguments
    ///
    /// * `position` - 2D position to query
    ///
    /// # Returns
    ///
    /// Room ID (index) of the nearest room center
    pub fn find_nearest(&self, position: DVec2) -> usize {
        let query = [position.x, position.y];
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        result.item as usize
    }
}

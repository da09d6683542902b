//! Poisson-Disc Point Sampling
//!
//! Generates 2D blue-noise point distributions in the unit square (or the
//! disc inscribed in it) using Bridson's algorithm. Blue-noise spacing keeps
//! every pair of rooms at least a minimum distance apart, avoiding the
//! clusters and gaps of plain uniform sampling.
//!
//! # Algorithm
//!
//! Bridson's method maintains an active list of frontier points and a
//! background grid with cell size `r / sqrt(2)`, so each cell holds at most
//! one sample. Each iteration pops a random active point and tries up to 30
//! candidates in the annulus `[r, 2r)` around it. A candidate is accepted if
//! it lies in the region and no existing sample within the surrounding 5x5
//! cell block is closer than `r`. A point whose candidates all fail is
//! retired. The run ends when the active list drains, leaving a near-maximal
//! sample.
//!
//! The spacing radius is derived from the requested count so the maximal
//! sample always overshoots it; the pipeline truncates the tail.
//!
//! # References
//!
//! - [Fast Poisson Disk Sampling in Arbitrary Dimensions (Bridson, SIGGRAPH 2007)](https://www.cs.ubc.ca/~rbridson/docs/bridson-siggraph07-poissondisk.pdf)

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::{SQRT_2, TAU};

use crate::config::SampleRegion;

/// Candidate attempts per active point before it is retired
const MAX_CANDIDATES: u32 = 30;

/// Minimum spacing for a target point count
///
/// A maximal sample at this radius covers the region with discs of radius
/// `r`, which bounds the sample size from below by `count` for both the unit
/// square and the inscribed disc.
fn min_distance(count: usize) -> f64 {
    0.5 / (count as f64).sqrt()
}

/// Background acceleration grid over the unit square
///
/// Cell size is `r / sqrt(2)`, so any two points in one cell would be closer
/// than `r`; each cell therefore stores at most one sample index.
struct BackgroundGrid {
    cell_size: f64,
    width: usize,
    cells: Vec<Option<usize>>,
}

impl BackgroundGrid {
    fn new(min_dist: f64) -> Self {
        let cell_size = min_dist / SQRT_2;
        let width = (1.0 / cell_size).ceil() as usize;
        Self {
            cell_size,
            width,
            cells: vec![None; width * width],
        }
    }

    fn cell_of(&self, point: DVec2) -> (usize, usize) {
        let gx = ((point.x / self.cell_size) as usize).min(self.width - 1);
        let gy = ((point.y / self.cell_size) as usize).min(self.width - 1);
        (gx, gy)
    }

    fn insert(&mut self, point: DVec2, index: usize) {
        let (gx, gy) = self.cell_of(point);
        self.cells[gy * self.width + gx] = Some(index);
    }

    /// Check the 5x5 cell block around `point` for a sample closer than the
    /// spacing radius
    ///
    /// Two points closer than `r` are at most two cells apart on each axis,
    /// so the block scan is exhaustive.
    fn has_neighbor_within(&self, point: DVec2, points: &[DVec2], dist_sq: f64) -> bool {
        let (gx, gy) = self.cell_of(point);
        let x0 = gx.saturating_sub(2);
        let y0 = gy.saturating_sub(2);
        let x1 = (gx + 2).min(self.width - 1);
        let y1 = (gy + 2).min(self.width - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                if let Some(i) = self.cells[y * self.width + x] {
                    if points[i].distance_squared(point) < dist_sq {
                        return true;
                    }
                }
            }
        }
        false
    }
}

/// Generate a blue-noise point set in the given region
///
/// Produces at least `count` points (usually two to three times as many) in
/// sample-space coordinates `[0,1]x[0,1]`, with every pair at least the
/// derived spacing radius apart. The caller keeps however many it needs from
/// the front of the sequence.
///
/// All randomness comes from the supplied generator, so the same generator
/// state always yields the identical point sequence.
///
/// # Arguments
///
/// * `count` - Target point count the sample must reach
/// * `region` - Region of the unit square to fill
/// * `rng` - Seeded random stream shared with the rest of the pipeline
///
/// # Returns
///
/// Vector of sample-space points; empty when `count` is zero
///
/// # Example
///
/// ```rust
/// use dungeon_graph::generation::generate_poisson_points;
/// use dungeon_graph::SampleRegion;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
/// let points = generate_poisson_points(16, SampleRegion::Square, &mut rng);
/// assert!(points.len() >= 16);
/// ```
pub fn generate_poisson_points(
    count: usize,
    region: SampleRegion,
    rng: &mut ChaCha8Rng,
) -> Vec<DVec2> {
    if count == 0 {
        return Vec::new();
    }

    let min_dist = min_distance(count);
    let min_dist_sq = min_dist * min_dist;

    let mut grid = BackgroundGrid::new(min_dist);
    let mut points: Vec<DVec2> = Vec::new();
    let mut active: Vec<DVec2> = Vec::new();

    // Rejection-sample the first point into the region
    let first = loop {
        let candidate = DVec2::new(rng.gen::<f64>(), rng.gen::<f64>());
        if region.contains(candidate) {
            break candidate;
        }
    };
    grid.insert(first, 0);
    points.push(first);
    active.push(first);

    while !active.is_empty() {
        let slot = rng.gen_range(0..active.len());
        let center = active[slot];

        let mut placed = false;
        for _ in 0..MAX_CANDIDATES {
            let angle = rng.gen_range(0.0..TAU);
            let radius = rng.gen_range(min_dist..2.0 * min_dist);
            let candidate = center + radius * DVec2::new(angle.cos(), angle.sin());

            if !region.contains(candidate)
                || grid.has_neighbor_within(candidate, &points, min_dist_sq)
            {
                continue;
            }

            grid.insert(candidate, points.len());
            points.push(candidate);
            active.push(candidate);
            placed = true;
            break;
        }

        if !placed {
            active.swap_remove(slot);
        }
    }

    points
}

/// Generate a blue-noise point set from a bare seed
///
/// Convenience wrapper for standalone use; the generation pipeline threads
/// its own stream through [`generate_poisson_points`] instead, so later
/// stages keep drawing from the same sequence.
pub fn sample_poisson(count: usize, seed: u64, region: SampleRegion) -> Vec<DVec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_poisson_points(count, region, &mut rng)
}

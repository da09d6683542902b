//! Dungeon Generation Configuration and Builder
//!
//! This module provides configuration types for deterministic dungeon graph generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::DVec2;

use crate::error::{DungeonError, Result};

/// Region the blue-noise sampler fills with room positions
///
/// Coordinates live in the unit sample space `[0,1]x[0,1]`; the disc is the
/// largest one inscribed in that square (center `(0.5, 0.5)`, radius `0.5`).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleRegion {
    /// The full unit square
    #[default]
    Square,
    /// The disc inscribed in the unit square
    Disc,
}

impl SampleRegion {
    /// Check whether a sample-space point lies inside this region
    #[inline]
    pub fn contains(self, point: DVec2) -> bool {
        match self {
            SampleRegion::Square => {
                point.x >= 0.0 && point.x <= 1.0 && point.y >= 0.0 && point.y <= 1.0
            }
            SampleRegion::Disc => {
                let d = point - DVec2::new(0.5, 0.5);
                d.length_squared() <= 0.25
            }
        }
    }

    /// Get a human-readable name for this region
    pub fn name(self) -> &'static str {
        match self {
            SampleRegion::Square => "Square",
            SampleRegion::Disc => "Disc",
        }
    }
}

/// Configuration for deterministic dungeon graph generation
///
/// The same configuration will always produce the identical dungeon: every
/// random decision (room positions, sizes, edge weights, loop picks, roles)
/// is drawn from one stream seeded with `seed`.
///
/// # Serialization
///
/// Only the configuration is serialized (a few dozen bytes), not the generated
/// graph. A layout is regenerated from its configuration when loading.
///
/// # Example
///
/// ```rust
/// use dungeon_graph::*;
///
/// let config = DungeonConfigBuilder::new()
///     .seed(42)
///     .vertex_count(24)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// // Config is serializable (with "serde" feature)
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: DungeonConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config.seed, restored.seed);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DungeonConfig {
    /// Number of rooms to generate (at least 3)
    ///
    /// The sampler may yield more points than this; the excess tail is
    /// dropped so the final graph has exactly this many vertices.
    pub vertex_count: usize,

    /// Number of extra non-tree edges to reintroduce after the spanning tree
    ///
    /// Capped to the vertex count. The generator may deliver fewer loops when
    /// its retry budget runs out on a small or dense graph; see
    /// [`Dungeon::loops_added`](crate::Dungeon::loops_added).
    pub loop_count: usize,

    /// Smallest room size that can be rolled
    pub min_room_size: f64,

    /// Largest room size that can be rolled (must be >= `min_room_size`)
    pub max_room_size: f64,

    /// Width of the target area room positions are scaled into
    pub area_width: f64,

    /// Height of the target area room positions are scaled into
    pub area_height: f64,

    /// Random seed for deterministic generation (must be >= 1)
    ///
    /// The same seed (with the same other parameters) always produces the
    /// exact same dungeon, byte for byte.
    pub seed: u64,

    /// Shape of the sample region the rooms are scattered over
    pub sample_region: SampleRegion,

    /// Tag rooms with gameplay roles (Start/Boss/Treasure/Enemy)
    ///
    /// When false every room keeps [`RoomRole::Plain`](crate::RoomRole::Plain)
    /// and no role randomness is consumed.
    pub generate_roles: bool,

    /// Fraction of rooms rolled as treasure rooms, in `[0, 1]`
    ///
    /// Only meaningful when `generate_roles` is set.
    pub treasure_fraction: f64,
}

impl DungeonConfig {
    /// Validate the configuration, rejecting anything generation cannot run on
    ///
    /// The builder performs the same checks; this exists so configurations
    /// assembled directly (the fields are public) fail fast as well.
    pub fn validate(&self) -> Result<()> {
        if self.vertex_count < 3 {
            return Err(DungeonError::InvalidConfig(format!(
                "vertex count must be >= 3 (got {})",
                self.vertex_count
            )));
        }
        if self.min_room_size > self.max_room_size {
            return Err(DungeonError::InvalidConfig(format!(
                "room size range is inverted ({} > {})",
                self.min_room_size, self.max_room_size
            )));
        }
        if !(self.area_width > 0.0) || !(self.area_height > 0.0) {
            return Err(DungeonError::InvalidConfig(format!(
                "area dimensions must be positive (got {} x {})",
                self.area_width, self.area_height
            )));
        }
        if self.seed == 0 {
            return Err(DungeonError::InvalidConfig(
                "seed must be >= 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.treasure_fraction) {
            return Err(DungeonError::InvalidConfig(format!(
                "treasure fraction must be in [0, 1] (got {})",
                self.treasure_fraction
            )));
        }
        Ok(())
    }
}

impl Default for DungeonConfig {
    fn default() -> Self {
        DungeonConfigBuilder::new().build().unwrap()
    }
}

/// Builder for creating [`DungeonConfig`] with validation
///
/// # Example
///
/// ```rust
/// use dungeon_graph::*;
///
/// // Use defaults
/// let config = DungeonConfigBuilder::new().build().unwrap();
///
/// // Customize
/// let config = DungeonConfigBuilder::new()
///     .seed(12345)
///     .vertex_count(50)
///     .unwrap()
///     .loop_count(5)
///     .room_size_range(2.0, 6.0)
///     .unwrap()
///     .sample_region(SampleRegion::Disc)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DungeonConfigBuilder {
    vertex_count: usize,
    loop_count: usize,
    min_room_size: f64,
    max_room_size: f64,
    area_width: f64,
    area_height: f64,
    seed: Option<u64>,
    sample_region: SampleRegion,
    generate_roles: bool,
    treasure_fraction: f64,
}

impl DungeonConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - vertex_count: 32
    /// - loop_count: 4
    /// - room size range: [1.0, 3.0]
    /// - area: 100 x 100
    /// - seed: random (generated from thread_rng)
    /// - sample_region: Square
    /// - generate_roles: false
    /// - treasure_fraction: 0.2
    pub fn new() -> Self {
        Self {
            vertex_count: 32,
            loop_count: 4,
            min_room_size: 1.0,
            max_room_size: 3.0,
            area_width: 100.0,
            area_height: 100.0,
            seed: None,
            sample_region: SampleRegion::Square,
            generate_roles: false,
            treasure_fraction: 0.2,
        }
    }

    /// Set the random seed (must be >= 1)
    ///
    /// Using the same seed with the same other parameters will produce an
    /// identical dungeon every time.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of rooms to generate
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `count < 3` (a triangulation needs three
    /// non-collinear points).
    pub fn vertex_count(mut self, count: usize) -> Result<Self> {
        if count < 3 {
            return Err(DungeonError::InvalidConfig(format!(
                "vertex count must be >= 3 (got {})",
                count
            )));
        }
        self.vertex_count = count;
        Ok(self)
    }

    /// Set the number of loop edges to reintroduce after the spanning tree
    ///
    /// Values above the vertex count are capped at generation time.
    pub fn loop_count(mut self, count: usize) -> Self {
        self.loop_count = count;
        self
    }

    /// Set the room size range rooms roll their size from
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `min > max`.
    pub fn room_size_range(mut self, min: f64, max: f64) -> Result<Self> {
        if min > max {
            return Err(DungeonError::InvalidConfig(format!(
                "room size range is inverted ({} > {})",
                min, max
            )));
        }
        self.min_room_size = min;
        self.max_room_size = max;
        Ok(self)
    }

    /// Set the target area room positions are scaled into
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either dimension is not positive.
    pub fn area(mut self, width: f64, height: f64) -> Result<Self> {
        if !(width > 0.0) || !(height > 0.0) {
            return Err(DungeonError::InvalidConfig(format!(
                "area dimensions must be positive (got {} x {})",
                width, height
            )));
        }
        self.area_width = width;
        self.area_height = height;
        Ok(self)
    }

    /// Set the sample region shape
    pub fn sample_region(mut self, region: SampleRegion) -> Self {
        self.sample_region = region;
        self
    }

    /// Enable or disable gameplay role tagging
    pub fn generate_roles(mut self, enabled: bool) -> Self {
        self.generate_roles = enabled;
        self
    }

    /// Set the fraction of rooms rolled as treasure rooms
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `fraction` is outside `[0, 1]`.
    pub fn treasure_fraction(mut self, fraction: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(DungeonError::InvalidConfig(format!(
                "treasure fraction must be in [0, 1] (got {})",
                fraction
            )));
        }
        self.treasure_fraction = fraction;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random nonzero seed using
    /// thread_rng.
    pub fn build(self) -> Result<DungeonConfig> {
        // seed 0 is rejected by validate(); the random default avoids it
        let seed = self.seed.unwrap_or_else(|| rand::random::<u64>().max(1));

        let config = DungeonConfig {
            vertex_count: self.vertex_count,
            loop_count: self.loop_count,
            min_room_size: self.min_room_size,
            max_room_size: self.max_room_size,
            area_width: self.area_width,
            area_height: self.area_height,
            seed,
            sample_region: self.sample_region,
            generate_roles: self.generate_roles,
            treasure_fraction: self.treasure_fraction,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for DungeonConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Error types for dungeon graph generation

use std::fmt;

/// Errors that can occur during dungeon generation
#[derive(Debug, Clone)]
pub enum DungeonError {
    /// Configuration validation failed
    InvalidConfig(String),
    /// The sampled point set cannot be triangulated (collinear or too few points)
    DegenerateGeometry(String),
    /// Generation hit an internal inconsistency
    GenerationFailed(String),
}

impl fmt::Display for DungeonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DungeonError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            DungeonError::DegenerateGeometry(msg) => write!(f, "degenerate geometry: {}", msg),
            DungeonError::GenerationFailed(msg) => write!(f, "generation failed: {}", msg),
        }
    }
}

impl std::error::Error for DungeonError {}

/// Result type alias for dungeon generation operations
pub type Result<T> = std::result::Result<T, DungeonError>;

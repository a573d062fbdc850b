//! Error types for dungeon layout generation

use thiserror::Error;

use crate::room::RoomId;

/// Errors that can occur while configuring a generator or querying a dungeon
///
/// Degenerate layouts (orphan corridors, unresolved collisions) are not
/// errors; they are reported through the generated data instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DungeonError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Requested room ID does not exist
    #[error("room not found: {0}")]
    RoomNotFound(RoomId),
}

/// Result type alias for dungeon operations
pub type Result<T> = std::result::Result<T, DungeonError>;

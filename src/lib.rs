//! Room-and-corridor dungeon layout generation
//!
//! A standalone library for generating 2D dungeon layouts: rectangular rooms
//! scattered and pushed apart, the largest ones linked by a spanning tree
//! over an approximate triangulation, corridors carved between them and the
//! whole thing rasterized into a tile grid.
//!
//! # Quick Start
//!
//! ```rust
//! use dungeon_layout::*;
//!
//! // Generate a dungeon
//! let config = DungeonConfigBuilder::new()
//!     .seed(42)
//!     .room_count(20, 30)
//!     .hallway_width(3).unwrap()
//!     .build().unwrap();
//!
//! let dungeon = Dungeon::generate(config).unwrap();
//!
//! // Print it
//! println!("{}", dungeon);
//! println!("{} rooms, {} hallways", dungeon.room_count(), dungeon.hallways().len());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) nearest-room lookups using a KD-tree
//! - `serde`: Enables serialization support for configuration, rooms, hallways and tiles

// Modules
pub mod error;
pub mod config;
pub mod room;
pub mod graph;
pub mod generation;
pub mod hallway;
pub mod tiles;
pub mod dungeon;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{DungeonError, Result};
pub use config::{
    Bounds, DungeonConfig, DungeonConfigBuilder, MAX_ROOM_SIZE, MAX_ROOM_SPACING,
    MAX_SCATTER_RADIUS,
};
pub use room::{Position, Room, RoomArena, RoomId, RoomKind};
pub use graph::{Edge, Graph, Node};
pub use hallway::{plan_hallway, Hallway, HallwayId};
pub use tiles::{BasicGlyphMapper, CustomGlyphMapper, GlyphMapper, Tile, TileGrid};
pub use dungeon::Dungeon;
pub use generation::{SeparationOptions, SeparationReport};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::IVec2 for convenience
pub use glam::IVec2;

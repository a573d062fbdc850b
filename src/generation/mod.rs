//! Layout generation stages
//!
//! Scatters rooms in a disk, pushes them apart, triangulates the largest
//! ones and reduces the triangulation to the connections that become
//! corridors. Each stage is a free function so it can be run and tested on
//! its own; [`Dungeon::generate`](crate::Dungeon::generate) chains them.

mod scatter;
mod separation;
mod spanning_tree;
mod triangulation;

pub use scatter::{random_point_in_disk, scatter_room, scatter_rooms};
pub use separation::{
    normalize_positions, rooms_collide, separate_rooms, SeparationOptions, SeparationReport,
};
pub use spanning_tree::{extra_edge_count, minimum_spanning_tree};
pub use triangulation::{complete_graph, next_neighbor_on_right, select_main_rooms, triangulate};

use rand::Rng;

use crate::config::DungeonConfig;
use crate::graph::{Graph, Node};
use crate::room::{Room, RoomId};

/// Rooms and connection graph produced by the stages before corridor carving
#[derive(Debug, Clone)]
pub struct Layout {
    /// Every scattered room in ID order, separated and normalized
    pub rooms: Vec<Room>,
    /// Main room IDs, largest first
    pub main_rooms: Vec<RoomId>,
    /// Connections to carve, in carving order
    pub connections: Graph,
    pub separation: SeparationReport,
}

/// Run every stage up to the spanning tree
///
/// Draws the room count and the scatter radius, scatters the rooms,
/// separates and normalizes them, promotes half of them (rounded down) to
/// main rooms, triangulates those and keeps the spanning tree plus the
/// configured share of extra edges.
pub fn generate_layout<R: Rng + ?Sized>(config: &DungeonConfig, rng: &mut R) -> Layout {
    let room_count = config.room_count.sample(rng);
    let radius = config.radius.sample(rng);

    let mut rooms = scatter_rooms(config, room_count, radius, rng).into_rooms();
    tracing::debug!(rooms = rooms.len(), radius, "scattered rooms");

    let separation = separate_rooms(
        &mut rooms,
        SeparationOptions {
            spacing: config.min_spacing,
            max_passes: config.max_separation_passes,
        },
    );
    normalize_positions(&mut rooms);

    let main_count = rooms.len() / 2;
    let main_rooms = select_main_rooms(&mut rooms, main_count);
    let nodes: Vec<Node> = main_rooms
        .iter()
        .map(|id| Node::from(&rooms[id.index()]))
        .collect();

    let triangulation = triangulate(nodes);
    let connections = minimum_spanning_tree(&triangulation, config.extra_edge_fraction, rng);

    Layout {
        rooms,
        main_rooms,
        connections,
        separation,
    }
}

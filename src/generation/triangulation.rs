//! Approximate triangulation of the main rooms
//!
//! Builds a Delaunay-like proximity graph without a full Delaunay algorithm:
//! around each room, starting from its nearest neighbour, the walk keeps
//! turning to the right and picks the neighbour that sees the current edge
//! under the widest angle (the empty-circumcircle choice for that edge).
//!
//! The result is usually close to a Delaunay triangulation but carries no
//! guarantee: collinear or coincident rooms can produce missing or crossing
//! edges. Later stages only need a connected graph of plausible neighbours.

use std::collections::HashSet;

use crate::graph::{Edge, Graph, Node};
use crate::room::{Room, RoomId, RoomKind};

/// Promote the `count` largest rooms to [`RoomKind::Main`]
///
/// Rooms are ranked by area, largest first; equal areas keep their input
/// order. Returns the promoted rooms' IDs in rank order.
pub fn select_main_rooms(rooms: &mut [Room], count: usize) -> Vec<RoomId> {
    let mut order: Vec<usize> = (0..rooms.len()).collect();
    order.sort_by_key(|&index| std::cmp::Reverse(rooms[index].area()));

    order
        .into_iter()
        .take(count)
        .map(|index| {
            let room = &mut rooms[index];
            room.kind = RoomKind::Main;
            room.id
        })
        .collect()
}

/// Link every pair of nodes
///
/// Node `i` is linked to `i - 1`, `i - 2`, ... `0` in that order, which fixes
/// the tie-break order of [`Graph::nearest_neighbor`].
pub fn complete_graph(nodes: &[Node]) -> Graph {
    let mut graph = Graph::with_nodes(nodes.to_vec());
    for (index, &node) in nodes.iter().enumerate() {
        for &earlier in nodes[..index].iter().rev() {
            graph.add_edge(Edge::new(node, earlier));
        }
    }
    graph
}

/// Find the next neighbour to the right of `edge`
///
/// Among the nodes strictly on the right-hand side of the directed edge
/// (negative cross product), returns the one minimizing the cosine of the
/// angle it forms with the edge's endpoints. Coincident points yield a NaN
/// cosine and are never selected.
pub fn next_neighbor_on_right(nodes: &[Node], edge: &Edge) -> Option<Node> {
    let (first, second) = (edge.first(), edge.second());
    let p1 = first.position;
    let p2 = second.position;
    let direction = (p2 - p1).as_i64vec2();

    let mut min_cos = 2.0_f64;
    let mut best = None;

    for &candidate in nodes {
        if candidate == first || candidate == second {
            continue;
        }

        let c = candidate.position;
        let det = direction.perp_dot((c - p1).as_i64vec2());
        if det >= 0 {
            continue;
        }

        let to_first = (p1 - c).as_dvec2();
        let to_second = (p2 - c).as_dvec2();
        let cos = to_first.dot(to_second) / (to_first.length() * to_second.length());
        if cos < min_cos {
            min_cos = cos;
            best = Some(candidate);
        }
    }

    best
}

/// Walk the fan of edges around one node
///
/// Starts at the nearest neighbour and turns right until the walk comes back
/// to it or runs out of candidates. The closing edge repeats the first one.
fn fan_edges(node: Node, nearest: Node, nodes: &[Node], out: &mut Vec<Edge>) {
    let mut last = Edge::new(node, nearest);
    out.push(last.clone());

    // A proper walk visits each neighbour at most once
    for _ in 0..nodes.len() {
        let Some(next) = next_neighbor_on_right(nodes, &last) else {
            break;
        };
        last = Edge::new(node, next);
        out.push(last.clone());
        if next == nearest {
            break;
        }
    }
}

/// Build the approximate triangulation graph over `nodes`
///
/// Duplicate edges (in either direction) are dropped, keeping the first one
/// found. Fewer than two nodes give a graph without edges.
pub fn triangulate(nodes: Vec<Node>) -> Graph {
    let complete = complete_graph(&nodes);

    let mut fan = Vec::new();
    for &node in &nodes {
        if let Some(nearest) = complete.nearest_neighbor(node.room) {
            fan_edges(node, nearest, &nodes, &mut fan);
        }
    }

    let mut seen = HashSet::with_capacity(fan.len());
    let edges: Vec<Edge> = fan
        .into_iter()
        .filter(|edge| seen.insert(edge.clone()))
        .collect();

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        "triangulated main rooms"
    );

    Graph::from_parts(nodes, edges)
}

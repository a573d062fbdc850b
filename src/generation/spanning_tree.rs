//! Minimum spanning tree with optional loops
//!
//! Kruskal's algorithm over the triangulation, ordered by squared distance,
//! followed by a random sample of the discarded edges so the dungeon is not
//! a pure tree.

use rand::Rng;

use crate::graph::{Edge, Graph};

/// Number of discarded edges re-added for a given fraction
///
/// Rounds half away from zero: 5 unused edges at 0.5 give 3 extra edges.
pub fn extra_edge_count(unused_edges: usize, fraction: f32) -> usize {
    (unused_edges as f32 * fraction.clamp(0.0, 1.0)).round() as usize
}

/// Reduce `graph` to a minimum spanning tree plus a share of extra edges
///
/// Edges are sorted by squared length (stable, so equal lengths keep the
/// triangulation order) and accepted when their endpoints are not yet
/// connected. Then `extra_edge_count(unused, extra_fraction)` of the
/// rejected edges are drawn uniformly without replacement and appended.
///
/// The returned graph has the same nodes as `graph`. Its edge order is the
/// tree edges in acceptance order followed by the extra edges in draw order.
pub fn minimum_spanning_tree<R: Rng + ?Sized>(
    graph: &Graph,
    extra_fraction: f32,
    rng: &mut R,
) -> Graph {
    let mut sorted: Vec<Edge> = graph.edges().to_vec();
    sorted.sort_by(|a, b| a.distance_squared().total_cmp(&b.distance_squared()));

    let mut tree = Graph::with_nodes(graph.nodes().to_vec());
    let mut unused = Vec::new();

    for edge in sorted {
        if tree.path_exists(edge.first().room, edge.second().room) {
            unused.push(edge);
        } else {
            tree.add_edge(edge);
        }
    }

    let tree_edges = tree.edge_count();
    let extra = if extra_fraction != 0.0 {
        extra_edge_count(unused.len(), extra_fraction)
    } else {
        0
    };
    for _ in 0..extra {
        let index = rng.gen_range(0..unused.len());
        tree.add_edge(unused.remove(index));
    }

    tracing::debug!(
        tree_edges,
        extra_edges = extra,
        unused_edges = unused.len(),
        "selected corridors"
    );

    tree
}

//! Room connectivity graph
//!
//! Nodes are main rooms, edges are candidate connections between them. Each
//! pipeline stage builds a fresh [`Graph`] from the previous stage's output
//! instead of mutating a shared one.

use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use crate::room::{Position, Room, RoomId};

/// A graph vertex standing for one room
///
/// Carries a snapshot of the room's position for the geometric tests of the
/// triangulation. Equality is by room ID only.
#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub room: RoomId,
    pub position: Position,
}

impl Node {
    pub fn new(room: RoomId, position: Position) -> Self {
        Self { room, position }
    }
}

impl From<&Room> for Node {
    fn from(room: &Room) -> Self {
        Self::new(room.id, room.position)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.room == other.room
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.room.hash(state);
    }
}

/// Undirected link between two nodes
///
/// `A–B` and `B–A` compare and hash equal. Distances are measured between
/// the rooms' top-left corners and computed on first use.
#[derive(Debug, Clone)]
pub struct Edge {
    nodes: [Node; 2],
    distance: OnceCell<f64>,
    distance_squared: OnceCell<f64>,
}

impl Edge {
    pub fn new(first: Node, second: Node) -> Self {
        Self {
            nodes: [first, second],
            distance: OnceCell::new(),
            distance_squared: OnceCell::new(),
        }
    }

    #[inline]
    pub fn first(&self) -> Node {
        self.nodes[0]
    }

    #[inline]
    pub fn second(&self) -> Node {
        self.nodes[1]
    }

    #[inline]
    pub fn nodes(&self) -> [Node; 2] {
        self.nodes
    }

    /// Check whether the edge touches the given room
    pub fn contains(&self, room: RoomId) -> bool {
        self.nodes[0].room == room || self.nodes[1].room == room
    }

    /// The endpoint opposite to `room`, if `room` is an endpoint
    pub fn other(&self, room: RoomId) -> Option<Node> {
        if self.nodes[0].room == room {
            Some(self.nodes[1])
        } else if self.nodes[1].room == room {
            Some(self.nodes[0])
        } else {
            None
        }
    }

    /// Euclidean length
    pub fn distance(&self) -> f64 {
        *self
            .distance
            .get_or_init(|| self.distance_squared().sqrt())
    }

    /// Squared Euclidean length, cheaper than [`Edge::distance`] for ordering
    pub fn distance_squared(&self) -> f64 {
        *self.distance_squared.get_or_init(|| {
            self.nodes[0]
                .position
                .as_dvec2()
                .distance_squared(self.nodes[1].position.as_dvec2())
        })
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        let [a, b] = self.nodes;
        let [c, d] = other.nodes;
        (a == c && b == d) || (a == d && b == c)
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (a, b) = (self.nodes[0].room, self.nodes[1].room);
        a.min(b).hash(state);
        a.max(b).hash(state);
    }
}

/// Nodes, edges and the adjacency derived from them
///
/// Every edge passed to [`Graph::add_edge`] is recorded on both endpoints.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    edges_by_node: HashMap<RoomId, Vec<usize>>,
    neighbors: HashMap<RoomId, Vec<RoomId>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph over the given nodes with no edges yet
    pub fn with_nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            ..Default::default()
        }
    }

    /// Create a graph from nodes and edges, keeping the edge order
    pub fn from_parts(nodes: Vec<Node>, edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut graph = Self::with_nodes(nodes);
        for edge in edges {
            graph.add_edge(edge);
        }
        graph
    }

    /// Append an edge and update both endpoints' adjacency
    pub fn add_edge(&mut self, edge: Edge) {
        let index = self.edges.len();
        for (node, other) in [(edge.first(), edge.second()), (edge.second(), edge.first())] {
            self.edges_by_node.entry(node.room).or_default().push(index);
            self.neighbors.entry(node.room).or_default().push(other.room);
        }
        self.edges.push(edge);
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Rooms adjacent to `room`, in edge insertion order
    pub fn neighbors(&self, room: RoomId) -> &[RoomId] {
        self.neighbors
            .get(&room)
            .map(|n| n.as_slice())
            .unwrap_or(&[])
    }

    /// Edges touching `room`, in insertion order
    pub fn incident_edges(&self, room: RoomId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges_by_node
            .get(&room)
            .into_iter()
            .flatten()
            .map(move |&index| &self.edges[index])
    }

    /// The endpoint of the shortest incident edge
    ///
    /// Ties go to the edge inserted first. Returns `None` for isolated nodes.
    pub fn nearest_neighbor(&self, room: RoomId) -> Option<Node> {
        let mut nearest: Option<&Edge> = None;
        for edge in self.incident_edges(room) {
            match nearest {
                Some(best) if edge.distance_squared() >= best.distance_squared() => {}
                _ => nearest = Some(edge),
            }
        }
        nearest.and_then(|edge| edge.other(room))
    }

    /// Check whether a path links `from` and `to` (depth-first search)
    pub fn path_exists(&self, from: RoomId, to: RoomId) -> bool {
        if from == to {
            return true;
        }

        let mut stack = vec![from];
        let mut visited = HashSet::new();

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            for &neighbor in self.neighbors(current) {
                if neighbor == to {
                    return true;
                }
                if !visited.contains(&neighbor) {
                    stack.push(neighbor);
                }
            }
        }
        false
    }

    /// Check whether every node can reach every other node
    pub fn is_connected(&self) -> bool {
        match self.nodes.first() {
            None => true,
            Some(start) => self
                .nodes
                .iter()
                .all(|node| self.path_exists(start.room, node.room)),
        }
    }

    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.incident_edges(edge.first().room).any(|e| e == edge)
    }
}

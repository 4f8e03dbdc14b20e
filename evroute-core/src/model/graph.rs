//! The range-feasibility graph searched by the shortest-path solver.

use geo::Point;
use hashbrown::HashMap;

use super::ChargerStation;

pub const ORIGIN_KEY: &str = "O";
pub const DESTINATION_KEY: &str = "D";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Origin,
    Charger,
    Destination,
}

/// One graph node: the origin, the destination, or a candidate charger.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub key: String,
    pub kind: NodeKind,
    pub lon: f64,
    pub lat: f64,
    pub station: Option<ChargerStation>,
}

impl GraphNode {
    pub fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    pub fn coord(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub to: usize,
    /// Travel plus charging time in seconds; always positive and finite.
    pub weight_secs: f64,
}

/// Directed weighted graph over origin, candidate chargers and
/// destination. An edge exists only for range-feasible legs; weights are
/// strictly positive finite seconds, which Dijkstra's correctness relies
/// on.
#[derive(Debug, Clone)]
pub struct FeasibilityGraph {
    nodes: Vec<GraphNode>,
    adjacency: Vec<Vec<Edge>>,
    index: HashMap<String, usize>,
}

impl FeasibilityGraph {
    pub fn new(nodes: Vec<GraphNode>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(position, node)| (node.key.clone(), position))
            .collect();
        let adjacency = vec![Vec::new(); nodes.len()];
        Self {
            nodes,
            adjacency,
            index,
        }
    }

    /// Adds a directed edge. Weights that are not strictly positive finite
    /// numbers are silently discarded rather than stored.
    pub fn add_edge(&mut self, from: usize, to: usize, weight_secs: f64) {
        if weight_secs.is_finite() && weight_secs > 0.0 {
            self.adjacency[from].push(Edge { to, weight_secs });
        }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn node(&self, position: usize) -> &GraphNode {
        &self.nodes[position]
    }

    pub fn edges_from(&self, position: usize) -> &[Edge] {
        &self.adjacency[position]
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(key: &str, kind: NodeKind) -> GraphNode {
        GraphNode {
            key: key.to_string(),
            kind,
            lon: 0.0,
            lat: 0.0,
            station: None,
        }
    }

    #[test]
    fn rejects_non_positive_and_non_finite_weights() {
        let mut graph = FeasibilityGraph::new(vec![
            node(ORIGIN_KEY, NodeKind::Origin),
            node(DESTINATION_KEY, NodeKind::Destination),
        ]);

        graph.add_edge(0, 1, 0.0);
        graph.add_edge(0, 1, -5.0);
        graph.add_edge(0, 1, f64::NAN);
        graph.add_edge(0, 1, f64::INFINITY);
        assert_eq!(graph.edge_count(), 0);

        graph.add_edge(0, 1, 120.0);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn key_lookup() {
        let graph = FeasibilityGraph::new(vec![
            node(ORIGIN_KEY, NodeKind::Origin),
            node("node/1", NodeKind::Charger),
            node(DESTINATION_KEY, NodeKind::Destination),
        ]);
        assert_eq!(graph.index_of("node/1"), Some(1));
        assert_eq!(graph.index_of("missing"), None);
    }
}

//! Shortest-time-path search over the feasibility graph.

use std::{cmp::Ordering, collections::BinaryHeap};

use hashbrown::HashMap;

use crate::model::FeasibilityGraph;

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: usize,
}

impl Eq for State {}

// Min-heap by cost (reversed from standard Rust BinaryHeap). Costs are
// finite by graph construction, so total_cmp is a plain numeric order.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra's algorithm from `from` to `to`, by node key. Returns node
/// positions along the minimum-total-weight path, or `None` when the
/// destination is unreachable. Equal-cost ties resolve arbitrarily.
pub fn shortest_path(graph: &FeasibilityGraph, from: &str, to: &str) -> Option<Vec<usize>> {
    let start = graph.index_of(from)?;
    let target = graph.index_of(to)?;

    let mut distances: HashMap<usize, f64> = HashMap::with_capacity(graph.len());
    let mut predecessors: HashMap<usize, usize> = HashMap::with_capacity(graph.len());
    let mut heap = BinaryHeap::new();

    heap.push(State {
        cost: 0.0,
        node: start,
    });
    distances.insert(start, 0.0);

    while let Some(State { cost, node }) = heap.pop() {
        if node == target {
            break;
        }

        // Skip if we've found a better path
        if let Some(&best) = distances.get(&node) {
            if cost > best {
                continue;
            }
        }

        for edge in graph.edges_from(node) {
            let next_cost = cost + edge.weight_secs;
            match distances.entry(edge.to) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    predecessors.insert(edge.to, node);
                    heap.push(State {
                        cost: next_cost,
                        node: edge.to,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        predecessors.insert(edge.to, node);
                        heap.push(State {
                            cost: next_cost,
                            node: edge.to,
                        });
                    }
                }
            }
        }
    }

    if target != start && !predecessors.contains_key(&target) {
        return None;
    }

    // Follow predecessors backward from target to start
    let mut path = vec![target];
    let mut current = target;
    while current != start {
        current = *predecessors.get(&current)?;
        path.push(current);
    }
    path.reverse();
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DESTINATION_KEY, GraphNode, NodeKind, ORIGIN_KEY};

    fn graph(keys: &[&str], edges: &[(usize, usize, f64)]) -> FeasibilityGraph {
        let nodes = keys
            .iter()
            .enumerate()
            .map(|(position, key)| GraphNode {
                key: (*key).to_string(),
                kind: if position == 0 {
                    NodeKind::Origin
                } else if position == keys.len() - 1 {
                    NodeKind::Destination
                } else {
                    NodeKind::Charger
                },
                lon: 0.0,
                lat: 0.0,
                station: None,
            })
            .collect();

        let mut graph = FeasibilityGraph::new(nodes);
        for &(from, to, weight) in edges {
            graph.add_edge(from, to, weight);
        }
        graph
    }

    #[test]
    fn prefers_cheaper_two_hop_path() {
        let g = graph(
            &[ORIGIN_KEY, "a", DESTINATION_KEY],
            &[(0, 2, 1000.0), (0, 1, 300.0), (1, 2, 400.0)],
        );
        let path = shortest_path(&g, ORIGIN_KEY, DESTINATION_KEY).unwrap();
        assert_eq!(path, vec![0, 1, 2]);
    }

    #[test]
    fn direct_edge_wins_when_cheaper() {
        let g = graph(
            &[ORIGIN_KEY, "a", DESTINATION_KEY],
            &[(0, 2, 500.0), (0, 1, 300.0), (1, 2, 400.0)],
        );
        let path = shortest_path(&g, ORIGIN_KEY, DESTINATION_KEY).unwrap();
        assert_eq!(path, vec![0, 2]);
    }

    #[test]
    fn unreachable_destination_returns_none() {
        let g = graph(&[ORIGIN_KEY, "a", DESTINATION_KEY], &[(0, 1, 300.0)]);
        assert!(shortest_path(&g, ORIGIN_KEY, DESTINATION_KEY).is_none());
    }

    #[test]
    fn missing_keys_return_none() {
        let g = graph(&[ORIGIN_KEY, DESTINATION_KEY], &[(0, 1, 10.0)]);
        assert!(shortest_path(&g, "X", DESTINATION_KEY).is_none());
    }

    #[test]
    fn start_equals_target() {
        let g = graph(&[ORIGIN_KEY, DESTINATION_KEY], &[]);
        let path = shortest_path(&g, ORIGIN_KEY, ORIGIN_KEY).unwrap();
        assert_eq!(path, vec![0]);
    }
}

//! Builds the range-feasibility graph from origin, candidates and
//! destination with a single all-pairs matrix call.

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::client::RoutingApi;
use crate::model::{
    ChargerStation, DESTINATION_KEY, FeasibilityGraph, GraphNode, NodeKind, ORIGIN_KEY, PlanParams,
};
use crate::routing::charging;
use crate::Error;

/// Assembles the node list (origin first, destination last), fetches the
/// travel matrix and adds an edge for every ordered pair whose routed
/// distance fits the vehicle range. Edges into a charger carry that
/// charger's estimated charging time on top of the travel duration.
pub async fn build_feasibility_graph<C: RoutingApi>(
    client: &C,
    candidates: Vec<ChargerStation>,
    params: &PlanParams,
    cancel: &CancellationToken,
) -> Result<FeasibilityGraph, Error> {
    let mut nodes = Vec::with_capacity(candidates.len() + 2);
    nodes.push(GraphNode {
        key: ORIGIN_KEY.to_string(),
        kind: NodeKind::Origin,
        lon: params.origin[0],
        lat: params.origin[1],
        station: None,
    });
    for station in candidates {
        nodes.push(GraphNode {
            key: station.key(),
            kind: NodeKind::Charger,
            lon: station.lon,
            lat: station.lat,
            station: Some(station),
        });
    }
    nodes.push(GraphNode {
        key: DESTINATION_KEY.to_string(),
        kind: NodeKind::Destination,
        lon: params.destination[0],
        lat: params.destination[1],
        station: None,
    });

    let coordinates: Vec<[f64; 2]> = nodes.iter().map(GraphNode::coord).collect();
    let matrix = client.matrix(coordinates, cancel.clone()).await?;

    // Charging cost per node; chargers without a usable connector get no
    // incoming edges at all.
    let charge_secs: Vec<Option<u32>> = nodes
        .iter()
        .map(|node| {
            node.station.as_ref().and_then(|station| {
                charging::estimate_for_station(
                    station,
                    params.ev_max_power_kw,
                    &params.connectors,
                    params.min_power_kw,
                )
                .map(|estimate| estimate.seconds)
            })
        })
        .collect();

    let max_leg_meters = params.ev_range_km * 1000.0;
    let node_count = nodes.len();
    let mut graph = FeasibilityGraph::new(nodes);

    for from in 0..node_count {
        for to in 0..node_count {
            if from == to {
                continue;
            }
            let Some(distance) = matrix.distance(from, to) else {
                continue;
            };
            if !(distance > 0.0 && distance <= max_leg_meters) {
                continue;
            }
            let Some(mut weight) = matrix.duration(from, to) else {
                continue;
            };
            if graph.node(to).kind == NodeKind::Charger {
                match charge_secs[to] {
                    Some(secs) => weight += f64::from(secs),
                    None => continue,
                }
            }
            graph.add_edge(from, to, weight);
        }
    }

    debug!(
        "feasibility graph: {} nodes, {} edges, range {} km",
        graph.len(),
        graph.edge_count(),
        params.ev_range_km
    );
    Ok(graph)
}

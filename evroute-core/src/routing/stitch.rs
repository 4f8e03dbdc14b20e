//! Turns a shortest path over the feasibility graph into a full trip:
//! routed geometry per leg, charging stops and aggregate figures.

use geojson::FeatureCollection;
use log::debug;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::client::{DirectionsLeg, RoutingApi};
use crate::model::trip::{Leg, Stop, TripResult, TripSummary, format_distance, format_duration};
use crate::model::{FeasibilityGraph, NodeKind, PlanParams};
use crate::routing::charging;
use crate::Error;

/// Fetches routed geometry for every leg of the path concurrently and
/// assembles the final trip. Leg order in the result always matches the
/// path, regardless of fetch completion order; any failed leg fails the
/// whole trip.
pub async fn stitch_trip<C: RoutingApi>(
    client: &C,
    graph: &FeasibilityGraph,
    path: &[usize],
    params: &PlanParams,
    cancel: &CancellationToken,
) -> Result<TripResult, Error> {
    if path.len() < 2 {
        return Err(Error::Internal(format!(
            "cannot stitch a path of {} nodes",
            path.len()
        )));
    }

    let mut set: JoinSet<(usize, Result<DirectionsLeg, Error>)> = JoinSet::new();
    for (position, pair) in path.windows(2).enumerate() {
        let coordinates = vec![graph.node(pair[0]).coord(), graph.node(pair[1]).coord()];
        let client = client.clone();
        let cancel = cancel.clone();
        set.spawn(async move { (position, client.directions(coordinates, cancel).await) });
    }

    let mut fetched: Vec<Option<DirectionsLeg>> = vec![None; path.len() - 1];
    while let Some(joined) = set.join_next().await {
        let (position, result) = joined
            .map_err(|err| Error::Internal(format!("leg fetch task failed: {err}")))?;
        fetched[position] = Some(result?);
    }

    let mut legs = Vec::with_capacity(fetched.len());
    let mut features = Vec::with_capacity(fetched.len());
    let mut total_duration_secs = 0.0;
    let mut total_distance_meters = 0.0;
    for (pair, routed) in path.windows(2).zip(fetched) {
        let routed = routed.ok_or_else(|| Error::Internal("leg fetch never completed".into()))?;
        total_duration_secs += routed.duration_secs;
        total_distance_meters += routed.distance_meters;
        legs.push(Leg {
            from: graph.node(pair[0]).key.clone(),
            to: graph.node(pair[1]).key.clone(),
            duration_secs: routed.duration_secs,
            distance_meters: routed.distance_meters,
        });
        features.push(routed.feature);
    }

    let stops = collect_stops(graph, path, params)?;
    let total_charging_time_secs: u32 = stops
        .iter()
        .map(|stop| stop.estimated_charging_time_secs)
        .sum();

    debug!(
        "stitched {} legs, {} stops, {:.0} s driving + {} s charging",
        legs.len(),
        stops.len(),
        total_duration_secs,
        total_charging_time_secs
    );

    Ok(assemble(
        legs,
        stops,
        features,
        total_duration_secs,
        total_distance_meters,
        total_charging_time_secs,
    ))
}

/// Builds a trip from a single already-routed origin-to-destination leg,
/// used when the vehicle reaches the destination without charging.
pub fn trip_from_single_leg(
    baseline: DirectionsLeg,
    from_key: &str,
    to_key: &str,
) -> TripResult {
    let legs = vec![Leg {
        from: from_key.to_string(),
        to: to_key.to_string(),
        duration_secs: baseline.duration_secs,
        distance_meters: baseline.distance_meters,
    }];
    let duration = baseline.duration_secs;
    let distance = baseline.distance_meters;
    assemble(legs, Vec::new(), vec![baseline.feature], duration, distance, 0)
}

fn collect_stops(
    graph: &FeasibilityGraph,
    path: &[usize],
    params: &PlanParams,
) -> Result<Vec<Stop>, Error> {
    let mut stops = Vec::new();
    for &position in path {
        let node = graph.node(position);
        if node.kind != NodeKind::Charger {
            continue;
        }
        let station = node
            .station
            .as_ref()
            .ok_or_else(|| Error::Internal(format!("charger node {} has no station", node.key)))?;
        // Graph construction only admits chargers with an estimate, so a
        // missing one here is a bug, not a data condition.
        let estimate = charging::estimate_for_station(
            station,
            params.ev_max_power_kw,
            &params.connectors,
            params.min_power_kw,
        )
        .ok_or_else(|| {
            Error::Internal(format!("charger {} lost its charging estimate", node.key))
        })?;

        stops.push(Stop {
            id: station.key(),
            lon: station.lon,
            lat: station.lat,
            name: station.properties.name.clone(),
            operator: station.properties.operator.clone(),
            percentile: station.properties.percentile,
            max_power_kw: estimate.effective_power_kw,
            valid_connector_count: estimate.valid_connector_count,
            estimated_charging_time_secs: estimate.seconds,
        });
    }
    Ok(stops)
}

fn assemble(
    legs: Vec<Leg>,
    stops: Vec<Stop>,
    features: Vec<geojson::Feature>,
    total_duration_secs: f64,
    total_distance_meters: f64,
    total_charging_time_secs: u32,
) -> TripResult {
    let total_trip_time_secs = total_duration_secs + f64::from(total_charging_time_secs);
    let summary = TripSummary {
        total_duration_secs,
        total_distance_meters,
        total_charging_time_secs,
        total_trip_time_secs,
        total_duration_formatted: format_duration(total_duration_secs),
        total_distance_formatted: format_distance(total_distance_meters),
        total_charging_time_formatted: format_duration(f64::from(total_charging_time_secs)),
        total_trip_time_formatted: format_duration(total_trip_time_secs),
        legs: legs.len(),
        stops: stops.len(),
    };
    let geojson = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    TripResult {
        legs,
        stops,
        geojson,
        summary,
    }
}

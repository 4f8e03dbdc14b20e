//! End-to-end planner tests against a synthetic routing provider.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use geo::{Distance, Haversine, Point, line_string};
use geojson::{Feature, Geometry, Value};
use tokio_util::sync::CancellationToken;

use evroute_core::client::{DirectionsLeg, RoutingApi, TravelMatrix};
use evroute_core::model::charger::{
    ChargerStation, Connector, EnergyInfrastructureStation, RefillPoint, StationProperties,
};
use evroute_core::model::{EngineConfig, PlanRequest};
use evroute_core::{Error, RoutePlanner};

const DRIVING_SPEED_MPS: f64 = 25.0;

/// Synthetic provider: straight-line legs at a fixed speed, haversine
/// matrices, per-operation call counters. An optional artificial delay
/// simulates a slow upstream.
#[derive(Clone)]
struct StubApi {
    directions_calls: Arc<AtomicUsize>,
    matrix_calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl StubApi {
    fn new() -> Self {
        Self {
            directions_calls: Arc::new(AtomicUsize::new(0)),
            matrix_calls: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    fn meters(from: [f64; 2], to: [f64; 2]) -> f64 {
        Haversine.distance(Point::new(from[0], from[1]), Point::new(to[0], to[1]))
    }
}

impl RoutingApi for StubApi {
    async fn directions(
        &self,
        coordinates: Vec<[f64; 2]>,
        cancel: CancellationToken,
    ) -> Result<DirectionsLeg, Error> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.directions_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let from = coordinates[0];
        let to = coordinates[coordinates.len() - 1];
        let meters = Self::meters(from, to);
        Ok(DirectionsLeg {
            feature: Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::LineString(vec![
                    from.to_vec(),
                    to.to_vec(),
                ]))),
                id: None,
                properties: None,
                foreign_members: None,
            },
            line: line_string![(x: from[0], y: from[1]), (x: to[0], y: to[1])],
            distance_meters: meters,
            duration_secs: meters / DRIVING_SPEED_MPS,
        })
    }

    async fn matrix(
        &self,
        coordinates: Vec<[f64; 2]>,
        cancel: CancellationToken,
    ) -> Result<TravelMatrix, Error> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.matrix_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let n = coordinates.len();
        let mut distances = vec![vec![None; n]; n];
        let mut durations = vec![vec![None; n]; n];
        for i in 0..n {
            for j in 0..n {
                let meters = Self::meters(coordinates[i], coordinates[j]);
                distances[i][j] = Some(meters);
                durations[i][j] = Some(meters / DRIVING_SPEED_MPS);
            }
        }
        Ok(TravelMatrix {
            distances,
            durations,
        })
    }
}

fn station(id: &str, lon: f64, lat: f64, power_kw: f64) -> ChargerStation {
    ChargerStation {
        lon,
        lat,
        properties: StationProperties {
            id: Some(id.to_string()),
            name: Some(id.to_string()),
            percentile: Some(75.0),
            max_power: Some(power_kw * 1000.0),
            energy_infrastructure_station: Some(EnergyInfrastructureStation {
                refill_point: vec![RefillPoint {
                    connectors: vec![Connector {
                        connector_type: Some("iec62196T2COMBO".to_string()),
                        max_power_at_socket: Some(power_kw * 1000.0),
                    }],
                }],
            }),
            ..Default::default()
        },
    }
}

fn request() -> PlanRequest {
    // ~405 km as the crow flies, beyond the 300 km default range.
    serde_json::from_value(serde_json::json!({
        "origin": [2.0, 48.0],
        "destination": [5.0, 45.0]
    }))
    .unwrap()
}

fn planner(client: StubApi, stations: Vec<ChargerStation>) -> RoutePlanner<StubApi> {
    RoutePlanner::new(client, Arc::new(stations), EngineConfig::default())
}

#[tokio::test]
async fn routes_through_a_midway_charger() {
    let client = StubApi::new();
    let engine = planner(
        client.clone(),
        vec![station("mid", 3.5, 46.5, 150.0)],
    );

    let trip = engine
        .plan(&request(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(trip.legs.len(), 2);
    assert_eq!(trip.legs[0].from, "O");
    assert_eq!(trip.legs[0].to, "mid");
    assert_eq!(trip.legs[1].to, "D");

    assert_eq!(trip.stops.len(), 1);
    assert_eq!(trip.stops[0].id, "mid");
    // 150 kW charger, 25-minute band.
    assert_eq!(trip.summary.total_charging_time_secs, 1500);
    assert_eq!(trip.geojson.features.len(), 2);
    assert!(
        (trip.summary.total_trip_time_secs
            - (trip.summary.total_duration_secs + 1500.0))
            .abs()
            < 1e-9
    );

    // Baseline plus two stitched legs, one matrix call.
    assert_eq!(client.directions_calls.load(Ordering::SeqCst), 3);
    assert_eq!(client.matrix_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn short_trips_skip_charging_entirely() {
    let client = StubApi::new();
    // A charger sits on the corridor, but the whole trip is ~111 km.
    let engine = planner(client.clone(), vec![station("mid", 2.5, 48.0, 150.0)]);

    let request: PlanRequest = serde_json::from_value(serde_json::json!({
        "origin": [2.0, 48.0],
        "destination": [3.5, 48.0]
    }))
    .unwrap();

    let trip = engine
        .plan(&request, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(trip.legs.len(), 1);
    assert!(trip.stops.is_empty());
    assert_eq!(trip.summary.total_charging_time_secs, 0);
    // The direct path reuses the baseline leg instead of refetching.
    assert_eq!(client.directions_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn out_of_range_hops_yield_no_route() {
    let client = StubApi::new();
    let engine = RoutePlanner::new(
        client.clone(),
        Arc::new(vec![station("mid", 3.5, 46.5, 150.0)]),
        EngineConfig::default(),
    );

    let mut request = request();
    request.ev_range_km = Some(50.0);

    let err = engine
        .plan(&request, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoRoute { .. }));
}

#[tokio::test]
async fn unknown_connector_types_fail_before_the_matrix_call() {
    let client = StubApi::new();
    let engine = planner(client.clone(), vec![station("mid", 3.5, 46.5, 150.0)]);

    let mut request = request();
    request.connectors = Some(vec!["typeX".to_string()]);

    let err = engine
        .plan(&request, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoRoute { .. }));
    // The pruner empties the candidate set, so no matrix is ever fetched.
    assert_eq!(client.matrix_calls.load(Ordering::SeqCst), 0);
    assert_eq!(client.directions_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn invalid_coordinates_fail_without_network_traffic() {
    let client = StubApi::new();
    let engine = planner(client.clone(), vec![station("mid", 3.5, 46.5, 150.0)]);

    let mut request = request();
    request.origin = [200.0, 48.0];

    let err = engine
        .plan(&request, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(client.directions_calls.load(Ordering::SeqCst), 0);
    assert_eq!(client.matrix_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn slow_upstream_trips_the_wall_clock_budget() {
    let client = StubApi::slow(Duration::from_secs(3600));
    let engine = planner(client, vec![station("mid", 3.5, 46.5, 150.0)]);

    let err = engine
        .plan(&request(), CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout { budget_ms: 30_000 }));
}

#[tokio::test]
async fn cancelled_requests_never_reach_the_provider() {
    let client = StubApi::new();
    let engine = planner(client.clone(), vec![station("mid", 3.5, 46.5, 150.0)]);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = engine.plan(&request(), cancel).await.unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert_eq!(client.directions_calls.load(Ordering::SeqCst), 0);
    assert_eq!(client.matrix_calls.load(Ordering::SeqCst), 0);
}

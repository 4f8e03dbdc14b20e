//! The route planning pipeline.
//!
//! One `plan` call runs: validate, baseline route, corridor pruning,
//! feasibility graph, shortest path, stitching. The whole pipeline runs
//! under a wall-clock budget and a cancellation token; both cut off every
//! in-flight provider call.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};
use tokio_util::sync::CancellationToken;

use crate::client::RoutingApi;
use crate::model::{
    ChargerStation, DESTINATION_KEY, EngineConfig, ORIGIN_KEY, PlanParams, PlanRequest, TripResult,
};
use crate::prune::{self, PruneParams};
use crate::routing::{dijkstra, graph_builder, stitch};
use crate::Error;

/// Suggestion attached to every `NoRoute` error.
const RELAX_HINT: &str =
    "try increasing evRangeKm, lowering minPowerKw, or adjusting evMaxPowerKw";

/// The planning engine. Holds the provider client, the charger dataset and
/// the server-side tuning knobs; one instance serves all requests.
#[derive(Debug, Clone)]
pub struct RoutePlanner<C> {
    client: C,
    stations: Arc<Vec<ChargerStation>>,
    config: EngineConfig,
}

impl<C: RoutingApi> RoutePlanner<C> {
    pub fn new(client: C, stations: Arc<Vec<ChargerStation>>, config: EngineConfig) -> Self {
        Self {
            client,
            stations,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Plans a charging-aware route. Validation failures return before any
    /// network call; afterwards the pipeline runs under the configured
    /// wall-clock budget.
    pub async fn plan(
        &self,
        request: &PlanRequest,
        cancel: CancellationToken,
    ) -> Result<TripResult, Error> {
        let params = request.resolve()?;
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let budget_ms = self.config.request_timeout_ms;
        match tokio::time::timeout(
            Duration::from_millis(budget_ms),
            self.run(&params, &cancel),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                // Stop whatever the pipeline still has in flight.
                cancel.cancel();
                Err(Error::Timeout { budget_ms })
            }
        }
    }

    async fn run(
        &self,
        params: &PlanParams,
        cancel: &CancellationToken,
    ) -> Result<TripResult, Error> {
        let started = Instant::now();

        let baseline = self
            .client
            .directions(vec![params.origin, params.destination], cancel.clone())
            .await?;
        debug!(
            "baseline: {:.1} km in {:.0} s, fetched in {:?}",
            baseline.distance_meters / 1000.0,
            baseline.duration_secs,
            started.elapsed()
        );

        let candidates = prune::prune_along_corridor(
            &self.stations,
            &PruneParams {
                baseline: &baseline.line,
                connectors: &params.connectors,
                min_power_kw: params.min_power_kw,
                buffer_km: self.config.buffer_km,
                segment_km: self.config.segment_km,
                cap: self.config.segment_cap(),
                strategy: self.config.rank_strategy,
                ev_max_power_kw: params.ev_max_power_kw,
            },
        );
        debug!(
            "pruning kept {} of {} stations after {:?}",
            candidates.len(),
            self.stations.len(),
            started.elapsed()
        );

        // Without candidates there is no matrix to fetch: either the
        // vehicle covers the whole route on one charge, or nothing will.
        if candidates.is_empty() {
            if baseline.distance_meters <= params.ev_range_km * 1000.0 {
                info!(
                    "direct route within range, no charging stop needed ({:?})",
                    started.elapsed()
                );
                return Ok(stitch::trip_from_single_leg(
                    baseline,
                    ORIGIN_KEY,
                    DESTINATION_KEY,
                ));
            }
            return Err(Error::NoRoute {
                hint: format!("no candidate chargers along the corridor; {RELAX_HINT}"),
            });
        }

        let graph =
            graph_builder::build_feasibility_graph(&self.client, candidates, params, cancel)
                .await?;

        let path = dijkstra::shortest_path(&graph, ORIGIN_KEY, DESTINATION_KEY).ok_or_else(
            || Error::NoRoute {
                hint: format!("destination unreachable with the given range; {RELAX_HINT}"),
            },
        )?;

        // A two-node path is the plain origin-to-destination drive; its
        // geometry is the baseline we already hold.
        let trip = if path.len() == 2 {
            stitch::trip_from_single_leg(baseline, ORIGIN_KEY, DESTINATION_KEY)
        } else {
            stitch::stitch_trip(&self.client, &graph, &path, params, cancel).await?
        };

        info!(
            "planned {} legs with {} stops in {:?}",
            trip.summary.legs,
            trip.summary.stops,
            started.elapsed()
        );
        Ok(trip)
    }
}

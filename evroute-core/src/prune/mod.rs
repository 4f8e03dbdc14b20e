//! Corridor-based candidate pruning.
//!
//! Reduces the full charger dataset to a bounded candidate set along the
//! baseline route: connector/power filter, corridor membership around the
//! simplified baseline, per-segment thinning by rank, then dedup by
//! station identifier. Pure: never fails, empty output at any stage
//! short-circuits the rest.

pub mod rank;

use geo::LineString;
use itertools::Itertools;
use log::debug;
use rayon::prelude::*;

use crate::geometry;
use crate::model::ChargerStation;

pub use rank::{RankContext, RankKey, RankStrategy, rank_candidate};

/// How many candidates each corridor segment may contribute.
#[derive(Debug, Clone, Copy)]
pub enum SegmentCap {
    /// Flat cap per segment, independent of route length.
    PerSegment(usize),
    /// Total budget split evenly across segments, so long routes with many
    /// segments stay bounded near the budget.
    Total(usize),
}

impl SegmentCap {
    fn per_segment(self, segments: usize) -> usize {
        match self {
            SegmentCap::PerSegment(k) => k.max(1),
            SegmentCap::Total(budget) => (budget / segments.max(1)).max(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PruneParams<'a> {
    pub baseline: &'a LineString<f64>,
    pub connectors: &'a [String],
    pub min_power_kw: f64,
    pub buffer_km: f64,
    pub segment_km: f64,
    pub cap: SegmentCap,
    pub strategy: RankStrategy,
    pub ev_max_power_kw: f64,
}

/// Prunes the dataset to candidates along the corridor. Deduplication by
/// station id runs after the per-segment cap; the first occurrence wins.
pub fn prune_along_corridor(
    stations: &[ChargerStation],
    params: &PruneParams,
) -> Vec<ChargerStation> {
    // 1) Connector and power filter over the whole dataset.
    let filtered: Vec<&ChargerStation> = stations
        .par_iter()
        .filter(|station| station.has_qualifying_connector(params.connectors, params.min_power_kw))
        .collect();
    if filtered.is_empty() {
        return Vec::new();
    }

    // 2) Corridor membership around the simplified baseline.
    let corridor = geometry::simplify_line(params.baseline);
    let in_corridor: Vec<&ChargerStation> = filtered
        .par_iter()
        .copied()
        .filter(|station| {
            geometry::within_distance_of_line(station.point(), &corridor, params.buffer_km)
        })
        .collect();
    debug!(
        "pruning: {} stations pass the connector filter, {} inside the corridor",
        filtered.len(),
        in_corridor.len()
    );
    if in_corridor.is_empty() {
        return Vec::new();
    }

    // 3) Per-segment thinning by rank.
    let total_km = geometry::line_length_km(&corridor);
    let segments = ((total_km / params.segment_km).ceil() as usize).max(1);
    let per_segment = params.cap.per_segment(segments);

    let mut picks: Vec<&ChargerStation> = Vec::new();
    for segment in 0..segments {
        let start_km = (segment as f64 / segments as f64) * total_km;
        let end_km = ((segment + 1) as f64 / segments as f64) * total_km;
        let slice = geometry::slice_along_km(&corridor, start_km, end_km);

        let context = RankContext {
            strategy: params.strategy,
            segment_midpoint: geometry::point_along_km(
                &slice,
                geometry::line_length_km(&slice) / 2.0,
            ),
            connectors: params.connectors,
            min_power_kw: params.min_power_kw,
            ev_max_power_kw: params.ev_max_power_kw,
        };

        let mut pool: Vec<(RankKey, &ChargerStation)> = in_corridor
            .iter()
            .copied()
            .filter(|station| {
                geometry::within_distance_of_line(station.point(), &slice, params.buffer_km)
            })
            .map(|station| (rank_candidate(station, &context), station))
            .collect();
        if pool.is_empty() {
            continue;
        }

        pool.sort_by(|a, b| RankKey::order_best_first(&a.0, &b.0));
        picks.extend(pool.into_iter().take(per_segment).map(|(_, station)| station));
    }

    // 4) Dedup by station identifier, first occurrence wins.
    picks
        .into_iter()
        .unique_by(|station| station.key())
        .cloned()
        .collect()
}

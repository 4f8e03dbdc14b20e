//! Candidate ranking within one corridor segment.
//!
//! The tie-break order is fixed: desirability score, then effective
//! charging power, then distance to the segment midpoint. Scores and
//! power values collide often across a dataset, so the midpoint distance
//! is the tie-break that actually decides most orderings.

use std::cmp::Ordering;

use geo::Point;
use serde::Deserialize;

use crate::geometry;
use crate::model::ChargerStation;

/// Pluggable desirability score used as the first ranking tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankStrategy {
    /// The dataset's precomputed 0-100 `percentile` property.
    #[default]
    Percentile,
    /// Number of connectors matching the requested types and power floor.
    QualifyingConnectors,
}

/// Inputs shared by every ranking computation in one segment.
pub struct RankContext<'a> {
    pub strategy: RankStrategy,
    pub segment_midpoint: Point<f64>,
    pub connectors: &'a [String],
    pub min_power_kw: f64,
    pub ev_max_power_kw: f64,
}

/// Comparable key for one candidate. Higher score and power win; lower
/// midpoint distance wins.
#[derive(Debug, Clone, Copy)]
pub struct RankKey {
    pub score: f64,
    pub effective_power_kw: f64,
    pub midpoint_distance_km: f64,
}

impl RankKey {
    pub fn order_best_first(a: &RankKey, b: &RankKey) -> Ordering {
        b.score
            .total_cmp(&a.score)
            .then(b.effective_power_kw.total_cmp(&a.effective_power_kw))
            .then(a.midpoint_distance_km.total_cmp(&b.midpoint_distance_km))
    }
}

pub fn rank_candidate(station: &ChargerStation, context: &RankContext) -> RankKey {
    let score = match context.strategy {
        RankStrategy::Percentile => station.properties.percentile.unwrap_or(0.0),
        RankStrategy::QualifyingConnectors => station
            .qualifying_connectors(context.connectors, context.min_power_kw)
            .count() as f64,
    };

    RankKey {
        score,
        effective_power_kw: station.max_power_kw().min(context.ev_max_power_kw),
        midpoint_distance_km: geometry::haversine_km(context.segment_midpoint, station.point()),
    }
}

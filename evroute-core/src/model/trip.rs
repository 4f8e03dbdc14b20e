//! The stitched trip returned to clients.

use geojson::FeatureCollection;
use serde::Serialize;

/// One routed step between consecutive path nodes.
#[derive(Debug, Clone, Serialize)]
pub struct Leg {
    pub from: String,
    pub to: String,
    pub duration_secs: f64,
    pub distance_meters: f64,
}

/// A charging stop on the itinerary (never the origin or destination).
#[derive(Debug, Clone, Serialize)]
pub struct Stop {
    pub id: String,
    pub lon: f64,
    pub lat: f64,
    pub name: Option<String>,
    pub operator: Option<String>,
    pub percentile: Option<f64>,
    /// Effective charging power used for the estimate, kilowatts.
    pub max_power_kw: f64,
    pub valid_connector_count: usize,
    pub estimated_charging_time_secs: u32,
}

/// Aggregate figures for the whole trip. The raw second/meter totals are
/// authoritative; the formatted strings are derived for display only.
#[derive(Debug, Clone, Serialize)]
pub struct TripSummary {
    pub total_duration_secs: f64,
    pub total_distance_meters: f64,
    pub total_charging_time_secs: u32,
    pub total_trip_time_secs: f64,
    pub total_duration_formatted: String,
    pub total_distance_formatted: String,
    pub total_charging_time_formatted: String,
    pub total_trip_time_formatted: String,
    pub legs: usize,
    pub stops: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TripResult {
    pub legs: Vec<Leg>,
    pub stops: Vec<Stop>,
    pub geojson: FeatureCollection,
    pub summary: TripSummary,
}

pub(crate) fn format_duration(secs: f64) -> String {
    let secs = secs.max(0.0).round() as u64;
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m")
    } else {
        format!("{secs}s")
    }
}

pub(crate) fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", meters.max(0.0).round() as u64)
    }
}

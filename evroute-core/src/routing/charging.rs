//! Charging-time estimation.
//!
//! The same function feeds edge weights in the graph builder and the
//! per-stop figures in the stitcher, so both always agree on cost.

use crate::model::ChargerStation;

/// Estimated time to charge at the given effective power, as a step
/// function: slower chargers cost monotonically more time. `None` for
/// zero or negative power, which marks the stop as unusable.
pub fn charging_time_secs(effective_power_kw: f64) -> Option<u32> {
    if !(effective_power_kw > 0.0) {
        return None;
    }
    let minutes = match effective_power_kw {
        p if p >= 150.0 => 25,
        p if p >= 100.0 => 35,
        p if p >= 75.0 => 45,
        p if p >= 50.0 => 60,
        p if p >= 25.0 => 90,
        _ => 180,
    };
    Some(minutes * 60)
}

/// Charging estimate for one station and vehicle.
#[derive(Debug, Clone, Copy)]
pub struct ChargingEstimate {
    pub seconds: u32,
    /// `min(best qualifying socket power, vehicle max power)` in kW.
    pub effective_power_kw: f64,
    pub valid_connector_count: usize,
}

/// Estimate for a station, or `None` when no connector matches the
/// wanted types at the requested power floor.
pub fn estimate_for_station(
    station: &ChargerStation,
    ev_max_power_kw: f64,
    connectors: &[String],
    min_power_kw: f64,
) -> Option<ChargingEstimate> {
    let valid_connector_count = station.qualifying_connectors(connectors, min_power_kw).count();
    if valid_connector_count == 0 {
        return None;
    }

    let station_power_kw = station.best_qualifying_power_kw(connectors, min_power_kw);
    let effective_power_kw = station_power_kw.min(ev_max_power_kw);
    charging_time_secs(effective_power_kw).map(|seconds| ChargingEstimate {
        seconds,
        effective_power_kw,
        valid_connector_count,
    })
}

//! Inbound request validation and server-side configuration.

use serde::Deserialize;

use crate::Error;
use crate::prune::rank::RankStrategy;

/// Connector type assumed when the client does not specify any.
pub const DEFAULT_CONNECTOR: &str = "iec62196T2COMBO";

const DEFAULT_EV_RANGE_KM: f64 = 300.0;
const DEFAULT_EV_MAX_POWER_KW: f64 = 150.0;
const DEFAULT_MIN_POWER_KW: f64 = 100.0;

/// A plan-a-route request as received from a client. Coordinates are
/// `[lon, lat]`; every optional field is defaulted server-side.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub origin: [f64; 2],
    pub destination: [f64; 2],
    #[serde(default)]
    pub ev_range_km: Option<f64>,
    #[serde(default)]
    pub ev_max_power_kw: Option<f64>,
    #[serde(default)]
    pub connectors: Option<Vec<String>>,
    #[serde(default)]
    pub min_power_kw: Option<f64>,
}

/// A validated request with defaults applied.
#[derive(Debug, Clone)]
pub struct PlanParams {
    pub origin: [f64; 2],
    pub destination: [f64; 2],
    pub ev_range_km: f64,
    pub ev_max_power_kw: f64,
    pub connectors: Vec<String>,
    pub min_power_kw: f64,
}

impl PlanRequest {
    /// Validates the request and applies defaults. All problems are
    /// collected into a single `Error::Validation` so clients see the
    /// full list at once.
    pub fn resolve(&self) -> Result<PlanParams, Error> {
        let mut errors = Vec::new();

        validate_coordinate(&self.origin, "origin", &mut errors);
        validate_coordinate(&self.destination, "destination", &mut errors);
        validate_positive(self.ev_range_km, "evRangeKm", &mut errors);
        validate_positive(self.ev_max_power_kw, "evMaxPowerKw", &mut errors);
        validate_positive(self.min_power_kw, "minPowerKw", &mut errors);

        if let Some(connectors) = &self.connectors {
            if connectors.is_empty() {
                errors.push("connectors must be a non-empty array".to_string());
            } else if connectors.iter().any(String::is_empty) {
                errors.push("all connectors must be non-empty strings".to_string());
            }
        }

        let ev_max_power_kw = self.ev_max_power_kw.unwrap_or(DEFAULT_EV_MAX_POWER_KW);
        let min_power_kw = self.min_power_kw.unwrap_or(DEFAULT_MIN_POWER_KW);
        if self.ev_max_power_kw.is_some()
            && self.min_power_kw.is_some()
            && min_power_kw > ev_max_power_kw
        {
            errors.push("minPowerKw should not exceed evMaxPowerKw".to_string());
        }

        if !errors.is_empty() {
            return Err(Error::Validation(errors.join("; ")));
        }

        Ok(PlanParams {
            origin: self.origin,
            destination: self.destination,
            ev_range_km: self.ev_range_km.unwrap_or(DEFAULT_EV_RANGE_KM),
            ev_max_power_kw,
            connectors: self
                .connectors
                .clone()
                .unwrap_or_else(|| vec![DEFAULT_CONNECTOR.to_string()]),
            min_power_kw: min_power_kw.min(ev_max_power_kw),
        })
    }
}

fn validate_coordinate(coord: &[f64; 2], name: &str, errors: &mut Vec<String>) {
    let [lon, lat] = *coord;
    if !lon.is_finite() || !lat.is_finite() {
        errors.push(format!("{name} coordinates must be finite numbers"));
    } else if lon.abs() > 180.0 || lat.abs() > 90.0 {
        errors.push(format!("{name} coordinates out of valid range"));
    }
}

fn validate_positive(value: Option<f64>, name: &str, errors: &mut Vec<String>) {
    if let Some(value) = value {
        if !value.is_finite() || value <= 0.0 {
            errors.push(format!("{name} must be a positive finite number"));
        }
    }
}

/// Server-controlled performance knobs, not overridable per request.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Corridor half-width around the baseline route, kilometres.
    pub buffer_km: f64,
    /// Target length of one corridor segment, kilometres.
    pub segment_km: f64,
    /// Upper bound on candidates forwarded to the matrix call.
    pub max_candidates: usize,
    /// When set, a flat per-segment cap replaces the `max_candidates`
    /// budget split across segments.
    pub top_per_segment: Option<usize>,
    /// Wall-clock budget for one request.
    pub request_timeout_ms: u64,
    pub rank_strategy: RankStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            buffer_km: 25.0,
            segment_km: 75.0,
            max_candidates: 120,
            top_per_segment: None,
            request_timeout_ms: 30_000,
            rank_strategy: RankStrategy::Percentile,
        }
    }
}

impl EngineConfig {
    pub fn segment_cap(&self) -> crate::prune::SegmentCap {
        match self.top_per_segment {
            Some(k) => crate::prune::SegmentCap::PerSegment(k),
            None => crate::prune::SegmentCap::Total(self.max_candidates),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> PlanRequest {
        PlanRequest {
            origin: [2.0, 48.0],
            destination: [5.0, 45.0],
            ev_range_km: None,
            ev_max_power_kw: None,
            connectors: None,
            min_power_kw: None,
        }
    }

    #[test]
    fn defaults_applied() {
        let params = base_request().resolve().unwrap();
        assert_eq!(params.connectors, vec![DEFAULT_CONNECTOR.to_string()]);
        assert_eq!(params.ev_range_km, DEFAULT_EV_RANGE_KM);
        assert_eq!(params.min_power_kw, DEFAULT_MIN_POWER_KW);
    }

    #[test]
    fn longitude_out_of_range_is_rejected() {
        let mut request = base_request();
        request.origin = [200.0, 48.0];
        let err = request.resolve().unwrap_err();
        assert!(matches!(err, Error::Validation(ref msg) if msg.contains("origin")));
    }

    #[test]
    fn non_positive_numbers_are_rejected() {
        let mut request = base_request();
        request.ev_range_km = Some(-10.0);
        assert!(request.resolve().is_err());

        let mut request = base_request();
        request.min_power_kw = Some(f64::NAN);
        assert!(request.resolve().is_err());
    }

    #[test]
    fn min_power_must_not_exceed_max() {
        let mut request = base_request();
        request.ev_max_power_kw = Some(100.0);
        request.min_power_kw = Some(150.0);
        assert!(request.resolve().is_err());
    }

    #[test]
    fn empty_connectors_rejected() {
        let mut request = base_request();
        request.connectors = Some(Vec::new());
        assert!(request.resolve().is_err());
    }

    #[test]
    fn request_parses_from_camel_case_json() {
        let request: PlanRequest = serde_json::from_value(serde_json::json!({
            "origin": [2.0, 48.0],
            "destination": [5.0, 45.0],
            "evRangeKm": 250.0,
            "minPowerKw": 50.0
        }))
        .unwrap();
        let params = request.resolve().unwrap();
        assert_eq!(params.ev_range_km, 250.0);
        assert_eq!(params.min_power_kw, 50.0);
    }
}

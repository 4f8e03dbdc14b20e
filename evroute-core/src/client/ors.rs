//! OpenRouteService-style HTTP provider.

use geo::LineString;
use geojson::FeatureCollection;
use log::debug;
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::{DirectionsLeg, RoutingApi, TravelMatrix};
use crate::Error;

/// Client for an ORS-compatible endpoint exposing
/// `/v2/directions/{profile}/geojson` and `/v2/matrix/{profile}`.
#[derive(Debug, Clone)]
pub struct OrsClient {
    http: reqwest::Client,
    base_url: String,
    profile: String,
}

impl OrsClient {
    pub fn new(base_url: impl Into<String>, profile: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            profile: profile.into(),
        }
    }

    async fn post(
        &self,
        endpoint: &str,
        body: serde_json::Value,
        cancel: &CancellationToken,
    ) -> Result<serde_json::Value, Error> {
        let url = format!("{}/v2/{}", self.base_url, endpoint);
        debug!("POST {url}");

        let request = async {
            let response = self
                .http
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| Error::Upstream {
                    status: e.status().map(|s| s.as_u16()),
                    message: e.to_string(),
                })?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(Error::Upstream {
                    status: Some(status.as_u16()),
                    message,
                });
            }

            response.json().await.map_err(|e| Error::Upstream {
                status: None,
                message: format!("malformed response body: {e}"),
            })
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = request => result,
        }
    }
}

impl RoutingApi for OrsClient {
    async fn directions(
        &self,
        coordinates: Vec<[f64; 2]>,
        cancel: CancellationToken,
    ) -> Result<DirectionsLeg, Error> {
        let body = json!({
            "coordinates": coordinates,
            "instructions": false,
            "geometry": true,
            "elevation": false,
        });

        let endpoint = format!("directions/{}/geojson", self.profile);
        let value = self.post(&endpoint, body, &cancel).await?;
        parse_directions(value)
    }

    async fn matrix(
        &self,
        coordinates: Vec<[f64; 2]>,
        cancel: CancellationToken,
    ) -> Result<TravelMatrix, Error> {
        let expected = coordinates.len();
        let body = json!({
            "locations": coordinates,
            "metrics": ["distance", "duration"],
            "resolve_locations": false,
        });

        let endpoint = format!("matrix/{}", self.profile);
        let value = self.post(&endpoint, body, &cancel).await?;

        let response: MatrixResponse =
            serde_json::from_value(value).map_err(|e| malformed(format!("matrix: {e}")))?;
        if response.distances.len() != expected || response.durations.len() != expected {
            return Err(malformed(format!(
                "matrix dimensions {}x{} do not match {expected} locations",
                response.distances.len(),
                response.durations.len(),
            )));
        }

        Ok(TravelMatrix {
            distances: response.distances,
            durations: response.durations,
        })
    }
}

#[derive(Deserialize)]
struct MatrixResponse {
    #[serde(default)]
    distances: Vec<Vec<Option<f64>>>,
    #[serde(default)]
    durations: Vec<Vec<Option<f64>>>,
}

#[derive(Deserialize, Default)]
struct LegProperties {
    #[serde(default)]
    summary: LegSummary,
}

#[derive(Deserialize, Default)]
struct LegSummary {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

fn parse_directions(value: serde_json::Value) -> Result<DirectionsLeg, Error> {
    let collection: FeatureCollection =
        serde_json::from_value(value).map_err(|e| malformed(format!("directions: {e}")))?;

    let feature = collection
        .features
        .into_iter()
        .next()
        .ok_or_else(|| malformed("directions response contained no features".to_string()))?;

    let line = feature
        .geometry
        .as_ref()
        .and_then(|geometry| line_from_geojson(&geometry.value))
        .ok_or_else(|| malformed("directions feature has no LineString geometry".to_string()))?;

    let properties: LegProperties = feature
        .properties
        .clone()
        .map(|map| serde_json::from_value(serde_json::Value::Object(map)).unwrap_or_default())
        .unwrap_or_default();

    Ok(DirectionsLeg {
        feature,
        line,
        distance_meters: properties.summary.distance,
        duration_secs: properties.summary.duration,
    })
}

fn line_from_geojson(value: &geojson::Value) -> Option<LineString<f64>> {
    let geojson::Value::LineString(positions) = value else {
        return None;
    };
    let coords: Option<Vec<(f64, f64)>> = positions
        .iter()
        .map(|position| Some((*position.first()?, *position.get(1)?)))
        .collect();
    Some(LineString::from(coords?))
}

fn malformed(message: String) -> Error {
    Error::Upstream {
        status: None,
        message,
    }
}

//! Charger station features as loaded from the GeoJSON dataset.

use geo::Point;
use serde::{Deserialize, Deserializer, Serialize};

/// A single plug on a refill point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    #[serde(default)]
    pub connector_type: Option<String>,
    /// Power at the socket in watts.
    #[serde(default)]
    pub max_power_at_socket: Option<f64>,
}

/// One charging post; stations commonly carry several.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefillPoint {
    #[serde(default, deserialize_with = "one_or_many")]
    pub connectors: Vec<Connector>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnergyInfrastructureStation {
    #[serde(default, rename = "refillPoint", deserialize_with = "one_or_many")]
    pub refill_point: Vec<RefillPoint>,
}

/// Properties carried by a dataset feature. Every field is optional in the
/// wild; missing values simply fail the pruner's filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationProperties {
    #[serde(default, rename = "@id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub operator: Option<String>,
    /// Desirability score, 0-100.
    #[serde(default)]
    pub percentile: Option<f64>,
    /// Station maximum power in watts.
    #[serde(default)]
    pub max_power: Option<f64>,
    #[serde(default, rename = "energyInfrastructureStation")]
    pub energy_infrastructure_station: Option<EnergyInfrastructureStation>,
}

/// A charging station with a point location. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargerStation {
    pub lon: f64,
    pub lat: f64,
    pub properties: StationProperties,
}

impl ChargerStation {
    /// Builds a station from a dataset feature. Returns `None` for features
    /// without point coordinates; malformed properties degrade to empty
    /// defaults and get dropped later by the connector filter.
    pub fn from_feature(feature: &geojson::Feature) -> Option<Self> {
        let geometry = feature.geometry.as_ref()?;
        let geojson::Value::Point(coords) = &geometry.value else {
            return None;
        };
        if coords.len() < 2 {
            return None;
        }

        let properties = feature
            .properties
            .clone()
            .map(|map| {
                serde_json::from_value(serde_json::Value::Object(map)).unwrap_or_default()
            })
            .unwrap_or_default();

        Some(Self {
            lon: coords[0],
            lat: coords[1],
            properties,
        })
    }

    pub fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    /// Stable station identifier: the dataset `@id`, falling back to a
    /// coordinate-derived key.
    pub fn key(&self) -> String {
        self.properties
            .id
            .clone()
            .unwrap_or_else(|| format!("{},{}", self.lon, self.lat))
    }

    /// Station maximum power in kilowatts, from the `max_power` property.
    pub fn max_power_kw(&self) -> f64 {
        self.properties.max_power.unwrap_or(0.0) / 1000.0
    }

    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.properties
            .energy_infrastructure_station
            .iter()
            .flat_map(|station| station.refill_point.iter())
            .flat_map(|point| point.connectors.iter())
    }

    /// Connectors matching one of the wanted types (case-sensitive) with at
    /// least `min_power_kw` at the socket.
    pub fn qualifying_connectors<'a>(
        &'a self,
        wanted: &'a [String],
        min_power_kw: f64,
    ) -> impl Iterator<Item = &'a Connector> {
        self.connectors().filter(move |connector| {
            let Some(kind) = connector.connector_type.as_deref() else {
                return false;
            };
            if !wanted.iter().any(|w| w == kind) {
                return false;
            }
            connector.max_power_at_socket.unwrap_or(0.0) / 1000.0 >= min_power_kw
        })
    }

    pub fn has_qualifying_connector(&self, wanted: &[String], min_power_kw: f64) -> bool {
        self.qualifying_connectors(wanted, min_power_kw).next().is_some()
    }

    /// Highest qualifying socket power in kilowatts, 0.0 when none qualify.
    pub fn best_qualifying_power_kw(&self, wanted: &[String], min_power_kw: f64) -> f64 {
        self.qualifying_connectors(wanted, min_power_kw)
            .map(|connector| connector.max_power_at_socket.unwrap_or(0.0) / 1000.0)
            .fold(0.0, f64::max)
    }
}

/// Accepts both a single object and an array, as the upstream dataset
/// serializes one-element collections without the array wrapper.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(value: serde_json::Value) -> geojson::Feature {
        serde_json::from_value(value).unwrap()
    }

    fn wanted() -> Vec<String> {
        vec!["iec62196T2COMBO".to_string()]
    }

    #[test]
    fn parses_feature_with_connector_array() {
        let station = ChargerStation::from_feature(&feature(serde_json::json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [2.35, 48.85] },
            "properties": {
                "@id": "node/42",
                "name": "Gare de Lyon",
                "percentile": 88,
                "max_power": 150000,
                "energyInfrastructureStation": {
                    "refillPoint": [{
                        "connectors": [
                            { "connectorType": "iec62196T2COMBO", "maxPowerAtSocket": 150000 },
                            { "connectorType": "chademo", "maxPowerAtSocket": 50000 }
                        ]
                    }]
                }
            }
        })))
        .unwrap();

        assert_eq!(station.key(), "node/42");
        assert_eq!(station.connectors().count(), 2);
        assert_eq!(station.qualifying_connectors(&wanted(), 100.0).count(), 1);
        assert!((station.best_qualifying_power_kw(&wanted(), 100.0) - 150.0).abs() < 1e-9);
        assert!((station.max_power_kw() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn parses_single_object_refill_point() {
        let station = ChargerStation::from_feature(&feature(serde_json::json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [1.0, 45.0] },
            "properties": {
                "energyInfrastructureStation": {
                    "refillPoint": {
                        "connectors": { "connectorType": "iec62196T2COMBO", "maxPowerAtSocket": 120000 }
                    }
                }
            }
        })))
        .unwrap();

        assert!(station.has_qualifying_connector(&wanted(), 100.0));
        assert!(!station.has_qualifying_connector(&wanted(), 150.0));
    }

    #[test]
    fn key_falls_back_to_coordinates() {
        let station = ChargerStation::from_feature(&feature(serde_json::json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [1.5, 45.0] },
            "properties": {}
        })))
        .unwrap();
        assert_eq!(station.key(), "1.5,45");
    }

    #[test]
    fn rejects_non_point_features() {
        let line = feature(serde_json::json!({
            "type": "Feature",
            "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] },
            "properties": {}
        }));
        assert!(ChargerStation::from_feature(&line).is_none());
    }
}

//! Charger dataset loading.

use std::fs;
use std::path::Path;

use geojson::GeoJson;
use log::{info, warn};

use crate::model::ChargerStation;
use crate::Error;

/// Loads charger stations from a GeoJSON `FeatureCollection` on disk.
/// Features without point geometry are skipped, not fatal; a dataset that
/// is not valid GeoJSON is.
pub fn load_chargers(path: &Path) -> Result<Vec<ChargerStation>, Error> {
    let raw = fs::read_to_string(path)?;
    let parsed: GeoJson = raw
        .parse()
        .map_err(|err| Error::InvalidData(format!("charger dataset is not valid GeoJSON: {err}")))?;
    let GeoJson::FeatureCollection(collection) = parsed else {
        return Err(Error::InvalidData(
            "charger dataset must be a FeatureCollection".to_string(),
        ));
    };

    let total = collection.features.len();
    let stations: Vec<ChargerStation> = collection
        .features
        .iter()
        .filter_map(ChargerStation::from_feature)
        .collect();

    let skipped = total - stations.len();
    if skipped > 0 {
        warn!("skipped {skipped} dataset features without point geometry");
    }
    info!(
        "loaded {} charger stations from {}",
        stations.len(),
        path.display()
    );
    Ok(stations)
}

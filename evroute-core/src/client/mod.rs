//! Client contract for the external route/matrix provider.
//!
//! The engine only ever needs two provider operations: a routed leg
//! through an ordered coordinate list, and an all-pairs distance/duration
//! matrix. Implementations surface upstream failures as
//! [`Error::Upstream`](crate::Error); they never retry.

pub mod ors;

use std::future::Future;

use geo::LineString;
use geojson::Feature;
use tokio_util::sync::CancellationToken;

use crate::Error;

pub use ors::OrsClient;

/// A routed leg: the provider's feature (forwarded to clients untouched),
/// its parsed geometry and the summary figures.
#[derive(Debug, Clone)]
pub struct DirectionsLeg {
    pub feature: Feature,
    pub line: LineString<f64>,
    pub distance_meters: f64,
    pub duration_secs: f64,
}

/// All-pairs travel matrix. `None` cells mean the provider could not
/// route the pair; they are treated as infeasible, never as zero.
#[derive(Debug, Clone, Default)]
pub struct TravelMatrix {
    pub distances: Vec<Vec<Option<f64>>>,
    pub durations: Vec<Vec<Option<f64>>>,
}

impl TravelMatrix {
    /// Distance in meters, filtered to finite values.
    pub fn distance(&self, from: usize, to: usize) -> Option<f64> {
        cell(&self.distances, from, to)
    }

    /// Duration in seconds, filtered to finite values.
    pub fn duration(&self, from: usize, to: usize) -> Option<f64> {
        cell(&self.durations, from, to)
    }
}

fn cell(table: &[Vec<Option<f64>>], from: usize, to: usize) -> Option<f64> {
    table
        .get(from)?
        .get(to)
        .copied()
        .flatten()
        .filter(|value| value.is_finite())
}

/// The route/matrix provider seen by the engine. Implementations must be
/// cheap to clone; leg fetches are spawned concurrently during stitching.
pub trait RoutingApi: Clone + Send + Sync + 'static {
    /// Routed leg through the given `[lon, lat]` coordinates, in order.
    fn directions(
        &self,
        coordinates: Vec<[f64; 2]>,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<DirectionsLeg, Error>> + Send;

    /// All-pairs distance/duration matrix for the given coordinates.
    fn matrix(
        &self,
        coordinates: Vec<[f64; 2]>,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<TravelMatrix, Error>> + Send;
}

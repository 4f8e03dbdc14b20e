//! Charging-aware route planning for electric vehicles.
//!
//! Given an origin, a destination and a vehicle profile, the engine asks an
//! external routing provider for a baseline route, prunes a charger dataset
//! to candidates along that corridor, builds a range-feasibility graph from
//! a single travel matrix call and searches it for the minimum-total-time
//! path, counting charging time at every stop. The result is a stitched
//! trip with per-leg geometry, charging stops and aggregate figures.

pub mod client;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod model;
pub mod planner;
pub mod prelude;
pub mod prune;
pub mod routing;

pub use error::Error;
pub use planner::RoutePlanner;

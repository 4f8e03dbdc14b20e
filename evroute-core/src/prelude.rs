// Re-export key components
pub use crate::client::{DirectionsLeg, OrsClient, RoutingApi, TravelMatrix};
pub use crate::dataset::load_chargers;
pub use crate::error::Error;
pub use crate::planner::RoutePlanner;

// Core request/response types
pub use crate::model::{
    ChargerStation, EngineConfig, PlanParams, PlanRequest, TripResult, TripSummary,
};

// Pruning knobs
pub use crate::prune::{RankStrategy, SegmentCap};

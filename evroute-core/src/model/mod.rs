//! Data model for EV route planning
//!
//! Charger dataset features, request/configuration types, the
//! feasibility graph and the stitched trip result.

pub mod charger;
pub mod graph;
pub mod request;
pub mod trip;

pub use charger::{ChargerStation, Connector, RefillPoint, StationProperties};
pub use graph::{DESTINATION_KEY, Edge, FeasibilityGraph, GraphNode, NodeKind, ORIGIN_KEY};
pub use request::{EngineConfig, PlanParams, PlanRequest};
pub use trip::{Leg, Stop, TripResult, TripSummary};

//! Graph construction, shortest-path search and itinerary stitching.

pub mod charging;
pub mod dijkstra;
pub mod graph_builder;
pub mod stitch;

//! Network topology module.
//!
//! This module builds toroidal router grids, partitions them into OSPF
//! areas and classifies every link as intra-area, inter-area (backbone)
//! or border.

pub mod types;
pub mod area;
pub mod grid;

// Re-export key types and functions for easier access
pub use types::{AreaTiling, Edge, EdgeClass, EdgeCounts, NodeId, Topology, TopologyError};
pub use area::{area_id, area_of, classify_edge, ClassifiedEdge};
pub use grid::build_grid;

//! Quagga routing daemon configuration.
//!
//! Per-node protocol records, the helpers that enable protocols on sets of
//! nodes, the renderers producing each daemon's configuration file and the
//! installer writing them to disk.

pub mod types;
pub mod store;
pub mod helper;
pub mod render;
pub mod install;

// Re-export key types and functions for easier access
pub use types::{
    AreaRange, BgpConfig, BgpNeighbor, Ospf6Config, OspfConfig, ProtocolConfig, ProtocolKind, ProtocolRecord,
    RipConfig, RipngConfig, ZebraConfig,
};
pub use store::{stores_for, ProtocolConfigStore};
pub use render::render;
pub use install::{install, install_node, DaemonLaunch};

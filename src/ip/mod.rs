//! IP address allocation module.
//!
//! This module hands out the /30 subnet of every point-to-point link, either
//! from one flat `10.0.0.0/8` numbering or from per-area `10.<area>.0.0/16`
//! blocks, and records which interface ends up with which address.

pub mod allocator;
pub mod plan;

// Re-export commonly used types
pub use allocator::{area_network, area_pair, pair_for, raw_pair, AddressError, AddressPair, AddressScope};
pub use plan::{interface_name, AddressPlan, AddressScheme, Interface, LinkAssignment};

//! Shared utilities: IP helpers and topology validation.

pub mod ip_utils;
pub mod validation;

pub use ip_utils::{host_address, is_valid_ipv4, is_valid_ipv4_prefix, is_valid_ipv6};
pub use validation::{check_grid_matches_tiling, expected_edge_counts, verify_edge_counts, ExpectedEdgeCounts};

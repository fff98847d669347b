//! # quaggasim - Grid topologies and Quagga configurations for routing simulations
//!
//! This library builds synthetic toroidal router grids, partitions them into
//! OSPF areas, assigns /30 addresses to every link and generates the
//! configuration files of the Quagga routing daemons (zebra, ospfd, bgpd,
//! ospf6d, ripd, ripngd) running on each simulated router.
//!
//! ## Key Features
//!
//! - **Area Partitioning**: Repeating area tiles separated by a backbone stripe
//! - **Edge Classification**: Intra-area, inter-area (backbone) and border links
//! - **Deterministic Addressing**: Flat `10.0.0.0/8` or per-area `10.<area>.0.0/16` /30 links
//! - **Multi-Protocol**: OSPF, BGP, OSPFv3, RIP and RIPng configuration records
//! - **Reproducible**: Identical inputs always produce byte-identical files
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `config`: Type-safe scenario structures and YAML parsing
//! - `config_loader`: Scenario file loading
//! - `topology`: Area classification and grid construction
//! - `ip`: Link address allocation and the per-interface address plan
//! - `quagga`: Per-node protocol records, rendering and installation
//! - `utils`: IP helpers and the edge count self check
//! - `orchestrator`: End-to-end scenario generation
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use quaggasim::{config_loader, orchestrator};
//! use std::path::Path;
//!
//! // Load a scenario from a YAML file
//! let config = config_loader::load_config(Path::new("scenario.yaml"))?;
//!
//! // Build the grid and write every node's configuration
//! let summary = orchestrator::generate_scenario(&config, Path::new("quagga_output"))?;
//!
//! // quagga_output now contains:
//! // - files-<id>/usr/local/etc/*.conf: one file per daemon per node
//! // - address_plan.json: link addresses and interface names
//! // - launch_plan.json: daemons to start, with their arguments and start times
//! println!("{} nodes configured", summary.nodes);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! general:
//!   stop_time: "10m"
//!
//! grid:
//!   areas:
//!     area_height: 2
//!     area_width: 2
//!     stripe_width: 1
//!     area_rows: 2
//!     area_cols: 2
//!
//! addressing: hierarchical   # or flat
//!
//! protocols:
//!   zebra:
//!     debug: true
//!   ospf:
//!     mode: area             # or flat, with network: "10.0.0.0/8"
//!   bgp:
//!     peer_border_links: true
//! ```
//!
//! ## Error Handling
//!
//! Library-level failures are `thiserror` enums (`TopologyError`,
//! `AddressError`, `ValidationError`); scenario-level functions return
//! `color_eyre::Result` with context attached.

pub mod config;
pub mod config_loader;
pub mod ip;
pub mod topology;
pub mod quagga;
pub mod utils;
pub mod orchestrator;

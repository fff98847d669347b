//! Scenario orchestrator.
//!
//! This module drives scenario generation end to end: grid construction,
//! the edge count self check, the address plan, protocol enablement on
//! every node, and finally the configuration files and JSON manifests.

use crate::config::{Config, OspfMode, ProtocolsConfig};
use crate::ip::{area_network, AddressPlan};
use crate::quagga::{helper, install, stores_for, DaemonLaunch, ProtocolConfigStore};
use crate::topology::{build_grid, EdgeClass, EdgeCounts, Topology};
use crate::utils::{host_address, verify_edge_counts};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{debug, info};
use serde::Serialize;
use std::fs;
use std::iter;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the address plan manifest
pub const ADDRESS_PLAN_FILE: &str = "address_plan.json";

/// File name of the daemon launch manifest
pub const LAUNCH_PLAN_FILE: &str = "launch_plan.json";

/// A fully configured scenario, not yet written to disk
#[derive(Debug, Clone)]
pub struct Scenario {
    pub topology: Topology,
    pub plan: AddressPlan,
    /// One store per node, indexed by node id
    pub stores: Vec<ProtocolConfigStore>,
}

/// What the process layer has to run, and for how long
#[derive(Debug, Clone, Serialize)]
pub struct LaunchPlan {
    #[serde(with = "humantime_serde")]
    pub stop_time: Duration,
    pub daemons: Vec<DaemonLaunch>,
}

/// Overview of a generated scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioSummary {
    pub rows: u32,
    pub cols: u32,
    pub nodes: usize,
    pub areas: u32,
    pub edges: EdgeCounts,
    /// Protocol records across all nodes
    pub records: usize,
    pub daemons: usize,
    pub files_written: usize,
}

impl Scenario {
    /// Summary of the scenario before anything is written
    pub fn summary(&self) -> ScenarioSummary {
        ScenarioSummary {
            rows: self.topology.rows(),
            cols: self.topology.cols(),
            nodes: self.topology.node_count(),
            areas: self.topology.area_count(),
            edges: self.topology.counts(),
            records: self.stores.iter().map(|store| store.kinds().count()).sum(),
            daemons: 0,
            files_written: 0,
        }
    }
}

/// Build the topology, address plan and protocol records of a scenario
pub fn build_scenario(config: &Config) -> Result<Scenario> {
    let (rows, cols) = config.grid.dimensions()?;
    let tiling = config.grid.tiling()?;

    let topology = build_grid(rows, cols, &tiling)
        .wrap_err_with(|| format!("Failed to build {}x{} grid", rows, cols))?;
    verify_edge_counts(&topology).wrap_err("Area tiling does not describe the grid")?;

    let plan = AddressPlan::build(&topology, config.addressing).wrap_err("Failed to assign link addresses")?;

    let mut stores = stores_for(topology.nodes());
    apply_protocols(&config.protocols, &topology, &plan, &mut stores)?;

    Ok(Scenario { topology, plan, stores })
}

/// Enable the configured protocols on every node
pub fn apply_protocols(
    protocols: &ProtocolsConfig,
    topology: &Topology,
    plan: &AddressPlan,
    stores: &mut [ProtocolConfigStore],
) -> Result<()> {
    if protocols.zebra.debug {
        helper::enable_zebra_debug(stores.iter_mut());
    }
    if protocols.zebra.manual_config {
        helper::use_manual_zebra_config(stores.iter_mut());
    }

    if let Some(ospf) = &protocols.ospf {
        match ospf.mode {
            OspfMode::Area => {
                // Every node announces every area; its own area is summarized
                for area in 0..=topology.area_count() {
                    helper::enable_ospf_area(stores.iter_mut(), area_network(area)?, area);
                }
                for store in stores.iter_mut() {
                    let area = topology.area_of(store.node());
                    helper::set_area(iter::once(&mut *store), area_network(area)?, area);
                }
            }
            OspfMode::Flat => helper::enable_ospf(stores.iter_mut(), ospf.network),
        }

        if ospf.interfaces {
            for store in stores.iter_mut() {
                for interface in plan.interfaces_of(store.node()) {
                    helper::ospf_enable_interface(iter::once(&mut *store), interface.index);
                }
            }
        }
        if ospf.router_ids {
            for store in stores.iter_mut() {
                let router_id = Ipv4Addr::from(store.node().0 + 1);
                helper::set_ospf_router_id(store, router_id);
            }
        }
        if ospf.debug {
            helper::enable_ospf_debug(stores.iter_mut());
        }
        info!("OSPF ({:?} mode) enabled on {} nodes", ospf.mode, stores.len());
    }

    if let Some(bgp) = &protocols.bgp {
        helper::enable_bgp(stores.iter_mut());
        let asns: Vec<Option<u32>> = stores.iter().map(helper::get_asn).collect();

        // Each end of a link peers with the address of the other end
        for link in plan.links() {
            for (local, remote) in [(&link.first, &link.second), (&link.second, &link.first)] {
                let Some(remote_as) = asns[remote.node.index()] else {
                    continue;
                };
                let neighbor = host_address(&remote.address);
                let store = &mut stores[local.node.index()];
                helper::bgp_add_neighbor(store, &neighbor, remote_as);
                if bgp.peer_border_links && link.class == EdgeClass::Border {
                    helper::bgp_add_peer_link(store, &neighbor);
                }
                helper::bgp_add_network(store, &link.subnet().to_string());
            }
        }

        if bgp.default_originate {
            helper::bgp_default_originate(stores.iter_mut());
        }
        info!("BGP enabled on {} nodes", stores.len());
    }

    if let Some(ospf6) = &protocols.ospf6 {
        for interface in &ospf6.interfaces {
            helper::enable_ospf6(stores.iter_mut(), interface);
        }
        if ospf6.debug {
            helper::enable_ospf6_debug(stores.iter_mut());
        }
    }

    if let Some(rip) = &protocols.rip {
        for network in &rip.networks {
            helper::enable_rip(stores.iter_mut(), network);
        }
        if rip.debug {
            helper::enable_rip_debug(stores.iter_mut());
        }
    }

    if let Some(ripng) = &protocols.ripng {
        for network in &ripng.networks {
            helper::enable_ripng(stores.iter_mut(), network);
        }
        if ripng.debug {
            helper::enable_ripng_debug(stores.iter_mut());
        }
    }

    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .wrap_err_with(|| format!("Failed to serialize '{}'", path.display()))?;
    fs::write(path, json).wrap_err_with(|| format!("Failed to write '{}'", path.display()))?;
    debug!("Wrote {:?}", path);
    Ok(())
}

/// Install the configuration files of `scenario` and write its manifests
pub fn write_scenario(config: &Config, scenario: &mut Scenario, output_dir: &Path) -> Result<ScenarioSummary> {
    fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", output_dir.display()))?;

    let daemons = install(output_dir, &mut scenario.stores)?;
    let files_written = daemons.iter().filter(|launch| launch.config_file.is_some()).count();

    let (address_plan_path, launch_plan_path) = manifest_paths(output_dir);
    write_json(&address_plan_path, &scenario.plan)?;

    let launch_plan = LaunchPlan {
        stop_time: config.general.stop_time,
        daemons,
    };
    write_json(&launch_plan_path, &launch_plan)?;

    let summary = ScenarioSummary {
        daemons: launch_plan.daemons.len(),
        files_written,
        ..scenario.summary()
    };
    Ok(summary)
}

/// Build a scenario and write everything to `output_dir`
pub fn generate_scenario(config: &Config, output_dir: &Path) -> Result<ScenarioSummary> {
    let mut scenario = build_scenario(config)?;
    let summary = write_scenario(config, &mut scenario, output_dir)?;

    println!("Generated Quagga scenario at {:?}", output_dir);
    println!("  - Grid: {}x{} ({} nodes, {} areas)", summary.rows, summary.cols, summary.nodes, summary.areas);
    println!(
        "  - Links: {} intra, {} inter, {} border",
        summary.edges.intra, summary.edges.inter, summary.edges.border
    );
    println!("  - Daemons: {} ({} configuration files)", summary.daemons, summary.files_written);
    println!("  - Address plan: {:?}", output_dir.join(ADDRESS_PLAN_FILE));
    println!("  - Launch plan: {:?}", output_dir.join(LAUNCH_PLAN_FILE));

    Ok(summary)
}

/// `(address plan, launch plan)` manifest paths inside `output_dir`
pub fn manifest_paths(output_dir: &Path) -> (PathBuf, PathBuf) {
    (output_dir.join(ADDRESS_PLAN_FILE), output_dir.join(LAUNCH_PLAN_FILE))
}

//! Configuration file installation.
//!
//! Writes every node's configuration files under
//! `<output>/files-<id>/usr/local/etc/` and describes the daemons the
//! process layer has to launch. Nothing is launched from here.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{debug, info};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::render::render;
use super::store::ProtocolConfigStore;
use super::types::{ProtocolKind, ZebraConfig};
use crate::topology::NodeId;

/// Directory the daemons read their configuration from, as seen inside a node
pub const DAEMON_CONFIG_DIR: &str = "/usr/local/etc";

/// Stack size requested for every daemon process
pub const DAEMON_STACK_SIZE: u32 = 1 << 16;

/// One daemon process to start on a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaemonLaunch {
    pub node: NodeId,
    pub kind: ProtocolKind,
    pub binary: String,
    pub args: Vec<String>,
    /// Offset from the start of the simulation
    #[serde(with = "humantime_serde")]
    pub start_time: Duration,
    pub stack_size: u32,
    /// File written for this daemon, `None` when the configuration is
    /// provided by hand
    pub config_file: Option<PathBuf>,
}

/// `<output>/files-<id>/usr/local/etc`
pub fn node_config_dir(output_dir: &Path, node: NodeId) -> PathBuf {
    output_dir
        .join(format!("files-{}", node))
        .join("usr")
        .join("local")
        .join("etc")
}

/// Where the configuration file of `kind` is written on the host
pub fn config_path(output_dir: &Path, node: NodeId, kind: ProtocolKind) -> PathBuf {
    node_config_dir(output_dir, node).join(kind.file_name())
}

/// Where the daemon of `kind` reads its configuration inside the node
pub fn daemon_config_path(kind: ProtocolKind) -> String {
    format!("{}/{}", DAEMON_CONFIG_DIR, kind.file_name())
}

fn launch_args(kind: ProtocolKind) -> Vec<String> {
    vec![
        "-f".to_string(),
        daemon_config_path(kind),
        "-i".to_string(),
        format!("{}/{}", DAEMON_CONFIG_DIR, kind.pid_file()),
    ]
}

/// Write the configuration files of one node and return its daemons in
/// launch order. zebra is always installed.
pub fn install_node(output_dir: &Path, store: &mut ProtocolConfigStore) -> Result<Vec<DaemonLaunch>> {
    let node = store.node();
    store.get_or_create(ProtocolKind::Zebra);

    let dir = node_config_dir(output_dir, node);
    fs::create_dir_all(&dir)
        .wrap_err_with(|| format!("Failed to create configuration directory '{}'", dir.display()))?;

    let manual_zebra = store
        .record::<ZebraConfig>()
        .map(ZebraConfig::manual_config)
        .unwrap_or(false);

    let mut launches = Vec::new();
    for config in store.records() {
        let kind = config.kind();
        let config_file = if kind == ProtocolKind::Zebra && manual_zebra {
            debug!("Node {}: zebra.conf is provided by hand, not generating it", node);
            None
        } else {
            let path = config_path(output_dir, node, kind);
            let mut content = render(config).join("\n");
            content.push('\n');
            fs::write(&path, content)
                .wrap_err_with(|| format!("Failed to write '{}'", path.display()))?;
            debug!("Node {}: wrote {:?}", node, path);
            Some(path)
        };

        launches.push(DaemonLaunch {
            node,
            kind,
            binary: kind.daemon().to_string(),
            args: launch_args(kind),
            start_time: kind.start_time(node),
            stack_size: DAEMON_STACK_SIZE,
            config_file,
        });
    }

    Ok(launches)
}

/// Install every node's configuration
pub fn install(output_dir: &Path, stores: &mut [ProtocolConfigStore]) -> Result<Vec<DaemonLaunch>> {
    let mut launches = Vec::new();
    for store in stores.iter_mut() {
        launches.extend(install_node(output_dir, store)?);
    }

    let written = launches.iter().filter(|launch| launch.config_file.is_some()).count();
    info!(
        "Installed {} configuration files for {} daemons on {} nodes",
        written,
        launches.len(),
        stores.len()
    );
    Ok(launches)
}

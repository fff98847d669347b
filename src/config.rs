use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ip::AddressScheme;
use crate::topology::AreaTiling;
use crate::utils::is_valid_ipv4_prefix;

/// Scenario configuration, mirroring the YAML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    pub grid: GridConfig,
    /// Link numbering scheme (default: hierarchical)
    #[serde(default)]
    pub addressing: AddressScheme,
    #[serde(default)]
    pub protocols: ProtocolsConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.general.stop_time.is_zero() {
            return Err(ValidationError::InvalidGeneral(
                "stop_time must be greater than zero".to_string(),
            ));
        }

        if let Some(tiling) = &self.grid.areas {
            tiling
                .check()
                .map_err(|e| ValidationError::InvalidGrid(e.to_string()))?;
        }

        let (rows, cols) = self.grid.dimensions()?;
        if rows == 0 || cols == 0 {
            return Err(ValidationError::InvalidGrid(format!(
                "grid must have at least one row and one column (got {}x{})",
                rows, cols
            )));
        }

        // Area numbers end up in the second octet of 10.<area>.0.0/16
        let area_count = self.grid.tiling()?.area_count();
        let ospf_mode = self.protocols.ospf.as_ref().map(|ospf| ospf.mode);
        let per_area_prefixes =
            self.addressing == AddressScheme::Hierarchical || ospf_mode == Some(OspfMode::Area);
        if per_area_prefixes && area_count > u8::MAX as u32 {
            return Err(ValidationError::InvalidAddressing(format!(
                "{} areas do not fit in 10.<area>.0.0/16 prefixes",
                area_count
            )));
        }

        // Area ranges summarize 10.<area>.0.0/16, which flat links never use
        if self.addressing == AddressScheme::Flat && ospf_mode == Some(OspfMode::Area) {
            return Err(ValidationError::InvalidAddressing(
                "ospf.mode area needs hierarchical addressing; use ospf.mode flat with flat addressing"
                    .to_string(),
            ));
        }

        self.protocols.validate()
    }
}

/// General scenario settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Simulated time after which the daemons are stopped (e.g. "10m")
    #[serde(with = "humantime_serde")]
    pub stop_time: Duration,
}

/// Grid dimensions and area tiling
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,
    /// Area tiling; without it one area covers the whole grid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub areas: Option<AreaTiling>,
}

impl GridConfig {
    /// Grid size: explicit rows/cols win over the size the tiling describes
    pub fn dimensions(&self) -> Result<(u32, u32), ValidationError> {
        match (&self.areas, self.rows, self.cols) {
            (Some(tiling), rows, cols) => Ok((
                rows.unwrap_or_else(|| tiling.grid_rows()),
                cols.unwrap_or_else(|| tiling.grid_cols()),
            )),
            (None, Some(rows), Some(cols)) => Ok((rows, cols)),
            (None, _, _) => Err(ValidationError::InvalidGrid(
                "rows and cols are required when no area tiling is given".to_string(),
            )),
        }
    }

    /// The configured tiling, or a single area covering the grid
    pub fn tiling(&self) -> Result<AreaTiling, ValidationError> {
        match &self.areas {
            Some(tiling) => Ok(*tiling),
            None => {
                let (rows, cols) = self.dimensions()?;
                Ok(AreaTiling::single_area(rows, cols))
            }
        }
    }
}

/// Which daemons to configure, and how
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtocolsConfig {
    #[serde(default)]
    pub zebra: ZebraSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ospf: Option<OspfSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bgp: Option<BgpSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ospf6: Option<Ospf6Settings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rip: Option<RipSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ripng: Option<RipSettings>,
}

impl ProtocolsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ospf6) = &self.ospf6 {
            if ospf6.interfaces.is_empty() {
                return Err(ValidationError::InvalidProtocol(
                    "ospf6.interfaces cannot be empty".to_string(),
                ));
            }
        }
        for (name, rip) in [("rip", &self.rip), ("ripng", &self.ripng)] {
            if let Some(rip) = rip {
                if rip.networks.is_empty() {
                    return Err(ValidationError::InvalidProtocol(format!(
                        "{}.networks cannot be empty",
                        name
                    )));
                }
            }
        }
        // ripd entries are either interface names or IPv4 prefixes
        if let Some(rip) = &self.rip {
            if let Some(bad) = rip.networks.iter().find(|n| n.contains('/') && !is_valid_ipv4_prefix(n)) {
                return Err(ValidationError::InvalidProtocol(format!(
                    "rip.networks entry '{}' is not a valid IPv4 prefix",
                    bad
                )));
            }
        }
        if self.zebra.manual_config {
            log::warn!("zebra.conf will not be generated; provide it for every node");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZebraSettings {
    #[serde(default)]
    pub debug: bool,
    /// Do not generate zebra.conf
    #[serde(default)]
    pub manual_config: bool,
}

/// How OSPF networks are announced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OspfMode {
    /// One /16 per area plus an area range for the node's own area
    #[default]
    Area,
    /// A single network in the backbone area
    Flat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OspfSettings {
    #[serde(default)]
    pub mode: OspfMode,
    /// Network announced in flat mode
    #[serde(default = "default_ospf_network")]
    pub network: Ipv4Net,
    #[serde(default)]
    pub debug: bool,
    /// Enable OSPF on every device of every node
    #[serde(default)]
    pub interfaces: bool,
    /// Give every node an explicit router id derived from its node id
    #[serde(default)]
    pub router_ids: bool,
}

fn default_ospf_network() -> Ipv4Net {
    Ipv4Net::new(std::net::Ipv4Addr::new(10, 0, 0, 0), 8).unwrap_or_default()
}

impl Default for OspfSettings {
    fn default() -> Self {
        Self {
            mode: OspfMode::Area,
            network: default_ospf_network(),
            debug: false,
            interfaces: false,
            router_ids: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BgpSettings {
    #[serde(default)]
    pub default_originate: bool,
    /// Filter routes sent over border links to the node's own networks
    #[serde(default = "default_true")]
    pub peer_border_links: bool,
}

fn default_true() -> bool {
    true
}

impl Default for BgpSettings {
    fn default() -> Self {
        Self {
            default_originate: false,
            peer_border_links: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ospf6Settings {
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub debug: bool,
}

/// RIP and RIPng share the same settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RipSettings {
    pub networks: Vec<String>,
    #[serde(default)]
    pub debug: bool,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid grid configuration: {0}")]
    InvalidGrid(String),
    #[error("Invalid addressing configuration: {0}")]
    InvalidAddressing(String),
    #[error("Invalid protocol configuration: {0}")]
    InvalidProtocol(String),
}

/// Default implementations
impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            stop_time: Duration::from_secs(600),
        }
    }
}

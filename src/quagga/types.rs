//! Quagga protocol configuration records.
//!
//! One record type per routing daemon. Records only hold what is needed to
//! render the daemon's configuration file; they are owned by exactly one
//! node's store and are never shared.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

use ipnet::Ipv4Net;

use crate::topology::NodeId;

/// Routing daemon kinds, ordered the way their files are written and their
/// daemons are launched
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolKind {
    Zebra,
    Ospf,
    Bgp,
    Ospf6,
    Rip,
    Ripng,
}

impl ProtocolKind {
    pub const ALL: [ProtocolKind; 6] = [
        ProtocolKind::Zebra,
        ProtocolKind::Ospf,
        ProtocolKind::Bgp,
        ProtocolKind::Ospf6,
        ProtocolKind::Rip,
        ProtocolKind::Ripng,
    ];

    /// Daemon binary name, also used as the configuration hostname
    pub fn daemon(&self) -> &'static str {
        match self {
            ProtocolKind::Zebra => "zebra",
            ProtocolKind::Ospf => "ospfd",
            ProtocolKind::Bgp => "bgpd",
            ProtocolKind::Ospf6 => "ospf6d",
            ProtocolKind::Rip => "ripd",
            ProtocolKind::Ripng => "ripngd",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.conf", self.daemon())
    }

    pub fn pid_file(&self) -> String {
        format!("{}.pid", self.daemon())
    }

    /// Launch offset of this daemon on `node`, staggered so that daemons of
    /// neighbouring nodes do not all start at the same instant
    pub fn start_time(&self, node: NodeId) -> Duration {
        let id = node.0 as u64;
        match self {
            ProtocolKind::Zebra => Duration::from_millis(1000 + 10 * id),
            ProtocolKind::Ospf => Duration::from_millis(5000 + id),
            ProtocolKind::Bgp => Duration::from_millis(5000 + 300 * id),
            ProtocolKind::Ospf6 | ProtocolKind::Rip | ProtocolKind::Ripng => {
                Duration::from_millis(5000 + 500 * id)
            }
        }
    }
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.daemon())
    }
}

/// zebra: interface management and router advertisements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ZebraConfig {
    debug: bool,
    /// interface -> advertised prefix (possibly empty)
    radvd: BTreeMap<String, String>,
    home_agent_flags: Vec<String>,
    manual_config: bool,
}

impl ZebraConfig {
    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn radvd(&self) -> &BTreeMap<String, String> {
        &self.radvd
    }

    pub fn home_agent_flags(&self) -> &[String] {
        &self.home_agent_flags
    }

    pub fn manual_config(&self) -> bool {
        self.manual_config
    }

    pub fn enable_debug(&mut self) {
        self.debug = true;
    }

    /// Advertise `prefix` on `interface`. The first prefix registered for an
    /// interface is kept.
    pub fn add_radvd(&mut self, interface: &str, prefix: &str) {
        self.radvd
            .entry(interface.to_string())
            .or_insert_with(|| prefix.to_string());
    }

    pub fn add_home_agent_flag(&mut self, interface: &str) {
        push_unique(&mut self.home_agent_flags, interface.to_string());
    }

    /// The zebra configuration is provided by hand; do not generate it
    pub fn use_manual_config(&mut self) {
        self.manual_config = true;
    }
}

/// Route summarization for one area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AreaRange {
    pub area: u32,
    pub prefix: Ipv4Net,
}

/// ospfd
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OspfConfig {
    router_id: Option<Ipv4Addr>,
    debug: bool,
    networks: BTreeMap<Ipv4Net, u32>,
    interfaces: Vec<u32>,
    area_range: Option<AreaRange>,
}

impl OspfConfig {
    pub fn router_id(&self) -> Option<Ipv4Addr> {
        self.router_id
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// `network -> area`, iterated in prefix order
    pub fn networks(&self) -> &BTreeMap<Ipv4Net, u32> {
        &self.networks
    }

    pub fn interfaces(&self) -> &[u32] {
        &self.interfaces
    }

    pub fn area_range(&self) -> Option<&AreaRange> {
        self.area_range.as_ref()
    }

    /// Announce `prefix` in `area`. A later call for the same prefix replaces
    /// the area.
    pub fn add_network(&mut self, prefix: Ipv4Net, area: u32) {
        if let Some(previous) = self.networks.insert(prefix, area) {
            if previous != area {
                log::debug!("OSPF network {} moved from area {} to area {}", prefix, previous, area);
            }
        }
    }

    /// Summarize `prefix` as the range of `area`. Only one range is kept and
    /// the network map is left untouched.
    pub fn set_area(&mut self, prefix: Ipv4Net, area: u32) {
        self.area_range = Some(AreaRange { area, prefix });
    }

    pub fn set_router_id(&mut self, router_id: Ipv4Addr) {
        self.router_id = Some(router_id);
    }

    pub fn enable_debug(&mut self) {
        self.debug = true;
    }

    pub fn enable_interface(&mut self, index: u32) {
        push_unique(&mut self.interfaces, index);
    }
}

/// ospf6d
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ospf6Config {
    router_id: u32,
    debug: bool,
    interfaces: Vec<String>,
}

impl Ospf6Config {
    pub fn new(node: NodeId) -> Self {
        Self {
            router_id: node.0,
            debug: false,
            interfaces: Vec::new(),
        }
    }

    /// `255.1.1.<id mod 255>`
    pub fn router_id(&self) -> Ipv4Addr {
        Ipv4Addr::new(255, 1, 1, (self.router_id % 255) as u8)
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    pub fn enable_debug(&mut self) {
        self.debug = true;
    }

    pub fn enable_interface(&mut self, interface: &str) {
        push_unique(&mut self.interfaces, interface.to_string());
    }
}

/// A BGP peer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BgpNeighbor {
    /// Kept as given; addresses that are neither IPv4 nor IPv6 are left out
    /// of the address-family blocks
    pub address: String,
    pub remote_as: u32,
}

/// bgpd
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BgpConfig {
    asn: u32,
    neighbors: Vec<BgpNeighbor>,
    peer_links: Vec<String>,
    networks: Vec<String>,
    default_originate: bool,
}

impl BgpConfig {
    pub fn new(node: NodeId) -> Self {
        let asn = node.0 + 1;
        if asn > u8::MAX as u32 {
            log::warn!("BGP router id 192.168.0.{} of node {} is not a valid IPv4 address", asn, node);
        }
        Self {
            asn,
            neighbors: Vec::new(),
            peer_links: Vec::new(),
            networks: Vec::new(),
            default_originate: false,
        }
    }

    pub fn asn(&self) -> u32 {
        self.asn
    }

    /// `192.168.0.<asn>`
    pub fn router_id(&self) -> String {
        format!("192.168.0.{}", self.asn)
    }

    pub fn neighbors(&self) -> &[BgpNeighbor] {
        &self.neighbors
    }

    pub fn peer_links(&self) -> &[String] {
        &self.peer_links
    }

    pub fn networks(&self) -> &[String] {
        &self.networks
    }

    pub fn is_default_originate(&self) -> bool {
        self.default_originate
    }

    pub fn is_peer_link(&self, address: &str) -> bool {
        self.peer_links.iter().any(|peer| peer == address)
    }

    /// Add a neighbor, or update the remote AS of an existing one
    pub fn add_neighbor(&mut self, address: &str, remote_as: u32) {
        match self.neighbors.iter_mut().find(|n| n.address == address) {
            Some(existing) => existing.remote_as = remote_as,
            None => self.neighbors.push(BgpNeighbor {
                address: address.to_string(),
                remote_as,
            }),
        }
    }

    /// Mark `address` as a peer link: routes sent to it are filtered by the
    /// node's own networks
    pub fn add_peer_link(&mut self, address: &str) {
        push_unique(&mut self.peer_links, address.to_string());
    }

    pub fn add_network(&mut self, prefix: &str) {
        push_unique(&mut self.networks, prefix.to_string());
    }

    pub fn default_originate(&mut self) {
        self.default_originate = true;
    }
}

/// ripd
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RipConfig {
    debug: bool,
    networks: Vec<String>,
}

/// ripngd
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RipngConfig {
    debug: bool,
    networks: Vec<String>,
}

macro_rules! rip_like_config {
    ($ty:ty) => {
        impl $ty {
            pub fn debug(&self) -> bool {
                self.debug
            }

            /// Networks or interface names, in the order they were enabled
            pub fn networks(&self) -> &[String] {
                &self.networks
            }

            pub fn enable_debug(&mut self) {
                self.debug = true;
            }

            pub fn add_network(&mut self, network: &str) {
                push_unique(&mut self.networks, network.to_string());
            }
        }
    };
}

rip_like_config!(RipConfig);
rip_like_config!(RipngConfig);

fn push_unique<T: PartialEq>(list: &mut Vec<T>, value: T) {
    if !list.contains(&value) {
        list.push(value);
    }
}

/// A configuration record of any kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProtocolConfig {
    Zebra(ZebraConfig),
    Ospf(OspfConfig),
    Bgp(BgpConfig),
    Ospf6(Ospf6Config),
    Rip(RipConfig),
    Ripng(RipngConfig),
}

impl ProtocolConfig {
    /// Empty record of `kind` for `node`
    pub fn new(kind: ProtocolKind, node: NodeId) -> Self {
        match kind {
            ProtocolKind::Zebra => ProtocolConfig::Zebra(ZebraConfig::default()),
            ProtocolKind::Ospf => ProtocolConfig::Ospf(OspfConfig::default()),
            ProtocolKind::Bgp => ProtocolConfig::Bgp(BgpConfig::new(node)),
            ProtocolKind::Ospf6 => ProtocolConfig::Ospf6(Ospf6Config::new(node)),
            ProtocolKind::Rip => ProtocolConfig::Rip(RipConfig::default()),
            ProtocolKind::Ripng => ProtocolConfig::Ripng(RipngConfig::default()),
        }
    }

    pub fn kind(&self) -> ProtocolKind {
        match self {
            ProtocolConfig::Zebra(_) => ProtocolKind::Zebra,
            ProtocolConfig::Ospf(_) => ProtocolKind::Ospf,
            ProtocolConfig::Bgp(_) => ProtocolKind::Bgp,
            ProtocolConfig::Ospf6(_) => ProtocolKind::Ospf6,
            ProtocolConfig::Rip(_) => ProtocolKind::Rip,
            ProtocolConfig::Ripng(_) => ProtocolKind::Ripng,
        }
    }
}

/// Typed access to one variant of [`ProtocolConfig`]
pub trait ProtocolRecord: Sized {
    const KIND: ProtocolKind;

    fn from_config(config: &ProtocolConfig) -> Option<&Self>;
    fn from_config_mut(config: &mut ProtocolConfig) -> Option<&mut Self>;
}

macro_rules! protocol_record {
    ($ty:ty, $variant:ident) => {
        impl ProtocolRecord for $ty {
            const KIND: ProtocolKind = ProtocolKind::$variant;

            fn from_config(config: &ProtocolConfig) -> Option<&Self> {
                match config {
                    ProtocolConfig::$variant(record) => Some(record),
                    _ => None,
                }
            }

            fn from_config_mut(config: &mut ProtocolConfig) -> Option<&mut Self> {
                match config {
                    ProtocolConfig::$variant(record) => Some(record),
                    _ => None,
                }
            }
        }
    };
}

protocol_record!(ZebraConfig, Zebra);
protocol_record!(OspfConfig, Ospf);
protocol_record!(BgpConfig, Bgp);
protocol_record!(Ospf6Config, Ospf6);
protocol_record!(RipConfig, Rip);
protocol_record!(RipngConfig, Ripng);

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> Ipv4Net {
        s.parse().unwrap()
    }

    #[test]
    fn test_kind_order_and_names() {
        let mut kinds = ProtocolKind::ALL.to_vec();
        kinds.reverse();
        kinds.sort();
        assert_eq!(kinds, ProtocolKind::ALL.to_vec());

        assert_eq!(ProtocolKind::Ospf.file_name(), "ospfd.conf");
        assert_eq!(ProtocolKind::Ripng.pid_file(), "ripngd.pid");
        assert_eq!(ProtocolKind::Bgp.to_string(), "bgpd");
    }

    #[test]
    fn test_start_times_are_staggered() {
        assert_eq!(ProtocolKind::Zebra.start_time(NodeId(0)), Duration::from_secs(1));
        assert_eq!(ProtocolKind::Zebra.start_time(NodeId(3)), Duration::from_millis(1030));
        assert_eq!(ProtocolKind::Ospf.start_time(NodeId(7)), Duration::from_millis(5007));
        assert_eq!(ProtocolKind::Bgp.start_time(NodeId(2)), Duration::from_millis(5600));
        assert_eq!(ProtocolKind::Rip.start_time(NodeId(2)), Duration::from_secs(6));
    }

    #[test]
    fn test_ospf_network_overwrite() {
        let mut ospf = OspfConfig::default();
        ospf.add_network(net("10.0.0.0/16"), 0);
        ospf.add_network(net("10.0.0.0/16"), 3);
        assert_eq!(ospf.networks().len(), 1);
        assert_eq!(ospf.networks()[&net("10.0.0.0/16")], 3);
    }

    #[test]
    fn test_ospf_set_area_keeps_networks() {
        let mut ospf = OspfConfig::default();
        ospf.add_network(net("10.0.0.0/16"), 0);
        ospf.set_area(net("10.0.0.0/16"), 3);
        ospf.set_area(net("10.2.0.0/16"), 2);

        assert_eq!(ospf.networks()[&net("10.0.0.0/16")], 0);
        assert_eq!(ospf.area_range(), Some(&AreaRange { area: 2, prefix: net("10.2.0.0/16") }));
    }

    #[test]
    fn test_bgp_identity_derives_from_node() {
        let bgp = BgpConfig::new(NodeId(4));
        assert_eq!(bgp.asn(), 5);
        assert_eq!(bgp.router_id(), "192.168.0.5");
    }

    #[test]
    fn test_bgp_neighbor_update() {
        let mut bgp = BgpConfig::new(NodeId(0));
        bgp.add_neighbor("10.0.0.2", 2);
        bgp.add_neighbor("10.0.0.2", 7);
        bgp.add_peer_link("10.0.0.2");
        bgp.add_peer_link("10.0.0.2");

        assert_eq!(bgp.neighbors().len(), 1);
        assert_eq!(bgp.neighbors()[0].remote_as, 7);
        assert_eq!(bgp.peer_links(), &["10.0.0.2".to_string()]);
        assert!(bgp.is_peer_link("10.0.0.2"));
    }

    #[test]
    fn test_zebra_radvd_keeps_first_prefix() {
        let mut zebra = ZebraConfig::default();
        zebra.add_radvd("sim1", "2001:db8:1::/64");
        zebra.add_radvd("sim1", "2001:db8:2::/64");
        zebra.add_radvd("sim0", "");
        let entries: Vec<(&String, &String)> = zebra.radvd().iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "sim0");
        assert_eq!(entries[1].1, "2001:db8:1::/64");
    }

    #[test]
    fn test_ospf6_router_id_wraps() {
        assert_eq!(Ospf6Config::new(NodeId(3)).router_id(), Ipv4Addr::new(255, 1, 1, 3));
        assert_eq!(Ospf6Config::new(NodeId(256)).router_id(), Ipv4Addr::new(255, 1, 1, 1));
    }

    #[test]
    fn test_typed_access() {
        let mut config = ProtocolConfig::new(ProtocolKind::Rip, NodeId(0));
        assert_eq!(config.kind(), ProtocolKind::Rip);
        assert!(OspfConfig::from_config(&config).is_none());

        RipConfig::from_config_mut(&mut config).unwrap().add_network("sim0");
        assert_eq!(RipConfig::from_config(&config).unwrap().networks(), &["sim0".to_string()]);
    }
}

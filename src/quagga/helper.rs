//! Node-set level protocol enablement.
//!
//! Scenarios configure routers in bulk: every function taking `nodes`
//! applies to each store yielded by the iterator, creating the record on
//! first use. Functions taking a single store configure one router.
//!
//! ```
//! use quaggasim::quagga::{helper, stores_for, OspfConfig};
//! use quaggasim::topology::NodeId;
//!
//! let mut stores = stores_for(&[NodeId(0), NodeId(1)]);
//! helper::enable_ospf(&mut stores, "10.0.0.0/8".parse().unwrap());
//! assert_eq!(stores[1].record::<OspfConfig>().unwrap().networks().len(), 1);
//! ```

use ipnet::Ipv4Net;
use log::debug;
use std::net::Ipv4Addr;

use super::store::ProtocolConfigStore;
use super::types::{BgpConfig, Ospf6Config, OspfConfig, RipConfig, RipngConfig, ZebraConfig};

// OSPF

/// Announce `network` in the backbone area on every node
pub fn enable_ospf<'a, I>(nodes: I, network: Ipv4Net)
where
    I: IntoIterator<Item = &'a mut ProtocolConfigStore>,
{
    enable_ospf_area(nodes, network, 0);
}

/// Announce `network` in `area` on every node
pub fn enable_ospf_area<'a, I>(nodes: I, network: Ipv4Net, area: u32)
where
    I: IntoIterator<Item = &'a mut ProtocolConfigStore>,
{
    for store in nodes {
        store.record_mut::<OspfConfig>().add_network(network, area);
    }
    debug!("OSPF network {} enabled in area {}", network, area);
}

/// Summarize `network` as the range of `area` on every node
pub fn set_area<'a, I>(nodes: I, network: Ipv4Net, area: u32)
where
    I: IntoIterator<Item = &'a mut ProtocolConfigStore>,
{
    for store in nodes {
        store.record_mut::<OspfConfig>().set_area(network, area);
    }
}

pub fn set_ospf_router_id(node: &mut ProtocolConfigStore, router_id: Ipv4Addr) {
    node.record_mut::<OspfConfig>().set_router_id(router_id);
}

pub fn enable_ospf_debug<'a, I>(nodes: I)
where
    I: IntoIterator<Item = &'a mut ProtocolConfigStore>,
{
    for store in nodes {
        store.record_mut::<OspfConfig>().enable_debug();
    }
}

/// Enable OSPF on device `index` of every node
pub fn ospf_enable_interface<'a, I>(nodes: I, index: u32)
where
    I: IntoIterator<Item = &'a mut ProtocolConfigStore>,
{
    for store in nodes {
        store.record_mut::<OspfConfig>().enable_interface(index);
    }
}

// zebra

pub fn enable_zebra_debug<'a, I>(nodes: I)
where
    I: IntoIterator<Item = &'a mut ProtocolConfigStore>,
{
    for store in nodes {
        store.record_mut::<ZebraConfig>().enable_debug();
    }
}

/// Send router advertisements on `interface`, optionally with a prefix
/// (empty string for none)
pub fn enable_radvd(node: &mut ProtocolConfigStore, interface: &str, prefix: &str) {
    node.record_mut::<ZebraConfig>().add_radvd(interface, prefix);
}

pub fn enable_home_agent_flag(node: &mut ProtocolConfigStore, interface: &str) {
    node.record_mut::<ZebraConfig>().add_home_agent_flag(interface);
}

/// Leave zebra.conf to the user; the daemon is still launched
pub fn use_manual_zebra_config<'a, I>(nodes: I)
where
    I: IntoIterator<Item = &'a mut ProtocolConfigStore>,
{
    for store in nodes {
        store.record_mut::<ZebraConfig>().use_manual_config();
    }
}

// BGP

pub fn enable_bgp<'a, I>(nodes: I)
where
    I: IntoIterator<Item = &'a mut ProtocolConfigStore>,
{
    for store in nodes {
        let asn = store.record_mut::<BgpConfig>().asn();
        debug!("Node {}: BGP enabled as AS {}", store.node(), asn);
    }
}

/// AS number of a node, if BGP is enabled on it
pub fn get_asn(node: &ProtocolConfigStore) -> Option<u32> {
    node.record::<BgpConfig>().map(BgpConfig::asn)
}

pub fn bgp_add_neighbor(node: &mut ProtocolConfigStore, neighbor: &str, remote_as: u32) {
    node.record_mut::<BgpConfig>().add_neighbor(neighbor, remote_as);
}

pub fn bgp_add_peer_link(node: &mut ProtocolConfigStore, neighbor: &str) {
    node.record_mut::<BgpConfig>().add_peer_link(neighbor);
}

pub fn bgp_add_network(node: &mut ProtocolConfigStore, prefix: &str) {
    node.record_mut::<BgpConfig>().add_network(prefix);
}

pub fn bgp_default_originate<'a, I>(nodes: I)
where
    I: IntoIterator<Item = &'a mut ProtocolConfigStore>,
{
    for store in nodes {
        store.record_mut::<BgpConfig>().default_originate();
    }
}

// OSPF6

pub fn enable_ospf6<'a, I>(nodes: I, interface: &str)
where
    I: IntoIterator<Item = &'a mut ProtocolConfigStore>,
{
    for store in nodes {
        store.record_mut::<Ospf6Config>().enable_interface(interface);
    }
}

pub fn enable_ospf6_debug<'a, I>(nodes: I)
where
    I: IntoIterator<Item = &'a mut ProtocolConfigStore>,
{
    for store in nodes {
        store.record_mut::<Ospf6Config>().enable_debug();
    }
}

// RIP / RIPng

pub fn enable_rip<'a, I>(nodes: I, network: &str)
where
    I: IntoIterator<Item = &'a mut ProtocolConfigStore>,
{
    for store in nodes {
        store.record_mut::<RipConfig>().add_network(network);
    }
}

pub fn enable_rip_debug<'a, I>(nodes: I)
where
    I: IntoIterator<Item = &'a mut ProtocolConfigStore>,
{
    for store in nodes {
        store.record_mut::<RipConfig>().enable_debug();
    }
}

pub fn enable_ripng<'a, I>(nodes: I, network: &str)
where
    I: IntoIterator<Item = &'a mut ProtocolConfigStore>,
{
    for store in nodes {
        store.record_mut::<RipngConfig>().add_network(network);
    }
}

pub fn enable_ripng_debug<'a, I>(nodes: I)
where
    I: IntoIterator<Item = &'a mut ProtocolConfigStore>,
{
    for store in nodes {
        store.record_mut::<RipngConfig>().enable_debug();
    }
}

//! Configuration file rendering.
//!
//! Each renderer turns one record into the ordered lines of the daemon's
//! configuration file. Section order matters: the daemons read their
//! configuration top to bottom.

use super::types::{
    BgpConfig, Ospf6Config, OspfConfig, ProtocolConfig, ProtocolKind, RipConfig, RipngConfig, ZebraConfig,
};
use crate::utils::{is_valid_ipv4, is_valid_ipv6};

/// Render any record
pub fn render(config: &ProtocolConfig) -> Vec<String> {
    match config {
        ProtocolConfig::Zebra(zebra) => render_zebra(zebra),
        ProtocolConfig::Ospf(ospf) => render_ospf(ospf),
        ProtocolConfig::Bgp(bgp) => render_bgp(bgp),
        ProtocolConfig::Ospf6(ospf6) => render_ospf6(ospf6),
        ProtocolConfig::Rip(rip) => render_rip(rip),
        ProtocolConfig::Ripng(ripng) => render_ripng(ripng),
    }
}

fn header(kind: ProtocolKind) -> Vec<String> {
    vec![
        format!("hostname {}", kind.daemon()),
        "password zebra".to_string(),
        "log stdout".to_string(),
    ]
}

pub fn render_zebra(zebra: &ZebraConfig) -> Vec<String> {
    let mut lines = header(ProtocolKind::Zebra);

    if zebra.debug() {
        lines.push("debug zebra kernel".to_string());
        lines.push("debug zebra events".to_string());
        lines.push("debug zebra packet".to_string());
    }

    for (interface, prefix) in zebra.radvd() {
        lines.push(format!("interface {}", interface));
        lines.push(" ipv6 nd ra-interval 5".to_string());
        if !prefix.is_empty() {
            lines.push(format!(" ipv6 nd prefix {} 300 150", prefix));
        }
        lines.push(" no ipv6 nd suppress-ra".to_string());
        lines.push("!".to_string());
    }

    for interface in zebra.home_agent_flags() {
        lines.push(format!("interface {}", interface));
        lines.push(" ipv6 nd home-agent-config-flag".to_string());
        lines.push("!".to_string());
    }

    lines
}

pub fn render_ospf(ospf: &OspfConfig) -> Vec<String> {
    // Named after its own daemon like every other file, not "zebra"
    let mut lines = header(ProtocolKind::Ospf);

    if ospf.debug() {
        for topic in ["event", "nsm", "ism", "packet all"] {
            lines.push(format!("debug ospf {}", topic));
        }
    }

    for index in ospf.interfaces() {
        lines.push(format!("interface ns3-device{}", index));
    }

    lines.push("router ospf".to_string());
    for (prefix, area) in ospf.networks() {
        lines.push(format!("  network {} area {}", prefix, area));
    }
    if let Some(range) = ospf.area_range() {
        lines.push(format!("  area {} range {}", range.area, range.prefix));
    }
    lines.push(" redistribute connected".to_string());
    if let Some(router_id) = ospf.router_id() {
        lines.push(format!(" ospf router-id {}", router_id));
    }
    lines.push("!".to_string());

    lines
}

pub fn render_ospf6(ospf6: &Ospf6Config) -> Vec<String> {
    let mut lines = header(ProtocolKind::Ospf6);
    lines.push("service advanced-vty".to_string());

    if ospf6.debug() {
        for topic in ["neighbor", "message all", "zebra", "interface"] {
            lines.push(format!("debug ospf6 {}", topic));
        }
    }

    for interface in ospf6.interfaces() {
        lines.push(format!("interface {}", interface));
        lines.push(" ipv6 ospf6 retransmit-interval 8".to_string());
        lines.push("!".to_string());
    }

    if !ospf6.interfaces().is_empty() {
        lines.push("router ospf6".to_string());
        // router-id and redistribute are repeated for every interface
        for interface in ospf6.interfaces() {
            lines.push(format!(" router-id {}", ospf6.router_id()));
            lines.push(format!(" interface {} area 0.0.0.0", interface));
            lines.push(" redistribute connected".to_string());
        }
        lines.push("!".to_string());
    }

    lines
}

pub fn render_rip(rip: &RipConfig) -> Vec<String> {
    render_rip_like("rip", ProtocolKind::Rip, rip.debug(), rip.networks())
}

pub fn render_ripng(ripng: &RipngConfig) -> Vec<String> {
    render_rip_like("ripng", ProtocolKind::Ripng, ripng.debug(), ripng.networks())
}

fn render_rip_like(protocol: &str, kind: ProtocolKind, debug: bool, networks: &[String]) -> Vec<String> {
    let mut lines = header(kind);
    lines.push("service advanced-vty".to_string());

    if debug {
        for topic in ["events", "packet send detail", "packet recv detail", "zebra"] {
            lines.push(format!("debug {} {}", protocol, topic));
        }
    }

    if !networks.is_empty() {
        lines.push(format!("router {}", protocol));
        for network in networks {
            lines.push(format!(" network {}", network));
            lines.push(" redistribute connected".to_string());
        }
        lines.push("!".to_string());
    }

    lines
}

pub fn render_bgp(bgp: &BgpConfig) -> Vec<String> {
    let router_id = bgp.router_id();
    let mut lines = header(ProtocolKind::Bgp);

    for topic in ["", " fsm", " events", " updates"] {
        lines.push(format!("debug bgp{}", topic));
    }

    lines.push(format!("router bgp {}", bgp.asn()));
    lines.push(format!("  bgp router-id {}", router_id));
    for neighbor in bgp.neighbors() {
        lines.push(format!("  neighbor {} remote-as {}", neighbor.address, neighbor.remote_as));
        lines.push(format!("  neighbor {} advertisement-interval 5", neighbor.address));
    }
    lines.push("  redistribute connected".to_string());

    lines.push("  address-family ipv4 unicast".to_string());
    for neighbor in bgp.neighbors() {
        if !is_valid_ipv4(&neighbor.address) {
            continue;
        }
        push_activation(&mut lines, &neighbor.address, bgp.is_default_originate());
        if bgp.is_peer_link(&neighbor.address) {
            lines.push(format!(
                "   neighbor {} route-map {} out",
                neighbor.address,
                route_map_name(&router_id, &neighbor.address)
            ));
        }
    }
    for network in bgp.networks() {
        lines.push(format!("   network {}", network));
    }
    lines.push("  exit-address-family".to_string());

    lines.push("  address-family ipv6 unicast".to_string());
    for neighbor in bgp.neighbors() {
        if !is_valid_ipv6(&neighbor.address) {
            continue;
        }
        push_activation(&mut lines, &neighbor.address, bgp.is_default_originate());
    }
    for network in bgp.networks() {
        lines.push(format!("   network {}", network));
    }
    lines.push("   redistribute connected".to_string());
    lines.push("  exit-address-family".to_string());

    let access_list = access_list_name(&router_id);
    for network in bgp.networks() {
        lines.push(format!("access-list {} permit {}", access_list, network));
    }
    for peer in bgp.peer_links() {
        lines.push(format!("route-map {} permit 5", route_map_name(&router_id, peer)));
        lines.push(format!(" match ip address {}", access_list));
        lines.push("!".to_string());
    }

    lines.push("!".to_string());
    lines
}

fn push_activation(lines: &mut Vec<String>, address: &str, default_originate: bool) {
    lines.push(format!("   neighbor {} activate", address));
    lines.push(format!("   neighbor {} next-hop-self", address));
    if default_originate {
        lines.push(format!("   neighbor {} default-originate", address));
    }
}

/// Outbound route-map applied to a peer link
pub fn route_map_name(router_id: &str, peer: &str) -> String {
    format!("MAP-{}-{}", router_id, peer)
}

/// Access list holding the networks a router announces to its peer links
pub fn access_list_name(router_id: &str) -> String {
    format!("ALIST-{}", router_id)
}

//! Link address plan.
//!
//! Applies the /30 allocator to every link of a topology under the active
//! addressing scheme and names the interfaces on both ends.

use ipnet::Ipv4Net;
use log::debug;
use serde::{Deserialize, Serialize};

use super::allocator::{pair_for, AddressError, AddressScope};
use crate::topology::{EdgeClass, NodeId, Topology};

/// How link ids are mapped onto the address space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressScheme {
    /// One `10.0.0.0/8` numbering: intra links, then inter links, then border links
    Flat,
    /// Intra links numbered inside their area's `10.<area>.0.0/16`,
    /// inter and border links inside `10.0.0.0/16`.
    ///
    /// An intra link keeps its position in the grid-wide intra bucket as
    /// its number inside the area prefix, so the whole grid is limited to
    /// `AREA_LINK_LIMIT` intra links (and as many inter plus border links),
    /// however empty each area's /16 is.
    #[default]
    Hierarchical,
}

/// One end of a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interface {
    pub node: NodeId,
    /// Device index on the node, in link creation order
    pub index: u32,
    pub name: String,
    pub address: Ipv4Net,
}

/// Addresses and interfaces of one link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkAssignment {
    pub class: EdgeClass,
    /// Link id inside the class bucket
    pub link_id: u32,
    /// Link id handed to the allocator
    pub address_link_id: u32,
    pub scope: AddressScope,
    pub first: Interface,
    pub second: Interface,
}

impl LinkAssignment {
    pub fn subnet(&self) -> Ipv4Net {
        self.first.address.trunc()
    }

    /// `(local, remote)` interfaces as seen from `node`
    pub fn side(&self, node: NodeId) -> Option<(&Interface, &Interface)> {
        if self.first.node == node {
            Some((&self.first, &self.second))
        } else if self.second.node == node {
            Some((&self.second, &self.first))
        } else {
            None
        }
    }
}

/// Addresses for every link of a topology
#[derive(Debug, Clone, Serialize)]
pub struct AddressPlan {
    pub scheme: AddressScheme,
    /// Intra links, then inter links, then border links, each in bucket order
    pub links: Vec<LinkAssignment>,
}

/// Name of device `index` inside a simulated node
pub fn interface_name(index: u32) -> String {
    format!("sim{}", index)
}

impl AddressPlan {
    /// Assign addresses to every link of `topology`.
    pub fn build(topology: &Topology, scheme: AddressScheme) -> Result<Self, AddressError> {
        // Device indices follow the order links were attached to each node
        let mut next_index = vec![0u32; topology.node_count()];
        let mut device_index = vec![(0u32, 0u32); topology.counts().total()];
        for (_, edge) in topology.edges_in_creation_order() {
            let first = next_index[edge.a.index()];
            next_index[edge.a.index()] += 1;
            let second = next_index[edge.b.index()];
            next_index[edge.b.index()] += 1;
            device_index[edge.seq as usize] = (first, second);
        }

        let counts = topology.counts();
        let mut links = Vec::with_capacity(counts.total());
        for class in EdgeClass::ALL {
            for edge in topology.edges(class) {
                let (scope, address_link_id) = match (scheme, class) {
                    (AddressScheme::Flat, EdgeClass::Intra) => (AddressScope::Global, edge.link_id),
                    (AddressScheme::Flat, EdgeClass::Inter) => {
                        (AddressScope::Global, counts.intra as u32 + edge.link_id)
                    }
                    (AddressScheme::Flat, EdgeClass::Border) => (
                        AddressScope::Global,
                        (counts.intra + counts.inter) as u32 + edge.link_id,
                    ),
                    (AddressScheme::Hierarchical, EdgeClass::Intra) => {
                        (AddressScope::Area(topology.area_of(edge.a)), edge.link_id)
                    }
                    (AddressScheme::Hierarchical, EdgeClass::Inter) => (AddressScope::Area(0), edge.link_id),
                    (AddressScheme::Hierarchical, EdgeClass::Border) => {
                        (AddressScope::Area(0), counts.inter as u32 + edge.link_id)
                    }
                };

                let pair = pair_for(scope, address_link_id)?;
                let (first_index, second_index) = device_index[edge.seq as usize];
                debug!("Assigned addresses: {} ({} link {})", pair, class, edge.link_id);

                links.push(LinkAssignment {
                    class,
                    link_id: edge.link_id,
                    address_link_id,
                    scope,
                    first: Interface {
                        node: edge.a,
                        index: first_index,
                        name: interface_name(first_index),
                        address: pair.first,
                    },
                    second: Interface {
                        node: edge.b,
                        index: second_index,
                        name: interface_name(second_index),
                        address: pair.second,
                    },
                });
            }
        }

        log::info!("Address plan ({:?}): {} links", scheme, links.len());
        Ok(Self { scheme, links })
    }

    pub fn links(&self) -> &[LinkAssignment] {
        &self.links
    }

    /// Links touching `node`
    pub fn links_of(&self, node: NodeId) -> impl Iterator<Item = &LinkAssignment> {
        self.links.iter().filter(move |link| link.side(node).is_some())
    }

    /// Interfaces of `node`, ordered by device index
    pub fn interfaces_of(&self, node: NodeId) -> Vec<&Interface> {
        let mut interfaces: Vec<&Interface> = self
            .links_of(node)
            .filter_map(|link| link.side(node).map(|(local, _)| local))
            .collect();
        interfaces.sort_by_key(|iface| iface.index);
        interfaces
    }
}

//! Link address allocation.
//!
//! Every point-to-point link gets a /30 out of `10.0.0.0/8`. The address
//! pair is a pure function of the link id (and of the area for the
//! hierarchical scheme), so re-running a scenario always yields the same
//! addresses.

use ipnet::{Ipv4Net, PrefixLenError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Prefix length of every link subnet
pub const LINK_PREFIX_LEN: u8 = 30;

/// Number of /30 links that fit in `10.0.0.0/8`
pub const RAW_LINK_LIMIT: u32 = 1 << 22;

/// Number of /30 links that fit in one `10.<area>.0.0/16`
pub const AREA_LINK_LIMIT: u32 = 1 << 14;

/// Largest area number that fits in the second octet
pub const MAX_AREA: u32 = u8::MAX as u32;

const TEN_NET: u32 = 10 << 24;

/// Address allocation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("Link id {link_id} exceeds the 10.0.0.0/8 link space ({limit} links)")]
    RawLinkOutOfRange { link_id: u32, limit: u32 },
    #[error("Link id {link_id} exceeds the per-area /16 link space ({limit} links)")]
    AreaLinkOutOfRange { link_id: u32, limit: u32 },
    #[error("Area {0} does not fit in the second octet of 10.0.0.0/8")]
    AreaOutOfRange(u32),
    #[error(transparent)]
    PrefixLen(#[from] PrefixLenError),
}

/// Which allocator a link id is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressScope {
    /// Flat `10.0.0.0/8` numbering
    Global,
    /// Per-area `10.<area>.0.0/16` numbering
    Area(u32),
}

/// The two host addresses of a /30 link subnet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AddressPair {
    pub first: Ipv4Net,
    pub second: Ipv4Net,
}

impl AddressPair {
    /// Network address of the link subnet
    pub fn subnet(&self) -> Ipv4Net {
        self.first.trunc()
    }
}

impl fmt::Display for AddressPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first, self.second)
    }
}

fn link_pair(network_bits: u32, base: u32) -> Result<AddressPair, AddressError> {
    Ok(AddressPair {
        first: Ipv4Net::new(Ipv4Addr::from(network_bits | base), LINK_PREFIX_LEN)?,
        second: Ipv4Net::new(Ipv4Addr::from(network_bits | (base + 1)), LINK_PREFIX_LEN)?,
    })
}

/// Address pair `10.B2.B1.B0/30` of link `link_id` in the flat scheme.
///
/// # Examples
/// ```
/// use quaggasim::ip::raw_pair;
///
/// let pair = raw_pair(0).unwrap();
/// assert_eq!(pair.first.to_string(), "10.0.0.1/30");
/// assert_eq!(pair.second.to_string(), "10.0.0.2/30");
/// ```
pub fn raw_pair(link_id: u32) -> Result<AddressPair, AddressError> {
    if link_id >= RAW_LINK_LIMIT {
        return Err(AddressError::RawLinkOutOfRange {
            link_id,
            limit: RAW_LINK_LIMIT,
        });
    }
    link_pair(TEN_NET, link_id * 4 + 1)
}

/// Address pair `10.<area>.B1.B0/30` of link `link_id` inside `area`.
pub fn area_pair(area: u32, link_id: u32) -> Result<AddressPair, AddressError> {
    if area > MAX_AREA {
        return Err(AddressError::AreaOutOfRange(area));
    }
    if link_id >= AREA_LINK_LIMIT {
        return Err(AddressError::AreaLinkOutOfRange {
            link_id,
            limit: AREA_LINK_LIMIT,
        });
    }
    link_pair(TEN_NET | (area << 16), link_id * 4 + 1)
}

/// The `10.<area>.0.0/16` block holding every link of `area`
pub fn area_network(area: u32) -> Result<Ipv4Net, AddressError> {
    if area > MAX_AREA {
        return Err(AddressError::AreaOutOfRange(area));
    }
    Ok(Ipv4Net::new(Ipv4Addr::from(TEN_NET | (area << 16)), 16)?)
}

/// Dispatch to the allocator matching `scope`
pub fn pair_for(scope: AddressScope, link_id: u32) -> Result<AddressPair, AddressError> {
    match scope {
        AddressScope::Global => raw_pair(link_id),
        AddressScope::Area(area) => area_pair(area, link_id),
    }
}

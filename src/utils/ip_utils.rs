use ipnet::Ipv4Net;
use std::net::{Ipv4Addr, Ipv6Addr};

/// IP utility functions for validation and formatting

/// Check if a string is a valid dotted-quad IPv4 address
pub fn is_valid_ipv4(ip: &str) -> bool {
    ip.parse::<Ipv4Addr>().is_ok()
}

/// Check if a string is a valid IPv6 address
pub fn is_valid_ipv6(ip: &str) -> bool {
    ip.parse::<Ipv6Addr>().is_ok()
}

/// Check if a string is a valid IPv4 prefix such as `10.0.0.0/16`
pub fn is_valid_ipv4_prefix(prefix: &str) -> bool {
    prefix.parse::<Ipv4Net>().is_ok()
}

/// Host part of an interface address, without the prefix length
pub fn host_address(net: &Ipv4Net) -> String {
    net.addr().to_string()
}

//! Connection and origin addresses.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// An address as it appears in an `o=` or `c=` line.
///
/// IPv4 forms are stored as [`Ipv4Addr`]; the grammar never accepts leading
/// zeros, so their `Display` output is identical to the parsed text. IPv6
/// forms keep the text as written (case and `::` placement vary and are
/// preserved for round-tripping).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    Ip4(Ipv4Addr),
    /// `224.0.0.0/ttl[/count]` through `239.255.255.255/ttl[/count]`.
    Ip4Multicast {
        addr: Ipv4Addr,
        ttl: u8,
        count: Option<u32>,
    },
    Ip6(String),
    /// `FF..::../[count]`; IPv6 multicast carries no TTL.
    Ip6Multicast { addr: String, count: Option<u32> },
    Fqdn(String),
    /// Opaque address of some other family.
    Extension(String),
}

impl Address {
    pub fn is_multicast(&self) -> bool {
        matches!(self, Address::Ip4Multicast { .. } | Address::Ip6Multicast { .. })
    }

    /// The `<addrtype>` token that normally accompanies this address.
    /// FQDN and extension addresses default to `IP4`.
    pub fn addr_type(&self) -> &'static str {
        match self {
            Address::Ip6(_) | Address::Ip6Multicast { .. } => "IP6",
            _ => "IP4",
        }
    }

    pub fn to_ipv4(&self) -> Option<Ipv4Addr> {
        match self {
            Address::Ip4(a) | Address::Ip4Multicast { addr: a, .. } => Some(*a),
            _ => None,
        }
    }

    /// Semantic IPv6 value; `None` for non-IPv6 variants or text the standard
    /// library does not accept (the grammar is more permissive than RFC 4291).
    pub fn to_ipv6(&self) -> Option<Ipv6Addr> {
        match self {
            Address::Ip6(s) | Address::Ip6Multicast { addr: s, .. } => s.parse().ok(),
            _ => None,
        }
    }

    /// Host part without TTL or count suffixes.
    pub fn host(&self) -> String {
        match self {
            Address::Ip4(a) | Address::Ip4Multicast { addr: a, .. } => a.to_string(),
            Address::Ip6(s)
            | Address::Ip6Multicast { addr: s, .. }
            | Address::Fqdn(s)
            | Address::Extension(s) => s.clone(),
        }
    }
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Self {
        Address::Ip4(addr)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Ip4(a) => write!(f, "{}", a),
            Address::Ip4Multicast { addr, ttl, count } => {
                write!(f, "{}/{}", addr, ttl)?;
                if let Some(n) = count {
                    write!(f, "/{}", n)?;
                }
                Ok(())
            }
            Address::Ip6Multicast { addr, count } => {
                write!(f, "{}", addr)?;
                if let Some(n) = count {
                    write!(f, "/{}", n)?;
                }
                Ok(())
            }
            Address::Ip6(s) | Address::Fqdn(s) | Address::Extension(s) => f.write_str(s),
        }
    }
}

//! ## flowcollect-flow::addr
//! Fixed-width IP address shared by IPv4 and IPv6 flows.
//!
//! IPv4 addresses are carried as IPv4-mapped IPv6 addresses (`::ffff:0:0/96`,
//! RFC 4038 section 4.2), so both families occupy the same 16 bytes of the
//! kernel record. The type does not tag which family it holds: the caller
//! knows from the record's EtherType.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FlowError;

pub const IPV6_LEN: usize = 16;
pub const IPV4_LEN: usize = 4;

const V4_MAPPED_PREFIX: [u8; 12] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff];

/// 16-byte address as laid out in the kernel flow key.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IpAddr(pub [u8; IPV6_LEN]);

impl IpAddr {
    /// Reinterprets exactly 16 raw bytes as an address.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FlowError> {
        let octets: [u8; IPV6_LEN] = bytes.try_into().map_err(|_| FlowError::InvalidLength {
            expected: IPV6_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(octets))
    }

    pub fn octets(&self) -> [u8; IPV6_LEN] {
        self.0
    }

    /// True when the first 12 bytes hold the `::ffff:0:0/96` prefix.
    pub fn is_ipv4_mapped(&self) -> bool {
        self.0[..IPV6_LEN - IPV4_LEN] == V4_MAPPED_PREFIX
    }

    /// Returns the standard library equivalent. Mapped addresses come back as `V4`.
    pub fn ip(&self) -> std::net::IpAddr {
        let v6 = Ipv6Addr::from(self.0);
        match v6.to_ipv4_mapped() {
            Some(v4) => std::net::IpAddr::V4(v4),
            None => std::net::IpAddr::V6(v6),
        }
    }

    /// Encodes an IPv4 address as an integer in network (big endian) order.
    ///
    /// Assumes the address already is IPv4. On a genuine IPv6 address this
    /// silently returns its last 4 bytes.
    pub fn int_encode_v4(&self) -> u32 {
        u32::from_be_bytes([self.0[12], self.0[13], self.0[14], self.0[15]])
    }
}

impl From<Ipv4Addr> for IpAddr {
    fn from(v4: Ipv4Addr) -> Self {
        Self(v4.to_ipv6_mapped().octets())
    }
}

impl From<Ipv6Addr> for IpAddr {
    fn from(v6: Ipv6Addr) -> Self {
        Self(v6.octets())
    }
}

impl From<std::net::IpAddr> for IpAddr {
    fn from(ip: std::net::IpAddr) -> Self {
        match ip {
            std::net::IpAddr::V4(v4) => v4.into(),
            std::net::IpAddr::V6(v6) => v6.into(),
        }
    }
}

impl From<[u8; IPV6_LEN]> for IpAddr {
    fn from(octets: [u8; IPV6_LEN]) -> Self {
        Self(octets)
    }
}

impl fmt::Display for IpAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.ip(), f)
    }
}

impl fmt::Debug for IpAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IpAddr({})", self)
    }
}

impl FromStr for IpAddr {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<std::net::IpAddr>()
            .map(Self::from)
            .map_err(|_| FlowError::InvalidAddr(s.to_string()))
    }
}

impl Serialize for IpAddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IpAddr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

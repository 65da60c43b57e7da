//! ## flowcollect-flow::key
//! Flow identity: link, network and transport tuple plus direction and interface.
//!
//! Field order and widths follow the kernel-side `flow_id_t` exactly; see
//! [`crate::raw`] for the byte layout.

use std::fmt;

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::addr::{IpAddr, IPV6_LEN};
use crate::mac::{MacAddr, MAC_LEN};

/// IEEE 802 EtherType for IPv4.
pub const ETH_P_IPV4: u16 = 0x0800;
/// IEEE 802 EtherType for IPv6.
pub const ETH_P_IPV6: u16 = 0x86DD;

/// Flow direction, values as in IPFIX information element 61.
///
/// Kept as the raw byte: the decoder does not validate it, so values other
/// than ingress/egress pass through unchanged.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Direction(pub u8);

impl Direction {
    pub const INGRESS: Direction = Direction(0);
    pub const EGRESS: Direction = Direction(1);

    pub fn is_ingress(self) -> bool {
        self == Self::INGRESS
    }

    pub fn is_egress(self) -> bool {
        self == Self::EGRESS
    }
}

impl From<u8> for Direction {
    fn from(value: u8) -> Self {
        Direction(value)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::INGRESS => f.write_str("ingress"),
            Self::EGRESS => f.write_str("egress"),
            Direction(other) => write!(f, "unknown({other})"),
        }
    }
}

impl fmt::Debug for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Direction({self})")
    }
}

/// Identifies a flow. Must coincide byte by byte with the kernel `flow_id_t`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    #[serde(rename = "Etype")]
    pub eth_protocol: u16,
    #[serde(rename = "FlowDirection")]
    pub direction: Direction,
    #[serde(rename = "SrcMac")]
    pub src_mac: MacAddr,
    #[serde(rename = "DstMac")]
    pub dst_mac: MacAddr,
    #[serde(rename = "SrcAddr")]
    pub src_addr: IpAddr,
    #[serde(rename = "DstAddr")]
    pub dst_addr: IpAddr,
    #[serde(rename = "SrcPort")]
    pub src_port: u16,
    #[serde(rename = "DstPort")]
    pub dst_port: u16,
    #[serde(rename = "Proto")]
    pub protocol: u8,
    #[serde(rename = "IFIndex")]
    pub if_index: u32,
}

impl RecordKey {
    /// Packed size of the key in the kernel record.
    pub const SIZE: usize = 2 + 1 + MAC_LEN * 2 + IPV6_LEN * 2 + 2 + 2 + 1 + 4;

    pub fn is_ipv6(&self) -> bool {
        self.eth_protocol == ETH_P_IPV6
    }

    /// Source address interpreted through the EtherType: IPv4 unless the
    /// record is IPv6.
    pub fn src_ip(&self) -> std::net::IpAddr {
        self.typed_ip(&self.src_addr)
    }

    pub fn dst_ip(&self) -> std::net::IpAddr {
        self.typed_ip(&self.dst_addr)
    }

    fn typed_ip(&self, addr: &IpAddr) -> std::net::IpAddr {
        if self.is_ipv6() {
            std::net::IpAddr::V6(std::net::Ipv6Addr::from(addr.octets()))
        } else {
            std::net::IpAddr::V4(std::net::Ipv4Addr::from(addr.int_encode_v4()))
        }
    }

    /// Reads the key fields in little-endian order. `buf` must hold at least
    /// [`RecordKey::SIZE`] bytes.
    pub(crate) fn decode<B: Buf>(buf: &mut B) -> Self {
        let eth_protocol = buf.get_u16_le();
        let direction = Direction(buf.get_u8());
        let mut src_mac = [0u8; MAC_LEN];
        buf.copy_to_slice(&mut src_mac);
        let mut dst_mac = [0u8; MAC_LEN];
        buf.copy_to_slice(&mut dst_mac);
        let mut src_addr = [0u8; IPV6_LEN];
        buf.copy_to_slice(&mut src_addr);
        let mut dst_addr = [0u8; IPV6_LEN];
        buf.copy_to_slice(&mut dst_addr);

        Self {
            eth_protocol,
            direction,
            src_mac: MacAddr(src_mac),
            dst_mac: MacAddr(dst_mac),
            src_addr: IpAddr(src_addr),
            dst_addr: IpAddr(dst_addr),
            src_port: buf.get_u16_le(),
            dst_port: buf.get_u16_le(),
            protocol: buf.get_u8(),
            if_index: buf.get_u32_le(),
        }
    }

    pub(crate) fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u16_le(self.eth_protocol);
        buf.put_u8(self.direction.0);
        buf.put_slice(&self.src_mac.0);
        buf.put_slice(&self.dst_mac.0);
        buf.put_slice(&self.src_addr.0);
        buf.put_slice(&self.dst_addr.0);
        buf.put_u16_le(self.src_port);
        buf.put_u16_le(self.dst_port);
        buf.put_u8(self.protocol);
        buf.put_u32_le(self.if_index);
    }
}

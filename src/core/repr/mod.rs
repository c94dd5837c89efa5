//! Serialization and deserialization of network packets.
//!
//! The `repr` module provides abstractions for serialization and deserializing
//! packets and frames at different network layers to/from byte buffers.

pub mod arp;
pub mod ethernet;
pub mod ipv4;
pub mod tcp;
pub mod udp;

pub use self::arp::{
    Arp,
    Op as ArpOp,
};
pub use self::ethernet::{
    eth_types,
    Address as EthernetAddress,
    Frame as EthernetFrame,
};
pub use self::ipv4::{
    protocols as ipv4_protocols,
    Address as Ipv4Address,
    Packet as Ipv4Packet,
    Repr as Ipv4Repr,
};
pub use self::tcp::Packet as TcpPacket;
pub use self::udp::{
    Packet as UdpPacket,
    Repr as UdpRepr,
};

use crate::core::link::Link;
use crate::core::repr::{
    eth_types,
    ipv4_protocols,
    EthernetAddress,
    EthernetFrame,
    Ipv4Address,
    Ipv4Packet,
    Ipv4Repr,
};
use crate::core::service::{
    ethernet,
    tcp,
    udp,
    Callbacks,
    Interface,
};
use crate::{
    Error,
    Result,
};

/// Sends an IPv4 packet via an interface.
///
/// The header is serialized here so f only writes the IPv4 payload. The
/// Ethernet frame is eth_frame_len bytes long and anything in it after the
/// IPv4 packet is zeroed.
pub fn send_packet<L, F>(
    interface: &mut Interface<L>,
    dst_addr: EthernetAddress,
    ipv4_repr: &Ipv4Repr,
    eth_frame_len: usize,
    f: F,
) -> Result<()>
where
    L: Link,
    F: FnOnce(&mut [u8]) -> Result<()>,
{
    let ipv4_packet_len = ipv4_repr.buffer_len();
    if EthernetFrame::<&[u8]>::buffer_len(ipv4_packet_len) > eth_frame_len {
        return Err(Error::Exhausted);
    }

    ethernet::send_frame(interface, dst_addr, eth_types::IPV4, eth_frame_len, |eth_payload| {
        let (ipv4_buffer, padding) = eth_payload.split_at_mut(ipv4_packet_len);
        for byte in padding.iter_mut() {
            *byte = 0;
        }

        let mut ipv4_packet = Ipv4Packet::try_new(ipv4_buffer)?;
        ipv4_repr.serialize(&mut ipv4_packet);
        f(ipv4_packet.payload_mut())
    })
}

/// Receives an IPv4 packet.
///
/// Packets for other hosts are dropped, UDP and TCP payloads are propagated
/// up the network stack.
pub fn recv_packet(
    ipv4_addr: Ipv4Address,
    callbacks: &Callbacks,
    ipv4_buffer: &[u8],
) -> Result<()> {
    let ipv4_packet = Ipv4Packet::try_new(ipv4_buffer)?;
    ipv4_packet.check_encoding()?;

    let ipv4_repr = Ipv4Repr::deserialize(&ipv4_packet);

    if ipv4_repr.dst_addr != ipv4_addr && !ipv4_repr.dst_addr.is_broadcast() {
        debug!(
            "Ignoring IPv4 packet with destination {}.",
            ipv4_repr.dst_addr
        );
        return Err(Error::Ignored);
    }

    match ipv4_repr.protocol {
        ipv4_protocols::UDP => udp::recv_packet(callbacks, &ipv4_repr, ipv4_packet.payload()),
        ipv4_protocols::TCP => tcp::recv_packet(callbacks, &ipv4_repr, ipv4_packet.payload()),
        i => {
            debug!("Ignoring IPv4 packet with protocol {}.", i);
            Err(Error::Ignored)
        }
    }
}

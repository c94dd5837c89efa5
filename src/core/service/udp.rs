use std::cmp;

use crate::core::link::{
    Link,
    BUFFER_LEN,
};
use crate::core::repr::{
    ipv4_protocols,
    EthernetFrame,
    Ipv4Repr,
    UdpPacket,
    UdpRepr,
};
use crate::core::service::{
    ipv4,
    Callbacks,
    Datagram,
    Interface,
};
use crate::{
    Error,
    Result,
};

/// Offset of the UDP payload in the transmit buffer.
pub const PAYLOAD_OFFSET: usize = 50;

/// Shortest UDP frame sent, excluding the CRC.
pub const MIN_FRAME_LEN: usize = 72;

/// Largest UDP payload that fits the transmit buffer.
pub const MAX_PAYLOAD_LEN: usize = BUFFER_LEN - PAYLOAD_OFFSET - EthernetFrame::<&[u8]>::CRC_LEN;

/// Returns the part of the transmit buffer the payload of the next
/// `send_packet(...)` is read from.
pub fn payload_mut<L: Link>(interface: &mut Interface<L>) -> &mut [u8] {
    &mut interface.dev.begin_transmit()[PAYLOAD_OFFSET .. PAYLOAD_OFFSET + MAX_PAYLOAD_LEN]
}

/// Sends the first payload_len bytes of `payload_mut(...)` as a UDP datagram
/// to the host in the ARP cache.
///
/// Nothing is resolved here, the caller runs `arp::resolve(...)` first. Odd
/// payloads are followed by a zero byte on the wire which the UDP length does
/// not count, and short frames are zero padded.
pub fn send_packet<L: Link>(
    interface: &mut Interface<L>,
    src_port: u16,
    dst_port: u16,
    payload_len: usize,
) -> Result<()> {
    let dst_ipv4_addr = interface.arp_cache.ipv4_addr();
    let dst_eth_addr = match interface.arp_cache.eth_addr() {
        Some(eth_addr) => eth_addr,
        None => {
            debug!(
                "Not sending UDP packet to unresolved {}.",
                dst_ipv4_addr
            );
            return Err(Error::Address);
        }
    };

    if payload_len > MAX_PAYLOAD_LEN {
        return Err(Error::Exhausted);
    }

    let udp_repr = UdpRepr {
        src_port,
        dst_port,
        length: UdpPacket::<&[u8]>::buffer_len(payload_len) as u16,
    };
    let ipv4_repr = Ipv4Repr {
        src_addr: interface.ipv4_addr,
        dst_addr: dst_ipv4_addr,
        protocol: ipv4_protocols::UDP,
        payload_len: udp_repr.length,
    };

    let padded_len = payload_len + (payload_len & 1);
    let eth_frame_len = cmp::max(PAYLOAD_OFFSET + padded_len, MIN_FRAME_LEN);

    trace!(
        "Sending {} byte UDP payload to {}:{}.",
        payload_len,
        dst_ipv4_addr,
        dst_port
    );

    ipv4::send_packet(interface, dst_eth_addr, &ipv4_repr, eth_frame_len, |udp_buffer| {
        let mut udp_packet = UdpPacket::try_new(udp_buffer)?;
        udp_repr.serialize(&mut udp_packet, ipv4_repr.src_addr, ipv4_repr.dst_addr);
        Ok(())
    })
}

/// Receives a UDP packet and hands the payload to the UDP callback.
pub fn recv_packet(callbacks: &Callbacks, ipv4_repr: &Ipv4Repr, udp_buffer: &[u8]) -> Result<()> {
    let udp_packet = UdpPacket::try_new(udp_buffer)?;
    udp_packet.check_encoding()?;

    let udp_repr = UdpRepr::deserialize(&udp_packet);

    match callbacks.udp {
        Some(callback) => callback(Datagram {
            src_addr: ipv4_repr.src_addr,
            src_port: udp_repr.src_port,
            dst_port: udp_repr.dst_port,
            payload: udp_packet.payload(),
        }),
        None => debug!(
            "Dropping UDP packet for port {}, no callback.",
            udp_repr.dst_port
        ),
    }

    Ok(())
}

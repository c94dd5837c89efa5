use crate::core::check;
use crate::core::link::{
    Link,
    Slot,
};
use crate::core::repr::ethernet::PREAMBLE;
use crate::core::repr::{
    eth_types,
    EthernetAddress,
    EthernetFrame,
};
use crate::core::service::{
    arp,
    ipv4,
    Interface,
};
use crate::{
    Error,
    Result,
};

/// Shortest buffer the MAC may report that is looked at at all.
pub const MIN_RX_LEN: usize = 13;

/// Writes the preamble, addresses and type of an Ethernet header.
pub fn encode_header(
    buffer: &mut [u8],
    dst_addr: EthernetAddress,
    src_addr: EthernetAddress,
    payload_type: u16,
) -> Result<()> {
    let mut eth_frame = EthernetFrame::try_new(buffer)?;
    eth_frame.set_preamble();
    eth_frame.set_dst_addr(dst_addr);
    eth_frame.set_src_addr(src_addr);
    eth_frame.set_payload_type(payload_type);
    Ok(())
}

/// Validates a received buffer and returns a view of the frame with the CRC
/// trailer stripped.
pub fn decode_frame(buffer: &[u8]) -> Result<EthernetFrame<&[u8]>> {
    if buffer.len() < MIN_RX_LEN {
        return Err(Error::Malformed);
    }

    let preamble_len = EthernetFrame::<&[u8]>::PREAMBLE_LEN;
    if buffer[.. preamble_len] != PREAMBLE {
        return Err(Error::Malformed);
    }

    let frame_len = buffer.len() - EthernetFrame::<&[u8]>::CRC_LEN;
    if !check::crc32_verify(buffer, preamble_len, frame_len - preamble_len) {
        return Err(Error::Checksum);
    }

    EthernetFrame::try_new(&buffer[.. frame_len]).map_err(|_| Error::Malformed)
}

/// Sends an Ethernet frame via an interface.
///
/// The header is filled in here; f writes the payload. The frame is
/// eth_frame_len bytes long before the CRC.
pub fn send_frame<L, F>(
    interface: &mut Interface<L>,
    dst_addr: EthernetAddress,
    payload_type: u16,
    eth_frame_len: usize,
    f: F,
) -> Result<()>
where
    L: Link,
    F: FnOnce(&mut [u8]) -> Result<()>,
{
    let src_addr = interface.ethernet_addr;

    {
        let buffer = interface.dev.begin_transmit();
        if eth_frame_len > buffer.len() {
            return Err(Error::Exhausted);
        }

        let mut eth_frame = EthernetFrame::try_new(&mut buffer[.. eth_frame_len])?;
        encode_header(eth_frame.as_mut(), dst_addr, src_addr, payload_type)?;
        f(eth_frame.payload_mut())?;
    }

    interface.dev.transmit(eth_frame_len)
}

/// Receives the Ethernet frame in a slot of an interface.
///
/// The frame is validated and propagated up the network stack. The slot is
/// not released here.
pub fn recv_frame<L: Link>(interface: &mut Interface<L>, slot: Slot) -> Result<()> {
    let arp_reply = {
        let eth_frame = decode_frame(interface.dev.slot_payload(slot))?;

        match eth_frame.payload_type() {
            eth_types::ARP => arp::recv_packet(
                &mut interface.arp_cache,
                interface.ethernet_addr,
                interface.ipv4_addr,
                eth_frame.payload(),
            )?,
            eth_types::IPV4 => {
                ipv4::recv_packet(interface.ipv4_addr, &interface.callbacks, eth_frame.payload())?;
                None
            }
            i => {
                debug!("Ignoring ethernet frame with type {:#06x}.", i);
                return Err(Error::Ignored);
            }
        }
    };

    match arp_reply {
        Some(arp_reply) => arp::send_packet(interface, &arp_reply, arp_reply.target_hw_addr),
        None => Ok(()),
    }
}

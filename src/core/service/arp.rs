use crate::core::arp_cache::ArpCache;
use crate::core::link::Link;
use crate::core::repr::{
    eth_types,
    Arp,
    ArpOp,
    EthernetAddress,
    EthernetFrame,
    Ipv4Address,
};
use crate::core::service::{
    dispatch,
    ethernet,
    Interface,
};
use crate::{
    Error,
    Result,
};

/// Sends an ARP packet via an interface.
///
/// The packet is zero padded to the minimum Ethernet payload.
pub fn send_packet<L: Link>(
    interface: &mut Interface<L>,
    arp_repr: &Arp,
    dst_addr: EthernetAddress,
) -> Result<()> {
    let eth_frame_len = EthernetFrame::<&[u8]>::buffer_len(Arp::PADDED_LEN);

    ethernet::send_frame(interface, dst_addr, eth_types::ARP, eth_frame_len, |payload| {
        for byte in payload.iter_mut() {
            *byte = 0;
        }
        arp_repr.serialize(payload)
    })
}

/// Receives an ARP packet.
///
/// A reply for the address the cache is waiting on updates the cache. A
/// request for our own address yields the reply to send back.
pub fn recv_packet(
    arp_cache: &mut ArpCache,
    ethernet_addr: EthernetAddress,
    ipv4_addr: Ipv4Address,
    arp_buffer: &[u8],
) -> Result<Option<Arp>> {
    if arp_buffer.len() < Arp::PADDED_LEN {
        debug!("Ignoring ARP packet with {} bytes.", arp_buffer.len());
        return Err(Error::Exhausted);
    }

    let arp_repr = Arp::deserialize(arp_buffer)?;

    match arp_repr.op {
        ArpOp::Reply => {
            if arp_cache.update_eth_addr(arp_repr.source_proto_addr, arp_repr.source_hw_addr) {
                debug!(
                    "Received ARP reply, mapping {} to {}.",
                    arp_repr.source_proto_addr, arp_repr.source_hw_addr
                );
                Ok(None)
            } else {
                debug!(
                    "Ignoring ARP reply from {}, waiting on {}.",
                    arp_repr.source_proto_addr,
                    arp_cache.ipv4_addr()
                );
                Err(Error::Ignored)
            }
        }
        ArpOp::Request => {
            if arp_repr.target_proto_addr != ipv4_addr {
                debug!(
                    "Ignoring ARP request for {}.",
                    arp_repr.target_proto_addr
                );
                return Err(Error::Ignored);
            }

            debug!(
                "Sending ARP reply to {}/{}.",
                arp_repr.source_proto_addr, arp_repr.source_hw_addr
            );

            Ok(Some(Arp {
                op: ArpOp::Reply,
                source_hw_addr: ethernet_addr,
                source_proto_addr: ipv4_addr,
                target_hw_addr: arp_repr.source_hw_addr,
                target_proto_addr: arp_repr.source_proto_addr,
            }))
        }
    }
}

/// Resolves the Ethernet address of an IPv4 address.
///
/// The limited broadcast address maps to the broadcast MAC without any
/// traffic and a cached mapping is returned as is. Otherwise the cache entry is
/// replaced by an unresolved one and ARP requests are broadcast until a reply
/// shows up. Between requests the interface is serviced, so frames for other
/// protocols are processed while waiting.
pub fn resolve<L: Link>(
    interface: &mut Interface<L>,
    ipv4_addr: Ipv4Address,
) -> Result<EthernetAddress> {
    resolve_with(interface, ipv4_addr, dispatch::service)
}

/// Same as `resolve(...)`, with poll called to process incoming frames while
/// waiting for a reply.
///
/// The wait after each request is config.arp_poll_iterations calls to poll;
/// there are config.arp_retries requests before Error::Timeout is returned.
pub fn resolve_with<L, F>(
    interface: &mut Interface<L>,
    ipv4_addr: Ipv4Address,
    mut poll: F,
) -> Result<EthernetAddress>
where
    L: Link,
    F: FnMut(&mut Interface<L>),
{
    if ipv4_addr.is_broadcast() {
        interface
            .arp_cache
            .set_eth_addr_for_ip(ipv4_addr, EthernetAddress::BROADCAST);
        return Ok(EthernetAddress::BROADCAST);
    }

    if let Some(eth_addr) = interface.arp_cache.eth_addr_for_ip(ipv4_addr) {
        return Ok(eth_addr);
    }

    interface.arp_cache.expect_ip(ipv4_addr);

    let arp_request = Arp {
        op: ArpOp::Request,
        source_hw_addr: interface.ethernet_addr,
        source_proto_addr: interface.ipv4_addr,
        target_hw_addr: EthernetAddress::ZERO,
        target_proto_addr: ipv4_addr,
    };

    let config = interface.config;

    for attempt in 0 .. config.arp_retries {
        debug!(
            "Sending ARP request {}/{} for {}.",
            attempt + 1,
            config.arp_retries,
            ipv4_addr
        );
        send_packet(interface, &arp_request, EthernetAddress::BROADCAST)?;

        for _ in 0 .. config.arp_poll_iterations {
            poll(interface);
            if let Some(eth_addr) = interface.arp_cache.eth_addr_for_ip(ipv4_addr) {
                return Ok(eth_addr);
            }
        }
    }

    warn!("No ARP reply from {}.", ipv4_addr);
    Err(Error::Timeout)
}

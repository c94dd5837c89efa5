#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::Once;

use barenet::core::check;
use barenet::core::config::Config;
use barenet::core::link::MockLink;
use barenet::core::repr::{
    eth_types,
    ipv4_protocols,
    Arp,
    EthernetAddress,
    EthernetFrame,
    Ipv4Address,
    Ipv4Packet,
    Ipv4Repr,
};
use barenet::core::service::ethernet::{
    decode_frame,
    encode_header,
};
use barenet::core::service::{
    Datagram,
    Interface,
};

lazy_static! {
    pub static ref LOCAL_ETH: EthernetAddress =
        EthernetAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    pub static ref LOCAL_IPV4: Ipv4Address = Ipv4Address::new([192, 168, 1, 10]);
    pub static ref PEER_ETH: EthernetAddress =
        EthernetAddress::new([0x02, 0x11, 0x22, 0x33, 0x44, 0x55]);
    pub static ref PEER_IPV4: Ipv4Address = Ipv4Address::new([192, 168, 1, 20]);
}

static LOGGER: Once = Once::new();

/// Creates an interface at LOCAL_ETH/LOCAL_IPV4 over an in memory link.
pub fn interface() -> Interface<MockLink> {
    interface_with_config(Config::default())
}

pub fn interface_with_config(config: Config) -> Interface<MockLink> {
    LOGGER.call_once(|| {
        let _ = env_logger::try_init();
    });

    let mut interface = Interface::start_with_config(MockLink::new(), *LOCAL_ETH, *LOCAL_IPV4, config);
    interface.set_udp_callback(record_udp);
    interface.set_tcp_callback(record_tcp);
    take_received();
    interface
}

/// Builds a frame from PEER_ETH as the MAC would leave it in a slot, CRC
/// included.
pub fn frame(dst_addr: EthernetAddress, payload_type: u16, payload: &[u8]) -> Vec<u8> {
    let frame_len = EthernetFrame::<&[u8]>::buffer_len(payload.len());
    let mut buffer = vec![0; frame_len + EthernetFrame::<&[u8]>::CRC_LEN];
    encode_header(&mut buffer[.. frame_len], dst_addr, *PEER_ETH, payload_type).unwrap();
    buffer[EthernetFrame::<&[u8]>::HEADER_LEN .. frame_len].copy_from_slice(payload);
    check::crc32_append(&mut buffer, 8, frame_len - 8).unwrap();
    buffer
}

pub fn arp_frame(dst_addr: EthernetAddress, arp_repr: &Arp) -> Vec<u8> {
    let mut payload = [0; Arp::PADDED_LEN];
    arp_repr.serialize(&mut payload).unwrap();
    frame(dst_addr, eth_types::ARP, &payload)
}

/// Builds an IPv4 packet from PEER_IPV4 with an unchecked header checksum.
pub fn ipv4_packet(dst_addr: Ipv4Address, protocol: u8, payload: &[u8]) -> Vec<u8> {
    let ipv4_repr = Ipv4Repr {
        src_addr: *PEER_IPV4,
        dst_addr,
        protocol,
        payload_len: payload.len() as u16,
    };

    let mut buffer = vec![0; ipv4_repr.buffer_len()];
    let mut ipv4_packet = Ipv4Packet::try_new(&mut buffer[..]).unwrap();
    ipv4_repr.serialize(&mut ipv4_packet);
    ipv4_packet.payload_mut().copy_from_slice(payload);
    buffer
}

pub fn udp_frame(dst_addr: Ipv4Address, src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let udp_len = 8 + payload.len();
    let mut udp_buffer = vec![0; udp_len];
    udp_buffer[0 .. 2].copy_from_slice(&src_port.to_be_bytes());
    udp_buffer[2 .. 4].copy_from_slice(&dst_port.to_be_bytes());
    udp_buffer[4 .. 6].copy_from_slice(&(udp_len as u16).to_be_bytes());
    udp_buffer[8 ..].copy_from_slice(payload);

    let ipv4_buffer = ipv4_packet(dst_addr, ipv4_protocols::UDP, &udp_buffer);
    frame(*LOCAL_ETH, eth_types::IPV4, &ipv4_buffer)
}

pub fn tcp_frame(dst_addr: Ipv4Address, src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let mut tcp_buffer = vec![0; 24];
    tcp_buffer[0 .. 2].copy_from_slice(&src_port.to_be_bytes());
    tcp_buffer[2 .. 4].copy_from_slice(&dst_port.to_be_bytes());
    tcp_buffer[4 .. 8].copy_from_slice(&0x1000u32.to_be_bytes());
    tcp_buffer[12] = 0x60;
    tcp_buffer[13] = 0x18;
    // NOP options.
    tcp_buffer[20 .. 24].copy_from_slice(&[1, 1, 1, 1]);
    tcp_buffer.extend_from_slice(payload);

    tcp_segment_frame(dst_addr, &tcp_buffer)
}

/// Builds a frame from the peer carrying tcp_buffer as a TCP segment as is.
pub fn tcp_segment_frame(dst_addr: Ipv4Address, tcp_buffer: &[u8]) -> Vec<u8> {
    let ipv4_buffer = ipv4_packet(dst_addr, ipv4_protocols::TCP, tcp_buffer);
    frame(*LOCAL_ETH, eth_types::IPV4, &ipv4_buffer)
}

/// Validates a transmitted frame and returns it without the CRC.
pub fn decode(frame: &[u8]) -> EthernetFrame<&[u8]> {
    decode_frame(frame).unwrap()
}

/// An owned copy of a datagram handed to a callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Received {
    pub protocol: u8,
    pub src_addr: Ipv4Address,
    pub src_port: u16,
    pub dst_port: u16,
    pub payload: Vec<u8>,
}

thread_local! {
    static RECEIVED: RefCell<Vec<Received>> = RefCell::new(Vec::new());
}

fn record(protocol: u8, datagram: Datagram) {
    RECEIVED.with(|received| {
        received.borrow_mut().push(Received {
            protocol,
            src_addr: datagram.src_addr,
            src_port: datagram.src_port,
            dst_port: datagram.dst_port,
            payload: datagram.payload.to_vec(),
        })
    });
}

pub fn record_udp(datagram: Datagram) {
    record(ipv4_protocols::UDP, datagram);
}

pub fn record_tcp(datagram: Datagram) {
    record(ipv4_protocols::TCP, datagram);
}

/// Removes and returns everything the callbacks saw on this thread.
pub fn take_received() -> Vec<Received> {
    RECEIVED.with(|received| received.replace(Vec::new()))
}

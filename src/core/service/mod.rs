//! Packet processing services for different network layers.
//!
//! The `service` module deals with packet transmission and reception logic at
//! different layers of the network stack.

pub mod arp;
pub mod dispatch;
pub mod ethernet;
pub mod ipv4;
pub mod tcp;
pub mod udp;

use crate::core::arp_cache::ArpCache;
use crate::core::config::Config;
use crate::core::dev::Device;
use crate::core::link::Link;
use crate::core::repr::{
    EthernetAddress,
    Ipv4Address,
};
use crate::Result;

/// A received UDP or TCP payload as handed to a callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Datagram<'a> {
    pub src_addr: Ipv4Address,
    pub src_port: u16,
    pub dst_port: u16,
    pub payload: &'a [u8],
}

/// Called for every UDP datagram addressed to the interface.
pub type UdpCallback = fn(Datagram);

/// Called for every TCP segment addressed to the interface.
pub type TcpCallback = fn(Datagram);

/// Receive callbacks of an interface, at most one per protocol.
#[derive(Clone, Copy, Default)]
pub struct Callbacks {
    pub udp: Option<UdpCallback>,
    pub tcp: Option<TcpCallback>,
}

/// An interface for sending and receiving network packets.
pub struct Interface<L: Link> {
    /// Device for sending and receiving raw Ethernet frames.
    pub dev: Device<L>,
    /// Cache for the IPv4/Ethernet address translation.
    pub arp_cache: ArpCache,
    /// Ethernet address for the interface.
    pub ethernet_addr: EthernetAddress,
    /// IPv4 address for the interface.
    pub ipv4_addr: Ipv4Address,
    /// Receivers for UDP and TCP payloads.
    pub callbacks: Callbacks,
    pub config: Config,
}

impl<L: Link> Interface<L> {
    /// Creates an interface over a link with the default configuration.
    pub fn start(link: L, ethernet_addr: EthernetAddress, ipv4_addr: Ipv4Address) -> Interface<L> {
        Self::start_with_config(link, ethernet_addr, ipv4_addr, Config::default())
    }

    /// Creates an interface over a link and hands the receive slots to it.
    pub fn start_with_config(
        link: L,
        ethernet_addr: EthernetAddress,
        ipv4_addr: Ipv4Address,
        config: Config,
    ) -> Interface<L> {
        let mut dev = Device::new(link);
        dev.reset();

        debug!("Starting interface {}/{}.", ipv4_addr, ethernet_addr);

        Interface {
            dev,
            arp_cache: ArpCache::new(),
            ethernet_addr,
            ipv4_addr,
            callbacks: Callbacks::default(),
            config,
        }
    }

    /// Processes any frames waiting in the receive slots.
    pub fn service(&mut self) {
        dispatch::service(self)
    }

    pub fn ethernet_addr(&self) -> EthernetAddress {
        self.ethernet_addr
    }

    pub fn ipv4_addr(&self) -> Ipv4Address {
        self.ipv4_addr
    }

    pub fn set_ipv4_addr(&mut self, ipv4_addr: Ipv4Address) {
        self.ipv4_addr = ipv4_addr;
    }

    /// Resolves the Ethernet address of a host, blocking until a reply arrives
    /// or the retries run out. See `arp::resolve(...)`.
    pub fn arp_resolve(&mut self, ipv4_addr: Ipv4Address) -> Result<EthernetAddress> {
        arp::resolve(self, ipv4_addr)
    }

    /// Returns the region of the transmit buffer the next UDP payload goes in.
    pub fn udp_payload_mut(&mut self) -> &mut [u8] {
        udp::payload_mut(self)
    }

    /// Sends payload_len bytes of udp_payload_mut() to the last resolved host.
    pub fn send_udp(&mut self, src_port: u16, dst_port: u16, payload_len: usize) -> Result<()> {
        udp::send_packet(self, src_port, dst_port, payload_len)
    }

    /// Registers the UDP callback, replacing any previous one.
    pub fn set_udp_callback(&mut self, callback: UdpCallback) {
        self.callbacks.udp = Some(callback);
    }

    /// Registers the TCP callback, replacing any previous one.
    pub fn set_tcp_callback(&mut self, callback: TcpCallback) {
        self.callbacks.tcp = Some(callback);
    }
}

use crate::core::repr::{
    EthernetAddress,
    Ipv4Address,
};

/// A single entry IPv4 -> Ethernet address cache.
///
/// The entry always names an IPv4 address; an all zero Ethernet address marks
/// it as unresolved. This means a host which really uses the all zero MAC can
/// never be resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArpCache {
    ipv4_addr: Ipv4Address,
    eth_addr: EthernetAddress,
}

impl ArpCache {
    /// Creates an unresolved cache for 0.0.0.0.
    pub fn new() -> ArpCache {
        ArpCache {
            ipv4_addr: Ipv4Address::UNSPECIFIED,
            eth_addr: EthernetAddress::ZERO,
        }
    }

    /// The IPv4 address of the entry, resolved or not.
    pub fn ipv4_addr(&self) -> Ipv4Address {
        self.ipv4_addr
    }

    /// The Ethernet address of the entry if it's resolved.
    pub fn eth_addr(&self) -> Option<EthernetAddress> {
        if self.eth_addr.is_zero() {
            None
        } else {
            Some(self.eth_addr)
        }
    }

    /// Lookup the ethernet address for an IPv4 address.
    pub fn eth_addr_for_ip(&self, ipv4_addr: Ipv4Address) -> Option<EthernetAddress> {
        if self.ipv4_addr == ipv4_addr {
            self.eth_addr()
        } else {
            None
        }
    }

    /// Replaces the entry with an unresolved one for an IPv4 address.
    pub fn expect_ip(&mut self, ipv4_addr: Ipv4Address) {
        self.set_eth_addr_for_ip(ipv4_addr, EthernetAddress::ZERO);
    }

    /// Replaces the entry.
    pub fn set_eth_addr_for_ip(&mut self, ipv4_addr: Ipv4Address, eth_addr: EthernetAddress) {
        self.ipv4_addr = ipv4_addr;
        self.eth_addr = eth_addr;
    }

    /// Records the Ethernet address from an ARP reply, but only if the reply
    /// is for the IPv4 address of the entry.
    ///
    /// Returns true if the entry was updated.
    pub fn update_eth_addr(&mut self, ipv4_addr: Ipv4Address, eth_addr: EthernetAddress) -> bool {
        if self.ipv4_addr != ipv4_addr {
            return false;
        }

        self.eth_addr = eth_addr;
        true
    }
}

impl Default for ArpCache {
    fn default() -> ArpCache {
        ArpCache::new()
    }
}

use std::fmt;
use std::str::FromStr;

use byteorder::{
    ByteOrder,
    NetworkEndian,
};

use crate::core::check::internet_checksum;
use crate::{
    Error,
    Result,
};

/// [IPv4 address](https://en.wikipedia.org/wiki/IPv4) in network byte order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Address([u8; 4]);

impl Address {
    pub const BROADCAST: Address = Address([0xFF; 4]);

    pub const UNSPECIFIED: Address = Address([0x00; 4]);

    /// Creates an IPv4 address from a network byte order buffer.
    pub fn new(addr: [u8; 4]) -> Address {
        Address(addr)
    }

    /// Tries to create an IPv4 address from a network byte order slice.
    pub fn try_new(addr: &[u8]) -> Result<Address> {
        if addr.len() != 4 {
            return Err(Error::Exhausted);
        }

        let mut _addr: [u8; 4] = [0; 4];
        _addr.clone_from_slice(addr);
        Ok(Address(_addr))
    }

    /// Returns a reference to the network byte order representation of the address.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Checks if this is the limited broadcast address 255.255.255.255.
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }
}

impl From<u32> for Address {
    fn from(addr: u32) -> Address {
        let mut bytes = [0; 4];
        NetworkEndian::write_u32(&mut bytes, addr);
        Address(bytes)
    }
}

impl From<Address> for u32 {
    fn from(addr: Address) -> u32 {
        NetworkEndian::read_u32(&addr.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

impl FromStr for Address {
    type Err = ();

    /// Parses an Ipv4 address from an A.B.C.D style string.
    fn from_str(addr: &str) -> std::result::Result<Address, Self::Err> {
        let mut ipv4: [u8; 4] = [0; 4];
        let mut tokens = addr.split('.');

        for byte in ipv4.iter_mut() {
            let token = tokens.next().ok_or(())?;
            *byte = token.parse::<u8>().map_err(|_| ())?;
        }

        if tokens.next().is_some() {
            return Err(());
        }

        Ok(Address::new(ipv4))
    }
}

/// [https://en.wikipedia.org/wiki/List_of_IP_protocol_numbers](https://en.wikipedia.org/wiki/List_of_IP_protocol_numbers)
pub mod protocols {
    pub const TCP: u8 = 0x06;

    pub const UDP: u8 = 0x11;
}

/// Values for the header fields this stack writes and accepts.
pub mod consts {
    /// Version 4 with a 5 word header, i.e. no options.
    pub const VERSION_IHL: u8 = 0x45;

    pub const DONT_FRAGMENT: u16 = 0x4000;

    pub const TTL: u8 = 64;
}

/// [https://en.wikipedia.org/wiki/IPv4#Header](https://en.wikipedia.org/wiki/IPv4#Header)
mod fields {
    use std::ops::Range;

    pub const VERSION_IHL: usize = 0;

    pub const DSCP_ECN: usize = 1;

    pub const PACKET_LEN: Range<usize> = 2 .. 4;

    pub const IDENTIFICATION: Range<usize> = 4 .. 6;

    pub const FLAGS_FRAGMENT_OFFSET: Range<usize> = 6 .. 8;

    pub const TTL: usize = 8;

    pub const PROTOCOL: usize = 9;

    pub const CHECKSUM: Range<usize> = 10 .. 12;

    pub const SRC_ADDR: Range<usize> = 12 .. 16;

    pub const DST_ADDR: Range<usize> = 16 .. 20;
}

/// View of a byte buffer as an IPv4 packet without options.
#[derive(Debug)]
pub struct Packet<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> AsRef<[u8]> for Packet<T> {
    fn as_ref(&self) -> &[u8] {
        self.buffer.as_ref()
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> AsMut<[u8]> for Packet<T> {
    fn as_mut(&mut self) -> &mut [u8] {
        self.buffer.as_mut()
    }
}

impl<T: AsRef<[u8]>> Packet<T> {
    pub const HEADER_LEN: usize = 20;

    /// Tries to create an IPv4 packet view over a byte buffer.
    ///
    /// NOTE: Use check_encoding() before operating on the packet if constructing
    /// a packet via a buffer originating from an untrusted source like a link.
    pub fn try_new(buffer: T) -> Result<Packet<T>> {
        if buffer.as_ref().len() < Self::HEADER_LEN {
            Err(Error::Exhausted)
        } else {
            Ok(Packet { buffer })
        }
    }

    /// Returns the length of a IPv4 packet with no options and the payload size.
    pub fn buffer_len(payload_len: usize) -> usize {
        Self::HEADER_LEN + payload_len
    }

    /// Checks if the packet has a valid encoding.
    ///
    /// The header checksum is deliberately not verified, the Ethernet CRC is
    /// the only integrity check on receive.
    pub fn check_encoding(&self) -> Result<()> {
        let packet_len = self.packet_len() as usize;

        if packet_len > self.buffer.as_ref().len() || packet_len < Self::HEADER_LEN {
            Err(Error::Malformed)
        } else if self.version_ihl() != consts::VERSION_IHL {
            Err(Error::Malformed)
        } else {
            Ok(())
        }
    }

    /// Calculates the header checksum.
    pub fn gen_header_checksum(&self) -> u16 {
        internet_checksum(0, &self.buffer.as_ref()[.. Self::HEADER_LEN], true)
    }

    pub fn version_ihl(&self) -> u8 {
        self.buffer.as_ref()[fields::VERSION_IHL]
    }

    pub fn dscp_ecn(&self) -> u8 {
        self.buffer.as_ref()[fields::DSCP_ECN]
    }

    pub fn packet_len(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::PACKET_LEN])
    }

    pub fn identification(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::IDENTIFICATION])
    }

    pub fn flags_fragment_offset(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::FLAGS_FRAGMENT_OFFSET])
    }

    pub fn ttl(&self) -> u8 {
        self.buffer.as_ref()[fields::TTL]
    }

    pub fn protocol(&self) -> u8 {
        self.buffer.as_ref()[fields::PROTOCOL]
    }

    pub fn header_checksum(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::CHECKSUM])
    }

    pub fn src_addr(&self) -> Address {
        let mut addr = [0; 4];
        addr.copy_from_slice(&self.buffer.as_ref()[fields::SRC_ADDR]);
        Address::new(addr)
    }

    pub fn dst_addr(&self) -> Address {
        let mut addr = [0; 4];
        addr.copy_from_slice(&self.buffer.as_ref()[fields::DST_ADDR]);
        Address::new(addr)
    }

    /// Returns the payload as delimited by the packet length field.
    pub fn payload(&self) -> &[u8] {
        let packet_len = (self.packet_len() as usize)
            .min(self.buffer.as_ref().len())
            .max(Self::HEADER_LEN);
        &self.buffer.as_ref()[Self::HEADER_LEN .. packet_len]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    pub fn set_version_ihl(&mut self, version_ihl: u8) {
        self.buffer.as_mut()[fields::VERSION_IHL] = version_ihl;
    }

    pub fn set_dscp_ecn(&mut self, dscp_ecn: u8) {
        self.buffer.as_mut()[fields::DSCP_ECN] = dscp_ecn;
    }

    pub fn set_packet_len(&mut self, packet_len: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[fields::PACKET_LEN], packet_len);
    }

    pub fn set_identification(&mut self, identification: u16) {
        NetworkEndian::write_u16(
            &mut self.buffer.as_mut()[fields::IDENTIFICATION],
            identification,
        );
    }

    pub fn set_flags_fragment_offset(&mut self, flags_fragment_offset: u16) {
        NetworkEndian::write_u16(
            &mut self.buffer.as_mut()[fields::FLAGS_FRAGMENT_OFFSET],
            flags_fragment_offset,
        );
    }

    pub fn set_ttl(&mut self, ttl: u8) {
        self.buffer.as_mut()[fields::TTL] = ttl;
    }

    pub fn set_protocol(&mut self, protocol: u8) {
        self.buffer.as_mut()[fields::PROTOCOL] = protocol;
    }

    pub fn set_header_checksum(&mut self, checksum: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[fields::CHECKSUM], checksum);
    }

    pub fn set_src_addr(&mut self, addr: Address) {
        self.buffer.as_mut()[fields::SRC_ADDR].copy_from_slice(addr.as_bytes());
    }

    pub fn set_dst_addr(&mut self, addr: Address) {
        self.buffer.as_mut()[fields::DST_ADDR].copy_from_slice(addr.as_bytes());
    }

    /// Recomputes the header checksum with the checksum field zeroed.
    pub fn fill_checksum(&mut self) {
        self.set_header_checksum(0);
        let checksum = self.gen_header_checksum();
        self.set_header_checksum(checksum);
    }

    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.buffer.as_mut()[Self::HEADER_LEN ..]
    }
}

/// An IPv4 header as written and read by this stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Repr {
    pub src_addr: Address,
    pub dst_addr: Address,
    pub protocol: u8,
    pub payload_len: u16,
}

impl Repr {
    /// Returns the length of the IPv4 packet this header describes.
    pub fn buffer_len(&self) -> usize {
        Packet::<&[u8]>::buffer_len(self.payload_len as usize)
    }

    /// Deserializes a packet which passed check_encoding() into a header.
    pub fn deserialize<T>(packet: &Packet<T>) -> Repr
    where
        T: AsRef<[u8]>,
    {
        Repr {
            src_addr: packet.src_addr(),
            dst_addr: packet.dst_addr(),
            protocol: packet.protocol(),
            payload_len: packet
                .packet_len()
                .saturating_sub(Packet::<&[u8]>::HEADER_LEN as u16),
        }
    }

    /// Serializes the header into a packet and fills in the checksum.
    ///
    /// The header is always 20 bytes with identification 0, the don't fragment
    /// flag set and a TTL of 64.
    pub fn serialize<T>(&self, packet: &mut Packet<T>)
    where
        T: AsRef<[u8]> + AsMut<[u8]>,
    {
        packet.set_version_ihl(consts::VERSION_IHL);
        packet.set_dscp_ecn(0);
        packet.set_packet_len(self.buffer_len() as u16);
        packet.set_identification(0);
        packet.set_flags_fragment_offset(consts::DONT_FRAGMENT);
        packet.set_ttl(consts::TTL);
        packet.set_protocol(self.protocol);
        packet.set_src_addr(self.src_addr);
        packet.set_dst_addr(self.dst_addr);
        packet.fill_checksum();
    }
}

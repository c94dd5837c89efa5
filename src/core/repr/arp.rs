use byteorder::{
    ByteOrder,
    NetworkEndian,
};

use crate::core::repr::{
    EthernetAddress,
    Ipv4Address,
};
use crate::{
    Error,
    Result,
};

#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
// https://www.iana.org/assignments/arp-parameters/arp-parameters.xhtml#arp-parameters-1
pub enum Op {
    Request = 0x0001,
    Reply = 0x0002,
}

/// https://www.iana.org/assignments/arp-parameters/arp-parameters.xhtml#arp-parameters-2
pub mod hw_types {
    pub const ETHERNET: u16 = 0x0001;
}

/// https://www.iana.org/assignments/arp-parameters/arp-parameters.xhtml#arp-parameters-3
pub mod proto_types {
    pub const IPV4: u16 = 0x0800;
}

mod fields {
    use std::ops::Range;

    pub const HW_TYPE: Range<usize> = 0 .. 2;

    pub const PROTO_TYPE: Range<usize> = 2 .. 4;

    pub const HW_LEN: usize = 4;

    pub const PROTO_LEN: usize = 5;

    pub const OP: Range<usize> = 6 .. 8;

    pub const SOURCE_HW_ADDR: Range<usize> = 8 .. 14;

    pub const SOURCE_PROTO_ADDR: Range<usize> = 14 .. 18;

    pub const TARGET_HW_ADDR: Range<usize> = 18 .. 24;

    pub const TARGET_PROTO_ADDR: Range<usize> = 24 .. 28;
}

/// An Ethernet/IPv4 ARP packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arp {
    pub op: Op,
    pub source_hw_addr: EthernetAddress,
    pub source_proto_addr: Ipv4Address,
    pub target_hw_addr: EthernetAddress,
    pub target_proto_addr: Ipv4Address,
}

impl Arp {
    /// Size of an Ethernet/IPv4 ARP packet.
    pub const PACKET_LEN: usize = 28;

    /// Size of an ARP packet padded to the minimum Ethernet payload.
    pub const PADDED_LEN: usize = 46;

    /// Returns the size of the ARP packet when serialized to a buffer.
    pub fn buffer_len(&self) -> usize {
        Self::PACKET_LEN
    }

    /// Attempts to deserialize a buffer into an ARP packet.
    ///
    /// Only Ethernet/IPv4 requests and replies are accepted.
    pub fn deserialize(buffer: &[u8]) -> Result<Arp> {
        if buffer.len() < Self::PACKET_LEN {
            return Err(Error::Exhausted);
        }

        let hw_type = NetworkEndian::read_u16(&buffer[fields::HW_TYPE]);
        let proto_type = NetworkEndian::read_u16(&buffer[fields::PROTO_TYPE]);

        if hw_type != hw_types::ETHERNET
            || proto_type != proto_types::IPV4
            || buffer[fields::HW_LEN] != 6
            || buffer[fields::PROTO_LEN] != 4
        {
            return Err(Error::Malformed);
        }

        let op = match NetworkEndian::read_u16(&buffer[fields::OP]) {
            1 => Op::Request,
            2 => Op::Reply,
            _ => return Err(Error::Malformed),
        };

        Ok(Arp {
            op,
            source_hw_addr: EthernetAddress::try_new(&buffer[fields::SOURCE_HW_ADDR])?,
            source_proto_addr: Ipv4Address::try_new(&buffer[fields::SOURCE_PROTO_ADDR])?,
            target_hw_addr: EthernetAddress::try_new(&buffer[fields::TARGET_HW_ADDR])?,
            target_proto_addr: Ipv4Address::try_new(&buffer[fields::TARGET_PROTO_ADDR])?,
        })
    }

    /// Serializes the ARP packet into a buffer.
    ///
    /// You should ensure buffer has at least buffer_len() bytes to avoid errors.
    pub fn serialize(&self, buffer: &mut [u8]) -> Result<()> {
        if self.buffer_len() > buffer.len() {
            return Err(Error::Exhausted);
        }

        NetworkEndian::write_u16(&mut buffer[fields::HW_TYPE], hw_types::ETHERNET);
        NetworkEndian::write_u16(&mut buffer[fields::PROTO_TYPE], proto_types::IPV4);
        buffer[fields::HW_LEN] = 6;
        buffer[fields::PROTO_LEN] = 4;
        NetworkEndian::write_u16(&mut buffer[fields::OP], self.op as u16);
        buffer[fields::SOURCE_HW_ADDR].copy_from_slice(self.source_hw_addr.as_bytes());
        buffer[fields::SOURCE_PROTO_ADDR].copy_from_slice(self.source_proto_addr.as_bytes());
        buffer[fields::TARGET_HW_ADDR].copy_from_slice(self.target_hw_addr.as_bytes());
        buffer[fields::TARGET_PROTO_ADDR].copy_from_slice(self.target_proto_addr.as_bytes());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: [u8; 28] = [
        0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01, 0x02, 0x11, 0x22, 0x33, 0x44, 0x55, 0x0A,
        0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x02,
    ];

    fn request() -> Arp {
        Arp {
            op: Op::Request,
            source_hw_addr: EthernetAddress::new([0x02, 0x11, 0x22, 0x33, 0x44, 0x55]),
            source_proto_addr: Ipv4Address::new([10, 0, 0, 1]),
            target_hw_addr: EthernetAddress::ZERO,
            target_proto_addr: Ipv4Address::new([10, 0, 0, 2]),
        }
    }

    #[test]
    fn test_deserialize() {
        assert_eq!(request(), Arp::deserialize(&REQUEST).unwrap());
    }

    #[test]
    fn test_serialize() {
        let mut buffer = [0xFF; 28];
        request().serialize(&mut buffer).unwrap();
        assert_eq!(&buffer[..], &REQUEST[..]);
    }

    #[test]
    fn test_serialize_with_buffer_too_small() {
        let mut buffer = [0; 27];
        assert_matches!(request().serialize(&mut buffer), Err(Error::Exhausted));
    }

    #[test]
    fn test_deserialize_with_buffer_too_small() {
        assert_matches!(Arp::deserialize(&REQUEST[.. 27]), Err(Error::Exhausted));
    }

    #[test]
    fn test_deserialize_with_unsupported_fields() {
        // (byte, value) pairs which break the Ethernet/IPv4 encoding.
        for &(i, value) in [(1, 0x06), (2, 0x86), (4, 0x08), (5, 0x10), (7, 0x03)].iter() {
            let mut buffer = REQUEST;
            buffer[i] = value;
            assert_matches!(Arp::deserialize(&buffer), Err(Error::Malformed));
        }
    }
}

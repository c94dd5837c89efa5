use std::fmt::{
    Display,
    Formatter,
    Result as FmtResult,
};
use std::result::Result as StdResult;
use std::str::FromStr;

use byteorder::{
    ByteOrder,
    NetworkEndian,
};

use crate::{
    Error,
    Result,
};

/// [MAC address](https://en.wikipedia.org/wiki/MAC_address) in network byte order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Address([u8; 6]);

impl Address {
    pub const BROADCAST: Address = Address([0xFF; 6]);

    /// The all zero address, also used to mark unresolved ARP entries.
    pub const ZERO: Address = Address([0x00; 6]);

    /// Creates a MAC address from a network byte order buffer.
    pub fn new(addr: [u8; 6]) -> Address {
        Address(addr)
    }

    /// Tries to creates a MAC address from a network byte order slice.
    pub fn try_new(addr: &[u8]) -> Result<Address> {
        if addr.len() != 6 {
            return Err(Error::Exhausted);
        }

        let mut _addr: [u8; 6] = [0; 6];
        _addr.clone_from_slice(addr);
        Ok(Address(_addr))
    }

    /// Returns a reference to the network byte order representation of the
    /// address.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Checks if this is a broadcast address.
    pub fn is_broadcast(&self) -> bool {
        self.0 == [0xFF; 6]
    }

    /// Checks if every byte of the address is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0x00; 6]
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5],
        )
    }
}

impl FromStr for Address {
    type Err = ();

    /// Parses a MAC address from an A:B:C:D:E:F style string.
    fn from_str(addr: &str) -> StdResult<Address, Self::Err> {
        let mut mac: [u8; 6] = [0; 6];
        let mut tokens = addr.split(':');

        for byte in mac.iter_mut() {
            let token = tokens.next().ok_or(())?;
            *byte = u8::from_str_radix(token, 16).map_err(|_| ())?;
        }

        if tokens.next().is_some() {
            return Err(());
        }

        Ok(Address::new(mac))
    }
}

/// [https://en.wikipedia.org/wiki/EtherType](https://en.wikipedia.org/wiki/EtherType)
pub mod eth_types {
    pub const IPV4: u16 = 0x800;

    pub const ARP: u16 = 0x806;
}

/// Start of frame sequence the MAC expects in front of every frame.
pub const PREAMBLE: [u8; 8] = [0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0xD5];

mod fields {
    use std::ops::{
        Range,
        RangeFrom,
    };

    pub const PREAMBLE: Range<usize> = 0 .. 8;

    pub const DST_ADDR: Range<usize> = 8 .. 14;

    pub const SRC_ADDR: Range<usize> = 14 .. 20;

    pub const PAYLOAD_TYPE: Range<usize> = 20 .. 22;

    pub const PAYLOAD: RangeFrom<usize> = 22 ..;
}

/// View of a byte buffer as an Ethernet frame, preamble included and CRC
/// trailer excluded.
#[derive(Debug)]
pub struct Frame<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> AsRef<[u8]> for Frame<T> {
    fn as_ref(&self) -> &[u8] {
        self.buffer.as_ref()
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> AsMut<[u8]> for Frame<T> {
    fn as_mut(&mut self) -> &mut [u8] {
        self.buffer.as_mut()
    }
}

impl<T: AsRef<[u8]>> Frame<T> {
    pub const PREAMBLE_LEN: usize = 8;

    pub const HEADER_LEN: usize = 22;

    pub const CRC_LEN: usize = 4;

    /// Tries to create an Ethernet frame view over a byte buffer.
    pub fn try_new(buffer: T) -> Result<Frame<T>> {
        if buffer.as_ref().len() < Self::HEADER_LEN {
            Err(Error::Exhausted)
        } else {
            Ok(Frame { buffer })
        }
    }

    /// Returns the length of an Ethernet frame with the specified payload size,
    /// not counting the CRC.
    pub fn buffer_len(payload_len: usize) -> usize {
        Self::HEADER_LEN + payload_len
    }

    pub fn dst_addr(&self) -> Address {
        let mut addr = [0; 6];
        addr.copy_from_slice(&self.buffer.as_ref()[fields::DST_ADDR]);
        Address::new(addr)
    }

    pub fn src_addr(&self) -> Address {
        let mut addr = [0; 6];
        addr.copy_from_slice(&self.buffer.as_ref()[fields::SRC_ADDR]);
        Address::new(addr)
    }

    pub fn payload_type(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::PAYLOAD_TYPE])
    }

    pub fn payload(&self) -> &[u8] {
        &self.buffer.as_ref()[fields::PAYLOAD]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Frame<T> {
    pub fn set_preamble(&mut self) {
        self.buffer.as_mut()[fields::PREAMBLE].copy_from_slice(&PREAMBLE);
    }

    pub fn set_dst_addr(&mut self, addr: Address) {
        self.buffer.as_mut()[fields::DST_ADDR].copy_from_slice(addr.as_bytes());
    }

    pub fn set_src_addr(&mut self, addr: Address) {
        self.buffer.as_mut()[fields::SRC_ADDR].copy_from_slice(addr.as_bytes());
    }

    pub fn set_payload_type(&mut self, payload_type: u16) {
        NetworkEndian::write_u16(
            &mut self.buffer.as_mut()[fields::PAYLOAD_TYPE],
            payload_type,
        );
    }

    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.buffer.as_mut()[fields::PAYLOAD]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_broadcast() {
        let addr = Address::new([0xFF; 6]);
        assert!(addr.is_broadcast());
        assert!(!addr.is_zero());
    }

    #[test]
    fn test_is_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::new([0, 0, 0, 0, 0, 1]).is_zero());
    }

    #[test]
    fn test_parse_address() {
        let addr: Address = "AA:BB:CC:DD:EE:FF".parse().unwrap();
        assert_eq!(Address::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]), addr);
        assert_eq!("AA:BB:CC:DD:EE:FF", addr.to_string());
    }

    #[test]
    fn test_parse_invalid_address() {
        assert!("AA:BB:CC:DD:EE".parse::<Address>().is_err());
        assert!("AA:BB:CC:DD:EE:FF:00".parse::<Address>().is_err());
        assert!("AA:BB:CC:DD:EE:GG".parse::<Address>().is_err());
    }

    #[test]
    fn test_frame_with_buffer_less_than_header() {
        let buffer: [u8; 21] = [0; 21];
        assert_matches!(Frame::try_new(&buffer[..]), Err(Error::Exhausted));
    }

    #[test]
    fn test_frame_getters() {
        let buffer: [u8; 24] = [
            0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0xD5, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06,
            0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x08, 0x06, 0xAB, 0xCD,
        ];

        let frame = Frame::try_new(&buffer[..]).unwrap();
        assert_eq!(&frame.as_ref()[.. 8], &PREAMBLE[..]);
        assert_eq!(Address::new([1, 2, 3, 4, 5, 6]), frame.dst_addr());
        assert_eq!(Address::new([10, 11, 12, 13, 14, 15]), frame.src_addr());
        assert_eq!(eth_types::ARP, frame.payload_type());
        assert_eq!(frame.payload(), &[0xAB, 0xCD][..]);
    }

    #[test]
    fn test_frame_setters() {
        let mut buffer: [u8; 24] = [0; 24];

        {
            let mut frame = Frame::try_new(&mut buffer[..]).unwrap();
            frame.set_preamble();
            frame.set_dst_addr(Address::new([1, 2, 3, 4, 5, 6]));
            frame.set_src_addr(Address::new([10, 11, 12, 13, 14, 15]));
            frame.set_payload_type(eth_types::IPV4);
            frame.payload_mut()[1] = 0xEE;
        }

        assert_eq!(
            &buffer[..],
            &[
                0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0xD5, 0x01, 0x02, 0x03, 0x04, 0x05,
                0x06, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x08, 0x00, 0x00, 0xEE,
            ][..]
        );
    }
}

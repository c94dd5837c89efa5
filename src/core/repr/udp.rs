use byteorder::{
    ByteOrder,
    NetworkEndian,
};

use crate::core::check::internet_checksum;
use crate::core::repr::{
    ipv4_protocols,
    Ipv4Address,
};
use crate::{
    Error,
    Result,
};

/// Safe representation of a UDP header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Repr {
    pub src_port: u16,
    pub dst_port: u16,
    /// Length of the header and payload.
    pub length: u16,
}

impl Repr {
    /// Returns the UDP packet size needed to serialize this UDP header and
    /// payload.
    pub fn buffer_len(&self) -> usize {
        self.length as usize
    }

    /// Deserializes a packet into a UDP header.
    pub fn deserialize<T>(packet: &Packet<T>) -> Repr
    where
        T: AsRef<[u8]>,
    {
        Repr {
            src_port: packet.src_port(),
            dst_port: packet.dst_port(),
            length: packet.length(),
        }
    }

    /// Serializes the UDP header into a packet and fills in the checksum.
    ///
    /// The payload must be written before calling this, the checksum covers it.
    pub fn serialize<T>(&self, packet: &mut Packet<T>, src_addr: Ipv4Address, dst_addr: Ipv4Address)
    where
        T: AsRef<[u8]> + AsMut<[u8]>,
    {
        packet.set_src_port(self.src_port);
        packet.set_dst_port(self.dst_port);
        packet.set_length(self.length);
        packet.set_checksum(0);

        let checksum = packet.gen_packet_checksum(src_addr, dst_addr);
        packet.set_checksum(checksum);
    }
}

/// [https://en.wikipedia.org/wiki/User_Datagram_Protocol](https://en.wikipedia.org/wiki/User_Datagram_Protocol)
mod fields {
    use std::ops::Range;

    pub const SRC_PORT: Range<usize> = 0 .. 2;

    pub const DST_PORT: Range<usize> = 2 .. 4;

    pub const LENGTH: Range<usize> = 4 .. 6;

    pub const CHECKSUM: Range<usize> = 6 .. 8;
}

/// View of a byte buffer as a UDP packet.
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
    pub const HEADER_LEN: usize = 8;

    /// Tries to create a UDP packet view over a byte buffer.
    pub fn try_new(buffer: T) -> Result<Packet<T>> {
        if buffer.as_ref().len() < Self::HEADER_LEN {
            Err(Error::Exhausted)
        } else {
            Ok(Packet { buffer })
        }
    }

    /// Returns the length of a UDP packet with the specified payload size.
    pub fn buffer_len(payload_len: usize) -> usize {
        Self::HEADER_LEN + payload_len
    }

    /// Checks if the length field is consistent with the buffer.
    ///
    /// The checksum is not verified on receive.
    pub fn check_encoding(&self) -> Result<()> {
        let length = self.length() as usize;

        if length < Self::HEADER_LEN || length > self.buffer.as_ref().len() {
            Err(Error::Malformed)
        } else {
            Ok(())
        }
    }

    /// Calculates the checksum over the IPv4 pseudo header and the whole
    /// buffer, treating an odd trailing byte as if it were zero padded.
    pub fn gen_packet_checksum(&self, src_addr: Ipv4Address, dst_addr: Ipv4Address) -> u16 {
        let mut ip_pseudo_header = [0; 12];
        ip_pseudo_header[0 .. 4].copy_from_slice(src_addr.as_bytes());
        ip_pseudo_header[4 .. 8].copy_from_slice(dst_addr.as_bytes());
        ip_pseudo_header[9] = ipv4_protocols::UDP;
        NetworkEndian::write_u16(&mut ip_pseudo_header[10 .. 12], self.length());

        let buffer = self.buffer.as_ref();
        let even_len = buffer.len() & !1;

        let mut acc = internet_checksum(0, &ip_pseudo_header, false) as u32;
        acc = internet_checksum(acc, &buffer[.. even_len], false) as u32;
        if even_len < buffer.len() {
            acc = internet_checksum(acc, &[buffer[even_len], 0], false) as u32;
        }

        internet_checksum(acc, &[], true)
    }

    pub fn src_port(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::SRC_PORT])
    }

    pub fn dst_port(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::DST_PORT])
    }

    pub fn length(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::LENGTH])
    }

    pub fn checksum(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::CHECKSUM])
    }

    /// Returns the payload as delimited by the length field.
    pub fn payload(&self) -> &[u8] {
        let buffer = self.buffer.as_ref();
        let length = (self.length() as usize)
            .min(buffer.len())
            .max(Self::HEADER_LEN);
        &buffer[Self::HEADER_LEN .. length]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    pub fn set_src_port(&mut self, port: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[fields::SRC_PORT], port);
    }

    pub fn set_dst_port(&mut self, port: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[fields::DST_PORT], port);
    }

    pub fn set_length(&mut self, length: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[fields::LENGTH], length);
    }

    pub fn set_checksum(&mut self, checksum: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[fields::CHECKSUM], checksum);
    }

    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.buffer.as_mut()[Self::HEADER_LEN ..]
    }
}

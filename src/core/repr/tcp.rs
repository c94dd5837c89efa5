use byteorder::{
    ByteOrder,
    NetworkEndian,
};

use crate::{
    Error,
    Result,
};

/// [https://en.wikipedia.org/wiki/Transmission_Control_Protocol#TCP_segment_structure](https://en.wikipedia.org/wiki/Transmission_Control_Protocol#TCP_segment_structure)
mod fields {
    use std::ops::Range;

    pub const SRC_PORT: Range<usize> = 0 .. 2;

    pub const DST_PORT: Range<usize> = 2 .. 4;

    pub const SEQ_NUM: Range<usize> = 4 .. 8;

    pub const ACK_NUM: Range<usize> = 8 .. 12;

    pub const DATA_OFFSET: usize = 12;
}

/// Read only view of a byte buffer as a TCP segment.
///
/// Only what is needed to locate the payload is exposed, there is no notion of
/// a connection.
#[derive(Debug)]
pub struct Packet<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> AsRef<[u8]> for Packet<T> {
    fn as_ref(&self) -> &[u8] {
        self.buffer.as_ref()
    }
}

impl<T: AsRef<[u8]>> Packet<T> {
    pub const MIN_HEADER_LEN: usize = 20;

    /// Tries to create a TCP packet view over a byte buffer.
    ///
    /// NOTE: Use check_encoding() before calling payload().
    pub fn try_new(buffer: T) -> Result<Packet<T>> {
        if buffer.as_ref().len() < Self::MIN_HEADER_LEN {
            Err(Error::Exhausted)
        } else {
            Ok(Packet { buffer })
        }
    }

    /// Checks that the header, options included, fits in the buffer.
    pub fn check_encoding(&self) -> Result<()> {
        if self.header_len() > self.buffer.as_ref().len() {
            Err(Error::Malformed)
        } else {
            Ok(())
        }
    }

    pub fn src_port(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::SRC_PORT])
    }

    pub fn dst_port(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::DST_PORT])
    }

    pub fn seq_num(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[fields::SEQ_NUM])
    }

    pub fn ack_num(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[fields::ACK_NUM])
    }

    /// Header length in 32 bit words, the high nibble of byte 12.
    pub fn data_offset(&self) -> u8 {
        (self.buffer.as_ref()[fields::DATA_OFFSET] >> 4) & 0x0F
    }

    /// Header length in bytes.
    pub fn header_len(&self) -> usize {
        self.data_offset() as usize * 4
    }

    pub fn payload(&self) -> &[u8] {
        &self.buffer.as_ref()[self.header_len() ..]
    }
}

use byteorder::{
    ByteOrder,
    LittleEndian,
    NetworkEndian,
};

/// Accumulates the Internet Checksum from [RFC1071](https://tools.ietf.org/html/rfc1071).
///
/// The 16 bit big endian words of buffer are added to running_sum and the
/// carries folded back in, so a checksum may be built from several calls (e.g.
/// a pseudo header followed by a packet). A trailing odd byte is not summed;
/// callers pad their buffers to an even length.
///
/// With finalize set the ones complement of the sum is returned, where a result
/// of 0 is reported as 0xFFFF since 0 means "no checksum" in UDP.
pub fn internet_checksum(running_sum: u32, buffer: &[u8], finalize: bool) -> u16 {
    let mut acc = running_sum;

    for word in buffer.chunks(2).filter(|word| word.len() == 2) {
        acc = acc.wrapping_add(NetworkEndian::read_u16(word) as u32);
    }

    while acc >> 16 != 0 {
        acc = (acc & 0xFFFF) + (acc >> 16);
    }

    if !finalize {
        return acc as u16;
    }

    match !acc as u16 {
        0 => 0xFFFF,
        checksum => checksum,
    }
}

const CRC32_POLYNOMIAL: u32 = 0xEDB8_8320;

/// Calculates the IEEE 802.3 CRC-32 of a buffer.
pub fn crc32(buffer: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFF as u32;

    for byte in buffer {
        crc ^= *byte as u32;
        for _ in 0 .. 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ CRC32_POLYNOMIAL
            } else {
                crc >> 1
            };
        }
    }

    !crc
}

/// Writes the CRC-32 of buffer[offset .. offset + len] right after the range
/// in transmit order (least significant byte first).
///
/// Returns the offset just past the CRC, or None if there is no room for it.
pub fn crc32_append(buffer: &mut [u8], offset: usize, len: usize) -> Option<usize> {
    let end = offset + len;
    if end + 4 > buffer.len() {
        return None;
    }

    let crc = crc32(&buffer[offset .. end]);
    LittleEndian::write_u32(&mut buffer[end .. end + 4], crc);
    Some(end + 4)
}

/// Checks the CRC-32 of buffer[offset .. offset + len] against the 4 bytes
/// following the range.
pub fn crc32_verify(buffer: &[u8], offset: usize, len: usize) -> bool {
    let end = offset + len;
    if end + 4 > buffer.len() {
        return false;
    }

    LittleEndian::read_u32(&buffer[end .. end + 4]) == crc32(&buffer[offset .. end])
}

use crate::core::repr::{
    Ipv4Repr,
    TcpPacket,
};
use crate::core::service::{
    Callbacks,
    Datagram,
};
use crate::{
    Error,
    Result,
};

/// Shortest segment accepted: the fixed header plus one word of options.
pub const MIN_SEGMENT_LEN: usize = 24;

/// Receives a TCP segment and hands everything after the header to the TCP
/// callback.
///
/// There are no connections, sequence numbers and flags are not looked at.
/// Segments shorter than `MIN_SEGMENT_LEN` are dropped even when their data
/// offset says the header is 20 bytes.
pub fn recv_packet(callbacks: &Callbacks, ipv4_repr: &Ipv4Repr, tcp_buffer: &[u8]) -> Result<()> {
    if tcp_buffer.len() < MIN_SEGMENT_LEN {
        return Err(Error::Exhausted);
    }

    let tcp_packet = TcpPacket::try_new(tcp_buffer)?;
    tcp_packet.check_encoding()?;

    match callbacks.tcp {
        Some(callback) => callback(Datagram {
            src_addr: ipv4_repr.src_addr,
            src_port: tcp_packet.src_port(),
            dst_port: tcp_packet.dst_port(),
            payload: tcp_packet.payload(),
        }),
        None => debug!(
            "Dropping TCP segment for port {}, no callback.",
            tcp_packet.dst_port()
        ),
    }

    Ok(())
}

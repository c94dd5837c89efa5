extern crate barenet;
extern crate env_logger;
#[macro_use]
extern crate lazy_static;
extern crate rand;

mod context;

use barenet::core::repr::{
    ipv4_protocols,
    Ipv4Address,
};

use context::{
    LOCAL_IPV4,
    PEER_IPV4,
};

#[test]
fn tcp_recv_segment() {
    let mut interface = context::interface();
    let payload: Vec<u8> = (0 .. 200).map(|_| rand::random::<u8>()).collect();
    let frame = context::tcp_frame(*LOCAL_IPV4, 80, 49152, &payload);
    interface.dev.link_mut().load(&frame).unwrap();

    interface.service();

    let received = context::take_received();
    assert_eq!(1, received.len());
    assert_eq!(ipv4_protocols::TCP, received[0].protocol);
    assert_eq!(*PEER_IPV4, received[0].src_addr);
    assert_eq!(80, received[0].src_port);
    assert_eq!(49152, received[0].dst_port);
    assert_eq!(payload, received[0].payload);
    assert!(interface.dev.link().sent().is_empty());
}

#[test]
fn tcp_recv_without_payload() {
    let mut interface = context::interface();
    let frame = context::tcp_frame(*LOCAL_IPV4, 80, 49152, &[]);
    interface.dev.link_mut().load(&frame).unwrap();

    interface.service();

    assert!(context::take_received()[0].payload.is_empty());
}

#[test]
fn tcp_recv_for_other_host() {
    let mut interface = context::interface();
    let frame = context::tcp_frame(Ipv4Address::new([192, 168, 1, 99]), 80, 49152, b"data");
    interface.dev.link_mut().load(&frame).unwrap();

    interface.service();

    assert!(context::take_received().is_empty());
}

#[test]
fn tcp_recv_short_segment_is_dropped() {
    let mut interface = context::interface();
    // A 20 byte header without options and 2 bytes of data.
    let mut tcp_buffer = vec![0; 22];
    tcp_buffer[0 .. 4].copy_from_slice(&[0x00, 0x50, 0xC0, 0x00]);
    tcp_buffer[12] = 0x50;
    tcp_buffer[20 .. 22].copy_from_slice(b"hi");
    interface
        .dev
        .link_mut()
        .load(&context::tcp_segment_frame(*LOCAL_IPV4, &tcp_buffer))
        .unwrap();

    interface.service();

    assert!(context::take_received().is_empty());

    // Two more bytes and the same segment is long enough.
    tcp_buffer.extend_from_slice(b"!!");
    interface
        .dev
        .link_mut()
        .load(&context::tcp_segment_frame(*LOCAL_IPV4, &tcp_buffer))
        .unwrap();

    interface.service();

    let received = context::take_received();
    assert_eq!(1, received.len());
    assert_eq!(b"hi!!".to_vec(), received[0].payload);
}

#[test]
fn tcp_and_udp_in_one_pass() {
    let mut interface = context::interface();
    let tcp = context::tcp_frame(*LOCAL_IPV4, 80, 49152, b"tcp");
    let udp = context::udp_frame(*LOCAL_IPV4, 53, 49153, b"udp");
    interface.dev.link_mut().load(&tcp).unwrap();
    interface.dev.link_mut().load(&udp).unwrap();

    interface.service();

    let received = context::take_received();
    assert_eq!(2, received.len());
    assert_eq!(ipv4_protocols::TCP, received[0].protocol);
    assert_eq!(b"tcp".to_vec(), received[0].payload);
    assert_eq!(ipv4_protocols::UDP, received[1].protocol);
    assert_eq!(b"udp".to_vec(), received[1].payload);
}

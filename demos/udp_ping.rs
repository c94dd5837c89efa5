#[macro_use]
extern crate clap;
extern crate barenet;
extern crate env_logger;

use std::str::FromStr;

use barenet::core::link::MockLink;
use barenet::core::repr::{
    EthernetAddress,
    Ipv4Address,
};
use barenet::core::service::{
    arp,
    Datagram,
    Interface,
};

fn print_datagram(datagram: Datagram) {
    println!(
        "{}:{} -> :{} {}",
        datagram.src_addr,
        datagram.src_port,
        datagram.dst_port,
        String::from_utf8_lossy(datagram.payload)
    );
}

/// Moves every frame sent by one interface into the receive slots of another.
fn carry(from: &mut Interface<MockLink>, to: &mut Interface<MockLink>) {
    for frame in from.dev.link_mut().take_sent() {
        if let Err(err) = to.dev.link_mut().load(&frame) {
            eprintln!("Dropping {} byte frame on the wire: {}.", frame.len(), err);
        }
    }
}

/// Connects two interfaces with an in memory wire, resolves one from the
/// other and sends it UDP datagrams.
fn main() {
    env_logger::init();

    let matches = clap_app!(app =>
        (@arg MESSAGE: +takes_value "Payload of each datagram")
        (@arg COUNT: -c --count +takes_value "Number of datagrams to send")
        (@arg PORT: -p --port +takes_value "Destination UDP port")
        (@arg ADDRESS: -a --addr +takes_value "IPv4 address of the receiving interface")
    ).get_matches();

    let message = matches.value_of("MESSAGE").unwrap_or("ping");

    let count = matches
        .value_of("COUNT")
        .unwrap_or("3")
        .parse::<usize>()
        .expect("Bad count!");

    let port = matches
        .value_of("PORT")
        .unwrap_or("7")
        .parse::<u16>()
        .expect("Bad UDP port!");

    let dst_addr = Ipv4Address::from_str(matches.value_of("ADDRESS").unwrap_or("10.0.0.2"))
        .expect("Bad IP address!");

    let mut sender = Interface::start(
        MockLink::new(),
        EthernetAddress::new([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]),
        Ipv4Address::new([10, 0, 0, 1]),
    );
    let mut receiver = Interface::start(
        MockLink::new(),
        EthernetAddress::new([0x02, 0x00, 0x00, 0x00, 0x00, 0x02]),
        dst_addr,
    );
    receiver.set_udp_callback(print_datagram);

    let eth_addr = arp::resolve_with(&mut sender, dst_addr, |sender| {
        carry(sender, &mut receiver);
        receiver.service();
        carry(&mut receiver, sender);
        sender.service();
    }).expect("ARP resolution failed!");

    println!("Resolved {} to {}.", dst_addr, eth_addr);

    for i in 0 .. count {
        let payload = format!("{} {}", message, i);
        let payload_len = payload.len();
        let buffer = sender.udp_payload_mut();
        if payload_len > buffer.len() {
            panic!("Message does not fit in a datagram!");
        }
        buffer[.. payload_len].copy_from_slice(payload.as_bytes());
        sender
            .send_udp(port, port, payload_len)
            .expect("Sending UDP datagram failed!");

        carry(&mut sender, &mut receiver);
        receiver.service();
    }
}

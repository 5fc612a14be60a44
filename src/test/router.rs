use super::packets::{parse_arp, parse_datagram, PacketFactory};
use crate::device::MockDevice;
use crate::{
    ArpMessage, EthernetAddress, InternetDatagram, NetworkInterface, Route, RouteError, Router,
};
use std::net::Ipv4Addr;

const UPLINK_MAC: EthernetAddress = EthernetAddress([0x02, 0, 0, 0, 0, 0x10]);
const UPLINK_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 2);
const GATEWAY_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 1);
const LAN_MAC: EthernetAddress = EthernetAddress([0x02, 0, 0, 0, 0, 0x11]);
const LAN_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
const NEIGHBOR_MAC: EthernetAddress = EthernetAddress([0x02, 0, 0, 0, 0, 0x99]);

/// A router with an uplink (default route through a gateway) and a directly
/// attached 10.0.0.0/8 network.
fn setup() -> (Router, MockDevice, MockDevice) {
    let uplink = MockDevice::new();
    let lan = MockDevice::new();

    let mut router = Router::new();
    let up = router.add_interface(NetworkInterface::new(
        "uplink",
        Box::new(uplink.clone()),
        UPLINK_MAC,
        UPLINK_IP,
    ));
    let inside = router.add_interface(NetworkInterface::new(
        "lan",
        Box::new(lan.clone()),
        LAN_MAC,
        LAN_IP,
    ));
    router.add_route(0, 0, Some(GATEWAY_IP), up).unwrap();
    router
        .add_route(u32::from(Ipv4Addr::new(10, 0, 0, 0)), 8, None, inside)
        .unwrap();

    (router, uplink, lan)
}

fn deliver(router: &mut Router, n: usize, dgram: &InternetDatagram) {
    let iface = router.interface_mut(n).unwrap();
    let frame = PacketFactory::ipv4_frame(iface.ethernet_address(), NEIGHBOR_MAC, dgram);
    iface.recv_frame(&frame);
}

fn teach(router: &mut Router, n: usize, ip: Ipv4Addr, mac: EthernetAddress) {
    let iface = router.interface_mut(n).unwrap();
    let reply = ArpMessage::reply(mac, ip, iface.ethernet_address(), iface.ip_address());
    iface.recv_frame(&PacketFactory::arp_frame(iface.ethernet_address(), &reply));
}

#[test]
fn test_longest_prefix_wins() {
    let (mut router, uplink, lan) = setup();

    let dgram = PacketFactory::udp("192.168.5.5", "10.1.2.3", 64, b"inbound");
    deliver(&mut router, 0, &dgram);
    router.route();

    // Directly attached: ARP for the destination itself.
    assert!(uplink.sent_frames().is_empty());
    let sent = lan.take_sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(parse_arp(&sent[0]).target_ip_address, Ipv4Addr::new(10, 1, 2, 3));
    assert_eq!(router.interface(1).unwrap().waiting_for(Ipv4Addr::new(10, 1, 2, 3)), 1);
}

#[test]
fn test_default_route_uses_next_hop() {
    let (mut router, uplink, lan) = setup();

    let dgram = PacketFactory::udp("10.0.0.7", "8.8.8.8", 64, b"outbound");
    deliver(&mut router, 1, &dgram);
    router.route();

    assert!(lan.sent_frames().is_empty());
    assert_eq!(uplink.sent_descriptions(), vec!["ARP request 192.168.0.1?".to_string()]);
    assert_eq!(router.interface(0).unwrap().waiting_for(GATEWAY_IP), 1);
}

#[test]
fn test_ttl_decremented_and_checksum_refreshed() {
    let (mut router, _uplink, lan) = setup();
    let host = Ipv4Addr::new(10, 1, 2, 3);
    teach(&mut router, 1, host, NEIGHBOR_MAC);

    let dgram = PacketFactory::udp("192.168.5.5", "10.1.2.3", 64, b"payload");
    deliver(&mut router, 0, &dgram);
    router.route();

    let frame = lan.last_sent_frame().unwrap();
    assert_eq!(frame.header.dst, NEIGHBOR_MAC);
    assert_eq!(frame.header.src, LAN_MAC);
    // Parsing verifies the header checksum.
    let forwarded = parse_datagram(&frame);
    assert_eq!(forwarded.ttl(), 63);
    assert_eq!(forwarded.source(), dgram.source());
    assert_eq!(forwarded.destination(), host);
    assert_eq!(forwarded.payload, dgram.payload);
}

#[test]
fn test_expiring_ttl_is_dropped() {
    let (mut router, uplink, lan) = setup();

    for ttl in [0, 1] {
        let dgram = PacketFactory::udp("192.168.5.5", "10.1.2.3", ttl, b"dying");
        deliver(&mut router, 0, &dgram);
    }
    router.route();

    assert!(uplink.sent_frames().is_empty());
    assert!(lan.sent_frames().is_empty());
    assert!(router.interface_mut(0).unwrap().datagrams_received().is_empty());
}

#[test]
fn test_no_route_is_dropped() {
    let lan = MockDevice::new();
    let mut router = Router::new();
    let n = router.add_interface(NetworkInterface::new("lan", Box::new(lan.clone()), LAN_MAC, LAN_IP));
    router.add_route(u32::from(Ipv4Addr::new(10, 0, 0, 0)), 8, None, n).unwrap();

    deliver(&mut router, n, &PacketFactory::udp("10.0.0.7", "8.8.8.8", 64, b"lost"));
    router.route();

    assert!(lan.sent_frames().is_empty());
    assert_eq!(router.lookup(Ipv4Addr::new(8, 8, 8, 8)), None);
}

#[test]
fn test_routes_drained_from_every_interface() {
    let (mut router, uplink, lan) = setup();
    teach(&mut router, 0, GATEWAY_IP, NEIGHBOR_MAC);
    teach(&mut router, 1, Ipv4Addr::new(10, 0, 0, 7), NEIGHBOR_MAC);

    deliver(&mut router, 0, &PacketFactory::udp("1.1.1.1", "10.0.0.7", 64, b"in"));
    deliver(&mut router, 1, &PacketFactory::udp("10.0.0.7", "1.1.1.1", 64, b"out"));
    router.route();

    assert_eq!(
        uplink.sent_descriptions(),
        vec![format!("IPv4 10.0.0.7 → 1.1.1.1 ttl=63 via {}", NEIGHBOR_MAC)]
    );
    assert_eq!(
        lan.sent_descriptions(),
        vec![format!("IPv4 1.1.1.1 → 10.0.0.7 ttl=63 via {}", NEIGHBOR_MAC)]
    );
}

#[test]
fn test_table_ordered_by_prefix_length() {
    let mut router = Router::new();
    router.add_interface(NetworkInterface::new(
        "lan",
        Box::new(MockDevice::new()),
        LAN_MAC,
        LAN_IP,
    ));

    let first_24 = u32::from(Ipv4Addr::new(10, 1, 1, 0));
    let second_24 = u32::from(Ipv4Addr::new(10, 2, 2, 0));
    router.add_route(0, 0, None, 0).unwrap();
    router.add_route(first_24, 24, None, 0).unwrap();
    router.add_route(u32::from(Ipv4Addr::new(10, 0, 0, 0)), 8, None, 0).unwrap();
    router.add_route(u32::from(Ipv4Addr::new(10, 1, 0, 0)), 16, None, 0).unwrap();
    router.add_route(second_24, 24, None, 0).unwrap();

    let lengths: Vec<u8> = router.routes().iter().map(|r| r.prefix_length).collect();
    assert_eq!(lengths, vec![24, 24, 16, 8, 0]);
    assert_eq!(router.routes()[0].prefix, first_24);
    assert_eq!(router.routes()[1].prefix, second_24);

    assert_eq!(router.lookup(Ipv4Addr::new(10, 1, 1, 9)).unwrap().prefix_length, 24);
    assert_eq!(router.lookup(Ipv4Addr::new(10, 1, 7, 9)).unwrap().prefix_length, 16);
    assert_eq!(router.lookup(Ipv4Addr::new(10, 9, 9, 9)).unwrap().prefix_length, 8);
    assert_eq!(router.lookup(Ipv4Addr::new(11, 0, 0, 1)).unwrap().prefix_length, 0);
}

#[test]
fn test_route_matching() {
    let any = Route {
        prefix: 0,
        prefix_length: 0,
        next_hop: None,
        interface: 0,
    };
    assert!(any.matches(Ipv4Addr::new(255, 255, 255, 255)));
    assert!(any.matches(Ipv4Addr::new(0, 0, 0, 0)));

    let host = Route {
        prefix: u32::from(Ipv4Addr::new(10, 0, 0, 5)),
        prefix_length: 32,
        next_hop: Some(Ipv4Addr::new(10, 0, 0, 1)),
        interface: 0,
    };
    assert!(host.matches(Ipv4Addr::new(10, 0, 0, 5)));
    assert!(!host.matches(Ipv4Addr::new(10, 0, 0, 4)));
    assert_eq!(host.to_string(), "10.0.0.5/32 => 10.0.0.1 on interface 0");
}

#[test]
fn test_route_to_missing_interface_is_rejected() {
    let mut router = Router::new();
    assert_eq!(
        router.add_route(0, 0, None, 5),
        Err(RouteError::NoSuchInterface(5))
    );
    assert!(router.routes().is_empty());
}

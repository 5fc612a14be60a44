//! A network interface: IPv4 on top of Ethernet, with ARP.
use crate::arp::ArpMessage;
use crate::ethernet::{EthernetAddress, EthernetFrame, EthernetHeader};
use crate::ip::InternetDatagram;
use crate::Device;
use etherparse::EtherType;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::net::Ipv4Addr;
use tracing::{debug, trace, warn};

/// How long a learned IP-to-Ethernet mapping stays usable.
pub const ARP_ENTRY_TTL_MS: u64 = 30_000;
/// Minimum spacing between ARP requests for the same address.
pub const ARP_REQUEST_PERIOD_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy)]
struct ArpEntry {
    ethernet_address: EthernetAddress,
    age_ms: u64,
}

/// Connects the IP layer to an Ethernet link.
///
/// Outbound datagrams are addressed to a next hop by IP; the interface finds
/// the matching Ethernet address through ARP, holding datagrams back until a
/// reply arrives. Inbound frames for this interface are decoded and queued for
/// whoever drives the interface (a host stack or a router).
pub struct NetworkInterface {
    name: String,
    device: Box<dyn Device>,
    ethernet_address: EthernetAddress,
    ip_address: Ipv4Addr,

    arp_cache: HashMap<Ipv4Addr, ArpEntry>,
    // Age of the outstanding request per address.
    arp_requests: HashMap<Ipv4Addr, u64>,
    waiting: HashMap<Ipv4Addr, Vec<InternetDatagram>>,

    datagrams_received: VecDeque<InternetDatagram>,
}

impl fmt::Debug for NetworkInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkInterface")
            .field("name", &self.name)
            .field("ethernet_address", &self.ethernet_address)
            .field("ip_address", &self.ip_address)
            .field("arp_cache.len()", &self.arp_cache.len())
            .field("arp_requests.len()", &self.arp_requests.len())
            .field("waiting.len()", &self.waiting.len())
            .field("datagrams_received.len()", &self.datagrams_received.len())
            .finish()
    }
}

impl NetworkInterface {
    pub fn new(
        name: &str,
        device: Box<dyn Device>,
        ethernet_address: EthernetAddress,
        ip_address: Ipv4Addr,
    ) -> Self {
        debug!(
            "[{}] interface up: Ethernet address {} and IP address {}",
            name, ethernet_address, ip_address
        );
        NetworkInterface {
            name: name.to_string(),
            device,
            ethernet_address,
            ip_address,
            arp_cache: HashMap::new(),
            arp_requests: HashMap::new(),
            waiting: HashMap::new(),
            datagrams_received: VecDeque::new(),
        }
    }

    /// Send `dgram` toward `next_hop`, which must be on this link (a router or
    /// the final destination itself).
    pub fn send_datagram(&mut self, dgram: &InternetDatagram, next_hop: Ipv4Addr) {
        if let Some(entry) = self.arp_cache.get(&next_hop) {
            let dst = entry.ethernet_address;
            self.transmit_datagram(dgram, dst);
            return;
        }

        trace!(
            "[{}] 📦 holding datagram for {} until it resolves",
            self.name, next_hop
        );
        self.waiting.entry(next_hop).or_default().push(dgram.clone());

        if self.arp_requests.contains_key(&next_hop) {
            return;
        }
        debug!("[{}] ARP who-has {}", self.name, next_hop);
        self.arp_requests.insert(next_hop, 0);
        let request = ArpMessage::request(self.ethernet_address, self.ip_address, next_hop);
        self.transmit(EthernetFrame {
            header: EthernetHeader {
                dst: EthernetAddress::BROADCAST,
                src: self.ethernet_address,
                ether_type: EtherType::ARP,
            },
            payload: request.serialize(),
        });
    }

    /// Handle a frame that arrived on the link.
    pub fn recv_frame(&mut self, frame: &EthernetFrame) {
        let dst = frame.header.dst;
        if dst != self.ethernet_address && dst != EthernetAddress::BROADCAST {
            return;
        }

        if frame.header.ether_type == EtherType::IPV4 {
            match InternetDatagram::parse(&frame.payload) {
                Ok(dgram) => {
                    trace!(
                        "[{}] ◀ datagram {} → {}",
                        self.name,
                        dgram.source(),
                        dgram.destination()
                    );
                    self.datagrams_received.push_back(dgram);
                }
                Err(e) => trace!("[{}] dropping IPv4 frame: {}", self.name, e),
            }
        } else if frame.header.ether_type == EtherType::ARP {
            match ArpMessage::parse(&frame.payload) {
                Ok(arp) => self.recv_arp(&arp),
                Err(e) => trace!("[{}] dropping ARP frame: {}", self.name, e),
            }
        }
    }

    fn recv_arp(&mut self, arp: &ArpMessage) {
        let sender_ip = arp.sender_ip_address;
        let sender_mac = arp.sender_ethernet_address;
        self.arp_cache.insert(
            sender_ip,
            ArpEntry {
                ethernet_address: sender_mac,
                age_ms: 0,
            },
        );
        debug!("[{}] ARP learned {} is-at {}", self.name, sender_ip, sender_mac);

        if arp.is_request() && arp.target_ip_address == self.ip_address {
            let reply = ArpMessage::reply(self.ethernet_address, self.ip_address, sender_mac, sender_ip);
            self.transmit(EthernetFrame {
                header: EthernetHeader {
                    dst: sender_mac,
                    src: self.ethernet_address,
                    ether_type: EtherType::ARP,
                },
                payload: reply.serialize(),
            });
        }

        if !arp.is_reply() {
            return;
        }
        if let Some(queued) = self.waiting.remove(&sender_ip) {
            debug!(
                "[{}] flushing {} held datagram(s) to {}",
                self.name,
                queued.len(),
                sender_ip
            );
            for dgram in &queued {
                self.transmit_datagram(dgram, sender_mac);
            }
        }
    }

    /// `ms_since_last_tick` milliseconds have passed.
    pub fn tick(&mut self, ms_since_last_tick: u64) {
        let name = &self.name;
        self.arp_cache.retain(|ip, entry| {
            entry.age_ms = entry.age_ms.saturating_add(ms_since_last_tick);
            let keep = entry.age_ms <= ARP_ENTRY_TTL_MS;
            if !keep {
                debug!("[{}] ARP entry for {} expired", name, ip);
            }
            keep
        });
        self.arp_requests.retain(|_, age_ms| {
            *age_ms = age_ms.saturating_add(ms_since_last_tick);
            *age_ms <= ARP_REQUEST_PERIOD_MS
        });
    }

    fn transmit_datagram(&self, dgram: &InternetDatagram, dst: EthernetAddress) {
        self.transmit(EthernetFrame {
            header: EthernetHeader {
                dst,
                src: self.ethernet_address,
                ether_type: EtherType::IPV4,
            },
            payload: dgram.serialize(),
        });
    }

    fn transmit(&self, frame: EthernetFrame) {
        if let Err(e) = self.device.send(&frame.serialize()) {
            warn!("[{}] transmit failed: {}", self.name, e);
        }
    }

    /// Datagrams received and not yet taken by the caller, oldest first.
    pub fn datagrams_received(&mut self) -> &mut VecDeque<InternetDatagram> {
        &mut self.datagrams_received
    }

    /// The Ethernet address currently cached for `ip`, if any.
    pub fn resolved(&self, ip: Ipv4Addr) -> Option<EthernetAddress> {
        self.arp_cache.get(&ip).map(|entry| entry.ethernet_address)
    }

    /// Datagrams held back waiting for `ip` to resolve.
    pub fn waiting_for(&self, ip: Ipv4Addr) -> usize {
        self.waiting.get(&ip).map_or(0, Vec::len)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ethernet_address(&self) -> EthernetAddress {
        self.ethernet_address
    }

    pub fn ip_address(&self) -> Ipv4Addr {
        self.ip_address
    }
}

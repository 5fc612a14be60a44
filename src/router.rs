//! Static longest-prefix-match IPv4 forwarding.
use crate::error::RouteError;
use crate::interface::NetworkInterface;
use std::fmt;
use std::net::Ipv4Addr;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub prefix: u32,
    pub prefix_length: u8,
    /// `None` when the network is directly attached: the datagram goes
    /// straight to its destination address.
    pub next_hop: Option<Ipv4Addr>,
    pub interface: usize,
}

impl Route {
    fn mask(&self) -> u32 {
        u32::MAX
            .checked_shl(32 - self.prefix_length as u32)
            .unwrap_or(0)
    }

    /// Do the top `prefix_length` bits of `addr` equal those of the prefix?
    pub fn matches(&self, addr: Ipv4Addr) -> bool {
        let mask = self.mask();
        u32::from(addr) & mask == self.prefix & mask
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} => ", Ipv4Addr::from(self.prefix), self.prefix_length)?;
        match self.next_hop {
            Some(hop) => write!(f, "{}", hop)?,
            None => write!(f, "(direct)")?,
        }
        write!(f, " on interface {}", self.interface)
    }
}

/// A router with several interfaces and a static forwarding table.
///
/// The table is kept ordered by descending prefix length (ties in insertion
/// order), so the first route that matches is the longest-prefix match.
#[derive(Debug, Default)]
pub struct Router {
    interfaces: Vec<NetworkInterface>,
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Router::default()
    }

    /// Attach an interface; returns its index for use in routes.
    pub fn add_interface(&mut self, interface: NetworkInterface) -> usize {
        self.interfaces.push(interface);
        self.interfaces.len() - 1
    }

    pub fn interface(&self, n: usize) -> Option<&NetworkInterface> {
        self.interfaces.get(n)
    }

    pub fn interface_mut(&mut self, n: usize) -> Option<&mut NetworkInterface> {
        self.interfaces.get_mut(n)
    }

    pub fn add_route(
        &mut self,
        prefix: u32,
        prefix_length: u8,
        next_hop: Option<Ipv4Addr>,
        interface: usize,
    ) -> Result<(), RouteError> {
        if interface >= self.interfaces.len() {
            return Err(RouteError::NoSuchInterface(interface));
        }
        let route = Route {
            prefix,
            prefix_length: prefix_length.min(32),
            next_hop,
            interface,
        };
        debug!("adding route {}", route);

        let pos = self
            .routes
            .iter()
            .position(|r| r.prefix_length < route.prefix_length)
            .unwrap_or(self.routes.len());
        self.routes.insert(pos, route);
        Ok(())
    }

    /// The most specific route toward `dst`.
    pub fn lookup(&self, dst: Ipv4Addr) -> Option<&Route> {
        self.routes.iter().find(|r| r.matches(dst))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Forward every datagram waiting on every interface.
    pub fn route(&mut self) {
        for n in 0..self.interfaces.len() {
            while let Some(mut dgram) = self.interfaces[n].datagrams_received().pop_front() {
                let dst = dgram.destination();
                let Some(route) = self.lookup(dst).copied() else {
                    debug!("no route to {}, dropping", dst);
                    continue;
                };
                if dgram.ttl() <= 1 {
                    debug!("TTL expired for datagram to {}, dropping", dst);
                    continue;
                }

                dgram.header.time_to_live -= 1;
                dgram.compute_checksum();
                let next_hop = route.next_hop.unwrap_or(dst);
                trace!("forwarding {} via {} ({})", dst, next_hop, route);
                self.interfaces[route.interface].send_datagram(&dgram, next_hop);
            }
        }
    }
}

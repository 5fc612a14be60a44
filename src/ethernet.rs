//! Ethernet II framing.
use crate::error::{ConfigError, ParseError};
use etherparse::{EtherType, Ethernet2Header};
use std::fmt;
use std::str::FromStr;

/// A 48-bit MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EthernetAddress(pub [u8; 6]);

impl EthernetAddress {
    pub const BROADCAST: EthernetAddress = EthernetAddress([0xff; 6]);

    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for EthernetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            a[0], a[1], a[2], a[3], a[4], a[5]
        )
    }
}

impl FromStr for EthernetAddress {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 6];
        let mut parts = s.split(':');
        for octet in octets.iter_mut() {
            let part = parts
                .next()
                .filter(|p| p.len() == 2)
                .ok_or_else(|| ConfigError::EthernetAddress(s.to_string()))?;
            *octet = u8::from_str_radix(part, 16)
                .map_err(|_| ConfigError::EthernetAddress(s.to_string()))?;
        }
        if parts.next().is_some() {
            return Err(ConfigError::EthernetAddress(s.to_string()));
        }
        Ok(EthernetAddress(octets))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    pub dst: EthernetAddress,
    pub src: EthernetAddress,
    pub ether_type: EtherType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetFrame {
    pub header: EthernetHeader,
    pub payload: Vec<u8>,
}

impl EthernetFrame {
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        let (header, payload) =
            Ethernet2Header::from_slice(bytes).map_err(|e| ParseError::Ethernet(e.to_string()))?;
        Ok(EthernetFrame {
            header: EthernetHeader {
                dst: EthernetAddress(header.destination),
                src: EthernetAddress(header.source),
                ether_type: header.ether_type,
            },
            payload: payload.to_vec(),
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        let header = Ethernet2Header {
            source: self.header.src.octets(),
            destination: self.header.dst.octets(),
            ether_type: self.header.ether_type,
        };
        let mut out = Vec::with_capacity(Ethernet2Header::LEN + self.payload.len());
        out.extend_from_slice(&header.to_bytes());
        out.extend_from_slice(&self.payload);
        out
    }
}

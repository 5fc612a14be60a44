//! IPv4 datagrams (RFC 791).
use crate::error::ParseError;
use etherparse::{Ipv4Header, Ipv4HeaderSlice};
use std::net::Ipv4Addr;

/// An IPv4 header plus its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct InternetDatagram {
    pub header: Ipv4Header,
    pub payload: Vec<u8>,
}

impl InternetDatagram {
    /// Decode a datagram. Bytes past the header's total length (Ethernet
    /// padding, usually) are ignored.
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        let slice = Ipv4HeaderSlice::from_slice(bytes).map_err(|e| ParseError::Ipv4(e.to_string()))?;
        let header_len = slice.slice().len();
        let total_len = slice.total_len() as usize;
        if total_len < header_len || bytes.len() < total_len {
            return Err(ParseError::Truncated {
                expected: total_len.max(header_len),
                actual: bytes.len(),
            });
        }

        let header = slice.to_header();
        if header.calc_header_checksum() != header.header_checksum {
            return Err(ParseError::BadChecksum("IPv4 header"));
        }

        Ok(InternetDatagram {
            header,
            payload: bytes[header_len..total_len].to_vec(),
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        let header = self.header.to_bytes();
        let mut out = Vec::with_capacity(header.len() + self.payload.len());
        out.extend_from_slice(&header);
        out.extend_from_slice(&self.payload);
        out
    }

    pub fn source(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.header.source)
    }

    pub fn destination(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.header.destination)
    }

    pub fn ttl(&self) -> u8 {
        self.header.time_to_live
    }

    /// Refresh the header checksum after the header was modified.
    pub fn compute_checksum(&mut self) {
        self.header.header_checksum = self.header.calc_header_checksum();
    }
}

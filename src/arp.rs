//! Address Resolution Protocol (RFC 826) for Ethernet and IPv4.
//!
//! ```text
//!    0               1               2               3
//!    +---------------+---------------+---------------+---------------+
//!  0 |        Hardware Type          |         Protocol Type         |
//!    +---------------+---------------+---------------+---------------+
//!  4 |  HW Addr Len  | Proto Addr Len|            Opcode             |
//!    +---------------+---------------+---------------+---------------+
//!  8 |                  Sender Hardware Address (6)                  |
//!    +                               +---------------+---------------+
//! 12 |                               |   Sender Protocol Address (4) |
//!    +---------------+---------------+---------------+---------------+
//! 16 |                               |                               |
//!    +---------------+---------------+                               +
//! 20 |                  Target Hardware Address (6)                  |
//!    +---------------+---------------+---------------+---------------+
//! 24 |                  Target Protocol Address (4)                  |
//!    +---------------+---------------+---------------+---------------+
//! ```
use crate::error::ParseError;
use crate::ethernet::EthernetAddress;
use std::net::Ipv4Addr;

const HTYPE_ETHERNET: u16 = 1;
const PTYPE_IPV4: u16 = 0x0800;
pub const ARP_MESSAGE_LEN: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpMessage {
    pub opcode: u16,
    pub sender_ethernet_address: EthernetAddress,
    pub sender_ip_address: Ipv4Addr,
    pub target_ethernet_address: EthernetAddress,
    pub target_ip_address: Ipv4Addr,
}

impl ArpMessage {
    pub const OPCODE_REQUEST: u16 = 1;
    pub const OPCODE_REPLY: u16 = 2;

    pub fn request(
        sender_ethernet_address: EthernetAddress,
        sender_ip_address: Ipv4Addr,
        target_ip_address: Ipv4Addr,
    ) -> Self {
        ArpMessage {
            opcode: Self::OPCODE_REQUEST,
            sender_ethernet_address,
            sender_ip_address,
            target_ethernet_address: EthernetAddress::default(),
            target_ip_address,
        }
    }

    pub fn reply(
        sender_ethernet_address: EthernetAddress,
        sender_ip_address: Ipv4Addr,
        target_ethernet_address: EthernetAddress,
        target_ip_address: Ipv4Addr,
    ) -> Self {
        ArpMessage {
            opcode: Self::OPCODE_REPLY,
            sender_ethernet_address,
            sender_ip_address,
            target_ethernet_address,
            target_ip_address,
        }
    }

    pub fn is_request(&self) -> bool {
        self.opcode == Self::OPCODE_REQUEST
    }

    pub fn is_reply(&self) -> bool {
        self.opcode == Self::OPCODE_REPLY
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        if bytes.len() < ARP_MESSAGE_LEN {
            return Err(ParseError::Truncated {
                expected: ARP_MESSAGE_LEN,
                actual: bytes.len(),
            });
        }

        let htype = u16::from_be_bytes([bytes[0], bytes[1]]);
        let ptype = u16::from_be_bytes([bytes[2], bytes[3]]);
        if htype != HTYPE_ETHERNET || ptype != PTYPE_IPV4 || bytes[4] != 6 || bytes[5] != 4 {
            return Err(ParseError::UnsupportedArp);
        }

        let opcode = u16::from_be_bytes([bytes[6], bytes[7]]);
        if opcode != Self::OPCODE_REQUEST && opcode != Self::OPCODE_REPLY {
            return Err(ParseError::BadOpcode(opcode));
        }

        Ok(ArpMessage {
            opcode,
            sender_ethernet_address: EthernetAddress(mac_at(bytes, 8)),
            sender_ip_address: ip_at(bytes, 14),
            target_ethernet_address: EthernetAddress(mac_at(bytes, 18)),
            target_ip_address: ip_at(bytes, 24),
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(ARP_MESSAGE_LEN);
        out.extend_from_slice(&HTYPE_ETHERNET.to_be_bytes());
        out.extend_from_slice(&PTYPE_IPV4.to_be_bytes());
        out.push(6);
        out.push(4);
        out.extend_from_slice(&self.opcode.to_be_bytes());
        out.extend_from_slice(&self.sender_ethernet_address.octets());
        out.extend_from_slice(&self.sender_ip_address.octets());
        out.extend_from_slice(&self.target_ethernet_address.octets());
        out.extend_from_slice(&self.target_ip_address.octets());
        out
    }
}

fn mac_at(bytes: &[u8], offset: usize) -> [u8; 6] {
    let mut mac = [0u8; 6];
    mac.copy_from_slice(&bytes[offset..offset + 6]);
    mac
}

fn ip_at(bytes: &[u8], offset: usize) -> Ipv4Addr {
    Ipv4Addr::new(
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_layout() {
        let msg = ArpMessage::request(
            EthernetAddress([2, 0, 0, 0, 0, 1]),
            Ipv4Addr::new(10, 0, 0, 1),
            Ipv4Addr::new(10, 0, 0, 2),
        );
        let bytes = msg.serialize();
        assert_eq!(bytes.len(), ARP_MESSAGE_LEN);
        assert_eq!(&bytes[..8], &[0, 1, 8, 0, 6, 4, 0, 1]);
        assert_eq!(&bytes[14..18], &[10, 0, 0, 1]);
        assert_eq!(&bytes[24..28], &[10, 0, 0, 2]);
        assert_eq!(ArpMessage::parse(&bytes).unwrap(), msg);
    }

    #[test]
    fn test_rejects_malformed() {
        let good = ArpMessage::reply(
            EthernetAddress([2, 0, 0, 0, 0, 1]),
            Ipv4Addr::new(10, 0, 0, 1),
            EthernetAddress([2, 0, 0, 0, 0, 2]),
            Ipv4Addr::new(10, 0, 0, 2),
        )
        .serialize();

        assert!(matches!(
            ArpMessage::parse(&good[..20]),
            Err(ParseError::Truncated { expected: 28, actual: 20 })
        ));

        let mut bad_type = good.clone();
        bad_type[3] = 0xdd;
        assert_eq!(ArpMessage::parse(&bad_type), Err(ParseError::UnsupportedArp));

        let mut bad_opcode = good.clone();
        bad_opcode[7] = 9;
        assert_eq!(ArpMessage::parse(&bad_opcode), Err(ParseError::BadOpcode(9)));
    }
}

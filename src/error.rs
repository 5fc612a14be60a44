use thiserror::Error;

/// Why a frame, ARP message, datagram or segment could not be decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("truncated: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("unsupported ARP hardware/protocol combination")]
    UnsupportedArp,

    #[error("unknown ARP opcode {0}")]
    BadOpcode(u16),

    #[error("bad Ethernet header: {0}")]
    Ethernet(String),

    #[error("bad IPv4 header: {0}")]
    Ipv4(String),

    #[error("{0} checksum mismatch")]
    BadChecksum(&'static str),

    #[error("bad TCP segment: {0}")]
    Tcp(String),
}

/// Rejected forwarding-table changes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("no interface with index {0}")]
    NoSuchInterface(usize),
}

/// Malformed host configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid Ethernet address {0:?}")]
    EthernetAddress(String),

    #[error("invalid IPv4 address {0:?}")]
    IpAddress(String),
}

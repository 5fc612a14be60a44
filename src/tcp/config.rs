use crate::wrap32::Wrap32;

/// Stream capacity used when nothing else is configured.
pub const DEFAULT_CAPACITY: u64 = 64_000;
/// Largest payload placed in a single segment.
pub const MAX_PAYLOAD_SIZE: usize = 1000;
/// Initial retransmission timeout, in milliseconds.
pub const TIMEOUT_DFLT: u64 = 1000;
/// Consecutive retransmissions after which a caller should give up.
/// The sender itself never aborts.
pub const MAX_RETX_ATTEMPTS: u64 = 8;

/// Tunables for one TCP endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpConfig {
    pub recv_capacity: u64,
    pub send_capacity: u64,
    pub rt_timeout: u64,
    pub max_payload_size: usize,
    /// Use this ISN instead of a random one.
    pub fixed_isn: Option<Wrap32>,
}

impl Default for TcpConfig {
    fn default() -> Self {
        TcpConfig {
            recv_capacity: DEFAULT_CAPACITY,
            send_capacity: DEFAULT_CAPACITY,
            rt_timeout: TIMEOUT_DFLT,
            max_payload_size: MAX_PAYLOAD_SIZE,
            fixed_isn: None,
        }
    }
}

impl TcpConfig {
    pub fn isn(&self) -> Wrap32 {
        self.fixed_isn.unwrap_or_else(|| Wrap32::new(rand::random()))
    }
}

//! Messages exchanged between a TCP sender and the peer's receiver.
use crate::wrap32::Wrap32;
use std::fmt;

/// What the sender puts on the wire: a run of sequence space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TcpSenderMessage {
    pub seqno: Wrap32,
    pub syn: bool,
    pub payload: Vec<u8>,
    pub fin: bool,
    pub rst: bool,
}

impl TcpSenderMessage {
    /// Sequence numbers occupied by this message. SYN and FIN count one each.
    pub fn sequence_length(&self) -> u64 {
        self.syn as u64 + self.payload.len() as u64 + self.fin as u64
    }
}

impl fmt::Display for TcpSenderMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}{}{}] seq={} len={}",
            if self.syn { "S" } else { "-" },
            if self.fin { "F" } else { "-" },
            if self.rst { "R" } else { "-" },
            self.seqno,
            self.payload.len()
        )
    }
}

/// What the receiver reports back: the next sequence number it needs and how
/// much room it has.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TcpReceiverMessage {
    pub ackno: Option<Wrap32>,
    pub window_size: u16,
    pub rst: bool,
}

impl fmt::Display for TcpReceiverMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ackno {
            Some(ackno) => write!(f, "ack={} win={}", ackno, self.window_size)?,
            None => write!(f, "ack=- win={}", self.window_size)?,
        }
        if self.rst {
            write!(f, " RST")?;
        }
        Ok(())
    }
}

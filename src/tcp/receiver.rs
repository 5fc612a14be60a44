use crate::byte_stream::ByteStream;
use crate::reassembler::Reassembler;
use crate::tcp::config::TcpConfig;
use crate::tcp::message::{TcpReceiverMessage, TcpSenderMessage};
use crate::wrap32::Wrap32;
use tracing::{debug, trace};

/// The receiving half of a TCP endpoint.
///
/// Turns incoming segments into reassembler inserts and reports the
/// acknowledgment number and window back to the peer's sender.
#[derive(Debug)]
pub struct TcpReceiver {
    reassembler: Reassembler,
    isn: Option<Wrap32>,
}

impl TcpReceiver {
    pub fn new(reassembler: Reassembler) -> Self {
        TcpReceiver {
            reassembler,
            isn: None,
        }
    }

    pub fn from_config(config: &TcpConfig) -> Self {
        TcpReceiver::new(Reassembler::new(ByteStream::new(config.recv_capacity)))
    }

    pub fn receive(&mut self, message: TcpSenderMessage) {
        trace!("receiver ◀ {}", message);
        if message.rst {
            debug!("RST received, failing inbound stream");
            self.reassembler.output_mut().set_error();
        }
        if self.reassembler.output().has_error() {
            return;
        }

        let isn = match self.isn {
            // Nothing is accepted before the SYN.
            None if !message.syn => return,
            None => {
                debug!(isn = %message.seqno, "SYN received");
                self.isn = Some(message.seqno);
                message.seqno
            }
            // A repeat of the SYN slot carries nothing new.
            Some(isn) if isn == message.seqno => return,
            Some(isn) => isn,
        };

        let checkpoint = self.reassembler.output().bytes_pushed() + 1;
        let absolute = message.seqno.unwrap(isn, checkpoint);
        // Absolute 0 is the SYN itself; stream index 0 is the byte after it.
        let first_index = absolute.saturating_sub(1);
        self.reassembler
            .insert(first_index, &message.payload, message.fin);
    }

    pub fn send(&self) -> TcpReceiverMessage {
        let output = self.reassembler.output();
        let window_size = output.available_capacity().min(u16::MAX as u64) as u16;
        let ackno = self.isn.map(|isn| {
            let next = output.bytes_pushed() + 1 + output.is_closed() as u64;
            Wrap32::wrap(next, isn)
        });

        TcpReceiverMessage {
            ackno,
            window_size,
            rst: output.has_error(),
        }
    }

    /// The inbound stream, for the application to read from.
    pub fn output(&self) -> &ByteStream {
        self.reassembler.output()
    }

    pub fn output_mut(&mut self) -> &mut ByteStream {
        self.reassembler.output_mut()
    }
}

use crate::byte_stream::ByteStream;
use crate::tcp::config::TcpConfig;
use crate::tcp::message::{TcpReceiverMessage, TcpSenderMessage};
use crate::tcp::timer::RetransmissionTimer;
use crate::wrap32::Wrap32;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// The sending half of a TCP endpoint.
///
/// Reads the outbound stream into segments that fit the peer's window, keeps
/// every unacknowledged segment in a FIFO, and resends the oldest one when the
/// retransmission timer fires. The timer doubles on each consecutive timeout
/// while the peer's window is open.
#[derive(Debug)]
pub struct TcpSender {
    input: ByteStream,
    isn: Wrap32,
    initial_rto_ms: u64,
    max_payload_size: usize,

    timer: RetransmissionTimer,
    window_size: u16,
    next_seqno: u64,
    acked_seqno: u64,

    outstanding: VecDeque<TcpSenderMessage>,
    in_flight: u64,
    retransmissions: u64,

    syn_sent: bool,
    fin_sent: bool,
}

impl TcpSender {
    pub fn new(input: ByteStream, isn: Wrap32, initial_rto_ms: u64) -> Self {
        TcpSender {
            input,
            isn,
            initial_rto_ms,
            max_payload_size: crate::tcp::config::MAX_PAYLOAD_SIZE,
            timer: RetransmissionTimer::new(initial_rto_ms),
            // Until the peer says otherwise, assume room for the SYN.
            window_size: 1,
            next_seqno: 0,
            acked_seqno: 0,
            outstanding: VecDeque::new(),
            in_flight: 0,
            retransmissions: 0,
            syn_sent: false,
            fin_sent: false,
        }
    }

    pub fn from_config(config: &TcpConfig) -> Self {
        let mut sender = TcpSender::new(
            ByteStream::new(config.send_capacity),
            config.isn(),
            config.rt_timeout,
        );
        sender.max_payload_size = config.max_payload_size;
        sender
    }

    /// Fill the peer's window with as many segments as the input allows.
    pub fn push<F>(&mut self, mut transmit: F)
    where
        F: FnMut(&TcpSenderMessage),
    {
        if self.fin_sent || self.input.has_error() {
            return;
        }
        // A closed window still gets a single sequence number.
        let window = (self.window_size as u64).max(1);

        while window > self.in_flight {
            let room = window - self.in_flight;
            let mut msg = self.make_empty_message();
            if !self.syn_sent {
                msg.syn = true;
                self.syn_sent = true;
            }

            while self.input.bytes_buffered() > 0
                && msg.sequence_length() < room
                && msg.payload.len() < self.max_payload_size
            {
                let take = (self.max_payload_size - msg.payload.len())
                    .min((room - msg.sequence_length()) as usize);
                let chunk = self.input.peek();
                let chunk = &chunk[..chunk.len().min(take)];
                msg.payload.extend_from_slice(chunk);
                let taken = chunk.len() as u64;
                self.input.pop(taken);
            }

            if self.input.is_finished() && msg.sequence_length() < room {
                msg.fin = true;
                self.fin_sent = true;
            }

            if msg.sequence_length() == 0 {
                break;
            }

            trace!("sender ▶ {}", msg);
            self.next_seqno += msg.sequence_length();
            self.in_flight += msg.sequence_length();
            transmit(&msg);
            self.outstanding.push_back(msg);

            if !self.timer.is_active() {
                self.timer.start();
            }
            if self.fin_sent {
                break;
            }
        }
    }

    /// A segment with no payload or flags, at the current sequence number.
    pub fn make_empty_message(&self) -> TcpSenderMessage {
        TcpSenderMessage {
            seqno: Wrap32::wrap(self.next_seqno, self.isn),
            syn: false,
            payload: Vec::new(),
            fin: false,
            rst: self.input.has_error(),
        }
    }

    pub fn receive(&mut self, msg: &TcpReceiverMessage) {
        if msg.rst {
            debug!("RST received, failing outbound stream");
            self.input.set_error();
            self.timer.stop();
            return;
        }
        self.window_size = msg.window_size;

        let Some(ackno) = msg.ackno else {
            return;
        };
        let ack = ackno.unwrap(self.isn, self.next_seqno);
        // Acknowledges something never sent.
        if ack > self.next_seqno {
            return;
        }

        let mut retired = false;
        while let Some(front) = self.outstanding.front() {
            let len = front.sequence_length();
            if ack < self.acked_seqno + len {
                break;
            }
            self.in_flight -= len;
            self.acked_seqno += len;
            self.outstanding.pop_front();
            retired = true;
        }

        if retired {
            trace!(acked = self.acked_seqno, in_flight = self.in_flight, "ack");
            self.retransmissions = 0;
            self.timer = RetransmissionTimer::new(self.initial_rto_ms);
            if !self.outstanding.is_empty() {
                self.timer.start();
            }
        }
    }

    /// `ms_since_last_tick` milliseconds have passed.
    pub fn tick<F>(&mut self, ms_since_last_tick: u64, mut transmit: F)
    where
        F: FnMut(&TcpSenderMessage),
    {
        if !self.timer.tick(ms_since_last_tick).is_expired() {
            return;
        }
        if let Some(oldest) = self.outstanding.front() {
            debug!(
                rto = self.timer.rto(),
                attempt = self.retransmissions + 1,
                "retransmitting {}",
                oldest
            );
            transmit(oldest);
        }
        if self.window_size != 0 {
            self.retransmissions += 1;
            self.timer.exponential_backoff();
        }
        self.timer.reset();
    }

    /// Sequence numbers sent but not yet acknowledged.
    pub fn sequence_numbers_in_flight(&self) -> u64 {
        self.in_flight
    }

    pub fn consecutive_retransmissions(&self) -> u64 {
        self.retransmissions
    }

    /// The current retransmission timeout, in milliseconds.
    pub fn rto(&self) -> u64 {
        self.timer.rto()
    }

    pub fn fin_sent(&self) -> bool {
        self.fin_sent
    }

    /// The outbound stream, for the application to write into.
    pub fn input(&self) -> &ByteStream {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut ByteStream {
        &mut self.input
    }
}

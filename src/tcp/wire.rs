//! Carrying sender/receiver messages as real TCP segments inside IPv4.
use crate::error::ParseError;
use crate::ip::InternetDatagram;
use crate::tcp::message::{TcpReceiverMessage, TcpSenderMessage};
use crate::wrap32::Wrap32;
use etherparse::{IpNumber, PacketBuilder, TcpHeaderSlice};
use std::net::Ipv4Addr;

pub const DEFAULT_TTL: u8 = 64;

/// One TCP segment: the local sender's view of the stream plus the local
/// receiver's acknowledgment, as a single header would carry them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TcpSegment {
    pub src_port: u16,
    pub dst_port: u16,
    pub sender: TcpSenderMessage,
    pub receiver: TcpReceiverMessage,
}

impl TcpSegment {
    pub fn to_datagram(&self, src: Ipv4Addr, dst: Ipv4Addr) -> Result<InternetDatagram, ParseError> {
        let mut builder = PacketBuilder::ipv4(src.octets(), dst.octets(), DEFAULT_TTL).tcp(
            self.src_port,
            self.dst_port,
            self.sender.seqno.raw(),
            self.receiver.window_size,
        );

        builder = match self.sender.syn {
            true => builder.syn(),
            false => builder,
        };

        builder = match self.sender.fin {
            true => builder.fin(),
            false => builder,
        };

        builder = match self.sender.rst || self.receiver.rst {
            true => builder.rst(),
            false => builder,
        };

        builder = match self.receiver.ackno {
            Some(ackno) => builder.ack(ackno.raw()),
            None => builder,
        };

        let mut pkt = Vec::with_capacity(builder.size(self.sender.payload.len()));
        builder
            .write(&mut pkt, &self.sender.payload)
            .map_err(|e| ParseError::Tcp(e.to_string()))?;
        InternetDatagram::parse(&pkt)
    }

    pub fn from_datagram(dgram: &InternetDatagram) -> Result<Self, ParseError> {
        if dgram.header.protocol != IpNumber::TCP {
            return Err(ParseError::Tcp(format!(
                "not a TCP datagram (protocol {})",
                dgram.header.protocol.0
            )));
        }

        let tcp = TcpHeaderSlice::from_slice(&dgram.payload)
            .map_err(|e| ParseError::Tcp(e.to_string()))?;
        let payload = &dgram.payload[tcp.slice().len()..];

        let checksum = tcp
            .calc_checksum_ipv4_raw(dgram.header.source, dgram.header.destination, payload)
            .map_err(|e| ParseError::Tcp(e.to_string()))?;
        if checksum != tcp.checksum() {
            return Err(ParseError::BadChecksum("TCP"));
        }

        Ok(TcpSegment {
            src_port: tcp.source_port(),
            dst_port: tcp.destination_port(),
            sender: TcpSenderMessage {
                seqno: Wrap32::new(tcp.sequence_number()),
                syn: tcp.syn(),
                payload: payload.to_vec(),
                fin: tcp.fin(),
                rst: tcp.rst(),
            },
            receiver: TcpReceiverMessage {
                ackno: tcp.ack().then(|| Wrap32::new(tcp.acknowledgment_number())),
                window_size: tcp.window_size(),
                rst: tcp.rst(),
            },
        })
    }
}

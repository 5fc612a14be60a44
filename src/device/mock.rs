use crate::arp::ArpMessage;
use crate::ethernet::EthernetFrame;
use crate::ip::InternetDatagram;
use crate::Device;
use etherparse::EtherType;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use tracing::trace;

/// An in-memory link. Clones share the same queues, so a test keeps one
/// handle while the interface under test owns another.
#[derive(Clone)]
pub struct MockDevice {
    rx_queue: Arc<Mutex<VecDeque<Vec<u8>>>>,
    tx_log: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    drop_probability: Arc<Mutex<f32>>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            rx_queue: Arc::new(Mutex::new(VecDeque::new())),
            tx_log: Arc::new(Mutex::new(Vec::new())),
            drop_probability: Arc::new(Mutex::new(0.0)), // No frame loss by default
        }
    }

    pub fn inject_frame(&self, desc: &str, frame: &EthernetFrame) {
        trace!("🧪 INJECT: {} ({} bytes)", desc, frame.payload.len());
        self.rx_queue.lock().unwrap().push_back(frame.serialize());
    }

    /// Descriptions of everything sent so far, e.g. `"ARP request 10.0.0.2?"`.
    pub fn sent_descriptions(&self) -> Vec<String> {
        self.tx_log
            .lock()
            .unwrap()
            .iter()
            .map(|(desc, _)| desc.clone())
            .collect()
    }

    pub fn sent_frames(&self) -> Vec<EthernetFrame> {
        self.tx_log
            .lock()
            .unwrap()
            .iter()
            .map(|(_, bytes)| EthernetFrame::parse(bytes).unwrap())
            .collect()
    }

    /// Take every frame sent so far, leaving the log empty.
    pub fn take_sent(&self) -> Vec<EthernetFrame> {
        let frames = self.sent_frames();
        self.clear_sent();
        frames
    }

    pub fn clear_sent(&self) {
        self.tx_log.lock().unwrap().clear();
    }

    pub fn last_sent_frame(&self) -> Option<EthernetFrame> {
        self.tx_log
            .lock()
            .unwrap()
            .last()
            .map(|(_, bytes)| EthernetFrame::parse(bytes).unwrap())
    }

    /// Set frame loss probability (0.0 = no loss, 1.0 = drop all)
    pub fn set_drop_probability(&self, probability: f32) {
        *self.drop_probability.lock().unwrap() = probability.clamp(0.0, 1.0);
    }
}

fn describe(bytes: &[u8]) -> String {
    let Ok(frame) = EthernetFrame::parse(bytes) else {
        return "Unknown".to_string();
    };
    if frame.header.ether_type == EtherType::ARP {
        match ArpMessage::parse(&frame.payload) {
            Ok(arp) if arp.is_request() => format!("ARP request {}?", arp.target_ip_address),
            Ok(arp) => format!(
                "ARP reply {} is-at {}",
                arp.sender_ip_address, arp.sender_ethernet_address
            ),
            Err(_) => "ARP (malformed)".to_string(),
        }
    } else if frame.header.ether_type == EtherType::IPV4 {
        match InternetDatagram::parse(&frame.payload) {
            Ok(dgram) => format!(
                "IPv4 {} → {} ttl={} via {}",
                dgram.source(),
                dgram.destination(),
                dgram.ttl(),
                frame.header.dst
            ),
            Err(_) => "IPv4 (malformed)".to_string(),
        }
    } else {
        "Unknown".to_string()
    }
}

impl Device for MockDevice {
    fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut queue = self.rx_queue.lock().unwrap();
        match queue.pop_front() {
            Some(frame) => {
                let len = frame.len().min(buf.len());
                buf[..len].copy_from_slice(&frame[..len]);
                Ok(len)
            }
            None => Err(io::Error::from(io::ErrorKind::WouldBlock)),
        }
    }

    fn send(&self, buf: &[u8]) -> io::Result<usize> {
        let drop_probability = *self.drop_probability.lock().unwrap();
        if drop_probability > 0.0 && rand::random::<f32>() < drop_probability {
            trace!("🔥 DROPPING outgoing frame (simulation)");
            return Ok(buf.len());
        }

        let desc = describe(buf);
        trace!("📤 SEND: {} ({} bytes)", desc, buf.len());
        self.tx_log.lock().unwrap().push((desc, buf.to_vec()));
        Ok(buf.len())
    }
}

pub mod arp;
pub mod byte_stream;
pub mod clock;
pub mod config;
pub mod device;
pub mod error;
pub mod ethernet;
pub mod interface;
pub mod ip;
pub mod reassembler;
pub mod router;
pub mod tcp;
pub mod wrap32;

#[cfg(test)]
mod test;

pub use arp::ArpMessage;
pub use byte_stream::ByteStream;
pub use clock::{Clock, SystemClock, Ticker};
pub use config::HostConfig;
pub use device::{Device, Tap};
pub use error::{ConfigError, ParseError, RouteError};
pub use ethernet::{EthernetAddress, EthernetFrame, EthernetHeader};
pub use interface::NetworkInterface;
pub use ip::InternetDatagram;
pub use reassembler::Reassembler;
pub use router::{Route, Router};
pub use tcp::{TcpReceiver, TcpReceiverMessage, TcpSender, TcpSenderMessage};
pub use wrap32::Wrap32;

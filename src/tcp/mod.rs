mod config;
mod message;
mod receiver;
mod sender;
mod timer;
pub mod wire;

pub use self::config::{
    TcpConfig, DEFAULT_CAPACITY, MAX_PAYLOAD_SIZE, MAX_RETX_ATTEMPTS, TIMEOUT_DFLT,
};
pub use self::message::{TcpReceiverMessage, TcpSenderMessage};
pub use self::receiver::TcpReceiver;
pub use self::sender::TcpSender;
pub use self::timer::RetransmissionTimer;
pub use self::wire::TcpSegment;

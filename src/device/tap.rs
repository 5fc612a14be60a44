use crate::Device;
use std::io;
use std::sync::Arc;

/// A TAP device: the kernel hands us whole Ethernet frames.
///
/// Clones share the same underlying device, so one handle can sit inside a
/// `NetworkInterface` for sending while the driver loop reads from another.
#[derive(Clone)]
pub struct Tap {
    device: Arc<tun_tap::Iface>,
}

impl Tap {
    pub fn new(name: &str) -> io::Result<Self> {
        let device = tun_tap::Iface::without_packet_info(name, tun_tap::Mode::Tap)?;
        Ok(Self {
            device: Arc::new(device),
        })
    }

    pub fn name(&self) -> &str {
        self.device.name()
    }
}

impl Device for Tap {
    fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.device.recv(buf)
    }

    fn send(&self, buf: &[u8]) -> io::Result<usize> {
        self.device.send(buf)
    }
}

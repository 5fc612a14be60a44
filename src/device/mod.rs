mod tap;

pub use self::tap::Tap;

// Mock device for testing
#[cfg(test)]
pub mod mock;
#[cfg(test)]
pub use self::mock::MockDevice;

/// Raw Ethernet frame I/O underneath a network interface.
pub trait Device: Send {
    /// Receive one frame into `buf`, returning its length.
    fn recv(&self, buf: &mut [u8]) -> std::io::Result<usize>;

    /// Put one frame on the link.
    fn send(&self, buf: &[u8]) -> std::io::Result<usize>;
}

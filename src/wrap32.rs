//! 32-bit wrapping sequence numbers.
use std::fmt;
use std::ops::Add;

const SPAN: u64 = 1 << 32;
const HALF_SPAN: u64 = 1 << 31;

/// A position in a stream, modulo 2^32, relative to some zero point (the ISN).
///
/// TCP puts 32-bit sequence numbers on the wire, but the endpoints reason in
/// 64-bit absolute offsets that never wrap. `wrap` and `unwrap` convert
/// between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Wrap32(u32);

impl Wrap32 {
    pub const fn new(raw: u32) -> Self {
        Wrap32(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Convert an absolute offset into a wrapped value: `zero_point + n` mod 2^32.
    pub fn wrap(n: u64, zero_point: Wrap32) -> Self {
        zero_point + n as u32
    }

    /// Convert back to the absolute offset closest to `checkpoint`.
    ///
    /// Of all offsets that wrap to `self`, returns the one nearest the
    /// checkpoint. A value exactly 2^31 away in either direction resolves
    /// to the one above the checkpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use tinywire::Wrap32;
    /// let isn = Wrap32::new(u32::MAX);
    /// assert_eq!(Wrap32::new(0).unwrap(isn, 0), 1);
    /// assert_eq!(Wrap32::new(u32::MAX).unwrap(isn, 3 << 32), 3 << 32);
    /// ```
    pub fn unwrap(self, zero_point: Wrap32, checkpoint: u64) -> u64 {
        let anchor = Wrap32::wrap(checkpoint, zero_point);
        let up = self.0.wrapping_sub(anchor.0) as u64;
        if up == 0 {
            return checkpoint;
        }
        let down = SPAN - up;

        match checkpoint.checked_add(up) {
            Some(above) if up <= HALF_SPAN || checkpoint < down => above,
            // Either the lower value is closer, or going up would overflow.
            // In both cases checkpoint >= down.
            _ => checkpoint - down,
        }
    }
}

impl Add<u32> for Wrap32 {
    type Output = Wrap32;

    fn add(self, rhs: u32) -> Wrap32 {
        Wrap32(self.0.wrapping_add(rhs))
    }
}

impl fmt::Display for Wrap32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

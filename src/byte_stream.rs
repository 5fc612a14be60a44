//! Bounded in-memory byte pipe.
use std::collections::VecDeque;

/// A bounded FIFO of bytes with a writing side and a reading side.
///
/// One object carries both halves so the two can never disagree about what
/// is buffered. The writer pushes until the capacity is reached (anything past
/// that is silently dropped) and eventually closes; the reader peeks and pops.
/// Either side may flag an error, which is terminal.
#[derive(Debug)]
pub struct ByteStream {
    capacity: u64,
    buffer: VecDeque<u8>,
    bytes_pushed: u64,
    bytes_popped: u64,
    closed: bool,
    error: bool,
}

impl ByteStream {
    pub fn new(capacity: u64) -> Self {
        ByteStream {
            capacity,
            buffer: VecDeque::new(),
            bytes_pushed: 0,
            bytes_popped: 0,
            closed: false,
            error: false,
        }
    }

    // Writer side

    /// Append as much of `data` as fits. Returns the number of bytes accepted;
    /// a closed or errored stream accepts nothing.
    pub fn push(&mut self, data: &[u8]) -> usize {
        if self.closed || self.error {
            return 0;
        }
        let n = data.len().min(self.available_capacity() as usize);
        self.buffer.extend(&data[..n]);
        self.bytes_pushed += n as u64;
        n
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn set_error(&mut self) {
        self.error = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn available_capacity(&self) -> u64 {
        self.capacity - self.buffer.len() as u64
    }

    /// Total number of bytes ever accepted by `push`.
    pub fn bytes_pushed(&self) -> u64 {
        self.bytes_pushed
    }

    // Reader side

    /// A contiguous, non-empty prefix of the buffered bytes (empty only when
    /// nothing is buffered).
    pub fn peek(&self) -> &[u8] {
        self.buffer.as_slices().0
    }

    /// Discard up to `len` bytes from the front.
    pub fn pop(&mut self, len: u64) {
        let n = len.min(self.buffer.len() as u64);
        self.buffer.drain(..n as usize);
        self.bytes_popped += n;
    }

    /// Pop up to `len` bytes into a fresh vector.
    pub fn read_to_vec(&mut self, len: u64) -> Vec<u8> {
        let n = len.min(self.buffer.len() as u64) as usize;
        let out: Vec<u8> = self.buffer.drain(..n).collect();
        self.bytes_popped += n as u64;
        out
    }

    /// Closed and fully drained.
    pub fn is_finished(&self) -> bool {
        self.closed && self.buffer.is_empty()
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn bytes_buffered(&self) -> u64 {
        self.buffer.len() as u64
    }

    pub fn bytes_popped(&self) -> u64 {
        self.bytes_popped
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::ByteStream;

    #[test]
    fn test_push_truncates_to_capacity() {
        let mut stream = ByteStream::new(4);
        assert_eq!(stream.push(b"abcdef"), 4);
        assert_eq!(stream.available_capacity(), 0);
        assert_eq!(stream.bytes_pushed(), 4);
        assert_eq!(stream.peek(), b"abcd");
    }

    #[test]
    fn test_pop_frees_capacity() {
        let mut stream = ByteStream::new(4);
        stream.push(b"abcd");
        stream.pop(3);
        assert_eq!(stream.available_capacity(), 3);
        assert_eq!(stream.bytes_popped(), 3);
        stream.push(b"efg");
        assert_eq!(stream.read_to_vec(10), b"defg".to_vec());
        assert_eq!(stream.bytes_buffered(), 0);
    }

    #[test]
    fn test_close_then_drain_finishes() {
        let mut stream = ByteStream::new(8);
        stream.push(b"hi");
        stream.close();
        assert_eq!(stream.push(b"more"), 0);
        assert!(!stream.is_finished());
        stream.pop(2);
        assert!(stream.is_finished());
    }

    #[test]
    fn test_error_is_sticky() {
        let mut stream = ByteStream::new(8);
        assert!(!stream.has_error());
        stream.set_error();
        assert!(stream.has_error());
        assert_eq!(stream.push(b"late"), 0);
        assert_eq!(stream.bytes_pushed(), 0);
    }
}

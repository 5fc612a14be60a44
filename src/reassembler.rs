//! Reassembly of out-of-order substrings into an ordered byte stream.
use crate::byte_stream::ByteStream;
use std::collections::BTreeMap;
use tracing::trace;

/// Buffers substrings that arrive out of order and writes the contiguous
/// prefix into its output stream as soon as it is available.
///
/// Pending pieces are kept in a map keyed by their first index. Pieces never
/// overlap or touch: a new piece absorbs every neighbour it overlaps or abuts.
#[derive(Debug)]
pub struct Reassembler {
    output: ByteStream,
    pending: BTreeMap<u64, Vec<u8>>,
    bytes_pending: u64,
    last_index: Option<u64>,
}

impl Reassembler {
    pub fn new(output: ByteStream) -> Self {
        Reassembler {
            output,
            pending: BTreeMap::new(),
            bytes_pending: 0,
            last_index: None,
        }
    }

    /// Insert the substring `data` starting at stream index `first_index`.
    ///
    /// Bytes that fall outside the window `[next, next + available_capacity)`
    /// are discarded. `is_last_substring` marks the end of the stream: once
    /// everything up to it has been written, the output is closed.
    pub fn insert(&mut self, first_index: u64, data: &[u8], is_last_substring: bool) {
        let next = self.next_index();
        let capacity = self.output.available_capacity();
        let window_end = next + capacity;
        if self.output.is_closed() || capacity == 0 || first_index >= window_end {
            return;
        }

        let mut end = first_index + data.len() as u64;
        if end <= next && !is_last_substring {
            return;
        }
        if is_last_substring {
            self.last_index = Some(end);
        }
        end = end.min(window_end);

        let start = first_index.max(next);
        if start < end {
            let piece = &data[(start - first_index) as usize..(end - first_index) as usize];
            self.store(start, piece);
        }

        while let Some(entry) = self.pending.first_entry() {
            if *entry.key() != self.output.bytes_pushed() {
                break;
            }
            let bytes = entry.remove();
            self.bytes_pending -= bytes.len() as u64;
            trace!(index = self.output.bytes_pushed(), len = bytes.len(), "reassembled");
            self.output.push(&bytes);
        }

        if self.last_index == Some(self.next_index()) && self.pending.is_empty() {
            self.output.close();
        }
    }

    /// Merge `[start, start + piece.len())` into the pending set.
    fn store(&mut self, start: u64, piece: &[u8]) {
        let end = start + piece.len() as u64;

        // Every stored piece that overlaps or abuts the new range. Pieces are
        // disjoint and sorted, so their ends are sorted too.
        let touching: Vec<u64> = self
            .pending
            .range(..=end)
            .rev()
            .take_while(|&(&k, v)| k + v.len() as u64 >= start)
            .map(|(&k, _)| k)
            .collect();

        let mut merged_start = start;
        let mut merged = piece.to_vec();
        for key in touching {
            let Some(existing) = self.pending.remove(&key) else {
                continue;
            };
            self.bytes_pending -= existing.len() as u64;

            let merged_end = merged_start + merged.len() as u64;
            let existing_end = key + existing.len() as u64;
            if existing_end > merged_end {
                merged.extend_from_slice(&existing[(merged_end - key) as usize..]);
            }
            if key < merged_start {
                let mut front = existing[..(merged_start - key) as usize].to_vec();
                front.extend_from_slice(&merged);
                merged = front;
                merged_start = key;
            }
        }

        self.bytes_pending += merged.len() as u64;
        self.pending.insert(merged_start, merged);
    }

    /// Index of the next byte the output stream expects.
    pub fn next_index(&self) -> u64 {
        self.output.bytes_pushed()
    }

    /// Bytes held back waiting for earlier data.
    pub fn bytes_pending(&self) -> u64 {
        self.bytes_pending
    }

    pub fn output(&self) -> &ByteStream {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut ByteStream {
        &mut self.output
    }
}

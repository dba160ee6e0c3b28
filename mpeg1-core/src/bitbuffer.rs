// mpeg1-core
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `BitBuffer` is the bit-addressed byte store every other component in this workspace reads
//! from: the demuxer reads pack/system/PES headers from one, and hands each decoder its own
//! ring-mode buffer fed as packets of its stream arrive.
//!
//! Every read here is in-band-fallible rather than `Result`-returning: `has(n)` is the one
//! honest question this type answers, and every other read degrades to a zero/`false`/`-1`
//! sentinel when asked for more than is available. A caller that doesn't call `has` first gets
//! zeros, never a panic or UB — `read`/`skip` index only bytes already known to exist.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// One entry of a pre-built VLC decision table. `index == 0` marks a leaf: `value` is the
/// decoded symbol. Otherwise `index` is the base offset of this node's two children; reading
/// one bit selects `table[index + bit]`.
#[derive(Copy, Clone, Debug)]
pub struct VlcEntry {
    pub index: i16,
    pub value: i16,
}

impl VlcEntry {
    pub const fn new(index: i16, value: i16) -> Self {
        VlcEntry { index, value }
    }
}

/// Storage discipline of a `BitBuffer`.
enum Mode {
    /// Backed by an open file; `bytes` is a sliding window, refilled on demand.
    File { file: File, window_start: u64, total_size: u64 },
    /// A fixed, caller-supplied byte slice. Writes are rejected.
    FixedMem,
    /// A growable ring: `write` appends, `discard_read_bytes` compacts consumed bytes away so
    /// capacity isn't held hostage by a long-running stream.
    Ring,
    /// A growable, append-only buffer that never discards (used for small in-memory sources
    /// built up incrementally, e.g. the demuxer's probe window).
    Append,
}

/// A bit-addressed byte store unifying file, fixed-memory, ring, and append-only sources.
pub struct BitBuffer {
    mode: Mode,
    bytes: Vec<u8>,
    /// Valid byte count within `bytes` (bytes beyond this are stale capacity).
    length: usize,
    /// Read cursor, in bits, from the start of `bytes`.
    bit_index: usize,
    /// Total known size of the source in bytes, 0 if unknown (e.g. a live ring source).
    total_size: usize,
    has_ended: bool,
    /// When true, `write` (and the FILE-mode refill) compacts already-read bytes out of `bytes`
    /// before appending, keeping a ring buffer's memory bounded by the unread window rather than
    /// the whole stream.
    pub discard_read_bytes: bool,
    load_callback: Option<Box<dyn FnMut(&mut BitBuffer)>>,
}

const DEFAULT_CAPACITY: usize = 128 * 1024;
const FILE_WINDOW: usize = DEFAULT_CAPACITY;

impl BitBuffer {
    /// Wraps a caller-owned byte slice as a FIXED_MEM buffer: the whole source is known and
    /// immutable up front, writes are rejected.
    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        let length = bytes.len();
        BitBuffer {
            mode: Mode::FixedMem,
            bytes,
            length,
            bit_index: 0,
            total_size: length,
            has_ended: false,
            discard_read_bytes: false,
            load_callback: None,
        }
    }

    /// Opens a file as a FILE-mode buffer with a sliding read window.
    pub fn with_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Self::from_file(File::open(path)?)
    }

    /// Wraps an already-open file as a FILE-mode buffer, taking ownership of the handle.
    pub fn from_file(mut file: File) -> std::io::Result<Self> {
        let total_size = file.seek(SeekFrom::End(0))?;
        file.seek(SeekFrom::Start(0))?;
        Ok(BitBuffer {
            mode: Mode::File { file, window_start: 0, total_size },
            bytes: Vec::with_capacity(FILE_WINDOW),
            length: 0,
            bit_index: 0,
            total_size: total_size as usize,
            has_ended: false,
            discard_read_bytes: true,
            load_callback: None,
        })
    }

    /// Creates an empty RING-mode buffer: growable by `write`, compactable by
    /// `discard_read_bytes`, intended to be driven by a load-callback.
    pub fn ring(capacity: usize) -> Self {
        BitBuffer {
            mode: Mode::Ring,
            bytes: Vec::with_capacity(capacity.max(4096)),
            length: 0,
            bit_index: 0,
            total_size: 0,
            has_ended: false,
            discard_read_bytes: true,
            load_callback: None,
        }
    }

    /// Creates an empty APPEND-only buffer: growable by `write`, never compacted.
    pub fn append(capacity: usize) -> Self {
        BitBuffer {
            mode: Mode::Append,
            bytes: Vec::with_capacity(capacity.max(4096)),
            length: 0,
            bit_index: 0,
            total_size: 0,
            has_ended: false,
            discard_read_bytes: false,
            load_callback: None,
        }
    }

    pub fn set_load_callback<F: FnMut(&mut BitBuffer) + 'static>(&mut self, callback: F) {
        self.load_callback = Some(Box::new(callback));
    }

    pub fn has_ended(&self) -> bool {
        self.has_ended
    }

    /// Marks the current contents as final: no more writes will arrive. `has_ended` turns on as
    /// soon as a read exhausts what's buffered (immediately, if everything was already read).
    pub fn signal_end(&mut self) {
        self.total_size = self.length;
        if self.bit_index >= self.length * 8 {
            self.has_ended = true;
        }
    }

    pub fn bit_index(&self) -> usize {
        self.bit_index
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Absolute byte position of the read cursor within the whole source (not just the
    /// currently-buffered window). This is the position `seek` accepts.
    pub fn tell(&self) -> usize {
        match &self.mode {
            Mode::File { window_start, .. } => *window_start as usize + (self.bit_index >> 3),
            _ => self.bit_index >> 3,
        }
    }

    /// Appends `data`. In RING/APPEND mode capacity doubles until it fits; FIXED_MEM rejects
    /// writes outright (there is nothing sensible to grow: the whole source was given up front).
    pub fn write(&mut self, data: &[u8]) -> bool {
        match self.mode {
            Mode::FixedMem | Mode::File { .. } => false,
            Mode::Ring | Mode::Append => {
                if self.discard_read_bytes {
                    self.discard_read_bytes();
                    if matches!(self.mode, Mode::Ring) {
                        // New data supersedes any earlier end-of-content signal.
                        self.total_size = 0;
                    }
                }
                let needed = self.length + data.len();
                if needed > self.bytes.capacity() {
                    let mut new_cap = self.bytes.capacity().max(4096);
                    while new_cap < needed {
                        new_cap *= 2;
                    }
                    self.bytes.reserve(new_cap - self.bytes.capacity());
                }
                self.bytes.truncate(self.length);
                self.bytes.extend_from_slice(data);
                self.length += data.len();
                true
            }
        }
    }

    /// Compacts bytes already consumed out of the front of the window. No-op unless
    /// `discard_read_bytes` is set.
    pub fn discard_read_bytes(&mut self) {
        if !self.discard_read_bytes {
            return;
        }
        let consumed_bytes = self.bit_index >> 3;
        if consumed_bytes == 0 {
            return;
        }
        match &mut self.mode {
            Mode::File { window_start, .. } => {
                *window_start += consumed_bytes as u64;
            }
            _ => {}
        }
        self.bytes.drain(0..consumed_bytes);
        self.length -= consumed_bytes;
        self.bit_index -= consumed_bytes * 8;
    }

    /// Refills the window from a file source, if this is a FILE buffer.
    fn load_from_file(&mut self) {
        if let Mode::File { file, .. } = &mut self.mode {
            let mut chunk = vec![0u8; FILE_WINDOW];
            match file.read(&mut chunk) {
                Ok(0) => self.has_ended = true,
                Ok(n) => {
                    chunk.truncate(n);
                    self.bytes.truncate(self.length);
                    self.bytes.extend_from_slice(&chunk);
                    self.length += n;
                }
                Err(_) => self.has_ended = true,
            }
        }
    }

    /// Returns true if `n_bits` are available to read right now, triggering at most one
    /// load-callback invocation (or file read) if not.
    pub fn has(&mut self, n_bits: usize) -> bool {
        if self.bit_index + n_bits <= self.length * 8 {
            return true;
        }

        if matches!(self.mode, Mode::File { .. }) {
            self.discard_read_bytes();
            self.load_from_file();
        } else if let Some(mut callback) = self.load_callback.take() {
            callback(self);
            self.load_callback = Some(callback);
        }

        if self.bit_index + n_bits <= self.length * 8 {
            return true;
        }

        if self.total_size != 0 && self.length >= self.total_size {
            self.has_ended = true;
        }
        false
    }

    /// Reads `n_bits` (1..=32) MSB-first, crossing byte boundaries; returns 0 if unavailable.
    pub fn read(&mut self, n_bits: usize) -> u32 {
        debug_assert!(n_bits > 0 && n_bits <= 32);
        if !self.has(n_bits) {
            return 0;
        }
        let mut value: u32 = 0;
        let mut remaining = n_bits;
        while remaining > 0 {
            let byte_index = self.bit_index >> 3;
            let bit_offset = self.bit_index & 7;
            let bits_left_in_byte = 8 - bit_offset;
            let take = remaining.min(bits_left_in_byte);
            let byte = self.bytes[byte_index] as u32;
            let shift = bits_left_in_byte - take;
            let mask = (1u32 << take) - 1;
            value = (value << take) | ((byte >> shift) & mask);
            self.bit_index += take;
            remaining -= take;
        }
        value
    }

    /// Rounds `bit_index` up to the next byte boundary.
    pub fn align(&mut self) {
        self.bit_index = (self.bit_index + 7) & !7;
    }

    /// Advances the cursor by `n_bits` only if they are available.
    pub fn skip(&mut self, n_bits: usize) -> bool {
        if self.has(n_bits) {
            self.bit_index += n_bits;
            true
        } else {
            false
        }
    }

    /// Aligns, then advances one byte at a time while the next byte equals `v`. Returns the
    /// count of bytes skipped (0 if the first byte already differs).
    pub fn skip_bytes(&mut self, v: u8) -> usize {
        self.align();
        let mut count = 0;
        while self.has(8) {
            let byte_index = self.bit_index >> 3;
            if self.bytes[byte_index] != v {
                break;
            }
            self.bit_index += 8;
            count += 1;
        }
        count
    }

    /// Aligns, scans forward for a `00 00 01` prefix, and consumes the fourth byte as the
    /// returned start-code value. Returns -1 if none is found before data runs out.
    pub fn next_start_code(&mut self) -> i32 {
        self.align();
        while self.has(4 * 8) {
            let byte_index = self.bit_index >> 3;
            if self.bytes[byte_index] == 0x00
                && self.bytes[byte_index + 1] == 0x00
                && self.bytes[byte_index + 2] == 0x01
            {
                self.bit_index += 3 * 8;
                return self.read(8) as i32;
            }
            self.bit_index += 8;
        }
        -1
    }

    /// Repeats `next_start_code` until `code` is found or the stream runs out.
    pub fn find_start_code(&mut self, code: i32) -> i32 {
        loop {
            let found = self.next_start_code();
            if found == code || found == -1 {
                return found;
            }
        }
    }

    /// Non-consuming variant of `find_start_code`: restores the cursor and discard policy
    /// afterwards so a probe doesn't disturb what the caller was in the middle of reading.
    pub fn has_start_code(&mut self, code: i32) -> bool {
        let saved_index = self.bit_index;
        let saved_discard = self.discard_read_bytes;
        self.discard_read_bytes = false;
        let found = self.find_start_code(code);
        self.bit_index = saved_index;
        self.discard_read_bytes = saved_discard;
        found == code
    }

    /// Reads `n` bits, rewinds, and reports whether the value was non-zero.
    pub fn peek_non_zero(&mut self, n: usize) -> bool {
        let saved = self.bit_index;
        let value = self.read(n);
        self.bit_index = saved;
        value != 0
    }

    /// Traverses a VLC decision table, returning the decoded signed 16-bit symbol. An `index`
    /// of 0 marks a normal leaf; a negative `index` marks a code the table's author never
    /// expects a conformant stream to reach (reserved/invalid bit patterns) — both are treated
    /// as terminal so malformed input decodes to a value rather than indexing out of bounds.
    pub fn read_vlc(&mut self, table: &[VlcEntry]) -> i16 {
        let mut state = 0i32;
        loop {
            let bit = self.read(1) as i32;
            state = table[state as usize].index as i32 + bit;
            let entry = &table[state as usize];
            if entry.index <= 0 {
                return entry.value;
            }
        }
    }

    /// As `read_vlc`, but reinterprets the decoded value as unsigned.
    pub fn read_vlc_uint(&mut self, table: &[VlcEntry]) -> u16 {
        self.read_vlc(table) as u16
    }

    /// Repositions the cursor to byte `pos`. FILE reloads its window around `pos`; RING only
    /// supports `pos == 0`, which empties the buffer entirely (there is no random access into a
    /// stream that may have already discarded earlier bytes); FIXED_MEM/APPEND reposition the
    /// cursor within their buffered contents.
    pub fn seek(&mut self, pos: usize) -> bool {
        self.has_ended = false;
        match &mut self.mode {
            Mode::File { file, window_start, .. } => {
                if file.seek(SeekFrom::Start(pos as u64)).is_err() {
                    return false;
                }
                *window_start = pos as u64;
                self.bytes.clear();
                self.length = 0;
                self.bit_index = 0;
                true
            }
            Mode::Ring => {
                if pos != 0 {
                    return false;
                }
                self.bit_index = 0;
                self.length = 0;
                self.bytes.clear();
                self.total_size = 0;
                true
            }
            Mode::FixedMem | Mode::Append => {
                if pos > 0 && pos >= self.length {
                    return false;
                }
                self.bit_index = pos * 8;
                true
            }
        }
    }

    pub fn rewind(&mut self) -> bool {
        self.seek(0)
    }

    /// Restores a cursor position previously obtained from `bit_index()` on this same buffer.
    /// Used by save/restore probes (`Demuxer::get_start_time`, `get_duration`) that need to
    /// return to an exact in-window bit position rather than a byte offset `seek` would round
    /// to, without re-triggering a file/ring reload.
    pub fn set_bit_index(&mut self, bit_index: usize) {
        self.bit_index = bit_index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_matches_written_bits() {
        let mut buf = BitBuffer::with_bytes(vec![0b1010_1100, 0b1111_0000]);
        assert_eq!(buf.read(4), 0b1010);
        assert_eq!(buf.read(4), 0b1100);
        assert_eq!(buf.read(8), 0b1111_0000);
    }

    #[test]
    fn read_underflow_yields_zero() {
        let mut buf = BitBuffer::with_bytes(vec![0xFF]);
        buf.read(8);
        assert!(!buf.has(1));
        assert_eq!(buf.read(8), 0);
    }

    #[test]
    fn align_rounds_up_to_byte() {
        let mut buf = BitBuffer::with_bytes(vec![0xFF, 0xAA]);
        buf.read(3);
        buf.align();
        assert_eq!(buf.bit_index(), 8);
    }

    #[test]
    fn skip_bytes_counts_matching_stuffing() {
        let mut buf = BitBuffer::with_bytes(vec![0xFF, 0xFF, 0xFF, 0x01]);
        assert_eq!(buf.skip_bytes(0xFF), 3);
        assert_eq!(buf.read(8), 0x01);
    }

    #[test]
    fn next_start_code_lands_byte_aligned_after_prefix() {
        let mut buf = BitBuffer::with_bytes(vec![0x00, 0x00, 0x00, 0x01, 0xB3, 0x00]);
        let code = buf.next_start_code();
        assert_eq!(code, 0xB3);
        assert_eq!(buf.bit_index() % 8, 0);
    }

    #[test]
    fn next_start_code_returns_negative_one_when_absent() {
        let mut buf = BitBuffer::with_bytes(vec![0x11, 0x22, 0x33, 0x44]);
        assert_eq!(buf.next_start_code(), -1);
    }

    #[test]
    fn has_start_code_does_not_move_cursor() {
        let mut buf = BitBuffer::with_bytes(vec![0x00, 0x00, 0x01, 0xB3, 0xAA]);
        let before = buf.bit_index();
        assert!(buf.has_start_code(0xB3));
        assert_eq!(buf.bit_index(), before);
    }

    #[test]
    fn ring_write_then_read_round_trips() {
        let mut buf = BitBuffer::ring(16);
        assert!(buf.write(&[1, 2, 3, 4]));
        assert_eq!(buf.read(32), 0x01020304);
    }

    #[test]
    fn fixed_mem_rejects_writes() {
        let mut buf = BitBuffer::with_bytes(vec![0u8; 4]);
        assert!(!buf.write(&[1, 2, 3]));
    }

    #[test]
    fn load_callback_feeds_ring_on_demand() {
        let mut buf = BitBuffer::ring(16);
        buf.set_load_callback(|b: &mut BitBuffer| {
            b.write(&[0xAB]);
        });
        // Empty until has() pulls a byte through the callback.
        assert!(buf.has(8));
        assert_eq!(buf.read(8), 0xAB);
    }

    #[test]
    fn signal_end_flags_once_consumed() {
        let mut buf = BitBuffer::ring(16);
        buf.write(&[0x01]);
        buf.signal_end();
        assert!(!buf.has_ended());
        buf.read(8);
        assert!(!buf.has(8));
        assert!(buf.has_ended());
    }

    #[test]
    fn append_mode_grows_and_keeps_history() {
        let mut buf = BitBuffer::append(8);
        for chunk in [[1u8, 2], [3, 4], [5, 6]] {
            assert!(buf.write(&chunk));
        }
        assert_eq!(buf.read(16), 0x0102);
        // Unlike a ring, an append buffer can seek back into consumed bytes.
        assert!(buf.seek(1));
        assert_eq!(buf.read(16), 0x0203);
    }

    #[test]
    fn ring_rewind_discards_contents() {
        let mut buf = BitBuffer::ring(16);
        buf.write(&[1, 2, 3]);
        buf.read(8);
        assert!(buf.rewind());
        assert!(!buf.has(1));
    }

    #[test]
    fn read_vlc_traverses_table() {
        // A two-symbol table: bit 0 -> value 10, bit 1 -> value 20.
        let table = [
            VlcEntry::new(1, 0),
            VlcEntry::new(0, 10),
            VlcEntry::new(0, 20),
        ];
        let mut buf = BitBuffer::with_bytes(vec![0b1000_0000]);
        assert_eq!(buf.read_vlc(&table), 20);
        let mut buf2 = BitBuffer::with_bytes(vec![0b0000_0000]);
        assert_eq!(buf2.read_vlc(&table), 10);
    }
}

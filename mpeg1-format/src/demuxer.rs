// mpeg1-format
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `Demuxer` wraps a single `BitBuffer` source and turns it into a sequence of `Packet`s,
//! one per PES header it finds. It is a single concrete reader for exactly one container
//! (MPEG-1 Program Stream) — a probe-by-score format registry would be pure ceremony when
//! there's only ever one format to recognize.

use log::{debug, warn};
use mpeg1_core::packet::stream_id;
use mpeg1_core::units::INVALID_TS;
use mpeg1_core::{BitBuffer, Packet};

/// A packet header the demuxer has parsed but whose body wasn't fully available yet; kept so
/// the next `decode()` call resumes at the body instead of re-parsing the header.
#[derive(Clone)]
struct PendingHeader {
    kind: u8,
    length: usize,
    pts: f64,
}

/// Result of `Demuxer::probe`: which stream kinds were observed within the probe window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProbeResult {
    pub has_video: bool,
    pub has_audio: [bool; 4],
}

impl ProbeResult {
    pub fn any_audio(&self) -> bool {
        self.has_audio.iter().any(|&b| b)
    }
}

pub struct Demuxer {
    buffer: BitBuffer,
    has_headers: bool,
    num_audio_streams: u8,
    num_video_streams: u8,
    start_code: i32,
    pending: Option<PendingHeader>,
    last_decoded_pts: f64,
    start_time: f64,
    duration: f64,
    last_file_size: usize,
}

impl Demuxer {
    pub fn new(buffer: BitBuffer) -> Self {
        Demuxer {
            buffer,
            has_headers: false,
            num_audio_streams: 0,
            num_video_streams: 0,
            start_code: -1,
            pending: None,
            last_decoded_pts: 0.0,
            start_time: INVALID_TS,
            duration: INVALID_TS,
            last_file_size: 0,
        }
    }

    pub fn num_video_streams(&self) -> u8 {
        self.num_video_streams
    }

    pub fn num_audio_streams(&self) -> u8 {
        self.num_audio_streams
    }

    /// True once the underlying source has been fully consumed.
    pub fn has_ended(&self) -> bool {
        self.buffer.has_ended()
    }

    /// Parses the PACK and SYSTEM headers once; idempotent once `has_headers` is set.
    pub fn has_headers(&mut self) -> bool {
        if self.has_headers {
            return true;
        }
        if self.buffer.find_start_code(stream_id::PACK as i32) == -1 {
            return false;
        }
        if self.buffer.read(4) != 0b0010 {
            warn!("PACK header missing the 0010 marker bits");
            return false;
        }
        // SCR: same [3][marker][15][marker][15][marker] layout as a PES timestamp; the value
        // itself isn't needed to establish the headers, only consumed to advance the cursor.
        let _scr = self.decode_timestamp();
        self.buffer.skip(1 + 22 + 1); // mux_rate envelope

        if self.buffer.find_start_code(stream_id::SYSTEM as i32) == -1 {
            return false;
        }
        self.buffer.skip(16); // header_length
        self.buffer.skip(24); // rate bound
        self.num_audio_streams = self.buffer.read(6) as u8;
        self.buffer.skip(5);
        self.num_video_streams = self.buffer.read(5) as u8;

        self.has_headers = true;
        true
    }

    /// Scans up to `limit_bytes` of start codes from the current position, updating the
    /// detected stream counts; restores the cursor before returning.
    pub fn probe(&mut self, limit_bytes: usize) -> ProbeResult {
        let previous_pos = self.buffer.tell();
        let mut result = ProbeResult::default();

        loop {
            let code = self.buffer.next_start_code();
            if code == -1 {
                break;
            }
            if code == stream_id::VIDEO_1 as i32 {
                result.has_video = true;
            } else if (stream_id::AUDIO_1 as i32..=stream_id::AUDIO_4 as i32).contains(&code) {
                result.has_audio[(code - stream_id::AUDIO_1 as i32) as usize] = true;
            }
            if self.buffer.tell().saturating_sub(previous_pos) >= limit_bytes {
                break;
            }
        }

        self.num_video_streams = result.has_video as u8;
        self.num_audio_streams = result.has_audio.iter().filter(|&&b| b).count() as u8;

        self.buffer_seek(previous_pos);
        result
    }

    /// Raw reposition used by `seek`: jumps to a byte offset and drops any in-flight packet
    /// parsing state, unlike the cursor-preserving `probe`/`get_start_time` save-restore.
    fn buffer_seek(&mut self, pos: usize) -> bool {
        self.start_code = -1;
        self.pending = None;
        self.buffer.seek(pos)
    }

    /// Decodes a 33-bit, 90 kHz clock value laid out as `[3][marker][15][marker][15][marker]`.
    fn decode_timestamp(&mut self) -> f64 {
        let mut clock: u64 = (self.buffer.read(3) as u64) << 30;
        self.buffer.skip(1);
        clock |= (self.buffer.read(15) as u64) << 15;
        self.buffer.skip(1);
        clock |= self.buffer.read(15) as u64;
        self.buffer.skip(1);
        clock as f64 / 90_000.0
    }

    /// Parses one PES packet header starting right after its start-code prefix, then reads the
    /// body. `kind` is the start-code byte already consumed by the caller.
    fn decode_packet(&mut self, kind: i32) -> Option<Packet> {
        if !self.buffer.has(16 * 8) {
            self.start_code = kind;
            return None;
        }
        self.start_code = -1;

        let mut length = self.buffer.read(16) as i64;
        length -= self.buffer.skip_bytes(0xFF) as i64;

        if self.buffer.read(2) == 0b01 {
            self.buffer.skip(16);
            length -= 2;
        }

        let pts_dts_marker = self.buffer.read(2);
        let pts = match pts_dts_marker {
            0b11 => {
                let pts = self.decode_timestamp();
                self.buffer.skip(40); // DTS, unused
                length -= 10;
                pts
            }
            0b10 => {
                let pts = self.decode_timestamp();
                length -= 5;
                pts
            }
            0b00 => {
                self.buffer.skip(4);
                length -= 1;
                INVALID_TS
            }
            _ => {
                debug!("invalid PTS/DTS marker {:#04b}", pts_dts_marker);
                return None;
            }
        };

        if pts.is_finite() {
            self.last_decoded_pts = pts;
        }

        let length = length.max(0) as usize;
        self.get_packet_body(PendingHeader { kind: kind as u8, length, pts })
    }

    fn get_packet_body(&mut self, header: PendingHeader) -> Option<Packet> {
        if !self.buffer.has(header.length * 8) {
            self.pending = Some(header);
            return None;
        }
        let mut data = Vec::with_capacity(header.length);
        for _ in 0..header.length {
            data.push(self.buffer.read(8) as u8);
        }
        Some(Packet::new(header.kind, header.pts, data))
    }

    /// Returns the next elementary-stream packet (video, private, or one of the four audio
    /// streams); container-level codes (PACK, SYSTEM, end-of-stream, extensions) are skipped.
    pub fn decode(&mut self) -> Option<Packet> {
        if !self.has_headers() {
            return None;
        }

        if let Some(pending) = self.pending.take() {
            return self.get_packet_body(pending);
        }

        if self.start_code != -1 {
            let code = self.start_code;
            return self.decode_packet(code);
        }

        loop {
            self.start_code = self.buffer.next_start_code();
            if self.start_code == -1 {
                return None;
            }
            if stream_id::is_stream_packet(self.start_code) {
                let code = self.start_code;
                return self.decode_packet(code);
            }
        }
    }

    /// Rewinds and scans forward for the first packet of `kind` carrying a PTS; restores the
    /// original cursor before returning. The result is cached across calls.
    pub fn get_start_time(&mut self, kind: u8) -> f64 {
        if self.start_time.is_finite() {
            return self.start_time;
        }

        let previous_pos = self.buffer.tell();
        let saved_start_code = self.start_code;

        self.rewind();
        while let Some(packet) = self.decode() {
            if packet.kind == kind && packet.has_pts() {
                self.start_time = packet.pts;
                break;
            }
        }

        self.buffer_seek(previous_pos);
        self.start_code = saved_start_code;
        self.start_time
    }

    /// Scans a growing tail window (64 KiB, doubling up to 4 MiB) for the last PTS of `kind`;
    /// duration is that PTS minus the stream's start time for `kind`. Cached until the backing
    /// source grows.
    pub fn get_duration(&mut self, kind: u8) -> f64 {
        let file_size = self.buffer.total_size();
        if self.duration.is_finite() && self.last_file_size == file_size {
            return self.duration;
        }
        if file_size == 0 {
            return 0.0;
        }

        let previous_pos = self.buffer.tell();
        let saved_start_code = self.start_code;

        let mut range = 64 * 1024usize;
        let max_range = 4096 * 1024usize;
        while range <= max_range {
            let seek_pos = if file_size < range {
                range = max_range; // bail after this round
                0
            } else {
                file_size - range
            };
            self.buffer_seek(seek_pos);

            let mut last_pts = INVALID_TS;
            while let Some(packet) = self.decode() {
                if packet.kind == kind && packet.has_pts() {
                    last_pts = packet.pts;
                }
            }
            if last_pts.is_finite() {
                self.duration = last_pts - self.get_start_time(kind);
                break;
            }
            range *= 2;
        }

        self.buffer_seek(previous_pos);
        self.start_code = saved_start_code;
        self.last_file_size = file_size;

        if self.duration.is_finite() {
            self.duration
        } else {
            0.0
        }
    }

    /// True if `data` (a raw packet body) contains a PICTURE start code whose picture_type
    /// field marks it intra (I-frame). Scans for `00 00 01 00` rather than assuming the
    /// picture header starts at offset 0 (there can be leading sequence-header bytes in the
    /// same packet, e.g. right after a GOP boundary).
    fn packet_has_intra_picture(data: &[u8]) -> bool {
        if data.len() < 6 {
            return false;
        }
        for i in 0..=data.len() - 6 {
            if data[i] == 0x00 && data[i + 1] == 0x00 && data[i + 2] == 0x01 && data[i + 3] == 0x00
            {
                return (data[i + 5] & 0x38) == 0x08;
            }
        }
        false
    }

    /// Iterative byte-rate-estimate seek: jump to the position the current byte-rate estimate
    /// predicts for `time`, scan packets of `kind` in the surrounding span, and either commit
    /// to the last matching packet found or refine the estimate and retry (32 attempts). With
    /// `force_intra`, only packets containing an intra picture are acceptable targets.
    pub fn seek(&mut self, time: f64, kind: u8, force_intra: bool) -> Option<Packet> {
        if !self.has_headers() {
            return None;
        }

        let duration = self.get_duration(kind);
        let file_size = self.buffer.total_size();
        if duration <= 0.0 || file_size == 0 {
            return None;
        }

        let mut byterate = file_size as f64 / duration;
        let mut cur_time = self.last_decoded_pts;
        let mut scan_span = 1.0f64;

        let mut seek_time = time.clamp(0.0, duration);
        seek_time += self.get_start_time(kind);

        for _ in 0..32 {
            let mut found_packet_with_pts = false;
            let mut found_packet_in_range = false;
            let mut last_valid_packet_start: Option<usize> = None;
            let mut first_packet_time = INVALID_TS;

            let cur_pos = self.buffer.tell();

            let offset = ((seek_time - cur_time - scan_span) * byterate) as i64;
            let mut seek_pos = cur_pos as i64 + offset;
            seek_pos = seek_pos.clamp(0, (file_size as i64 - 256).max(0));
            let seek_pos = seek_pos as usize;

            self.buffer_seek(seek_pos);

            while self.buffer.find_start_code(kind as i32) != -1 {
                let packet_start = self.buffer.tell();
                let packet = self.decode_packet(kind as i32);

                let packet = match packet {
                    Some(p) if p.has_pts() => p,
                    _ => continue,
                };

                if packet.pts > seek_time || packet.pts < seek_time - scan_span {
                    found_packet_with_pts = true;
                    byterate = (seek_pos as f64 - cur_pos as f64) / (packet.pts - cur_time);
                    cur_time = packet.pts;
                    break;
                }

                if !found_packet_in_range {
                    found_packet_in_range = true;
                    first_packet_time = packet.pts;
                }

                if force_intra {
                    if Self::packet_has_intra_picture(&packet.data) {
                        last_valid_packet_start = Some(packet_start);
                    }
                } else {
                    last_valid_packet_start = Some(packet_start);
                }
            }

            if let Some(pos) = last_valid_packet_start {
                self.buffer_seek(pos);
                return self.decode_packet(kind as i32);
            } else if found_packet_in_range {
                scan_span *= 2.0;
                seek_time = first_packet_time;
            } else if !found_packet_with_pts {
                byterate = (seek_pos as f64 - cur_pos as f64) / (duration - cur_time);
                cur_time = duration;
            }
        }

        None
    }

    pub fn rewind(&mut self) {
        self.buffer_seek(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack_header() -> Vec<u8> {
        // 00 00 01 BA, then "0010" + 33-bit SCR (zero) across 3 marker bits, then mux_rate
        // envelope (24 bits). Constructed bit-by-bit for clarity.
        let mut bits: Vec<u8> = Vec::new();
        let push_bits = |bits: &mut Vec<u8>, value: u64, n: u32| {
            for i in (0..n).rev() {
                bits.push(((value >> i) & 1) as u8);
            }
        };
        push_bits(&mut bits, 0b0010, 4);
        push_bits(&mut bits, 0, 3);
        push_bits(&mut bits, 1, 1); // marker
        push_bits(&mut bits, 0, 15);
        push_bits(&mut bits, 1, 1); // marker
        push_bits(&mut bits, 0, 15);
        push_bits(&mut bits, 1, 1); // marker
        push_bits(&mut bits, 0, 24); // mux rate envelope

        let mut out = vec![0x00, 0x00, 0x01, stream_id::PACK];
        for chunk in bits.chunks(8) {
            let mut byte = 0u8;
            for (i, b) in chunk.iter().enumerate() {
                byte |= b << (7 - i);
            }
            out.push(byte);
        }
        out
    }

    fn system_header() -> Vec<u8> {
        let mut out = vec![0x00, 0x00, 0x01, stream_id::SYSTEM];
        out.extend_from_slice(&[0, 0]); // header_length (unused, 16 bits)
        out.extend_from_slice(&[0, 0, 0]); // rate bound (24 bits)
        // audio_bound(6) | 5 flag bits | video_bound(5) == 16 bits total.
        let audio_bound = 1u16;
        let video_bound = 1u16;
        let word = (audio_bound << 10) | (0b00000 << 5) | video_bound;
        out.extend_from_slice(&word.to_be_bytes());
        out
    }

    #[test]
    fn parses_pack_and_system_headers() {
        let mut bytes = pack_header();
        bytes.extend(system_header());
        let mut demuxer = Demuxer::new(BitBuffer::with_bytes(bytes));
        assert!(demuxer.has_headers());
        assert_eq!(demuxer.num_video_streams(), 1);
        assert_eq!(demuxer.num_audio_streams(), 1);
    }

    #[test]
    fn decodes_a_video_packet_with_pts() {
        let mut bytes = pack_header();
        bytes.extend(system_header());

        // A minimal VIDEO_1 packet: a 5-byte PTS-only header (the leading `0010` nibble covers
        // the no-P-STD and PTS-only markers) followed by 2 payload bytes.
        let mut packet = vec![0x00, 0x00, 0x01, stream_id::VIDEO_1];
        let payload = [0xAAu8, 0xBB];
        let body_bits_len = 4 + 3 + 1 + 15 + 1 + 15 + 1 + payload.len() * 8;
        let length = (body_bits_len / 8) as u16;
        packet.extend_from_slice(&length.to_be_bytes());

        let mut bits: Vec<u8> = vec![0, 0, 1, 0]; // no P-STD info, PTS-only marker
        let push_bits = |bits: &mut Vec<u8>, value: u64, n: u32| {
            for i in (0..n).rev() {
                bits.push(((value >> i) & 1) as u8);
            }
        };
        push_bits(&mut bits, 0, 3);
        push_bits(&mut bits, 1, 1);
        push_bits(&mut bits, 0, 15);
        push_bits(&mut bits, 1, 1);
        push_bits(&mut bits, 0, 15);
        push_bits(&mut bits, 1, 1);
        for b in &payload {
            push_bits(&mut bits, *b as u64, 8);
        }
        for chunk in bits.chunks(8) {
            let mut byte = 0u8;
            for (i, b) in chunk.iter().enumerate() {
                byte |= b << (7 - i);
            }
            packet.push(byte);
        }

        bytes.extend(packet);

        let mut demuxer = Demuxer::new(BitBuffer::with_bytes(bytes));
        let decoded = demuxer.decode().expect("expected a decoded packet");
        assert_eq!(decoded.kind, stream_id::VIDEO_1);
        assert!(decoded.has_pts());
        assert_eq!(&*decoded.data, &payload[..]);
    }
}

// mpeg1-video
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed tables from ISO/IEC 11172-2: start codes, picture rates, quantization matrices,
//! zig-zag scan order, and the variable-length-code decision tables for macroblock addressing,
//! macroblock type, coded block pattern, motion vectors, DCT coefficient size, and run/level
//! DCT coefficients.
//!
//! Every VLC table is a flat array of `VlcEntry { index, value }` pairs read by
//! `BitBuffer::read_vlc`: starting at index 0, each bit read selects `table[index + bit]`;
//! `index <= 0` means that entry is a leaf (or a reserved code no conformant stream produces)
//! and `value` is the decoded symbol.

use mpeg1_core::VlcEntry;

pub const START_PICTURE: i32 = 0x00;
pub const START_SLICE_FIRST: i32 = 0x01;
pub const START_SLICE_LAST: i32 = 0xAF;
pub const START_USER_DATA: i32 = 0xB2;
pub const START_SEQUENCE: i32 = 0xB3;
pub const START_EXTENSION: i32 = 0xB5;

#[inline]
pub fn is_slice_start(code: i32) -> bool {
    (START_SLICE_FIRST..=START_SLICE_LAST).contains(&code)
}

pub const PICTURE_TYPE_INTRA: u8 = 1;
pub const PICTURE_TYPE_PREDICTIVE: u8 = 2;
pub const PICTURE_TYPE_B: u8 = 3;

pub const PICTURE_RATE: [f64; 16] = [
    0.000, 23.976, 24.000, 25.000, 29.970, 30.000, 50.000, 59.940, 60.000, 0.000, 0.000, 0.000,
    0.000, 0.000, 0.000, 0.000,
];

pub const ZIG_ZAG: [u8; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27,
    20, 13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58,
    59, 52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

pub const INTRA_QUANT_MATRIX: [u8; 64] = [
    8, 16, 19, 22, 26, 27, 29, 34, 16, 16, 22, 24, 27, 29, 34, 37, 19, 22, 26, 27, 29, 34, 34, 38,
    22, 22, 26, 27, 29, 34, 37, 40, 22, 26, 27, 29, 32, 35, 40, 48, 26, 27, 29, 32, 35, 40, 48,
    58, 26, 27, 29, 34, 38, 46, 56, 69, 27, 29, 35, 38, 46, 56, 69, 83,
];

pub const NON_INTRA_QUANT_MATRIX: [u8; 64] = [16; 64];

pub const PREMULTIPLIER_MATRIX: [i32; 64] = [
    32, 44, 42, 38, 32, 25, 17, 9, 44, 62, 58, 52, 44, 35, 24, 12, 42, 58, 55, 49, 42, 33, 23, 12,
    38, 52, 49, 44, 38, 30, 20, 10, 32, 44, 42, 38, 32, 25, 17, 9, 25, 35, 33, 30, 25, 20, 14, 7,
    17, 24, 23, 20, 17, 14, 9, 5, 9, 12, 12, 10, 9, 7, 5, 2,
];

const fn e(index: i16, value: i16) -> VlcEntry {
    VlcEntry::new(index, value)
}

pub const MACROBLOCK_ADDRESS_INCREMENT: [VlcEntry; 80] = [
    e(1 << 1, 0), e(0, 1), //   0: x
    e(2 << 1, 0), e(3 << 1, 0), //   1: 0x
    e(4 << 1, 0), e(5 << 1, 0), //   2: 00x
    e(0, 3), e(0, 2), //   3: 01x
    e(6 << 1, 0), e(7 << 1, 0), //   4: 000x
    e(0, 5), e(0, 4), //   5: 001x
    e(8 << 1, 0), e(9 << 1, 0), //   6: 0000x
    e(0, 7), e(0, 6), //   7: 0001x
    e(10 << 1, 0), e(11 << 1, 0), //   8: 0000 0x
    e(12 << 1, 0), e(13 << 1, 0), //   9: 0000 1x
    e(14 << 1, 0), e(15 << 1, 0), //  10: 0000 00x
    e(16 << 1, 0), e(17 << 1, 0), //  11: 0000 01x
    e(18 << 1, 0), e(19 << 1, 0), //  12: 0000 10x
    e(0, 9), e(0, 8), //  13: 0000 11x
    e(-1, 0), e(20 << 1, 0), //  14: 0000 000x
    e(-1, 0), e(21 << 1, 0), //  15: 0000 001x
    e(22 << 1, 0), e(23 << 1, 0), //  16: 0000 010x
    e(0, 15), e(0, 14), //  17: 0000 011x
    e(0, 13), e(0, 12), //  18: 0000 100x
    e(0, 11), e(0, 10), //  19: 0000 101x
    e(24 << 1, 0), e(25 << 1, 0), //  20: 0000 0001x
    e(26 << 1, 0), e(27 << 1, 0), //  21: 0000 0011x
    e(28 << 1, 0), e(29 << 1, 0), //  22: 0000 0100x
    e(30 << 1, 0), e(31 << 1, 0), //  23: 0000 0101x
    e(32 << 1, 0), e(-1, 0), //  24: 0000 0001 0x
    e(-1, 0), e(33 << 1, 0), //  25: 0000 0001 1x
    e(34 << 1, 0), e(35 << 1, 0), //  26: 0000 0011 0x
    e(36 << 1, 0), e(37 << 1, 0), //  27: 0000 0011 1x
    e(38 << 1, 0), e(39 << 1, 0), //  28: 0000 0100 0x
    e(0, 21), e(0, 20), //  29: 0000 0100 1x
    e(0, 19), e(0, 18), //  30: 0000 0101 0x
    e(0, 17), e(0, 16), //  31: 0000 0101 1x
    e(0, 35), e(-1, 0), //  32: 0000 0001 00x
    e(-1, 0), e(0, 34), //  33: 0000 0001 11x
    e(0, 33), e(0, 32), //  34: 0000 0011 00x
    e(0, 31), e(0, 30), //  35: 0000 0011 01x
    e(0, 29), e(0, 28), //  36: 0000 0011 10x
    e(0, 27), e(0, 26), //  37: 0000 0011 11x
    e(0, 25), e(0, 24), //  38: 0000 0100 00x
    e(0, 23), e(0, 22), //  39: 0000 0100 01x
];

pub const MACROBLOCK_TYPE_INTRA: [VlcEntry; 4] = [
    e(1 << 1, 0), e(0, 0x01), //   0: x
    e(-1, 0), e(0, 0x11), //   1: 0x
];

pub const MACROBLOCK_TYPE_PREDICTIVE: [VlcEntry; 14] = [
    e(1 << 1, 0), e(0, 0x0a), //   0: x
    e(2 << 1, 0), e(0, 0x02), //   1: 0x
    e(3 << 1, 0), e(0, 0x08), //   2: 00x
    e(4 << 1, 0), e(5 << 1, 0), //   3: 000x
    e(6 << 1, 0), e(0, 0x12), //   4: 0000x
    e(0, 0x1a), e(0, 0x01), //   5: 0001x
    e(-1, 0), e(0, 0x11), //   6: 0000 0x
];

pub const MACROBLOCK_TYPE_B: [VlcEntry; 22] = [
    e(1 << 1, 0), e(2 << 1, 0), //   0: x
    e(3 << 1, 0), e(4 << 1, 0), //   1: 0x
    e(0, 0x0c), e(0, 0x0e), //   2: 1x
    e(5 << 1, 0), e(6 << 1, 0), //   3: 00x
    e(0, 0x04), e(0, 0x06), //   4: 01x
    e(7 << 1, 0), e(8 << 1, 0), //   5: 000x
    e(0, 0x08), e(0, 0x0a), //   6: 001x
    e(9 << 1, 0), e(10 << 1, 0), //   7: 0000x
    e(0, 0x1e), e(0, 0x01), //   8: 0001x
    e(-1, 0), e(0, 0x11), //   9: 0000 0x
    e(0, 0x16), e(0, 0x1a), //  10: 0000 1x
];

/// Selected by `picture_type` (1=I, 2=P, 3=B); index 0 is unused (there is no macroblock-type
/// table for a picture_type of 0).
pub fn macroblock_type_table(picture_type: u8) -> &'static [VlcEntry] {
    match picture_type {
        PICTURE_TYPE_INTRA => &MACROBLOCK_TYPE_INTRA,
        PICTURE_TYPE_PREDICTIVE => &MACROBLOCK_TYPE_PREDICTIVE,
        PICTURE_TYPE_B => &MACROBLOCK_TYPE_B,
        _ => &[],
    }
}

pub const CODE_BLOCK_PATTERN: [VlcEntry; 126] = [
    e(1 << 1, 0), e(2 << 1, 0), //   0: x
    e(3 << 1, 0), e(4 << 1, 0), //   1: 0x
    e(5 << 1, 0), e(6 << 1, 0), //   2: 1x
    e(7 << 1, 0), e(8 << 1, 0), //   3: 00x
    e(9 << 1, 0), e(10 << 1, 0), //   4: 01x
    e(11 << 1, 0), e(12 << 1, 0), //   5: 10x
    e(13 << 1, 0), e(0, 60), //   6: 11x
    e(14 << 1, 0), e(15 << 1, 0), //   7: 000x
    e(16 << 1, 0), e(17 << 1, 0), //   8: 001x
    e(18 << 1, 0), e(19 << 1, 0), //   9: 010x
    e(20 << 1, 0), e(21 << 1, 0), //  10: 011x
    e(22 << 1, 0), e(23 << 1, 0), //  11: 100x
    e(0, 32), e(0, 16), //  12: 101x
    e(0, 8), e(0, 4), //  13: 110x
    e(24 << 1, 0), e(25 << 1, 0), //  14: 0000x
    e(26 << 1, 0), e(27 << 1, 0), //  15: 0001x
    e(28 << 1, 0), e(29 << 1, 0), //  16: 0010x
    e(30 << 1, 0), e(31 << 1, 0), //  17: 0011x
    e(0, 62), e(0, 2), //  18: 0100x
    e(0, 61), e(0, 1), //  19: 0101x
    e(0, 56), e(0, 52), //  20: 0110x
    e(0, 44), e(0, 28), //  21: 0111x
    e(0, 40), e(0, 20), //  22: 1000x
    e(0, 48), e(0, 12), //  23: 1001x
    e(32 << 1, 0), e(33 << 1, 0), //  24: 0000 0x
    e(34 << 1, 0), e(35 << 1, 0), //  25: 0000 1x
    e(36 << 1, 0), e(37 << 1, 0), //  26: 0001 0x
    e(38 << 1, 0), e(39 << 1, 0), //  27: 0001 1x
    e(40 << 1, 0), e(41 << 1, 0), //  28: 0010 0x
    e(42 << 1, 0), e(43 << 1, 0), //  29: 0010 1x
    e(0, 63), e(0, 3), //  30: 0011 0x
    e(0, 36), e(0, 24), //  31: 0011 1x
    e(44 << 1, 0), e(45 << 1, 0), //  32: 0000 00x
    e(46 << 1, 0), e(47 << 1, 0), //  33: 0000 01x
    e(48 << 1, 0), e(49 << 1, 0), //  34: 0000 10x
    e(50 << 1, 0), e(51 << 1, 0), //  35: 0000 11x
    e(52 << 1, 0), e(53 << 1, 0), //  36: 0001 00x
    e(54 << 1, 0), e(55 << 1, 0), //  37: 0001 01x
    e(56 << 1, 0), e(57 << 1, 0), //  38: 0001 10x
    e(58 << 1, 0), e(59 << 1, 0), //  39: 0001 11x
    e(0, 34), e(0, 18), //  40: 0010 00x
    e(0, 10), e(0, 6), //  41: 0010 01x
    e(0, 33), e(0, 17), //  42: 0010 10x
    e(0, 9), e(0, 5), //  43: 0010 11x
    e(-1, 0), e(60 << 1, 0), //  44: 0000 000x
    e(61 << 1, 0), e(62 << 1, 0), //  45: 0000 001x
    e(0, 58), e(0, 54), //  46: 0000 010x
    e(0, 46), e(0, 30), //  47: 0000 011x
    e(0, 57), e(0, 53), //  48: 0000 100x
    e(0, 45), e(0, 29), //  49: 0000 101x
    e(0, 38), e(0, 26), //  50: 0000 110x
    e(0, 37), e(0, 25), //  51: 0000 111x
    e(0, 43), e(0, 23), //  52: 0001 000x
    e(0, 51), e(0, 15), //  53: 0001 001x
    e(0, 42), e(0, 22), //  54: 0001 010x
    e(0, 50), e(0, 14), //  55: 0001 011x
    e(0, 41), e(0, 21), //  56: 0001 100x
    e(0, 49), e(0, 13), //  57: 0001 101x
    e(0, 35), e(0, 19), //  58: 0001 110x
    e(0, 11), e(0, 7), //  59: 0001 111x
    e(0, 39), e(0, 27), //  60: 0000 0001x
    e(0, 59), e(0, 55), //  61: 0000 0010x
    e(0, 47), e(0, 31), //  62: 0000 0011x
];

pub const MOTION: [VlcEntry; 68] = [
    e(1 << 1, 0), e(0, 0), //   0: x
    e(2 << 1, 0), e(3 << 1, 0), //   1: 0x
    e(4 << 1, 0), e(5 << 1, 0), //   2: 00x
    e(0, 1), e(0, -1), //   3: 01x
    e(6 << 1, 0), e(7 << 1, 0), //   4: 000x
    e(0, 2), e(0, -2), //   5: 001x
    e(8 << 1, 0), e(9 << 1, 0), //   6: 0000x
    e(0, 3), e(0, -3), //   7: 0001x
    e(10 << 1, 0), e(11 << 1, 0), //   8: 0000 0x
    e(12 << 1, 0), e(13 << 1, 0), //   9: 0000 1x
    e(-1, 0), e(14 << 1, 0), //  10: 0000 00x
    e(15 << 1, 0), e(16 << 1, 0), //  11: 0000 01x
    e(17 << 1, 0), e(18 << 1, 0), //  12: 0000 10x
    e(0, 4), e(0, -4), //  13: 0000 11x
    e(-1, 0), e(19 << 1, 0), //  14: 0000 001x
    e(20 << 1, 0), e(21 << 1, 0), //  15: 0000 010x
    e(0, 7), e(0, -7), //  16: 0000 011x
    e(0, 6), e(0, -6), //  17: 0000 100x
    e(0, 5), e(0, -5), //  18: 0000 101x
    e(22 << 1, 0), e(23 << 1, 0), //  19: 0000 0011x
    e(24 << 1, 0), e(25 << 1, 0), //  20: 0000 0100x
    e(26 << 1, 0), e(27 << 1, 0), //  21: 0000 0101x
    e(28 << 1, 0), e(29 << 1, 0), //  22: 0000 0011 0x
    e(30 << 1, 0), e(31 << 1, 0), //  23: 0000 0011 1x
    e(32 << 1, 0), e(33 << 1, 0), //  24: 0000 0100 0x
    e(0, 10), e(0, -10), //  25: 0000 0100 1x
    e(0, 9), e(0, -9), //  26: 0000 0101 0x
    e(0, 8), e(0, -8), //  27: 0000 0101 1x
    e(0, 16), e(0, -16), //  28: 0000 0011 00x
    e(0, 15), e(0, -15), //  29: 0000 0011 01x
    e(0, 14), e(0, -14), //  30: 0000 0011 10x
    e(0, 13), e(0, -13), //  31: 0000 0011 11x
    e(0, 12), e(0, -12), //  32: 0000 0100 00x
    e(0, 11), e(0, -11), //  33: 0000 0100 01x
];

pub const DCT_SIZE_LUMINANCE: [VlcEntry; 18] = [
    e(1 << 1, 0), e(2 << 1, 0), //   0: x
    e(0, 1), e(0, 2), //   1: 0x
    e(3 << 1, 0), e(4 << 1, 0), //   2: 1x
    e(0, 0), e(0, 3), //   3: 10x
    e(0, 4), e(5 << 1, 0), //   4: 11x
    e(0, 5), e(6 << 1, 0), //   5: 111x
    e(0, 6), e(7 << 1, 0), //   6: 1111x
    e(0, 7), e(8 << 1, 0), //   7: 1111 1x
    e(0, 8), e(-1, 0), //   8: 1111 11x
];

pub const DCT_SIZE_CHROMINANCE: [VlcEntry; 18] = [
    e(1 << 1, 0), e(2 << 1, 0), //   0: x
    e(0, 0), e(0, 1), //   1: 0x
    e(0, 2), e(3 << 1, 0), //   2: 1x
    e(0, 3), e(4 << 1, 0), //   3: 11x
    e(0, 4), e(5 << 1, 0), //   4: 111x
    e(0, 5), e(6 << 1, 0), //   5: 1111x
    e(0, 6), e(7 << 1, 0), //   6: 1111 1x
    e(0, 7), e(8 << 1, 0), //   7: 1111 11x
    e(0, 8), e(-1, 0), //   8: 1111 111x
];

/// Indexed by plane index (Y=0, Cb=1, Cr=2): the luminance table for Y, the chrominance table
/// for both chroma planes.
pub fn dct_size_table(plane_index: usize) -> &'static [VlcEntry] {
    if plane_index == 0 {
        &DCT_SIZE_LUMINANCE
    } else {
        &DCT_SIZE_CHROMINANCE
    }
}

/// Run/level VLC for AC (and, in non-intra blocks, DC) coefficients. The decoded `value`
/// packs `run` into the high byte and `level` into the low byte (`0xff00` run, `0x00ff` level);
/// a value of `0x0001` can mean either "run=0, level=1" or end-of-block depending on context
/// (see `VideoDecoder::decode_block`), and `0xffff` is the escape sequence, not a literal code.
pub const DCT_COEFF: [VlcEntry; 224] = [
    e(1 << 1, 0), e(0, 0x0001), //   0: x
    e(2 << 1, 0), e(3 << 1, 0), //   1: 0x
    e(4 << 1, 0), e(5 << 1, 0), //   2: 00x
    e(6 << 1, 0), e(0, 0x0101), //   3: 01x
    e(7 << 1, 0), e(8 << 1, 0), //   4: 000x
    e(9 << 1, 0), e(10 << 1, 0), //   5: 001x
    e(0, 0x0002), e(0, 0x0201), //   6: 010x
    e(11 << 1, 0), e(12 << 1, 0), //   7: 0000x
    e(13 << 1, 0), e(14 << 1, 0), //   8: 0001x
    e(15 << 1, 0), e(0, 0x0003), //   9: 0010x
    e(0, 0x0401), e(0, 0x0301), //  10: 0011x
    e(16 << 1, 0), e(0, -1), //  11: 0000 0x (escape, decodes as 0xffff via read_vlc_uint)
    e(17 << 1, 0), e(18 << 1, 0), //  12: 0000 1x
    e(0, 0x0701), e(0, 0x0601), //  13: 0001 0x
    e(0, 0x0102), e(0, 0x0501), //  14: 0001 1x
    e(19 << 1, 0), e(20 << 1, 0), //  15: 0010 0x
    e(21 << 1, 0), e(22 << 1, 0), //  16: 0000 00x
    e(0, 0x0202), e(0, 0x0901), //  17: 0000 10x
    e(0, 0x0004), e(0, 0x0801), //  18: 0000 11x
    e(23 << 1, 0), e(24 << 1, 0), //  19: 0010 00x
    e(25 << 1, 0), e(26 << 1, 0), //  20: 0010 01x
    e(27 << 1, 0), e(28 << 1, 0), //  21: 0000 000x
    e(29 << 1, 0), e(30 << 1, 0), //  22: 0000 001x
    e(0, 0x0d01), e(0, 0x0006), //  23: 0010 000x
    e(0, 0x0c01), e(0, 0x0b01), //  24: 0010 001x
    e(0, 0x0302), e(0, 0x0103), //  25: 0010 010x
    e(0, 0x0005), e(0, 0x0a01), //  26: 0010 011x
    e(31 << 1, 0), e(32 << 1, 0), //  27: 0000 0000x
    e(33 << 1, 0), e(34 << 1, 0), //  28: 0000 0001x
    e(35 << 1, 0), e(36 << 1, 0), //  29: 0000 0010x
    e(37 << 1, 0), e(38 << 1, 0), //  30: 0000 0011x
    e(39 << 1, 0), e(40 << 1, 0), //  31: 0000 0000 0x
    e(41 << 1, 0), e(42 << 1, 0), //  32: 0000 0000 1x
    e(43 << 1, 0), e(44 << 1, 0), //  33: 0000 0001 0x
    e(45 << 1, 0), e(46 << 1, 0), //  34: 0000 0001 1x
    e(0, 0x1001), e(0, 0x0502), //  35: 0000 0010 0x
    e(0, 0x0007), e(0, 0x0203), //  36: 0000 0010 1x
    e(0, 0x0104), e(0, 0x0f01), //  37: 0000 0011 0x
    e(0, 0x0e01), e(0, 0x0402), //  38: 0000 0011 1x
    e(47 << 1, 0), e(48 << 1, 0), //  39: 0000 0000 00x
    e(49 << 1, 0), e(50 << 1, 0), //  40: 0000 0000 01x
    e(51 << 1, 0), e(52 << 1, 0), //  41: 0000 0000 10x
    e(53 << 1, 0), e(54 << 1, 0), //  42: 0000 0000 11x
    e(55 << 1, 0), e(56 << 1, 0), //  43: 0000 0001 00x
    e(57 << 1, 0), e(58 << 1, 0), //  44: 0000 0001 01x
    e(59 << 1, 0), e(60 << 1, 0), //  45: 0000 0001 10x
    e(61 << 1, 0), e(62 << 1, 0), //  46: 0000 0001 11x
    e(-1, 0), e(63 << 1, 0), //  47: 0000 0000 000x
    e(64 << 1, 0), e(65 << 1, 0), //  48: 0000 0000 001x
    e(66 << 1, 0), e(67 << 1, 0), //  49: 0000 0000 010x
    e(68 << 1, 0), e(69 << 1, 0), //  50: 0000 0000 011x
    e(70 << 1, 0), e(71 << 1, 0), //  51: 0000 0000 100x
    e(72 << 1, 0), e(73 << 1, 0), //  52: 0000 0000 101x
    e(74 << 1, 0), e(75 << 1, 0), //  53: 0000 0000 110x
    e(76 << 1, 0), e(77 << 1, 0), //  54: 0000 0000 111x
    e(0, 0x000b), e(0, 0x0802), //  55: 0000 0001 000x
    e(0, 0x0403), e(0, 0x000a), //  56: 0000 0001 001x
    e(0, 0x0204), e(0, 0x0702), //  57: 0000 0001 010x
    e(0, 0x1501), e(0, 0x1401), //  58: 0000 0001 011x
    e(0, 0x0009), e(0, 0x1301), //  59: 0000 0001 100x
    e(0, 0x1201), e(0, 0x0105), //  60: 0000 0001 101x
    e(0, 0x0303), e(0, 0x0008), //  61: 0000 0001 110x
    e(0, 0x0602), e(0, 0x1101), //  62: 0000 0001 111x
    e(78 << 1, 0), e(79 << 1, 0), //  63: 0000 0000 0001x
    e(80 << 1, 0), e(81 << 1, 0), //  64: 0000 0000 0010x
    e(82 << 1, 0), e(83 << 1, 0), //  65: 0000 0000 0011x
    e(84 << 1, 0), e(85 << 1, 0), //  66: 0000 0000 0100x
    e(86 << 1, 0), e(87 << 1, 0), //  67: 0000 0000 0101x
    e(88 << 1, 0), e(89 << 1, 0), //  68: 0000 0000 0110x
    e(90 << 1, 0), e(91 << 1, 0), //  69: 0000 0000 0111x
    e(0, 0x0a02), e(0, 0x0902), //  70: 0000 0000 1000x
    e(0, 0x0503), e(0, 0x0304), //  71: 0000 0000 1001x
    e(0, 0x0205), e(0, 0x0107), //  72: 0000 0000 1010x
    e(0, 0x0106), e(0, 0x000f), //  73: 0000 0000 1011x
    e(0, 0x000e), e(0, 0x000d), //  74: 0000 0000 1100x
    e(0, 0x000c), e(0, 0x1a01), //  75: 0000 0000 1101x
    e(0, 0x1901), e(0, 0x1801), //  76: 0000 0000 1110x
    e(0, 0x1701), e(0, 0x1601), //  77: 0000 0000 1111x
    e(92 << 1, 0), e(93 << 1, 0), //  78: 0000 0000 0001 0x
    e(94 << 1, 0), e(95 << 1, 0), //  79: 0000 0000 0001 1x
    e(96 << 1, 0), e(97 << 1, 0), //  80: 0000 0000 0010 0x
    e(98 << 1, 0), e(99 << 1, 0), //  81: 0000 0000 0010 1x
    e(100 << 1, 0), e(101 << 1, 0), //  82: 0000 0000 0011 0x
    e(102 << 1, 0), e(103 << 1, 0), //  83: 0000 0000 0011 1x
    e(0, 0x001f), e(0, 0x001e), //  84: 0000 0000 0100 0x
    e(0, 0x001d), e(0, 0x001c), //  85: 0000 0000 0100 1x
    e(0, 0x001b), e(0, 0x001a), //  86: 0000 0000 0101 0x
    e(0, 0x0019), e(0, 0x0018), //  87: 0000 0000 0101 1x
    e(0, 0x0017), e(0, 0x0016), //  88: 0000 0000 0110 0x
    e(0, 0x0015), e(0, 0x0014), //  89: 0000 0000 0110 1x
    e(0, 0x0013), e(0, 0x0012), //  90: 0000 0000 0111 0x
    e(0, 0x0011), e(0, 0x0010), //  91: 0000 0000 0111 1x
    e(104 << 1, 0), e(105 << 1, 0), //  92: 0000 0000 0001 00x
    e(106 << 1, 0), e(107 << 1, 0), //  93: 0000 0000 0001 01x
    e(108 << 1, 0), e(109 << 1, 0), //  94: 0000 0000 0001 10x
    e(110 << 1, 0), e(111 << 1, 0), //  95: 0000 0000 0001 11x
    e(0, 0x0028), e(0, 0x0027), //  96: 0000 0000 0010 00x
    e(0, 0x0026), e(0, 0x0025), //  97: 0000 0000 0010 01x
    e(0, 0x0024), e(0, 0x0023), //  98: 0000 0000 0010 10x
    e(0, 0x0022), e(0, 0x0021), //  99: 0000 0000 0010 11x
    e(0, 0x0020), e(0, 0x010e), // 100: 0000 0000 0011 00x
    e(0, 0x010d), e(0, 0x010c), // 101: 0000 0000 0011 01x
    e(0, 0x010b), e(0, 0x010a), // 102: 0000 0000 0011 10x
    e(0, 0x0109), e(0, 0x0108), // 103: 0000 0000 0011 11x
    e(0, 0x0112), e(0, 0x0111), // 104: 0000 0000 0001 000x
    e(0, 0x0110), e(0, 0x010f), // 105: 0000 0000 0001 001x
    e(0, 0x0603), e(0, 0x1002), // 106: 0000 0000 0001 010x
    e(0, 0x0f02), e(0, 0x0e02), // 107: 0000 0000 0001 011x
    e(0, 0x0d02), e(0, 0x0c02), // 108: 0000 0000 0001 100x
    e(0, 0x0b02), e(0, 0x1f01), // 109: 0000 0000 0001 101x
    e(0, 0x1e01), e(0, 0x1d01), // 110: 0000 0000 0001 110x
    e(0, 0x1c01), e(0, 0x1b01), // 111: 0000 0000 0001 111x
];

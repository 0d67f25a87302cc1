// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `codec` module implements byte-level reading and writing of a single sample in any of the
//! 18 PCM encodings.
//!
//! Each encoding has a dedicated monomorphic reader and writer operating through the smallest
//! machine type covering the encoding's bit width. The 24-bit encodings assemble their three
//! bytes into the *upper* three bytes of a 32-bit intermediate, leaving the low byte zero; the
//! sign bit then lands in the intermediate's sign bit and the value is uniformly scaled with the
//! 32-bit encodings, so the converter needs no 24-bit special case.
//!
//! The readers and writers are registered in two parallel 18-entry tables indexed by the
//! descriptor's id. Runtime dispatch is one table lookup followed by an indirect call; for inner
//! loops, [`SampleCodec`] binds the pair for one descriptor at construction.

use super::conv::{ConvertibleSample, FromSample, IntoSample};
use super::format::{PcmFormat, NUM_FORMAT_TAGS};

/// Reads one sample encoded at the start of the byte slice.
pub type SampleReader<V> = fn(&[u8]) -> V;

/// Writes one sample to the start of the byte slice.
pub type SampleWriter<V> = fn(V, &mut [u8]);

macro_rules! int_codec {
    ($read:ident, $write:ident, $intermediate:ty, $from_bytes:ident, $to_bytes:ident) => {
        fn $read<V: ConvertibleSample>(buf: &[u8]) -> V {
            const N: usize = std::mem::size_of::<$intermediate>();
            let mut bytes = [0u8; N];
            bytes.copy_from_slice(&buf[..N]);
            V::from_sample(<$intermediate>::$from_bytes(bytes))
        }

        fn $write<V: ConvertibleSample>(val: V, buf: &mut [u8]) {
            const N: usize = std::mem::size_of::<$intermediate>();
            let intermediate: $intermediate = val.into_sample();
            buf[..N].copy_from_slice(&intermediate.$to_bytes());
        }
    };
}

// The 24-bit encodings place their bytes in the upper three bytes of a 32-bit intermediate.
macro_rules! int24_codec {
    ($read_be:ident, $write_be:ident, $read_le:ident, $write_le:ident, $intermediate:ty) => {
        fn $read_be<V: ConvertibleSample>(buf: &[u8]) -> V {
            V::from_sample(<$intermediate>::from_be_bytes([buf[0], buf[1], buf[2], 0]))
        }

        fn $write_be<V: ConvertibleSample>(val: V, buf: &mut [u8]) {
            let intermediate: $intermediate = val.into_sample();
            buf[..3].copy_from_slice(&intermediate.to_be_bytes()[..3]);
        }

        fn $read_le<V: ConvertibleSample>(buf: &[u8]) -> V {
            V::from_sample(<$intermediate>::from_le_bytes([0, buf[0], buf[1], buf[2]]))
        }

        fn $write_le<V: ConvertibleSample>(val: V, buf: &mut [u8]) {
            let intermediate: $intermediate = val.into_sample();
            buf[..3].copy_from_slice(&intermediate.to_le_bytes()[1..4]);
        }
    };
}

fn read_s8<V: ConvertibleSample>(buf: &[u8]) -> V {
    V::from_sample(buf[0] as i8)
}

fn write_s8<V: ConvertibleSample>(val: V, buf: &mut [u8]) {
    let intermediate: i8 = val.into_sample();
    buf[0] = intermediate as u8;
}

fn read_u8<V: ConvertibleSample>(buf: &[u8]) -> V {
    V::from_sample(buf[0])
}

fn write_u8<V: ConvertibleSample>(val: V, buf: &mut [u8]) {
    buf[0] = val.into_sample();
}

int_codec!(read_s16be, write_s16be, i16, from_be_bytes, to_be_bytes);
int_codec!(read_s16le, write_s16le, i16, from_le_bytes, to_le_bytes);
int_codec!(read_u16be, write_u16be, u16, from_be_bytes, to_be_bytes);
int_codec!(read_u16le, write_u16le, u16, from_le_bytes, to_le_bytes);
int24_codec!(read_s24be, write_s24be, read_s24le, write_s24le, i32);
int24_codec!(read_u24be, write_u24be, read_u24le, write_u24le, u32);
int_codec!(read_s32be, write_s32be, i32, from_be_bytes, to_be_bytes);
int_codec!(read_s32le, write_s32le, i32, from_le_bytes, to_le_bytes);
int_codec!(read_u32be, write_u32be, u32, from_be_bytes, to_be_bytes);
int_codec!(read_u32le, write_u32le, u32, from_le_bytes, to_le_bytes);
int_codec!(read_f32be, write_f32be, f32, from_be_bytes, to_be_bytes);
int_codec!(read_f32le, write_f32le, f32, from_le_bytes, to_le_bytes);
int_codec!(read_f64be, write_f64be, f64, from_be_bytes, to_be_bytes);
int_codec!(read_f64le, write_f64le, f64, from_le_bytes, to_le_bytes);

// The two dispatch tables. Entries are ordered by the descriptor id.

fn readers<V: ConvertibleSample>() -> [SampleReader<V>; NUM_FORMAT_TAGS] {
    [
        read_s8::<V>,
        read_u8::<V>,
        read_s16be::<V>,
        read_s16le::<V>,
        read_u16be::<V>,
        read_u16le::<V>,
        read_s24be::<V>,
        read_s24le::<V>,
        read_u24be::<V>,
        read_u24le::<V>,
        read_s32be::<V>,
        read_s32le::<V>,
        read_u32be::<V>,
        read_u32le::<V>,
        read_f32be::<V>,
        read_f32le::<V>,
        read_f64be::<V>,
        read_f64le::<V>,
    ]
}

fn writers<V: ConvertibleSample>() -> [SampleWriter<V>; NUM_FORMAT_TAGS] {
    [
        write_s8::<V>,
        write_u8::<V>,
        write_s16be::<V>,
        write_s16le::<V>,
        write_u16be::<V>,
        write_u16le::<V>,
        write_s24be::<V>,
        write_s24le::<V>,
        write_u24be::<V>,
        write_u24le::<V>,
        write_s32be::<V>,
        write_s32le::<V>,
        write_u32be::<V>,
        write_u32le::<V>,
        write_f32be::<V>,
        write_f32le::<V>,
        write_f64be::<V>,
        write_f64le::<V>,
    ]
}

fn dispatch_index(format: PcmFormat) -> usize {
    assert!(format.valid(), "invalid pcm format descriptor");
    format.id() as usize
}

/// Reads one sample encoded per `format` from the start of `buf` and converts it to `V`.
///
/// `buf` must hold at least `format.bitwidth() / 8` bytes. Panics if the descriptor is invalid.
#[inline]
pub fn read_sample<V: ConvertibleSample>(format: PcmFormat, buf: &[u8]) -> V {
    readers::<V>()[dispatch_index(format)](buf)
}

/// Converts `val` and writes it to the start of `buf`, encoded per `format`.
///
/// `buf` must hold at least `format.bitwidth() / 8` bytes. Panics if the descriptor is invalid.
#[inline]
pub fn write_sample<V: ConvertibleSample>(format: PcmFormat, val: V, buf: &mut [u8]) {
    writers::<V>()[dispatch_index(format)](val, buf)
}

/// A reader/writer pair bound to one descriptor at construction. Prefer this over repeated
/// [`read_sample`]/[`write_sample`] lookups in per-sample loops.
#[derive(Copy, Clone)]
pub struct SampleCodec<V: ConvertibleSample> {
    reader: SampleReader<V>,
    writer: SampleWriter<V>,
    step: usize,
}

impl<V: ConvertibleSample> SampleCodec<V> {
    /// Binds the reader and writer for `format`. Panics if the descriptor is invalid.
    pub fn new(format: PcmFormat) -> Self {
        let idx = dispatch_index(format);

        SampleCodec {
            reader: readers::<V>()[idx],
            writer: writers::<V>()[idx],
            step: (format.bitwidth() / 8) as usize,
        }
    }

    /// The encoded size of one sample in bytes.
    #[inline(always)]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Reads one sample from the start of `buf`.
    #[inline(always)]
    pub fn read(&self, buf: &[u8]) -> V {
        (self.reader)(buf)
    }

    /// Writes one sample to the start of `buf`.
    #[inline(always)]
    pub fn write(&self, val: V, buf: &mut [u8]) {
        (self.writer)(val, buf)
    }
}

// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pcmstream_core::errors::{decode_error, unsupported_error, Result};
use pcmstream_core::io::ReadBytes;
use pcmstream_core::pcm::PcmFormat;

use extended::Extended;

use crate::common::{skip_chunk_remainder, ChunkParser, ParseChunk, ParseChunkTag};

/// `CommonChunk` is a required AIFF chunk, containing the audio format.
pub struct CommonChunk {
    /// The number of channels.
    pub n_channels: u16,
    /// The number of audio frames.
    pub n_sample_frames: u32,
    /// The sample size in bits.
    pub sample_size: u16,
    /// The sample rate in Hz.
    pub sample_rate: u32,
    /// The resolved PCM encoding of the sound data.
    pub format: PcmFormat,
}

fn resolve_pcm_format(sample_size: u16, little_endian: bool) -> Result<PcmFormat> {
    let format = match (sample_size, little_endian) {
        (8, _) => PcmFormat::u8(),
        (16, false) => PcmFormat::s16be(),
        (16, true) => PcmFormat::s16le(),
        (24, false) => PcmFormat::s24be(),
        (24, true) => PcmFormat::s24le(),
        (32, false) => PcmFormat::s32be(),
        (32, true) => PcmFormat::s32le(),
        _ => return unsupported_error("aiff: sample size must be 8, 16, 24 or 32 bits"),
    };

    Ok(format)
}

fn read_comm_fields<B: ReadBytes>(reader: &mut B) -> Result<(u16, u32, u16, u32)> {
    let n_channels = reader.read_be_i16()?;

    if n_channels < 1 {
        return decode_error("aiff: invalid channel count");
    }

    let n_sample_frames = reader.read_be_u32()?;
    let sample_size = reader.read_be_i16()?;

    if sample_size < 1 {
        return decode_error("aiff: invalid sample size");
    }

    let sample_rate = read_sample_rate(reader)?;

    Ok((n_channels as u16, n_sample_frames, sample_size as u16, sample_rate))
}

impl ParseChunk for CommonChunk {
    fn parse<B: ReadBytes>(reader: &mut B, tag: [u8; 4], len: u32) -> Result<CommonChunk> {
        ChunkParser::<CommonChunk>::new(tag, len).parse_aiff(reader)
    }
}

/// An AIFC common chunk carries a compression id after the plain AIFF fields; a plain AIFF
/// common chunk does not.
pub trait CommonChunkParser {
    fn parse_aiff<B: ReadBytes>(self, reader: &mut B) -> Result<CommonChunk>;
    fn parse_aifc<B: ReadBytes>(self, reader: &mut B) -> Result<CommonChunk>;
}

impl CommonChunkParser for ChunkParser<CommonChunk> {
    fn parse_aiff<B: ReadBytes>(self, reader: &mut B) -> Result<CommonChunk> {
        let start_pos = reader.pos();

        let (n_channels, n_sample_frames, sample_size, sample_rate) = read_comm_fields(reader)?;

        // Uncompressed AIFF sound data is big-endian.
        let format = resolve_pcm_format(sample_size, false)?;

        skip_chunk_remainder(reader, start_pos, self.len)?;

        Ok(CommonChunk { n_channels, n_sample_frames, sample_size, sample_rate, format })
    }

    fn parse_aifc<B: ReadBytes>(self, reader: &mut B) -> Result<CommonChunk> {
        let start_pos = reader.pos();

        let (n_channels, n_sample_frames, sample_size, sample_rate) = read_comm_fields(reader)?;

        let compression_type = reader.read_quad_bytes()?;

        let little_endian = match &compression_type {
            b"NONE" => false,
            b"sowt" => true,
            _ => return unsupported_error("aifc: compression type not supported"),
        };

        // A Pascal-string compressor name may follow the compression id.
        if reader.pos() - start_pos < u64::from(self.len) {
            ignore_pascal_string(reader)?;
        }

        let format = resolve_pcm_format(sample_size, little_endian)?;

        skip_chunk_remainder(reader, start_pos, self.len)?;

        Ok(CommonChunk { n_channels, n_sample_frames, sample_size, sample_rate, format })
    }
}

/// `SoundChunk` is a required AIFF chunk, containing the audio data.
pub struct SoundChunk {
    pub offset: u32,
    #[allow(dead_code)]
    pub block_size: u32,
    /// The length in bytes of the PCM data, past the offset.
    pub len: u32,
    /// The absolute position of the first PCM byte.
    pub data_start_pos: u64,
}

impl ParseChunk for SoundChunk {
    fn parse<B: ReadBytes>(reader: &mut B, _: [u8; 4], len: u32) -> Result<SoundChunk> {
        if len < 8 {
            return decode_error("aiff: invalid chunk size for sound chunk");
        }

        let offset = reader.read_be_u32()?;
        let block_size = reader.read_be_u32()?;

        if offset > len - 8 {
            return decode_error("aiff: sound chunk offset exceeds chunk length");
        }

        // The PCM data begins `offset` bytes into the chunk payload.
        reader.ignore_bytes(u64::from(offset))?;

        let data_start_pos = reader.pos();

        Ok(SoundChunk { offset, block_size, len: len - 8 - offset, data_start_pos })
    }
}

pub enum RiffAiffChunks {
    Common(ChunkParser<CommonChunk>),
    Sound(ChunkParser<SoundChunk>),
}

macro_rules! parser {
    ($class:expr, $result:ty, $tag:expr, $len:expr) => {
        Some($class(ChunkParser::<$result>::new($tag, $len)))
    };
}

impl ParseChunkTag for RiffAiffChunks {
    fn parse_tag(tag: [u8; 4], len: u32) -> Option<Self> {
        match &tag {
            b"COMM" => parser!(RiffAiffChunks::Common, CommonChunk, tag, len),
            b"SSND" => parser!(RiffAiffChunks::Sound, SoundChunk, tag, len),
            _ => None,
        }
    }
}

/// Reads the 80-bit IEEE 754 extended sample rate: one sign bit, a 15-bit biased exponent, and
/// two 32-bit mantissa halves.
fn read_sample_rate<B: ReadBytes>(reader: &mut B) -> Result<u32> {
    let mut buf = [0u8; 10];
    reader.read_buf_exact(&mut buf)?;

    let sample_rate = Extended::from_be_bytes(buf).to_f64();

    // Do not allow infinite or NaN sample rates.
    if sample_rate.is_infinite() || sample_rate.is_nan() {
        return decode_error("aiff: sample rate is not a real number");
    }

    let sample_rate = sample_rate.round() as u32;

    // Do not allow 0 Hz sample rates.
    if sample_rate == 0 {
        return decode_error("aiff: sample rate cannot be 0");
    }

    Ok(sample_rate)
}

fn ignore_pascal_string<B: ReadBytes>(reader: &mut B) -> Result<()> {
    let mut len = u64::from(reader.read_byte()?);

    // Pascal strings are padded so that the length byte and the string data together occupy an
    // even number of bytes.
    if len & 1 == 0 {
        len += 1;
    }

    reader.ignore_bytes(len)
}

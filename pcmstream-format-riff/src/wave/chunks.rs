// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pcmstream_core::errors::{decode_error, unsupported_error, Result};
use pcmstream_core::io::ReadBytes;
use pcmstream_core::pcm::PcmFormat;

use crate::common::{skip_chunk_remainder, ChunkParser, ParseChunk, ParseChunkTag};

// The definition of these format identifiers can be found in mmreg.h of the Microsoft Windows
// Platform SDK.
const WAVE_FORMAT_PCM: u16 = 0x0001;
const WAVE_FORMAT_IEEE_FLOAT: u16 = 0x0003;
const WAVE_FORMAT_EXTENSIBLE: u16 = 0xfffe;

// These GUIDs identify the format of the data chunk for the extensible format. The definitions
// can be found in ksmedia.h of the Microsoft Windows Platform SDK.
#[rustfmt::skip]
const KSDATAFORMAT_SUBTYPE_PCM: [u8; 16] = [
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00,
    0x80, 0x00, 0x00, 0xaa, 0x00, 0x38, 0x9b, 0x71,
];
#[rustfmt::skip]
const KSDATAFORMAT_SUBTYPE_IEEE_FLOAT: [u8; 16] = [
    0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00,
    0x80, 0x00, 0x00, 0xaa, 0x00, 0x38, 0x9b, 0x71,
];

pub struct WaveFormatChunk {
    /// The number of channels.
    pub n_channels: u16,
    /// The sample rate in Hz.
    pub sample_rate: u32,
    /// The required average data rate in bytes/second.
    #[allow(dead_code)]
    pub avg_bytes_per_sec: u32,
    /// The byte alignment of one audio frame. May be 0, in which case it is derived from the
    /// channel count and sample width.
    pub block_align: u16,
    /// The number of bits per encoded sample.
    pub bits_per_sample: u16,
    /// The resolved PCM encoding of the data chunk.
    pub format: PcmFormat,
}

impl WaveFormatChunk {
    fn resolve_pcm(bits_per_sample: u16) -> Result<PcmFormat> {
        // Samples are always interleaved and little-endian encoded for the PCM format.
        match bits_per_sample {
            8 => Ok(PcmFormat::u8()),
            16 => Ok(PcmFormat::s16le()),
            24 => Ok(PcmFormat::s24le()),
            32 => Ok(PcmFormat::s32le()),
            _ => unsupported_error("wav: bits per sample for fmt_pcm must be 8, 16, 24 or 32"),
        }
    }

    fn resolve_ieee(bits_per_sample: u16) -> Result<PcmFormat> {
        match bits_per_sample {
            32 => Ok(PcmFormat::f32le()),
            64 => Ok(PcmFormat::f64le()),
            _ => unsupported_error("wav: bits per sample for fmt_ieee must be 32 or 64"),
        }
    }

    fn read_ext_fmt<B: ReadBytes>(reader: &mut B, bits_per_sample: u16, len: u32) -> Result<PcmFormat> {
        // WaveFormat for the extensible format must be extended to 40 bytes in length.
        if len < 40 {
            return decode_error("wav: malformed fmt_ext chunk");
        }

        let extra_size = reader.read_u16()?;

        // The size of the extra data for the extensible format is exactly 22 bytes.
        if extra_size != 22 {
            return decode_error("wav: extra data size not 22 bytes for fmt_ext chunk");
        }

        let _valid_bits_per_sample = reader.read_u16()?;
        let _channel_mask = reader.read_u32()?;

        let mut sub_format_guid = [0u8; 16];
        reader.read_buf_exact(&mut sub_format_guid)?;

        // The sub-format GUID selects the data chunk encoding: the PCM GUID selects integer
        // PCM, the IEEE float GUID selects floating point, anything else is unsupported.
        match sub_format_guid {
            KSDATAFORMAT_SUBTYPE_PCM => Self::resolve_pcm(bits_per_sample),
            KSDATAFORMAT_SUBTYPE_IEEE_FLOAT => Self::resolve_ieee(bits_per_sample),
            _ => unsupported_error("wav: unsupported fmt_ext sub-type"),
        }
    }
}

impl ParseChunk for WaveFormatChunk {
    fn parse<B: ReadBytes>(reader: &mut B, _tag: [u8; 4], len: u32) -> Result<WaveFormatChunk> {
        // WaveFormat has a minimal length of 16 bytes. This may be extended with format specific
        // data later.
        if len < 16 {
            return decode_error("wav: malformed fmt chunk");
        }

        let start_pos = reader.pos();

        let format_tag = reader.read_u16()?;
        let n_channels = reader.read_u16()?;
        let sample_rate = reader.read_u32()?;
        let avg_bytes_per_sec = reader.read_u32()?;
        let block_align = reader.read_u16()?;
        let bits_per_sample = reader.read_u16()?;

        if n_channels == 0 {
            return decode_error("wav: channel count is 0");
        }

        if sample_rate == 0 {
            return decode_error("wav: sample rate is 0");
        }

        let format = match format_tag {
            WAVE_FORMAT_PCM => Self::resolve_pcm(bits_per_sample),
            WAVE_FORMAT_IEEE_FLOAT => Self::resolve_ieee(bits_per_sample),
            WAVE_FORMAT_EXTENSIBLE => Self::read_ext_fmt(reader, bits_per_sample, len),
            _ => unsupported_error("wav: unsupported wave format"),
        }?;

        // Advance past any remaining fmt-chunk bytes.
        skip_chunk_remainder(reader, start_pos, len)?;

        Ok(WaveFormatChunk {
            n_channels,
            sample_rate,
            avg_bytes_per_sec,
            block_align,
            bits_per_sample,
            format,
        })
    }
}

pub struct DataChunk {
    pub len: u32,
}

impl ParseChunk for DataChunk {
    fn parse<B: ReadBytes>(_: &mut B, _: [u8; 4], len: u32) -> Result<DataChunk> {
        Ok(DataChunk { len })
    }
}

pub enum RiffWaveChunks {
    Format(ChunkParser<WaveFormatChunk>),
    Data(ChunkParser<DataChunk>),
}

macro_rules! parser {
    ($class:expr, $result:ty, $tag:expr, $len:expr) => {
        Some($class(ChunkParser::<$result>::new($tag, $len)))
    };
}

impl ParseChunkTag for RiffWaveChunks {
    fn parse_tag(tag: [u8; 4], len: u32) -> Option<Self> {
        match &tag {
            b"fmt " => parser!(RiffWaveChunks::Format, WaveFormatChunk, tag, len),
            b"data" => parser!(RiffWaveChunks::Data, DataChunk, tag, len),
            // Everything else, sampler and instrument chunks included, is skipped over.
            _ => None,
        }
    }
}

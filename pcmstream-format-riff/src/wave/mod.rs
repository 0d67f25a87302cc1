// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::SeekFrom;
use std::path::Path;

use pcmstream_core::errors::{bad_magic_error, decode_error, missing_chunk_error, Result};
use pcmstream_core::info::StreamInfo;
use pcmstream_core::io::{ReadBytes, SourceStream};
use pcmstream_core::source::AudioSource;

use log::debug;

use crate::common::{read_pcm_payload, seek_pcm_payload, ByteOrder, ChunksReader};

mod chunks;

use chunks::*;

/// A WAVE file is actually a RIFF stream, with a "RIFF" ASCII stream marker.
const WAVE_STREAM_MARKER: [u8; 4] = *b"RIFF";
/// The RIFF form for WAVE.
const WAVE_RIFF_FORM: [u8; 4] = *b"WAVE";

/// Waveform Audio File Format (WAV) reader.
///
/// `WavSource` parses the RIFF header of a WAVE file and presents the data chunk as a seekable
/// stream of PCM bytes.
pub struct WavSource {
    stream: SourceStream,
    info: StreamInfo,
    data_start_pos: u64,
}

impl WavSource {
    /// Opens the WAVE file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::try_new(SourceStream::open(path)?)
    }

    /// Attempts to read a WAVE header from the stream. On success the stream is positioned at
    /// the first byte of PCM data.
    pub fn try_new(mut stream: SourceStream) -> Result<Self> {
        // A WAVE file is one large RIFF chunk, with the actual format and audio data contained
        // in nested chunks. Therefore, the file starts with a RIFF chunk header (chunk ID &
        // size).
        let marker = stream.read_quad_bytes()?;

        if marker != WAVE_STREAM_MARKER {
            return bad_magic_error("wav: missing riff stream marker");
        }

        // The length of the top-level RIFF chunk. Must be atleast 4 bytes. When a file is
        // streamed to output the length may not have been known to the writer, in which case it
        // is (2^32)-1.
        let riff_len = stream.read_u32()?;

        if riff_len < 4 && riff_len != u32::MAX {
            return decode_error("wav: invalid riff length");
        }

        let riff_form = stream.read_quad_bytes()?;

        if riff_form != WAVE_RIFF_FORM {
            return bad_magic_error("wav: riff form is not wave");
        }

        let riff_data_len = if riff_len < u32::MAX { Some(riff_len - 4) } else { None };

        let mut riff_chunks =
            ChunksReader::<RiffWaveChunks>::new(riff_data_len, ByteOrder::LittleEndian);

        let mut format: Option<WaveFormatChunk> = None;

        loop {
            let chunk = riff_chunks.next(&mut stream)?;

            // The data chunk stops the walk below, so running out of chunks means the stream
            // carries no audio payload.
            let Some(chunk) = chunk else {
                return missing_chunk_error("wav: data chunk");
            };

            match chunk {
                RiffWaveChunks::Format(fmt) => {
                    let fmt = fmt.parse(&mut stream)?;

                    debug!(
                        "fmt chunk: format={:?}, channels={}, rate={} Hz, block_align={}",
                        fmt.format, fmt.n_channels, fmt.sample_rate, fmt.block_align
                    );

                    format = Some(fmt);
                }
                RiffWaveChunks::Data(data) => {
                    let data = data.parse(&mut stream)?;

                    let Some(format) = format else {
                        return missing_chunk_error("wav: fmt chunk");
                    };

                    // The position of the first byte of PCM data. External position 0 maps
                    // here.
                    let data_start_pos = stream.pos();

                    // If the fmt chunk did not provide a frame alignment, derive it from the
                    // sample width and channel count.
                    let block_align = if format.block_align > 0 {
                        u32::from(format.block_align)
                    }
                    else {
                        u32::from(format.bits_per_sample / 8) * u32::from(format.n_channels)
                    };

                    if block_align == 0 {
                        return decode_error("wav: invalid block alignment");
                    }

                    let num_sample_frames = u64::from(data.len) / u64::from(block_align);

                    let info = StreamInfo::new(
                        format.format,
                        format.sample_rate,
                        u32::from(format.n_channels),
                        num_sample_frames,
                    );

                    return Ok(WavSource { stream, info, data_start_pos });
                }
            }
        }
    }
}

impl AudioSource for WavSource {
    fn info(&self) -> &StreamInfo {
        &self.info
    }

    fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        read_pcm_payload(&mut self.stream, self.data_start_pos, self.info.num_bytes(), dst)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        seek_pcm_payload(&mut self.stream, self.data_start_pos, self.info.num_bytes(), pos)
    }
}

// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::SeekFrom;
use std::path::Path;

use pcmstream_core::errors::{
    bad_magic_error, decode_error, missing_chunk_error, Error, Result,
};
use pcmstream_core::info::StreamInfo;
use pcmstream_core::io::{ReadBytes, SourceStream};
use pcmstream_core::source::AudioSource;

use log::debug;

use crate::common::{read_pcm_payload, seek_pcm_payload, ByteOrder, ChunksReader};

mod chunks;

use chunks::*;

/// An AIFF file is an IFF stream, with a "FORM" ASCII group marker.
const AIFF_STREAM_MARKER: [u8; 4] = *b"FORM";
/// The IFF form for uncompressed AIFF.
const AIFF_FORM: [u8; 4] = *b"AIFF";
/// The IFF form for AIFC, potentially carrying compressed data.
const AIFC_FORM: [u8; 4] = *b"AIFC";

/// Audio Interchange File Format (AIFF) reader.
///
/// `AiffSource` parses the FORM header of an AIFF or AIFC file and presents the sound data
/// chunk as a seekable stream of PCM bytes.
pub struct AiffSource {
    stream: SourceStream,
    info: StreamInfo,
    data_start_pos: u64,
}

impl AiffSource {
    /// Opens the AIFF file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::try_new(SourceStream::open(path)?)
    }

    /// Attempts to read an AIFF header from the stream. On success the stream is positioned at
    /// the first byte of PCM data.
    pub fn try_new(mut stream: SourceStream) -> Result<Self> {
        let (form, form_len) = find_aiff_form(&mut stream)?;

        let mut form_chunks =
            ChunksReader::<RiffAiffChunks>::new(Some(form_len - 4), ByteOrder::BigEndian);

        let mut comm: Option<CommonChunk> = None;

        // Scan the subchunks. The sound data chunk terminates the walk, leaving the stream at
        // the first PCM byte.
        let sound = loop {
            let chunk = form_chunks.next(&mut stream)?;

            let Some(chunk) = chunk else {
                return missing_chunk_error("aiff: sound data chunk");
            };

            match chunk {
                RiffAiffChunks::Common(chunk) => {
                    if comm.is_some() {
                        return decode_error("aiff: multiple common chunks");
                    }

                    comm = match form {
                        AIFF_FORM => Some(chunk.parse_aiff(&mut stream)?),
                        AIFC_FORM => Some(chunk.parse_aifc(&mut stream)?),
                        _ => unreachable!(),
                    };
                }
                RiffAiffChunks::Sound(chunk) => break chunk.parse(&mut stream)?,
            }
        };

        let Some(comm) = comm else {
            return missing_chunk_error("aiff: common chunk");
        };

        debug!(
            "comm chunk: format={:?}, channels={}, rate={} Hz, bits={}, frames={}",
            comm.format, comm.n_channels, comm.sample_rate, comm.sample_size, comm.n_sample_frames
        );

        debug!("ssnd chunk: offset={}, len={}", sound.offset, sound.len);

        let info = StreamInfo::new(
            comm.format,
            comm.sample_rate,
            u32::from(comm.n_channels),
            u64::from(comm.n_sample_frames),
        );

        Ok(AiffSource { stream, info, data_start_pos: sound.data_start_pos })
    }
}

/// Walks the top-level chunks of the stream until a FORM group with an AIFF or AIFC form type
/// is found, and returns the form type and the group's length.
fn find_aiff_form(stream: &mut SourceStream) -> Result<([u8; 4], u32)> {
    loop {
        let marker = match stream.read_quad_bytes() {
            Ok(marker) => marker,
            Err(Error::Truncated(_)) | Err(Error::EndOfStream) => {
                return bad_magic_error("aiff: missing aiff form");
            }
            Err(err) => return Err(err),
        };

        let len = stream.read_be_u32()?;

        if marker == AIFF_STREAM_MARKER {
            if len < 4 {
                return decode_error("aiff: invalid form chunk length");
            }

            let form = stream.read_quad_bytes()?;

            if form == AIFF_FORM || form == AIFC_FORM {
                return Ok((form, len));
            }

            // A FORM group of some other type. Skip its remaining payload.
            stream.ignore_bytes(u64::from(len - 4) + u64::from(len & 1))?;
        }
        else {
            // Not a FORM group at all. Skip the chunk with 2-byte padding.
            stream.ignore_bytes(u64::from(len) + u64::from(len & 1))?;
        }
    }
}

impl AudioSource for AiffSource {
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

#[cfg(test)]
mod tests {
    use std::io::{Cursor, SeekFrom};

    use pcmstream_core::errors::Error;
    use pcmstream_core::io::SourceStream;
    use pcmstream_core::pcm::PcmFormat;
    use pcmstream_core::source::AudioSource;

    use super::AiffSource;

    /// Encodes a sample rate as an 80-bit IEEE 754 extended float: a sign bit, a 15-bit biased
    /// exponent, and a 64-bit mantissa with an explicit integer bit.
    fn encode_sample_rate(rate: u32) -> [u8; 10] {
        assert!(rate > 0);

        let shift = (rate as u64).leading_zeros();
        let mantissa = (rate as u64) << shift;
        let exponent = (16_383 + 63 - shift) as u16;

        let mut bytes = [0u8; 10];
        bytes[..2].copy_from_slice(&exponent.to_be_bytes());
        bytes[2..].copy_from_slice(&mantissa.to_be_bytes());
        bytes
    }

    struct AiffBuilder {
        form: [u8; 4],
        chunks: Vec<u8>,
    }

    impl AiffBuilder {
        fn aiff() -> Self {
            AiffBuilder { form: *b"AIFF", chunks: Vec::new() }
        }

        fn aifc() -> Self {
            AiffBuilder { form: *b"AIFC", chunks: Vec::new() }
        }

        fn chunk(mut self, tag: &[u8; 4], body: &[u8]) -> Self {
            self.chunks.extend_from_slice(tag);
            self.chunks.extend_from_slice(&(body.len() as u32).to_be_bytes());
            self.chunks.extend_from_slice(body);
            if body.len() & 1 == 1 {
                self.chunks.push(0);
            }
            self
        }

        fn comm(self, channels: i16, frames: u32, bits: i16, rate: u32) -> Self {
            let mut body = Vec::new();
            body.extend_from_slice(&channels.to_be_bytes());
            body.extend_from_slice(&frames.to_be_bytes());
            body.extend_from_slice(&bits.to_be_bytes());
            body.extend_from_slice(&encode_sample_rate(rate));
            self.chunk(b"COMM", &body)
        }

        fn comm_aifc(
            self,
            channels: i16,
            frames: u32,
            bits: i16,
            rate: u32,
            compression: &[u8; 4],
            name: &[u8],
        ) -> Self {
            let mut body = Vec::new();
            body.extend_from_slice(&channels.to_be_bytes());
            body.extend_from_slice(&frames.to_be_bytes());
            body.extend_from_slice(&bits.to_be_bytes());
            body.extend_from_slice(&encode_sample_rate(rate));
            body.extend_from_slice(compression);
            // Pascal-style compressor name, padded to even length including the length byte.
            body.push(name.len() as u8);
            body.extend_from_slice(name);
            if name.len() & 1 == 0 {
                body.push(0);
            }
            self.chunk(b"COMM", &body)
        }

        fn ssnd(self, offset: u32, pcm: &[u8]) -> Self {
            let mut body = Vec::new();
            body.extend_from_slice(&offset.to_be_bytes());
            body.extend_from_slice(&0u32.to_be_bytes()); // block size
            body.extend_from_slice(&vec![0u8; offset as usize]);
            body.extend_from_slice(pcm);
            self.chunk(b"SSND", &body)
        }

        fn build(self) -> SourceStream {
            let mut file = Vec::new();
            file.extend_from_slice(b"FORM");
            file.extend_from_slice(&(4 + self.chunks.len() as u32).to_be_bytes());
            file.extend_from_slice(&self.form);
            file.extend_from_slice(&self.chunks);
            SourceStream::new(Box::new(Cursor::new(file)))
        }
    }

    #[test]
    fn parses_a_24_bit_mono_file() {
        let stream = AiffBuilder::aiff()
            .comm(1, 1, 24, 48_000)
            .ssnd(0, &[0x00, 0x00, 0x01])
            .build();

        let mut source = AiffSource::try_new(stream).unwrap();

        assert_eq!(source.info().format(), PcmFormat::s24be());
        assert_eq!(source.info().num_channels(), 1);
        assert_eq!(source.info().sample_rate(), 48_000);
        assert_eq!(source.info().num_sample_frames(), 1);

        let mut buf = [0u8; 3];
        assert_eq!(source.read(&mut buf).unwrap(), 3);
        assert_eq!(buf, [0x00, 0x00, 0x01]);
        assert_eq!(source.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn aifc_sowt_selects_little_endian() {
        let stream = AiffBuilder::aifc()
            .comm_aifc(1, 1, 24, 48_000, b"sowt", b"not compressed")
            .ssnd(0, &[0x00, 0x00, 0x01])
            .build();

        let mut source = AiffSource::try_new(stream).unwrap();

        // Same payload bytes, little-endian interpretation.
        assert_eq!(source.info().format(), PcmFormat::s24le());

        let mut buf = [0u8; 3];
        assert_eq!(source.read(&mut buf).unwrap(), 3);
        assert_eq!(buf, [0x00, 0x00, 0x01]);
    }

    #[test]
    fn aifc_none_stays_big_endian() {
        let stream = AiffBuilder::aifc()
            .comm_aifc(2, 4, 16, 44_100, b"NONE", b"")
            .ssnd(0, &[0u8; 16])
            .build();

        let source = AiffSource::try_new(stream).unwrap();

        assert_eq!(source.info().format(), PcmFormat::s16be());
        assert_eq!(source.info().num_sample_frames(), 4);
    }

    #[test]
    fn aifc_unknown_compression_fails() {
        let stream = AiffBuilder::aifc()
            .comm_aifc(1, 1, 16, 44_100, b"ima4", b"")
            .ssnd(0, &[0u8; 2])
            .build();

        assert!(matches!(AiffSource::try_new(stream), Err(Error::Unsupported(_))));
    }

    #[test]
    fn sample_sizes_select_the_format() {
        for (bits, expected) in [
            (8i16, PcmFormat::u8()),
            (16, PcmFormat::s16be()),
            (24, PcmFormat::s24be()),
            (32, PcmFormat::s32be()),
        ] {
            let pcm = vec![0u8; (bits as usize / 8) * 2];
            let stream = AiffBuilder::aiff().comm(1, 2, bits, 44_100).ssnd(0, &pcm).build();
            let source = AiffSource::try_new(stream).unwrap();

            assert_eq!(source.info().format(), expected, "{} bits", bits);
        }
    }

    #[test]
    fn ssnd_offset_shifts_the_payload_start() {
        let stream = AiffBuilder::aiff()
            .comm(1, 2, 16, 8_000)
            .ssnd(6, &[0x0a, 0x0b, 0x0c, 0x0d])
            .build();

        let mut source = AiffSource::try_new(stream).unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(source.read(&mut buf).unwrap(), 4);
        assert_eq!(buf, [0x0a, 0x0b, 0x0c, 0x0d]);
    }

    #[test]
    fn unknown_subchunks_are_skipped() {
        let stream = AiffBuilder::aiff()
            .chunk(b"NAME", b"a track title")
            .comm(1, 1, 16, 8_000)
            .chunk(b"MARK", &[0u8; 2])
            .ssnd(0, &[0x7f, 0xff])
            .build();

        let mut source = AiffSource::try_new(stream).unwrap();

        let mut buf = [0u8; 2];
        assert_eq!(source.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [0x7f, 0xff]);
    }

    #[test]
    fn seeks_are_rebased_to_the_payload() {
        let pcm: Vec<u8> = (0..8).collect();
        let stream = AiffBuilder::aiff().comm(1, 4, 16, 8_000).ssnd(0, &pcm).build();
        let mut source = AiffSource::try_new(stream).unwrap();

        assert_eq!(source.seek(SeekFrom::Start(2)).unwrap(), 2);

        let mut buf = [0u8; 2];
        source.read(&mut buf).unwrap();
        assert_eq!(buf, [2, 3]);

        assert_eq!(source.seek(SeekFrom::Current(0)).unwrap(), 4);
        assert_eq!(source.seek(SeekFrom::End(-2)).unwrap(), 6);
    }

    #[test]
    fn delivered_bytes_match_the_header() {
        let pcm = vec![0x11u8; 24];
        let stream = AiffBuilder::aiff().comm(2, 6, 16, 96_000).ssnd(0, &pcm).build();
        let mut source = AiffSource::try_new(stream).unwrap();

        let expected =
            source.info().num_sample_frames() * source.info().bytes_per_sample_frame();

        let mut total = 0u64;
        let mut buf = [0u8; 5];
        loop {
            let count = source.read(&mut buf).unwrap();
            if count == 0 {
                break;
            }
            total += count as u64;
        }

        assert_eq!(total, expected);
        assert_eq!(total, 24);
    }

    #[test]
    fn locates_the_form_among_other_top_level_chunks() {
        // A non-FORM top-level chunk, then a FORM of a different type, then the real one.
        let mut file = Vec::new();
        file.extend_from_slice(b"JUNK");
        file.extend_from_slice(&3u32.to_be_bytes());
        file.extend_from_slice(&[0, 0, 0, 0]); // 3 bytes + pad

        file.extend_from_slice(b"FORM");
        file.extend_from_slice(&4u32.to_be_bytes());
        file.extend_from_slice(b"AVI ");

        let aiff = AiffBuilder::aiff().comm(1, 1, 16, 8_000).ssnd(0, &[0x01, 0x02]);
        let mut inner = Vec::new();
        inner.extend_from_slice(b"FORM");
        inner.extend_from_slice(&(4 + aiff.chunks.len() as u32).to_be_bytes());
        inner.extend_from_slice(b"AIFF");
        inner.extend_from_slice(&aiff.chunks);
        file.extend_from_slice(&inner);

        let mut source = AiffSource::try_new(SourceStream::new(Box::new(Cursor::new(file)))).unwrap();

        let mut buf = [0u8; 2];
        assert_eq!(source.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [0x01, 0x02]);
    }

    #[test]
    fn missing_chunks_are_fatal() {
        // COMM but no SSND.
        let stream = AiffBuilder::aiff().comm(1, 1, 16, 8_000).build();
        assert!(matches!(AiffSource::try_new(stream), Err(Error::MissingChunk(_))));

        // SSND but no COMM.
        let stream = AiffBuilder::aiff().ssnd(0, &[0u8; 2]).build();
        assert!(matches!(AiffSource::try_new(stream), Err(Error::MissingChunk(_))));

        // No FORM at all.
        let stream = SourceStream::new(Box::new(Cursor::new(b"MThd\x00\x00\x00\x00".to_vec())));
        assert!(matches!(AiffSource::try_new(stream), Err(Error::BadMagic(_))));
    }

    #[test]
    fn rejects_invalid_comm_fields() {
        // Zero channels.
        let stream = AiffBuilder::aiff().comm(0, 1, 16, 8_000).ssnd(0, &[0u8; 2]).build();
        assert!(matches!(AiffSource::try_new(stream), Err(Error::DecodeError(_))));

        // Unsupported sample size.
        let stream = AiffBuilder::aiff().comm(1, 1, 20, 8_000).ssnd(0, &[0u8; 4]).build();
        assert!(matches!(AiffSource::try_new(stream), Err(Error::Unsupported(_))));
    }
}

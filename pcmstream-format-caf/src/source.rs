// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::SeekFrom;
use std::path::Path;

use pcmstream_core::errors::{
    bad_magic_error, decode_error, missing_chunk_error, seek_error, unsupported_error, Error,
    Result, SeekErrorKind,
};
use pcmstream_core::info::StreamInfo;
use pcmstream_core::io::{ReadBytes, SourceStream};
use pcmstream_core::pcm::PcmFormat;
use pcmstream_core::source::AudioSource;

use log::{debug, info, warn};

use crate::chunks::{read_ber_integer, AudioDescription, PacketTableHeader};

/// ALAC packets may carry an escape header in front of the sample payload; the decode scratch
/// buffer is padded by this many bytes beyond one packet's worth of output.
const ALAC_MAX_ESCAPE_HEADER_BYTES: usize = 8;

/// A BER-encoded 32-bit packet size occupies at most 5 bytes.
const MAX_BER_SIZE: usize = 5;

/// The contract an ALAC packet decoder must fulfil to collaborate with [`CafSource`].
///
/// The decoder is initialized once with the magic cookie found in the container, then driven
/// packet by packet. `decode` writes interleaved PCM into `out` and reports the number of
/// sample frames produced. The source owns its decoder and drops it with the stream on every
/// exit path.
pub trait AlacDecoder {
    /// Initializes the decoder from the codec-private magic cookie.
    fn init(&mut self, magic_cookie: &[u8]) -> Result<()>;

    /// Decodes one compressed packet into `out`, returning the number of sample frames decoded.
    fn decode(
        &mut self,
        packet: &[u8],
        out: &mut [u8],
        frames_per_packet: u32,
        channels: u32,
    ) -> Result<u32>;
}

/// Core Audio Format (CAF) reader for Apple Lossless streams.
///
/// `CafSource` walks the CAFF chunks, hands the magic cookie to its decoder, and then drives
/// the decoder packet by packet using the BER-encoded packet table, presenting the decoded
/// output as a stream of little-endian PCM bytes.
pub struct CafSource<D: AlacDecoder> {
    stream: SourceStream,
    decoder: D,
    info: StreamInfo,
    frames_per_packet: u32,
    channels: u32,
    bytes_per_frame: usize,
    /// Absolute position of the first packet byte in the data chunk.
    data_start_pos: u64,
    /// Absolute position of the first BER byte in the packet table.
    packet_table_start: u64,
    /// Absolute position one past the last BER byte.
    packet_table_end: u64,
    /// The read cursor into the data chunk.
    input_data_pos: u64,
    /// The read cursor into the packet table.
    packet_table_pos: u64,
    /// Scratch buffer one compressed packet is read into.
    scratch: Box<[u8]>,
    /// Decoded samples not yet delivered to the consumer.
    decoded: Vec<u8>,
    /// Offset of the first undelivered byte in `decoded`.
    decoded_offset: usize,
    /// The external stream position in decoded bytes.
    pos: u64,
}

struct CafChunks {
    desc: Option<AudioDescription>,
    cookie: Option<Box<[u8]>>,
    data_start: Option<u64>,
    packet_table: Option<(u64, u64)>,
}

impl CafChunks {
    fn complete(&self) -> bool {
        self.desc.is_some()
            && self.cookie.is_some()
            && self.data_start.is_some()
            && self.packet_table.is_some()
    }
}

impl<D: AlacDecoder> CafSource<D> {
    /// Opens the CAF file at `path`, driving packet decode through `decoder`.
    pub fn open<P: AsRef<Path>>(path: P, decoder: D) -> Result<Self> {
        Self::try_new(SourceStream::open(path)?, decoder)
    }

    /// Attempts to read a CAFF header from the stream. The whole stream is decoded once to
    /// learn the total frame count, then rewound to the start of audio.
    pub fn try_new(mut stream: SourceStream, mut decoder: D) -> Result<Self> {
        check_file_header(&mut stream)?;

        let chunks = read_chunks(&mut stream)?;

        let Some(desc) = chunks.desc else {
            return missing_chunk_error("caf: audio description chunk");
        };
        let Some(cookie) = chunks.cookie else {
            return missing_chunk_error("caf: magic cookie chunk");
        };
        let Some(data_start) = chunks.data_start else {
            return missing_chunk_error("caf: audio data chunk");
        };
        let Some((packet_table_start, packet_table_end)) = chunks.packet_table else {
            return missing_chunk_error("caf: packet table chunk");
        };

        if desc.format_id != *b"alac" {
            return unsupported_error("caf: format id is not alac");
        }

        if desc.channels_per_frame > 2 {
            return unsupported_error("caf: a maximum of two channels is supported");
        }

        if desc.frames_per_packet == 0 {
            return decode_error("caf: frames per packet must not be zero");
        }

        let depth = desc.source_bit_depth()?;

        // The decoded output is interleaved little-endian PCM at the source bit depth.
        let format = match depth {
            8 => PcmFormat::s8(),
            16 => PcmFormat::s16le(),
            24 => PcmFormat::s24le(),
            32 => PcmFormat::s32le(),
            _ => return unsupported_error("caf: unsupported alac bit depth"),
        };

        if decoder.init(&cookie).is_err() {
            return Err(Error::DecoderInit("caf: could not initialize the alac decoder"));
        }

        let channels = desc.channels_per_frame;
        let bytes_per_frame = (channels * (depth / 8)) as usize;
        let scratch_len =
            bytes_per_frame * desc.frames_per_packet as usize + ALAC_MAX_ESCAPE_HEADER_BYTES;

        let mut source = CafSource {
            stream,
            decoder,
            info: StreamInfo::new(format, desc.sample_rate as u32, channels, 0),
            frames_per_packet: desc.frames_per_packet,
            channels,
            bytes_per_frame,
            data_start_pos: data_start,
            packet_table_start,
            packet_table_end,
            input_data_pos: data_start,
            packet_table_pos: packet_table_start,
            scratch: vec![0u8; scratch_len].into_boxed_slice(),
            decoded: Vec::new(),
            decoded_offset: 0,
            pos: 0,
        };

        // The container does not record the decoded length authoritatively, so the total frame
        // count is learned by decoding the entire stream once, then rewinding both cursors.
        let mut total_bytes = 0u64;

        loop {
            let count = source.decode_block()?;
            if count == 0 {
                break;
            }
            total_bytes += count as u64;
        }

        let num_frames = total_bytes / bytes_per_frame as u64;

        debug!("full decode pass: {} bytes, {} frames", total_bytes, num_frames);

        source.info = StreamInfo::new(format, desc.sample_rate as u32, channels, num_frames);
        source.rewind()?;

        Ok(source)
    }

    /// Decodes the next packet into the decoded-sample buffer. Returns the number of decoded
    /// bytes available, with 0 indicating the end of the stream.
    fn decode_block(&mut self) -> Result<usize> {
        self.decoded.clear();
        self.decoded_offset = 0;

        // The next packet's compressed size comes from the BER-encoded packet table.
        if self.packet_table_pos >= self.packet_table_end {
            return Ok(0);
        }

        self.stream.seek(SeekFrom::Start(self.packet_table_pos))?;

        // The size field is at most 5 bytes and never extends past the packet table, so it can
        // be read exactly; a short read here means the file itself is truncated.
        let mut ber = [0u8; MAX_BER_SIZE];
        let ber_avail =
            (self.packet_table_end - self.packet_table_pos).min(MAX_BER_SIZE as u64) as usize;
        self.stream.read_buf_exact(&mut ber[..ber_avail])?;

        let (packet_len, ber_used) = read_ber_integer(&ber[..ber_avail])?;
        self.packet_table_pos += ber_used as u64;

        if packet_len == 0 {
            return Ok(0);
        }

        let packet_len = packet_len as usize;

        if packet_len > self.scratch.len() {
            return decode_error("caf: packet size exceeds the decode buffer");
        }

        // Read the compressed packet from the data chunk.
        self.stream.seek(SeekFrom::Start(self.input_data_pos))?;

        match self.stream.read_buf_exact(&mut self.scratch[..packet_len]) {
            Ok(()) => (),
            Err(Error::Truncated(_)) | Err(Error::EndOfStream) => {
                // The data chunk ended before the packet table did.
                warn!("audio data ended mid-packet, ending stream");
                return Ok(0);
            }
            Err(err) => return Err(err),
        }

        self.input_data_pos += packet_len as u64;

        self.decoded.resize(self.scratch.len(), 0);

        let frames = match self.decoder.decode(
            &self.scratch[..packet_len],
            &mut self.decoded,
            self.frames_per_packet,
            self.channels,
        ) {
            Ok(frames) => frames,
            Err(err) => {
                // A decoder failure ends the stream at the current position; the caller
                // observes a short or zero read.
                warn!("alac decoder failed ({}), ending stream", err);
                0
            }
        };

        self.decoded.truncate(frames as usize * self.bytes_per_frame);

        Ok(self.decoded.len())
    }

    /// Rewinds both cursors to the start of audio and discards any decoded samples.
    fn rewind(&mut self) -> Result<()> {
        self.stream.seek(SeekFrom::Start(self.data_start_pos))?;

        self.input_data_pos = self.data_start_pos;
        self.packet_table_pos = self.packet_table_start;
        self.decoded.clear();
        self.decoded_offset = 0;
        self.pos = 0;

        Ok(())
    }
}

impl<D: AlacDecoder> AudioSource for CafSource<D> {
    fn info(&self) -> &StreamInfo {
        &self.info
    }

    fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        let mut delivered = 0;

        while delivered < dst.len() {
            let available = self.decoded.len() - self.decoded_offset;

            if available == 0 {
                if self.decode_block()? == 0 {
                    break;
                }
                continue;
            }

            let count = available.min(dst.len() - delivered);
            let start = self.decoded_offset;

            dst[delivered..delivered + count]
                .copy_from_slice(&self.decoded[start..start + count]);

            self.decoded_offset += count;
            delivered += count;
        }

        self.pos += delivered as u64;

        Ok(delivered)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        // Packet-aligned seeking is not implemented; only position queries and a rewind to the
        // beginning of the stream are supported.
        match pos {
            SeekFrom::Current(0) => Ok(self.pos),
            SeekFrom::Start(0) => {
                self.rewind()?;
                Ok(0)
            }
            _ => seek_error(SeekErrorKind::Unseekable),
        }
    }
}

fn check_file_header(stream: &mut SourceStream) -> Result<()> {
    let file_type = stream.read_quad_bytes()?;

    if file_type != *b"caff" {
        return bad_magic_error("caf: missing caff stream marker");
    }

    let file_version = stream.read_be_u16()?;

    if file_version != 1 {
        return unsupported_error("caf: unsupported file version");
    }

    // Ignored in CAF v1.
    let _file_flags = stream.read_be_u16()?;

    Ok(())
}

fn read_chunks(stream: &mut SourceStream) -> Result<CafChunks> {
    let mut chunks =
        CafChunks { desc: None, cookie: None, data_start: None, packet_table: None };

    loop {
        if let Some(byte_len) = stream.byte_len() {
            if stream.pos() >= byte_len {
                break;
            }
        }
        else if chunks.complete() {
            // An unseekable source cannot be scanned to its end; stop once every required
            // chunk has been seen.
            break;
        }

        let chunk_type = match stream.read_quad_bytes() {
            Ok(chunk_type) => chunk_type,
            Err(Error::Truncated(_)) | Err(Error::EndOfStream) => break,
            Err(err) => return Err(err),
        };

        let chunk_size = stream.read_be_i64()?;

        match &chunk_type {
            b"desc" => {
                if chunks.desc.is_some() {
                    return decode_error("caf: additional audio description chunk");
                }
                chunks.desc = Some(AudioDescription::read(stream, chunk_size)?);
            }
            b"kuki" => {
                let Ok(cookie_len) = usize::try_from(chunk_size) else {
                    return decode_error("caf: invalid magic cookie chunk size");
                };
                chunks.cookie = Some(stream.read_boxed_slice_exact(cookie_len)?);
            }
            b"data" => {
                // The payload begins after a 4-byte edit-count prefix.
                if chunk_size != -1 && chunk_size < 4 {
                    return decode_error("caf: invalid audio data chunk size");
                }

                let _edit_count = stream.read_be_u32()?;
                chunks.data_start = Some(stream.pos());

                if chunk_size == -1 {
                    // The audio data extends to the end of the file; it is necessarily the
                    // last chunk.
                    break;
                }

                stream.ignore_bytes((chunk_size - 4) as u64)?;
            }
            b"pakt" => {
                let header = PacketTableHeader::read(stream, chunk_size)?;

                debug!("packet table: {} packets", header.total_packets);

                let start = stream.pos();
                let len = (chunk_size - PacketTableHeader::SIZE) as u64;
                chunks.packet_table = Some((start, start + len));

                stream.ignore_bytes(len)?;
            }
            b"free" => {
                if chunk_size < 0 {
                    return decode_error("caf: invalid free chunk size");
                }
                stream.ignore_bytes(chunk_size as u64)?;
            }
            other => {
                info!(
                    "ignoring unknown chunk: tag={}, size={}.",
                    String::from_utf8_lossy(other),
                    chunk_size
                );

                if chunk_size < 0 {
                    return decode_error("caf: invalid chunk size");
                }
                stream.ignore_bytes(chunk_size as u64)?;
            }
        }
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, SeekFrom};

    use pcmstream_core::errors::{decoder_error, Error, Result};
    use pcmstream_core::io::SourceStream;
    use pcmstream_core::pcm::PcmFormat;
    use pcmstream_core::source::AudioSource;

    use super::{AlacDecoder, CafSource};

    /// A stand-in packet decoder: packets carry their decoded payload verbatim, so `decode` is
    /// a copy and the frame count is the payload length over the frame size.
    struct StubDecoder {
        bytes_per_frame: usize,
        cookie: Vec<u8>,
        fail_after: Option<usize>,
        packets_decoded: usize,
    }

    impl StubDecoder {
        fn new(bytes_per_frame: usize) -> Self {
            StubDecoder { bytes_per_frame, cookie: Vec::new(), fail_after: None, packets_decoded: 0 }
        }

        fn failing_after(bytes_per_frame: usize, packets: usize) -> Self {
            StubDecoder {
                bytes_per_frame,
                cookie: Vec::new(),
                fail_after: Some(packets),
                packets_decoded: 0,
            }
        }
    }

    impl AlacDecoder for StubDecoder {
        fn init(&mut self, magic_cookie: &[u8]) -> Result<()> {
            if magic_cookie.is_empty() {
                return decoder_error("stub: empty magic cookie");
            }
            self.cookie = magic_cookie.to_vec();
            Ok(())
        }

        fn decode(
            &mut self,
            packet: &[u8],
            out: &mut [u8],
            _frames_per_packet: u32,
            _channels: u32,
        ) -> Result<u32> {
            if let Some(limit) = self.fail_after {
                if self.packets_decoded >= limit {
                    return decoder_error("stub: decode failure");
                }
            }

            self.packets_decoded += 1;
            out[..packet.len()].copy_from_slice(packet);
            Ok((packet.len() / self.bytes_per_frame) as u32)
        }
    }

    fn ber_encode(mut value: u32) -> Vec<u8> {
        let mut digits = vec![(value & 0x7f) as u8];
        value >>= 7;

        while value > 0 {
            digits.push((value & 0x7f) as u8 | 0x80);
            value >>= 7;
        }

        digits.reverse();
        digits
    }

    struct CafBuilder {
        chunks: Vec<u8>,
    }

    impl CafBuilder {
        fn new() -> Self {
            CafBuilder { chunks: Vec::new() }
        }

        fn chunk(mut self, tag: &[u8; 4], body: &[u8]) -> Self {
            self.chunks.extend_from_slice(tag);
            self.chunks.extend_from_slice(&(body.len() as i64).to_be_bytes());
            self.chunks.extend_from_slice(body);
            self
        }

        fn desc(self, rate: f64, format_id: &[u8; 4], flags: u32, fpp: u32, channels: u32) -> Self {
            let mut body = Vec::new();
            body.extend_from_slice(&rate.to_be_bytes());
            body.extend_from_slice(format_id);
            body.extend_from_slice(&flags.to_be_bytes());
            body.extend_from_slice(&0u32.to_be_bytes()); // bytes per packet (variable)
            body.extend_from_slice(&fpp.to_be_bytes());
            body.extend_from_slice(&channels.to_be_bytes());
            body.extend_from_slice(&0u32.to_be_bytes()); // bits per channel
            self.chunk(b"desc", &body)
        }

        fn kuki(self, cookie: &[u8]) -> Self {
            self.chunk(b"kuki", cookie)
        }

        fn pakt(self, packet_sizes: &[u32]) -> Self {
            let mut body = Vec::new();
            body.extend_from_slice(&(packet_sizes.len() as i64).to_be_bytes());
            body.extend_from_slice(&0i64.to_be_bytes()); // valid frames
            body.extend_from_slice(&0u32.to_be_bytes()); // priming frames
            body.extend_from_slice(&0u32.to_be_bytes()); // remainder frames
            for &size in packet_sizes {
                body.extend_from_slice(&ber_encode(size));
            }
            self.chunk(b"pakt", &body)
        }

        fn data(self, packets: &[u8]) -> Self {
            let mut body = Vec::new();
            body.extend_from_slice(&0u32.to_be_bytes()); // edit count
            body.extend_from_slice(packets);
            self.chunk(b"data", &body)
        }

        fn build(self) -> SourceStream {
            let mut file = Vec::new();
            file.extend_from_slice(b"caff");
            file.extend_from_slice(&1u16.to_be_bytes()); // version
            file.extend_from_slice(&0u16.to_be_bytes()); // flags
            file.extend_from_slice(&self.chunks);
            SourceStream::new(Box::new(Cursor::new(file)))
        }
    }

    // A 16-bit mono stream, 4 frames per packet: each packet decodes to 8 bytes.
    fn two_packet_stream() -> SourceStream {
        let packets: Vec<u8> = (0..16).collect();

        CafBuilder::new()
            .desc(44_100.0, b"alac", 1, 4, 1)
            .kuki(&[0xde, 0xad, 0xbe, 0xef])
            .pakt(&[8, 8])
            .data(&packets)
            .build()
    }

    #[test]
    fn parses_header_and_counts_frames() {
        let source = CafSource::try_new(two_packet_stream(), StubDecoder::new(2)).unwrap();

        assert_eq!(source.info().format(), PcmFormat::s16le());
        assert_eq!(source.info().num_channels(), 1);
        assert_eq!(source.info().sample_rate(), 44_100);
        // 16 payload bytes at 2 bytes per frame.
        assert_eq!(source.info().num_sample_frames(), 8);
    }

    #[test]
    fn reads_across_packet_boundaries() {
        let mut source = CafSource::try_new(two_packet_stream(), StubDecoder::new(2)).unwrap();

        // 5 bytes spans into the second packet.
        let mut buf = [0u8; 5];
        assert_eq!(source.read(&mut buf).unwrap(), 5);
        assert_eq!(buf, [0, 1, 2, 3, 4]);

        let mut rest = [0u8; 32];
        assert_eq!(source.read(&mut rest).unwrap(), 11);
        assert_eq!(&rest[..11], &(5..16).collect::<Vec<u8>>()[..]);

        assert_eq!(source.read(&mut rest).unwrap(), 0);
    }

    #[test]
    fn delivered_bytes_match_the_frame_count() {
        let mut source = CafSource::try_new(two_packet_stream(), StubDecoder::new(2)).unwrap();

        let expected =
            source.info().num_sample_frames() * source.info().bytes_per_sample_frame();

        let mut total = 0u64;
        let mut buf = [0u8; 3];
        loop {
            let count = source.read(&mut buf).unwrap();
            if count == 0 {
                break;
            }
            total += count as u64;
        }

        assert_eq!(total, expected);
    }

    #[test]
    fn multi_byte_ber_packet_sizes() {
        // One packet of 200 bytes needs a 2-byte BER size.
        let packets = vec![0x5au8; 200];

        let stream = CafBuilder::new()
            .desc(48_000.0, b"alac", 3, 40, 2) // 24-bit stereo, 40 frames per packet
            .kuki(&[1])
            .pakt(&[200])
            .data(&packets)
            .build();

        // 24-bit stereo frames are 6 bytes.
        let mut source = CafSource::try_new(stream, StubDecoder::new(6)).unwrap();

        assert_eq!(source.info().format(), PcmFormat::s24le());
        assert_eq!(source.info().num_sample_frames(), 200 / 6);

        let mut buf = [0u8; 16];
        assert_eq!(source.read(&mut buf).unwrap(), 16);
        assert!(buf.iter().all(|&b| b == 0x5a));
    }

    #[test]
    fn rewinds_to_the_start_of_stream() {
        let mut source = CafSource::try_new(two_packet_stream(), StubDecoder::new(2)).unwrap();

        let mut buf = [0u8; 6];
        source.read(&mut buf).unwrap();
        assert_eq!(source.seek(SeekFrom::Current(0)).unwrap(), 6);

        // Rewind and read again from the top.
        assert_eq!(source.seek(SeekFrom::Start(0)).unwrap(), 0);
        source.read(&mut buf).unwrap();
        assert_eq!(buf, [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn other_seeks_are_rejected() {
        let mut source = CafSource::try_new(two_packet_stream(), StubDecoder::new(2)).unwrap();

        let mut buf = [0u8; 2];
        source.read(&mut buf).unwrap();

        assert!(matches!(
            source.seek(SeekFrom::Start(4)),
            Err(Error::SeekError(_))
        ));
        assert!(matches!(source.seek(SeekFrom::End(0)), Err(Error::SeekError(_))));

        // A failed seek leaves the position unchanged.
        assert_eq!(source.seek(SeekFrom::Current(0)).unwrap(), 2);
    }

    #[test]
    fn cookie_reaches_the_decoder() {
        let source = CafSource::try_new(two_packet_stream(), StubDecoder::new(2)).unwrap();

        assert_eq!(source.decoder.cookie, vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn decoder_init_failure_is_fatal() {
        // The stub rejects an empty cookie.
        let stream = CafBuilder::new()
            .desc(44_100.0, b"alac", 1, 4, 1)
            .kuki(&[])
            .pakt(&[8])
            .data(&(0..8).collect::<Vec<u8>>())
            .build();

        assert!(matches!(
            CafSource::try_new(stream, StubDecoder::new(2)),
            Err(Error::DecoderInit(_))
        ));
    }

    #[test]
    fn decode_failure_ends_the_stream_short() {
        // The decoder fails on the second packet, so only the first packet's frames exist.
        let source =
            CafSource::try_new(two_packet_stream(), StubDecoder::failing_after(2, 1)).unwrap();

        assert_eq!(source.info().num_sample_frames(), 4);
    }

    #[test]
    fn rejects_non_alac_and_bad_descriptions() {
        let stream = CafBuilder::new()
            .desc(44_100.0, b"lpcm", 1, 4, 1)
            .kuki(&[1])
            .pakt(&[8])
            .data(&[0u8; 12])
            .build();
        assert!(matches!(
            CafSource::try_new(stream, StubDecoder::new(2)),
            Err(Error::Unsupported(_))
        ));

        // Format flags outside the known bit depths.
        let stream = CafBuilder::new()
            .desc(44_100.0, b"alac", 9, 4, 1)
            .kuki(&[1])
            .pakt(&[8])
            .data(&[0u8; 12])
            .build();
        assert!(matches!(
            CafSource::try_new(stream, StubDecoder::new(2)),
            Err(Error::Unsupported(_))
        ));

        // Three channels.
        let stream = CafBuilder::new()
            .desc(44_100.0, b"alac", 1, 4, 3)
            .kuki(&[1])
            .pakt(&[8])
            .data(&[0u8; 12])
            .build();
        assert!(matches!(
            CafSource::try_new(stream, StubDecoder::new(2)),
            Err(Error::Unsupported(_))
        ));

        // A 20-bit source depth has no PCM rendition.
        let stream = CafBuilder::new()
            .desc(44_100.0, b"alac", 2, 4, 1)
            .kuki(&[1])
            .pakt(&[8])
            .data(&[0u8; 12])
            .build();
        assert!(matches!(
            CafSource::try_new(stream, StubDecoder::new(2)),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn missing_chunks_are_fatal() {
        let stream = CafBuilder::new()
            .desc(44_100.0, b"alac", 1, 4, 1)
            .pakt(&[8])
            .data(&[0u8; 12])
            .build();
        assert!(matches!(
            CafSource::try_new(stream, StubDecoder::new(2)),
            Err(Error::MissingChunk(_))
        ));

        let stream = CafBuilder::new()
            .desc(44_100.0, b"alac", 1, 4, 1)
            .kuki(&[1])
            .data(&[0u8; 12])
            .build();
        assert!(matches!(
            CafSource::try_new(stream, StubDecoder::new(2)),
            Err(Error::MissingChunk(_))
        ));
    }

    #[test]
    fn wrong_magic_is_fatal() {
        let stream = SourceStream::new(Box::new(Cursor::new(b"RIFF\x00\x01\x00\x00".to_vec())));
        assert!(matches!(
            CafSource::try_new(stream, StubDecoder::new(2)),
            Err(Error::BadMagic(_))
        ));
    }

    #[test]
    fn unknown_chunks_are_skipped() {
        let packets: Vec<u8> = (0..8).collect();

        let stream = CafBuilder::new()
            .chunk(b"info", &[0u8; 10])
            .desc(44_100.0, b"alac", 1, 4, 1)
            .chunk(b"free", &[0u8; 6])
            .kuki(&[7])
            .pakt(&[8])
            .data(&packets)
            .build();

        let mut source = CafSource::try_new(stream, StubDecoder::new(2)).unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(source.read(&mut buf).unwrap(), 8);
        assert_eq!(&buf[..], &packets[..]);
    }
}

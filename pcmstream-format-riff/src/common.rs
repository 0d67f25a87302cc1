// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::SeekFrom;
use std::marker::PhantomData;

use pcmstream_core::errors::{decode_error, seek_error, Result, SeekErrorKind};
use pcmstream_core::io::{ReadBytes, SourceStream};

use log::info;

pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

/// `ParseChunkTag` maps a 4-byte chunk identifier onto an enumeration of recognized chunks, or
/// `None` for a chunk the walk should step over.
pub trait ParseChunkTag: Sized {
    fn parse_tag(tag: [u8; 4], len: u32) -> Option<Self>;
}

/// `ChunksReader` walks the subchunks of one parent chunk. Recognized chunks (per the
/// `ParseChunkTag` implementation) are handed back unread for the caller to parse; all others
/// are stepped over, with the 2-byte padding every IFF/RIFF chunk carries after an odd-length
/// body.
pub struct ChunksReader<T: ParseChunkTag> {
    /// Unread bytes of the parent chunk, if its length is known.
    remaining: Option<u64>,
    byte_order: ByteOrder,
    /// A pad byte sits between the previously dispatched chunk and the next header.
    pending_pad: bool,
    phantom: PhantomData<T>,
}

impl<T: ParseChunkTag> ChunksReader<T> {
    pub fn new(len: Option<u32>, byte_order: ByteOrder) -> Self {
        ChunksReader {
            remaining: len.map(u64::from),
            byte_order,
            pending_pad: false,
            phantom: PhantomData,
        }
    }

    /// Charges `count` bytes against the parent chunk. Returns false, charging nothing, if
    /// fewer bytes than that are left. Comparing before subtracting keeps a corrupt chunk
    /// length from wrapping the budget.
    fn charge(&mut self, count: u64) -> bool {
        match self.remaining {
            Some(remaining) if remaining < count => false,
            Some(remaining) => {
                self.remaining = Some(remaining - count);
                true
            }
            None => true,
        }
    }

    pub fn next<B: ReadBytes>(&mut self, reader: &mut B) -> Result<Option<T>> {
        loop {
            // An odd-length chunk is followed by one pad byte belonging to neither chunk.
            // Consume it now so the reader sits on the next header.
            if self.pending_pad {
                if !self.charge(1) {
                    return Ok(None);
                }
                reader.read_byte()?;
                self.pending_pad = false;
            }

            // The parent is exhausted once it cannot hold another 8-byte chunk header.
            if !self.charge(8) {
                return Ok(None);
            }

            let tag = reader.read_quad_bytes()?;

            let chunk_len = match self.byte_order {
                ByteOrder::LittleEndian => reader.read_u32()?,
                ByteOrder::BigEndian => reader.read_be_u32()?,
            };

            // The declared body must fit in what is left of the parent.
            if !self.charge(u64::from(chunk_len)) {
                return decode_error("riff: chunk length exceeds parent chunk length");
            }

            self.pending_pad = chunk_len & 1 == 1;

            match T::parse_tag(tag, chunk_len) {
                Some(chunk) => return Ok(Some(chunk)),
                None => {
                    info!(
                        "skipping unhandled chunk: {} ({} bytes)",
                        String::from_utf8_lossy(&tag),
                        chunk_len
                    );

                    reader.ignore_bytes(u64::from(chunk_len))?;
                }
            }
        }
    }
}

/// A chunk body that knows how to parse itself given its header.
pub trait ParseChunk: Sized {
    fn parse<B: ReadBytes>(reader: &mut B, tag: [u8; 4], len: u32) -> Result<Self>;
}

/// The header of a recognized chunk, deferring the read of its body until `parse` is called.
pub struct ChunkParser<P: ParseChunk> {
    tag: [u8; 4],
    pub len: u32,
    phantom: PhantomData<P>,
}

impl<P: ParseChunk> ChunkParser<P> {
    pub fn new(tag: [u8; 4], len: u32) -> Self {
        ChunkParser { tag, len, phantom: PhantomData }
    }

    pub fn parse<B: ReadBytes>(&self, reader: &mut B) -> Result<P> {
        P::parse(reader, self.tag, self.len)
    }
}

/// Skips whatever the chunk parser left unconsumed of a chunk body, so that the stream lands on
/// the chunk boundary the `ChunksReader` accounting expects.
pub fn skip_chunk_remainder<B: ReadBytes>(reader: &mut B, start_pos: u64, len: u32) -> Result<()> {
    let consumed = reader.pos() - start_pos;

    if consumed > u64::from(len) {
        return decode_error("riff: chunk shorter than its declared length");
    }

    reader.ignore_bytes(u64::from(len) - consumed)
}

/// Reads up to `dst.len()` payload bytes at the stream's current position, clipping the count so
/// that nothing past the end of the PCM payload is delivered.
pub fn read_pcm_payload(
    stream: &mut SourceStream,
    data_start_pos: u64,
    num_bytes: u64,
    dst: &mut [u8],
) -> Result<usize> {
    let pos = stream.pos();
    let end = data_start_pos + num_bytes;

    if pos >= end {
        return Ok(0);
    }

    let limit = ((end - pos) as usize).min(dst.len());
    stream.read_buf(&mut dst[..limit])
}

/// Seeks to a payload-relative position: external position 0 corresponds to the first PCM byte,
/// and the `End` whence is relative to the end of the PCM payload. Returns the new external
/// position. Positions before the start of the payload are out of range and leave the stream
/// untouched.
pub fn seek_pcm_payload(
    stream: &mut SourceStream,
    data_start_pos: u64,
    num_bytes: u64,
    pos: SeekFrom,
) -> Result<u64> {
    let target = match pos {
        SeekFrom::Start(offset) => data_start_pos.checked_add(offset),
        SeekFrom::Current(delta) => stream.pos().checked_add_signed(delta),
        SeekFrom::End(delta) => (data_start_pos + num_bytes).checked_add_signed(delta),
    };

    let target = match target {
        Some(target) if target >= data_start_pos => target,
        _ => return seek_error(SeekErrorKind::OutOfRange),
    };

    let new_pos = stream.seek(SeekFrom::Start(target))?;

    Ok(new_pos - data_start_pos)
}

// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::errors::{truncated_error, Result};

use super::{ByteSource, ReadBytes};

/// A `SourceStream` is the common reader type for pcmstream. By using type erasure and dynamic
/// dispatch, `SourceStream` wraps and hides the inner reader from the consumer, allowing any
/// typical `Read`er to be used in a generic way, selectable at runtime.
///
/// `SourceStream` tracks the absolute stream position so that header parsers can record chunk
/// offsets without a system call per query. It performs no read-ahead of its own; a caller that
/// wants buffering can wrap the source in a [`std::io::BufReader`] before handing it over.
pub struct SourceStream {
    /// The source reader.
    inner: Box<dyn ByteSource>,
    /// Absolute position of the inner stream.
    pos: u64,
}

impl SourceStream {
    /// Instantiates a new `SourceStream` by taking ownership of the provided source.
    pub fn new(source: Box<dyn ByteSource>) -> Self {
        SourceStream { inner: source, pos: 0 }
    }

    /// Opens the file at `path` and wraps it in a new `SourceStream`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(SourceStream::new(Box::new(file)))
    }

    /// Returns if the underlying source is seekable.
    pub fn is_seekable(&self) -> bool {
        self.inner.is_seekable()
    }

    /// Returns the length in bytes of the underlying source, if available.
    pub fn byte_len(&self) -> Option<u64> {
        self.inner.byte_len()
    }

    /// Seeks the stream to the given position. On success the new absolute position is returned;
    /// on failure the position is left unchanged.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let new_pos = self.inner.seek(pos)?;
        self.pos = new_pos;
        Ok(new_pos)
    }
}

impl ReadBytes for SourceStream {
    #[inline(always)]
    fn read_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.read_buf_exact(&mut byte)?;
        Ok(byte[0])
    }

    #[inline(always)]
    fn read_double_bytes(&mut self) -> Result<[u8; 2]> {
        let mut bytes = [0u8; 2];
        self.read_buf_exact(&mut bytes)?;
        Ok(bytes)
    }

    #[inline(always)]
    fn read_triple_bytes(&mut self) -> Result<[u8; 3]> {
        let mut bytes = [0u8; 3];
        self.read_buf_exact(&mut bytes)?;
        Ok(bytes)
    }

    #[inline(always)]
    fn read_quad_bytes(&mut self) -> Result<[u8; 4]> {
        let mut bytes = [0u8; 4];
        self.read_buf_exact(&mut bytes)?;
        Ok(bytes)
    }

    fn read_buf(&mut self, buf: &mut [u8]) -> Result<usize> {
        let count = self.inner.read(buf)?;
        self.pos += count as u64;
        Ok(count)
    }

    fn read_buf_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;

        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.pos += filled as u64;
                    return truncated_error("core (io): unexpected end of stream");
                }
                Ok(count) => filled += count,
                Err(ref err) if err.kind() == std::io::ErrorKind::Interrupted => (),
                Err(err) => {
                    self.pos += filled as u64;
                    return Err(err.into());
                }
            }
        }

        self.pos += filled as u64;
        Ok(())
    }

    fn ignore_bytes(&mut self, count: u64) -> Result<()> {
        if count == 0 {
            return Ok(());
        }

        if self.inner.is_seekable() {
            let new_pos = self.inner.seek(SeekFrom::Current(count as i64))?;
            self.pos = new_pos;
            Ok(())
        }
        else {
            // An unseekable source can only skip forward by consuming bytes.
            let mut remaining = count;
            let mut scratch = [0u8; 1024];

            while remaining > 0 {
                let len = remaining.min(scratch.len() as u64) as usize;
                self.read_buf_exact(&mut scratch[..len])?;
                remaining -= len as u64;
            }

            Ok(())
        }
    }

    #[inline(always)]
    fn pos(&self) -> u64 {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, SeekFrom};

    use super::SourceStream;
    use crate::errors::Error;
    use crate::io::ReadBytes;

    fn stream_of(bytes: &[u8]) -> SourceStream {
        SourceStream::new(Box::new(Cursor::new(bytes.to_vec())))
    }

    #[test]
    fn typed_reads_advance_the_position() {
        let mut stream = stream_of(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);

        assert_eq!(stream.read_u16().unwrap(), 0x0201);
        assert_eq!(stream.pos(), 2);
        assert_eq!(stream.read_be_u32().unwrap(), 0x0304_0506);
        assert_eq!(stream.pos(), 6);
    }

    #[test]
    fn short_reads_report_truncation() {
        let mut stream = stream_of(&[0x01, 0x02]);

        assert!(matches!(stream.read_quad_bytes(), Err(Error::Truncated(_))));
    }

    #[test]
    fn reads_past_end_yield_zero() {
        let mut stream = stream_of(&[0x01]);

        let mut buf = [0u8; 4];
        assert_eq!(stream.read_buf(&mut buf).unwrap(), 1);
        assert_eq!(stream.read_buf(&mut buf).unwrap(), 0);
        assert_eq!(stream.pos(), 1);
    }

    #[test]
    fn seek_and_tell_are_consistent() {
        let mut stream = stream_of(&[0u8; 64]);

        assert_eq!(stream.seek(SeekFrom::Start(10)).unwrap(), 10);
        assert_eq!(stream.pos(), 10);

        // seek(tell(), begin) and seek(0, current) are both no-ops.
        let pos = stream.pos();
        assert_eq!(stream.seek(SeekFrom::Start(pos)).unwrap(), pos);
        assert_eq!(stream.seek(SeekFrom::Current(0)).unwrap(), pos);

        assert_eq!(stream.seek(SeekFrom::End(-4)).unwrap(), 60);
    }

    #[test]
    fn ignore_bytes_skips_forward() {
        let mut stream = stream_of(&[0x00, 0x00, 0x00, 0xaa]);

        stream.ignore_bytes(3).unwrap();
        assert_eq!(stream.read_byte().unwrap(), 0xaa);
    }
}

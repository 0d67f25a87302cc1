// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type.

use std::error;
use std::fmt;
use std::io;
use std::result;

/// `SeekErrorKind` is a list of generic reasons why a seek may fail.
#[derive(Debug)]
pub enum SeekErrorKind {
    /// The stream is not seekable at all.
    Unseekable,
    /// The stream can only be seeked forward.
    ForwardOnly,
    /// The position to seek to is out of range.
    OutOfRange,
}

impl SeekErrorKind {
    fn as_str(&self) -> &'static str {
        match *self {
            SeekErrorKind::Unseekable => "stream is not seekable",
            SeekErrorKind::ForwardOnly => "stream can only be seeked forward",
            SeekErrorKind::OutOfRange => "requested position is out-of-range for stream",
        }
    }
}

/// `Error` provides an enumeration of all possible errors reported by pcmstream.
#[derive(Debug)]
pub enum Error {
    /// An IO error occurred while reading, writing, or seeking the stream. Failures to open a
    /// file surface here as well.
    IoError(io::Error),
    /// A required header chunk is absent.
    MissingChunk(&'static str),
    /// The stream carries the wrong FourCC or form type for this reader.
    BadMagic(&'static str),
    /// The stream contained malformed data and could not be decoded.
    DecodeError(&'static str),
    /// A bit depth, compression, or container feature outside the supported set was encountered.
    Unsupported(&'static str),
    /// A read returned fewer bytes than the header promised.
    Truncated(&'static str),
    /// The packet decoder could not be initialized.
    DecoderInit(&'static str),
    /// The packet decoder failed while decoding.
    Decoder(&'static str),
    /// The stream could not be seeked.
    SeekError(SeekErrorKind),
    /// The end of the stream was reached.
    EndOfStream,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::IoError(ref err) => write!(f, "io error: {}", err),
            Error::MissingChunk(chunk) => write!(f, "missing chunk: {}", chunk),
            Error::BadMagic(msg) => write!(f, "bad magic: {}", msg),
            Error::DecodeError(msg) => write!(f, "malformed stream: {}", msg),
            Error::Unsupported(feature) => write!(f, "unsupported format: {}", feature),
            Error::Truncated(msg) => write!(f, "truncated stream: {}", msg),
            Error::DecoderInit(msg) => write!(f, "decoder initialization failed: {}", msg),
            Error::Decoder(msg) => write!(f, "decoder failed: {}", msg),
            Error::SeekError(ref kind) => write!(f, "seek error: {}", kind.as_str()),
            Error::EndOfStream => write!(f, "end of stream"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::IoError(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => Error::EndOfStream,
            _ => Error::IoError(err),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Convenience function to create a missing chunk error.
pub fn missing_chunk_error<T>(chunk: &'static str) -> Result<T> {
    Err(Error::MissingChunk(chunk))
}

/// Convenience function to create a bad magic error.
pub fn bad_magic_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::BadMagic(desc))
}

/// Convenience function to create a decode error.
pub fn decode_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::DecodeError(desc))
}

/// Convenience function to create an unsupported format error.
pub fn unsupported_error<T>(feature: &'static str) -> Result<T> {
    Err(Error::Unsupported(feature))
}

/// Convenience function to create a truncated stream error.
pub fn truncated_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::Truncated(desc))
}

/// Convenience function to create a decoder initialization error.
pub fn decoder_init_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::DecoderInit(desc))
}

/// Convenience function to create a decoder error.
pub fn decoder_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::Decoder(desc))
}

/// Convenience function to create a seek error.
pub fn seek_error<T>(kind: SeekErrorKind) -> Result<T> {
    Err(Error::SeekError(kind))
}

/// Convenience function to create an end-of-stream error.
pub fn end_of_stream_error<T>() -> Result<T> {
    Err(Error::EndOfStream)
}

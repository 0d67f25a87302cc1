// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `source` module defines the common trait implemented by every container reader.

use std::io::SeekFrom;

use crate::errors::Result;
use crate::info::StreamInfo;

/// `AudioSource` is the format-agnostic face of an opened audio file: a seekable stream of
/// uncompressed PCM bytes described by a [`StreamInfo`].
///
/// Positions are relative to the PCM payload: position 0 is the first PCM byte, and the end of
/// the stream is `info().num_bytes()`. A source is owned by one caller; resources are released
/// on drop.
pub trait AudioSource {
    /// The descriptor of the delivered stream.
    fn info(&self) -> &StreamInfo;

    /// Reads up to `dst.len()` bytes of PCM at the current position, advancing it. Returns the
    /// number of bytes delivered; 0 at end of stream.
    fn read(&mut self, dst: &mut [u8]) -> Result<usize>;

    /// Seeks to a payload-relative position and returns the new position. On failure the
    /// position is unchanged.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64>;
}

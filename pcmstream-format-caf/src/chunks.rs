// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pcmstream_core::errors::{decode_error, unsupported_error, Result};
use pcmstream_core::io::ReadBytes;

/// The `desc` chunk: a CAF audio format description.
#[derive(Debug)]
pub struct AudioDescription {
    pub sample_rate: f64,
    pub format_id: [u8; 4],
    pub format_flags: u32,
    #[allow(dead_code)]
    pub bytes_per_packet: u32,
    pub frames_per_packet: u32,
    pub channels_per_frame: u32,
    #[allow(dead_code)]
    pub bits_per_channel: u32,
}

impl AudioDescription {
    pub fn read<B: ReadBytes>(reader: &mut B, chunk_size: i64) -> Result<Self> {
        if chunk_size != 32 {
            return decode_error("caf: invalid audio description chunk size");
        }

        let sample_rate = reader.read_be_f64()?;

        if sample_rate.is_nan() || sample_rate.is_infinite() || sample_rate <= 0.0 {
            return decode_error("caf: sample rate must be a positive number");
        }

        let format_id = reader.read_quad_bytes()?;
        let format_flags = reader.read_be_u32()?;
        let bytes_per_packet = reader.read_be_u32()?;
        let frames_per_packet = reader.read_be_u32()?;
        let channels_per_frame = reader.read_be_u32()?;

        if channels_per_frame == 0 {
            return decode_error("caf: channels per frame must not be zero");
        }

        let bits_per_channel = reader.read_be_u32()?;

        Ok(Self {
            sample_rate,
            format_id,
            format_flags,
            bytes_per_packet,
            frames_per_packet,
            channels_per_frame,
            bits_per_channel,
        })
    }

    /// For the `alac` format, the format flags encode the bit depth of the source material.
    pub fn source_bit_depth(&self) -> Result<u32> {
        // Adapted from the flag values in CoreAudioTypes.h.
        match self.format_flags {
            1 => Ok(16),
            2 => Ok(20),
            3 => Ok(24),
            4 => Ok(32),
            _ => unsupported_error("caf: unsupported alac format flags"),
        }
    }
}

/// The fixed header of the `pakt` chunk, preceding the BER-encoded packet sizes.
#[derive(Debug)]
pub struct PacketTableHeader {
    pub total_packets: i64,
    #[allow(dead_code)]
    pub valid_frames: i64,
    #[allow(dead_code)]
    pub priming_frames: u32,
    #[allow(dead_code)]
    pub remainder_frames: u32,
}

impl PacketTableHeader {
    pub const SIZE: i64 = 24;

    pub fn read<B: ReadBytes>(reader: &mut B, chunk_size: i64) -> Result<Self> {
        if chunk_size < Self::SIZE {
            return decode_error("caf: invalid packet table chunk size");
        }

        let total_packets = reader.read_be_i64()?;

        if total_packets < 0 {
            return decode_error("caf: invalid number of packets in the packet table");
        }

        let valid_frames = reader.read_be_i64()?;

        if valid_frames < 0 {
            return decode_error("caf: invalid number of frames in the packet table");
        }

        let priming_frames = reader.read_be_u32()?;
        let remainder_frames = reader.read_be_u32()?;

        Ok(Self { total_packets, valid_frames, priming_frames, remainder_frames })
    }
}

/// Decodes one BER variable-length integer from the start of `buf`: big-endian base-128 digits,
/// continuation flagged in the high bit. Returns the value and the number of bytes consumed.
/// At most 5 bytes may contribute to one 32-bit integer.
pub fn read_ber_integer(buf: &[u8]) -> Result<(u32, usize)> {
    let mut value: u32 = 0;
    let mut size = 0;

    for &byte in buf {
        value = (value << 7) | u32::from(byte & 0x7f);
        size += 1;

        if byte & 0x80 == 0 {
            return Ok((value, size));
        }

        if size >= 5 {
            return decode_error("caf: unterminated variable-length integer");
        }
    }

    decode_error("caf: truncated variable-length integer")
}

#[cfg(test)]
mod tests {
    use super::read_ber_integer;

    #[test]
    fn variable_length_integers() {
        assert_eq!(read_ber_integer(&[0x01]).unwrap(), (1, 1));
        assert_eq!(read_ber_integer(&[0x11]).unwrap(), (17, 1));
        assert_eq!(read_ber_integer(&[0x7f]).unwrap(), (127, 1));
        assert_eq!(read_ber_integer(&[0x81, 0x00]).unwrap(), (128, 2));
        assert_eq!(read_ber_integer(&[0x81, 0x02]).unwrap(), (130, 2));
        assert_eq!(read_ber_integer(&[0x82, 0x01]).unwrap(), (257, 2));
        assert_eq!(read_ber_integer(&[0xff, 0x7f]).unwrap(), (16_383, 2));
        assert_eq!(read_ber_integer(&[0x81, 0x80, 0x00]).unwrap(), (16_384, 3));
    }

    #[test]
    fn trailing_bytes_are_not_consumed() {
        assert_eq!(read_ber_integer(&[0x04, 0xff, 0xff]).unwrap(), (4, 1));
    }

    #[test]
    fn unterminated_integers_fail() {
        assert!(read_ber_integer(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff]).is_err());
        assert!(read_ber_integer(&[0x81, 0x80]).is_err());
        assert!(read_ber_integer(&[]).is_err());
    }
}

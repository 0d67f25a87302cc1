// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `info` module defines the immutable audio-stream descriptor.

use crate::pcm::format::PcmFormat;

/// `StreamInfo` describes the audio stream a container reader delivers: the PCM encoding of the
/// payload, the sample rate, the channel count, and the total number of sample frames.
///
/// A reader populates the descriptor while parsing the header and holds it for the lifetime of
/// the stream. Constructors must uphold: at least one channel, a non-zero sample rate, and a
/// valid format.
#[derive(Copy, Clone, Debug)]
pub struct StreamInfo {
    format: PcmFormat,
    sample_rate: u32,
    num_channels: u32,
    num_sample_frames: u64,
}

impl StreamInfo {
    pub fn new(
        format: PcmFormat,
        sample_rate: u32,
        num_channels: u32,
        num_sample_frames: u64,
    ) -> Self {
        debug_assert!(format.valid());
        debug_assert!(sample_rate > 0);
        debug_assert!(num_channels >= 1);

        StreamInfo { format, sample_rate, num_channels, num_sample_frames }
    }

    /// The PCM encoding of the delivered payload.
    pub fn format(&self) -> PcmFormat {
        self.format
    }

    /// The sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The number of channels.
    pub fn num_channels(&self) -> u32 {
        self.num_channels
    }

    /// The total number of sample frames in the stream.
    pub fn num_sample_frames(&self) -> u64 {
        self.num_sample_frames
    }

    /// The total number of samples across all channels.
    pub fn num_samples(&self) -> u64 {
        self.num_sample_frames * u64::from(self.num_channels)
    }

    /// The total payload length in bytes.
    pub fn num_bytes(&self) -> u64 {
        self.num_samples() * self.bytes_per_sample()
    }

    pub fn bits_per_sample(&self) -> u32 {
        self.format.bitwidth()
    }

    pub fn bytes_per_sample(&self) -> u64 {
        u64::from(self.bits_per_sample() / 8)
    }

    pub fn bytes_per_sample_frame(&self) -> u64 {
        self.bytes_per_sample() * u64::from(self.num_channels)
    }
}

#[cfg(test)]
mod tests {
    use super::StreamInfo;
    use crate::pcm::format::PcmFormat;

    #[test]
    fn derived_quantities() {
        let info = StreamInfo::new(PcmFormat::s24le(), 48_000, 2, 1000);

        assert_eq!(info.bits_per_sample(), 24);
        assert_eq!(info.bytes_per_sample(), 3);
        assert_eq!(info.bytes_per_sample_frame(), 6);
        assert_eq!(info.num_samples(), 2000);
        assert_eq!(info.num_bytes(), 6000);
    }
}

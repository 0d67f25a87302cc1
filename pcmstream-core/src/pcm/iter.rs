// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `iter` module presents a raw byte range as a random-access sequence of decoded samples.
//!
//! A view decodes on access and encodes on assignment through the descriptor bound at
//! construction, so a byte range can be treated as a typed sample range at zero extra
//! allocation. The step between samples equals the encoding's width in bytes, and sample
//! distance is byte distance divided by the step.

use super::codec::SampleCodec;
use super::conv::ConvertibleSample;
use super::format::PcmFormat;

/// An immutable random-access view of a byte slice as a sequence of samples of type `V`.
pub struct SampleView<'a, V: ConvertibleSample> {
    bytes: &'a [u8],
    codec: SampleCodec<V>,
}

impl<'a, V: ConvertibleSample> SampleView<'a, V> {
    /// Creates a view of `bytes` decoding per `format`.
    ///
    /// Panics if the descriptor is invalid or the slice length is not a multiple of the sample
    /// step.
    pub fn new(bytes: &'a [u8], format: PcmFormat) -> Self {
        let codec = SampleCodec::new(format);
        assert!(bytes.len() % codec.step() == 0, "byte range not sample aligned");

        SampleView { bytes, codec }
    }

    /// The number of samples in the view.
    pub fn len(&self) -> usize {
        self.bytes.len() / self.codec.step()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decodes the sample at `idx`.
    pub fn get(&self, idx: usize) -> V {
        let step = self.codec.step();
        self.codec.read(&self.bytes[idx * step..])
    }

    /// Iterates over the decoded samples.
    pub fn iter(&self) -> SampleIter<'a, V> {
        SampleIter { bytes: self.bytes, codec: self.codec }
    }
}

impl<'a, V: ConvertibleSample> IntoIterator for &SampleView<'a, V> {
    type Item = V;
    type IntoIter = SampleIter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A double-ended, exact-size iterator over the decoded samples of a [`SampleView`].
pub struct SampleIter<'a, V: ConvertibleSample> {
    bytes: &'a [u8],
    codec: SampleCodec<V>,
}

impl<V: ConvertibleSample> Iterator for SampleIter<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        if self.bytes.is_empty() {
            return None;
        }

        let val = self.codec.read(self.bytes);
        self.bytes = &self.bytes[self.codec.step()..];
        Some(val)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.bytes.len() / self.codec.step();
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<V> {
        let skip = n.saturating_mul(self.codec.step()).min(self.bytes.len());
        self.bytes = &self.bytes[skip..];
        self.next()
    }
}

impl<V: ConvertibleSample> DoubleEndedIterator for SampleIter<'_, V> {
    fn next_back(&mut self) -> Option<V> {
        if self.bytes.is_empty() {
            return None;
        }

        let last = self.bytes.len() - self.codec.step();
        let val = self.codec.read(&self.bytes[last..]);
        self.bytes = &self.bytes[..last];
        Some(val)
    }
}

impl<V: ConvertibleSample> ExactSizeIterator for SampleIter<'_, V> {}

/// A mutable random-access view of a byte slice as a sequence of samples of type `V`.
pub struct SampleViewMut<'a, V: ConvertibleSample> {
    bytes: &'a mut [u8],
    codec: SampleCodec<V>,
}

impl<'a, V: ConvertibleSample> SampleViewMut<'a, V> {
    /// Creates a mutable view of `bytes` encoding and decoding per `format`.
    ///
    /// Panics if the descriptor is invalid or the slice length is not a multiple of the sample
    /// step.
    pub fn new(bytes: &'a mut [u8], format: PcmFormat) -> Self {
        let codec = SampleCodec::new(format);
        assert!(bytes.len() % codec.step() == 0, "byte range not sample aligned");

        SampleViewMut { bytes, codec }
    }

    /// The number of samples in the view.
    pub fn len(&self) -> usize {
        self.bytes.len() / self.codec.step()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decodes the sample at `idx`.
    pub fn get(&self, idx: usize) -> V {
        let step = self.codec.step();
        self.codec.read(&self.bytes[idx * step..])
    }

    /// Encodes `val` into the sample at `idx`.
    pub fn set(&mut self, idx: usize, val: V) {
        let step = self.codec.step();
        self.codec.write(val, &mut self.bytes[idx * step..]);
    }

    /// Encodes samples drawn from `iter` into consecutive positions starting at the first
    /// sample. Returns the number of samples written; writing stops when either the view or the
    /// iterator is exhausted.
    pub fn write_iter<I>(&mut self, iter: I) -> usize
    where
        I: IntoIterator<Item = V>,
    {
        let codec = self.codec;
        let mut written = 0;

        for (chunk, val) in self.bytes.chunks_exact_mut(codec.step()).zip(iter) {
            codec.write(val, chunk);
            written += 1;
        }

        written
    }

    /// Encodes every sample of `src` into the view. Panics if the lengths differ.
    pub fn copy_from_slice(&mut self, src: &[V]) {
        assert!(src.len() == self.len(), "sample count mismatch");
        self.write_iter(src.iter().copied());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::codec::write_sample;
    use crate::pcm::format::PcmFormat;

    #[test]
    fn view_decodes_consecutive_samples() {
        // Two s16le samples: 1, -1.
        let bytes = [0x01, 0x00, 0xff, 0xff];
        let view = SampleView::<i16>::new(&bytes, PcmFormat::s16le());

        assert_eq!(view.len(), 2);
        assert_eq!(view.get(0), 1);
        assert_eq!(view.get(1), -1);

        let decoded: Vec<i16> = view.iter().collect();
        assert_eq!(decoded, vec![1, -1]);
    }

    #[test]
    fn iteration_matches_the_explicit_read_loop() {
        let bytes: Vec<u8> = (0..24).collect();
        let fmt = PcmFormat::s24be();
        let view = SampleView::<f64>::new(&bytes, fmt);

        let looped: Vec<f64> = (0..view.len()).map(|idx| view.get(idx)).collect();
        let iterated: Vec<f64> = view.iter().collect();

        assert_eq!(looped, iterated);
        assert_eq!(view.iter().len(), 8);
    }

    #[test]
    fn writing_through_the_view_matches_the_explicit_write_loop() {
        let samples = [-0.5f32, -0.25, 0.0, 0.25, 0.5, 0.75];
        let fmt = PcmFormat::u24le();

        let mut via_view = vec![0u8; samples.len() * 3];
        SampleViewMut::<f32>::new(&mut via_view, fmt).copy_from_slice(&samples);

        let mut via_loop = vec![0u8; samples.len() * 3];
        for (chunk, &val) in via_loop.chunks_exact_mut(3).zip(samples.iter()) {
            write_sample(fmt, val, chunk);
        }

        assert_eq!(via_view, via_loop);
    }

    #[test]
    fn set_and_get_round_trip() {
        let mut bytes = [0u8; 8];
        let mut view = SampleViewMut::<f64>::new(&mut bytes, PcmFormat::s32be());

        view.set(0, 0.5);
        view.set(1, -0.5);

        assert_eq!(view.get(0), 0.5);
        assert_eq!(view.get(1), -0.5);
    }

    #[test]
    fn reverse_iteration_visits_samples_backwards() {
        let bytes = [0x01, 0x02, 0x03, 0x04];
        let view = SampleView::<u8>::new(&bytes, PcmFormat::u8());

        let reversed: Vec<u8> = view.iter().rev().collect();
        assert_eq!(reversed, vec![0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn advancing_matches_the_sample_step() {
        let bytes = [0x00, 0x01, 0x00, 0x02, 0x00, 0x03];
        let view = SampleView::<i16>::new(&bytes, PcmFormat::s16be());

        let mut iter = view.iter();
        assert_eq!(iter.nth(2), Some(3));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn write_iter_stops_at_the_shorter_side() {
        let mut bytes = [0u8; 4];
        let mut view = SampleViewMut::<i16>::new(&mut bytes, PcmFormat::s16le());

        assert_eq!(view.write_iter([1i16, 2, 3].into_iter()), 2);
        assert_eq!(view.get(0), 1);
        assert_eq!(view.get(1), 2);
    }

    #[test]
    #[should_panic(expected = "byte range not sample aligned")]
    fn misaligned_ranges_are_rejected() {
        let bytes = [0u8; 5];
        let _ = SampleView::<i16>::new(&bytes, PcmFormat::s16le());
    }
}

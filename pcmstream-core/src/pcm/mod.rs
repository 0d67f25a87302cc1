// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `pcm` module implements the PCM sample machinery: the runtime format descriptor, the
//! sample-value converter, the byte-level sample codec with its dispatch tables, and the typed
//! sample view over raw byte ranges.

pub mod codec;
pub mod conv;
pub mod format;
pub mod iter;

pub use codec::{read_sample, write_sample, SampleCodec};
pub use conv::{ConvertibleSample, FromSample, IntoSample};
pub use format::{Endianness, PcmFormat, SampleNumber};
pub use iter::{SampleView, SampleViewMut};

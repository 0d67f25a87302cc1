// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Readers for the RIFF family of chunked audio containers: WAV/RIFF and AIFF/AIFC.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]
// The following lints are allowed in all pcmstream crates. Please see the workspace Cargo.toml
// for their justification.
#![allow(clippy::excessive_precision)]
#![allow(clippy::identity_op)]
#![allow(clippy::manual_range_contains)]

mod common;

pub mod aiff;
pub mod wave;

pub use aiff::AiffSource;
pub use wave::WavSource;

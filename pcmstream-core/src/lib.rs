// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared machinery for the pcmstream audio-file readers: byte-level I/O, the PCM format
//! descriptor, sample conversion and codec dispatch, the typed sample view, and the common
//! audio-source trait implemented by every container reader.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]
// The following lints are allowed in all pcmstream crates. Please see the workspace Cargo.toml for
// their justification.
#![allow(clippy::excessive_precision)]
#![allow(clippy::identity_op)]
#![allow(clippy::manual_range_contains)]

pub mod errors;
pub mod info;
pub mod io;
pub mod pcm;
pub mod source;

// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reader for Apple Lossless (ALAC) audio carried in Core Audio Format (CAF) containers.
//!
//! The container walk, magic-cookie extraction, and BER packet-table streaming live here; the
//! ALAC packet decoder itself is an external collaborator supplied through the [`AlacDecoder`]
//! trait.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]
// The following lints are allowed in all pcmstream crates. Please see the workspace Cargo.toml
// for their justification.
#![allow(clippy::excessive_precision)]
#![allow(clippy::identity_op)]
#![allow(clippy::manual_range_contains)]

mod chunks;
mod source;

pub use source::{AlacDecoder, CafSource};

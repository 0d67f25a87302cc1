// Pcmstream
// Copyright (c) 2026 The Pcmstream Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `format` module defines the runtime PCM format descriptor.

/// The number representation of an encoded PCM sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SampleNumber {
    SignedInteger,
    UnsignedInteger,
    FloatingPoint,
}

/// The byte order of an encoded PCM sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endianness {
    Big,
    Little,
}

impl Endianness {
    /// The byte order of the host.
    pub const NATIVE: Endianness =
        if cfg!(target_endian = "big") { Endianness::Big } else { Endianness::Little };
}

/// One of the 18 supported PCM encodings. The discriminant is the stable dispatch id used to
/// index the codec tables.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FormatTag {
    S8 = 0,
    U8 = 1,
    S16Be = 2,
    S16Le = 3,
    U16Be = 4,
    U16Le = 5,
    S24Be = 6,
    S24Le = 7,
    U24Be = 8,
    U24Le = 9,
    S32Be = 10,
    S32Le = 11,
    U32Be = 12,
    U32Le = 13,
    F32Be = 14,
    F32Le = 15,
    F64Be = 16,
    F64Le = 17,
}

/// The number of PCM encodings, and therefore the length of the codec dispatch tables.
pub const NUM_FORMAT_TAGS: usize = 18;

impl FormatTag {
    fn number(&self) -> SampleNumber {
        use FormatTag::*;

        match self {
            S8 | S16Be | S16Le | S24Be | S24Le | S32Be | S32Le => SampleNumber::SignedInteger,
            U8 | U16Be | U16Le | U24Be | U24Le | U32Be | U32Le => SampleNumber::UnsignedInteger,
            F32Be | F32Le | F64Be | F64Le => SampleNumber::FloatingPoint,
        }
    }

    fn bitwidth(&self) -> u32 {
        use FormatTag::*;

        match self {
            S8 | U8 => 8,
            S16Be | S16Le | U16Be | U16Le => 16,
            S24Be | S24Le | U24Be | U24Le => 24,
            S32Be | S32Le | U32Be | U32Le | F32Be | F32Le => 32,
            F64Be | F64Le => 64,
        }
    }

    fn endianness(&self) -> Endianness {
        use FormatTag::*;

        match self {
            // Single-byte encodings belong to the native byte order.
            S8 | U8 => Endianness::NATIVE,
            S16Be | U16Be | S24Be | U24Be | S32Be | U32Be | F32Be | F64Be => Endianness::Big,
            S16Le | U16Le | S24Le | U24Le | S32Le | U32Le | F32Le | F64Le => Endianness::Little,
        }
    }
}

/// `PcmFormat` is a runtime descriptor identifying one of the 18 supported PCM encodings:
/// signed and unsigned integers at 8, 16, 24, and 32 bits in either byte order, and IEEE-754
/// floating point at 32 and 64 bits in either byte order.
///
/// The default descriptor is invalid (`valid()` is false, `id()` is -1). Constructing a valid
/// descriptor is done through one of the named factories, e.g. [`PcmFormat::s16le`]. The
/// native-endian factories (e.g. [`PcmFormat::s16ne`]) resolve to the big- or little-endian
/// encoding matching the host.
///
/// Equality is by encoding identity.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PcmFormat(Option<FormatTag>);

macro_rules! tag_factory {
    ($name:ident, $tag:expr) => {
        #[doc = concat!("The `", stringify!($name), "` encoding.")]
        pub fn $name() -> PcmFormat {
            PcmFormat(Some($tag))
        }
    };
}

macro_rules! native_factory {
    ($name:ident, $be:ident, $le:ident) => {
        #[doc = concat!(
            "The native-endian alias resolving to `", stringify!($be), "` or `",
            stringify!($le), "` per the host byte order."
        )]
        pub fn $name() -> PcmFormat {
            if cfg!(target_endian = "big") {
                Self::$be()
            }
            else {
                Self::$le()
            }
        }
    };
}

impl PcmFormat {
    tag_factory!(s8, FormatTag::S8);
    tag_factory!(u8, FormatTag::U8);
    tag_factory!(s16be, FormatTag::S16Be);
    tag_factory!(s16le, FormatTag::S16Le);
    tag_factory!(u16be, FormatTag::U16Be);
    tag_factory!(u16le, FormatTag::U16Le);
    tag_factory!(s24be, FormatTag::S24Be);
    tag_factory!(s24le, FormatTag::S24Le);
    tag_factory!(u24be, FormatTag::U24Be);
    tag_factory!(u24le, FormatTag::U24Le);
    tag_factory!(s32be, FormatTag::S32Be);
    tag_factory!(s32le, FormatTag::S32Le);
    tag_factory!(u32be, FormatTag::U32Be);
    tag_factory!(u32le, FormatTag::U32Le);
    tag_factory!(f32be, FormatTag::F32Be);
    tag_factory!(f32le, FormatTag::F32Le);
    tag_factory!(f64be, FormatTag::F64Be);
    tag_factory!(f64le, FormatTag::F64Le);

    native_factory!(s16ne, s16be, s16le);
    native_factory!(u16ne, u16be, u16le);
    native_factory!(s24ne, s24be, s24le);
    native_factory!(u24ne, u24be, u24le);
    native_factory!(s32ne, s32be, s32le);
    native_factory!(u32ne, u32be, u32le);
    native_factory!(f32ne, f32be, f32le);
    native_factory!(f64ne, f64be, f64le);

    /// The stable dispatch id of the encoding in the range 0..18, or -1 for the invalid
    /// descriptor.
    pub fn id(&self) -> i32 {
        match self.0 {
            Some(tag) => tag as i32,
            None => -1,
        }
    }

    /// Returns true unless this is the invalid descriptor. Using an invalid descriptor for codec
    /// dispatch is a programming error.
    pub fn valid(&self) -> bool {
        self.0.is_some()
    }

    /// The number representation of the encoding.
    ///
    /// Panics if the descriptor is invalid.
    pub fn number(&self) -> SampleNumber {
        self.expect_tag().number()
    }

    /// The bit width of the encoding: 8, 16, 24, 32, or 64.
    ///
    /// Panics if the descriptor is invalid.
    pub fn bitwidth(&self) -> u32 {
        self.expect_tag().bitwidth()
    }

    /// The byte order of the encoding.
    ///
    /// Panics if the descriptor is invalid.
    pub fn endianness(&self) -> Endianness {
        self.expect_tag().endianness()
    }

    pub fn is_signed_integer(&self) -> bool {
        self.number() == SampleNumber::SignedInteger
    }

    pub fn is_unsigned_integer(&self) -> bool {
        self.number() == SampleNumber::UnsignedInteger
    }

    pub fn is_floating_point(&self) -> bool {
        self.number() == SampleNumber::FloatingPoint
    }

    pub fn is_big_endian(&self) -> bool {
        self.endianness() == Endianness::Big
    }

    pub fn is_little_endian(&self) -> bool {
        self.endianness() == Endianness::Little
    }

    pub fn is_native_endian(&self) -> bool {
        self.endianness() == Endianness::NATIVE
    }

    fn expect_tag(&self) -> FormatTag {
        self.0.expect("invalid pcm format descriptor")
    }
}

//! String class body and the padding/charset enums it
//! shares with the string variant of [`crate::class::VlenBody`].

use crate::error::{Error, Result};

/// How a fixed-size string value is padded to fill its declared size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Padding {
    /// NUL-terminate, remaining bytes undefined.
    NullTerm,
    /// NUL-pad the remainder after the value.
    #[default]
    NullPad,
    /// Pad the remainder with ASCII spaces.
    SpacePad,
}

impl Padding {
    pub(crate) fn to_bits(self) -> u8 {
        match self {
            Padding::NullTerm => 0,
            Padding::NullPad => 1,
            Padding::SpacePad => 2,
        }
    }

    pub(crate) fn from_bits(bits: u8) -> Result<Self> {
        match bits & 0b1111 {
            0 => Ok(Padding::NullTerm),
            1 => Ok(Padding::NullPad),
            2 => Ok(Padding::SpacePad),
            _ => Err(Error::UnsupportedPadding),
        }
    }
}

/// Character encoding of a string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharacterSet {
    /// 7-bit ASCII.
    #[default]
    Ascii,
    /// UTF-8.
    Utf8,
}

impl CharacterSet {
    pub(crate) fn to_bits(self) -> u8 {
        match self {
            CharacterSet::Ascii => 0,
            CharacterSet::Utf8 => 1,
        }
    }

    pub(crate) fn from_bits(bits: u8) -> Result<Self> {
        match bits & 0b1111 {
            0 => Ok(CharacterSet::Ascii),
            1 => Ok(CharacterSet::Utf8),
            _ => Err(Error::UnsupportedPadding),
        }
    }
}

/// Body of a `String` datatype.
///
/// The implicit atomic attributes (byte order `None`, precision
/// `8 × size`, offset `0`, both pads `Zero`) are not stored — they are
/// derived from `size` wherever needed (the debug dump, for instance) rather
/// than duplicated on this struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StringBody {
    /// How the value is padded to its declared size.
    pub padding: Padding,
    /// Character encoding.
    pub charset: CharacterSet,
}

impl StringBody {
    pub(crate) fn encode_flags(&self) -> u32 {
        (self.padding.to_bits() as u32) | ((self.charset.to_bits() as u32) << 4)
    }

    pub(crate) fn decode_flags(flags: u32) -> Result<Self> {
        Ok(StringBody {
            padding: Padding::from_bits(flags as u8)?,
            charset: CharacterSet::from_bits((flags >> 4) as u8)?,
        })
    }
}

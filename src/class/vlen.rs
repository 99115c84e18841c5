//! Vlen class body: a variable-length sequence or string,
//! wrapping a base type stored in [`crate::Datatype::parent`].

use crate::class::string::{CharacterSet, Padding};
use crate::error::Result;

/// What kind of variable-length value this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VlenKind {
    /// A sequence of elements of the parent type.
    Sequence,
    /// A variable-length string; carries its own padding/charset, the same
    /// attributes the `String` class stores.
    String {
        /// How the value is padded.
        padding: Padding,
        /// Character encoding.
        charset: CharacterSet,
    },
}

/// Body of a `Vlen` datatype.
///
/// Always forces conversion on I/O — this is asserted, not
/// stored, since it is never false for this class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlenBody {
    /// Sequence vs. string.
    pub subtype: VlenKind,
}

impl VlenBody {
    pub(crate) fn encode_flags(&self) -> u32 {
        match self.subtype {
            VlenKind::Sequence => 0,
            VlenKind::String { padding, charset } => {
                1 | ((padding.to_bits() as u32) << 4) | ((charset.to_bits() as u32) << 8)
            }
        }
    }

    pub(crate) fn decode_flags(flags: u32) -> Result<Self> {
        let subtype = if flags & 0b1111 == 0 {
            VlenKind::Sequence
        } else {
            VlenKind::String {
                padding: Padding::from_bits((flags >> 4) as u8)?,
                charset: CharacterSet::from_bits((flags >> 8) as u8)?,
            }
        };
        Ok(VlenBody { subtype })
    }
}

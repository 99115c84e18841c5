//! Reference class body.

use crate::error::{Error, Result};

/// What kind of reference a `Reference` datatype stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceKind {
    /// Reference to an entire object.
    #[default]
    Object,
    /// Reference to a dataset region, V1 encoding.
    RegionV1,
    /// Reference to an entire object, V2 encoding.
    ObjectV2,
    /// Reference to a dataset region, V2 encoding.
    RegionV2,
    /// Reference to an attribute, V2 encoding.
    AttrV2,
}

impl ReferenceKind {
    pub(crate) fn to_bits(self) -> u8 {
        match self {
            ReferenceKind::Object => 0,
            ReferenceKind::RegionV1 => 1,
            ReferenceKind::ObjectV2 => 2,
            ReferenceKind::RegionV2 => 3,
            ReferenceKind::AttrV2 => 4,
        }
    }

    pub(crate) fn from_bits(bits: u8) -> Result<Self> {
        match bits & 0b1111 {
            0 => Ok(ReferenceKind::Object),
            1 => Ok(ReferenceKind::RegionV1),
            2 => Ok(ReferenceKind::ObjectV2),
            3 => Ok(ReferenceKind::RegionV2),
            4 => Ok(ReferenceKind::AttrV2),
            _ => Err(Error::UnknownClass),
        }
    }

    /// Object references stored on disk always force a conversion pass
    /// on read.
    pub fn forces_convert_on_disk(self) -> bool {
        matches!(self, ReferenceKind::Object | ReferenceKind::ObjectV2)
    }
}

/// Body of a `Reference` datatype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReferenceBody {
    /// Which kind of reference this is.
    pub subtype: ReferenceKind,
}

impl ReferenceBody {
    pub(crate) fn encode_flags(&self) -> u32 {
        self.subtype.to_bits() as u32
    }

    pub(crate) fn decode_flags(flags: u32) -> Result<Self> {
        Ok(ReferenceBody {
            subtype: ReferenceKind::from_bits(flags as u8)?,
        })
    }
}

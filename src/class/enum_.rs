//! Enum class body: an enumeration over an integer base
//! type. The base type itself lives in [`crate::Datatype::parent`].

use alloc::string::String;
use alloc::vec::Vec;
use educe::Educe;

use crate::error::{Error, Result};

/// A single named value of an [`EnumBody`].
#[derive(Educe, Clone, PartialEq, Eq)]
#[educe(Debug)]
pub struct EnumMember {
    /// Member name.
    pub name: String,
    /// Raw value bytes, exactly `parent.size` bytes long.
    #[educe(Debug(method(fmt_raw_value)))]
    pub raw_value: Vec<u8>,
}

fn fmt_raw_value(value: &Vec<u8>, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    write!(f, "0x{}", hex::encode(value))
}

/// Body of an `Enum` datatype.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumBody {
    /// Members in declared order.
    pub members: Vec<EnumMember>,
}

impl EnumBody {
    /// Build an enum body, checking that every raw value is exactly
    /// `parent_size` bytes.
    pub fn new(parent_size: u32, members: Vec<EnumMember>) -> Result<Self> {
        for m in &members {
            if m.raw_value.len() != parent_size as usize {
                return Err(Error::InvalidEnumParent);
            }
        }
        Ok(EnumBody { members })
    }

    pub(crate) fn encode_flags(&self) -> Result<u32> {
        if self.members.len() > 0xffff {
            return Err(Error::OutOfMemory);
        }
        Ok(self.members.len() as u32)
    }
}

pub(crate) fn member_count(flags: u32) -> usize {
    (flags & 0xffff) as usize
}

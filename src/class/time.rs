//! Time class body.

use crate::class::common::ByteOrder;
use crate::error::Result;
use crate::io::{Input, Output};

/// Body of a `Time` datatype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeBody {
    /// Byte order of the stored timestamp.
    pub byte_order: ByteOrder,
    /// Number of significant bits.
    pub precision: u16,
}

impl TimeBody {
    pub(crate) fn encode_flags(&self) -> Result<u32> {
        let (be, _vax) = self.byte_order.to_bits(false)?;
        Ok(if be { 1 } else { 0 })
    }

    pub(crate) fn decode_flags_and_body(flags: u32, input: &mut impl Input) -> Result<Self> {
        let byte_order = if flags & 1 != 0 {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        };
        let mut buf = [0u8; 2];
        input.read(&mut buf)?;
        Ok(TimeBody {
            byte_order,
            precision: u16::from_le_bytes(buf),
        })
    }

    pub(crate) fn encode_body(&self, out: &mut impl Output) -> Result<()> {
        out.write(&self.precision.to_le_bytes())
    }
}

//! Integer and BitField class bodies.

use crate::class::common::{ByteOrder, Pad, Sign};
use crate::error::Result;
use crate::io::{Input, Output};

/// Body of an `Integer` datatype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntegerBody {
    /// Byte order of the stored value.
    pub byte_order: ByteOrder,
    /// Padding bit below the precision window.
    pub lsb_pad: Pad,
    /// Padding bit above the precision window.
    pub msb_pad: Pad,
    /// Sign convention.
    pub sign: Sign,
    /// Bit offset of the precision window within the value.
    pub bit_offset: u16,
    /// Number of significant bits.
    pub precision: u16,
}

/// Body of a `BitField` datatype — identical to [`IntegerBody`] minus sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitFieldBody {
    /// Byte order of the stored value.
    pub byte_order: ByteOrder,
    /// Padding bit below the precision window.
    pub lsb_pad: Pad,
    /// Padding bit above the precision window.
    pub msb_pad: Pad,
    /// Bit offset of the precision window within the value.
    pub bit_offset: u16,
    /// Number of significant bits.
    pub precision: u16,
}

impl IntegerBody {
    pub(crate) fn encode_flags(&self) -> Result<u32> {
        let (be, _vax) = self.byte_order.to_bits(false)?;
        let mut flags = 0u32;
        if be {
            flags |= 1 << 0;
        }
        if self.lsb_pad.to_bit() {
            flags |= 1 << 1;
        }
        if self.msb_pad.to_bit() {
            flags |= 1 << 2;
        }
        if self.sign.to_bit() {
            flags |= 1 << 3;
        }
        Ok(flags)
    }

    pub(crate) fn decode_flags(flags: u32) -> Result<(ByteOrder, Pad, Pad, Sign)> {
        let order = if flags & (1 << 0) != 0 {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        };
        let lsb_pad = Pad::from_bit(flags & (1 << 1) != 0);
        let msb_pad = Pad::from_bit(flags & (1 << 2) != 0);
        let sign = Sign::from_bit(flags & (1 << 3) != 0);
        Ok((order, lsb_pad, msb_pad, sign))
    }

    pub(crate) fn encode_body(&self, out: &mut impl Output) -> Result<()> {
        out.write(&self.bit_offset.to_le_bytes())?;
        out.write(&self.precision.to_le_bytes())
    }

    pub(crate) fn decode_body(
        input: &mut impl Input,
        byte_order: ByteOrder,
        lsb_pad: Pad,
        msb_pad: Pad,
        sign: Sign,
    ) -> Result<Self> {
        let mut buf = [0u8; 2];
        input.read(&mut buf)?;
        let bit_offset = u16::from_le_bytes(buf);
        input.read(&mut buf)?;
        let precision = u16::from_le_bytes(buf);
        Ok(IntegerBody {
            byte_order,
            lsb_pad,
            msb_pad,
            sign,
            bit_offset,
            precision,
        })
    }
}

impl BitFieldBody {
    pub(crate) fn encode_flags(&self) -> Result<u32> {
        let (be, _vax) = self.byte_order.to_bits(false)?;
        let mut flags = 0u32;
        if be {
            flags |= 1 << 0;
        }
        if self.lsb_pad.to_bit() {
            flags |= 1 << 1;
        }
        if self.msb_pad.to_bit() {
            flags |= 1 << 2;
        }
        Ok(flags)
    }

    pub(crate) fn decode_flags(flags: u32) -> Result<(ByteOrder, Pad, Pad)> {
        let order = if flags & (1 << 0) != 0 {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        };
        let lsb_pad = Pad::from_bit(flags & (1 << 1) != 0);
        let msb_pad = Pad::from_bit(flags & (1 << 2) != 0);
        Ok((order, lsb_pad, msb_pad))
    }

    pub(crate) fn encode_body(&self, out: &mut impl Output) -> Result<()> {
        out.write(&self.bit_offset.to_le_bytes())?;
        out.write(&self.precision.to_le_bytes())
    }

    pub(crate) fn decode_body(
        input: &mut impl Input,
        byte_order: ByteOrder,
        lsb_pad: Pad,
        msb_pad: Pad,
    ) -> Result<Self> {
        let mut buf = [0u8; 2];
        input.read(&mut buf)?;
        let bit_offset = u16::from_le_bytes(buf);
        input.read(&mut buf)?;
        let precision = u16::from_le_bytes(buf);
        Ok(BitFieldBody {
            byte_order,
            lsb_pad,
            msb_pad,
            bit_offset,
            precision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_i32_be_matches_seed_scenario() {
        let body = IntegerBody {
            byte_order: ByteOrder::Big,
            lsb_pad: Pad::Zero,
            msb_pad: Pad::Zero,
            sign: Sign::TwosComp,
            bit_offset: 0,
            precision: 32,
        };
        assert_eq!(body.encode_flags().unwrap(), 0x09);
        let mut buf = Vec::new();
        body.encode_body(&mut buf).unwrap();
        assert_eq!(buf, vec![0x00, 0x00, 0x20, 0x00]);
    }
}

//! Float class body.

use crate::class::common::{ByteOrder, Norm, Pad};
use crate::error::{Error, Result};
use crate::io::{Input, Output};
use crate::version::Version;

/// Body of a `Float` datatype.
///
/// `byte_order = Vax` is only representable from [`Version::V3`] onward; the
/// encoder rejects it otherwise with [`Error::UnsupportedByteOrder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatBody {
    /// Byte order, including VAX (V3+ only).
    pub byte_order: ByteOrder,
    /// Padding bit below the precision window.
    pub lsb_pad: Pad,
    /// Padding bit above the precision window.
    pub msb_pad: Pad,
    /// Padding bit for unused internal bits (between exponent and
    /// mantissa, say).
    pub internal_pad: Pad,
    /// Mantissa normalization scheme.
    pub norm: Norm,
    /// Bit position of the sign bit.
    pub sign_bit_pos: u8,
    /// Bit offset of the precision window within the value.
    pub bit_offset: u16,
    /// Number of significant bits.
    pub precision: u16,
    /// Bit position of the exponent field.
    pub exp_pos: u8,
    /// Size in bits of the exponent field. Must be non-zero
    /// ([`Error::InvalidFloatField`]).
    pub exp_size: u8,
    /// Bit position of the mantissa field.
    pub mantissa_pos: u8,
    /// Size in bits of the mantissa field. Must be non-zero
    /// ([`Error::InvalidFloatField`]).
    pub mantissa_size: u8,
    /// Exponent bias.
    pub exponent_bias: u32,
}

impl FloatBody {
    /// A little-endian IEEE-754 binary32 layout, the common case used in
    /// tests and examples.
    pub fn ieee_single() -> Self {
        FloatBody {
            byte_order: ByteOrder::Little,
            lsb_pad: Pad::Zero,
            msb_pad: Pad::Zero,
            internal_pad: Pad::Zero,
            norm: Norm::Implied,
            sign_bit_pos: 31,
            bit_offset: 0,
            precision: 32,
            exp_pos: 23,
            exp_size: 8,
            mantissa_pos: 0,
            mantissa_size: 23,
            exponent_bias: 127,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.exp_size == 0 || self.mantissa_size == 0 {
            return Err(Error::InvalidFloatField);
        }
        Ok(())
    }

    pub(crate) fn encode_flags(&self, version: Version) -> Result<u32> {
        self.validate()?;
        let allow_vax = version >= Version::V3;
        let (be, vax) = self.byte_order.to_bits(allow_vax)?;
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
        if self.internal_pad.to_bit() {
            flags |= 1 << 3;
        }
        let (n0, n1) = self.norm.to_bits();
        if n0 {
            flags |= 1 << 4;
        }
        if n1 {
            flags |= 1 << 5;
        }
        if vax {
            flags |= 1 << 6;
        }
        flags |= (self.sign_bit_pos as u32) << 8;
        Ok(flags)
    }

    pub(crate) fn decode_flags_and_body(
        flags: u32,
        version: Version,
        input: &mut impl Input,
    ) -> Result<Self> {
        let be = flags & (1 << 0) != 0;
        let vax = flags & (1 << 6) != 0;
        if vax && version < Version::V3 {
            return Err(Error::UnsupportedByteOrder);
        }
        let byte_order = ByteOrder::from_bits(be, vax)?;
        let lsb_pad = Pad::from_bit(flags & (1 << 1) != 0);
        let msb_pad = Pad::from_bit(flags & (1 << 2) != 0);
        let internal_pad = Pad::from_bit(flags & (1 << 3) != 0);
        let norm = Norm::from_bits(((flags >> 4) & 0b11) as u8)?;
        let sign_bit_pos = ((flags >> 8) & 0xff) as u8;

        let mut buf2 = [0u8; 2];
        input.read(&mut buf2)?;
        let bit_offset = u16::from_le_bytes(buf2);
        input.read(&mut buf2)?;
        let precision = u16::from_le_bytes(buf2);
        let exp_pos = input.read_byte()?;
        let exp_size = input.read_byte()?;
        let mantissa_pos = input.read_byte()?;
        let mantissa_size = input.read_byte()?;
        let mut buf4 = [0u8; 4];
        input.read(&mut buf4)?;
        let exponent_bias = u32::from_le_bytes(buf4);

        let body = FloatBody {
            byte_order,
            lsb_pad,
            msb_pad,
            internal_pad,
            norm,
            sign_bit_pos,
            bit_offset,
            precision,
            exp_pos,
            exp_size,
            mantissa_pos,
            mantissa_size,
            exponent_bias,
        };
        body.validate()?;
        Ok(body)
    }

    pub(crate) fn encode_body(&self, out: &mut impl Output) -> Result<()> {
        out.write(&self.bit_offset.to_le_bytes())?;
        out.write(&self.precision.to_le_bytes())?;
        out.push_byte(self.exp_pos)?;
        out.push_byte(self.exp_size)?;
        out.push_byte(self.mantissa_pos)?;
        out.push_byte(self.mantissa_size)?;
        out.write(&self.exponent_bias.to_le_bytes())
    }
}

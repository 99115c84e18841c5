//! Opaque class body.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::class::common::{aligned_len, ALIGN};
use crate::error::{Error, Result};
use crate::io::{Input, Output};

/// Largest ASCII tag length this codec will encode or accept on decode,
/// matching the 8-bit tag-length flag field rounded down to a
/// multiple of [`ALIGN`].
pub const TAG_MAX: usize = 248;

/// Body of an `Opaque` datatype: an ASCII tag describing the byte blob's
/// meaning to applications (the codec itself never interprets it).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpaqueBody {
    /// ASCII tag. Stored on disk NUL-padded to a multiple of 8 bytes, up to
    /// [`TAG_MAX`].
    pub tag: String,
}

impl OpaqueBody {
    pub(crate) fn encode_flags(&self) -> Result<u32> {
        let aligned = aligned_len(self.tag.len());
        if aligned > TAG_MAX {
            return Err(Error::OutOfMemory);
        }
        Ok(aligned as u32)
    }

    pub(crate) fn encode_body(&self, out: &mut impl Output) -> Result<()> {
        let aligned = aligned_len(self.tag.len());
        out.write(self.tag.as_bytes())?;
        for _ in self.tag.len()..aligned {
            out.push_byte(0)?;
        }
        Ok(())
    }

    pub(crate) fn decode(flags: u32, input: &mut impl Input) -> Result<Self> {
        let aligned = flags as usize;
        if aligned % ALIGN != 0 || aligned > TAG_MAX {
            return Err(Error::OutOfMemory);
        }
        let mut buf = vec![0u8; aligned];
        input.read(&mut buf)?;
        let nul = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        let tag = String::from_utf8(buf[..nul].to_vec()).map_err(|_| Error::OutOfMemory)?;
        Ok(OpaqueBody { tag })
    }
}

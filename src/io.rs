//! Byte-cursor contracts used by the codec.
//!
//! Mirrors the split between a streaming [`Output`]/[`Input`] pair and a
//! pure [`SizeCalculator`] that never touches memory, so the encoder and the
//! size predictor can share exactly the same code paths (see
//! [`crate::size`]).

use alloc::vec::Vec;

use crate::error::{Error, Result};

/// Allows writing bytes to an output sink.
pub trait Output {
    /// Write bytes to the output buffer.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Write a single byte to the output buffer.
    fn push_byte(&mut self, byte: u8) -> Result<()> {
        self.write(&[byte])
    }
}

/// Allows reading bytes from an input source, advancing as it goes.
pub trait Input {
    /// Bytes remaining before the cursor is exhausted.
    fn remaining(&self) -> usize;

    /// Read the exact number of bytes required to fill `buf`.
    fn read(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Read a single byte.
    fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8];
        self.read(&mut buf)?;
        Ok(buf[0])
    }

    /// Skip the next `n` bytes without inspecting them.
    fn skip(&mut self, n: usize) -> Result<()>;
}

impl Output for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl<'a> Output for &'a mut [u8] {
    fn write(&mut self, from: &[u8]) -> Result<()> {
        if from.len() > self.len() {
            return Err(Error::BufferTooShort);
        }
        let len = from.len();
        self[..len].copy_from_slice(from);
        let reduced = &mut self[len..];
        // SAFETY: `reduced` is a reborrow of `self` shrunk by `len`; no alias
        // of the already-written prefix escapes.
        *self = unsafe { &mut *(reduced as *mut [u8]) };
        Ok(())
    }
}

impl<'a> Input for &'a [u8] {
    fn remaining(&self) -> usize {
        self.len()
    }

    fn read(&mut self, into: &mut [u8]) -> Result<()> {
        if into.len() > self.len() {
            return Err(Error::TruncatedBuffer);
        }
        let len = into.len();
        into.copy_from_slice(&self[..len]);
        *self = &self[len..];
        Ok(())
    }

    fn skip(&mut self, n: usize) -> Result<()> {
        if n > self.len() {
            return Err(Error::TruncatedBuffer);
        }
        *self = &self[n..];
        Ok(())
    }
}

/// An [`Output`] that only counts the bytes it would have written.
///
/// Used by [`crate::size::predicted_size`] so the size predictor is
/// literally the encoder run against a null sink, instead of a hand-kept
/// second implementation that could drift out of agreement.
#[derive(Default)]
pub struct SizeCalculator(usize);

impl SizeCalculator {
    /// Number of bytes that would have been written.
    pub fn size(self) -> usize {
        self.0
    }
}

impl Output for SizeCalculator {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.0 = self
            .0
            .checked_add(bytes.len())
            .ok_or(Error::OutOfMemory)?;
        Ok(())
    }
}

//! Array class body: a fixed-shape multidimensional
//! wrapping of a base type stored in [`crate::Datatype::parent`].

use alloc::vec::Vec;

use crate::error::{Error, Result};

/// Largest number of dimensions an `Array` datatype may declare.
pub const MAX_RANK: usize = 32;

/// Body of an `Array` datatype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayBody {
    /// Extent of each dimension, `1..=MAX_RANK` entries.
    pub dims: Vec<u32>,
}

impl ArrayBody {
    /// Build an array body, validating `1 <= dims.len() <= MAX_RANK`.
    pub fn new(dims: Vec<u32>) -> Result<Self> {
        if dims.is_empty() || dims.len() > MAX_RANK {
            return Err(Error::OutOfMemory);
        }
        Ok(ArrayBody { dims })
    }

    /// Number of dimensions.
    pub fn ndims(&self) -> usize {
        self.dims.len()
    }

    /// Total element count: the product of every dimension.
    pub fn nelem(&self) -> u64 {
        self.dims.iter().map(|&d| d as u64).product()
    }
}

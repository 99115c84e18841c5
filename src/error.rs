//! Error taxonomy for the codec.

#[cfg(feature = "std")]
use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Everything that can go wrong encoding, decoding, or sizing a [`crate::Datatype`].
///
/// Every recursive call propagates its error unchanged; nothing here is ever
/// caught and retried by the codec itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum Error {
    /// Prelude version nibble outside `{1, 2, 3}`.
    #[cfg_attr(feature = "std", error("datatype version is not one of {{1, 2, 3}}"))]
    BadVersion,
    /// Prelude class nibble does not name one of the eleven classes.
    #[cfg_attr(feature = "std", error("unknown datatype class"))]
    UnknownClass,
    /// The input was exhausted before a complete datatype could be read.
    #[cfg_attr(feature = "std", error("input buffer ended mid-datatype"))]
    TruncatedBuffer,
    /// The output buffer could not hold the requested bytes.
    #[cfg_attr(feature = "std", error("output buffer is too short"))]
    BufferTooShort,
    /// A length implied by the wire data is too large to allocate for.
    #[cfg_attr(feature = "std", error("refusing an allocation implied by untrusted input"))]
    OutOfMemory,
    /// A byte order was requested that no version of the format can express
    /// (e.g. VAX order for a non-float class).
    #[cfg_attr(feature = "std", error("byte order is not representable for this class"))]
    UnsupportedByteOrder,
    /// A float normalization scheme outside `{None, MsbSet, Implied}`.
    #[cfg_attr(feature = "std", error("unsupported float normalization scheme"))]
    UnsupportedNormalization,
    /// A padding scheme outside what the wire format can express.
    #[cfg_attr(feature = "std", error("unsupported padding scheme"))]
    UnsupportedPadding,
    /// A sign convention outside what the wire format can express. `Sign`
    /// is presently a closed two-variant enum (`None`, `TwosComp`) and both
    /// are representable in every version, so this arm cannot yet be
    /// constructed; it is kept alongside the other unsupported-field
    /// variants for taxonomy parity should a future sign convention need
    /// version gating.
    #[cfg_attr(feature = "std", error("unsupported sign convention"))]
    UnsupportedSign,
    /// A float's exponent or mantissa field has zero size.
    #[cfg_attr(feature = "std", error("float exponent or mantissa field has zero size"))]
    InvalidFloatField,
    /// An enum's parent datatype is not an integer class.
    #[cfg_attr(feature = "std", error("enum parent datatype must be an integer"))]
    InvalidEnumParent,
    /// A compound member's offset overlaps a previous member or overruns the
    /// container size.
    #[cfg_attr(feature = "std", error("compound member offset is invalid"))]
    InvalidCompoundOffset,
    /// Attempted to place a committed datatype into the shared-object heap.
    #[cfg_attr(feature = "std", error("a committed datatype cannot be shared in the heap"))]
    SharingStateViolation,
}

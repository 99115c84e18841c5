//! Object-header message slot descriptor.
//!
//! The surrounding object-header subsystem is out of scope for this crate;
//! this module only describes the shape it would use to register this
//! codec as one of its message types — a numeric ID, a debug name, and a
//! table of callbacks. Callbacks operate on `Vec<u8>`/`&[u8]` rather than
//! the generic [`crate::io::Output`]/[`crate::io::Input`] the codec itself
//! uses internally, since a function-pointer table cannot be generic.

use alloc::vec::Vec;

use crate::datatype::Datatype;
use crate::error::Result;
use crate::share::Sharing;

/// The message ID this codec would register under. Chosen arbitrarily;
/// the surrounding object-header format assigns the real one.
pub const MESSAGE_ID: u16 = 0x0003;

/// Debug name used in object-header dumps.
pub const MESSAGE_NAME: &str = "datatype";

/// Table of callbacks an object-header message slot would hold for this
/// codec. `delete`, `link`, and `post_copy_file` are deliberately absent —
/// this message type does not participate in those hooks.
pub struct MessageClass {
    /// Registered message ID.
    pub id: u16,
    /// Debug name.
    pub name: &'static str,
    /// In-memory size of a freshly decoded, empty `Datatype` node.
    pub native_size: usize,
    /// Decode one datatype from a buffer, advancing it.
    pub decode: fn(&mut &[u8]) -> Result<Datatype>,
    /// Encode one datatype to a buffer.
    pub encode: fn(&Datatype, &mut Vec<u8>, bool) -> Result<()>,
    /// Deep copy.
    pub copy: fn(&Datatype) -> Datatype,
    /// Predicted encoded size.
    pub size: fn(&Datatype, bool) -> Result<usize>,
    /// Reset to a reusable, zeroed shape.
    pub reset: fn(&mut Datatype),
    /// Release everything.
    pub free: fn(Datatype),
    /// Snapshot the sharing record.
    pub get_share: fn(&Datatype) -> Sharing,
    /// Install a sharing record.
    pub set_share: fn(&mut Datatype, Sharing) -> Result<()>,
    /// True iff shared.
    pub is_shared: fn(&Datatype) -> bool,
    /// Pre-copy-to-another-file hook.
    pub pre_copy_file: fn(&Datatype, Option<&mut Option<Datatype>>),
    /// Copy-to-another-file hook.
    pub copy_file: fn(&Datatype) -> Datatype,
}

fn decode_shim(input: &mut &[u8]) -> Result<Datatype> {
    crate::codec::decode(input)
}

fn encode_shim(tree: &Datatype, out: &mut Vec<u8>, use_latest: bool) -> Result<()> {
    crate::codec::encode(tree, out, use_latest)
}

fn size_shim(tree: &Datatype, use_latest: bool) -> Result<usize> {
    crate::size::predicted_size(tree, use_latest)
}

fn get_share_shim(tree: &Datatype) -> Sharing {
    *tree.sharing()
}

fn set_share_shim(tree: &mut Datatype, sharing: Sharing) -> Result<()> {
    tree.set_share(sharing)
}

fn is_shared_shim(tree: &Datatype) -> bool {
    tree.is_shared()
}

/// The message slot this codec would register.
pub const DATATYPE_MESSAGE: MessageClass = MessageClass {
    id: MESSAGE_ID,
    name: MESSAGE_NAME,
    native_size: core::mem::size_of::<Datatype>(),
    decode: decode_shim,
    encode: encode_shim,
    copy: crate::ops::copy,
    size: size_shim,
    reset: crate::ops::reset,
    free: crate::ops::free,
    get_share: get_share_shim,
    set_share: set_share_shim,
    is_shared: is_shared_shim,
    pre_copy_file: crate::share::pre_copy_file,
    copy_file: crate::share::copy_file,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_descriptor_carries_expected_id_and_name() {
        assert_eq!(DATATYPE_MESSAGE.id, 0x0003);
        assert_eq!(DATATYPE_MESSAGE.name, "datatype");
    }

    #[test]
    fn decode_shim_matches_direct_call() {
        use crate::class::IntegerBody;
        let dt = Datatype::integer(4, IntegerBody::default());
        let mut buf = Vec::new();
        (DATATYPE_MESSAGE.encode)(&dt, &mut buf, false).unwrap();
        let mut cursor: &[u8] = &buf;
        let back = (DATATYPE_MESSAGE.decode)(&mut cursor).unwrap();
        assert_eq!(back, dt);
    }
}

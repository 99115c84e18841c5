//! Wire-format version selection.

use crate::class::ClassBody;
use crate::datatype::Datatype;
use crate::error::{Error, Result};

/// The three incompatible wire revisions a [`Datatype`] can be encoded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Version {
    /// Original layout: fixed-width member offsets, legacy intrinsic-array
    /// compound members, 8-byte-aligned names.
    V1 = 1,
    /// Introduces the `Array` class; otherwise identical to V1's body
    /// layouts.
    V2 = 2,
    /// Introduces VAX float order, variable-width compound member offsets,
    /// and unpadded member names.
    V3 = 3,
}

impl Version {
    /// The newest version this codec knows how to write, used when the
    /// caller asks to "use the latest format".
    pub const LATEST: Version = Version::V3;

    /// Decode the 4-bit version nibble from a prelude byte.
    pub(crate) fn from_nibble(nibble: u8) -> Result<Self> {
        match nibble {
            1 => Ok(Version::V1),
            2 => Ok(Version::V2),
            3 => Ok(Version::V3),
            _ => Err(Error::BadVersion),
        }
    }

    pub(crate) fn to_nibble(self) -> u8 {
        self as u8
    }
}

/// Walk `tree` pre-order and decide which version it must be written as.
/// `use_latest` implements the "use the latest format" hint, which always
/// wins, even over a tree whose features would be satisfied by V1.
pub fn select_version(tree: &Datatype, use_latest: bool) -> Version {
    if use_latest {
        Version::LATEST
    } else if has_vax_float(tree) {
        Version::V3
    } else if has_array_anywhere(tree) {
        Version::V2
    } else {
        Version::V1
    }
}

/// True iff `tree` contains a VAX-ordered float anywhere in its structure.
pub fn has_vax_float(tree: &Datatype) -> bool {
    if let ClassBody::Float(f) = tree.body() {
        if f.byte_order == crate::class::ByteOrder::Vax {
            return true;
        }
    }
    descend_any(tree, has_vax_float)
}

/// True iff `tree` contains an `Array` class anywhere in its structure.
pub fn has_array_anywhere(tree: &Datatype) -> bool {
    if matches!(tree.body(), ClassBody::Array(_)) {
        return true;
    }
    descend_any(tree, has_array_anywhere)
}

/// Shared recursion helper: applies `pred` to every compound member and to
/// the `parent` of enum/vlen/array nodes, matching the pre-order walk
/// `select_version` relies on.
fn descend_any(tree: &Datatype, pred: impl Fn(&Datatype) -> bool + Copy) -> bool {
    match tree.body() {
        ClassBody::Compound(c) => c.members.iter().any(|m| pred(&m.ty)),
        ClassBody::Enum(_) | ClassBody::Vlen(_) | ClassBody::Array(_) => {
            tree.parent().map(|p| pred(p)).unwrap_or(false)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::*;
    use crate::datatype::Datatype;

    #[test]
    fn scalar_integer_is_v1() {
        let dt = Datatype::integer(4, IntegerBody::default());
        assert_eq!(select_version(&dt, false), Version::V1);
    }

    #[test]
    fn array_anywhere_upgrades_to_v2() {
        let leaf = Datatype::float(4, FloatBody::ieee_single());
        let arr = Datatype::array(leaf, vec![3, 4]).unwrap();
        assert_eq!(select_version(&arr, false), Version::V2);
    }

    #[test]
    fn vax_float_upgrades_to_v3() {
        let mut body = FloatBody::ieee_single();
        body.byte_order = ByteOrder::Vax;
        let dt = Datatype::float(4, body);
        assert_eq!(select_version(&dt, false), Version::V3);
    }

    #[test]
    fn use_latest_wins_even_for_v1_shaped_tree() {
        let dt = Datatype::integer(4, IntegerBody::default());
        assert_eq!(select_version(&dt, true), Version::V3);
    }

    #[test]
    fn vax_detection_descends_into_compound_members() {
        let mut vax = FloatBody::ieee_single();
        vax.byte_order = ByteOrder::Vax;
        let member = Datatype::float(4, vax);
        let compound = Datatype::compound(4, vec![Member::new("x", 0, member).unwrap()]).unwrap();
        assert!(has_vax_float(&compound));
    }
}

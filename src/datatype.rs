//! The recursive datatype tree itself.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::class::{
    ArrayBody, BitFieldBody, Class, ClassBody, CompoundBody, EnumBody, EnumMember, FloatBody,
    IntegerBody, Member, OpaqueBody, ReferenceBody, StringBody, TimeBody, VlenBody, VlenKind,
};
use crate::error::{Error, Result};
use crate::share::{Location, Sharing, State};

/// A single node of a datatype description.
///
/// `Enum`, `Vlen`, and `Array` keep their base type in `parent`, owned
/// exclusively through `Box` — there is exactly one owner of any child node,
/// so a dropped tree frees every descendant with it and there is no way to
/// alias a subtree between two parents.
#[derive(Debug, Clone, PartialEq)]
pub struct Datatype {
    size: u32,
    body: ClassBody,
    parent: Option<Box<Datatype>>,
    force_convert: bool,
    sharing: Sharing,
    state: State,
    location: Location,
}

impl Datatype {
    fn new(size: u32, body: ClassBody, parent: Option<Box<Datatype>>) -> Self {
        let location = Location::default();
        let force_convert = compute_force_convert(&body, parent.as_deref(), location);
        Datatype {
            size,
            body,
            parent,
            force_convert,
            sharing: Sharing::default(),
            state: State::default(),
            location,
        }
    }

    /// An `Integer` leaf of the given byte size.
    pub fn integer(size: u32, body: IntegerBody) -> Self {
        Self::new(size, ClassBody::Integer(body), None)
    }

    /// A `Float` leaf of the given byte size.
    pub fn float(size: u32, body: FloatBody) -> Self {
        Self::new(size, ClassBody::Float(body), None)
    }

    /// A `Time` leaf of the given byte size.
    pub fn time(size: u32, body: TimeBody) -> Self {
        Self::new(size, ClassBody::Time(body), None)
    }

    /// A `String` leaf of the given byte size.
    pub fn string(size: u32, body: StringBody) -> Self {
        Self::new(size, ClassBody::String(body), None)
    }

    /// A `BitField` leaf of the given byte size.
    pub fn bitfield(size: u32, body: BitFieldBody) -> Self {
        Self::new(size, ClassBody::BitField(body), None)
    }

    /// An `Opaque` leaf holding `size` bytes of application-defined data.
    pub fn opaque(size: u32, body: OpaqueBody) -> Self {
        Self::new(size, ClassBody::Opaque(body), None)
    }

    /// A `Reference` leaf of the given byte size.
    pub fn reference(size: u32, body: ReferenceBody) -> Self {
        Self::new(size, ClassBody::Reference(body), None)
    }

    /// A `Compound` record, validating every member's offset against
    /// `size` and computing whether the record is packed.
    pub fn compound(size: u32, members: Vec<Member>) -> Result<Self> {
        let body = CompoundBody::new(size, members)?;
        Ok(Self::new(size, ClassBody::Compound(body), None))
    }

    /// An `Enum` over `parent`, which must be an `Integer`, validating that
    /// every member's raw value matches the parent's size.
    pub fn r#enum(parent: Datatype, members: Vec<EnumMember>) -> Result<Self> {
        if parent.class() != Class::Integer {
            return Err(Error::InvalidEnumParent);
        }
        let size = parent.size();
        let body = EnumBody::new(size, members)?;
        Ok(Self::new(size, ClassBody::Enum(body), Some(Box::new(parent))))
    }

    /// A `Vlen` sequence or string wrapping `parent`. `size` is the fixed
    /// on-disk size of the length/pointer metadata, not of the variable
    /// payload.
    pub fn vlen(size: u32, parent: Datatype, subtype: VlenKind) -> Self {
        Self::new(
            size,
            ClassBody::Vlen(VlenBody { subtype }),
            Some(Box::new(parent)),
        )
    }

    /// A fixed-shape `Array` of `parent`, sized as `parent.size() *
    /// product(dims)`.
    pub fn array(parent: Datatype, dims: Vec<u32>) -> Result<Self> {
        let body = ArrayBody::new(dims)?;
        let total = (parent.size() as u64) * body.nelem();
        let size = u32::try_from(total).map_err(|_| Error::OutOfMemory)?;
        Ok(Self::new(size, ClassBody::Array(body), Some(Box::new(parent))))
    }

    /// On-disk/in-memory byte size of a single value of this type.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// The class-specific payload.
    pub fn body(&self) -> &ClassBody {
        &self.body
    }

    /// The datatype's class.
    pub fn class(&self) -> Class {
        self.body.class()
    }

    /// The base type this node wraps, for `Enum`, `Vlen`, and `Array`.
    pub fn parent(&self) -> Option<&Datatype> {
        self.parent.as_deref()
    }

    /// True iff this node (and, for `Compound`, every member; for
    /// `Enum`/`Vlen`/`Array`, its parent) tiles contiguously with no gaps.
    pub fn is_packed(&self) -> bool {
        match &self.body {
            ClassBody::Compound(c) => c.is_packed(),
            ClassBody::Array(_) | ClassBody::Enum(_) | ClassBody::Vlen(_) => {
                self.parent.as_ref().map(|p| p.is_packed()).unwrap_or(true)
            }
            _ => true,
        }
    }

    /// True iff this tree requires a conversion pass on I/O: a `Vlen`
    /// anywhere, an on-disk object `Reference`, or any descendant that
    /// itself requires one.
    pub fn force_convert(&self) -> bool {
        self.force_convert
    }

    /// Where this tree's values are currently interpreted relative to.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Update the location tag and recompute `force_convert`, since an
    /// on-disk object reference only forces conversion once it is actually
    /// backed by a file.
    pub(crate) fn set_location(&mut self, location: Location) {
        self.location = location;
        self.force_convert = compute_force_convert(&self.body, self.parent.as_deref(), location);
    }

    /// The sharing record.
    pub fn sharing(&self) -> &Sharing {
        &self.sharing
    }

    /// True iff this datatype is shared (in the heap or committed).
    pub fn is_shared(&self) -> bool {
        self.sharing.is_shared()
    }

    /// Lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Install a sharing record. If it marks the type committed and the
    /// state is still `Transient`, this also transitions state `-> Named`;
    /// otherwise the existing state is re-validated against the new record
    /// (a `Named`/`Open` type can only ever be `Committed`).
    pub fn set_share(&mut self, sharing: Sharing) -> Result<()> {
        self.state = self.state.apply_share(&sharing)?;
        self.sharing = sharing;
        Ok(())
    }

    /// `Transient -> Named`, requiring the sharing record already says
    /// `Committed`.
    pub fn commit(&mut self) -> Result<()> {
        let next = self.state.commit()?;
        next.validate(&self.sharing)?;
        self.state = next;
        Ok(())
    }

    /// `Named -> Open`.
    pub fn open(&mut self) -> Result<()> {
        self.state = self.state.open()?;
        Ok(())
    }

    /// `Open -> Named`.
    pub fn close(&mut self) -> Result<()> {
        self.state = self.state.close()?;
        Ok(())
    }

    /// `Named -> Transient`.
    pub fn uncommit(&mut self) -> Result<()> {
        self.state = self.state.uncommit()?;
        self.sharing = Sharing::default();
        Ok(())
    }

    /// Force this node into the `Transient`/`NotShared` state, bypassing
    /// the ordinary state machine. Used by [`crate::share::pre_copy_file`]
    /// and [`crate::share::copy_file`] to produce a disconnected working
    /// copy that belongs to no file yet.
    pub(crate) fn detach_as_transient(&mut self) {
        self.state = State::Transient;
        self.sharing = Sharing::default();
    }
}

/// the logical OR of every descendant's `force_convert`, plus the
/// local rules (a `Vlen` always forces conversion; an on-disk object
/// `Reference` does too).
fn compute_force_convert(body: &ClassBody, parent: Option<&Datatype>, location: Location) -> bool {
    let own = match body {
        ClassBody::Vlen(_) => true,
        ClassBody::Reference(r) => {
            location == Location::Disk && r.subtype.forces_convert_on_disk()
        }
        _ => false,
    };
    let descendant = match body {
        ClassBody::Compound(c) => c.members.iter().any(|m| m.ty.force_convert()),
        _ => parent.map(Datatype::force_convert).unwrap_or(false),
    };
    own || descendant
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ByteOrder, Pad, ReferenceKind, Sign};
    use alloc::vec;

    #[test]
    fn scalar_integer_is_packed_and_not_force_convert() {
        let dt = Datatype::integer(4, IntegerBody::default());
        assert!(dt.is_packed());
        assert!(!dt.force_convert());
    }

    #[test]
    fn compound_with_gap_is_not_packed() {
        let a = Datatype::integer(4, IntegerBody::default());
        let b = Datatype::integer(4, IntegerBody::default());
        let dt = Datatype::compound(
            16,
            vec![
                Member::new("a", 0, a).unwrap(),
                Member::new("b", 8, b).unwrap(),
            ],
        )
        .unwrap();
        assert!(!dt.is_packed());
    }

    #[test]
    fn compound_tiled_from_zero_is_packed() {
        let a = Datatype::integer(4, IntegerBody::default());
        let b = Datatype::integer(4, IntegerBody::default());
        let dt = Datatype::compound(
            8,
            vec![
                Member::new("a", 0, a).unwrap(),
                Member::new("b", 4, b).unwrap(),
            ],
        )
        .unwrap();
        assert!(dt.is_packed());
    }

    #[test]
    fn compound_member_overrunning_container_is_rejected() {
        let a = Datatype::integer(4, IntegerBody::default());
        let err = Datatype::compound(2, vec![Member::new("a", 0, a).unwrap()]).unwrap_err();
        assert_eq!(err, Error::InvalidCompoundOffset);
    }

    #[test]
    fn vlen_forces_conversion_regardless_of_location() {
        let base = Datatype::opaque(
            8,
            OpaqueBody {
                tag: "myTag".into(),
            },
        );
        let dt = Datatype::vlen(16, base, VlenKind::Sequence);
        assert!(dt.force_convert());
    }

    #[test]
    fn object_reference_forces_conversion_only_on_disk() {
        let mut dt = Datatype::reference(
            8,
            ReferenceBody {
                subtype: ReferenceKind::Object,
            },
        );
        assert!(!dt.force_convert());
        dt.set_location(Location::Disk);
        assert!(dt.force_convert());
    }

    #[test]
    fn array_size_is_parent_size_times_nelem() {
        let base = Datatype::integer(
            4,
            IntegerBody {
                byte_order: ByteOrder::Big,
                lsb_pad: Pad::Zero,
                msb_pad: Pad::Zero,
                sign: Sign::TwosComp,
                bit_offset: 0,
                precision: 32,
            },
        );
        let arr = Datatype::array(base, vec![3, 4]).unwrap();
        assert_eq!(arr.size(), 4 * 12);
    }

    #[test]
    fn enum_rejects_non_integer_parent() {
        let parent = Datatype::float(4, crate::class::FloatBody::ieee_single());
        assert_eq!(
            Datatype::r#enum(parent, Vec::new()).unwrap_err(),
            Error::InvalidEnumParent
        );
    }

    #[test]
    fn enum_rejects_mismatched_member_width() {
        let base = Datatype::integer(4, IntegerBody::default());
        let members = vec![EnumMember {
            name: "RED".into(),
            raw_value: vec![0u8; 2],
        }];
        assert_eq!(
            Datatype::r#enum(base, members).unwrap_err(),
            Error::InvalidEnumParent
        );
    }

    #[test]
    fn commit_requires_committed_sharing_record() {
        let mut dt = Datatype::integer(4, IntegerBody::default());
        assert_eq!(dt.commit(), Err(Error::SharingStateViolation));
    }

    #[test]
    fn set_share_with_committed_kind_auto_transitions_to_named() {
        let mut dt = Datatype::integer(4, IntegerBody::default());
        dt.set_share(Sharing {
            kind: crate::share::SharingKind::Committed,
            location: Location::Disk,
        })
        .unwrap();
        assert_eq!(dt.state(), State::Named);
    }

    #[test]
    fn set_share_leaves_transient_state_when_not_committed() {
        let mut dt = Datatype::integer(4, IntegerBody::default());
        dt.set_share(Sharing {
            kind: crate::share::SharingKind::InHeap,
            location: Location::Memory,
        })
        .unwrap();
        assert_eq!(dt.state(), State::Transient);
    }
}

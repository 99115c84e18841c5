//! Sharing, lifecycle state, and the file-copy hooks.

use crate::error::{Error, Result};

/// Where a datatype's value bytes (vlen targets, references) are actually
/// interpreted relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Location {
    /// Interpreted as an in-memory pointer/handle.
    #[default]
    Memory,
    /// Interpreted as a byte offset/address within a file.
    Disk,
    /// Routed through the virtual-object-layer dispatch. Out of scope for
    /// this codec; carried here only as a tag so a committed type that
    /// lives behind a VOL connector round-trips without losing that fact.
    Vol,
}

/// Whether — and how — a datatype is shared rather than inlined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SharingKind {
    /// Not shared; the datatype is wholly owned by whatever references it.
    #[default]
    NotShared,
    /// Shared via a shared-object-heap entry.
    InHeap,
    /// Committed as an independently addressable, named object.
    Committed,
}

/// The sharing record stored alongside a [`crate::Datatype`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sharing {
    /// Sharing kind.
    pub kind: SharingKind,
    /// Where the shared entity lives.
    pub location: Location,
}

impl Sharing {
    /// True iff the sharing flags indicate any committed/in-heap form.
    pub fn is_shared(&self) -> bool {
        !matches!(self.kind, SharingKind::NotShared)
    }
}

/// Lifecycle state of a datatype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Not persisted as a named object.
    #[default]
    Transient,
    /// Persisted as a named object, but not currently open.
    Named,
    /// Persisted as a named object and currently open.
    Open,
}

impl State {
    /// Enforce the invariant that `Named`/`Open` only coexist with a
    /// committed sharing flag.
    pub(crate) fn validate(self, sharing: &Sharing) -> Result<()> {
        match self {
            State::Transient => Ok(()),
            State::Named | State::Open => {
                if sharing.kind == SharingKind::Committed {
                    Ok(())
                } else {
                    Err(Error::SharingStateViolation)
                }
            }
        }
    }

    /// Compute the state that results from installing `sharing`: if it
    /// marks the type committed and the state is still `Transient`, this
    /// performs the same transition as `commit`; otherwise the state is
    /// left as-is and only re-validated against the new record.
    pub(crate) fn apply_share(self, sharing: &Sharing) -> Result<Self> {
        let next = if sharing.kind == SharingKind::Committed && self == State::Transient {
            State::Named
        } else {
            self
        };
        next.validate(sharing)?;
        Ok(next)
    }

    /// `commit`: `Transient -> Named`.
    pub fn commit(self) -> Result<Self> {
        match self {
            State::Transient => Ok(State::Named),
            _ => Err(Error::SharingStateViolation),
        }
    }

    /// `open`: `Named -> Open`.
    pub fn open(self) -> Result<Self> {
        match self {
            State::Named => Ok(State::Open),
            _ => Err(Error::SharingStateViolation),
        }
    }

    /// `close`: `Open -> Named`.
    pub fn close(self) -> Result<Self> {
        match self {
            State::Open => Ok(State::Named),
            _ => Err(Error::SharingStateViolation),
        }
    }

    /// `uncommit`: `Named -> Transient`.
    pub fn uncommit(self) -> Result<Self> {
        match self {
            State::Named => Ok(State::Transient),
            _ => Err(Error::SharingStateViolation),
        }
    }
}

/// Called when the object containing `tree` (a dataset, say) is being
/// copied to another file. If `user_data` names a slot the caller wants
/// filled, attach a fresh transient copy of `tree`, relocated to `Disk`, so
/// the caller can re-encode it against the destination file.
pub fn pre_copy_file(tree: &crate::datatype::Datatype, user_data: Option<&mut Option<crate::datatype::Datatype>>) {
    if let Some(slot) = user_data {
        let mut copy = tree.clone();
        copy.detach_as_transient();
        copy.set_location(Location::Disk);
        *slot = Some(copy);
    }
}

/// Allocate a fresh copy of `tree`, relocated to `Disk` for the destination
/// file handle.
pub fn copy_file(tree: &crate::datatype::Datatype) -> crate::datatype::Datatype {
    let mut copy = tree.clone();
    copy.detach_as_transient();
    copy.set_location(Location::Disk);
    copy
}

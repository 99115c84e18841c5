//! Deep copy, reset, and free.
//!
//! In this rendition a [`Datatype`] is released the moment it is dropped —
//! recursion through owned `Box<Datatype>` children does the "free walk"
//! for free. These functions exist so the codec presents the same surface
//! an object-header message slot expects (`copy`/`reset`/`free`), not
//! because any of them do more than `Clone`/assignment/`drop` underneath.

use crate::datatype::Datatype;

/// Produce a fully independent copy of `tree` — no subtree is shared
/// between the original and the copy.
pub fn copy(tree: &Datatype) -> Datatype {
    tree.clone()
}

/// Copy `src` into `dest`, replacing whatever `dest` held (which is
/// dropped in the process).
pub fn copy_into(dest: &mut Datatype, src: &Datatype) {
    *dest = src.clone();
}

/// Release `tree`'s current contents and leave it holding the zero-size
/// scalar integer shape, ready to be reused.
pub fn reset(tree: &mut Datatype) {
    *tree = Datatype::integer(0, Default::default());
}

/// Release `tree` and everything it owns.
pub fn free(tree: Datatype) {
    drop(tree);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{IntegerBody, Member};
    use alloc::vec;

    #[test]
    fn copy_is_independent_of_original() {
        let a = Datatype::integer(4, IntegerBody::default());
        let original = Datatype::compound(4, vec![Member::new("a", 0, a).unwrap()]).unwrap();
        let copied = copy(&original);
        assert_eq!(copied, original);
    }

    #[test]
    fn copy_into_replaces_destination() {
        let mut dest = Datatype::integer(4, IntegerBody::default());
        let src = Datatype::float(4, crate::class::FloatBody::ieee_single());
        copy_into(&mut dest, &src);
        assert_eq!(dest, src);
    }

    #[test]
    fn reset_yields_zero_size_integer() {
        let mut dt = Datatype::float(4, crate::class::FloatBody::ieee_single());
        reset(&mut dt);
        assert_eq!(dt.size(), 0);
        assert_eq!(dt.class(), crate::class::Class::Integer);
    }
}

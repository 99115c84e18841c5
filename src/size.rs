//! Raw-size predictor.
//!
//! Rather than a second, hand-maintained tally of every class's body
//! layout, this runs the real encoder against a [`SizeCalculator`] sink —
//! the two can never disagree because they are the same code path.

use crate::codec::encode;
use crate::datatype::Datatype;
use crate::error::Result;
use crate::io::SizeCalculator;

/// Exact number of bytes [`crate::codec::encode`] would write for `tree`
/// under the version `use_latest` selects.
pub fn predicted_size(tree: &Datatype, use_latest: bool) -> Result<usize> {
    let mut calc = SizeCalculator::default();
    encode(tree, &mut calc, use_latest)?;
    Ok(calc.size())
}

//! Height-identity comparator.
//!
//! Blocks are ordered by height descending, then by id ascending. The result
//! is derived from `Ord::cmp` on each key so extreme heights such as
//! `i64::MIN` and `i64::MAX` compare correctly.

use std::cmp::Ordering;

use cnsim_types::HeightIndexed;

/// Compare two blocks for processing order.
///
/// Returns [`Ordering::Less`] when `a` precedes `b`, [`Ordering::Greater`]
/// when `a` follows `b`, and [`Ordering::Equal`] only when both report the
/// same height and id.
pub fn compare<A, B>(a: &A, b: &B) -> Ordering
where
    A: HeightIndexed + ?Sized,
    B: HeightIndexed + ?Sized,
{
    b.height()
        .cmp(&a.height())
        .then_with(|| a.id().cmp(&b.id()))
}

/// Stateless handle on [`compare`], for consumers that hold an ordering value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHeightComparator;

impl BlockHeightComparator {
    pub const fn new() -> Self {
        Self
    }

    pub fn compare<A, B>(&self, a: &A, b: &B) -> Ordering
    where
        A: HeightIndexed + ?Sized,
        B: HeightIndexed + ?Sized,
    {
        compare(a, b)
    }

    /// Integer form of [`compare`]: `-1`, `0` or `1`.
    pub fn sign<A, B>(&self, a: &A, b: &B) -> i32
    where
        A: HeightIndexed + ?Sized,
        B: HeightIndexed + ?Sized,
    {
        match compare(a, b) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }
}

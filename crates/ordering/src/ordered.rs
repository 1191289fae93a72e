//! `Ord` adaptor so std ordered containers can hold blocks.

use std::cmp::Ordering;
use std::ops::Deref;

use cnsim_types::{BlockHeight, BlockId, HeightIndexed};

use crate::comparator::compare;

/// Wraps a block so that its `Ord` is [`compare`]: the smallest value is the
/// tallest block, ties resolved towards the smaller id.
///
/// Equality follows the same rule, so two wrappers are equal when they carry
/// the same height and id regardless of the rest of the block.
#[derive(Debug, Clone, Copy)]
pub struct HeightOrdered<B>(pub B);

impl<B> HeightOrdered<B> {
    pub fn new(block: B) -> Self {
        Self(block)
    }

    pub fn get(&self) -> &B {
        &self.0
    }

    pub fn into_inner(self) -> B {
        self.0
    }
}

impl<B> Deref for HeightOrdered<B> {
    type Target = B;

    fn deref(&self) -> &B {
        &self.0
    }
}

impl<B: HeightIndexed> HeightIndexed for HeightOrdered<B> {
    fn height(&self) -> BlockHeight {
        self.0.height()
    }

    fn id(&self) -> BlockId {
        self.0.id()
    }
}

impl<B: HeightIndexed> PartialEq for HeightOrdered<B> {
    fn eq(&self, other: &Self) -> bool {
        compare(&self.0, &other.0) == Ordering::Equal
    }
}

impl<B: HeightIndexed> Eq for HeightOrdered<B> {}

impl<B: HeightIndexed> PartialOrd for HeightOrdered<B> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<B: HeightIndexed> Ord for HeightOrdered<B> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(&self.0, &other.0)
    }
}

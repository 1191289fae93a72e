//! Batch sort routines over slices of blocks.

use std::cmp::Ordering;
use std::collections::HashSet;

use cnsim_types::HeightIndexed;
use tracing::trace;

use crate::comparator::compare;
use crate::error::OrderingError;

/// Sort blocks in place into processing order.
///
/// Unique ids make the order total, so an unstable sort yields the same
/// sequence as a stable one.
pub fn sort_blocks<B: HeightIndexed>(blocks: &mut [B]) {
    trace!(len = blocks.len(), "sorting blocks by height");
    blocks.sort_unstable_by(|a, b| compare(a, b));
}

/// Collect blocks into a vector in processing order.
pub fn sorted_blocks<B, I>(blocks: I) -> Vec<B>
where
    B: HeightIndexed,
    I: IntoIterator<Item = B>,
{
    let mut sorted: Vec<B> = blocks.into_iter().collect();
    sort_blocks(&mut sorted);
    sorted
}

/// Whether `blocks` is in processing order: heights weakly decreasing and,
/// within a run of equal heights, ids strictly increasing.
pub fn is_height_ordered<B: HeightIndexed>(blocks: &[B]) -> bool {
    blocks
        .windows(2)
        .all(|pair| compare(&pair[0], &pair[1]) == Ordering::Less)
}

/// Check that no two blocks share an id.
///
/// The comparator reports colliding ids at equal height as equivalent, so
/// callers that rely on a strict order can run this first.
pub fn ensure_unique_ids<B: HeightIndexed>(blocks: &[B]) -> Result<(), OrderingError> {
    let mut seen = HashSet::with_capacity(blocks.len());
    for block in blocks {
        if !seen.insert(block.id()) {
            return Err(OrderingError::DuplicateId { id: block.id() });
        }
    }
    Ok(())
}

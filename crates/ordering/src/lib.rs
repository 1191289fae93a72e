//! CNSim block ordering: tallest block first, lowest id among equals.
//!
//! The simulator processes competing tips and fork branches in a fixed
//! order. [`compare`] defines that order and everything else in this crate
//! (the [`HeightOrdered`] adaptor, batch sorts, [`BlockQueue`], [`BlockSet`])
//! is built on top of it.

pub mod comparator;
pub mod error;
pub mod ordered;
pub mod queue;
pub mod sort;

pub use comparator::{compare, BlockHeightComparator};
pub use error::OrderingError;
pub use ordered::HeightOrdered;
pub use queue::{BlockQueue, BlockSet, DuplicateIdPolicy, QueueConfig};
pub use sort::{ensure_unique_ids, is_height_ordered, sort_blocks, sorted_blocks};

pub use cnsim_types::{BlockHeight, BlockId, HeightIndexed};

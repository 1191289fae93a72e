//! Minimal view of a block needed to place it in processing order.
//!
//! Anything that can report a height and a simulation-wide identifier can be
//! ordered, so containers and sort routines are written against
//! [`HeightIndexed`] instead of a concrete block type.

use std::rc::Rc;
use std::sync::Arc;

use crate::block::{BlockHeight, BlockId};

/// Capability set required to order a block: its height and its identity.
pub trait HeightIndexed {
    /// Distance from the genesis block along the block's own chain.
    fn height(&self) -> BlockHeight;
    /// Identifier unique across the simulation run.
    fn id(&self) -> BlockId;
}

impl<T: HeightIndexed + ?Sized> HeightIndexed for &T {
    fn height(&self) -> BlockHeight {
        (**self).height()
    }

    fn id(&self) -> BlockId {
        (**self).id()
    }
}

impl<T: HeightIndexed + ?Sized> HeightIndexed for Box<T> {
    fn height(&self) -> BlockHeight {
        (**self).height()
    }

    fn id(&self) -> BlockId {
        (**self).id()
    }
}

impl<T: HeightIndexed + ?Sized> HeightIndexed for Rc<T> {
    fn height(&self) -> BlockHeight {
        (**self).height()
    }

    fn id(&self) -> BlockId {
        (**self).id()
    }
}

impl<T: HeightIndexed + ?Sized> HeightIndexed for Arc<T> {
    fn height(&self) -> BlockHeight {
        (**self).height()
    }

    fn id(&self) -> BlockId {
        (**self).id()
    }
}

/// `(id, height)` pairs, the shorthand simulator traces use for blocks.
impl HeightIndexed for (BlockId, BlockHeight) {
    fn height(&self) -> BlockHeight {
        self.1
    }

    fn id(&self) -> BlockId {
        self.0
    }
}

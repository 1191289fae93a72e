use serde::{Deserialize, Serialize};

use crate::view::HeightIndexed;

/// Simulation-wide unique identifier assigned to a block when it is mined.
pub type BlockId = i64;
/// Number of blocks between a block and genesis along its own chain.
pub type BlockHeight = i64;
/// Identifier of the simulated node that mined a block.
pub type NodeId = u32;
/// Simulation clock value in milliseconds.
pub type SimTime = u64;

/// Height of every genesis block.
pub const GENESIS_HEIGHT: BlockHeight = 0;

/// Errors raised while deriving new blocks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("block {parent} is at the maximum height and cannot be extended")]
    HeightOverflow { parent: BlockId },
}

/// A block produced during a simulation run.
///
/// Blocks are immutable once created; the simulator only ever derives new
/// blocks from existing tips.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    /// Unique identifier within the run.
    pub id: BlockId,
    /// Height above genesis.
    pub height: BlockHeight,
    /// Parent block, `None` only for genesis.
    #[serde(default)]
    pub parent: Option<BlockId>,
    /// Node that mined the block.
    #[serde(default)]
    pub miner: NodeId,
    /// Simulation time at which the block was mined.
    #[serde(default)]
    pub mined_at: SimTime,
    /// Proof-of-work difficulty credited to the block.
    #[serde(default)]
    pub difficulty: f64,
}

impl Block {
    pub fn new(
        id: BlockId,
        height: BlockHeight,
        parent: Option<BlockId>,
        miner: NodeId,
        mined_at: SimTime,
        difficulty: f64,
    ) -> Self {
        Self {
            id,
            height,
            parent,
            miner,
            mined_at,
            difficulty,
        }
    }

    /// Root block of a chain. Genesis has no miner and is present at time zero.
    pub fn genesis(id: BlockId) -> Self {
        Self::new(id, GENESIS_HEIGHT, None, 0, 0, 0.0)
    }

    /// Derive a block extending `parent` by one.
    pub fn child_of(
        parent: &Block,
        id: BlockId,
        miner: NodeId,
        mined_at: SimTime,
        difficulty: f64,
    ) -> Result<Self, BlockError> {
        let height = parent
            .height
            .checked_add(1)
            .ok_or(BlockError::HeightOverflow { parent: parent.id })?;
        Ok(Self::new(
            id,
            height,
            Some(parent.id),
            miner,
            mined_at,
            difficulty,
        ))
    }

    pub fn is_genesis(&self) -> bool {
        self.parent.is_none()
    }
}

impl HeightIndexed for Block {
    fn height(&self) -> BlockHeight {
        self.height
    }

    fn id(&self) -> BlockId {
        self.id
    }
}

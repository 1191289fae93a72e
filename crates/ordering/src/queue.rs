//! Priority structures that hand out blocks in processing order.
//!
//! [`BlockQueue`] is a binary heap for schedulers that only ever need the
//! next block. [`BlockSet`] keeps every block sorted, which suits tip
//! tracking and pruning by height.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

use cnsim_types::{BlockHeight, BlockId, HeightIndexed};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::OrderingError;
use crate::ordered::HeightOrdered;

const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// What to do when a block arrives whose id is already held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateIdPolicy {
    /// Refuse the block with [`OrderingError::DuplicateId`].
    #[default]
    Reject,
    /// Accept it; blocks sharing an id and height then compare equal.
    Allow,
}

/// Tunables for [`BlockQueue`] and [`BlockSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub initial_capacity: usize,
    pub duplicate_ids: DuplicateIdPolicy,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            duplicate_ids: DuplicateIdPolicy::Reject,
        }
    }
}

/// Occurrence count per id, shared by both containers.
#[derive(Debug, Default)]
struct IdIndex {
    counts: HashMap<BlockId, usize>,
}

impl IdIndex {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: HashMap::with_capacity(capacity),
        }
    }

    fn contains(&self, id: BlockId) -> bool {
        self.counts.contains_key(&id)
    }

    fn insert(&mut self, id: BlockId) {
        *self.counts.entry(id).or_insert(0) += 1;
    }

    fn remove(&mut self, id: BlockId) {
        if let Some(count) = self.counts.get_mut(&id) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&id);
            }
        }
    }

    fn clear(&mut self) {
        self.counts.clear();
    }

    fn admit(&self, id: BlockId, policy: DuplicateIdPolicy) -> Result<(), OrderingError> {
        if policy == DuplicateIdPolicy::Reject && self.contains(id) {
            warn!(id, "rejecting block with duplicate id");
            return Err(OrderingError::DuplicateId { id });
        }
        Ok(())
    }
}

/// Priority queue whose head is the tallest block, lowest id first on ties.
#[derive(Debug)]
pub struct BlockQueue<B: HeightIndexed> {
    heap: BinaryHeap<Reverse<HeightOrdered<B>>>,
    ids: IdIndex,
    policy: DuplicateIdPolicy,
}

impl<B: HeightIndexed> BlockQueue<B> {
    pub fn new() -> Self {
        Self::with_config(&QueueConfig::default())
    }

    pub fn with_config(config: &QueueConfig) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(config.initial_capacity),
            ids: IdIndex::with_capacity(config.initial_capacity),
            policy: config.duplicate_ids,
        }
    }

    /// Queue a block.
    pub fn push(&mut self, block: B) -> Result<(), OrderingError> {
        let (id, height) = (block.id(), block.height());
        self.ids.admit(id, self.policy)?;
        trace!(id, height, "queueing block");
        self.ids.insert(id);
        self.heap.push(Reverse(HeightOrdered::new(block)));
        Ok(())
    }

    /// Remove and return the block that precedes every other queued block.
    pub fn pop(&mut self) -> Option<B> {
        let Reverse(HeightOrdered(block)) = self.heap.pop()?;
        trace!(id = block.id(), height = block.height(), "dequeued block");
        self.ids.remove(block.id());
        Some(block)
    }

    pub fn peek(&self) -> Option<&B> {
        self.heap.peek().map(|Reverse(head)| head.get())
    }

    pub fn contains_id(&self, id: BlockId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.ids.clear();
    }

    /// Empty the queue, returning its blocks in processing order.
    pub fn drain_ordered(&mut self) -> Vec<B> {
        let mut drained = Vec::with_capacity(self.heap.len());
        while let Some(block) = self.pop() {
            drained.push(block);
        }
        drained
    }
}

impl<B: HeightIndexed> Default for BlockQueue<B> {
    fn default() -> Self {
        Self::new()
    }
}

type OrderKey = HeightOrdered<(BlockId, BlockHeight)>;

fn order_key<B: HeightIndexed + ?Sized>(block: &B) -> OrderKey {
    HeightOrdered::new((block.id(), block.height()))
}

/// Sorted collection of blocks, iterated tallest first.
#[derive(Debug)]
pub struct BlockSet<B: HeightIndexed> {
    blocks: BTreeMap<OrderKey, B>,
    ids: IdIndex,
    policy: DuplicateIdPolicy,
}

impl<B: HeightIndexed> BlockSet<B> {
    pub fn new() -> Self {
        Self::with_config(&QueueConfig::default())
    }

    pub fn with_config(config: &QueueConfig) -> Self {
        Self {
            blocks: BTreeMap::new(),
            ids: IdIndex::with_capacity(config.initial_capacity),
            policy: config.duplicate_ids,
        }
    }

    /// Insert a block. Returns `Ok(false)` when a block with the same height
    /// and id is already present, leaving the stored block untouched.
    pub fn insert(&mut self, block: B) -> Result<bool, OrderingError> {
        let key = order_key(&block);
        if self.blocks.contains_key(&key) {
            return Ok(false);
        }
        self.ids.admit(block.id(), self.policy)?;
        trace!(id = block.id(), height = block.height(), "adding block to set");
        self.ids.insert(block.id());
        self.blocks.insert(key, block);
        Ok(true)
    }

    /// Remove the block matching `key`'s height and id.
    pub fn remove_by<Q: HeightIndexed + ?Sized>(&mut self, key: &Q) -> Option<B> {
        let removed = self.blocks.remove(&order_key(key))?;
        self.ids.remove(removed.id());
        Some(removed)
    }

    pub fn contains<Q: HeightIndexed + ?Sized>(&self, key: &Q) -> bool {
        self.blocks.contains_key(&order_key(key))
    }

    /// Front of the processing order.
    pub fn first(&self) -> Option<&B> {
        self.blocks.values().next()
    }

    /// Back of the processing order.
    pub fn last(&self) -> Option<&B> {
        self.blocks.values().next_back()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &B> + '_ {
        self.blocks.values()
    }

    /// Drop every block at or below `height`, returning how many were pruned.
    pub fn retain_above(&mut self, height: BlockHeight) -> usize {
        let before = self.blocks.len();
        let ids = &mut self.ids;
        self.blocks.retain(|key, _| {
            let keep = key.height() > height;
            if !keep {
                ids.remove(key.id());
            }
            keep
        });
        let pruned = before - self.blocks.len();
        if pruned > 0 {
            trace!(pruned, height, "pruned blocks at or below height");
        }
        pruned
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl<B: HeightIndexed> Default for BlockSet<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnsim_types::Block;

    #[test]
    fn queue_pops_tallest_then_lowest_id() {
        let mut queue = BlockQueue::new();
        for block in [(1i64, 2i64), (2, 2), (3, 5), (4, 5), (5, 1)] {
            queue.push(block).unwrap();
        }
        assert_eq!(queue.peek(), Some(&(3, 5)));
        assert_eq!(
            queue.drain_ordered(),
            vec![(3, 5), (4, 5), (1, 2), (2, 2), (5, 1)]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn queue_rejects_duplicate_ids_by_default() {
        let mut queue = BlockQueue::new();
        queue.push(Block::new(7, 3, None, 0, 0, 0.0)).unwrap();
        let err = queue.push(Block::new(7, 9, None, 0, 0, 0.0)).unwrap_err();
        assert_eq!(err, OrderingError::DuplicateId { id: 7 });
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn queue_accepts_id_again_after_pop() {
        let mut queue = BlockQueue::new();
        queue.push((7i64, 3i64)).unwrap();
        assert!(queue.contains_id(7));
        assert_eq!(queue.pop(), Some((7, 3)));
        assert!(!queue.contains_id(7));
        queue.push((7, 3)).unwrap();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn queue_allows_duplicates_when_configured() {
        let config = QueueConfig {
            duplicate_ids: DuplicateIdPolicy::Allow,
            ..QueueConfig::default()
        };
        let mut queue = BlockQueue::with_config(&config);
        queue.push((7i64, 3i64)).unwrap();
        queue.push((7, 3)).unwrap();
        queue.pop();
        assert!(queue.contains_id(7));
        queue.clear();
        assert!(queue.is_empty());
        assert!(!queue.contains_id(7));
    }

    #[test]
    fn set_allows_duplicates_when_configured() {
        let config = QueueConfig {
            initial_capacity: 4,
            duplicate_ids: DuplicateIdPolicy::Allow,
        };
        let mut set = BlockSet::with_config(&config);
        assert_eq!(set.insert((7i64, 3i64)), Ok(true));
        assert_eq!(set.insert((7, 5)), Ok(true));
        assert_eq!(set.insert((7, 1)), Ok(true));
        assert_eq!(set.len(), 3);

        assert_eq!(set.retain_above(3), 2);
        assert_eq!(set.first(), Some(&(7, 5)));
        assert!(set.ids.contains(7));

        assert_eq!(set.remove_by(&(7i64, 5i64)), Some((7, 5)));
        assert!(set.is_empty());
        assert!(!set.ids.contains(7));

        let mut strict = BlockSet::with_config(&QueueConfig::default());
        strict.insert((7i64, 3i64)).unwrap();
        assert_eq!(
            strict.insert((7, 5)),
            Err(OrderingError::DuplicateId { id: 7 })
        );
    }

    #[test]
    fn set_orders_and_ignores_identical_reinsert() {
        let mut set = BlockSet::new();
        assert_eq!(set.insert((10i64, 4i64)), Ok(true));
        assert_eq!(set.insert((2, 4)), Ok(true));
        assert_eq!(set.insert((7, 4)), Ok(true));
        assert_eq!(set.insert((2, 4)), Ok(false));

        let order: Vec<_> = set.iter().copied().collect();
        assert_eq!(order, vec![(2, 4), (7, 4), (10, 4)]);
        assert_eq!(set.first(), Some(&(2, 4)));
        assert_eq!(set.last(), Some(&(10, 4)));
    }

    #[test]
    fn set_rejects_same_id_at_other_height() {
        let mut set = BlockSet::new();
        set.insert((3i64, 1i64)).unwrap();
        assert_eq!(
            set.insert((3, 2)),
            Err(OrderingError::DuplicateId { id: 3 })
        );
    }

    #[test]
    fn set_remove_and_prune() {
        let mut set = BlockSet::new();
        for id in 0..6i64 {
            set.insert(Block::new(id, id / 2, None, 0, 0, 0.0)).unwrap();
        }
        let removed = set.remove_by(&(5i64, 2i64)).map(|b| b.id);
        assert_eq!(removed, Some(5));
        assert!(!set.contains(&(5i64, 2i64)));

        assert_eq!(set.retain_above(0), 2);
        let ids: Vec<_> = set.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![4, 2, 3]);

        set.insert(Block::new(0, 9, None, 0, 0, 0.0)).unwrap();
        assert_eq!(set.first().map(|b| b.id), Some(0));
    }

    #[test]
    fn config_defaults_apply_to_missing_fields() {
        let config: QueueConfig = serde_json::from_str(r#"{"duplicate_ids": "allow"}"#).unwrap();
        assert_eq!(config.initial_capacity, DEFAULT_INITIAL_CAPACITY);
        assert_eq!(config.duplicate_ids, DuplicateIdPolicy::Allow);
    }
}

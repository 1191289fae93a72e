use cnsim_types::BlockId;

/// Errors raised by the ordered containers and uniqueness checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderingError {
    #[error("block id {id} is already present")]
    DuplicateId { id: BlockId },
}

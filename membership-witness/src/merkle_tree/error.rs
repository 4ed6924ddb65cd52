use super::MAX_TREE_HEIGHT;

/// Error types related to merkle trees.
#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum MerkleTreeError {
    /// More leaves than the tree can hold
    #[error("A tree of capacity {capacity} cannot hold {number_of_leaves} leaves")]
    TooManyLeaves {
        number_of_leaves: usize,
        capacity: usize,
    },

    /// The tree height is not supported
    #[error("Tree height {0} exceeds the maximum of {max}", max = MAX_TREE_HEIGHT)]
    HeightOutOfBounds(usize),

    /// The nodes of the tree do not fit in memory
    #[error("Not enough memory to store a tree of height {0}")]
    AllocationFailed(usize),

    /// No committed leaf matches the requested value
    #[error("Leaf not found in the merkle tree")]
    LeafNotFound,

    /// Invalid merkle path
    #[error("Path does not verify against root")]
    PathInvalid,
}

//! Fixed height Merkle tree over the participants set.

mod commitment;
mod error;
mod leaf;
mod path;
mod tree;

pub use commitment::MerkleTreeCommitment;
pub use error::MerkleTreeError;
pub use leaf::MerkleTreeLeaf;
pub use path::MerklePath;
pub use tree::MerkleTree;

/// Maximum height of a participants tree.
///
/// The whole tree is kept in memory, a tree of this height stores `2^25 - 1` nodes.
pub const MAX_TREE_HEIGHT: usize = 24;

/// Direction bit of a node which is the left child of its parent.
pub(crate) const LEFT: u8 = 0;

/// Direction bit of a node which is the right child of its parent.
pub(crate) const RIGHT: u8 = 1;

/// Heap index of the parent of node `i`.
fn parent(i: usize) -> usize {
    assert!(i > 0, "The root has no parent");
    (i - 1) / 2
}

/// Left children sit at odd heap indices.
fn direction(i: usize) -> u8 {
    if i % 2 == 1 { LEFT } else { RIGHT }
}

/// Heap index of the other child of the parent of node `i`.
fn sibling(i: usize) -> usize {
    assert!(i > 0, "The root has no sibling");
    match direction(i) {
        LEFT => i + 1,
        _ => i - 1,
    }
}

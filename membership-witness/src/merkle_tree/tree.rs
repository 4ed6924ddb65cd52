use std::marker::PhantomData;

use anyhow::anyhow;
use digest::{Digest, FixedOutput};
use rayon::prelude::*;

use super::{
    MAX_TREE_HEIGHT, MerklePath, MerkleTreeCommitment, MerkleTreeError, MerkleTreeLeaf,
    direction, parent, sibling,
};
use crate::StdResult;

/// Complete binary tree of hashes of fixed height, committing to an ordered list of leaves.
///
/// Unused leaf slots are filled with the sentinel `D::digest([0u8])`, so the root only
/// depends on the height and on the ordered leaves.
#[derive(Debug, Clone)]
pub struct MerkleTree<D: Digest, L: MerkleTreeLeaf> {
    /// The nodes are stored in an array heap:
    /// * `nodes[0]` is the root,
    /// * the children of `nodes[i]` are `nodes[2i + 1]` and `nodes[2i + 2]`,
    /// * the `2^height` leaves are the last nodes, starting at `nodes[leaf_off]`.
    nodes: Vec<Vec<u8>>,
    leaf_off: usize,
    height: usize,
    /// Number of leaves committed, the padding excluded.
    n: usize,
    hasher: PhantomData<D>,
    leaves: PhantomData<L>,
}

impl<D: Digest + FixedOutput, L: MerkleTreeLeaf> MerkleTree<D, L> {
    /// Build the tree of the given height over `leaves`.
    ///
    /// # Error
    /// Fails with [MerkleTreeError::HeightOutOfBounds] if the height is above
    /// [MAX_TREE_HEIGHT], and with [MerkleTreeError::TooManyLeaves] if there are more than
    /// `2^height` leaves.
    pub fn new(height: usize, leaves: &[L]) -> StdResult<Self> {
        if height > MAX_TREE_HEIGHT {
            return Err(anyhow!(MerkleTreeError::HeightOutOfBounds(height)));
        }
        let capacity = u32::try_from(height)
            .ok()
            .and_then(|height| 1usize.checked_shl(height))
            .ok_or_else(|| anyhow!(MerkleTreeError::HeightOutOfBounds(height)))?;
        if leaves.len() > capacity {
            return Err(anyhow!(MerkleTreeError::TooManyLeaves {
                number_of_leaves: leaves.len(),
                capacity,
            }));
        }

        let leaf_off = capacity - 1;
        let sentinel = Self::sentinel();
        let mut nodes: Vec<Vec<u8>> = Vec::new();
        nodes
            .try_reserve_exact(leaf_off + capacity)
            .map_err(|_| anyhow!(MerkleTreeError::AllocationFailed(height)))?;
        nodes.resize(leaf_off, Vec::new());
        nodes.par_extend(
            leaves
                .par_iter()
                .map(|leaf| D::digest(leaf.as_bytes_for_merkle_tree()).to_vec()),
        );
        nodes.resize(leaf_off + capacity, sentinel.clone());

        // Subtrees made only of padding all share the same root at a given level.
        let mut empty_subtree_root = sentinel;
        for level in (0..height).rev() {
            let first = (1usize << level) - 1;
            let next_empty_subtree_root =
                Self::hash_children(&empty_subtree_root, &empty_subtree_root);
            for i in first..(2 * first + 1) {
                let (left, right) = (&nodes[2 * i + 1], &nodes[2 * i + 2]);
                let hash = if *left == empty_subtree_root && *right == empty_subtree_root {
                    next_empty_subtree_root.clone()
                } else {
                    Self::hash_children(left, right)
                };
                nodes[i] = hash;
            }
            empty_subtree_root = next_empty_subtree_root;
        }

        Ok(Self {
            nodes,
            leaf_off,
            height,
            n: leaves.len(),
            hasher: PhantomData,
            leaves: PhantomData,
        })
    }

    /// Hash of a leaf, as stored in the tree.
    pub fn hash_leaf(leaf: &L) -> Vec<u8> {
        D::digest(leaf.as_bytes_for_merkle_tree()).to_vec()
    }

    fn sentinel() -> Vec<u8> {
        D::digest([0u8]).to_vec()
    }

    fn hash_children(left: &[u8], right: &[u8]) -> Vec<u8> {
        D::new().chain_update(left).chain_update(right).finalize().to_vec()
    }

    /// Root of the tree.
    pub fn root(&self) -> &[u8] {
        &self.nodes[0]
    }

    /// Height of the tree, an inclusion path has this many levels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of leaves committed, the padding excluded.
    pub fn number_of_leaves(&self) -> usize {
        self.n
    }

    /// Convert the tree to a commitment holding only its root.
    pub fn to_merkle_tree_commitment(&self) -> MerkleTreeCommitment<D> {
        MerkleTreeCommitment::new(self.root().to_vec())
    }

    /// Compute the inclusion path of the leaf whose hash is `leaf_hash`.
    ///
    /// When the same value is committed several times, the path of its first occurrence is
    /// returned. The padding is never a member of the tree.
    ///
    /// # Error
    /// Fails with [MerkleTreeError::LeafNotFound] if no committed leaf has this hash.
    pub fn compute_merkle_tree_path(&self, leaf_hash: &[u8]) -> StdResult<MerklePath<D>> {
        let position = self.nodes[self.leaf_off..self.leaf_off + self.n]
            .iter()
            .position(|node| node.as_slice() == leaf_hash)
            .ok_or_else(|| anyhow!(MerkleTreeError::LeafNotFound))?;

        let mut idx = self.leaf_off + position;
        let mut path_elements = Vec::with_capacity(self.height);
        let mut path_indices = Vec::with_capacity(self.height);
        while idx > 0 {
            path_elements.push(self.nodes[sibling(idx)].clone());
            path_indices.push(direction(idx));
            idx = parent(idx);
        }

        Ok(MerklePath::new(path_elements, path_indices))
    }

    /// Hash `leaf` and compute its inclusion path.
    pub fn compute_merkle_tree_path_for_leaf(&self, leaf: &L) -> StdResult<MerklePath<D>> {
        self.compute_merkle_tree_path(&Self::hash_leaf(leaf))
    }
}

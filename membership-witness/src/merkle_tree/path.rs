use std::marker::PhantomData;

use digest::{Digest, FixedOutput};
use serde::{Deserialize, Serialize};

use super::LEFT;

/// Inclusion proof of a leaf, ordered from the leaf level up to the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerklePath<D: Digest> {
    /// Hash of the sibling of the current node, at every level.
    pub path_elements: Vec<Vec<u8>>,
    /// `0` if the current node is a left child, `1` if it is a right child, at every level.
    pub path_indices: Vec<u8>,
    hasher: PhantomData<D>,
}

impl<D: Digest + FixedOutput> MerklePath<D> {
    pub(crate) fn new(path_elements: Vec<Vec<u8>>, path_indices: Vec<u8>) -> Self {
        Self {
            path_elements,
            path_indices,
            hasher: PhantomData,
        }
    }

    /// Number of levels covered by the path.
    pub fn len(&self) -> usize {
        self.path_elements.len()
    }

    /// True for the path of a tree of height zero.
    pub fn is_empty(&self) -> bool {
        self.path_elements.is_empty()
    }

    /// Replay the path from a leaf hash up to the root it commits to.
    pub fn compute_root(&self, leaf_hash: &[u8]) -> Vec<u8> {
        self.path_elements.iter().zip(&self.path_indices).fold(
            leaf_hash.to_vec(),
            |node, (sibling, direction)| {
                let (left, right) = if *direction == LEFT {
                    (&node, sibling)
                } else {
                    (sibling, &node)
                };
                D::new().chain_update(left).chain_update(right).finalize().to_vec()
            },
        )
    }
}

use std::marker::PhantomData;

use anyhow::anyhow;
use digest::{Digest, FixedOutput};
use serde::{Deserialize, Serialize};

use super::{MerklePath, MerkleTreeError, MerkleTreeLeaf};
use crate::StdResult;

/// Root of a [MerkleTree](super::MerkleTree), enough to check inclusion proofs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerkleTreeCommitment<D: Digest> {
    /// Root of the merkle commitment.
    pub root: Vec<u8>,
    hasher: PhantomData<D>,
}

impl<D: Digest + FixedOutput> MerkleTreeCommitment<D> {
    pub(crate) fn new(root: Vec<u8>) -> Self {
        Self {
            root,
            hasher: PhantomData,
        }
    }

    /// Check an inclusion proof that `leaf` is part of the tree by traveling the whole path
    /// until the root.
    ///
    /// # Error
    /// Fails with [MerkleTreeError::PathInvalid] if the path does not lead to the root.
    pub fn verify_leaf_membership_from_path<L: MerkleTreeLeaf>(
        &self,
        leaf: &L,
        path: &MerklePath<D>,
    ) -> StdResult<()> {
        self.verify_leaf_hash_membership_from_path(
            &D::digest(leaf.as_bytes_for_merkle_tree()),
            path,
        )
    }

    /// Same as [Self::verify_leaf_membership_from_path] for an already hashed leaf.
    pub fn verify_leaf_hash_membership_from_path(
        &self,
        leaf_hash: &[u8],
        path: &MerklePath<D>,
    ) -> StdResult<()> {
        if path.path_elements.len() == path.path_indices.len()
            && path.compute_root(leaf_hash) == self.root
        {
            return Ok(());
        }

        Err(anyhow!(MerkleTreeError::PathInvalid))
    }
}

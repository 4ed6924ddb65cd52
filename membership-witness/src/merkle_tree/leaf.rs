use crate::Address;

/// Values that can be committed in a [MerkleTree](super::MerkleTree).
///
/// The bytes returned are hashed to obtain the leaf node.
pub trait MerkleTreeLeaf: Sync {
    fn as_bytes_for_merkle_tree(&self) -> Vec<u8>;
}

impl MerkleTreeLeaf for Address {
    fn as_bytes_for_merkle_tree(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl MerkleTreeLeaf for &str {
    fn as_bytes_for_merkle_tree(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl MerkleTreeLeaf for String {
    fn as_bytes_for_merkle_tree(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl MerkleTreeLeaf for Vec<u8> {
    fn as_bytes_for_merkle_tree(&self) -> Vec<u8> {
        self.clone()
    }
}

#![doc = include_str!("../README.md")]
//! Witness generation for a membership-and-signature circuit.
//!
//! The statement proven by the consuming circuit is "the holder of a secp256k1 private key
//! whose Ethereum address belongs to a set committed by a Merkle root signed a given message
//! hash". This crate builds every private and public input of that statement:
//!
//! * key validation ([validate_private_key], [validate_public_key]),
//! * deterministic signing and limb decomposition ([SignatureEngine], [LimbEncoding]),
//! * a fixed height Poseidon Merkle tree over the participants and an inclusion path
//!   ([MerkleTree], [PoseidonDigest]),
//! * the canonical, serializable [Witness] record ([WitnessAssembler]).
//!
//! [WitnessGenerator] wires the components together.
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use membership_witness::{Address, PrivateKey, WitnessGenerator, WitnessParameters};
//! use rand_chacha::ChaCha20Rng;
//! use rand_core::SeedableRng;
//!
//! let mut rng = ChaCha20Rng::from_seed([0u8; 32]);
//! let signer = PrivateKey::generate(&mut rng);
//!
//! // The participant set, the signer must be part of it.
//! let mut participants: Vec<Address> = (0..3)
//!     .map(|_| Address::from_public_key(&PrivateKey::generate(&mut rng).public_key()))
//!     .collect();
//! participants.push(Address::from_public_key(&signer.public_key()));
//!
//! let parameters = WitnessParameters {
//!     tree_height: 3,
//!     ..WitnessParameters::default()
//! };
//! let logger = slog::Logger::root(slog::Discard, slog::o!());
//! let generator: WitnessGenerator = WitnessGenerator::new(parameters, logger)?;
//!
//! let message_hash = [7u8; 32];
//! let witness = generator.generate(&signer.to_bytes(), &participants, &message_hash)?;
//!
//! assert_eq!(witness.path_elements().len(), 3);
//! assert_eq!(witness.r().len(), 4);
//! # Ok(())
//! # }
//! ```

mod address;
mod error;
mod generator;
mod key_validation;
mod limbs;
mod logging;
mod merkle_tree;
mod parameters;
mod poseidon;
mod signature_engine;
#[cfg(test)]
pub(crate) mod test_utils;
mod witness;

pub use address::{ADDRESS_LENGTH, Address};
pub use error::{
    AddressError, KeyValidationError, LimbEncodingError, ParametersError, SigningError,
    WitnessAssemblyError,
};
pub use generator::WitnessGenerator;
pub use key_validation::{
    PRIVATE_KEY_LENGTH, PrivateKey, PublicKey, satisfies_curve_equation, validate_private_key,
    validate_public_key,
};
pub use limbs::LimbEncoding;
pub use logging::LoggerExtensions;
pub use merkle_tree::{
    MAX_TREE_HEIGHT, MerklePath, MerkleTree, MerkleTreeCommitment, MerkleTreeError,
    MerkleTreeLeaf,
};
pub use parameters::WitnessParameters;
pub use poseidon::{
    FIELD_ELEMENT_LENGTH, PoseidonDigest, field_element_to_bytes, hash_field_elements,
};
pub use signature_engine::{EcdsaSignature, MESSAGE_HASH_LENGTH, SignatureEngine, SignatureLimbs};
pub use witness::{Witness, WitnessAssembler};

/// Hash function used for the participants tree: circomlib Poseidon over the BN254 scalar
/// field, so that every node is a valid input of the consuming circuit.
pub type MerkleHasher = PoseidonDigest;

/// Generic error type
pub type StdError = anyhow::Error;

/// Generic result type
pub type StdResult<T> = anyhow::Result<T, StdError>;

//! Poseidon hash over the BN254 scalar field, with the circomlib parameters.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use digest::generic_array::typenum::U32;
use digest::{FixedOutput, HashMarker, Output, OutputSizeUser, Reset, Update};
use light_poseidon::{Poseidon, PoseidonHasher};

/// Length in bytes of a serialized field element.
pub const FIELD_ELEMENT_LENGTH: usize = 32;

/// Largest number of inputs of a circomlib Poseidon instance.
const MAX_POSEIDON_INPUTS: usize = 12;

/// Wrapper implementing the `Digest` traits for the circomlib Poseidon hash, so that the
/// merkle tree stays generic over the hash function used.
///
/// Every call to `update` left pads its input with zeros to a multiple of 32 bytes, and each
/// 32 bytes chunk is read as a big endian field element. A 20 bytes address is therefore
/// hashed as the single element `Poseidon([address])`, and `update(left).update(right)` with
/// two tree nodes hashes `Poseidon([left, right])`.
///
/// This deviates from the usual digest behavior where `update([1]).update([2])` equals
/// `update([1, 2])`. Chunks larger than the modulus are reduced, which only happens for
/// arbitrary byte leaves: tree nodes are always canonical field elements.
///
/// The output is the big endian encoding of a canonical field element.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct PoseidonDigest {
    buffer: Vec<u8>,
}

impl PoseidonDigest {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }
}

impl Update for PoseidonDigest {
    fn update(&mut self, data: &[u8]) {
        let target_len = data.len().div_ceil(FIELD_ELEMENT_LENGTH) * FIELD_ELEMENT_LENGTH;
        self.buffer.resize(self.buffer.len() + target_len - data.len(), 0);
        self.buffer.extend_from_slice(data);
    }
}

impl OutputSizeUser for PoseidonDigest {
    type OutputSize = U32;
}

impl FixedOutput for PoseidonDigest {
    fn finalize_into(self, out: &mut Output<Self>) {
        let inputs: Vec<Fr> = self
            .buffer
            .chunks_exact(FIELD_ELEMENT_LENGTH)
            .map(Fr::from_be_bytes_mod_order)
            .collect();

        out.copy_from_slice(&field_element_to_bytes(&hash_field_elements(&inputs)));
    }
}

impl Reset for PoseidonDigest {
    fn reset(&mut self) {
        self.buffer.clear();
    }
}

impl HashMarker for PoseidonDigest {}

/// Hash a list of field elements.
///
/// Up to 12 elements are hashed by the circomlib instance of the same width. Longer inputs
/// are absorbed 11 elements at a time, each step hashing the previous result first. An empty
/// list hashes as the single element zero.
pub fn hash_field_elements(inputs: &[Fr]) -> Fr {
    if inputs.is_empty() {
        return circom_poseidon(&[Fr::from(0u64)]);
    }
    let (head, tail) = inputs.split_at(inputs.len().min(MAX_POSEIDON_INPUTS));

    tail.chunks(MAX_POSEIDON_INPUTS - 1).fold(circom_poseidon(head), |state, chunk| {
        let mut next = Vec::with_capacity(chunk.len() + 1);
        next.push(state);
        next.extend_from_slice(chunk);
        circom_poseidon(&next)
    })
}

fn circom_poseidon(inputs: &[Fr]) -> Fr {
    // Widths from 1 to 12 inputs all have circomlib parameters.
    Poseidon::<Fr>::new_circom(inputs.len())
        .and_then(|mut poseidon| poseidon.hash(inputs))
        .expect("circomlib Poseidon is defined for 1 to 12 inputs")
}

/// Big endian encoding of a field element on 32 bytes.
pub fn field_element_to_bytes(element: &Fr) -> Vec<u8> {
    element.into_bigint().to_bytes_be()
}

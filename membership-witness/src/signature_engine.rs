//! Deterministic ECDSA signing and decomposition of the signed values in limbs.

use anyhow::{Context, anyhow};
use k256::ecdsa::{
    Signature, VerifyingKey,
    signature::hazmat::{PrehashSigner, PrehashVerifier},
};
use num_bigint::BigUint;

use crate::{LimbEncoding, PrivateKey, PublicKey, SigningError, StdResult, WitnessParameters};

/// Length in bytes of the message hash to sign.
pub const MESSAGE_HASH_LENGTH: usize = 32;

/// An ECDSA signature `(r, s)` over secp256k1, normalized to a low `s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcdsaSignature(Signature);

impl EcdsaSignature {
    /// Big endian bytes of `r`.
    pub fn r(&self) -> [u8; 32] {
        let mut r = [0u8; 32];
        r.copy_from_slice(&self.0.to_bytes()[..32]);
        r
    }

    /// Big endian bytes of `s`.
    pub fn s(&self) -> [u8; 32] {
        let mut s = [0u8; 32];
        s.copy_from_slice(&self.0.to_bytes()[32..]);
        s
    }

    /// Check the signature of a message hash against a public key.
    pub fn verify(&self, message_hash: &[u8], public_key: &PublicKey) -> StdResult<()> {
        check_message_hash_length(message_hash)?;
        VerifyingKey::from(public_key.0)
            .verify_prehash(message_hash, &self.0)
            .map_err(|e| anyhow!(SigningError::SignatureFailed(e.to_string())))
            .with_context(|| "ECDSA signature verification failed.")
    }
}

/// Limb decomposition of every value signed or used to sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureLimbs {
    /// Message hash.
    pub message_hash: LimbEncoding,
    /// `x` coordinate of the public key.
    pub public_key_x: LimbEncoding,
    /// `y` coordinate of the public key.
    pub public_key_y: LimbEncoding,
    /// `r` component of the signature.
    pub r: LimbEncoding,
    /// `s` component of the signature.
    pub s: LimbEncoding,
}

/// Signs message hashes and decomposes the circuit inputs in limbs.
///
/// Nonces are derived with RFC 6979, so a given key and message hash always produce the
/// same signature.
#[derive(Debug, Clone, Copy)]
pub struct SignatureEngine {
    limb_count: usize,
    limb_width: u32,
}

impl SignatureEngine {
    /// Create a signature engine producing limbs with the given parameters shape.
    pub fn new(parameters: &WitnessParameters) -> Self {
        Self {
            limb_count: parameters.limb_count,
            limb_width: parameters.limb_width,
        }
    }

    /// Derive the public key of a private key.
    pub fn derive_public_key(&self, private_key: &PrivateKey) -> PublicKey {
        private_key.public_key()
    }

    /// Sign a 32 bytes message hash.
    ///
    /// # Error
    /// Fails with [SigningError::MalformedMessageHash] if the hash is not 32 bytes long.
    pub fn sign(&self, message_hash: &[u8], private_key: &PrivateKey) -> StdResult<EcdsaSignature> {
        check_message_hash_length(message_hash)?;
        let signature: Signature = private_key
            .0
            .sign_prehash(message_hash)
            .map_err(|e| anyhow!(SigningError::SignatureFailed(e.to_string())))?;

        Ok(EcdsaSignature(signature.normalize_s().unwrap_or(signature)))
    }

    /// Split a value in limbs with the configured shape.
    pub fn to_limbs(&self, value: &BigUint) -> StdResult<LimbEncoding> {
        LimbEncoding::from_biguint(value, self.limb_count, self.limb_width)
    }

    /// Decompose the message hash, the public key and the signature in limbs.
    pub fn decompose(
        &self,
        message_hash: &[u8],
        public_key: &PublicKey,
        signature: &EcdsaSignature,
    ) -> StdResult<SignatureLimbs> {
        let to_limbs = |bytes: &[u8], name: &str| {
            self.to_limbs(&BigUint::from_bytes_be(bytes))
                .with_context(|| format!("Could not split '{name}' in limbs."))
        };

        Ok(SignatureLimbs {
            message_hash: to_limbs(message_hash, "message hash")?,
            public_key_x: to_limbs(&public_key.x(), "public key x")?,
            public_key_y: to_limbs(&public_key.y(), "public key y")?,
            r: to_limbs(&signature.r(), "r")?,
            s: to_limbs(&signature.s(), "s")?,
        })
    }

    /// Sign `message_hash` and decompose every value of the signature statement in limbs.
    pub fn sign_and_decompose(
        &self,
        message_hash: &[u8],
        private_key: &PrivateKey,
    ) -> StdResult<SignatureLimbs> {
        let signature = self
            .sign(message_hash, private_key)
            .with_context(|| "Signature engine could not sign the message hash.")?;
        let public_key = self.derive_public_key(private_key);

        self.decompose(message_hash, &public_key, &signature)
    }
}

fn check_message_hash_length(message_hash: &[u8]) -> StdResult<()> {
    if message_hash.len() != MESSAGE_HASH_LENGTH {
        return Err(anyhow!(SigningError::MalformedMessageHash {
            expected: MESSAGE_HASH_LENGTH,
            actual: message_hash.len(),
        }));
    }

    Ok(())
}

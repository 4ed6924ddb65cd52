//! Validation of secp256k1 key material.

use std::fmt::{Debug, Formatter};

use anyhow::{Context, anyhow};
use k256::{FieldBytes, ecdsa::SigningKey, elliptic_curve::sec1::ToEncodedPoint};
use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};

use crate::{KeyValidationError, StdResult};

/// Length in bytes of a private key.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Length in bytes of a public key given as the raw `x || y` concatenation.
const RAW_PUBLIC_KEY_LENGTH: usize = 64;

/// SEC1 tag of an uncompressed point.
const SEC1_UNCOMPRESSED_TAG: u8 = 0x04;

/// Prime of the secp256k1 base field.
const FIELD_PRIME_HEX: &str = "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f";

/// Constant term of the secp256k1 equation `y^2 = x^3 + 7`.
const CURVE_B: u32 = 7;

/// A secp256k1 private key, a scalar in `[1, n - 1]`.
///
/// The scalar is never serialized nor printed.
#[derive(Clone)]
pub struct PrivateKey(pub(crate) SigningKey);

impl PrivateKey {
    /// Generate a random private key.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(SigningKey::random(rng))
    }

    /// Parse a hexadecimal private key, with or without `0x` prefix.
    pub fn from_hex(hex_key: &str) -> StdResult<Self> {
        let bytes = hex::decode(strip_hex_prefix(hex_key))
            .map_err(|e| anyhow!(KeyValidationError::InvalidKey(e.to_string())))
            .with_context(|| "Could not decode hexadecimal private key.")?;

        validate_private_key(&bytes)
    }

    /// Derive the public key, `G * k`.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(k256::PublicKey::from(self.0.verifying_key()))
    }

    /// Big endian bytes of the scalar.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.0.to_bytes().into()
    }
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PrivateKey").field(&"<redacted>").finish()
    }
}

/// A secp256k1 public key: an affine point on the curve, never the point at infinity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey(pub(crate) k256::PublicKey);

impl PublicKey {
    /// Parse a hexadecimal public key, with or without `0x` prefix.
    pub fn from_hex(hex_key: &str) -> StdResult<Self> {
        let bytes = hex::decode(strip_hex_prefix(hex_key))
            .map_err(|e| anyhow!(KeyValidationError::InvalidKey(e.to_string())))
            .with_context(|| "Could not decode hexadecimal public key.")?;

        validate_public_key(&bytes)
    }

    /// Big endian bytes of the `x` coordinate.
    pub fn x(&self) -> [u8; 32] {
        let mut x = [0u8; 32];
        x.copy_from_slice(&self.to_raw_bytes()[..32]);
        x
    }

    /// Big endian bytes of the `y` coordinate.
    pub fn y(&self) -> [u8; 32] {
        let mut y = [0u8; 32];
        y.copy_from_slice(&self.to_raw_bytes()[32..]);
        y
    }

    /// The `x || y` concatenation, i.e. the uncompressed SEC1 encoding without its tag.
    pub fn to_raw_bytes(&self) -> [u8; RAW_PUBLIC_KEY_LENGTH] {
        let encoded = self.0.to_encoded_point(false);
        let mut raw = [0u8; RAW_PUBLIC_KEY_LENGTH];
        raw.copy_from_slice(&encoded.as_bytes()[1..]);
        raw
    }
}

/// Check that `bytes` is a 32 bytes big endian scalar in `[1, n - 1]`.
pub fn validate_private_key(bytes: &[u8]) -> StdResult<PrivateKey> {
    if bytes.len() != PRIVATE_KEY_LENGTH {
        return Err(anyhow!(KeyValidationError::InvalidKey(format!(
            "private key must be {PRIVATE_KEY_LENGTH} bytes, got {}",
            bytes.len()
        ))));
    }
    let signing_key = SigningKey::from_bytes(FieldBytes::from_slice(bytes)).map_err(|_| {
        anyhow!(KeyValidationError::InvalidKey(
            "private key must be in the range [1, n - 1]".to_string()
        ))
    })?;

    Ok(PrivateKey(signing_key))
}

/// Check that `bytes` encodes a point of the curve other than the point at infinity.
///
/// Accepted encodings are the raw 64 bytes `x || y` concatenation and the SEC1 compressed
/// (33 bytes) or uncompressed (65 bytes) forms.
pub fn validate_public_key(bytes: &[u8]) -> StdResult<PublicKey> {
    let sec1_bytes = match bytes.len() {
        RAW_PUBLIC_KEY_LENGTH => {
            let mut sec1_bytes = Vec::with_capacity(RAW_PUBLIC_KEY_LENGTH + 1);
            sec1_bytes.push(SEC1_UNCOMPRESSED_TAG);
            sec1_bytes.extend_from_slice(bytes);
            sec1_bytes
        }
        33 | 65 => bytes.to_vec(),
        length => {
            return Err(anyhow!(KeyValidationError::InvalidKey(format!(
                "public key must be 33, 64 or 65 bytes, got {length}"
            ))));
        }
    };
    let public_key = k256::PublicKey::from_sec1_bytes(&sec1_bytes).map_err(|_| {
        anyhow!(KeyValidationError::InvalidKey(
            "public key is not a valid point of the curve".to_string()
        ))
    })?;
    let public_key = PublicKey(public_key);

    if !satisfies_curve_equation(&public_key.x(), &public_key.y()) {
        return Err(anyhow!(KeyValidationError::InvalidKey(
            "public key does not satisfy the curve equation".to_string()
        )));
    }

    Ok(public_key)
}

/// Evaluate `y^2 == x^3 + 7 (mod p)` for big endian coordinates.
pub fn satisfies_curve_equation(x: &[u8; 32], y: &[u8; 32]) -> bool {
    let Some(prime) = BigUint::parse_bytes(FIELD_PRIME_HEX.as_bytes(), 16) else {
        return false;
    };
    let x = BigUint::from_bytes_be(x);
    let y = BigUint::from_bytes_be(y);
    if x >= prime || y >= prime {
        return false;
    }

    let lhs = y.modpow(&BigUint::from(2u32), &prime);
    let rhs = (x.modpow(&BigUint::from(3u32), &prime) + BigUint::from(CURVE_B)) % &prime;

    lhs == rhs
}

fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

use anyhow::anyhow;
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::{LimbEncodingError, StdResult};

/// A big integer split in fixed width limbs, least significant limb first.
///
/// The encoding is canonical: every limb is strictly lower than `2^limb_width` and the
/// sequence is always zero-padded to the same number of limbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimbEncoding {
    limbs: Vec<u64>,
    limb_width: u32,
}

impl LimbEncoding {
    /// Split `value` in `limb_count` limbs of `limb_width` bits.
    ///
    /// # Error
    /// Fails with [LimbEncodingError::EncodingOverflow] if `value` needs more than
    /// `limb_count * limb_width` bits.
    pub fn from_biguint(value: &BigUint, limb_count: usize, limb_width: u32) -> StdResult<Self> {
        if limb_count == 0 || limb_width == 0 || limb_width > u64::BITS {
            return Err(anyhow!(LimbEncodingError::InvalidLimbShape {
                limb_count,
                limb_width
            }));
        }
        let capacity = (limb_count as u128) * (limb_width as u128);
        if (value.bits() as u128) > capacity {
            return Err(anyhow!(LimbEncodingError::EncodingOverflow {
                value_bits: value.bits(),
                limb_count,
                limb_width,
            }));
        }

        let mask = (BigUint::one() << limb_width) - BigUint::one();
        let mut remainder = value.clone();
        let mut limbs = Vec::with_capacity(limb_count);
        for _ in 0..limb_count {
            let limb = (&remainder & &mask).iter_u64_digits().next().unwrap_or(0);
            limbs.push(limb);
            remainder >>= limb_width;
        }

        Ok(Self { limbs, limb_width })
    }

    /// Split a big endian unsigned integer in `limb_count` limbs of `limb_width` bits.
    pub fn from_be_bytes(bytes: &[u8], limb_count: usize, limb_width: u32) -> StdResult<Self> {
        Self::from_biguint(&BigUint::from_bytes_be(bytes), limb_count, limb_width)
    }

    /// Recompose the integer from its limbs.
    pub fn to_biguint(&self) -> BigUint {
        self.limbs.iter().rev().fold(BigUint::zero(), |acc, limb| {
            (acc << self.limb_width) + BigUint::from(*limb)
        })
    }

    /// Limbs, least significant first.
    pub fn limbs(&self) -> &[u64] {
        &self.limbs
    }

    /// Number of limbs.
    pub fn limb_count(&self) -> usize {
        self.limbs.len()
    }

    /// Width of each limb in bits.
    pub fn limb_width(&self) -> u32 {
        self.limb_width
    }

    /// Base 10 rendering of every limb.
    pub fn to_decimal_strings(&self) -> Vec<String> {
        self.limbs.iter().map(|limb| limb.to_string()).collect()
    }
}

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};

use crate::{AddressError, PublicKey, StdError};

/// Length in bytes of an address.
pub const ADDRESS_LENGTH: usize = 20;

/// Ethereum style address: the last 20 bytes of `keccak256(x || y)`.
///
/// Rendered as `0x` followed by 40 lowercase hexadecimal characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; ADDRESS_LENGTH]);

impl Address {
    /// Derive the address of a public key.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let digest = Keccak256::digest(public_key.to_raw_bytes());
        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(&digest[digest.len() - ADDRESS_LENGTH..]);

        Self(address)
    }

    /// Raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = StdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let hex_part = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .unwrap_or(value);
        let mut address = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(hex_part, &mut address)
            .map_err(|_| anyhow!(AddressError::InvalidAddress(value.to_string())))?;

        Ok(Self(address))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::from_str(&value).map_err(serde::de::Error::custom)
    }
}

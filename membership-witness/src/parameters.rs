use anyhow::anyhow;
use config::{ConfigError, Map, Source, Value, ValueKind};
use serde::{Deserialize, Serialize};

use crate::{MAX_TREE_HEIGHT, ParametersError, StdResult};

/// Number of bits of a secp256k1 scalar or field element.
const CURVE_BIT_WIDTH: u64 = 256;

/// Shape of the witness expected by the consuming circuit.
///
/// These values are fixed when the circuit is compiled, so they are given once to every
/// component instead of being chosen per call.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessParameters {
    /// Height of the participants Merkle tree, the tree holds `2^tree_height` leaves.
    pub tree_height: usize,
    /// Number of bits of each limb.
    pub limb_width: u32,
    /// Number of limbs used to represent a 256 bits value.
    pub limb_count: usize,
}

impl WitnessParameters {
    /// Check that the parameters describe a buildable witness.
    pub fn validate(&self) -> StdResult<()> {
        if self.tree_height > MAX_TREE_HEIGHT {
            return Err(anyhow!(ParametersError::InvalidParameters(format!(
                "tree height {} exceeds the maximum of {MAX_TREE_HEIGHT}",
                self.tree_height
            ))));
        }
        if self.limb_width == 0 || self.limb_width > u64::BITS {
            return Err(anyhow!(ParametersError::InvalidParameters(format!(
                "limb width must be between 1 and {} bits, got {}",
                u64::BITS,
                self.limb_width
            ))));
        }
        if self.limb_count == 0 {
            return Err(anyhow!(ParametersError::InvalidParameters(
                "limb count must be strictly positive".to_string()
            )));
        }
        let capacity = (self.limb_count as u128) * (self.limb_width as u128);
        if capacity < CURVE_BIT_WIDTH as u128 {
            return Err(anyhow!(ParametersError::InvalidParameters(format!(
                "{} limbs of {} bits cannot hold a {CURVE_BIT_WIDTH} bits value",
                self.limb_count, self.limb_width
            ))));
        }

        Ok(())
    }

    fn namespace() -> String {
        "witness parameters".to_string()
    }
}

impl Default for WitnessParameters {
    fn default() -> Self {
        Self {
            tree_height: 20,
            limb_width: 64,
            limb_count: 4,
        }
    }
}

impl Source for WitnessParameters {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(*self)
    }

    fn collect(&self) -> Result<Map<String, Value>, ConfigError> {
        fn into_value<V: Into<ValueKind>>(value: V) -> Value {
            Value::new(Some(&WitnessParameters::namespace()), value.into())
        }
        let mut result = Map::new();

        result.insert(
            "tree_height".to_string(),
            into_value(self.tree_height as u64),
        );
        result.insert("limb_width".to_string(), into_value(self.limb_width as u64));
        result.insert("limb_count".to_string(), into_value(self.limb_count as u64));

        Ok(result)
    }
}

use anyhow::anyhow;
use digest::Digest;
use num_bigint::BigUint;
use serde::Serialize;

use crate::{
    LimbEncoding, MerklePath, SignatureLimbs, StdResult, WitnessAssemblyError, WitnessParameters,
};

/// Inputs of the membership and signature circuit.
///
/// Every numeric value is an unsigned base 10 string without leading zeros. Hashes are read
/// as big endian integers and multi limb values are listed least significant limb first.
///
/// A witness is only built by [WitnessAssembler], it is serialized but never deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Witness {
    root: String,
    path_elements: Vec<String>,
    path_indices: Vec<String>,
    msg_hash: Vec<String>,
    pub_key: [Vec<String>; 2],
    r: Vec<String>,
    s: Vec<String>,
}

impl Witness {
    /// Root of the participants tree.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Sibling hashes from the signer leaf up to the root.
    pub fn path_elements(&self) -> &[String] {
        &self.path_elements
    }

    /// Direction bits matching [Self::path_elements].
    pub fn path_indices(&self) -> &[String] {
        &self.path_indices
    }

    /// Limbs of the signed message hash.
    pub fn msg_hash(&self) -> &[String] {
        &self.msg_hash
    }

    /// Limbs of the `x` and `y` coordinates of the signer public key.
    pub fn pub_key(&self) -> &[Vec<String>; 2] {
        &self.pub_key
    }

    /// Limbs of the signature `r`.
    pub fn r(&self) -> &[String] {
        &self.r
    }

    /// Limbs of the signature `s`.
    pub fn s(&self) -> &[String] {
        &self.s
    }
}

/// Checks that the Merkle proof and the signature limbs agree with the circuit shape and
/// merges them in a [Witness].
#[derive(Debug, Clone, Copy)]
pub struct WitnessAssembler {
    parameters: WitnessParameters,
}

impl WitnessAssembler {
    /// Create an assembler for the given circuit shape.
    pub fn new(parameters: &WitnessParameters) -> Self {
        Self {
            parameters: *parameters,
        }
    }

    /// Build the witness of a signer from the tree root, its inclusion path and its
    /// signature limbs.
    ///
    /// # Error
    /// Fails with a [WitnessAssemblyError] if any part has an unexpected shape.
    pub fn assemble<D: Digest>(
        &self,
        root: &[u8],
        path: &MerklePath<D>,
        signature_limbs: &SignatureLimbs,
    ) -> StdResult<Witness> {
        self.check_path(path)?;
        for (field, limbs) in [
            ("msgHash", &signature_limbs.message_hash),
            ("pubKey.x", &signature_limbs.public_key_x),
            ("pubKey.y", &signature_limbs.public_key_y),
            ("r", &signature_limbs.r),
            ("s", &signature_limbs.s),
        ] {
            self.check_limbs(field, limbs)?;
        }

        Ok(Witness {
            root: hash_to_decimal(root),
            path_elements: path
                .path_elements
                .iter()
                .map(|element| hash_to_decimal(element))
                .collect(),
            path_indices: path
                .path_indices
                .iter()
                .map(|index| index.to_string())
                .collect(),
            msg_hash: signature_limbs.message_hash.to_decimal_strings(),
            pub_key: [
                signature_limbs.public_key_x.to_decimal_strings(),
                signature_limbs.public_key_y.to_decimal_strings(),
            ],
            r: signature_limbs.r.to_decimal_strings(),
            s: signature_limbs.s.to_decimal_strings(),
        })
    }

    fn check_path<D: Digest>(&self, path: &MerklePath<D>) -> StdResult<()> {
        if path.path_elements.len() != path.path_indices.len() {
            return Err(anyhow!(WitnessAssemblyError::PathIndicesMismatch {
                elements: path.path_elements.len(),
                indices: path.path_indices.len(),
            }));
        }
        if path.path_elements.len() != self.parameters.tree_height {
            return Err(anyhow!(WitnessAssemblyError::PathLengthMismatch {
                expected_height: self.parameters.tree_height,
                actual: path.path_elements.len(),
            }));
        }

        Ok(())
    }

    fn check_limbs(&self, field: &'static str, limbs: &LimbEncoding) -> StdResult<()> {
        if limbs.limb_count() != self.parameters.limb_count
            || limbs.limb_width() != self.parameters.limb_width
        {
            return Err(anyhow!(WitnessAssemblyError::LimbShapeMismatch {
                field,
                expected_count: self.parameters.limb_count,
                expected_width: self.parameters.limb_width,
                actual_count: limbs.limb_count(),
                actual_width: limbs.limb_width(),
            }));
        }

        Ok(())
    }
}

fn hash_to_decimal(hash: &[u8]) -> String {
    BigUint::from_bytes_be(hash).to_str_radix(10)
}

#[cfg(test)]
mod tests {
    use crate::MerkleHasher;

    use super::*;

    fn parameters() -> WitnessParameters {
        WitnessParameters {
            tree_height: 1,
            ..WitnessParameters::default()
        }
    }

    fn limbs_of(value: BigUint) -> LimbEncoding {
        LimbEncoding::from_biguint(&value, 4, 64).unwrap()
    }

    fn signature_limbs() -> SignatureLimbs {
        SignatureLimbs {
            message_hash: limbs_of(BigUint::from(1u32)),
            public_key_x: limbs_of(BigUint::from(1u32) << 64u32),
            public_key_y: limbs_of(BigUint::from(3u32)),
            r: limbs_of(BigUint::from(4u32)),
            s: limbs_of(BigUint::from(u64::MAX)),
        }
    }

    fn path(elements: Vec<Vec<u8>>, indices: Vec<u8>) -> MerklePath<MerkleHasher> {
        MerklePath::new(elements, indices)
    }

    fn root() -> Vec<u8> {
        let mut root = vec![0u8; 32];
        root[30] = 1;
        root
    }

    fn assert_assembly_error(result: StdResult<Witness>, expected: WitnessAssemblyError) {
        let error = result.expect_err("Assembly should fail");
        assert_eq!(Some(&expected), error.downcast_ref::<WitnessAssemblyError>());
    }

    #[test]
    fn assemble_renders_every_value_in_decimal() {
        let witness = WitnessAssembler::new(&parameters())
            .assemble(&root(), &path(vec![vec![0u8; 32]], vec![1]), &signature_limbs())
            .unwrap();

        assert_eq!("256", witness.root());
        assert_eq!(&["0"], witness.path_elements());
        assert_eq!(&["1"], witness.path_indices());
        assert_eq!(&["1", "0", "0", "0"], witness.msg_hash());
        assert_eq!(&["0", "1", "0", "0"], witness.pub_key()[0].as_slice());
        assert_eq!(&["18446744073709551615", "0", "0", "0"], witness.s());
    }

    #[test]
    fn decimal_rendering_has_no_leading_zeros() {
        let mut element = vec![0u8; 32];
        element[31] = 0x0a;

        let witness = WitnessAssembler::new(&parameters())
            .assemble(&root(), &path(vec![element], vec![0]), &signature_limbs())
            .unwrap();

        assert_eq!(&["10"], witness.path_elements());
        assert_eq!(&["0"], witness.path_indices());
    }

    #[test]
    fn reject_path_shorter_than_tree_height() {
        let assembler = WitnessAssembler::new(&WitnessParameters {
            tree_height: 2,
            ..parameters()
        });

        assert_assembly_error(
            assembler.assemble(&root(), &path(vec![vec![0u8; 32]], vec![0]), &signature_limbs()),
            WitnessAssemblyError::PathLengthMismatch {
                expected_height: 2,
                actual: 1,
            },
        );
    }

    #[test]
    fn reject_path_with_missing_indices() {
        assert_assembly_error(
            WitnessAssembler::new(&parameters()).assemble(
                &root(),
                &path(vec![vec![0u8; 32]], vec![]),
                &signature_limbs(),
            ),
            WitnessAssemblyError::PathIndicesMismatch {
                elements: 1,
                indices: 0,
            },
        );
    }

    #[test]
    fn reject_limbs_of_another_shape() {
        let mut signature_limbs = signature_limbs();
        signature_limbs.r = LimbEncoding::from_biguint(&BigUint::from(4u32), 6, 43).unwrap();

        assert_assembly_error(
            WitnessAssembler::new(&parameters()).assemble(
                &root(),
                &path(vec![vec![0u8; 32]], vec![0]),
                &signature_limbs,
            ),
            WitnessAssemblyError::LimbShapeMismatch {
                field: "r",
                expected_count: 4,
                expected_width: 64,
                actual_count: 6,
                actual_width: 43,
            },
        );
    }

    mod golden_json {
        use super::*;

        const GOLDEN_JSON: &str = r#"{"root":"256","pathElements":["0"],"pathIndices":["1"],"msgHash":["1","0","0","0"],"pubKey":[["0","1","0","0"],["3","0","0","0"]],"r":["4","0","0","0"],"s":["18446744073709551615","0","0","0"]}"#;

        fn golden_value() -> Witness {
            WitnessAssembler::new(&parameters())
                .assemble(&root(), &path(vec![vec![0u8; 32]], vec![1]), &signature_limbs())
                .unwrap()
        }

        #[test]
        fn golden_serialization() {
            let serialized = serde_json::to_string(&golden_value())
                .expect("This JSON serialization should not fail");

            assert_eq!(GOLDEN_JSON, serialized);
        }
    }
}

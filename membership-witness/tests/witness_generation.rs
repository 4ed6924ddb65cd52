use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use light_poseidon::{Poseidon, PoseidonHasher};
use num_bigint::BigUint;
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use sha3::{Digest, Keccak256};

use membership_witness::{
    Address, LimbEncoding, MerkleHasher, MerkleTree, MerkleTreeError, PrivateKey,
    SignatureEngine, WitnessGenerator, WitnessParameters,
};

const SIGNER_PRIVATE_KEY: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000001";

fn parameters() -> WitnessParameters {
    WitnessParameters {
        tree_height: 4,
        ..WitnessParameters::default()
    }
}

fn generator() -> WitnessGenerator {
    let logger = slog::Logger::root(slog::Discard, slog::o!());

    WitnessGenerator::new(parameters(), logger).unwrap()
}

fn participants() -> Vec<Address> {
    let mut rng = ChaCha20Rng::from_seed([0u8; 32]);
    let mut participants: Vec<Address> = (0..9)
        .map(|_| Address::from_public_key(&PrivateKey::generate(&mut rng).public_key()))
        .collect();
    participants.insert(
        5,
        "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
            .parse()
            .unwrap(),
    );

    participants
}

fn message_hash() -> [u8; 32] {
    Keccak256::digest(b"I am a member").into()
}

fn decimal(value: &str) -> BigUint {
    BigUint::parse_bytes(value.as_bytes(), 10).unwrap()
}

fn circom_poseidon(inputs: &[BigUint]) -> BigUint {
    let elements: Vec<Fr> = inputs
        .iter()
        .map(|input| Fr::from_be_bytes_mod_order(&input.to_bytes_be()))
        .collect();
    let hash = Poseidon::<Fr>::new_circom(elements.len())
        .unwrap()
        .hash(&elements)
        .unwrap();

    BigUint::from_bytes_be(&hash.into_bigint().to_bytes_be())
}

fn bn254_modulus() -> BigUint {
    BigUint::from_bytes_be(&Fr::MODULUS.to_bytes_be())
}

#[test]
fn test_witness_path_replays_to_the_participants_root() {
    let signer = PrivateKey::from_hex(SIGNER_PRIVATE_KEY).unwrap();
    let participants = participants();

    let witness = generator()
        .generate(&signer.to_bytes(), &participants, &message_hash())
        .unwrap();

    let signer_address = Address::from_public_key(&signer.public_key());
    let mut node = circom_poseidon(&[BigUint::from_bytes_be(signer_address.as_bytes())]);
    for (element, index) in witness.path_elements().iter().zip(witness.path_indices()) {
        let sibling = decimal(element);
        node = match index.as_str() {
            "0" => circom_poseidon(&[node, sibling]),
            "1" => circom_poseidon(&[sibling, node]),
            other => panic!("Unexpected path index '{other}'"),
        };
    }

    let tree = MerkleTree::<MerkleHasher, Address>::new(4, &participants).unwrap();
    assert_eq!(decimal(witness.root()), node);
    assert_eq!(BigUint::from_bytes_be(tree.root()), node);
    // Position 5 in binary, least significant bit first.
    assert_eq!(&["1", "0", "1", "0"], witness.path_indices());
}

#[test]
fn test_witness_limbs_match_the_signature_engine() {
    let signer = PrivateKey::from_hex(SIGNER_PRIVATE_KEY).unwrap();
    let engine = SignatureEngine::new(&parameters());

    let witness = generator()
        .generate(&signer.to_bytes(), &participants(), &message_hash())
        .unwrap();

    let signature = engine.sign(&message_hash(), &signer).unwrap();
    let limbs = engine
        .decompose(&message_hash(), &signer.public_key(), &signature)
        .unwrap();
    assert_eq!(limbs.r.to_decimal_strings(), witness.r());
    assert_eq!(limbs.s.to_decimal_strings(), witness.s());
    assert_eq!(limbs.message_hash.to_decimal_strings(), witness.msg_hash());

    let recomposed_x: Vec<u64> = witness.pub_key()[0]
        .iter()
        .map(|limb| limb.parse().unwrap())
        .collect();
    let x = LimbEncoding::from_biguint(
        &BigUint::from_bytes_be(&signer.public_key().x()),
        4,
        64,
    )
    .unwrap();
    assert_eq!(x.limbs(), recomposed_x.as_slice());
}

#[test]
fn test_witness_json_has_circuit_field_names() {
    let signer = PrivateKey::from_hex(SIGNER_PRIVATE_KEY).unwrap();

    let witness = generator()
        .generate(&signer.to_bytes(), &participants(), &message_hash())
        .unwrap();
    let json = serde_json::to_value(&witness).unwrap();

    let object = json.as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        vec!["msgHash", "pathElements", "pathIndices", "pubKey", "r", "root", "s"],
        keys
    );
    assert_eq!(2, object["pubKey"].as_array().unwrap().len());
    assert!(object["root"].as_str().unwrap().chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn test_witness_hashes_are_canonical_field_elements() {
    let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
    let signers: Vec<PrivateKey> = (0..16).map(|_| PrivateKey::generate(&mut rng)).collect();
    let participants: Vec<Address> = signers
        .iter()
        .map(|signer| Address::from_public_key(&signer.public_key()))
        .collect();
    let generator = generator();

    for signer in &signers {
        let witness = generator
            .generate(&signer.to_bytes(), &participants, &message_hash())
            .unwrap();

        assert!(decimal(witness.root()) < bn254_modulus());
        for element in witness.path_elements() {
            assert!(decimal(element) < bn254_modulus());
        }
    }
}

#[test]
fn test_non_member_signer_is_rejected() {
    let outsider = PrivateKey::from_hex(
        "0x0000000000000000000000000000000000000000000000000000000000000002",
    )
    .unwrap();

    let error = generator()
        .generate(&outsider.to_bytes(), &participants(), &message_hash())
        .expect_err("Generation should fail");

    assert_eq!(
        Some(&MerkleTreeError::LeafNotFound),
        error.downcast_ref::<MerkleTreeError>()
    );
}

#[tokio::test]
async fn test_async_generation_produces_the_same_witness() {
    let signer = PrivateKey::from_hex(SIGNER_PRIVATE_KEY).unwrap();
    let participants = participants();
    let generator = generator();

    let async_witness = generator
        .generate_async(&signer.to_bytes(), &participants, &message_hash())
        .await
        .unwrap();

    assert_eq!(
        generator
            .generate(&signer.to_bytes(), &participants, &message_hash())
            .unwrap(),
        async_witness
    );
}

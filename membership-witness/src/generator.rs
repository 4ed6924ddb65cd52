//! ## Witness Generator
//!
//! Builds the complete witness of a signer:
//! * validates the private key and the derived public key,
//! * checks that the signer address belongs to the participants,
//! * builds the participants tree while the message hash is signed,
//! * merges the inclusion path and the signature limbs in a [Witness].

use std::marker::PhantomData;

use anyhow::{Context, anyhow};
use digest::{Digest, FixedOutput};
use slog::{Logger, debug, info};

use crate::{
    Address, LoggerExtensions, MerkleHasher, MerkleTree, MerkleTreeError, PrivateKey, PublicKey,
    SignatureEngine, SignatureLimbs, StdResult, Witness, WitnessAssembler, WitnessParameters,
    validate_private_key, validate_public_key,
};

/// Generates circuit witnesses for a fixed circuit shape, hashing the participants tree
/// with `D`.
pub struct WitnessGenerator<D = MerkleHasher> {
    parameters: WitnessParameters,
    signature_engine: SignatureEngine,
    assembler: WitnessAssembler,
    logger: Logger,
    hasher: PhantomData<D>,
}

impl<D> WitnessGenerator<D>
where
    D: Digest + FixedOutput + Send + Sync + 'static,
{
    /// Create a generator, failing if the parameters are not valid.
    pub fn new(parameters: WitnessParameters, logger: Logger) -> StdResult<Self> {
        parameters
            .validate()
            .with_context(|| "Witness generator can not be created")?;

        Ok(Self {
            parameters,
            signature_engine: SignatureEngine::new(&parameters),
            assembler: WitnessAssembler::new(&parameters),
            logger: logger.new_with_component_name::<Self>(),
            hasher: PhantomData,
        })
    }

    /// Parameters of the generated witnesses.
    pub fn parameters(&self) -> &WitnessParameters {
        &self.parameters
    }

    /// Generate the witness proving that the owner of `private_key`, one of `participants`,
    /// signed `message_hash`.
    ///
    /// The participants tree is built on the rayon thread pool while the message is signed.
    pub fn generate(
        &self,
        private_key: &[u8],
        participants: &[Address],
        message_hash: &[u8],
    ) -> StdResult<Witness> {
        let (private_key, public_key, address) = self.prepare_signer(private_key, participants)?;

        let (tree, signature_limbs) = rayon::join(
            || self.build_tree(participants),
            || self.sign_statement(message_hash, &private_key, &public_key),
        );

        self.assemble(&tree?, &signature_limbs?, &address)
    }

    /// Same as [Self::generate], building the tree and signing in two blocking tasks of the
    /// tokio runtime.
    pub async fn generate_async(
        &self,
        private_key: &[u8],
        participants: &[Address],
        message_hash: &[u8],
    ) -> StdResult<Witness> {
        let (private_key, public_key, address) = self.prepare_signer(private_key, participants)?;

        let tree_task = {
            let (height, participants) = (self.parameters.tree_height, participants.to_vec());
            tokio::task::spawn_blocking(move || {
                MerkleTree::<D, Address>::new(height, &participants)
            })
        };
        let signature_task = {
            let signature_engine = self.signature_engine;
            let logger = self.logger.clone();
            let message_hash = message_hash.to_vec();
            tokio::task::spawn_blocking(move || {
                sign_statement(
                    &signature_engine,
                    &logger,
                    &message_hash,
                    &private_key,
                    &public_key,
                )
            })
        };

        let (tree, signature_limbs) = tokio::try_join!(tree_task, signature_task)
            .with_context(|| "Witness generation task crashed")?;
        let tree = tree.with_context(|| "Participants tree can not be built")?;

        self.assemble(&tree, &signature_limbs?, &address)
    }

    fn prepare_signer(
        &self,
        private_key: &[u8],
        participants: &[Address],
    ) -> StdResult<(PrivateKey, PublicKey, Address)> {
        debug!(self.logger, ">> prepare_signer"; "participants" => participants.len());
        let private_key = validate_private_key(private_key)
            .with_context(|| "Witness generator received an invalid private key")?;
        let public_key = validate_public_key(
            &self.signature_engine.derive_public_key(&private_key).to_raw_bytes(),
        )
        .with_context(|| "Witness generator derived an invalid public key")?;
        let address = Address::from_public_key(&public_key);

        if !participants.contains(&address) {
            return Err(anyhow!(MerkleTreeError::LeafNotFound)).with_context(|| {
                format!("Signer address '{address}' is not part of the participants")
            });
        }

        Ok((private_key, public_key, address))
    }

    fn build_tree(&self, participants: &[Address]) -> StdResult<MerkleTree<D, Address>> {
        MerkleTree::new(self.parameters.tree_height, participants)
            .with_context(|| "Participants tree can not be built")
    }

    fn sign_statement(
        &self,
        message_hash: &[u8],
        private_key: &PrivateKey,
        public_key: &PublicKey,
    ) -> StdResult<SignatureLimbs> {
        sign_statement(
            &self.signature_engine,
            &self.logger,
            message_hash,
            private_key,
            public_key,
        )
    }

    fn assemble(
        &self,
        tree: &MerkleTree<D, Address>,
        signature_limbs: &SignatureLimbs,
        address: &Address,
    ) -> StdResult<Witness> {
        let path = tree
            .compute_merkle_tree_path_for_leaf(address)
            .with_context(|| format!("No inclusion path for signer address '{address}'"))?;
        let witness = self.assembler.assemble(tree.root(), &path, signature_limbs)?;

        info!(
            self.logger, "Witness generated";
            "signer" => %address,
            "participants" => tree.number_of_leaves(),
            "root" => witness.root()
        );

        Ok(witness)
    }
}

fn sign_statement(
    signature_engine: &SignatureEngine,
    logger: &Logger,
    message_hash: &[u8],
    private_key: &PrivateKey,
    public_key: &PublicKey,
) -> StdResult<SignatureLimbs> {
    let signature = signature_engine
        .sign(message_hash, private_key)
        .with_context(|| "Witness generator can not sign the message hash")?;
    signature.verify(message_hash, public_key)?;
    debug!(
        logger, "Message hash signed";
        "r" => hex::encode(signature.r()), "s" => hex::encode(signature.s())
    );

    signature_engine.decompose(message_hash, public_key, &signature)
}

//! Crate specific errors

/// Errors raised while validating private or public key material.
#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum KeyValidationError {
    /// The key is malformed or outside of the curve constraints.
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Errors raised by the signature engine.
#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum SigningError {
    /// The message hash does not have the expected length.
    #[error("Malformed message hash: expected {expected} bytes, got {actual}")]
    MalformedMessageHash { expected: usize, actual: usize },

    /// The underlying ECDSA implementation refused to sign.
    #[error("ECDSA signing failed: {0}")]
    SignatureFailed(String),
}

/// Errors raised while splitting integers into limbs.
#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum LimbEncodingError {
    /// The value needs more bits than the limbs can hold.
    #[error(
        "Value of {value_bits} bits does not fit in {limb_count} limbs of {limb_width} bits"
    )]
    EncodingOverflow {
        value_bits: u64,
        limb_count: usize,
        limb_width: u32,
    },

    /// The requested limb layout cannot be represented.
    #[error("Invalid limb shape: {limb_count} limbs of {limb_width} bits")]
    InvalidLimbShape { limb_count: usize, limb_width: u32 },
}

/// Errors raised when the components of a witness do not agree on their shapes.
#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum WitnessAssemblyError {
    /// Merkle path length does not match the configured tree height.
    #[error("Merkle path length mismatch: expected height {expected_height}, got {actual}")]
    PathLengthMismatch {
        expected_height: usize,
        actual: usize,
    },

    /// Merkle path elements and indices have different lengths.
    #[error("Merkle path has {elements} elements but {indices} indices")]
    PathIndicesMismatch { elements: usize, indices: usize },

    /// A limb encoding does not have the configured number of limbs or limb width.
    #[error(
        "Limb encoding of '{field}' mismatch: expected {expected_count} limbs of {expected_width} bits, got {actual_count} limbs of {actual_width} bits"
    )]
    LimbShapeMismatch {
        field: &'static str,
        expected_count: usize,
        expected_width: u32,
        actual_count: usize,
        actual_width: u32,
    },
}

/// Errors raised when parsing an address.
#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum AddressError {
    /// The string is not a 20 bytes hexadecimal value.
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),
}

/// Errors raised when validating the witness parameters.
#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum ParametersError {
    /// One of the parameters is out of its allowed range.
    #[error("Invalid witness parameters: {0}")]
    InvalidParameters(String),
}

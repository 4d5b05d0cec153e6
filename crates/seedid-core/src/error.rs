//! Error taxonomy
//!
//! Two families, mirroring where a failure comes from:
//!
//! - [`ValidationError`]: the caller handed us something unusable. Always
//!   raised before any cryptographic primitive runs.
//! - [`ComputationError`]: a primitive itself rejected its input (e.g. a
//!   public key that does not decompress).
//!
//! Derivation is deterministic, so nothing here is retryable. Messages never
//! carry passphrases or key material.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Passphrase is empty after normalization")]
    EmptyPassphrase,
    #[error("{what} must be exactly {expected} bytes, got {actual}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid child index: {0}")]
    InvalidIndex(String),
    #[error("Unsupported chain: {0}")]
    UnsupportedChain(String),
    #[error("Unsupported curve: {0}")]
    UnsupportedCurve(String),
    #[error("Unsupported key derivation algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("Invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("HKDF output length must be between 1 and {max} bytes, got {requested}")]
    HkdfLength { requested: usize, max: usize },
    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),
    #[error("Ed25519 derivation requires every path segment to be hardened, got '{0}'")]
    NonHardenedSegment(String),
    #[error("Unsupported address type: {0}")]
    UnsupportedAddressType(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComputationError {
    #[error("Key stretching failed: {0}")]
    KeyStretching(String),
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
}

#[derive(Error, Debug)]
pub enum SeedIdError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Computation(#[from] ComputationError),
}

impl SeedIdError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_computation(&self) -> bool {
        matches!(self, Self::Computation(_))
    }
}

pub type Result<T, E = SeedIdError> = std::result::Result<T, E>;

//! Master key derivation
//!
//! Stretches a normalized passphrase into the master secret every other key
//! hangs off. Argon2id (v0x13) is the only production algorithm.
//!
//! # Security Notes
//!
//! - Memory-hard: the default 256 MiB per guess prices out GPU farms
//! - The default salt is 16 zero bytes, so the passphrase alone regenerates
//!   the identity; a per-user salt trades that for precomputation resistance
//! - Nothing is cached: the same inputs are stretched again on every call

use std::fmt;

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroizing;

use crate::config::{KdfAlgorithm, MasterKeyConfig};
use crate::error::{ComputationError, Result, ValidationError};
use crate::passphrase::normalize;

/// Length every namespace helper expects the master key to have.
pub const MASTER_KEY_LEN: usize = 32;

/// Output of [`derive_master_key`]. Zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterKey(Zeroizing<Vec<u8>>);

impl MasterKey {
    /// Wrap bytes produced elsewhere (another implementation, a test fixture).
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MasterKey([REDACTED; {} bytes])", self.0.len())
    }
}

/// Derive the master key for a passphrase.
///
/// The passphrase goes through [`normalize`] first; passing text that is
/// already normalized is fine since normalization is idempotent.
///
/// # Errors
/// - [`ValidationError`] for an empty passphrase, an out-of-range parameter
///   or a disabled algorithm. Raised before any hashing starts.
/// - [`ComputationError::KeyStretching`] if the primitive itself fails.
///
/// # Resource usage
/// Each call allocates `config.memory_cost_kib` KiB for its whole duration
/// (256 MiB with the defaults) and keeps `config.parallelism` lanes busy.
/// Nothing here limits concurrency: a service that derives on behalf of
/// many requests has to bound the number of calls in flight itself, for
/// example with a semaphore sized to available memory.
///
/// # Example
/// ```no_run
/// use seedid_core::{derive_master_key, MasterKeyConfig};
/// let master = derive_master_key("correct horse battery staple", &MasterKeyConfig::default())?;
/// assert_eq!(master.len(), 32);
/// # Ok::<(), seedid_core::SeedIdError>(())
/// ```
pub fn derive_master_key(passphrase: &str, config: &MasterKeyConfig) -> Result<MasterKey> {
    let normalized = Zeroizing::new(normalize(passphrase)?);
    config.validate()?;

    match config.algorithm {
        KdfAlgorithm::Argon2id => stretch_argon2id(normalized.as_bytes(), config),
        KdfAlgorithm::Scrypt => stretch_scrypt(normalized.as_bytes(), config),
    }
}

fn stretch_argon2id(password: &[u8], config: &MasterKeyConfig) -> Result<MasterKey> {
    let params = Params::new(
        config.memory_cost_kib,
        config.time_cost,
        config.parallelism,
        Some(config.hash_len),
    )
    .map_err(|e| ValidationError::InvalidParameter {
        name: "argon2 parameters",
        reason: e.to_string(),
    })?;

    log::debug!(
        "deriving master key: argon2id m={} KiB t={} p={} len={} salt_len={}",
        config.memory_cost_kib,
        config.time_cost,
        config.parallelism,
        config.hash_len,
        config.salt.len()
    );

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new(vec![0u8; config.hash_len]);
    argon2
        .hash_password_into(password, &config.salt, &mut key)
        .map_err(|e| ComputationError::KeyStretching(e.to_string()))?;

    Ok(MasterKey(key))
}

/// log2(N) for the test-only scrypt path
#[cfg(feature = "insecure-scrypt")]
const SCRYPT_LOG_N: u8 = 15;
#[cfg(feature = "insecure-scrypt")]
const SCRYPT_R: u32 = 8;

#[cfg(feature = "insecure-scrypt")]
fn stretch_scrypt(password: &[u8], config: &MasterKeyConfig) -> Result<MasterKey> {
    let params = scrypt::Params::new(SCRYPT_LOG_N, SCRYPT_R, config.parallelism, config.hash_len)
        .map_err(|e| ValidationError::InvalidParameter {
            name: "scrypt parameters",
            reason: e.to_string(),
        })?;

    log::warn!("deriving master key with scrypt; keys from this path are for local testing only");

    let mut key = Zeroizing::new(vec![0u8; config.hash_len]);
    scrypt::scrypt(password, &config.salt, &params, &mut key)
        .map_err(|e| ComputationError::KeyStretching(e.to_string()))?;

    Ok(MasterKey(key))
}

#[cfg(not(feature = "insecure-scrypt"))]
fn stretch_scrypt(_password: &[u8], _config: &MasterKeyConfig) -> Result<MasterKey> {
    Err(ValidationError::UnsupportedAlgorithm(
        "scrypt is disabled (local testing only, enable the insecure-scrypt feature)".to_string(),
    )
    .into())
}

//! Master-key stretching parameters: TOML file + environment overrides.
//!
//! Priority: environment variables > config file > defaults.
//!
//! Changing any of these values changes every key derived from a passphrase.
//! A deployment picks them once and never touches them again.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationError;

/// 256 MiB
pub const DEFAULT_MEMORY_COST_KIB: u32 = 262_144;
pub const DEFAULT_TIME_COST: u32 = 5;
pub const DEFAULT_PARALLELISM: u32 = 2;
pub const DEFAULT_HASH_LEN: usize = 32;
pub const DEFAULT_SALT_LEN: usize = 16;

/// Argon2 refuses salts shorter than this.
pub const MIN_SALT_LEN: usize = 8;
/// Argon2 refuses outputs shorter than this.
pub const MIN_HASH_LEN: usize = 4;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Memory-hard function used to stretch the passphrase
///
/// Deserialization goes through [`FromStr`], so TOML accepts any casing
/// just like the environment override does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum KdfAlgorithm {
    #[default]
    Argon2id,
    /// Only usable with the `insecure-scrypt` feature. Local testing only.
    Scrypt,
}

impl KdfAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Argon2id => "argon2id",
            Self::Scrypt => "scrypt",
        }
    }
}

impl fmt::Display for KdfAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KdfAlgorithm {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "argon2id" => Ok(Self::Argon2id),
            "scrypt" => Ok(Self::Scrypt),
            other => Err(ValidationError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

impl TryFrom<String> for KdfAlgorithm {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Parameters for [`derive_master_key`](crate::master::derive_master_key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterKeyConfig {
    #[serde(default)]
    pub algorithm: KdfAlgorithm,

    /// Memory cost in KiB (default: 256 MiB)
    #[serde(default = "default_memory_cost_kib")]
    pub memory_cost_kib: u32,

    /// Number of passes (default: 5)
    #[serde(default = "default_time_cost")]
    pub time_cost: u32,

    /// Lanes (default: 2)
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,

    /// Output length in bytes (default: 32)
    #[serde(default = "default_hash_len")]
    pub hash_len: usize,

    /// Salt, hex-encoded in TOML (default: 16 zero bytes)
    #[serde(default = "default_salt", with = "hex::serde")]
    pub salt: Vec<u8>,
}

impl Default for MasterKeyConfig {
    fn default() -> Self {
        Self {
            algorithm: KdfAlgorithm::default(),
            memory_cost_kib: default_memory_cost_kib(),
            time_cost: default_time_cost(),
            parallelism: default_parallelism(),
            hash_len: default_hash_len(),
            salt: default_salt(),
        }
    }
}

// ============================================================================
// Default value functions
// ============================================================================

fn default_memory_cost_kib() -> u32 {
    DEFAULT_MEMORY_COST_KIB
}

fn default_time_cost() -> u32 {
    DEFAULT_TIME_COST
}

fn default_parallelism() -> u32 {
    DEFAULT_PARALLELISM
}

fn default_hash_len() -> usize {
    DEFAULT_HASH_LEN
}

fn default_salt() -> Vec<u8> {
    vec![0u8; DEFAULT_SALT_LEN]
}

// ============================================================================
// Loading & environment override
// ============================================================================

impl MasterKeyConfig {
    /// Default parameters with a per-user salt.
    ///
    /// A salt defeats precomputed tables but must then be kept (or be
    /// regenerable) next to the passphrase.
    pub fn with_salt(salt: impl Into<Vec<u8>>) -> Self {
        Self {
            salt: salt.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// File, then environment overrides, then validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `SEEDID_KDF_ALGORITHM`
    /// - `SEEDID_KDF_MEMORY_KIB`
    /// - `SEEDID_KDF_TIME_COST`
    /// - `SEEDID_KDF_PARALLELISM`
    /// - `SEEDID_KDF_HASH_LEN`
    /// - `SEEDID_KDF_SALT` (hex)
    ///
    /// Values that fail to parse are skipped with a warning.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SEEDID_KDF_ALGORITHM") {
            match v.parse() {
                Ok(algorithm) => self.algorithm = algorithm,
                Err(e) => log::warn!("ignoring SEEDID_KDF_ALGORITHM: {}", e),
            }
        }
        if let Some(v) = env_number("SEEDID_KDF_MEMORY_KIB") {
            self.memory_cost_kib = v;
        }
        if let Some(v) = env_number("SEEDID_KDF_TIME_COST") {
            self.time_cost = v;
        }
        if let Some(v) = env_number("SEEDID_KDF_PARALLELISM") {
            self.parallelism = v;
        }
        if let Some(v) = env_number("SEEDID_KDF_HASH_LEN") {
            self.hash_len = v;
        }
        if let Ok(v) = std::env::var("SEEDID_KDF_SALT") {
            match hex::decode(v.trim()) {
                Ok(salt) => self.salt = salt,
                // Never echo the value.
                Err(_) => log::warn!("ignoring SEEDID_KDF_SALT: not valid hex"),
            }
        }
    }

    /// Check every parameter before the stretching function sees it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.memory_cost_kib == 0 {
            return Err(positive("memory_cost_kib"));
        }
        if self.time_cost == 0 {
            return Err(positive("time_cost"));
        }
        if self.parallelism == 0 {
            return Err(positive("parallelism"));
        }
        if self.hash_len == 0 {
            return Err(positive("hash_len"));
        }
        if self.hash_len < MIN_HASH_LEN {
            return Err(ValidationError::InvalidParameter {
                name: "hash_len",
                reason: format!("must be at least {} bytes", MIN_HASH_LEN),
            });
        }
        if self.salt.len() < MIN_SALT_LEN {
            return Err(ValidationError::InvalidParameter {
                name: "salt",
                reason: format!(
                    "must be at least {} bytes, got {}",
                    MIN_SALT_LEN,
                    self.salt.len()
                ),
            });
        }
        if self.algorithm == KdfAlgorithm::Argon2id
            && u64::from(self.memory_cost_kib) < 8 * u64::from(self.parallelism)
        {
            return Err(ValidationError::InvalidParameter {
                name: "memory_cost_kib",
                reason: "must be at least 8 KiB per lane".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str) -> ValidationError {
    ValidationError::InvalidParameter {
        name,
        reason: "must be a positive integer".to_string(),
    }
}

fn env_number<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring {}: not a non-negative integer", name);
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

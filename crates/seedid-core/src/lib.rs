//! SeedID Core
//!
//! Deterministic derivation of identity and wallet keys from one passphrase.
//!
//! # Pipeline
//!
//! ```text
//! passphrase ──normalize──► Argon2id ──► master key (32 bytes)
//!                                            │
//!                               HKDF-SHA256, one label per namespace
//!                                            │
//!         ┌──────────┬───────────────┬───────┴──────┬────────────┬────────────┐
//!     nostr:key  did:key:ed25519  did:key:secp256k1 wallet:eth  wallet:btc  wallet:sol
//!                                                 BIP-32       BIP-32      SLIP-10
//! ```
//!
//! Nothing is stored: the same passphrase and parameters always yield the
//! same keys. Every secret type zeroes itself on drop and redacts itself in
//! `Debug` output.
//!
//! # Example
//!
//! ```no_run
//! use seedid_core::{derive_address, derive_master_key, for_wallet, Chain, MasterKeyConfig};
//!
//! let config = MasterKeyConfig::default();
//! let master = derive_master_key("correct horse battery staple ...", &config)?;
//! let root = for_wallet(&master, Chain::Eth)?;
//! let account = derive_address(Chain::Eth, &root, 0)?;
//! println!("{}", account.address);
//! # Ok::<(), seedid_core::SeedIdError>(())
//! ```

pub mod address;
pub mod chain;
pub mod config;
pub mod error;
pub mod hkdf;
pub mod identity;
pub mod master;
pub mod memory;
pub mod namespace;
pub mod passphrase;
pub mod path;

pub use chain::{derive_address, derive_signing_key, Chain, SigningKey, WalletAccount};
pub use config::{ConfigError, KdfAlgorithm, MasterKeyConfig};
pub use error::{ComputationError, Result, SeedIdError, ValidationError};
pub use crate::hkdf::hkdf;
pub use identity::{derive_did_key, derive_nostr_keys, DidKey};
pub use master::{derive_master_key, MasterKey};
pub use memory::zeroize;
pub use namespace::{for_did_key, for_nostr, for_wallet, DidCurve, Namespace, NamespaceRoot};
pub use passphrase::{assess_passphrase, normalize, PassphraseAnalysis, PassphraseStrength};
pub use path::{ChildIndex, HardenedPath};

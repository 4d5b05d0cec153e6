//! Namespace registry
//!
//! Every purpose gets its own 32-byte root, derived from the master key with
//! HKDF under a fixed label. Roots for different labels are unlinkable: none
//! can be computed from another without the master key.
//!
//! # Labels
//!
//! | Namespace         | Label                          |
//! |-------------------|--------------------------------|
//! | Nostr identity    | `seedid/v1/nostr:key`          |
//! | did:key (Ed25519) | `seedid/v1/did:key:ed25519`    |
//! | did:key (secp256k1)| `seedid/v1/did:key:secp256k1` |
//! | Ethereum wallet   | `seedid/v1/wallet:eth`         |
//! | Bitcoin wallet    | `seedid/v1/wallet:btc`         |
//! | Solana wallet     | `seedid/v1/wallet:sol`         |
//!
//! A published label never changes meaning. New purposes get new labels;
//! a semantic change gets a new version prefix.

use std::fmt;
use std::str::FromStr;

use crate::chain::Chain;
use crate::error::{Result, ValidationError};
use crate::hkdf::{hkdf, DEFAULT_SALT};
use crate::master::{MasterKey, MASTER_KEY_LEN};
use crate::memory::SecretBytes;

/// Prefix shared by every label in this version of the registry
pub const LABEL_PREFIX: &str = "seedid/v1/";

pub const NAMESPACE_ROOT_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    NostrKey,
    DidKeyEd25519,
    DidKeySecp256k1,
    WalletEth,
    WalletBtc,
    WalletSol,
}

impl Namespace {
    pub const ALL: [Namespace; 6] = [
        Self::NostrKey,
        Self::DidKeyEd25519,
        Self::DidKeySecp256k1,
        Self::WalletEth,
        Self::WalletBtc,
        Self::WalletSol,
    ];

    /// Full HKDF info label
    pub const fn label(self) -> &'static str {
        match self {
            Self::NostrKey => "seedid/v1/nostr:key",
            Self::DidKeyEd25519 => "seedid/v1/did:key:ed25519",
            Self::DidKeySecp256k1 => "seedid/v1/did:key:secp256k1",
            Self::WalletEth => "seedid/v1/wallet:eth",
            Self::WalletBtc => "seedid/v1/wallet:btc",
            Self::WalletSol => "seedid/v1/wallet:sol",
        }
    }

    /// Label without the version prefix, e.g. `wallet:eth`
    pub fn purpose(self) -> &'static str {
        &self.label()[LABEL_PREFIX.len()..]
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Curve selector for `did:key` namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DidCurve {
    Ed25519,
    Secp256k1,
}

impl DidCurve {
    pub fn namespace(self) -> Namespace {
        match self {
            Self::Ed25519 => Namespace::DidKeyEd25519,
            Self::Secp256k1 => Namespace::DidKeySecp256k1,
        }
    }
}

impl FromStr for DidCurve {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ed25519" => Ok(Self::Ed25519),
            "secp256k1" => Ok(Self::Secp256k1),
            other => Err(ValidationError::UnsupportedCurve(other.to_string())),
        }
    }
}

/// 32-byte root for one namespace. Zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct NamespaceRoot(SecretBytes<NAMESPACE_ROOT_LEN>);

impl NamespaceRoot {
    /// Move `bytes` into a root; the source array is zeroed.
    pub fn new(bytes: &mut [u8; NAMESPACE_ROOT_LEN]) -> Self {
        Self(SecretBytes::new(bytes))
    }

    /// Accept a root produced elsewhere; anything but 32 bytes is refused.
    pub fn from_slice(bytes: &[u8]) -> std::result::Result<Self, ValidationError> {
        SecretBytes::from_slice(bytes)
            .map(Self)
            .ok_or(ValidationError::InvalidLength {
                what: "namespace root",
                expected: NAMESPACE_ROOT_LEN,
                actual: bytes.len(),
            })
    }

    pub fn as_bytes(&self) -> &[u8; NAMESPACE_ROOT_LEN] {
        self.0.expose()
    }
}

impl fmt::Debug for NamespaceRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NamespaceRoot([REDACTED])")
    }
}

/// Derive the root for any registered namespace.
pub fn derive_namespace_root(master: &MasterKey, namespace: Namespace) -> Result<NamespaceRoot> {
    if master.len() != MASTER_KEY_LEN {
        return Err(ValidationError::InvalidLength {
            what: "master key",
            expected: MASTER_KEY_LEN,
            actual: master.len(),
        }
        .into());
    }

    let okm = hkdf(
        master.as_bytes(),
        namespace.label(),
        Some(DEFAULT_SALT),
        NAMESPACE_ROOT_LEN,
    )?;
    log::debug!("derived namespace root for {}", namespace);

    let root = NamespaceRoot::from_slice(&okm)?;
    Ok(root)
}

pub fn for_nostr(master: &MasterKey) -> Result<NamespaceRoot> {
    derive_namespace_root(master, Namespace::NostrKey)
}

pub fn for_did_key(master: &MasterKey, curve: DidCurve) -> Result<NamespaceRoot> {
    derive_namespace_root(master, curve.namespace())
}

pub fn for_wallet(master: &MasterKey, chain: Chain) -> Result<NamespaceRoot> {
    derive_namespace_root(master, chain.namespace())
}

//! Chain derivation engine
//!
//! Turns a wallet namespace root into per-index accounts.
//!
//! | Chain | Curve     | Scheme  | Default path               |
//! |-------|-----------|---------|----------------------------|
//! | `eth` | secp256k1 | BIP-32  | `m/44'/60'/0'/0/{index}`   |
//! | `btc` | secp256k1 | BIP-32  | `m/84'/0'/0'/0/{index}`    |
//! | `sol` | Ed25519   | SLIP-10 | `m/44'/501'/{index}'/0'`   |
//!
//! The namespace root is used as the HD seed on every chain.

pub mod btc;
pub mod eth;
pub mod sol;

use std::fmt;
use std::str::FromStr;

use bitcoin::bip32::{DerivationPath, Xpriv};
use bitcoin::secp256k1::{PublicKey, Secp256k1};
use bitcoin::Network;
use serde::{Deserialize, Serialize};

use crate::error::{ComputationError, Result, ValidationError};
use crate::memory::SecretBytes;
use crate::namespace::{Namespace, NamespaceRoot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Eth,
    Btc,
    Sol,
}

impl Chain {
    pub const ALL: [Chain; 3] = [Self::Eth, Self::Btc, Self::Sol];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eth => "eth",
            Self::Btc => "btc",
            Self::Sol => "sol",
        }
    }

    /// Wallet namespace whose root feeds this chain
    pub fn namespace(&self) -> Namespace {
        match self {
            Self::Eth => Namespace::WalletEth,
            Self::Btc => Namespace::WalletBtc,
            Self::Sol => Namespace::WalletSol,
        }
    }

    /// Default derivation path for `index`, as text
    pub fn default_path(&self, index: u32) -> String {
        match self {
            Self::Eth => format!("{}/{}", eth::PATH_PREFIX, index),
            Self::Btc => format!("{}/{}", btc::PATH_PREFIX, index),
            Self::Sol => format!("m/44'/501'/{}'/0'", index),
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "eth" => Ok(Self::Eth),
            "btc" => Ok(Self::Btc),
            "sol" => Ok(Self::Sol),
            other => Err(ValidationError::UnsupportedChain(other.to_string())),
        }
    }
}

/// Shareable account description: no secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAccount {
    pub chain: Chain,
    pub path: String,
    pub address: String,
    /// Compressed secp256k1 point (33 bytes) or Ed25519 key (32 bytes)
    #[serde(with = "hex::serde")]
    pub public_key: Vec<u8>,
}

/// Account plus its private key.
///
/// The caller owns this value. The private key is zeroed on drop; call
/// [`wipe`](Self::wipe) as soon as signing is done, and never log or
/// transmit [`private_key`](Self::private_key).
#[derive(Clone)]
pub struct SigningKey {
    pub chain: Chain,
    pub path: String,
    pub address: String,
    pub public_key: Vec<u8>,
    private_key: SecretBytes<32>,
}

impl SigningKey {
    /// secp256k1 scalar or Ed25519 seed, 32 bytes
    pub fn private_key(&self) -> &[u8; 32] {
        self.private_key.expose()
    }

    /// The public half of this key
    pub fn account(&self) -> WalletAccount {
        WalletAccount {
            chain: self.chain,
            path: self.path.clone(),
            address: self.address.clone(),
            public_key: self.public_key.clone(),
        }
    }

    /// Zero the private key now.
    pub fn wipe(&mut self) {
        self.private_key.wipe();
    }

    pub fn is_wiped(&self) -> bool {
        self.private_key.is_wiped()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("chain", &self.chain)
            .field("path", &self.path)
            .field("address", &self.address)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Default-path account for `chain` at `index`.
pub fn derive_address(chain: Chain, root: &NamespaceRoot, index: u32) -> Result<WalletAccount> {
    match chain {
        Chain::Eth => eth::derive_address(root, index),
        Chain::Btc => btc::derive_address(root, index),
        Chain::Sol => sol::derive_address(root, index),
    }
}

/// Default-path signing key for `chain` at `index`.
pub fn derive_signing_key(chain: Chain, root: &NamespaceRoot, index: u32) -> Result<SigningKey> {
    match chain {
        Chain::Eth => eth::derive_signing_key(root, index),
        Chain::Btc => btc::derive_signing_key(root, index),
        Chain::Sol => sol::derive_signing_key(root, index),
    }
}

/// secp256k1 key pair from a BIP-32 walk seeded with the namespace root.
pub(crate) struct Secp256k1Pair {
    pub private_key: SecretBytes<32>,
    pub public_key: [u8; 33],
}

pub(crate) fn derive_secp256k1(root: &NamespaceRoot, path: &str) -> Result<Secp256k1Pair> {
    let path: DerivationPath = path
        .parse()
        .map_err(|e: bitcoin::bip32::Error| ValidationError::InvalidPath(e.to_string()))?;

    let secp = Secp256k1::new();
    let mut master = Xpriv::new_master(Network::Bitcoin, root.as_bytes())
        .map_err(|e| ComputationError::KeyDerivation(e.to_string()))?;
    let derived = master.derive_priv(&secp, &path);
    master.private_key.non_secure_erase();
    let mut derived = derived.map_err(|e| ComputationError::KeyDerivation(e.to_string()))?;

    let public_key = PublicKey::from_secret_key(&secp, &derived.private_key).serialize();
    let mut scalar = derived.private_key.secret_bytes();
    let private_key = SecretBytes::new(&mut scalar);
    derived.private_key.non_secure_erase();

    Ok(Secp256k1Pair {
        private_key,
        public_key,
    })
}

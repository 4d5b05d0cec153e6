//! Solana accounts (SLIP-10 Ed25519)
//!
//! Ed25519 under SLIP-10 only has hardened children, so every path segment
//! must carry the hardened marker.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::Zeroizing;

use super::{Chain, SigningKey, WalletAccount};
use crate::address::sol_address;
use crate::error::{ComputationError, Result};
use crate::memory::SecretBytes;
use crate::namespace::NamespaceRoot;
use crate::path::{ChildIndex, HardenedPath, HARDENED_BIT};

type HmacSha512 = Hmac<Sha512>;

/// SLIP-10 master HMAC key for the Ed25519 curve
const MASTER_SECRET: &[u8] = b"ed25519 seed";

/// Which path an index expands to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SolanaPath {
    /// `m/44'/501'/{index}'/0'`, used by Phantom and Solflare
    #[default]
    Bip44Change,
    /// `m/44'/501'/{index}'`, used by `solana-keygen` and older Ledger apps
    Bip44,
    /// Fixed path; the index is ignored
    Custom(HardenedPath),
}

impl SolanaPath {
    /// The index is range-checked for every variant, `Custom` included.
    pub fn resolve(&self, index: u32) -> Result<HardenedPath> {
        let index = ChildIndex::new(index)?.get();
        let path = match self {
            Self::Bip44Change => HardenedPath::from_indices([44, 501, index, 0])?,
            Self::Bip44 => HardenedPath::from_indices([44, 501, index])?,
            Self::Custom(path) => path.clone(),
        };
        Ok(path)
    }
}

pub fn derive_address(root: &NamespaceRoot, index: u32) -> Result<WalletAccount> {
    derive_address_with_path(root, index, &SolanaPath::Bip44Change)
}

pub fn derive_signing_key(root: &NamespaceRoot, index: u32) -> Result<SigningKey> {
    derive_signing_key_with_path(root, index, &SolanaPath::Bip44Change)
}

pub fn derive_address_with_path(
    root: &NamespaceRoot,
    index: u32,
    path: &SolanaPath,
) -> Result<WalletAccount> {
    derive_signing_key_with_path(root, index, path).map(|key| key.account())
}

pub fn derive_signing_key_with_path(
    root: &NamespaceRoot,
    index: u32,
    path: &SolanaPath,
) -> Result<SigningKey> {
    let path = path.resolve(index)?;
    let seed = slip10_derive(root.as_bytes(), &path)?;

    let public_key = ed25519_dalek::SigningKey::from_bytes(seed.expose())
        .verifying_key()
        .to_bytes();
    let address = sol_address(&public_key)?;
    let path = path.to_string();
    log::debug!("derived sol account {} at {}", address, path);

    Ok(SigningKey {
        chain: Chain::Sol,
        path,
        address,
        public_key: public_key.to_vec(),
        private_key: seed,
    })
}

/// Walk a hardened SLIP-10 path from `seed`, returning the 32-byte private key.
pub fn slip10_derive(seed: &[u8], path: &HardenedPath) -> Result<SecretBytes<32>> {
    let (mut key, mut chain_code) = hmac_split(MASTER_SECRET, &[seed])?;

    for &index in path.indices() {
        let hardened = (index | HARDENED_BIT).to_be_bytes();
        // Replacing drops (and zeroes) the parent pair
        (key, chain_code) = hmac_split(&chain_code[..], &[&[0x00], &key[..], &hardened])?;
    }

    Ok(SecretBytes::new(&mut key))
}

type Half = Zeroizing<[u8; 32]>;

/// HMAC-SHA512 over `parts`, split into (IL, IR).
fn hmac_split(key: &[u8], parts: &[&[u8]]) -> Result<(Half, Half)> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| ComputationError::KeyDerivation(format!("HMAC init failed: {}", e)))?;
    for part in parts {
        mac.update(part);
    }

    let mut buf = Zeroizing::new([0u8; 64]);
    buf.copy_from_slice(&mac.finalize().into_bytes());
    let mut left = Zeroizing::new([0u8; 32]);
    let mut right = Zeroizing::new([0u8; 32]);
    left.copy_from_slice(&buf[..32]);
    right.copy_from_slice(&buf[32..]);

    Ok((left, right))
}

//! Ethereum-style accounts (BIP-44 coin type 60)

use super::{derive_secp256k1, Chain, SigningKey, WalletAccount};
use crate::address::eth_address;
use crate::error::Result;
use crate::namespace::NamespaceRoot;
use crate::path::ChildIndex;

/// Account-level path; the address index is appended
pub const PATH_PREFIX: &str = "m/44'/60'/0'/0";

pub fn derive_address(root: &NamespaceRoot, index: u32) -> Result<WalletAccount> {
    derive_signing_key(root, index).map(|key| key.account())
}

pub fn derive_signing_key(root: &NamespaceRoot, index: u32) -> Result<SigningKey> {
    let index = ChildIndex::new(index)?;
    let path = Chain::Eth.default_path(index.get());

    let pair = derive_secp256k1(root, &path)?;
    let address = eth_address(&pair.public_key)?;
    log::debug!("derived eth account {} at {}", address, path);

    Ok(SigningKey {
        chain: Chain::Eth,
        path,
        address,
        public_key: pair.public_key.to_vec(),
        private_key: pair.private_key,
    })
}

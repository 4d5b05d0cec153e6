//! Bitcoin accounts (BIP-84 native segwit)

use std::str::FromStr;

use super::{derive_secp256k1, Chain, SigningKey, WalletAccount};
use crate::address::p2wpkh_address;
use crate::error::{Result, ValidationError};
use crate::namespace::NamespaceRoot;
use crate::path::ChildIndex;

/// Account-level path; the address index is appended
pub const PATH_PREFIX: &str = "m/84'/0'/0'/0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitcoinAddressType {
    /// Witness v0 key hash, `bc1q…`
    #[default]
    P2wpkh,
    /// Witness v1 Taproot. Not supported: no tweak scheme has been fixed
    /// for SeedID keys, and a guessed one would strand funds.
    P2tr,
}

impl FromStr for BitcoinAddressType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "p2wpkh" | "segwit" => Ok(Self::P2wpkh),
            "p2tr" | "taproot" => Ok(Self::P2tr),
            other => Err(ValidationError::UnsupportedAddressType(other.to_string())),
        }
    }
}

pub fn derive_address(root: &NamespaceRoot, index: u32) -> Result<WalletAccount> {
    derive_address_with_type(root, index, BitcoinAddressType::P2wpkh)
}

pub fn derive_address_with_type(
    root: &NamespaceRoot,
    index: u32,
    address_type: BitcoinAddressType,
) -> Result<WalletAccount> {
    derive_signing_key_with_type(root, index, address_type).map(|key| key.account())
}

pub fn derive_signing_key(root: &NamespaceRoot, index: u32) -> Result<SigningKey> {
    derive_signing_key_with_type(root, index, BitcoinAddressType::P2wpkh)
}

pub fn derive_signing_key_with_type(
    root: &NamespaceRoot,
    index: u32,
    address_type: BitcoinAddressType,
) -> Result<SigningKey> {
    let index = ChildIndex::new(index)?;
    if address_type == BitcoinAddressType::P2tr {
        return Err(ValidationError::UnsupportedAddressType(
            "p2tr (Taproot) is not supported yet".to_string(),
        )
        .into());
    }

    let path = Chain::Btc.default_path(index.get());
    let pair = derive_secp256k1(root, &path)?;
    let address = p2wpkh_address(&pair.public_key)?;
    log::debug!("derived btc account {} at {}", address, path);

    Ok(SigningKey {
        chain: Chain::Btc,
        path,
        address,
        public_key: pair.public_key.to_vec(),
        private_key: pair.private_key,
    })
}

//! Public key → address encoders
//!
//! - Ethereum: Keccak-256 of the uncompressed point, last 20 bytes, EIP-55
//! - Bitcoin: Bech32 P2WPKH (witness v0, hrp `bc`)
//! - Solana: Base58 of the raw Ed25519 public key
//!
//! Encoders take public bytes only and never see private material.

use bitcoin::hashes::Hash;
use bitcoin::{Address, CompressedPublicKey, Network};
use secp256k1::PublicKey;
use sha3::{Digest, Keccak256};

use crate::error::{ComputationError, Result, ValidationError};

pub const COMPRESSED_PUBKEY_LEN: usize = 33;
pub const ED25519_PUBKEY_LEN: usize = 32;
pub const ETH_ADDRESS_LEN: usize = 20;

/// Ethereum address for a 33-byte compressed secp256k1 public key.
///
/// Returns `0x` followed by 40 EIP-55 mixed-case hex characters.
pub fn eth_address(compressed_pubkey: &[u8]) -> Result<String> {
    check_len("secp256k1 public key", compressed_pubkey, COMPRESSED_PUBKEY_LEN)?;

    let point = PublicKey::from_slice(compressed_pubkey)
        .map_err(|e| ComputationError::InvalidPublicKey(e.to_string()))?;
    let uncompressed = point.serialize_uncompressed();

    // Drop the 0x04 tag; hash x || y
    let hash = Keccak256::digest(&uncompressed[1..]);
    let mut address = [0u8; ETH_ADDRESS_LEN];
    address.copy_from_slice(&hash[12..]);
    Ok(to_checksum_address(&address))
}

/// EIP-55 mixed-case rendering of a 20-byte address.
///
/// Each hex letter is uppercased when the matching nibble of
/// Keccak-256(lowercase hex) is 8 or above.
pub fn to_checksum_address(address: &[u8; ETH_ADDRESS_LEN]) -> String {
    let lower = hex::encode(address);
    let hash = Keccak256::digest(lower.as_bytes());

    let mut out = String::with_capacity(2 + lower.len());
    out.push_str("0x");
    for (i, ch) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if nibble >= 8 {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Re-checksum an `0x`-prefixed address string of any case.
pub fn checksum_eth_address(address: &str) -> Result<String> {
    let hex_part = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);
    let bytes = hex::decode(hex_part).map_err(|e| ValidationError::InvalidParameter {
        name: "address",
        reason: e.to_string(),
    })?;
    check_len("address", &bytes, ETH_ADDRESS_LEN)?;

    let mut raw = [0u8; ETH_ADDRESS_LEN];
    raw.copy_from_slice(&bytes);
    Ok(to_checksum_address(&raw))
}

/// Witness program for P2WPKH: HASH160 (SHA-256 then RIPEMD-160) of the key.
pub fn hash160(compressed_pubkey: &[u8]) -> [u8; 20] {
    bitcoin::hashes::hash160::Hash::hash(compressed_pubkey).to_byte_array()
}

/// Native segwit (witness v0, `bc1q…`) address for a compressed key.
pub fn p2wpkh_address(compressed_pubkey: &[u8]) -> Result<String> {
    check_len("secp256k1 public key", compressed_pubkey, COMPRESSED_PUBKEY_LEN)?;

    let key = CompressedPublicKey::from_slice(compressed_pubkey)
        .map_err(|e| ComputationError::InvalidPublicKey(e.to_string()))?;
    Ok(Address::p2wpkh(&key, Network::Bitcoin).to_string())
}

/// Solana address: the public key itself, Base58.
pub fn sol_address(ed25519_pubkey: &[u8]) -> Result<String> {
    check_len("Ed25519 public key", ed25519_pubkey, ED25519_PUBKEY_LEN)?;
    Ok(bs58::encode(ed25519_pubkey).into_string())
}

fn check_len(
    what: &'static str,
    bytes: &[u8],
    expected: usize,
) -> std::result::Result<(), ValidationError> {
    if bytes.len() != expected {
        return Err(ValidationError::InvalidLength {
            what,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

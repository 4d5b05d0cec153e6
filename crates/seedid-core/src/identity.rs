//! Identity keys: Nostr and `did:key`
//!
//! Each identity takes the 32-byte root of its own namespace as the private
//! key directly. No HD walk is involved.

use std::fmt;

use nostr_sdk::Keys as NostrKeys;
use secp256k1::{PublicKey, Secp256k1, SecretKey};

use crate::error::{ComputationError, Result};
use crate::master::MasterKey;
use crate::namespace::{for_did_key, for_nostr, DidCurve, NamespaceRoot};

/// Multicodec prefix for an Ed25519 public key (varint 0xed)
const ED25519_PUB_MULTICODEC: [u8; 2] = [0xed, 0x01];

/// Multicodec prefix for a compressed secp256k1 public key (varint 0xe7)
const SECP256K1_PUB_MULTICODEC: [u8; 2] = [0xe7, 0x01];

/// Derive the Nostr key pair for this master key.
pub fn derive_nostr_keys(master: &MasterKey) -> Result<NostrKeys> {
    let root = for_nostr(master)?;
    let secret_key = nostr_sdk::SecretKey::from_slice(root.as_bytes())
        .map_err(|e| ComputationError::KeyDerivation(e.to_string()))?;
    Ok(NostrKeys::new(secret_key))
}

/// A `did:key` identifier with the public key it encodes.
#[derive(Clone, PartialEq, Eq)]
pub struct DidKey {
    pub curve: DidCurve,
    /// `did:key:z…`
    pub did: String,
    pub public_key: Vec<u8>,
}

impl fmt::Debug for DidKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DidKey")
            .field("curve", &self.curve)
            .field("did", &self.did)
            .finish()
    }
}

impl fmt::Display for DidKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.did)
    }
}

pub fn derive_did_key(master: &MasterKey, curve: DidCurve) -> Result<DidKey> {
    let root = for_did_key(master, curve)?;
    let public_key = match curve {
        DidCurve::Ed25519 => ed25519_public_key(&root).to_vec(),
        DidCurve::Secp256k1 => secp256k1_public_key(&root)?.to_vec(),
    };
    let did = encode_did_key(curve, &public_key);
    log::debug!("derived {:?} did:key", curve);

    Ok(DidKey {
        curve,
        did,
        public_key,
    })
}

/// `did:key:z` + Base58btc(multicodec || public key)
pub fn encode_did_key(curve: DidCurve, public_key: &[u8]) -> String {
    let prefix = match curve {
        DidCurve::Ed25519 => ED25519_PUB_MULTICODEC,
        DidCurve::Secp256k1 => SECP256K1_PUB_MULTICODEC,
    };
    let mut bytes = Vec::with_capacity(prefix.len() + public_key.len());
    bytes.extend_from_slice(&prefix);
    bytes.extend_from_slice(public_key);
    format!("did:key:z{}", bs58::encode(bytes).into_string())
}

fn ed25519_public_key(root: &NamespaceRoot) -> [u8; 32] {
    ed25519_dalek::SigningKey::from_bytes(root.as_bytes())
        .verifying_key()
        .to_bytes()
}

fn secp256k1_public_key(root: &NamespaceRoot) -> Result<[u8; 33]> {
    // Zero or >= n; about 2^-128 odds for an HKDF output
    let mut secret = SecretKey::from_slice(root.as_bytes())
        .map_err(|e| ComputationError::KeyDerivation(e.to_string()))?;
    let public_key = PublicKey::from_secret_key(&Secp256k1::new(), &secret).serialize();
    secret.non_secure_erase();
    Ok(public_key)
}

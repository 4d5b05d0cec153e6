//! End-to-end derivation tests.
//!
//! Walks the whole pipeline the way a wallet front end would:
//! passphrase → master key → namespace roots → identities and accounts.
//! Keys are then checked against the upstream crates that consume them.

use std::str::FromStr;

use ed25519_dalek::{Signer, Verifier};
use nostr_sdk::ToBech32;
use rand::Rng;
use seedid_core::chain::btc::{self, BitcoinAddressType};
use seedid_core::chain::sol::{self, SolanaPath};
use seedid_core::{
    derive_address, derive_did_key, derive_master_key, derive_nostr_keys, derive_signing_key,
    for_nostr, for_wallet, Chain, DidCurve, HardenedPath, MasterKey, MasterKeyConfig,
};

const VECTOR_MASTER_KEY: &str = "a4c8801bc4694b78afe54d013f947edd62075e391aa90509494781ae6eeadae4";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fast_config() -> MasterKeyConfig {
    MasterKeyConfig {
        memory_cost_kib: 64,
        time_cost: 1,
        parallelism: 1,
        ..MasterKeyConfig::default()
    }
}

fn vector_master() -> MasterKey {
    MasterKey::from_bytes(hex::decode(VECTOR_MASTER_KEY).unwrap())
}

// ============================================================================
// 1. Full pipeline
// ============================================================================

#[test]
fn test_full_pipeline_deterministic() {
    init_logging();
    let config = fast_config();

    let run = || {
        let master = derive_master_key("  Orbit Lantern Velvet Quarry  ", &config).unwrap();
        let nostr = derive_nostr_keys(&master).unwrap().public_key().to_hex();
        let did = derive_did_key(&master, DidCurve::Ed25519).unwrap().did;
        let accounts: Vec<String> = Chain::ALL
            .iter()
            .map(|&chain| {
                let root = for_wallet(&master, chain).unwrap();
                derive_address(chain, &root, 0).unwrap().address
            })
            .collect();
        (nostr, did, accounts)
    };

    assert_eq!(run(), run());
}

#[test]
fn test_normalization_variants_agree() {
    init_logging();
    let config = fast_config();

    let canonical = derive_master_key("café au lait", &config).unwrap();
    for variant in [
        "CAFÉ AU LAIT",
        "  café au lait\n",
        "cafe\u{301} au lait",
        "\tCafe\u{301} Au Lait ",
    ] {
        let master = derive_master_key(variant, &config).unwrap();
        assert_eq!(master.as_bytes(), canonical.as_bytes(), "{:?}", variant);
    }

    let other = derive_master_key("cafe au lait", &config).unwrap();
    assert_ne!(other.as_bytes(), canonical.as_bytes());
}

#[test]
fn test_pinned_outputs_from_vector_master() {
    init_logging();
    let master = vector_master();

    let keys = derive_nostr_keys(&master).unwrap();
    assert_eq!(
        keys.public_key().to_bech32().unwrap(),
        "npub1x5f7ep9frl5nec07k8tm0044v3t4d23khzmyxd6qatety2erf9gq7eca4g"
    );

    assert_eq!(
        derive_did_key(&master, DidCurve::Ed25519).unwrap().did,
        "did:key:z6Mkgm3jkgfHNYSN41mFL1bCi3LDEECa488H95kfRJ8Kr9tA"
    );
    assert_eq!(
        derive_did_key(&master, DidCurve::Secp256k1).unwrap().did,
        "did:key:zQ3shZvu7XBMUygCeJ249qJVhZDKiY55DWYaksEWtSLUSYkyQ"
    );

    let expected = [
        (Chain::Eth, "0x0fC1DB91548ee6bfB0C6E3A8Bf419027A1385788"),
        (Chain::Btc, "bc1q07ry9u4j42egy4rlhg0xgsu8jpyr4pdt5t8l6g"),
        (Chain::Sol, "CABPYG6ihSJdzUmCnm6zBJtnSicSjmn2ih3sJvWCUhQj"),
    ];
    for (chain, address) in expected {
        let root = for_wallet(&master, chain).unwrap();
        assert_eq!(derive_address(chain, &root, 0).unwrap().address, address);
    }
}

#[test]
fn test_salt_changes_everything() {
    init_logging();
    let a = derive_master_key("same words", &fast_config()).unwrap();
    let b = derive_master_key(
        "same words",
        &MasterKeyConfig {
            salt: b"per-user-salt".to_vec(),
            ..fast_config()
        },
    )
    .unwrap();
    assert_ne!(a.as_bytes(), b.as_bytes());

    let root_a = for_wallet(&a, Chain::Eth).unwrap();
    let root_b = for_wallet(&b, Chain::Eth).unwrap();
    assert_ne!(
        derive_address(Chain::Eth, &root_a, 0).unwrap().address,
        derive_address(Chain::Eth, &root_b, 0).unwrap().address
    );
}

#[test]
fn test_config_from_toml_drives_derivation() {
    init_logging();
    let config = MasterKeyConfig::from_toml_str(
        r#"
        algorithm = "argon2id"
        memory_cost_kib = 64
        time_cost = 1
        parallelism = 1
        "#,
    )
    .unwrap();
    config.validate().unwrap();

    let from_toml = derive_master_key("orbit lantern", &config).unwrap();
    let direct = derive_master_key("orbit lantern", &fast_config()).unwrap();
    assert_eq!(from_toml.as_bytes(), direct.as_bytes());
}

#[test]
fn test_random_passphrases_yield_distinct_accounts() {
    init_logging();
    let mut rng = rand::thread_rng();
    let config = fast_config();

    let mut seen = std::collections::HashSet::new();
    for _ in 0..8 {
        let words: Vec<String> = (0..6)
            .map(|_| hex::encode(rng.gen::<[u8; 4]>()))
            .collect();
        let master = derive_master_key(&words.join(" "), &config).unwrap();
        let root = for_wallet(&master, Chain::Btc).unwrap();
        let account = derive_address(Chain::Btc, &root, 0).unwrap();
        assert!(seen.insert(account.address));
    }
}

// ============================================================================
// 2. Concurrency
// ============================================================================

#[test]
fn test_parallel_derivation_matches_sequential() {
    init_logging();
    let master = vector_master();

    let sequential: Vec<(Chain, u32, String)> = Chain::ALL
        .iter()
        .flat_map(|&chain| (0..4).map(move |index| (chain, index)))
        .map(|(chain, index)| {
            let root = for_wallet(&master, chain).unwrap();
            (chain, index, derive_address(chain, &root, index).unwrap().address)
        })
        .collect();

    let parallel: Vec<(Chain, u32, String)> = std::thread::scope(|scope| {
        let handles: Vec<_> = sequential
            .iter()
            .map(|&(chain, index, _)| {
                let master = &master;
                scope.spawn(move || {
                    let root = for_wallet(master, chain).unwrap();
                    (chain, index, derive_address(chain, &root, index).unwrap().address)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
}

// ============================================================================
// 3. Keys work with the libraries that consume them
// ============================================================================

#[test]
fn test_eth_key_signs_for_its_public_key() {
    use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

    let root = for_wallet(&vector_master(), Chain::Eth).unwrap();
    let key = derive_signing_key(Chain::Eth, &root, 2).unwrap();

    let secp = Secp256k1::new();
    let secret = SecretKey::from_slice(key.private_key()).unwrap();
    let public = PublicKey::from_slice(&key.public_key).unwrap();
    assert_eq!(PublicKey::from_secret_key(&secp, &secret), public);

    let msg = Message::from_digest([0x5Cu8; 32]);
    let sig = secp.sign_ecdsa(&msg, &secret);
    assert!(secp.verify_ecdsa(&msg, &sig, &public).is_ok());
}

#[test]
fn test_btc_address_parses_and_matches_key() {
    use bitcoin::{Address, CompressedPublicKey, Network};

    let root = for_wallet(&vector_master(), Chain::Btc).unwrap();
    for index in 0..3 {
        let account = btc::derive_address_with_type(&root, index, BitcoinAddressType::P2wpkh)
            .unwrap();
        let parsed = Address::from_str(&account.address)
            .unwrap()
            .require_network(Network::Bitcoin)
            .unwrap();
        let key = CompressedPublicKey::from_slice(&account.public_key).unwrap();
        assert_eq!(parsed, Address::p2wpkh(&key, Network::Bitcoin));
    }
}

#[test]
fn test_sol_key_signs_for_its_address() {
    let root = for_wallet(&vector_master(), Chain::Sol).unwrap();
    let key = derive_signing_key(Chain::Sol, &root, 0).unwrap();

    let signing = ed25519_dalek::SigningKey::from_bytes(key.private_key());
    let verifying = ed25519_dalek::VerifyingKey::from_bytes(
        &key.public_key.as_slice().try_into().unwrap(),
    )
    .unwrap();
    let sig = signing.sign(b"seedid");
    assert!(verifying.verify(b"seedid", &sig).is_ok());
    assert_eq!(
        bs58_decode(&key.address),
        verifying.to_bytes().to_vec()
    );
}

#[test]
fn test_sol_custom_path_via_public_api() {
    let root = for_wallet(&vector_master(), Chain::Sol).unwrap();
    let path = HardenedPath::from_str("m/44h/501h/0h/0h/7h").unwrap();
    let account = sol::derive_address_with_path(&root, 0, &SolanaPath::Custom(path)).unwrap();
    assert_eq!(account.path, "m/44'/501'/0'/0'/7'");
    assert_eq!(account.address, "HgZ7fikvRuWh7V1T8NoZRtW5J4nKET1zsbeXgBjTjoGn");
}

#[test]
fn test_nostr_key_signs_events() {
    use nostr_sdk::{EventBuilder, Kind};

    let keys = derive_nostr_keys(&vector_master()).unwrap();
    let event = EventBuilder::new(Kind::TextNote, "hello from seedid")
        .sign_with_keys(&keys)
        .unwrap();
    assert_eq!(event.pubkey, keys.public_key());
    assert!(event.verify().is_ok());

    let root = for_nostr(&vector_master()).unwrap();
    assert_eq!(&keys.secret_key().to_secret_bytes(), root.as_bytes());
}

#[test]
fn test_accounts_serialize_without_secrets() {
    let root = for_wallet(&vector_master(), Chain::Eth).unwrap();
    let key = derive_signing_key(Chain::Eth, &root, 0).unwrap();
    let json = serde_json::to_string(&key.account()).unwrap();
    assert!(json.contains(&key.address));
    assert!(!json.contains(&hex::encode(key.private_key())));
}

fn bs58_decode(s: &str) -> Vec<u8> {
    bitcoin::base58::decode(s).unwrap()
}

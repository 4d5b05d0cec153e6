//! Security-specific tests.
//!
//! These tests verify:
//! 1. Out-of-range inputs are refused before any derivation
//! 2. Errors and Debug output never carry secret material
//! 3. Secrets can be wiped by the caller
//! 4. Malformed inputs don't panic

use rand::Rng;
use seedid_core::chain::btc::{self, BitcoinAddressType};
use seedid_core::{
    derive_address, derive_master_key, derive_signing_key, for_wallet, hkdf, zeroize, Chain,
    ChildIndex, HardenedPath, MasterKey, MasterKeyConfig, NamespaceRoot,
    SeedIdError, ValidationError,
};

fn fast_config() -> MasterKeyConfig {
    MasterKeyConfig {
        memory_cost_kib: 64,
        time_cost: 1,
        parallelism: 1,
        ..MasterKeyConfig::default()
    }
}

// ============================================================================
// 1. Input validation
// ============================================================================

#[test]
fn test_empty_passphrase_rejected() {
    for input in ["", "   ", "\n\t "] {
        let err = derive_master_key(input, &fast_config()).unwrap_err();
        assert!(matches!(
            err,
            SeedIdError::Validation(ValidationError::EmptyPassphrase)
        ));
    }
}

#[test]
fn test_bad_kdf_parameters_rejected() {
    let bad = [
        MasterKeyConfig {
            memory_cost_kib: 0,
            ..fast_config()
        },
        MasterKeyConfig {
            time_cost: 0,
            ..fast_config()
        },
        MasterKeyConfig {
            parallelism: 0,
            ..fast_config()
        },
        MasterKeyConfig {
            hash_len: 2,
            ..fast_config()
        },
        MasterKeyConfig {
            salt: vec![0u8; 4],
            ..fast_config()
        },
    ];
    for config in bad {
        let err = derive_master_key("valid words", &config).unwrap_err();
        assert!(err.is_validation(), "{:?}", config);
    }
}

#[test]
fn test_indices_at_hardened_boundary_rejected() {
    let root = NamespaceRoot::new(&mut [0x24u8; 32]);
    for chain in Chain::ALL {
        assert!(derive_address(chain, &root, ChildIndex::MAX).is_ok());
        for index in [0x8000_0000u32, u32::MAX] {
            let err = derive_address(chain, &root, index).unwrap_err();
            assert!(matches!(
                err,
                SeedIdError::Validation(ValidationError::InvalidIndex(_))
            ));
        }
    }
}

#[test]
fn test_boundary_index_conversions() {
    assert!(ChildIndex::try_from(-1i64).is_err());
    assert!(ChildIndex::try_from(1.5f64).is_err());
    assert!(ChildIndex::try_from(f64::NAN).is_err());
    assert!(ChildIndex::try_from(2_147_483_648i64).is_err());
    assert_eq!(ChildIndex::try_from(7.0f64).unwrap().get(), 7);
    assert!("abc".parse::<ChildIndex>().is_err());
}

#[test]
fn test_hkdf_length_bounds() {
    let ikm = [1u8; 32];
    assert!(hkdf(&ikm, "seedid/v1/wallet:eth", None, 0).is_err());
    assert!(hkdf(&ikm, "seedid/v1/wallet:eth", None, 8161).is_err());
    assert_eq!(
        hkdf(&ikm, "seedid/v1/wallet:eth", None, 8160)
            .unwrap()
            .len(),
        8160
    );
}

#[test]
fn test_short_master_key_rejected() {
    let master = MasterKey::from_bytes(vec![0u8; 16]);
    assert!(for_wallet(&master, Chain::Btc).unwrap_err().is_validation());
}

#[test]
fn test_taproot_refused() {
    let root = NamespaceRoot::new(&mut [0x24u8; 32]);
    let err = btc::derive_address_with_type(&root, 0, BitcoinAddressType::P2tr).unwrap_err();
    assert!(matches!(
        err,
        SeedIdError::Validation(ValidationError::UnsupportedAddressType(_))
    ));
}

// ============================================================================
// 2. No secrets in errors or Debug output
// ============================================================================

#[test]
fn test_errors_do_not_echo_passphrase() {
    let passphrase = "hunter2 secret words";
    let config = MasterKeyConfig {
        salt: vec![1u8; 2],
        ..fast_config()
    };
    let err = derive_master_key(passphrase, &config).unwrap_err();
    let rendered = format!("{} {:?}", err, err);
    assert!(!rendered.contains("hunter2"));
}

#[test]
fn test_debug_output_redacted() {
    let master = derive_master_key("debug redaction check", &fast_config()).unwrap();
    let printed = format!("{:?}", master);
    assert!(printed.contains("REDACTED"));
    assert!(!printed.contains(&hex::encode(master.as_bytes())));

    let root = for_wallet(&master, Chain::Sol).unwrap();
    assert!(!format!("{:?}", root).contains(&hex::encode(root.as_bytes())));

    let key = derive_signing_key(Chain::Sol, &root, 0).unwrap();
    assert!(!format!("{:?}", key).contains(&hex::encode(key.private_key())));
}

// ============================================================================
// 3. Caller-driven wiping
// ============================================================================

#[test]
fn test_signing_key_wipe() {
    let root = NamespaceRoot::new(&mut [0x24u8; 32]);
    for chain in Chain::ALL {
        let mut key = derive_signing_key(chain, &root, 0).unwrap();
        assert!(!key.is_wiped());
        key.wipe();
        assert!(key.is_wiped());
        // Public half survives
        assert!(!key.address.is_empty());
    }
}

#[test]
fn test_zeroize_helper() {
    let mut buffer = hkdf(&[9u8; 32], "scratch", None, 64).unwrap().to_vec();
    zeroize(&mut buffer);
    assert!(buffer.iter().all(|&b| b == 0));
}

// ============================================================================
// 4. Malformed inputs don't panic
// ============================================================================

#[test]
fn test_random_path_strings_never_panic() {
    let mut rng = rand::thread_rng();
    let alphabet = b"m/0123456789'hH /x-";
    for _ in 0..2000 {
        let len = rng.gen_range(0..24);
        let s: String = (0..len)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
            .collect();
        let _ = s.parse::<HardenedPath>();
        let _ = s.parse::<ChildIndex>();
    }
}

#[test]
fn test_random_passphrase_bytes_never_panic() {
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let bytes: Vec<u8> = (0..rng.gen_range(0..64)).map(|_| rng.gen()).collect();
        let s = String::from_utf8_lossy(&bytes);
        let _ = seedid_core::normalize(&s);
        let _ = seedid_core::assess_passphrase(&s);
    }
}

#[test]
fn test_namespace_root_from_slice_lengths() {
    for len in [0usize, 1, 31, 33, 64] {
        assert!(NamespaceRoot::from_slice(&vec![0u8; len]).is_err());
    }
    assert!(NamespaceRoot::from_slice(&[0u8; 32]).is_ok());
}

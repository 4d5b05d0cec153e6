#![no_main]

use libfuzzer_sys::fuzz_target;
use seedid_core::{assess_passphrase, normalize};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(normalized) = normalize(s) {
            assert!(!normalized.is_empty());
            assert_eq!(
                normalized.trim_matches(|c: char| c.is_ascii_whitespace()),
                normalized
            );
        }
        let _ = assess_passphrase(s);
    }
});

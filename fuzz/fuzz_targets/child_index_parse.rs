#![no_main]

use libfuzzer_sys::fuzz_target;
use seedid_core::ChildIndex;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(index) = s.parse::<ChildIndex>() {
            assert!(index.get() <= ChildIndex::MAX);
        }
    }

    // Same range check through the float path
    if data.len() >= 8 {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&data[..8]);
        if let Ok(index) = ChildIndex::try_from(f64::from_le_bytes(raw)) {
            assert!(index.get() <= ChildIndex::MAX);
        }
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use seedid_core::HardenedPath;

fuzz_target!(|data: &[u8]| {
    // Parsing must never panic. Anything accepted must print back to a
    // string that parses to the same path.
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(path) = s.parse::<HardenedPath>() {
            let reparsed: HardenedPath = path.to_string().parse().unwrap();
            assert_eq!(reparsed, path);
        }
    }
});

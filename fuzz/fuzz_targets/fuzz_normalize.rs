#![no_main]

use libfuzzer_sys::fuzz_target;
use singverse_bible::{normalize::normalize_json, validate_bible};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(bible) = normalize_json(raw) {
        let _ = validate_bible(&bible);
        let json = bible.to_json().unwrap_or_default();
        let _ = serde_json::from_str::<serde_json::Value>(&json);
    }
});

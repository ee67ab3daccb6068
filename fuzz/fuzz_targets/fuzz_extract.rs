#![no_main]

use kontierung::core::EngineConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = kontierung::extract::extract_invoice_data(s, &EngineConfig::default());
    }
});

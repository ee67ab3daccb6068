#![no_main]

use kontierung::accounts::AccountRegistry;
use kontierung::core::EngineConfig;
use kontierung::creditor::InMemoryDirectory;
use kontierung::pipeline::InvoiceProcessor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let registry = AccountRegistry::skr03();
        let directory = InMemoryDirectory::new();
        let processor = InvoiceProcessor::new(&registry, &directory, EngineConfig::default());
        // Empty input is an error; anything else must yield a result.
        if let Ok(doc) = processor.process_text("fuzz", s) {
            if let Some(p) = doc.proposal {
                assert!(p.confidence <= 100);
                assert!(p.amount.is_sign_positive() && !p.amount.is_zero());
            }
        }
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = kontierung::accounts::AccountRegistry::from_csv_reader(data);
});

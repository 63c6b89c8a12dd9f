#![no_main]

use libfuzzer_sys::fuzz_target;
use attrcert::AttrCertReader;

fuzz_target!(|data: &[u8]| {
    // Extraction must never panic, whatever the input. Errors and
    // exhaustion both end the loop.
    let mut reader = AttrCertReader::from_slice(data);
    while let Ok(Some(_)) = reader.next_cert() { }
});

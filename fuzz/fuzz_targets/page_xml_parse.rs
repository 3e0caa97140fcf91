//! Fuzz target for PAGE XML parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the PAGE XML reader,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pagemask::pagexml::from_page_xml_slice;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_page_xml_slice(data);
});

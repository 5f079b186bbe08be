//! Fuzz target for acquisition metadata XML parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the acquisition metadata
//! parser, checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use stitchprep::tiles::io_acquisition_xml::from_acquisition_xml_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }
    let _ = from_acquisition_xml_slice(data);
});

//! Fuzz target for tile file name decoding.

#![no_main]

use libfuzzer_sys::fuzz_target;
use stitchprep::tiles::io_acquisition_xml::parse_tile_file_name;

fuzz_target!(|data: &[u8]| {
    if let Ok(name) = std::str::from_utf8(data) {
        let _ = parse_tile_file_name(name);
    }
});

#![no_main]

extern crate libfuzzer_sys;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: [u8; 8]| {
    let mut pixels = [0u8; 16 * 3];
    bc1_rs::decode_block(&data, &mut pixels, 4 * 3).unwrap();
});

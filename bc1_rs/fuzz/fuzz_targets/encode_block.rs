#![no_main]

extern crate libfuzzer_sys;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: [u8; 16 * 3]| {
    let block = bc1_rs::encode_block(&data, 4 * 3);

    // Encoded blocks always decode, and only to palette colors.
    let mut decoded = [0u8; 16 * 3];
    bc1_rs::decode_block(&block, &mut decoded, 4 * 3).unwrap();
});

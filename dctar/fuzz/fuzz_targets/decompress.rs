#![no_main]

use dctar::{Codec, Format, Limits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let codec = Codec::new(Limits::new(16 * 1024 * 1024));

    for format in [Format::Gzip, Format::Zlib] {
        if let Ok(out) = codec.decompress_as(format, data) {
            // Anything that decodes must survive a round trip of its own.
            let packed = match codec.compress(format, &out) {
                Ok(packed) => packed,
                Err(_) => return,
            };
            assert_eq!(codec.decompress_as(format, &packed).ok(), Some(out));
        }
    }

    let _ = codec.decompress(data);
});

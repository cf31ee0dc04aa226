#![no_main]

use bzs_core::{DecompressorOptions, ErrorKind};
use bzs_file::decompress_io;
use bzs_stream::string;
use libfuzzer_sys::fuzz_target;

// Arbitrary bytes must never panic, and the engine and the one-shot path
// must agree on the outcome.
fuzz_target!(|data: &[u8]| {
    let options = DecompressorOptions::new().with_destination_buffer_length(4096);

    let mut via_engine = Vec::new();
    let engine = decompress_io(&mut &data[..], &mut via_engine, &options);
    let one_shot = string::decompress(data, &options);

    match (engine, one_shot) {
        (Ok(_), Ok(out)) => assert_eq!(via_engine, out),
        (Err(a), Err(b)) => {
            assert_eq!(a.kind(), b.kind());
            assert_eq!(a.kind(), ErrorKind::CorruptedSource);
        }
        (a, b) => panic!("engine {a:?} vs one-shot {b:?}"),
    }
});

#![no_main]

use arbitrary::Arbitrary;
use bzs_core::DecompressorOptions;
use bzs_stream::Decompressor;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    destination: u8,
    chunks: Vec<Vec<u8>>,
}

// Feeding untrusted chunks into the stream object: errors are fine, panics
// and unbounded loops are not.
fuzz_target!(|input: Input| {
    let options = DecompressorOptions::new()
        .with_destination_buffer_length(usize::from(input.destination) + 1);
    let Ok(mut decompressor) = Decompressor::new(&options) else {
        return;
    };

    for chunk in &input.chunks {
        let mut rest = chunk.as_slice();
        while !rest.is_empty() && !decompressor.is_finished() {
            let Ok(feed) = decompressor.feed(rest) else {
                return;
            };
            rest = &rest[feed.consumed..];
            if feed.needs_more_destination {
                let _ = decompressor.read_result();
            } else if feed.consumed == 0 {
                break;
            }
        }
    }
    assert!(decompressor.close().is_ok());
});

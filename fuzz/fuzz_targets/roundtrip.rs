#![no_main]

use arbitrary::Arbitrary;
use bzs_core::{CompressorOptions, DecompressorOptions};
use bzs_file::{compress_io, decompress_io};
use bzs_stream::string;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    block_size: u8,
    source: u8,
    destination: u8,
    data: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let options = CompressorOptions::new()
        .with_block_size(u32::from(input.block_size % 9) + 1)
        .with_source_buffer_length(usize::from(input.source) + 1)
        .with_destination_buffer_length(usize::from(input.destination) + 1);

    let mut packed = Vec::new();
    compress_io(&mut input.data.as_slice(), &mut packed, &options).unwrap();
    assert_eq!(packed, string::compress(&input.data, &options).unwrap());

    let options = DecompressorOptions::new()
        .with_source_buffer_length(usize::from(input.destination) + 1)
        .with_destination_buffer_length(usize::from(input.source) + 1);
    let mut out = Vec::new();
    decompress_io(&mut packed.as_slice(), &mut out, &options).unwrap();
    assert_eq!(out, input.data);
});

//! Property tests: arbitrary payloads, arbitrary buffer sizes.

use bzs_core::{CompressorOptions, DecompressorOptions};
use bzs_file::{compress_io, decompress_io};
use bzs_stream::{Compressor, Decompressor, string};
use bzs_tests::{chunks, drive_compressor, drive_decompressor};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn engine_round_trip(
        data in proptest::collection::vec(any::<u8>(), 0..4096),
        source in 1usize..64,
        destination in 1usize..64,
    ) {
        let options = CompressorOptions::new()
            .with_block_size(1)
            .with_source_buffer_length(source)
            .with_destination_buffer_length(destination);
        let mut packed = Vec::new();
        compress_io(&mut data.as_slice(), &mut packed, &options).unwrap();

        let options = DecompressorOptions::new()
            .with_source_buffer_length(destination)
            .with_destination_buffer_length(source);
        let mut out = Vec::new();
        decompress_io(&mut packed.as_slice(), &mut out, &options).unwrap();
        prop_assert_eq!(out, data);
    }

    #[test]
    fn stream_object_matches_one_shot(
        data in proptest::collection::vec(any::<u8>(), 0..4096),
        chunk in 1usize..512,
        destination in 1usize..128,
    ) {
        let options = CompressorOptions::new()
            .with_block_size(1)
            .with_destination_buffer_length(destination);
        let mut compressor = Compressor::new(&options).unwrap();
        let packed = drive_compressor(&mut compressor, &chunks(&data, chunk)).unwrap();
        prop_assert_eq!(&packed, &string::compress(&data, &options).unwrap());

        let options = DecompressorOptions::new().with_destination_buffer_length(destination);
        let mut decompressor = Decompressor::new(&options).unwrap();
        let out = drive_decompressor(&mut decompressor, &chunks(&packed, chunk)).unwrap();
        prop_assert_eq!(out, data);
    }
}

//! Chunked feeding: the stream objects must produce the same bytes whether
//! the input arrives in one piece or one byte at a time.

use bzs_core::{CompressorOptions, DecompressorOptions};
use bzs_stream::{Compressor, Decompressor, string};
use bzs_tests::{chunks, drive_compressor, drive_decompressor, noise, text};

#[test]
fn single_byte_chunks_match_single_chunk() {
    // Crosses a block boundary at the smallest block size.
    let data = text(100 * 1024);
    let options = CompressorOptions::new().with_block_size(1);

    let mut whole = Compressor::new(&options).unwrap();
    let reference = drive_compressor(&mut whole, &[&data]).unwrap();

    let mut bytewise = Compressor::new(&options).unwrap();
    let packed = drive_compressor(&mut bytewise, &chunks(&data, 1)).unwrap();

    assert_eq!(packed, reference);
    let out = string::decompress(&packed, &DecompressorOptions::default()).unwrap();
    assert_eq!(out, data);
}

#[test]
fn decompressor_accepts_single_byte_chunks() {
    let data = noise(6_000);
    let packed = string::compress(&data, &CompressorOptions::default()).unwrap();

    let mut decompressor = Decompressor::new(&DecompressorOptions::default()).unwrap();
    let out = drive_decompressor(&mut decompressor, &chunks(&packed, 1)).unwrap();
    assert_eq!(out, data);
    assert!(decompressor.is_finished());
}

#[test]
fn uneven_chunks_round_trip() {
    let data = text(50_000);
    let sizes = [1usize, 7, 64, 1000, 3];
    let mut pieces = Vec::new();
    let mut rest = data.as_slice();
    for size in sizes.iter().cycle() {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at((*size).min(rest.len()));
        pieces.push(head);
        rest = tail;
    }

    let mut compressor = Compressor::new(&CompressorOptions::default()).unwrap();
    let packed = drive_compressor(&mut compressor, &pieces).unwrap();
    assert_eq!(packed, string::compress(&data, &CompressorOptions::default()).unwrap());

    let mut decompressor = Decompressor::new(&DecompressorOptions::default()).unwrap();
    let out = drive_decompressor(&mut decompressor, &chunks(&packed, 13)).unwrap();
    assert_eq!(out, data);
}

#[test]
fn flush_between_chunks_keeps_stream_decodable() {
    let data = text(12_000);
    let mut compressor = Compressor::new(&CompressorOptions::default()).unwrap();
    let mut packed = Vec::new();

    for piece in chunks(&data, 4_000) {
        let mut rest = piece;
        while !rest.is_empty() {
            let feed = compressor.feed(rest).unwrap();
            rest = &rest[feed.consumed..];
            if feed.needs_more_destination {
                packed.extend(compressor.read_result().unwrap());
            }
        }
        while compressor.flush().unwrap() {
            packed.extend(compressor.read_result().unwrap());
        }
    }
    while compressor.finish().unwrap() {
        packed.extend(compressor.read_result().unwrap());
    }
    packed.extend(compressor.read_result().unwrap());

    let out = string::decompress(&packed, &DecompressorOptions::default()).unwrap();
    assert_eq!(out, data);
}

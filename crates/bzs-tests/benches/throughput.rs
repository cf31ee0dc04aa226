use bzs_core::{CompressorOptions, DecompressorOptions};
use bzs_file::{compress_io, decompress_io};
use bzs_stream::{Compressor, string};
use bzs_tests::{chunks, drive_compressor, text};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

fn bench_one_shot(c: &mut Criterion) {
    let data = text(256 * 1024);
    let packed = string::compress(&data, &CompressorOptions::default()).unwrap();

    let mut group = c.benchmark_group("one_shot");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("compress", |b| {
        b.iter(|| string::compress(&data, &CompressorOptions::default()).unwrap());
    });
    group.bench_function("decompress", |b| {
        b.iter(|| string::decompress(&packed, &DecompressorOptions::default()).unwrap());
    });
    group.finish();
}

fn bench_engine_buffer_sizes(c: &mut Criterion) {
    let data = text(256 * 1024);
    let packed = string::compress(&data, &CompressorOptions::default()).unwrap();

    let mut group = c.benchmark_group("engine_destination_length");
    group.throughput(Throughput::Bytes(data.len() as u64));
    for length in [256usize, 4096, 65536] {
        group.bench_with_input(BenchmarkId::new("compress", length), &length, |b, &length| {
            let options = CompressorOptions::new().with_destination_buffer_length(length);
            b.iter(|| {
                let mut out = Vec::with_capacity(packed.len());
                compress_io(&mut data.as_slice(), &mut out, &options).unwrap();
                out
            });
        });
        group.bench_with_input(BenchmarkId::new("decompress", length), &length, |b, &length| {
            let options = DecompressorOptions::new().with_destination_buffer_length(length);
            b.iter(|| {
                let mut out = Vec::with_capacity(data.len());
                decompress_io(&mut packed.as_slice(), &mut out, &options).unwrap();
                out
            });
        });
    }
    group.finish();
}

fn bench_stream_chunking(c: &mut Criterion) {
    let data = text(128 * 1024);

    let mut group = c.benchmark_group("stream_chunk_size");
    group.throughput(Throughput::Bytes(data.len() as u64));
    for size in [64usize, 1024, 16384] {
        let pieces = chunks(&data, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &pieces, |b, pieces| {
            b.iter(|| {
                let mut compressor = Compressor::new(&CompressorOptions::default()).unwrap();
                drive_compressor(&mut compressor, pieces).unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_one_shot,
    bench_engine_buffer_sizes,
    bench_stream_chunking
);
criterion_main!(benches);

#![warn(clippy::pedantic)]

//! Whole-file bzip2 transfers over two fixed buffers.
//!
//! Every entry point runs the same **Fill → Process → Drain** loop:
//!
//! ```text
//! ┌──────────────┬────────────────────────────────────────────────────────┐
//! │ Phase        │ Behaviour                                              │
//! ├──────────────┼────────────────────────────────────────────────────────┤
//! │ Fill         │ compact the source, read into its tail                 │
//! │ Process      │ one codec call over pending source / spare destination │
//! │ Drain        │ write the whole destination, reset it                  │
//! │ Finish       │ compress only: emit the footer after end of input      │
//! └──────────────┴────────────────────────────────────────────────────────┘
//! ```
//!
//! The destination writer is flushed once after the transfer. Decompression
//! stops at the end of the first bzip2 stream; trailing source bytes are
//! left alone.

mod engine;

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use bzs_core::{BzsError, CompressorOptions, DecompressorOptions, RawCodec, Session, Strategy};

pub use engine::TransferStats;

// ── Reader / writer entry points ────────────────────────────────────────────

/// Compress everything `reader` yields into `writer`.
///
/// # Errors
///
/// - [`BzsError::ValidateFailed`] for out-of-range options.
/// - [`BzsError::ReadIOFailed`] / [`BzsError::WriteIOFailed`] for I/O
///   failures.
/// - [`BzsError::NotEnoughSourceBuffer`] /
///   [`BzsError::NotEnoughDestinationBuffer`] if the configured buffers
///   cannot hold one unit of codec progress.
pub fn compress_io<R, W>(
    reader: &mut R,
    writer: &mut W,
    options: &CompressorOptions,
) -> Result<TransferStats, BzsError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let codec = options.build_codec()?;
    let session = Session::new(codec, options.strategy.clone()).quiet(options.is_quiet());
    engine::Transfer::new(
        session,
        reader,
        writer,
        options.resolved_source_buffer_length(),
        options.resolved_destination_buffer_length(),
    )?
    .compress()
}

/// Decompress one bzip2 stream from `reader` into `writer`.
///
/// # Errors
///
/// [`BzsError::CorruptedSource`] for malformed input or an input that ends
/// before the stream does (an empty source included), plus everything
/// [`compress_io`] can return.
pub fn decompress_io<R, W>(
    reader: &mut R,
    writer: &mut W,
    options: &DecompressorOptions,
) -> Result<TransferStats, BzsError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let codec = options.build_codec()?;
    let session = Session::new(codec, options.strategy.clone()).quiet(options.is_quiet());
    engine::Transfer::new(
        session,
        reader,
        writer,
        options.resolved_source_buffer_length(),
        options.resolved_destination_buffer_length(),
    )?
    .decompress()
}

// ── Path entry points ───────────────────────────────────────────────────────

/// Compress the file at `source` into a new file at `destination`.
///
/// # Errors
///
/// [`BzsError::AccessIOFailed`] if either file cannot be opened, plus
/// everything [`compress_io`] can return.
pub fn compress_file(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &CompressorOptions,
) -> Result<TransferStats, BzsError> {
    let (mut reader, mut writer) = open_pair(source.as_ref(), destination.as_ref())?;
    compress_io(&mut reader, &mut writer, options)
}

/// Decompress the file at `source` into a new file at `destination`.
///
/// # Errors
///
/// [`BzsError::AccessIOFailed`] if either file cannot be opened, plus
/// everything [`decompress_io`] can return.
pub fn decompress_file(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &DecompressorOptions,
) -> Result<TransferStats, BzsError> {
    let (mut reader, mut writer) = open_pair(source.as_ref(), destination.as_ref())?;
    decompress_io(&mut reader, &mut writer, options)
}

fn open_pair(source: &Path, destination: &Path) -> Result<(File, File), BzsError> {
    let reader = File::open(source).map_err(BzsError::AccessIOFailed)?;
    let writer = File::create(destination).map_err(BzsError::AccessIOFailed)?;
    tracing::debug!(
        source = %source.display(),
        destination = %destination.display(),
        "opened transfer files"
    );
    Ok((reader, writer))
}

// ── Injected codecs ─────────────────────────────────────────────────────────

/// Buffer lengths for a transfer driven by a caller-supplied codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferLengths {
    pub source: usize,
    pub destination: usize,
}

/// Run a compressing transfer through any [`RawCodec`].
///
/// # Errors
///
/// Same as [`compress_io`], minus option validation.
pub fn compress_with_codec<C, R, W>(
    codec: C,
    reader: &mut R,
    writer: &mut W,
    lengths: BufferLengths,
) -> Result<TransferStats, BzsError>
where
    C: RawCodec,
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let session = Session::new(codec, Strategy::inline());
    engine::Transfer::new(session, reader, writer, lengths.source, lengths.destination)?.compress()
}

/// Run a decompressing transfer through any [`RawCodec`].
///
/// # Errors
///
/// Same as [`decompress_io`], minus option validation.
pub fn decompress_with_codec<C, R, W>(
    codec: C,
    reader: &mut R,
    writer: &mut W,
    lengths: BufferLengths,
) -> Result<TransferStats, BzsError>
where
    C: RawCodec,
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let session = Session::new(codec, Strategy::inline());
    engine::Transfer::new(session, reader, writer, lengths.source, lengths.destination)?
        .decompress()
}

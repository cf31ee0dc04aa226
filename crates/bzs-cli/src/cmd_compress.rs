/// Implementation of `bzs compress`.
///
/// Builds [`CompressorOptions`] from the flags, then runs the buffered file
/// engine from the input to the output. Options are validated before any
/// file is created, so a bad `--block-size` leaves no empty output behind.
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bzs_core::CompressorOptions;

use crate::CompressArgs;

/// Run the `bzs compress` command.
///
/// # Errors
///
/// Returns an error if an option is out of range, a file cannot be
/// opened, or the transfer fails.
pub fn run(args: &CompressArgs) -> Result<()> {
    let options = CompressorOptions {
        block_size: args.block_size,
        work_factor: args.work_factor,
        quiet: Some(args.buffers.quiet),
        source_buffer_length: args.buffers.source_buffer_length,
        destination_buffer_length: args.buffers.destination_buffer_length,
        ..CompressorOptions::default()
    };
    options.validate().context("invalid compression options")?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input));

    let stats = if is_stdio(&args.input) || is_stdio(&output) {
        let mut reader = open_input(&args.input)?;
        let mut writer = open_output(&output)?;
        bzs_file::compress_io(&mut reader, &mut writer, &options)
    } else {
        bzs_file::compress_file(&args.input, &output, &options)
    }
    .with_context(|| format!("failed to compress {}", args.input.display()))?;

    tracing::info!(
        input = %args.input.display(),
        output = %output.display(),
        read = stats.read,
        written = stats.written,
        "compressed"
    );
    Ok(())
}

fn default_output(input: &Path) -> PathBuf {
    if is_stdio(input) {
        return PathBuf::from("-");
    }
    let mut name = input.as_os_str().to_owned();
    name.push(".bz2");
    PathBuf::from(name)
}

// ── Shared stdio helpers ──────────────────────────────────────────────────────

pub(crate) fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

pub(crate) fn open_input(path: &Path) -> Result<Box<dyn io::Read>> {
    if is_stdio(path) {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    Ok(Box::new(file))
}

pub(crate) fn open_output(path: &Path) -> Result<Box<dyn io::Write>> {
    if is_stdio(path) {
        return Ok(Box::new(io::stdout().lock()));
    }
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    Ok(Box::new(file))
}

/// Implementation of `bzs decompress`.
///
/// Runs the buffered file engine in the decompressing direction. The
/// transfer stops at the end of the first bzip2 stream; a truncated or
/// damaged input fails with "decompressor received corrupted source".
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bzs_core::DecompressorOptions;

use crate::DecompressArgs;
use crate::cmd_compress::{is_stdio, open_input, open_output};

/// Run the `bzs decompress` command.
///
/// # Errors
///
/// Returns an error if a file cannot be opened, or the input is not a
/// complete bzip2 stream.
pub fn run(args: &DecompressArgs) -> Result<()> {
    let options = DecompressorOptions {
        small: Some(args.small),
        quiet: Some(args.buffers.quiet),
        source_buffer_length: args.buffers.source_buffer_length,
        destination_buffer_length: args.buffers.destination_buffer_length,
        ..DecompressorOptions::default()
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input));

    let stats = if is_stdio(&args.input) || is_stdio(&output) {
        let mut reader = open_input(&args.input)?;
        let mut writer = open_output(&output)?;
        bzs_file::decompress_io(&mut reader, &mut writer, &options)
    } else {
        bzs_file::decompress_file(&args.input, &output, &options)
    }
    .with_context(|| format!("failed to decompress {}", args.input.display()))?;

    tracing::info!(
        input = %args.input.display(),
        output = %output.display(),
        read = stats.read,
        written = stats.written,
        "decompressed"
    );
    Ok(())
}

fn default_output(input: &Path) -> PathBuf {
    if is_stdio(input) {
        return PathBuf::from("-");
    }
    if input.extension().is_some_and(|ext| ext == "bz2") {
        return input.with_extension("");
    }
    let mut name = input.as_os_str().to_owned();
    name.push(".out");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_strips_or_appends() {
        assert_eq!(default_output(Path::new("dir/data.txt.bz2")), PathBuf::from("dir/data.txt"));
        assert_eq!(default_output(Path::new("archive")), PathBuf::from("archive.out"));
        assert_eq!(default_output(Path::new("-")), PathBuf::from("-"));
    }
}

/// Implementation of `bzs test`.
///
/// Streams the file through [`BzReader`] into a sink and prints the
/// compressed and decompressed sizes.
///
/// ```text
/// ✓ data.txt.bz2: 10482 → 40960 bytes (ratio 3.91)
/// ```
use std::fs::File;
use std::io;

use anyhow::{Context, Result};
use bzs_core::DecompressorOptions;
use bzs_stream::BzReader;

use crate::TestArgs;

/// Run the `bzs test` command.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or does not decompress
/// cleanly.
pub fn run(args: &TestArgs) -> Result<()> {
    let file = File::open(&args.input)
        .with_context(|| format!("cannot open {}", args.input.display()))?;
    let compressed = file
        .metadata()
        .with_context(|| format!("cannot stat {}", args.input.display()))?
        .len();

    let options = DecompressorOptions::new().with_small(args.small);
    let mut reader = BzReader::new(file, &options).context("cannot start decompressor")?;
    let decompressed = io::copy(&mut reader, &mut io::sink())
        .with_context(|| format!("{} is not a valid bzip2 stream", args.input.display()))?;

    println!(
        "✓ {}: {compressed} → {decompressed} bytes (ratio {})",
        args.input.display(),
        ratio(compressed, decompressed)
    );
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn ratio(compressed: u64, decompressed: u64) -> String {
    if compressed == 0 {
        return "n/a".to_string();
    }
    format!("{:.2}", decompressed as f64 / compressed as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_formatting() {
        assert_eq!(ratio(100, 391), "3.91");
        assert_eq!(ratio(0, 10), "n/a");
    }
}

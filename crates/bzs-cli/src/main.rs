/// bzs command-line tool: compress, decompress and verify bzip2 files
/// through the buffered file engine.
///
/// # Command overview
///
/// ```text
/// bzs <COMMAND> [OPTIONS]
///
/// Commands:
///   compress     Compress a file into a .bz2 stream
///   decompress   Decompress a .bz2 stream into a file
///   test         Decompress to nowhere and report sizes
///   help         Print help information
///
/// Global options:
///   -v, --verbose    Raise the log level (-v debug, -vv trace)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// `RUST_LOG` overrides the level chosen by `-v`.
///
/// # Exit codes
///
/// | Code | Meaning                                        |
/// |------|------------------------------------------------|
/// | 0    | Success                                        |
/// | 1    | Error (I/O failure, corrupted input, bad flag) |
///
/// All error details are written to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd_compress;
mod cmd_decompress;
mod cmd_test;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// The bzs command-line tool.
#[derive(Parser)]
#[command(name = "bzs", version, about = "bzip2 streaming adapter CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Raise the log level (repeat for more detail).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a bzip2 stream.
    Compress(CompressArgs),
    /// Decompress a bzip2 stream into a file.
    Decompress(DecompressArgs),
    /// Check that a bzip2 file decompresses cleanly.
    Test(TestArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Buffer sizing shared by `compress` and `decompress`.
///
/// `0` keeps the per-direction default:
///
/// ```text
/// ┌────────────┬─────────────┬──────────────────┐
/// │ Direction  │ Source      │ Destination      │
/// ├────────────┼─────────────┼──────────────────┤
/// │ compress   │ 256 KB      │ 64 KB            │
/// │ decompress │ 64 KB       │ 256 KB           │
/// └────────────┴─────────────┴──────────────────┘
/// ```
#[derive(clap::Args)]
pub struct BufferArgs {
    /// Source buffer length in bytes.
    #[arg(long, default_value_t = 0)]
    pub source_buffer_length: usize,

    /// Destination buffer length in bytes.
    #[arg(long, default_value_t = 0)]
    pub destination_buffer_length: usize,

    /// Silence per-call codec tracing.
    #[arg(long)]
    pub quiet: bool,
}

/// Arguments for `bzs compress`.
///
/// ```text
/// ┌─────────────────┬────────────────────────────────────────────────┐
/// │ Flag            │ Effect                                         │
/// ├─────────────────┼────────────────────────────────────────────────┤
/// │ -o / --output   │ destination path (default: <input>.bz2, - for  │
/// │                 │ stdout)                                        │
/// │ --block-size    │ 1..=9, block size in units of 100 KB           │
/// │ --work-factor   │ 0..=250, 0 = library default                   │
/// └─────────────────┴────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct CompressArgs {
    /// File to compress (`-` for stdin).
    pub input: PathBuf,

    /// Output path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub block_size: Option<u32>,

    #[arg(long)]
    pub work_factor: Option<u32>,

    #[command(flatten)]
    pub buffers: BufferArgs,
}

/// Arguments for `bzs decompress`.
///
/// Without `-o`, a trailing `.bz2` is stripped from the input name; other
/// names get `.out` appended.
#[derive(clap::Args)]
pub struct DecompressArgs {
    /// File to decompress (`-` for stdin).
    pub input: PathBuf,

    /// Output path (`-` for stdout).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use the low-memory decompression algorithm.
    #[arg(long)]
    pub small: bool,

    #[command(flatten)]
    pub buffers: BufferArgs,
}

/// Arguments for `bzs test`.
#[derive(clap::Args)]
pub struct TestArgs {
    /// File to check.
    pub input: PathBuf,

    /// Use the low-memory decompression algorithm.
    #[arg(long)]
    pub small: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Compress(args) => cmd_compress::run(&args),
        Commands::Decompress(args) => cmd_decompress::run(&args),
        Commands::Test(args) => cmd_test::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_compress_flags() {
        let cli = Cli::parse_from([
            "bzs",
            "-vv",
            "compress",
            "data.txt",
            "-o",
            "data.bz2",
            "--block-size",
            "3",
            "--destination-buffer-length",
            "16",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Compress(args) = cli.command else {
            panic!("expected compress");
        };
        assert_eq!(args.block_size, Some(3));
        assert_eq!(args.buffers.destination_buffer_length, 16);
        assert_eq!(args.output, Some(PathBuf::from("data.bz2")));
    }
}

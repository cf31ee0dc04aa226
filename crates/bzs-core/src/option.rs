use crate::error::BzsError;
use crate::strategy::Strategy;

/// Smallest bzip2 block size (×100 KB).
pub const MIN_BLOCK_SIZE: u32 = 1;
/// Largest bzip2 block size (×100 KB).
pub const MAX_BLOCK_SIZE: u32 = 9;
/// Block size used when none is given, same as the `bzip2` tool.
pub const DEFAULT_BLOCK_SIZE: u32 = 9;

/// `0` asks libbzip2 for its built-in default (30).
pub const MIN_WORK_FACTOR: u32 = 0;
pub const MAX_WORK_FACTOR: u32 = 250;

/// A buffer length of `0` in any option struct means "use the default for
/// this direction and role".
pub const DEFAULT_BUFFER_LENGTH: usize = 0;

pub const DEFAULT_SOURCE_BUFFER_LENGTH_FOR_COMPRESSOR: usize = 1 << 18; // 256 KB
pub const DEFAULT_DESTINATION_BUFFER_LENGTH_FOR_COMPRESSOR: usize = 1 << 16; // 64 KB

pub const DEFAULT_SOURCE_BUFFER_LENGTH_FOR_DECOMPRESSOR: usize = 1 << 16; // 64 KB
pub const DEFAULT_DESTINATION_BUFFER_LENGTH_FOR_DECOMPRESSOR: usize = 1 << 18; // 256 KB

fn or_default(length: usize, default: usize) -> usize {
    if length == DEFAULT_BUFFER_LENGTH {
        default
    } else {
        length
    }
}

/// Configuration for every compressing entry point (stream object, file
/// engine, one-shot path, writer).
///
/// ```text
/// ┌───────────────────────────┬────────────┬──────────────────────────────┐
/// │ Field                     │ Range      │ Default                      │
/// ├───────────────────────────┼────────────┼──────────────────────────────┤
/// │ block_size                │ 1..=9      │ 9                            │
/// │ work_factor               │ 0..=250    │ 0 (library default)          │
/// │ quiet                     │ bool       │ false                        │
/// │ source_buffer_length      │ any        │ 0 → 256 KB                   │
/// │ destination_buffer_length │ any        │ 0 → 64 KB                    │
/// │ strategy                  │ Strategy   │ Inline                       │
/// └───────────────────────────┴────────────┴──────────────────────────────┘
/// ```
///
/// Values are checked once by [`validate`](Self::validate), which every
/// constructor in the workspace calls before touching the codec.
#[derive(Clone, Debug, Default)]
pub struct CompressorOptions {
    /// Block size in units of 100 KB. `None` selects
    /// [`DEFAULT_BLOCK_SIZE`].
    pub block_size: Option<u32>,

    /// Threshold for switching to the fallback sorting algorithm on
    /// repetitive input.
    pub work_factor: Option<u32>,

    /// Silences the per-call codec trace events.
    pub quiet: Option<bool>,

    pub source_buffer_length: usize,
    pub destination_buffer_length: usize,

    /// How each codec call is executed.
    pub strategy: Strategy,
}

impl CompressorOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_block_size(mut self, block_size: u32) -> Self {
        self.block_size = Some(block_size);
        self
    }

    #[must_use]
    pub fn with_work_factor(mut self, work_factor: u32) -> Self {
        self.work_factor = Some(work_factor);
        self
    }

    #[must_use]
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = Some(quiet);
        self
    }

    #[must_use]
    pub fn with_source_buffer_length(mut self, length: usize) -> Self {
        self.source_buffer_length = length;
        self
    }

    #[must_use]
    pub fn with_destination_buffer_length(mut self, length: usize) -> Self {
        self.destination_buffer_length = length;
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check every field against its documented range.
    ///
    /// # Errors
    ///
    /// [`BzsError::ValidateFailed`] naming the first offending field.
    pub fn validate(&self) -> Result<(), BzsError> {
        if let Some(block_size) = self.block_size {
            if !(MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&block_size) {
                return Err(BzsError::invalid(format!(
                    "block size {block_size} is outside {MIN_BLOCK_SIZE}..={MAX_BLOCK_SIZE}"
                )));
            }
        }
        if let Some(work_factor) = self.work_factor {
            if !(MIN_WORK_FACTOR..=MAX_WORK_FACTOR).contains(&work_factor) {
                return Err(BzsError::invalid(format!(
                    "work factor {work_factor} is outside {MIN_WORK_FACTOR}..={MAX_WORK_FACTOR}"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn resolved_block_size(&self) -> u32 {
        self.block_size.unwrap_or(DEFAULT_BLOCK_SIZE)
    }

    #[must_use]
    pub fn resolved_work_factor(&self) -> u32 {
        self.work_factor.unwrap_or(MIN_WORK_FACTOR)
    }

    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.quiet.unwrap_or(false)
    }

    #[must_use]
    pub fn resolved_source_buffer_length(&self) -> usize {
        or_default(
            self.source_buffer_length,
            DEFAULT_SOURCE_BUFFER_LENGTH_FOR_COMPRESSOR,
        )
    }

    #[must_use]
    pub fn resolved_destination_buffer_length(&self) -> usize {
        or_default(
            self.destination_buffer_length,
            DEFAULT_DESTINATION_BUFFER_LENGTH_FOR_COMPRESSOR,
        )
    }

    /// Validate and build the libbzip2 compression context.
    ///
    /// # Errors
    ///
    /// [`BzsError::ValidateFailed`] for out-of-range options.
    pub fn build_codec(&self) -> Result<bzip2::Compress, BzsError> {
        self.validate()?;
        Ok(bzip2::Compress::new(
            bzip2::Compression::new(self.resolved_block_size()),
            self.resolved_work_factor(),
        ))
    }
}

/// Configuration for every decompressing entry point.
///
/// ```text
/// ┌───────────────────────────┬──────────────────────────────────────────┐
/// │ Field                     │ Default                                  │
/// ├───────────────────────────┼──────────────────────────────────────────┤
/// │ small                     │ false (fast algorithm, more memory)      │
/// │ quiet                     │ false                                    │
/// │ source_buffer_length      │ 0 → 64 KB                                │
/// │ destination_buffer_length │ 0 → 256 KB                               │
/// │ strategy                  │ Inline                                   │
/// └───────────────────────────┴──────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, Default)]
pub struct DecompressorOptions {
    /// Use the slower, low-memory decompression algorithm.
    pub small: Option<bool>,

    /// Silences the per-call codec trace events.
    pub quiet: Option<bool>,

    pub source_buffer_length: usize,
    pub destination_buffer_length: usize,

    /// How each codec call is executed.
    pub strategy: Strategy,
}

impl DecompressorOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_small(mut self, small: bool) -> Self {
        self.small = Some(small);
        self
    }

    #[must_use]
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = Some(quiet);
        self
    }

    #[must_use]
    pub fn with_source_buffer_length(mut self, length: usize) -> Self {
        self.source_buffer_length = length;
        self
    }

    #[must_use]
    pub fn with_destination_buffer_length(mut self, length: usize) -> Self {
        self.destination_buffer_length = length;
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Every representable decompressor option is valid; kept for symmetry
    /// with [`CompressorOptions::validate`].
    ///
    /// # Errors
    ///
    /// Never fails today.
    pub fn validate(&self) -> Result<(), BzsError> {
        Ok(())
    }

    #[must_use]
    pub fn is_small(&self) -> bool {
        self.small.unwrap_or(false)
    }

    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.quiet.unwrap_or(false)
    }

    #[must_use]
    pub fn resolved_source_buffer_length(&self) -> usize {
        or_default(
            self.source_buffer_length,
            DEFAULT_SOURCE_BUFFER_LENGTH_FOR_DECOMPRESSOR,
        )
    }

    #[must_use]
    pub fn resolved_destination_buffer_length(&self) -> usize {
        or_default(
            self.destination_buffer_length,
            DEFAULT_DESTINATION_BUFFER_LENGTH_FOR_DECOMPRESSOR,
        )
    }

    /// Validate and build the libbzip2 decompression context.
    ///
    /// # Errors
    ///
    /// [`BzsError::ValidateFailed`] for invalid options.
    pub fn build_codec(&self) -> Result<bzip2::Decompress, BzsError> {
        self.validate()?;
        Ok(bzip2::Decompress::new(self.is_small()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn defaults_resolve_per_direction() {
        let compressor = CompressorOptions::default();
        assert_eq!(compressor.resolved_source_buffer_length(), 1 << 18);
        assert_eq!(compressor.resolved_destination_buffer_length(), 1 << 16);
        assert_eq!(compressor.resolved_block_size(), 9);
        assert_eq!(compressor.resolved_work_factor(), 0);

        let decompressor = DecompressorOptions::default();
        assert_eq!(decompressor.resolved_source_buffer_length(), 1 << 16);
        assert_eq!(decompressor.resolved_destination_buffer_length(), 1 << 18);
        assert!(!decompressor.is_small());
    }

    #[test]
    fn explicit_lengths_override_defaults() {
        let options = CompressorOptions::new()
            .with_source_buffer_length(1)
            .with_destination_buffer_length(16);
        assert_eq!(options.resolved_source_buffer_length(), 1);
        assert_eq!(options.resolved_destination_buffer_length(), 16);
    }

    #[test]
    fn block_size_bounds() {
        for valid in MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE {
            assert!(CompressorOptions::new().with_block_size(valid).validate().is_ok());
        }
        for invalid in [MIN_BLOCK_SIZE - 1, MAX_BLOCK_SIZE + 1] {
            let err = CompressorOptions::new()
                .with_block_size(invalid)
                .validate()
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValidateFailed);
        }
    }

    #[test]
    fn work_factor_bounds() {
        assert!(CompressorOptions::new().with_work_factor(0).validate().is_ok());
        assert!(CompressorOptions::new().with_work_factor(250).validate().is_ok());
        let err = CompressorOptions::new()
            .with_work_factor(MAX_WORK_FACTOR + 1)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("work factor 251"));
    }

    #[test]
    fn build_codec_refuses_invalid_options() {
        let result = CompressorOptions::new().with_block_size(0).build_codec();
        assert!(matches!(result, Err(BzsError::ValidateFailed { .. })));
    }
}

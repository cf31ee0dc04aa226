use bzs_core::{Action, BzsError, DecompressorOptions, RawCodec, Strategy};

use crate::raw::{Feed, RawStream};

/// Caller-driven bzip2 decompressor.
///
/// Mirrors [`Compressor`](crate::Compressor) without `flush`/`finish`:
/// decompression has a single action, and the end of the stream is
/// detected from the input. Once [`is_finished`](Self::is_finished) turns
/// true, further `feed` calls consume nothing; any bytes left in the chunk
/// are trailing data after the stream.
pub struct Decompressor<C = bzip2::Decompress> {
    raw: RawStream<C>,
}

impl Decompressor {
    /// Build a libbzip2-backed decompressor.
    ///
    /// # Errors
    ///
    /// [`BzsError::AllocateFailed`] if the destination buffer cannot be
    /// allocated.
    pub fn new(options: &DecompressorOptions) -> Result<Self, BzsError> {
        let codec = options.build_codec()?;
        let raw = RawStream::new(
            codec,
            options.resolved_destination_buffer_length(),
            options.strategy.clone(),
            options.is_quiet(),
        )?;
        Ok(Self { raw })
    }
}

impl<C: RawCodec> Decompressor<C> {
    /// Wrap an arbitrary codec with a destination buffer of
    /// `destination_buffer_length` bytes.
    ///
    /// # Errors
    ///
    /// [`BzsError::AllocateFailed`] if the buffer cannot be allocated.
    pub fn with_codec(
        codec: C,
        destination_buffer_length: usize,
        strategy: Strategy,
    ) -> Result<Self, BzsError> {
        let raw = RawStream::new(codec, destination_buffer_length, strategy, false)?;
        Ok(Self { raw })
    }

    /// Decompress as much of `chunk` as one codec call accepts.
    ///
    /// # Errors
    ///
    /// - [`BzsError::UsedAfterClose`] after [`close`](Self::close).
    /// - [`BzsError::CorruptedSource`] for malformed input.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Feed, BzsError> {
        self.raw.feed(Action::Run, chunk)
    }

    /// Take every byte produced since the last call.
    ///
    /// # Errors
    ///
    /// [`BzsError::UsedAfterClose`] after [`close`](Self::close).
    pub fn read_result(&mut self) -> Result<Vec<u8>, BzsError> {
        self.raw.read_result()
    }

    /// Release the codec and the destination buffer.
    ///
    /// # Errors
    ///
    /// [`BzsError::UsedAfterClose`] on a second call.
    pub fn close(&mut self) -> Result<(), BzsError> {
        self.raw.close()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.raw.is_closed()
    }

    /// True once the end-of-stream marker has been decoded.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.raw.stream_ended()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string;
    use bzs_core::CompressorOptions;

    fn decompress_all(decompressor: &mut Decompressor, mut chunk: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        while !decompressor.is_finished() && !chunk.is_empty() {
            let feed = decompressor.feed(chunk).unwrap();
            chunk = &chunk[feed.consumed..];
            if feed.needs_more_destination {
                out.extend(decompressor.read_result().unwrap());
            }
        }
        // Drain output the codec still holds once input is exhausted.
        while !decompressor.is_finished() {
            let feed = decompressor.feed(&[]).unwrap();
            out.extend(decompressor.read_result().unwrap());
            if !feed.needs_more_destination && feed.consumed == 0 && !decompressor.is_finished() {
                break;
            }
        }
        out.extend(decompressor.read_result().unwrap());
        out
    }

    #[test]
    fn decompresses_one_shot_output() {
        let data = b"round and round ".repeat(64);
        let compressed = string::compress(&data, &CompressorOptions::default()).unwrap();

        let mut decompressor = Decompressor::new(&DecompressorOptions::default()).unwrap();
        let out = decompress_all(&mut decompressor, &compressed);
        assert_eq!(out, data);
        assert!(decompressor.is_finished());
    }

    #[test]
    fn small_destination_and_small_mode() {
        let data = b"abcdefghij".repeat(500);
        let compressed = string::compress(&data, &CompressorOptions::default()).unwrap();

        let options = DecompressorOptions::new()
            .with_small(true)
            .with_destination_buffer_length(16);
        let mut decompressor = Decompressor::new(&options).unwrap();
        let out = decompress_all(&mut decompressor, &compressed);
        assert_eq!(out, data);
    }

    #[test]
    fn trailing_bytes_are_not_consumed() {
        let mut compressed = string::compress(b"payload", &CompressorOptions::default()).unwrap();
        let stream_len = compressed.len();
        compressed.extend_from_slice(b"trailing");

        let mut decompressor = Decompressor::new(&DecompressorOptions::default()).unwrap();
        let feed = decompressor.feed(&compressed).unwrap();
        assert!(decompressor.is_finished());
        assert_eq!(feed.consumed, stream_len);

        let again = decompressor.feed(&compressed[feed.consumed..]).unwrap();
        assert_eq!(again.consumed, 0);
        assert_eq!(decompressor.read_result().unwrap(), b"payload");
    }

    #[test]
    fn corrupted_input_is_reported() {
        let mut decompressor = Decompressor::new(&DecompressorOptions::default()).unwrap();
        let err = decompressor.feed(b"BZh9 definitely not a block").unwrap_err();
        assert!(matches!(err, BzsError::CorruptedSource));
    }

    #[test]
    fn data_operations_after_close_fail() {
        let mut decompressor = Decompressor::new(&DecompressorOptions::default()).unwrap();
        decompressor.close().unwrap();
        assert!(matches!(decompressor.feed(b"x"), Err(BzsError::UsedAfterClose)));
        assert!(matches!(decompressor.read_result(), Err(BzsError::UsedAfterClose)));
        assert!(matches!(decompressor.close(), Err(BzsError::UsedAfterClose)));
    }
}

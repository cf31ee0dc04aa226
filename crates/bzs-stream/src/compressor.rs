use bzs_core::{Action, BzsError, CompressorOptions, RawCodec, Status, Strategy};

use crate::raw::{Feed, RawStream};

/// Caller-driven bzip2 compressor.
///
/// The compressor never performs I/O and never grows its destination
/// buffer. The caller owns flow control: every call reports whether the
/// destination is exhausted, and [`read_result`](Self::read_result) hands
/// back the produced bytes and frees the whole buffer again.
///
/// ```text
///   new ──▶ feed* ──▶ [flush*] ──▶ feed* ──▶ finish* ──▶ close
///            │          │                      │
///            └──────────┴── read_result ◀──────┘  (whenever space runs out)
/// ```
///
/// # Example
///
/// ```rust
/// use bzs_core::CompressorOptions;
/// use bzs_stream::Compressor;
///
/// let mut compressor = Compressor::new(&CompressorOptions::default()).unwrap();
/// let mut output = Vec::new();
///
/// let mut chunk: &[u8] = b"hello, hello, hello";
/// while !chunk.is_empty() {
///     let feed = compressor.feed(chunk).unwrap();
///     chunk = &chunk[feed.consumed..];
///     if feed.needs_more_destination {
///         output.extend(compressor.read_result().unwrap());
///     }
/// }
/// while compressor.finish().unwrap() {
///     output.extend(compressor.read_result().unwrap());
/// }
/// output.extend(compressor.read_result().unwrap());
/// compressor.close().unwrap();
///
/// assert!(output.starts_with(b"BZh"));
/// ```
pub struct Compressor<C = bzip2::Compress> {
    raw: RawStream<C>,
}

impl Compressor {
    /// Build a libbzip2-backed compressor.
    ///
    /// # Errors
    ///
    /// - [`BzsError::ValidateFailed`] for out-of-range options.
    /// - [`BzsError::AllocateFailed`] if the destination buffer cannot be
    ///   allocated.
    pub fn new(options: &CompressorOptions) -> Result<Self, BzsError> {
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

impl<C: RawCodec> Compressor<C> {
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

    /// Compress as much of `chunk` as one codec call accepts.
    ///
    /// # Errors
    ///
    /// [`BzsError::UsedAfterClose`] after [`close`](Self::close),
    /// [`BzsError::Unexpected`] for a non-empty chunk once the stream has
    /// finished, or the translated codec error.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Feed, BzsError> {
        self.raw.feed(Action::Run, chunk)
    }

    /// Emit a flush boundary. Returns `true` while part of the boundary is
    /// still held back for lack of destination space.
    ///
    /// # Errors
    ///
    /// Same as [`feed`](Self::feed).
    pub fn flush(&mut self) -> Result<bool, BzsError> {
        let step = self.raw.step(Action::Flush, &[])?;
        Ok(match step.status {
            Status::BoundaryReached | Status::StreamEnded => false,
            _ => true,
        })
    }

    /// Emit the end of the stream. Returns `true` until the codec reports
    /// the stream ended; the caller reads the result and calls again.
    ///
    /// # Errors
    ///
    /// Same as [`feed`](Self::feed).
    pub fn finish(&mut self) -> Result<bool, BzsError> {
        let step = self.raw.step(Action::Finish, &[])?;
        Ok(step.status != Status::StreamEnded)
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

    /// True once [`finish`](Self::finish) has completed the stream.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.raw.stream_ended()
    }
}

use std::io::{self, Read};

use bzs_core::{Action, ByteBuffer, BzsError, DecompressorOptions, Session, Status};

/// Decompressing [`Read`] adapter.
///
/// Compressed bytes are pulled from the inner reader into a source buffer
/// of the configured length and decoded straight into the caller's buffer.
/// Reads return `Ok(0)` once the end of the bzip2 stream is reached; any
/// bytes after it are left unread in the source buffer.
///
/// If the inner reader runs dry before the stream ends, `read` fails with
/// an [`io::ErrorKind::InvalidData`] error wrapping
/// [`BzsError::CorruptedSource`].
pub struct BzReader<R: Read> {
    inner: R,
    session: Session<bzip2::Decompress>,
    source: ByteBuffer,
    eof: bool,
}

impl<R: Read> BzReader<R> {
    /// Wrap `inner` with a decompressor configured by `options`.
    ///
    /// # Errors
    ///
    /// [`BzsError::AllocateFailed`] if the source buffer cannot be
    /// allocated.
    pub fn new(inner: R, options: &DecompressorOptions) -> Result<Self, BzsError> {
        let codec = options.build_codec()?;
        let session = Session::new(codec, options.strategy.clone()).quiet(options.is_quiet());
        let source = ByteBuffer::allocate(options.resolved_source_buffer_length())?;
        Ok(Self {
            inner,
            session,
            source,
            eof: false,
        })
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self) -> io::Result<()> {
        self.source.compact();
        if self.source.is_full() {
            return Err(BzsError::NotEnoughSourceBuffer.into());
        }
        loop {
            match self.inner.read(self.source.spare_mut()) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.source.commit(n);
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> Read for BzReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || self.session.stream_ended() {
            return Ok(0);
        }
        loop {
            if self.source.pending().is_empty() && !self.eof {
                self.fill()?;
            }
            let step = self
                .session
                .process(Action::Run, self.source.pending(), buf)?;
            self.source.consume(step.consumed);
            if step.produced > 0 {
                return Ok(step.produced);
            }
            if step.status == Status::StreamEnded {
                return Ok(0);
            }
            if step.consumed == 0 {
                if self.eof {
                    return Err(BzsError::CorruptedSource.into());
                }
                self.fill()?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string;
    use bzs_core::CompressorOptions;

    fn compressed(data: &[u8]) -> Vec<u8> {
        string::compress(data, &CompressorOptions::default()).unwrap()
    }

    #[test]
    fn reads_back_compressed_data() {
        let data = b"reader round trip ".repeat(500);
        let packed = compressed(&data);
        let mut reader = BzReader::new(packed.as_slice(), &DecompressorOptions::default()).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn one_byte_source_buffer() {
        let data = b"tiny source window".to_vec();
        let options = DecompressorOptions::new().with_source_buffer_length(1);
        let packed = compressed(&data);
        let mut reader = BzReader::new(packed.as_slice(), &options).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn truncated_input_wraps_corrupted_source() {
        let full = compressed(&b"cut short ".repeat(200));
        let mut reader =
            BzReader::new(&full[..full.len() - 10], &DecompressorOptions::default()).unwrap();
        let err = reader.read_to_end(&mut Vec::new()).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        let inner = err.get_ref().and_then(|e| e.downcast_ref::<BzsError>());
        assert!(matches!(inner, Some(BzsError::CorruptedSource)));
    }

    #[test]
    fn stops_at_stream_end() {
        let mut input = compressed(b"first");
        input.extend_from_slice(b"not part of the stream");
        let mut reader = BzReader::new(input.as_slice(), &DecompressorOptions::default()).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"first");
    }
}

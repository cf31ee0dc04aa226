use std::io::{self, Write};

use bzs_core::{Action, ByteBuffer, BzsError, CompressorOptions, Session, Status};

/// Compressing [`Write`] adapter.
///
/// Bytes written are compressed through one session; compressed output is
/// staged in a fixed destination buffer and written to the inner writer
/// whenever the buffer fills.
///
/// ```text
///   write ──▶ Run ──▶ destination ──full──▶ inner.write_all
///   flush ──▶ Flush (until boundary) ──▶ drain ──▶ inner.flush
///   finish ─▶ Finish (until stream end) ──▶ drain ──▶ inner.flush ──▶ W
/// ```
///
/// Dropping a writer that was never finished attempts to finish it and
/// ignores any error. Call [`finish`](Self::finish) to observe failures.
pub struct BzWriter<W: Write> {
    inner: Option<W>,
    session: Session<bzip2::Compress>,
    destination: ByteBuffer,
    finished: bool,
}

impl<W: Write> BzWriter<W> {
    /// Wrap `inner` with a compressor configured by `options`.
    ///
    /// # Errors
    ///
    /// [`BzsError::ValidateFailed`] for out-of-range options, or
    /// [`BzsError::AllocateFailed`] if the destination buffer cannot be
    /// allocated.
    pub fn new(inner: W, options: &CompressorOptions) -> Result<Self, BzsError> {
        let codec = options.build_codec()?;
        let session = Session::new(codec, options.strategy.clone()).quiet(options.is_quiet());
        let destination = ByteBuffer::allocate(options.resolved_destination_buffer_length())?;
        Ok(Self {
            inner: Some(inner),
            session,
            destination,
            finished: false,
        })
    }

    /// Write the footer, flush, and hand back the inner writer.
    ///
    /// # Errors
    ///
    /// Any error from the codec or the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.try_finish()?;
        self.inner
            .take()
            .ok_or_else(|| io::Error::from(BzsError::UsedAfterClose))
    }

    fn inner_mut(&mut self) -> io::Result<&mut W> {
        self.inner
            .as_mut()
            .ok_or_else(|| io::Error::from(BzsError::UsedAfterClose))
    }

    fn drain(&mut self) -> io::Result<()> {
        if self.destination.is_empty() {
            return Ok(());
        }
        let inner = self
            .inner
            .as_mut()
            .ok_or_else(|| io::Error::from(BzsError::UsedAfterClose))?;
        inner.write_all(self.destination.filled())?;
        tracing::debug!(bytes = self.destination.len(), "writer drain");
        self.destination.clear();
        Ok(())
    }

    fn drain_if_full(&mut self) -> io::Result<()> {
        if self.destination.is_full() {
            self.drain()?;
        }
        Ok(())
    }

    /// Repeat `action` with no input until `done` accepts the status.
    fn run_to(&mut self, action: Action, done: fn(Status) -> bool) -> io::Result<()> {
        loop {
            self.drain_if_full()?;
            let step = self
                .session
                .process(action, &[], self.destination.spare_mut())?;
            self.destination.commit(step.produced);
            if done(step.status) {
                return Ok(());
            }
            if step.stalled() && !self.destination.is_full() {
                return Err(BzsError::NotEnoughDestinationBuffer.into());
            }
        }
    }

    fn try_finish(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.run_to(Action::Finish, |status| status == Status::StreamEnded)?;
        self.drain()?;
        self.inner_mut()?.flush()?;
        self.finished = true;
        Ok(())
    }
}

impl<W: Write> Write for BzWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.finished {
            return Err(BzsError::UsedAfterClose.into());
        }
        loop {
            self.drain_if_full()?;
            let step = self
                .session
                .process(Action::Run, buf, self.destination.spare_mut())?;
            self.destination.commit(step.produced);
            if step.consumed > 0 {
                return Ok(step.consumed);
            }
            if !self.destination.is_full() {
                return Err(BzsError::NotEnoughDestinationBuffer.into());
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.finished {
            self.run_to(Action::Flush, |status| {
                matches!(status, Status::BoundaryReached | Status::StreamEnded)
            })?;
            self.drain()?;
        }
        self.inner_mut()?.flush()
    }
}

impl<W: Write> Drop for BzWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() && !self.finished {
            let _ = self.try_finish();
        }
    }
}

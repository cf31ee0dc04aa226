use std::io::{self, Read, Write};

use bzs_core::{Action, ByteBuffer, BzsError, RawCodec, Session, Status};

/// Byte counts of one finished transfer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransferStats {
    /// Bytes read from the source.
    pub read: u64,
    /// Bytes written to the destination.
    pub written: u64,
}

/// Where a run of codec calls stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pump {
    /// Pending source is used up (or the codec waits for more of it).
    NeedsInput,
    /// The codec reported the end of the stream.
    Ended,
}

/// Transient state of one file-to-file transfer.
///
/// ```text
///   reader ──fill──▶ source ──process──▶ destination ──drain──▶ writer
///                     ▲  │                     │
///                     └──┘ compact             └── reset after each drain
/// ```
///
/// Neither buffer is ever resized. A codec that cannot move inside them
/// surfaces as [`BzsError::NotEnoughSourceBuffer`] or
/// [`BzsError::NotEnoughDestinationBuffer`].
pub(crate) struct Transfer<'a, C, R: ?Sized, W: ?Sized> {
    session: Session<C>,
    source: ByteBuffer,
    destination: ByteBuffer,
    reader: &'a mut R,
    writer: &'a mut W,
    eof: bool,
    stats: TransferStats,
}

impl<'a, C, R, W> Transfer<'a, C, R, W>
where
    C: RawCodec,
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    pub(crate) fn new(
        session: Session<C>,
        reader: &'a mut R,
        writer: &'a mut W,
        source_buffer_length: usize,
        destination_buffer_length: usize,
    ) -> Result<Self, BzsError> {
        Ok(Self {
            session,
            source: ByteBuffer::allocate(source_buffer_length)?,
            destination: ByteBuffer::allocate(destination_buffer_length)?,
            reader,
            writer,
            eof: false,
            stats: TransferStats::default(),
        })
    }

    // ── Phases ──────────────────────────────────────────────────────────────

    /// Run a compressing transfer to the end of the stream.
    pub(crate) fn compress(mut self) -> Result<TransferStats, BzsError> {
        loop {
            self.fill()?;
            self.pump()?;
            if self.eof {
                break;
            }
        }

        tracing::debug!(read = self.stats.read, "source exhausted, finishing stream");
        loop {
            let step = self.session.process(
                Action::Finish,
                self.source.pending(),
                self.destination.spare_mut(),
            )?;
            self.source.consume(step.consumed);
            self.destination.commit(step.produced);
            if step.status == Status::StreamEnded {
                break;
            }
            if self.destination.is_full() || step.produced == 0 {
                self.drain()?;
            }
        }

        self.complete()
    }

    /// Run a decompressing transfer up to the end of the stream.
    pub(crate) fn decompress(mut self) -> Result<TransferStats, BzsError> {
        loop {
            self.fill()?;
            match self.pump()? {
                Pump::Ended => break,
                Pump::NeedsInput if self.eof => return Err(BzsError::CorruptedSource),
                Pump::NeedsInput => {}
            }
        }

        let trailing = self.source.pending().len();
        if trailing > 0 || !self.eof {
            tracing::debug!(trailing, eof = self.eof, "stream ended before end of source");
        }
        self.complete()
    }

    // ── Steps ───────────────────────────────────────────────────────────────

    /// Recycle the consumed prefix and read into the free tail.
    fn fill(&mut self) -> Result<(), BzsError> {
        self.source.compact();
        if self.source.is_full() {
            return Err(BzsError::NotEnoughSourceBuffer);
        }
        loop {
            match self.reader.read(self.source.spare_mut()) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.source.commit(n);
                    self.stats.read += n as u64;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(BzsError::ReadIOFailed(e)),
            }
        }
    }

    /// Process pending source with `Run` until the codec needs input or the
    /// stream ends, draining the destination whenever it blocks progress.
    fn pump(&mut self) -> Result<Pump, BzsError> {
        loop {
            let step = self.session.process(
                Action::Run,
                self.source.pending(),
                self.destination.spare_mut(),
            )?;
            self.source.consume(step.consumed);
            self.destination.commit(step.produced);

            if step.status == Status::StreamEnded {
                return Ok(Pump::Ended);
            }
            if self.destination.is_full() {
                self.drain()?;
                continue;
            }

            let waits_for_input = step.stalled() && step.status != Status::ParamEdgeCase;
            if !self.source.pending().is_empty() && !waits_for_input {
                self.drain()?;
                continue;
            }
            return Ok(Pump::NeedsInput);
        }
    }

    /// Write the whole destination content and reset it.
    fn drain(&mut self) -> Result<(), BzsError> {
        let length = self.destination.len();
        if length == 0 {
            return Err(BzsError::NotEnoughDestinationBuffer);
        }
        self.writer
            .write_all(self.destination.filled())
            .map_err(BzsError::WriteIOFailed)?;
        self.destination.clear();
        self.stats.written += length as u64;
        tracing::debug!(bytes = length, "drained destination");
        Ok(())
    }

    /// Write the residual destination, flush the writer, end the session.
    fn complete(mut self) -> Result<TransferStats, BzsError> {
        if !self.destination.is_empty() {
            self.drain()?;
        }
        self.writer.flush().map_err(BzsError::WriteIOFailed)?;
        self.session.end()?;
        tracing::debug!(
            read = self.stats.read,
            written = self.stats.written,
            "transfer complete"
        );
        Ok(self.stats)
    }
}

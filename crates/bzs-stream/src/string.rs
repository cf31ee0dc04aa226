//! One-shot compression of in-memory data.
//!
//! Both functions run a single session over the whole input and collect the
//! output in one [`ByteBuffer`] that starts at the configured destination
//! length and grows by that same length every time it fills:
//!
//! ```text
//!   capacity:  d ──full──▶ 2d ──full──▶ 3d ──▶ …   (d = destination length)
//! ```
//!
//! The result is truncated to the bytes actually produced.

use bzs_core::{Action, ByteBuffer, BzsError, CompressorOptions, DecompressorOptions, RawCodec, Session, Status};

/// Compress `data` into a complete bzip2 stream.
///
/// # Errors
///
/// - [`BzsError::ValidateFailed`] for out-of-range options.
/// - [`BzsError::AllocateFailed`] if the output cannot grow.
/// - [`BzsError::NotEnoughDestinationBuffer`] if the codec stalls while
///   output space is still available.
pub fn compress(data: &[u8], options: &CompressorOptions) -> Result<Vec<u8>, BzsError> {
    let codec = options.build_codec()?;
    let session = Session::new(codec, options.strategy.clone()).quiet(options.is_quiet());
    let growth = options.resolved_destination_buffer_length();
    compress_with_session(session, data, growth)
}

/// Decompress a complete bzip2 stream held in `data`.
///
/// Bytes after the end of the stream are ignored.
///
/// # Errors
///
/// - [`BzsError::CorruptedSource`] for malformed or truncated input
///   (including empty input).
/// - [`BzsError::AllocateFailed`] if the output cannot grow.
/// - [`BzsError::NotEnoughDestinationBuffer`] if the codec stalls while
///   output space is still available.
pub fn decompress(data: &[u8], options: &DecompressorOptions) -> Result<Vec<u8>, BzsError> {
    let codec = options.build_codec()?;
    let session = Session::new(codec, options.strategy.clone()).quiet(options.is_quiet());
    let growth = options.resolved_destination_buffer_length();
    decompress_with_session(session, data, growth)
}

fn grow_if_full(destination: &mut ByteBuffer, growth: usize) -> Result<(), BzsError> {
    if destination.is_full() {
        destination.resize(destination.capacity() + growth.max(1))?;
    }
    Ok(())
}

pub(crate) fn compress_with_session<C: RawCodec>(
    mut session: Session<C>,
    data: &[u8],
    growth: usize,
) -> Result<Vec<u8>, BzsError> {
    let mut destination = ByteBuffer::allocate(growth)?;
    let mut offset = 0;

    while offset < data.len() {
        grow_if_full(&mut destination, growth)?;
        let step = session.process(Action::Run, &data[offset..], destination.spare_mut())?;
        destination.commit(step.produced);
        offset += step.consumed;
        if step.stalled() && !destination.is_full() {
            return Err(BzsError::NotEnoughDestinationBuffer);
        }
    }

    loop {
        grow_if_full(&mut destination, growth)?;
        let step = session.process(Action::Finish, &[], destination.spare_mut())?;
        destination.commit(step.produced);
        if step.status == Status::StreamEnded {
            break;
        }
        if step.stalled() && !destination.is_full() {
            return Err(BzsError::NotEnoughDestinationBuffer);
        }
    }

    session.end()?;
    tracing::debug!(
        source = data.len(),
        destination = destination.len(),
        "one-shot compress"
    );
    Ok(destination.into_vec())
}

pub(crate) fn decompress_with_session<C: RawCodec>(
    mut session: Session<C>,
    data: &[u8],
    growth: usize,
) -> Result<Vec<u8>, BzsError> {
    let mut destination = ByteBuffer::allocate(growth)?;
    let mut offset = 0;

    loop {
        grow_if_full(&mut destination, growth)?;
        let step = session.process(Action::Run, &data[offset..], destination.spare_mut())?;
        destination.commit(step.produced);
        offset += step.consumed;
        if step.status == Status::StreamEnded {
            break;
        }
        if step.stalled() && !destination.is_full() {
            if offset == data.len() {
                return Err(BzsError::CorruptedSource);
            }
            return Err(BzsError::NotEnoughDestinationBuffer);
        }
    }

    if offset < data.len() {
        tracing::debug!(trailing = data.len() - offset, "ignoring bytes after stream end");
    }
    session.end()?;
    Ok(destination.into_vec())
}

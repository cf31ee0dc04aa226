use bzs_core::{Action, ByteBuffer, BzsError, RawCodec, Session, Status, Step, Strategy};

/// Outcome of a single [`feed`](crate::Compressor::feed) call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Feed {
    /// Bytes taken from the front of the chunk.
    pub consumed: usize,

    /// The destination buffer is exhausted (or the codec pushed back while
    /// input remained). Call `read_result` before feeding again.
    pub needs_more_destination: bool,
}

/// State shared by the compressing and decompressing stream objects: one
/// session, one fixed destination buffer, one close guard.
///
/// The destination buffer only ever moves its fill cursor. Its spare
/// region is the "remaining destination" handed to the codec, so the view
/// can never exceed `capacity - produced_unread`.
pub(crate) struct RawStream<C> {
    session: Session<C>,
    destination: Option<ByteBuffer>,
}

impl<C: RawCodec> RawStream<C> {
    pub(crate) fn new(
        codec: C,
        destination_buffer_length: usize,
        strategy: Strategy,
        quiet: bool,
    ) -> Result<Self, BzsError> {
        // The session is dropped (and the codec released) if allocation fails.
        let session = Session::new(codec, strategy).quiet(quiet);
        let destination = ByteBuffer::allocate(destination_buffer_length)?;
        Ok(Self {
            session,
            destination: Some(destination),
        })
    }

    fn guard(&mut self) -> Result<&mut ByteBuffer, BzsError> {
        if !self.session.is_active() {
            return Err(BzsError::UsedAfterClose);
        }
        self.destination.as_mut().ok_or(BzsError::UsedAfterClose)
    }

    /// One codec call over `input`, writing into the remaining destination.
    pub(crate) fn step(&mut self, action: Action, input: &[u8]) -> Result<Step, BzsError> {
        let destination = self
            .destination
            .as_mut()
            .filter(|_| self.session.is_active())
            .ok_or(BzsError::UsedAfterClose)?;
        let step = self.session.process(action, input, destination.spare_mut())?;
        destination.commit(step.produced);
        Ok(step)
    }

    pub(crate) fn feed(&mut self, action: Action, chunk: &[u8]) -> Result<Feed, BzsError> {
        let step = self.step(action, chunk)?;
        let input_left = step.consumed < chunk.len();
        let needs_more_destination = self.destination_exhausted()
            || (step.status == Status::ParamEdgeCase && input_left);
        Ok(Feed {
            consumed: step.consumed,
            needs_more_destination,
        })
    }

    pub(crate) fn destination_exhausted(&self) -> bool {
        self.destination.as_ref().is_some_and(ByteBuffer::is_full)
    }

    pub(crate) fn read_result(&mut self) -> Result<Vec<u8>, BzsError> {
        Ok(self.guard()?.take())
    }

    pub(crate) fn stream_ended(&self) -> bool {
        self.session.stream_ended()
    }

    pub(crate) fn is_closed(&self) -> bool {
        !self.session.is_active() || self.destination.is_none()
    }

    /// Release the codec context and the destination buffer. Both releases
    /// are attempted even if one of them already happened.
    pub(crate) fn close(&mut self) -> Result<(), BzsError> {
        if self.is_closed() {
            return Err(BzsError::UsedAfterClose);
        }
        let ended = self.session.end();
        self.destination = None;
        ended
    }
}

#[cfg(test)]
mod tests {
    use bzs_core::{Direction, Progress, RawStatus};

    use super::*;

    /// Accepts input only while the output window is at least `min_out`
    /// bytes, otherwise answers PARAM_ERROR.
    struct NeedsRoom {
        min_out: usize,
    }

    impl RawCodec for NeedsRoom {
        fn direction(&self) -> Direction {
            Direction::Decompress
        }

        fn process(&mut self, _action: Action, input: &[u8], output: &mut [u8]) -> Progress {
            if output.len() < self.min_out {
                return Progress {
                    consumed: 0,
                    produced: 0,
                    raw: RawStatus::ParamError,
                };
            }
            let n = input.len().min(output.len());
            output[..n].copy_from_slice(&input[..n]);
            Progress {
                consumed: n,
                produced: n,
                raw: RawStatus::Ok,
            }
        }
    }

    fn stream(min_out: usize, capacity: usize) -> RawStream<NeedsRoom> {
        RawStream::new(NeedsRoom { min_out }, capacity, Strategy::inline(), true).unwrap()
    }

    #[test]
    fn backpressure_with_input_left_needs_destination() {
        let mut raw = stream(4, 6);
        let feed = raw.feed(Action::Run, b"abc").unwrap();
        assert_eq!(feed.consumed, 3);
        assert!(!feed.needs_more_destination);

        // Three bytes of room left, codec wants four.
        let feed = raw.feed(Action::Run, b"def").unwrap();
        assert_eq!(feed.consumed, 0);
        assert!(feed.needs_more_destination);
    }

    #[test]
    fn backpressure_with_no_input_and_free_space_is_idle() {
        let mut raw = stream(4, 6);
        raw.feed(Action::Run, b"abc").unwrap();
        let feed = raw.feed(Action::Run, b"").unwrap();
        assert_eq!(feed.consumed, 0);
        assert!(!feed.needs_more_destination);
    }

    #[test]
    fn backpressure_with_no_input_and_full_destination_needs_destination() {
        let mut raw = stream(1, 3);
        raw.feed(Action::Run, b"abc").unwrap();
        let feed = raw.feed(Action::Run, b"").unwrap();
        assert!(feed.needs_more_destination);
    }

    #[test]
    fn close_twice_is_used_after_close() {
        let mut raw = stream(1, 3);
        raw.close().unwrap();
        assert!(raw.is_closed());
        assert!(matches!(raw.close(), Err(BzsError::UsedAfterClose)));
        assert!(matches!(raw.read_result(), Err(BzsError::UsedAfterClose)));
    }
}

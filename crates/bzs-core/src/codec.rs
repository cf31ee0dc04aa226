use crate::error::BzsError;
use crate::strategy::Strategy;

/// Codec-native result codes, numbered like libbzip2's `BZ_*` constants.
///
/// The adapter never interprets these directly; it classifies them into a
/// [`Status`] and the fatal ones are translated by
/// [`BzsError::from_raw`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RawStatus {
    Ok,
    RunOk,
    FlushOk,
    FinishOk,
    StreamEnd,
    SequenceError,
    ParamError,
    MemError,
    DataError,
    DataErrorMagic,
    IoError,
    UnexpectedEof,
    OutbuffFull,
    ConfigError,
}

impl RawStatus {
    /// The numeric libbzip2 result code.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::RunOk => 1,
            Self::FlushOk => 2,
            Self::FinishOk => 3,
            Self::StreamEnd => 4,
            Self::SequenceError => -1,
            Self::ParamError => -2,
            Self::MemError => -3,
            Self::DataError => -4,
            Self::DataErrorMagic => -5,
            Self::IoError => -6,
            Self::UnexpectedEof => -7,
            Self::OutbuffFull => -8,
            Self::ConfigError => -9,
        }
    }
}

/// Mode of a single `process` call. Only the compressing direction
/// distinguishes between them; decompression is always [`Action::Run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Run,
    Flush,
    Finish,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Compress,
    Decompress,
}

/// What one codec invocation did to its two windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub consumed: usize,
    pub produced: usize,
    pub raw: RawStatus,
}

/// The external codec, seen through one "process" entry point.
///
/// An implementation reads from the front of `input`, writes to the front
/// of `output`, and reports how far it got. It must not retain either
/// slice. The codec context is released when the value is dropped.
pub trait RawCodec: Send {
    fn direction(&self) -> Direction;

    fn process(&mut self, action: Action, input: &[u8], output: &mut [u8]) -> Progress;
}

#[allow(clippy::cast_possible_truncation)]
fn delta(after: u64, before: u64) -> usize {
    (after - before) as usize
}

impl RawCodec for bzip2::Compress {
    fn direction(&self) -> Direction {
        Direction::Compress
    }

    fn process(&mut self, action: Action, input: &[u8], output: &mut [u8]) -> Progress {
        let (in_before, out_before) = (self.total_in(), self.total_out());
        let action = match action {
            Action::Run => bzip2::Action::Run,
            Action::Flush => bzip2::Action::Flush,
            Action::Finish => bzip2::Action::Finish,
        };
        let raw = raw_status(self.compress(input, output, action));
        Progress {
            consumed: delta(self.total_in(), in_before),
            produced: delta(self.total_out(), out_before),
            raw,
        }
    }
}

impl RawCodec for bzip2::Decompress {
    fn direction(&self) -> Direction {
        Direction::Decompress
    }

    fn process(&mut self, _action: Action, input: &[u8], output: &mut [u8]) -> Progress {
        let (in_before, out_before) = (self.total_in(), self.total_out());
        let raw = raw_status(self.decompress(input, output));
        Progress {
            consumed: delta(self.total_in(), in_before),
            produced: delta(self.total_out(), out_before),
            raw,
        }
    }
}

#[allow(unreachable_patterns)]
fn raw_status(result: Result<bzip2::Status, bzip2::Error>) -> RawStatus {
    match result {
        Ok(bzip2::Status::Ok) => RawStatus::Ok,
        Ok(bzip2::Status::RunOk) => RawStatus::RunOk,
        Ok(bzip2::Status::FlushOk) => RawStatus::FlushOk,
        Ok(bzip2::Status::FinishOk) => RawStatus::FinishOk,
        Ok(bzip2::Status::StreamEnd) => RawStatus::StreamEnd,
        Ok(bzip2::Status::MemNeeded) => RawStatus::MemError,
        Err(bzip2::Error::Sequence) => RawStatus::SequenceError,
        Err(bzip2::Error::Param) => RawStatus::ParamError,
        Err(bzip2::Error::Data) => RawStatus::DataError,
        Err(bzip2::Error::DataMagic) => RawStatus::DataErrorMagic,
        _ => RawStatus::ConfigError,
    }
}

/// Classified outcome of one adapter call.
///
/// ```text
/// ┌─────────────────┬───────────────────────────────────────────────────┐
/// │ Status          │ Raised when                                       │
/// ├─────────────────┼───────────────────────────────────────────────────┤
/// │ Continue        │ RUN_OK after Run, FLUSH_OK, FINISH_OK, OK         │
/// │ BoundaryReached │ RUN_OK after Flush (flush fully emitted)          │
/// │ StreamEnded     │ STREAM_END                                        │
/// │ ParamEdgeCase   │ PARAM_ERROR, or a window that allows no progress  │
/// │ Fatal(raw)      │ everything else                                   │
/// └─────────────────┴───────────────────────────────────────────────────┘
/// ```
///
/// `ParamEdgeCase` is backpressure, not an error: the codec cannot move
/// with the windows it was given. Whether it means "give me more room" or
/// "nothing to do" depends on whether input remains, which only the caller
/// knows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Continue,
    BoundaryReached,
    StreamEnded,
    ParamEdgeCase,
    Fatal(RawStatus),
}

impl Status {
    /// Classify a codec status for the action that produced it.
    #[must_use]
    pub fn classify(action: Action, raw: RawStatus) -> Self {
        match (action, raw) {
            (Action::Flush, RawStatus::RunOk) => Self::BoundaryReached,
            (_, RawStatus::Ok | RawStatus::RunOk | RawStatus::FlushOk | RawStatus::FinishOk) => {
                Self::Continue
            }
            (_, RawStatus::StreamEnd) => Self::StreamEnded,
            (_, RawStatus::ParamError) => Self::ParamEdgeCase,
            (_, other) => Self::Fatal(other),
        }
    }

    /// The benign/fatal decision: fatal statuses become taxonomy errors,
    /// everything else passes through.
    ///
    /// # Errors
    ///
    /// Returns the translated error for [`Status::Fatal`].
    pub fn check(self) -> Result<Self, BzsError> {
        match self {
            Self::Fatal(raw) => Err(BzsError::from_raw(raw)),
            other => Ok(other),
        }
    }
}

/// Result of a [`Session::process`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub consumed: usize,
    pub produced: usize,
    pub status: Status,
}

impl Step {
    const IDLE: Self = Self {
        consumed: 0,
        produced: 0,
        status: Status::ParamEdgeCase,
    };

    /// True when the call moved neither window.
    #[must_use]
    pub fn stalled(&self) -> bool {
        self.consumed == 0 && self.produced == 0
    }
}

/// An owned codec context with scoped acquisition.
///
/// ```text
///   Active ──STREAM_END──▶ Ended ──end()/drop──▶ Closed
///     └───────────────────end()/drop──────────────▲
/// ```
///
/// The context is held in an `Option` so it is released exactly once,
/// either by [`end`](Self::end) or when the session is dropped. Calls after
/// the stream ended never reach the codec again. They report `StreamEnded`
/// with no progress, except a compressing `Flush` or a `Run` with input,
/// which is a `SEQUENCE_ERROR` like libbzip2 answers in its idle state.
pub struct Session<C> {
    codec: Option<C>,
    strategy: Strategy,
    stream_ended: bool,
    trace: bool,
}

impl<C: RawCodec> Session<C> {
    pub fn new(codec: C, strategy: Strategy) -> Self {
        Self {
            codec: Some(codec),
            strategy,
            stream_ended: false,
            trace: true,
        }
    }

    /// Suppress the per-call `trace` events.
    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.trace = !quiet;
        self
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.codec.is_some()
    }

    /// True once the codec has reported the end of the stream.
    #[must_use]
    pub fn stream_ended(&self) -> bool {
        self.stream_ended
    }

    /// Invoke the codec once and return the raw classification, fatal
    /// statuses included.
    ///
    /// The zero-window guard lives here: an empty output window, or a
    /// compressing `Run` with an empty input window, cannot make progress,
    /// so the codec is not called and `ParamEdgeCase` is reported.
    ///
    /// # Errors
    ///
    /// [`BzsError::UsedAfterClose`] if the session was ended.
    pub fn call(&mut self, action: Action, input: &[u8], output: &mut [u8]) -> Result<Step, BzsError> {
        let codec = self.codec.as_mut().ok_or(BzsError::UsedAfterClose)?;

        if self.stream_ended {
            // A finished compressor has nowhere to put more data.
            let rejected = codec.direction() == Direction::Compress
                && (action == Action::Flush || (action == Action::Run && !input.is_empty()));
            let status = if rejected {
                Status::Fatal(RawStatus::SequenceError)
            } else {
                Status::StreamEnded
            };
            return Ok(Step {
                status,
                ..Step::IDLE
            });
        }

        let action = match codec.direction() {
            Direction::Compress => action,
            Direction::Decompress => Action::Run,
        };

        let idle_run = action == Action::Run
            && input.is_empty()
            && codec.direction() == Direction::Compress;
        if output.is_empty() || idle_run {
            return Ok(Step::IDLE);
        }

        let mut progress = None;
        self.strategy
            .call(&mut || progress = Some(codec.process(action, input, output)));
        let progress = progress.unwrap_or(Progress {
            consumed: 0,
            produced: 0,
            raw: RawStatus::SequenceError,
        });

        let status = Status::classify(action, progress.raw);
        if status == Status::StreamEnded {
            self.stream_ended = true;
        }
        if self.trace {
            tracing::trace!(
                ?action,
                consumed = progress.consumed,
                produced = progress.produced,
                raw = progress.raw.code(),
                "codec call"
            );
        }

        Ok(Step {
            consumed: progress.consumed,
            produced: progress.produced,
            status,
        })
    }

    /// [`call`](Self::call) followed by the error translation.
    ///
    /// # Errors
    ///
    /// [`BzsError::UsedAfterClose`] on an ended session, or the translated
    /// codec error for a fatal status.
    pub fn process(&mut self, action: Action, input: &[u8], output: &mut [u8]) -> Result<Step, BzsError> {
        let step = self.call(action, input, output)?;
        step.status.check()?;
        Ok(step)
    }

    /// Release the codec context.
    ///
    /// # Errors
    ///
    /// [`BzsError::UsedAfterClose`] if the context was already released.
    pub fn end(&mut self) -> Result<(), BzsError> {
        match self.codec.take() {
            Some(codec) => {
                drop(codec);
                Ok(())
            }
            None => Err(BzsError::UsedAfterClose),
        }
    }
}

impl<C> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("active", &self.codec.is_some())
            .field("stream_ended", &self.stream_ended)
            .finish_non_exhaustive()
    }
}

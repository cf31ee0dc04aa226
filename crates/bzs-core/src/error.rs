use crate::codec::RawStatus;

/// Errors surfaced by every bzs stream, engine and one-shot call.
///
/// The taxonomy is closed: codec-native result codes are folded into it by
/// [`BzsError::from_raw`], buffer and I/O failures are raised directly by
/// the owning component. Every variant is terminal. Nothing in this
/// workspace retries or grows a buffer after one of these is returned; the
/// caller picks a larger buffer (or fixes the input) and starts over.
///
/// Error hierarchy:
///
/// ```text
///   BzsError
///   ├── AllocateFailed             ← buffer reservation or codec MEM_ERROR
///   ├── ValidateFailed             ← option out of range, codec PARAM_ERROR
///   ├── UsedAfterClose             ← data operation on a closed stream
///   ├── NotEnoughSourceBuffer      ← source buffer full, codec still wants input
///   ├── NotEnoughDestinationBuffer ← drain attempted with zero produced bytes
///   ├── CorruptedSource            ← DATA_ERROR, DATA_ERROR_MAGIC, truncated input
///   ├── AccessIOFailed(io::Error)  ← opening / creating a file
///   ├── ReadIOFailed(io::Error)    ← source read failed
///   ├── WriteIOFailed(io::Error)   ← destination write or flush failed
///   ├── NotImplemented             ← unsupported option combination
///   └── Unexpected { code }        ← any other codec status
/// ```
#[derive(Debug, thiserror::Error)]
pub enum BzsError {
    #[error("allocate error")]
    AllocateFailed,

    #[error("validate error: {reason}")]
    ValidateFailed { reason: String },

    #[error("used after closed")]
    UsedAfterClose,

    #[error("not enough source buffer")]
    NotEnoughSourceBuffer,

    #[error("not enough destination buffer")]
    NotEnoughDestinationBuffer,

    /// The codec rejected the compressed input, or the input ended before
    /// the end-of-stream marker.
    #[error("decompressor received corrupted source")]
    CorruptedSource,

    #[error("failed to access IO")]
    AccessIOFailed(#[source] std::io::Error),

    #[error("failed to read IO")]
    ReadIOFailed(#[source] std::io::Error),

    #[error("failed to write IO")]
    WriteIOFailed(#[source] std::io::Error),

    #[error("not implemented error")]
    NotImplemented,

    /// A codec status with no dedicated category. `code` is the
    /// libbzip2-style numeric result (see [`RawStatus::code`]).
    #[error("unexpected error (codec status {code})")]
    Unexpected { code: i32 },
}

/// Field-less mirror of [`BzsError`], handy for `assert_eq!` and for
/// callers that branch on the category without caring about the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AllocateFailed,
    ValidateFailed,
    UsedAfterClose,
    NotEnoughSourceBuffer,
    NotEnoughDestinationBuffer,
    CorruptedSource,
    AccessIOFailed,
    ReadIOFailed,
    WriteIOFailed,
    NotImplemented,
    Unexpected,
}

impl BzsError {
    /// Translate a fatal codec status into the taxonomy.
    ///
    /// ```text
    /// ┌───────────────────────────────────────┬────────────────────┐
    /// │ Codec status                          │ Error              │
    /// ├───────────────────────────────────────┼────────────────────┤
    /// │ MEM_ERROR                             │ AllocateFailed     │
    /// │ PARAM_ERROR                           │ ValidateFailed     │
    /// │ DATA_ERROR / DATA_ERROR_MAGIC /       │ CorruptedSource    │
    /// │ UNEXPECTED_EOF                        │                    │
    /// │ anything else                         │ Unexpected { code }│
    /// └───────────────────────────────────────┴────────────────────┘
    /// ```
    ///
    /// Benign statuses (`OK`, `RUN_OK`, `STREAM_END`, ...) never reach this
    /// function through the adapter; passing one anyway yields `Unexpected`.
    #[must_use]
    pub fn from_raw(raw: RawStatus) -> Self {
        match raw {
            RawStatus::MemError => Self::AllocateFailed,
            RawStatus::ParamError => Self::ValidateFailed {
                reason: "codec rejected its parameters".to_owned(),
            },
            RawStatus::DataError | RawStatus::DataErrorMagic | RawStatus::UnexpectedEof => {
                Self::CorruptedSource
            }
            other => Self::Unexpected { code: other.code() },
        }
    }

    /// Shorthand for an option validation failure.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::ValidateFailed {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AllocateFailed => ErrorKind::AllocateFailed,
            Self::ValidateFailed { .. } => ErrorKind::ValidateFailed,
            Self::UsedAfterClose => ErrorKind::UsedAfterClose,
            Self::NotEnoughSourceBuffer => ErrorKind::NotEnoughSourceBuffer,
            Self::NotEnoughDestinationBuffer => ErrorKind::NotEnoughDestinationBuffer,
            Self::CorruptedSource => ErrorKind::CorruptedSource,
            Self::AccessIOFailed(_) => ErrorKind::AccessIOFailed,
            Self::ReadIOFailed(_) => ErrorKind::ReadIOFailed,
            Self::WriteIOFailed(_) => ErrorKind::WriteIOFailed,
            Self::NotImplemented => ErrorKind::NotImplemented,
            Self::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }
}

/// Lets the `Read`/`Write` adapters report taxonomy errors through
/// `std::io`. I/O variants hand back their inner error unchanged.
impl From<BzsError> for std::io::Error {
    fn from(err: BzsError) -> Self {
        match err {
            BzsError::AccessIOFailed(e) | BzsError::ReadIOFailed(e) | BzsError::WriteIOFailed(e) => e,
            BzsError::CorruptedSource => {
                std::io::Error::new(std::io::ErrorKind::InvalidData, err)
            }
            BzsError::ValidateFailed { .. } => {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
            }
            BzsError::AllocateFailed => std::io::Error::new(std::io::ErrorKind::OutOfMemory, err),
            other => std::io::Error::other(other),
        }
    }
}

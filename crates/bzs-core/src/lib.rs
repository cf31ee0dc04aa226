#![warn(clippy::pedantic)]

pub mod buffer;
pub mod codec;
pub mod error;
pub mod option;
pub mod strategy;

pub use buffer::ByteBuffer;
pub use codec::{Action, Direction, Progress, RawCodec, RawStatus, Session, Status, Step};
pub use error::{BzsError, ErrorKind};
pub use option::{CompressorOptions, DecompressorOptions};
pub use strategy::{BlockInPlace, CallStrategy, Inline, Strategy};

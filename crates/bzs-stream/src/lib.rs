#![warn(clippy::pedantic)]

//! Caller-driven bzip2 streams.
//!
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────────┐
//! │ Type / function      │ Use                                          │
//! ├──────────────────────┼──────────────────────────────────────────────┤
//! │ Compressor           │ feed / flush / finish / read_result          │
//! │ Decompressor         │ feed / read_result                           │
//! │ string::compress     │ whole input in memory, growing output        │
//! │ string::decompress   │ whole stream in memory, growing output       │
//! │ BzWriter<W: Write>   │ compress everything written to W             │
//! │ BzReader<R: Read>    │ decompress everything read from R            │
//! └──────────────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! The stream objects never perform I/O and never grow their destination
//! buffer; flow control belongs to the caller.

mod compressor;
mod decompressor;
mod raw;
mod reader;
pub mod string;
mod writer;

pub use compressor::Compressor;
pub use decompressor::Decompressor;
pub use raw::Feed;
pub use reader::BzReader;
pub use writer::BzWriter;

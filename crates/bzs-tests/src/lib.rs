//! Shared fixtures and scripted codecs for the bzs integration tests and
//! benchmarks.
//!
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────────────┐
//! │ Item         │ Purpose                                              │
//! ├──────────────┼──────────────────────────────────────────────────────┤
//! │ text(n)      │ n bytes of compressible, deterministic prose         │
//! │ noise(n)     │ n bytes of poorly compressible, deterministic bytes  │
//! │ NeedsInput   │ codec that refuses to move below `min_in` input      │
//! │ NeedsRoom    │ codec that refuses to move below `min_out` space     │
//! │ Counted      │ wrapper counting drops of the inner codec            │
//! │ drive_*      │ run a stream object over a sequence of chunks        │
//! └──────────────┴──────────────────────────────────────────────────────┘
//! ```

#![allow(clippy::pedantic)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bzs_core::{Action, BzsError, Direction, Progress, RawCodec, RawStatus};
use bzs_stream::{Compressor, Decompressor};

// ── Fixtures ──────────────────────────────────────────────────────────────────

const WORDS: &[&str] = &[
    "block", "stream", "buffer", "codec", "drain", "compact", "finish", "source",
    "destination", "session", "chunk", "flush",
];

/// Deterministic, compressible text of exactly `len` bytes.
pub fn text(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len + 16);
    let mut i = 0usize;
    while out.len() < len {
        out.extend_from_slice(WORDS[(i * 7 + i / 3) % WORDS.len()].as_bytes());
        out.push(if i % 11 == 10 { b'\n' } else { b' ' });
        i += 1;
    }
    out.truncate(len);
    out
}

/// Deterministic pseudo-random bytes (xorshift) of exactly `len` bytes.
pub fn noise(len: usize) -> Vec<u8> {
    let mut state = 0x2545_f491_4f6c_dd1du64;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}

// ── Scripted codecs ───────────────────────────────────────────────────────────

/// Copy codec that makes no progress until at least `min_in` input bytes
/// are offered at once. Signals "waiting for input" (`OK`, nothing
/// consumed), never backpressure.
pub struct NeedsInput {
    pub min_in: usize,
}

impl RawCodec for NeedsInput {
    fn direction(&self) -> Direction {
        Direction::Decompress
    }

    fn process(&mut self, _action: Action, input: &[u8], output: &mut [u8]) -> Progress {
        if input.len() < self.min_in {
            return Progress {
                consumed: 0,
                produced: 0,
                raw: RawStatus::Ok,
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

/// Copy codec that answers `PARAM_ERROR` (backpressure) while the output
/// window is smaller than `min_out`.
pub struct NeedsRoom {
    pub min_out: usize,
    pub direction: Direction,
}

impl RawCodec for NeedsRoom {
    fn direction(&self) -> Direction {
        self.direction
    }

    fn process(&mut self, action: Action, input: &[u8], output: &mut [u8]) -> Progress {
        if output.len() < self.min_out {
            return Progress {
                consumed: 0,
                produced: 0,
                raw: RawStatus::ParamError,
            };
        }
        let n = input.len().min(output.len());
        output[..n].copy_from_slice(&input[..n]);
        let raw = if action == Action::Finish && n == input.len() {
            RawStatus::StreamEnd
        } else {
            RawStatus::RunOk
        };
        Progress {
            consumed: n,
            produced: n,
            raw,
        }
    }
}

/// Forwards to `inner` and bumps a shared counter when dropped.
pub struct Counted<C> {
    pub inner: C,
    drops: Arc<AtomicUsize>,
}

impl<C> Counted<C> {
    pub fn new(inner: C) -> (Self, Arc<AtomicUsize>) {
        let drops = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                drops: Arc::clone(&drops),
            },
            drops,
        )
    }
}

impl<C: RawCodec> RawCodec for Counted<C> {
    fn direction(&self) -> Direction {
        self.inner.direction()
    }

    fn process(&mut self, action: Action, input: &[u8], output: &mut [u8]) -> Progress {
        self.inner.process(action, input, output)
    }
}

impl<C> Drop for Counted<C> {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Current value of a drop counter returned by [`Counted::new`].
pub fn drops(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

// ── Stream object drivers ─────────────────────────────────────────────────────

/// Feed every chunk through `compressor`, finish the stream and return all
/// produced bytes. Reads results only when the compressor asks for room.
pub fn drive_compressor<C: RawCodec>(
    compressor: &mut Compressor<C>,
    chunks: &[&[u8]],
) -> Result<Vec<u8>, BzsError> {
    let mut out = Vec::new();
    for chunk in chunks {
        let mut rest = *chunk;
        while !rest.is_empty() {
            let feed = compressor.feed(rest)?;
            rest = &rest[feed.consumed..];
            if feed.needs_more_destination {
                out.extend(compressor.read_result()?);
            }
        }
    }
    while compressor.finish()? {
        out.extend(compressor.read_result()?);
    }
    out.extend(compressor.read_result()?);
    Ok(out)
}

/// Feed every chunk through `decompressor` until the stream ends and return
/// all produced bytes. Input that ends early is [`BzsError::CorruptedSource`].
pub fn drive_decompressor<C: RawCodec>(
    decompressor: &mut Decompressor<C>,
    chunks: &[&[u8]],
) -> Result<Vec<u8>, BzsError> {
    let mut out = Vec::new();
    for chunk in chunks {
        let mut rest = *chunk;
        while !rest.is_empty() && !decompressor.is_finished() {
            let feed = decompressor.feed(rest)?;
            rest = &rest[feed.consumed..];
            if feed.needs_more_destination {
                out.extend(decompressor.read_result()?);
            }
        }
    }
    while !decompressor.is_finished() {
        let feed = decompressor.feed(&[])?;
        let produced = decompressor.read_result()?;
        if produced.is_empty() && !feed.needs_more_destination && !decompressor.is_finished() {
            return Err(BzsError::CorruptedSource);
        }
        out.extend(produced);
    }
    out.extend(decompressor.read_result()?);
    Ok(out)
}

/// Split `data` into chunks of `size` bytes (the last may be shorter).
pub fn chunks(data: &[u8], size: usize) -> Vec<&[u8]> {
    data.chunks(size.max(1)).collect()
}

//! Sequential iteration over back-to-back chunks.
//!
//! [`Subchunks`] decodes one chunk per step from a shared source, each
//! starting where the previous chunk's pad slot ended. It is how a container
//! payload becomes its list of subchunks, and it works just as well over a
//! `LIST` payload or over the top level of a file.
//!
//! # Example
//! ```no_run
//! # use riff_chunk::{SharedSource, Subchunks, ReadMode};
//! let file = std::fs::File::open("sound.wav").unwrap();
//! let source = SharedSource::seekable(file);
//! for chunk in Subchunks::new(source, ReadMode::Streaming) {
//!     let chunk = chunk.unwrap();
//!     println!("{} ({} bytes)", chunk.tag(), chunk.size());
//! }
//! ```

use std::iter::FusedIterator;

use log::trace;

use super::format::chunk::Chunk;
use super::format::header;
use super::stream::source::{SharedSource, Source};
use super::types::error::{Result, RiffError};
use super::types::models::{ReadMode, TransferOptions};

/// Iterator over the chunks laid out back to back in a source.
///
/// Ends when a bounded source (such as a payload view) is exhausted, or when
/// an unbounded source ends cleanly on a chunk boundary. After the first
/// error it yields nothing more.
pub struct Subchunks<P> {
    parent: SharedSource<P>,
    mode: ReadMode,
    options: TransferOptions,
    done: bool,
}

impl<P: Source> Subchunks<P> {
    pub fn new(parent: SharedSource<P>, mode: ReadMode) -> Self {
        Self::with_options(parent, mode, TransferOptions::default())
    }

    pub fn with_options(parent: SharedSource<P>, mode: ReadMode, options: TransferOptions) -> Self {
        Self {
            parent,
            mode,
            options,
            done: false,
        }
    }

    fn next_chunk(&mut self) -> Result<Option<Chunk<P>>> {
        let mut guard = self.parent.lock()?;
        let bounded = guard.remaining();
        if bounded == Some(0) {
            return Ok(None);
        }
        let header = match header::decode(&mut *guard) {
            Err(RiffError::HeaderTruncated { found: 0 }) if bounded.is_none() => {
                trace!("Source ended on a chunk boundary");
                return Ok(None);
            }
            other => other?,
        };
        Chunk::from_header(&self.parent, &mut *guard, header, self.mode, &self.options).map(Some)
    }
}

impl<P: Source> Iterator for Subchunks<P> {
    type Item = Result<Chunk<P>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<P: Source> FusedIterator for Subchunks<P> {}

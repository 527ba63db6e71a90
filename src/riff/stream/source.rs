//! The byte source contract that payload views are carved from.
//!
//! Rather than requiring the whole of `std::io::{Read, Seek}`, the decoder
//! works against [`Source`]: sequential reads, an absolute position and an
//! optional absolute reposition. Adapters wrap ordinary readers, and a
//! [`BoundedView`](super::view::BoundedView) is itself a `Source`, which is
//! how container payloads become the source of their subchunks.

use std::fmt;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::riff::types::error::{Result, RiffError};

/// A readable byte source with an absolute position.
pub trait Source {
    /// Reads up to `buf.len()` bytes, returning 0 at end of data.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Current absolute position.
    fn position(&mut self) -> Result<u64>;

    /// Repositions to an absolute offset and returns the new position.
    ///
    /// Forward-only sources fail with [`RiffError::NotSeekable`].
    fn seek_to(&mut self, pos: u64) -> Result<u64>;

    fn is_seekable(&self) -> bool;

    /// Bytes left before the end of a bounded source, `None` if unbounded.
    fn remaining(&self) -> Option<u64> {
        None
    }
}

/// Adapter for any `Read + Seek`, such as a `File` or an in-memory `Cursor`.
#[derive(Debug)]
pub struct SeekableSource<R> {
    inner: R,
}

/// An in-memory, seekable source.
pub type MemorySource = SeekableSource<Cursor<Vec<u8>>>;

impl<R: Read + Seek> SeekableSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> Source for SeekableSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.inner.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return Ok(other?),
            }
        }
    }

    fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    fn seek_to(&mut self, pos: u64) -> Result<u64> {
        Ok(self.inner.seek(SeekFrom::Start(pos))?)
    }

    fn is_seekable(&self) -> bool {
        true
    }
}

/// Adapter for forward-only readers such as pipes and sockets.
///
/// Tracks its own position by counting bytes read. Only materialized views
/// can be carved from it.
#[derive(Debug)]
pub struct SequentialSource<R> {
    inner: R,
    position: u64,
}

impl<R: Read> SequentialSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Source for SequentialSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.inner.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
                Ok(n) => {
                    self.position += n as u64;
                    return Ok(n);
                }
            }
        }
    }

    fn position(&mut self) -> Result<u64> {
        Ok(self.position)
    }

    fn seek_to(&mut self, pos: u64) -> Result<u64> {
        // Staying put is the one reposition a forward-only source can honour.
        if pos == self.position {
            Ok(pos)
        } else {
            Err(RiffError::NotSeekable)
        }
    }

    fn is_seekable(&self) -> bool {
        false
    }
}

/// A shared handle to a source, held by every streaming view carved from it.
///
/// Cloning the handle does not clone the source. Views never close or
/// replace the source; it is released when the last handle is dropped.
pub struct SharedSource<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> SharedSource<S> {
    pub fn new(source: S) -> Self {
        Self { inner: Arc::new(Mutex::new(source)) }
    }

    /// Locks the source for exclusive use.
    pub fn lock(&self) -> Result<MutexGuard<'_, S>> {
        self.inner.lock().map_err(|_| RiffError::LockPoisoned)
    }

    /// Recovers the source once no other handle (and so no view) refers to it.
    pub fn try_into_inner(self) -> std::result::Result<S, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => mutex
                .into_inner()
                .map_err(|poisoned| Self::new(poisoned.into_inner())),
            Err(inner) => Err(Self { inner }),
        }
    }
}

impl<R: Read + Seek> SharedSource<SeekableSource<R>> {
    pub fn seekable(reader: R) -> Self {
        Self::new(SeekableSource::new(reader))
    }
}

impl<R: Read> SharedSource<SequentialSource<R>> {
    pub fn sequential(reader: R) -> Self {
        Self::new(SequentialSource::new(reader))
    }
}

impl SharedSource<MemorySource> {
    /// A seekable source over an owned byte buffer.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::seekable(Cursor::new(bytes.into()))
    }
}

impl<S> Clone for SharedSource<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S> fmt::Debug for SharedSource<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSource")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}

//! Bounded, cursor-tracking views over a region of a byte source.
//!
//! A [`BoundedView`] exposes exactly `size` bytes starting at some absolute
//! offset of its source, with its own cursor in `[0, size]`. Nothing outside
//! that window is ever observed through the view.
//!
//! Two construction modes share one interface:
//! - **Materialized**: the bytes are copied out up front and the view owns
//!   them. The source can be dropped or reused freely afterwards.
//! - **Streaming**: the view only remembers where its window starts and
//!   repositions the source before every access, so other consumers may move
//!   the source in between.

use std::fmt;
use std::io::{self, SeekFrom};

use log::trace;

use super::source::{SharedSource, Source};
use crate::riff::types::error::{Result, RiffError};
use crate::riff::types::models::{ReadMode, TransferOptions, Whence};
use crate::riff::utils;

enum Backing<S> {
    Materialized(Vec<u8>),
    Streaming { source: SharedSource<S>, start: u64 },
    Released,
}

/// A read/seek window of fixed size over a larger byte source.
pub struct BoundedView<S> {
    backing: Backing<S>,
    mode: ReadMode,
    size: u64,
    cursor: u64,
}

impl<S> BoundedView<S> {
    /// A materialized view over bytes the caller already owns.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            size: data.len() as u64,
            backing: Backing::Materialized(data),
            mode: ReadMode::Materialized,
            cursor: 0,
        }
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Current cursor, relative to the start of the window.
    pub fn tell(&self) -> u64 {
        self.cursor
    }

    pub fn remaining(&self) -> u64 {
        self.size - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.size
    }

    pub fn mode(&self) -> ReadMode {
        self.mode
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.backing, Backing::Released)
    }

    /// Moves the cursor to a target computed from `whence`, clamped into `[0, size]`.
    ///
    /// Out-of-range targets are never an error. No I/O happens here; a
    /// streaming view repositions its source on the next access.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.ensure_open()?;
        let base = match whence {
            Whence::Start => 0,
            Whence::Current => i128::from(self.cursor),
            Whence::End => i128::from(self.size),
        };
        let target = (base + i128::from(offset)).clamp(0, i128::from(self.size));
        self.cursor = target as u64;
        Ok(self.cursor)
    }

    /// Releases the view's own resources.
    ///
    /// The source the view was carved from is left open and untouched. Any
    /// later data access through this view fails with [`RiffError::ViewClosed`].
    pub fn close(&mut self) {
        if !self.is_closed() {
            trace!("Closing {:?} view of {} bytes at cursor {}", self.mode, self.size, self.cursor);
            self.backing = Backing::Released;
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(RiffError::ViewClosed);
        }
        Ok(())
    }

    fn clamp_len(&self, n: u64) -> usize {
        usize::try_from(n.min(self.remaining())).unwrap_or(usize::MAX)
    }
}

impl<S: Source> BoundedView<S> {
    /// Copies `size` bytes out of `source` now.
    ///
    /// # Errors
    /// [`RiffError::DataTruncated`] if the source holds fewer than `size` bytes.
    pub fn materialize(source: &SharedSource<S>, size: u64) -> Result<Self> {
        Self::materialize_with(source, size, &TransferOptions::default())
    }

    /// Like [`materialize`](Self::materialize), copying in `options.buffer_size` steps.
    pub fn materialize_with(source: &SharedSource<S>, size: u64, options: &TransferOptions) -> Result<Self> {
        let mut guard = source.lock()?;
        Self::materialize_from(&mut *guard, size, options)
    }

    /// Records the current position of `source` as the window start and
    /// moves `source` past the window without reading it.
    ///
    /// # Errors
    /// [`RiffError::NotSeekable`] if the source is forward-only.
    pub fn stream(source: &SharedSource<S>, size: u64) -> Result<Self> {
        let mut guard = source.lock()?;
        Self::stream_from(source, &mut *guard, size)
    }

    /// Builds a view in the given mode from an already locked source.
    pub(crate) fn carve(
        handle: &SharedSource<S>,
        source: &mut S,
        size: u64,
        mode: ReadMode,
        options: &TransferOptions,
    ) -> Result<Self> {
        match mode {
            ReadMode::Materialized => Self::materialize_from(source, size, options),
            ReadMode::Streaming => Self::stream_from(handle, source, size),
        }
    }

    fn materialize_from(source: &mut S, size: u64, options: &TransferOptions) -> Result<Self> {
        let data = utils::read_vec_up_to(source, size, options.buffer_len())?;
        if (data.len() as u64) < size {
            return Err(RiffError::DataTruncated {
                expected: size,
                found: data.len() as u64,
            });
        }
        trace!("Materialized {} payload bytes", size);
        Ok(Self::from_bytes(data))
    }

    fn stream_from(handle: &SharedSource<S>, source: &mut S, size: u64) -> Result<Self> {
        if !source.is_seekable() {
            return Err(RiffError::NotSeekable);
        }
        let start = source.position()?;
        let end = source.seek_to(start.saturating_add(size))?;
        trace!("Streaming view [{}..{}), source now at {}", start, start.saturating_add(size), end);
        Ok(Self {
            backing: Backing::Streaming {
                source: handle.clone(),
                start,
            },
            mode: ReadMode::Streaming,
            size,
            cursor: 0,
        })
    }

    /// Reads up to `n` bytes, never past the end of the window.
    ///
    /// # Errors
    /// [`RiffError::DataTruncated`] if the source runs out first. The cursor
    /// still reflects every byte actually obtained.
    pub fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        self.ensure_open()?;
        let mut buf = vec![0u8; self.clamp_len(n as u64)];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Reads everything between the cursor and the end of the window.
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        let remaining = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        self.read(remaining)
    }

    /// Reads into `buf`, returning the number of bytes copied.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.ensure_open()?;
        let len = self.clamp_len(buf.len() as u64);
        self.fill(&mut buf[..len])
    }

    /// Advances the cursor by up to `n` bytes without transferring them.
    ///
    /// Returns the number of bytes skipped.
    ///
    /// # Errors
    /// [`RiffError::NotSeekable`] for a streaming view over a forward-only
    /// source. Nothing is read in that case.
    pub fn skip(&mut self, n: u64) -> Result<u64> {
        self.ensure_open()?;
        if let Backing::Streaming { source, .. } = &self.backing
            && !source.lock()?.is_seekable()
        {
            return Err(RiffError::NotSeekable);
        }
        let step = n.min(self.remaining());
        self.cursor += step;
        Ok(step)
    }

    /// Skips to the end of the window.
    pub fn skip_all(&mut self) -> Result<u64> {
        self.skip(self.remaining())
    }

    /// Copies exactly `buf.len()` bytes (already clamped to the window) and
    /// advances the cursor by what was obtained.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let got = match &self.backing {
            Backing::Materialized(data) => {
                let at = self.cursor as usize;
                buf.copy_from_slice(&data[at..at + buf.len()]);
                buf.len()
            }
            Backing::Streaming { source, start } => {
                let target = start + self.cursor;
                let mut guard = source.lock()?;
                let landed = guard.seek_to(target)?;
                trace!("Repositioned source to {} (wanted {})", landed, target);
                if landed == target {
                    utils::read_up_to(&mut *guard, buf)?
                } else {
                    0
                }
            }
            Backing::Released => return Err(RiffError::ViewClosed),
        };
        self.cursor += got as u64;
        if got < buf.len() {
            return Err(RiffError::DataTruncated {
                expected: buf.len() as u64,
                found: got as u64,
            });
        }
        Ok(got)
    }
}

impl<S: Source> Source for BoundedView<S> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.read_into(buf)
    }

    fn position(&mut self) -> Result<u64> {
        self.ensure_open()?;
        Ok(self.cursor)
    }

    fn seek_to(&mut self, pos: u64) -> Result<u64> {
        if !self.is_seekable() {
            self.ensure_open()?;
            return Err(RiffError::NotSeekable);
        }
        self.cursor = pos.min(self.size);
        Ok(self.cursor)
    }

    fn is_seekable(&self) -> bool {
        match &self.backing {
            Backing::Materialized(_) => true,
            Backing::Streaming { source, .. } => source.lock().map(|s| s.is_seekable()).unwrap_or(false),
            Backing::Released => false,
        }
    }

    fn remaining(&self) -> Option<u64> {
        Some(self.size - self.cursor)
    }
}

impl<S: Source> io::Read for BoundedView<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_into(buf)?)
    }
}

/// Seeking follows the view's clamping rules: a target before the start or
/// past the end lands on the nearest edge instead of failing.
impl<S> io::Seek for BoundedView<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (offset, whence) = Whence::split(pos);
        Ok(BoundedView::seek(self, offset, whence)?)
    }
}

impl<S> fmt::Debug for BoundedView<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedView")
            .field("mode", &self.mode)
            .field("size", &self.size)
            .field("cursor", &self.cursor)
            .field("closed", &self.is_closed())
            .finish()
    }
}

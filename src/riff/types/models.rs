//! Core data structures for RIFF chunk framing.
//!
//! This module defines the value types shared by every layer:
//! - Four-character tags and decoded chunk headers
//! - The construction mode of payload views
//! - Seek origins and transfer options

use std::fmt;
use std::io::SeekFrom;
use std::str::FromStr;

use super::error::{Result, RiffError};

/// A four-character chunk identifier (FourCC).
///
/// Always exactly four ASCII bytes. Tags read off the wire are checked by the
/// header codec; tags built by callers are checked on conversion.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag([u8; 4]);

impl Tag {
    /// The reserved tag of a container chunk.
    pub const RIFF: Tag = Tag(*b"RIFF");

    /// The conventional tag of a nested list chunk. Not interpreted by the decoder.
    pub const LIST: Tag = Tag(*b"LIST");

    /// Builds a tag from raw bytes, rejecting anything that is not ASCII.
    pub fn from_bytes(bytes: [u8; 4]) -> Option<Self> {
        bytes.is_ascii().then_some(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Construction guarantees ASCII, which is always valid UTF-8.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?})", self.as_str())
    }
}

impl TryFrom<&str> for Tag {
    type Error = RiffError;

    fn try_from(s: &str) -> Result<Self> {
        let bytes: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| RiffError::InvalidTag(s.to_string()))?;
        Self::from_bytes(bytes).ok_or_else(|| RiffError::InvalidTag(s.to_string()))
    }
}

impl FromStr for Tag {
    type Err = RiffError;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_from(s)
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// The 8-byte framing in front of every chunk.
///
/// `size` counts payload bytes only: it excludes the header itself and the
/// trailing pad byte of odd-sized chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub tag: Tag,
    pub size: u32,
}

impl ChunkHeader {
    pub fn new(tag: Tag, size: u32) -> Self {
        Self { tag, size }
    }

    /// Whether a pad byte follows the payload.
    pub fn padded(&self) -> bool {
        self.size % 2 != 0
    }

    /// Total bytes the chunk occupies on the wire: header, payload and pad.
    pub fn encoded_len(&self) -> u64 {
        8 + u64::from(self.size) + u64::from(self.padded())
    }
}

/// How a payload view is constructed from its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Copy the payload out of the source now; the view owns its bytes.
    Materialized,
    /// Skip over the payload now and read it from the source on demand.
    #[default]
    Streaming,
}

/// Origin of a bounded view seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Start,
    Current,
    End,
}

impl Whence {
    /// Splits a std seek target into an offset and its origin.
    ///
    /// `SeekFrom::Start` offsets beyond `i64::MAX` saturate; a bounded view
    /// clamps them to its end either way.
    pub fn split(pos: SeekFrom) -> (i64, Whence) {
        match pos {
            SeekFrom::Start(n) => (i64::try_from(n).unwrap_or(i64::MAX), Whence::Start),
            SeekFrom::Current(n) => (n, Whence::Current),
            SeekFrom::End(n) => (n, Whence::End),
        }
    }
}

impl From<SeekFrom> for Whence {
    fn from(pos: SeekFrom) -> Self {
        Self::split(pos).1
    }
}

impl TryFrom<i32> for Whence {
    type Error = RiffError;

    /// Maps the classic `SEEK_SET`/`SEEK_CUR`/`SEEK_END` values.
    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::Start),
            1 => Ok(Self::Current),
            2 => Ok(Self::End),
            other => Err(RiffError::InvalidSeekWhence(other)),
        }
    }
}

/// Default transfer buffer size, in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Tuning for bulk payload transfers.
///
/// The buffer size bounds peak memory when copying payloads during encode
/// and when materializing a payload from its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    pub buffer_size: usize,
}

impl TransferOptions {
    /// Sets the transfer buffer size. Zero is treated as one byte.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub(crate) fn buffer_len(&self) -> usize {
        self.buffer_size.max(1)
    }
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self { buffer_size: DEFAULT_BUFFER_SIZE }
    }
}

//! Custom error types for the riff-chunk crate.

use thiserror::Error;

use super::models::Tag;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum RiffError {
    /// An error originating from the underlying reader or writer.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// Fewer than 8 bytes were available where a chunk header was expected.
    #[error("chunk header truncated: expected 8 bytes, found {found}")]
    HeaderTruncated { found: usize },

    /// The tag bytes of a chunk header are not ASCII, usually meaning the
    /// stream is misaligned or corrupted.
    #[error("chunk tag not ascii-decodable: {0:02x?}")]
    TagNotDecodable([u8; 4]),

    /// The payload ended before the declared or requested number of bytes.
    #[error("chunk data truncated: expected {expected} bytes, found {found}")]
    DataTruncated { expected: u64, found: u64 },

    /// An odd-sized chunk is missing its trailing pad byte.
    #[error("chunk pad byte truncated")]
    PadTruncated,

    /// The pad byte was accessed before the payload was fully consumed.
    #[error("chunk data not consumed: {remaining} payload bytes remain before the pad")]
    DataNotConsumed { remaining: u64 },

    /// Encoding requires an unread chunk.
    #[error("chunk partially consumed: payload cursor is at {position}, expected 0")]
    ChunkPartiallyConsumed { position: u64 },

    /// The operation requires repositioning a source that is forward-only.
    #[error("source is not seekable")]
    NotSeekable,

    /// A raw whence value other than 0, 1 or 2.
    #[error("invalid whence ({0}, should be 0, 1 or 2)")]
    InvalidSeekWhence(i32),

    /// A container was expected but the chunk carries another tag.
    #[error("chunk tag '{found}' != '{expected}'")]
    TagMismatch { expected: Tag, found: Tag },

    /// The container payload is too short to hold its form type.
    #[error("chunk format truncated")]
    FormatTruncated,

    /// The form type bytes of a container are not ASCII.
    #[error("chunk format not ascii-decodable: {0:02x?}")]
    FormatNotDecodable([u8; 4]),

    /// A caller-supplied tag is not exactly four ASCII bytes.
    #[error("invalid chunk tag {0:?}: must be exactly 4 ASCII bytes")]
    InvalidTag(String),

    /// A chunk declares more payload than its parent has left.
    #[error("chunk '{tag}' overruns its parent: declares {declared} bytes, {available} available")]
    ChunkOverrun { tag: Tag, declared: u32, available: u64 },

    /// An encoded size does not fit the 32-bit size field.
    #[error("encoded chunk size {0} exceeds the 32-bit size field")]
    SizeOverflow(u64),

    /// A bounded view was used after `close()`.
    #[error("chunk data closed")]
    ViewClosed,

    /// A mutex lock was poisoned, indicating a panic in another thread holding the lock.
    #[error("A mutex lock was poisoned, indicating a panic in another thread holding the lock.")]
    LockPoisoned,
}

/// A convenience `Result` type alias using the crate's `RiffError` type.
pub type Result<T> = std::result::Result<T, RiffError>;

impl From<RiffError> for std::io::Error {
    fn from(err: RiffError) -> Self {
        match err {
            RiffError::Io(e) => e,
            RiffError::DataTruncated { .. } | RiffError::PadTruncated => {
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, err)
            }
            other => std::io::Error::other(other),
        }
    }
}

//! # riff-chunk
//!
//! A decoder and encoder for RIFF-style chunk containers: tagged,
//! length-prefixed, even-aligned chunks, optionally grouped under a `RIFF`
//! container with a form type.
//!
//! Every chunk payload is exposed as a [`BoundedView`]: a window over exactly
//! the declared bytes with its own cursor, either copied out up front
//! ([`ReadMode::Materialized`]) or read lazily from the shared source
//! ([`ReadMode::Streaming`]).
//!
//! ```
//! use riff_chunk::{ReadMode, RiffChunk, SharedSource};
//!
//! let bytes = b"RIFF\x10\x00\x00\x00MOCKCNKA\x04\x00\x00\x00AAAA".to_vec();
//! let source = SharedSource::from_bytes(bytes);
//! let mut riff = RiffChunk::decode(&source, ReadMode::Streaming).unwrap();
//! assert_eq!(riff.form_type(), "MOCK");
//! let chunk = &mut riff.subchunks_mut()[0];
//! assert_eq!(chunk.data_mut().read_all().unwrap(), b"AAAA");
//! ```
pub mod riff;

// Re-export the main types for convenience
pub use riff::{
    BoundedView,
    Chunk,
    ChunkHeader,
    MemorySource,
    PadState,
    ReadMode,
    Result,
    RiffChunk,
    RiffError,
    SeekableSource,
    SequentialSource,
    SharedSource,
    Source,
    Subchunk,
    Subchunks,
    Tag,
    TransferOptions,
    Whence,
};

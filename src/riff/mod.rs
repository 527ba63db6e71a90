//! Core RIFF chunk module

pub mod format;
pub mod iter;
pub mod stream;
pub mod types;
mod utils;

pub use format::chunk::Chunk;
pub use format::container::{RiffChunk, Subchunk};
pub use format::pad::{PadSource, PadState};
pub use iter::Subchunks;
pub use stream::source::{MemorySource, SeekableSource, SequentialSource, SharedSource, Source};
pub use stream::view::BoundedView;
pub use types::error::{Result, RiffError};
pub use types::models::{ChunkHeader, ReadMode, Tag, TransferOptions, Whence, DEFAULT_BUFFER_SIZE};

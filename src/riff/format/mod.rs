//! Chunk framing layer.
//!
//! This module sits between the byte-level [`stream`](crate::riff::stream)
//! layer and the caller. It turns bytes into chunks and chunks back into bytes.
//!
//! # Module Organization
//!
//! - [`header`]: the 8-byte tag + size header codec
//! - [`pad`]: the at-most-once pad byte state machine
//! - [`chunk`]: single chunk decode/encode
//! - [`container`]: `RIFF` containers and their subchunks
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐
//! │  "RIFF" + size  │ ← header::decode()
//! ├─────────────────┤
//! │  Form type      │ ← container::RiffChunk::decode()
//! ├─────────────────┤
//! │  Subchunk 1     │ ← chunk::Chunk::decode()  (payload → BoundedView)
//! │  [pad]          │ ← pad::PadState
//! ├─────────────────┤
//! │  Subchunk 2 ... │
//! └─────────────────┘
//! ```

pub mod chunk;
pub mod container;
pub mod header;
pub mod pad;

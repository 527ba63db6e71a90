//! Chunk header encoding and decoding.
//!
//! # Header Structure
//! ```text
//! [4 bytes] Tag (ASCII)
//! [4 bytes] Payload size (little-endian u32, excludes header and pad)
//! ```

use std::io::Write;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use log::trace;

use crate::riff::stream::source::Source;
use crate::riff::types::error::{Result, RiffError};
use crate::riff::types::models::{ChunkHeader, Tag};
use crate::riff::utils;

/// Size of an encoded chunk header.
pub const HEADER_SIZE: usize = 8;

/// Size of a tag, and of a container's form type.
pub const TAG_SIZE: usize = 4;

/// Decodes a chunk header from the next 8 bytes of `source`.
///
/// Consumes exactly those 8 bytes whatever size the header declares; the
/// payload is left untouched.
///
/// # Errors
/// - [`RiffError::HeaderTruncated`] if fewer than 8 bytes are available,
///   including when `source` is a streaming view whose own source ends early
/// - [`RiffError::TagNotDecodable`] if the tag bytes are not ASCII
pub fn decode<S: Source + ?Sized>(source: &mut S) -> Result<ChunkHeader> {
    let mut bytes = [0u8; HEADER_SIZE];
    // A bounded view whose own source ran dry reports the shortfall as data.
    let found = match utils::read_up_to(source, &mut bytes) {
        Ok(found) => found,
        Err(RiffError::DataTruncated { found, .. }) => found as usize,
        Err(e) => return Err(e),
    };
    if found < HEADER_SIZE {
        return Err(RiffError::HeaderTruncated { found });
    }
    trace!("Header bytes: {:02x?}", bytes);
    ChunkHeader::from_bytes(&bytes)
}

/// Writes the 8 header bytes verbatim.
pub fn encode<W: Write + ?Sized>(header: &ChunkHeader, sink: &mut W) -> Result<()> {
    sink.write_all(header.tag.as_bytes())?;
    sink.write_u32::<LittleEndian>(header.size)?;
    Ok(())
}

/// Decodes a 4-byte ASCII tag, or `None` if the bytes are not ASCII.
pub(crate) fn decode_tag(bytes: &[u8]) -> Option<Tag> {
    let raw: [u8; TAG_SIZE] = bytes.get(..TAG_SIZE)?.try_into().ok()?;
    Tag::from_bytes(raw)
}

impl ChunkHeader {
    /// Parses a header from the first 8 bytes of an in-memory buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(RiffError::HeaderTruncated { found: bytes.len() });
        }
        let tag = decode_tag(&bytes[..TAG_SIZE]).ok_or_else(|| {
            let mut raw = [0u8; TAG_SIZE];
            raw.copy_from_slice(&bytes[..TAG_SIZE]);
            RiffError::TagNotDecodable(raw)
        })?;
        let size = LittleEndian::read_u32(&bytes[TAG_SIZE..HEADER_SIZE]);
        Ok(Self { tag, size })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..TAG_SIZE].copy_from_slice(self.tag.as_bytes());
        LittleEndian::write_u32(&mut bytes[TAG_SIZE..], self.size);
        bytes
    }
}

//! RIFF container chunks.
//!
//! # Container Structure
//! ```text
//! [4 bytes] "RIFF"
//! [4 bytes] Payload size (little-endian u32)
//! [4 bytes] Form type (ASCII, e.g. "WAVE", "AVI ")
//! [N bytes] Subchunks, back to back, each padded to an even length
//! ```
//!
//! Nested containers are not resolved here: a `LIST` (or inner `RIFF`)
//! subchunk comes back as an ordinary [`Chunk`] for the caller to interpret.

use std::fmt;
use std::io::Write;

use log::{debug, info};

use super::chunk::Chunk;
use super::header::{self, TAG_SIZE};
use crate::riff::iter::Subchunks;
use crate::riff::stream::source::{SharedSource, Source};
use crate::riff::stream::view::BoundedView;
use crate::riff::types::error::{Result, RiffError};
use crate::riff::types::models::{ChunkHeader, ReadMode, Tag, TransferOptions};

/// A subchunk of a container: its payload is a window of the container's payload.
pub type Subchunk<S> = Chunk<BoundedView<S>>;

/// A decoded `RIFF` chunk: form type plus subchunks in encounter order.
pub struct RiffChunk<S> {
    header: ChunkHeader,
    form_type: Tag,
    subchunks: Vec<Subchunk<S>>,
}

impl<S: Source> RiffChunk<S> {
    /// Builds a container around existing subchunks, computing its size.
    ///
    /// # Errors
    /// [`RiffError::SizeOverflow`] if the encoded payload exceeds the 32-bit size field.
    pub fn new(form_type: Tag, subchunks: Vec<Subchunk<S>>) -> Result<Self> {
        let size = payload_len(&subchunks);
        let size = u32::try_from(size).map_err(|_| RiffError::SizeOverflow(size))?;
        Ok(Self {
            header: ChunkHeader::new(Tag::RIFF, size),
            form_type,
            subchunks,
        })
    }

    /// Decodes a container starting at the current position of `source`.
    ///
    /// # Errors
    /// - [`RiffError::TagMismatch`] if the chunk is not tagged `RIFF`. Nothing
    ///   past the 8 header bytes has been read at that point.
    /// - [`RiffError::FormatTruncated`] if the payload cannot hold a form type
    /// - [`RiffError::FormatNotDecodable`] if the form type is not ASCII
    /// - any error of [`Chunk::decode`], for the container or its subchunks
    pub fn decode(source: &SharedSource<S>, mode: ReadMode) -> Result<Self> {
        Self::decode_with(source, mode, &TransferOptions::default())
    }

    pub fn decode_with(source: &SharedSource<S>, mode: ReadMode, options: &TransferOptions) -> Result<Self> {
        let mut guard = source.lock()?;
        let header = header::decode(&mut *guard)?;
        if header.tag != Tag::RIFF {
            return Err(RiffError::TagMismatch {
                expected: Tag::RIFF,
                found: header.tag,
            });
        }
        let mut payload = Chunk::from_header(source, &mut *guard, header, mode, options)?.into_data();
        // Streaming subchunks lock the source through the payload view.
        drop(guard);

        let form_type = read_form_type(&mut payload)?;
        debug!("Container form type: '{}'", form_type);

        let subchunks = Subchunks::with_options(SharedSource::new(payload), mode, *options)
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Decoded RIFF container: form='{}', size={}, {} subchunks",
            form_type,
            header.size,
            subchunks.len()
        );

        Ok(Self {
            header,
            form_type,
            subchunks,
        })
    }

    pub fn header(&self) -> &ChunkHeader {
        &self.header
    }

    /// Declared payload size: form type plus all encoded subchunks.
    pub fn size(&self) -> u32 {
        self.header.size
    }

    pub fn form_type(&self) -> Tag {
        self.form_type
    }

    pub fn subchunks(&self) -> &[Subchunk<S>] {
        &self.subchunks
    }

    pub fn subchunks_mut(&mut self) -> &mut [Subchunk<S>] {
        &mut self.subchunks
    }

    pub fn into_subchunks(self) -> Vec<Subchunk<S>> {
        self.subchunks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Subchunk<S>> {
        self.subchunks.iter()
    }

    /// First subchunk carrying `tag`.
    pub fn find(&self, tag: Tag) -> Option<&Subchunk<S>> {
        self.subchunks.iter().find(|chunk| chunk.tag() == tag)
    }

    pub fn find_mut(&mut self, tag: Tag) -> Option<&mut Subchunk<S>> {
        self.subchunks.iter_mut().find(|chunk| chunk.tag() == tag)
    }

    /// Writes the container header, form type and every subchunk to `sink`.
    ///
    /// The size field is recomputed from the subchunks. Every subchunk must
    /// be unread; this is checked before anything is written.
    ///
    /// # Errors
    /// - [`RiffError::ChunkPartiallyConsumed`] if a subchunk was already read from
    /// - [`RiffError::SizeOverflow`] if the payload exceeds the 32-bit size field
    pub fn encode<W: Write + ?Sized>(&mut self, sink: &mut W, options: &TransferOptions) -> Result<u64> {
        if let Some(chunk) = self.subchunks.iter().find(|chunk| chunk.data().tell() != 0) {
            return Err(RiffError::ChunkPartiallyConsumed {
                position: chunk.data().tell(),
            });
        }
        let size = payload_len(&self.subchunks);
        let size = u32::try_from(size).map_err(|_| RiffError::SizeOverflow(size))?;
        let header = ChunkHeader::new(Tag::RIFF, size);

        header::encode(&header, sink)?;
        sink.write_all(self.form_type.as_bytes())?;
        let mut written = (header::HEADER_SIZE + TAG_SIZE) as u64;
        for chunk in &mut self.subchunks {
            written += chunk.encode(sink, options)?;
        }
        self.header = header;
        Ok(written)
    }
}

fn payload_len<S>(subchunks: &[Subchunk<S>]) -> u64 {
    TAG_SIZE as u64 + subchunks.iter().map(|chunk| chunk.header().encoded_len()).sum::<u64>()
}

fn read_form_type<S: Source>(payload: &mut BoundedView<S>) -> Result<Tag> {
    let bytes = match payload.read(TAG_SIZE) {
        Ok(bytes) => bytes,
        Err(RiffError::DataTruncated { .. }) => return Err(RiffError::FormatTruncated),
        Err(e) => return Err(e),
    };
    if bytes.len() < TAG_SIZE {
        return Err(RiffError::FormatTruncated);
    }
    header::decode_tag(&bytes).ok_or_else(|| {
        let mut raw = [0u8; TAG_SIZE];
        raw.copy_from_slice(&bytes);
        RiffError::FormatNotDecodable(raw)
    })
}

impl<'a, S> IntoIterator for &'a RiffChunk<S> {
    type Item = &'a Subchunk<S>;
    type IntoIter = std::slice::Iter<'a, Subchunk<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.subchunks.iter()
    }
}

impl<S> fmt::Debug for RiffChunk<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiffChunk")
            .field("size", &self.header.size)
            .field("form_type", &self.form_type)
            .field("subchunks", &self.subchunks)
            .finish()
    }
}

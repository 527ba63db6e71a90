//! Single chunk decoding and encoding.
//!
//! A [`Chunk`] ties together a decoded [`ChunkHeader`], a [`BoundedView`]
//! over exactly `size` payload bytes and the [`PadState`] of its trailing
//! alignment byte.

use std::fmt;
use std::io::Write;

use log::{debug, trace};

use super::header;
use super::pad::{PadSource, PadState};
use crate::riff::stream::source::{SharedSource, Source};
use crate::riff::stream::view::BoundedView;
use crate::riff::types::error::{Result, RiffError};
use crate::riff::types::models::{ChunkHeader, ReadMode, Tag, TransferOptions};
use crate::riff::utils;

/// A tagged, length-prefixed unit of data with its payload view.
pub struct Chunk<S> {
    header: ChunkHeader,
    data: BoundedView<S>,
    pad: PadState<S>,
}

impl<S> Chunk<S> {
    pub fn header(&self) -> &ChunkHeader {
        &self.header
    }

    pub fn tag(&self) -> Tag {
        self.header.tag
    }

    /// Declared payload size, excluding header and pad.
    pub fn size(&self) -> u32 {
        self.header.size
    }

    /// The payload view.
    pub fn data(&self) -> &BoundedView<S> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut BoundedView<S> {
        &mut self.data
    }

    pub fn padded(&self) -> bool {
        self.pad.is_padded()
    }

    pub fn pad_state(&self) -> &PadState<S> {
        &self.pad
    }

    /// True once the payload is exhausted and the pad (if any) has been consumed.
    pub fn consumed(&self) -> bool {
        self.data.is_exhausted() && self.pad.is_consumed()
    }

    /// Gives up the chunk, keeping only its payload view.
    pub fn into_data(self) -> BoundedView<S> {
        self.data
    }
}

impl<S: Source> Chunk<S> {
    /// Builds a chunk over `size` bytes taken from `source` at its current position.
    ///
    /// The chunk is not backed by an encoded stream, so an odd size gets the
    /// default pad byte and no pad I/O ever happens.
    pub fn create(tag: Tag, size: u32, source: &SharedSource<S>, mode: ReadMode) -> Result<Self> {
        let mut guard = source.lock()?;
        let data = BoundedView::carve(source, &mut *guard, u64::from(size), mode, &TransferOptions::default())?;
        Ok(Self {
            header: ChunkHeader::new(tag, size),
            data,
            pad: PadState::for_size(size, PadSource::Default),
        })
    }

    /// Builds a chunk over bytes held in memory.
    ///
    /// # Errors
    /// [`RiffError::SizeOverflow`] if `data` does not fit a 32-bit size field.
    pub fn from_bytes(tag: Tag, data: Vec<u8>) -> Result<Self> {
        let size = u32::try_from(data.len()).map_err(|_| RiffError::SizeOverflow(data.len() as u64))?;
        Ok(Self {
            header: ChunkHeader::new(tag, size),
            data: BoundedView::from_bytes(data),
            pad: PadState::for_size(size, PadSource::Default),
        })
    }

    /// Decodes the chunk starting at the current position of `source`.
    ///
    /// On success `source` is positioned after the chunk's pad slot, ready
    /// for the next chunk.
    ///
    /// # Errors
    /// - [`RiffError::HeaderTruncated`] / [`RiffError::TagNotDecodable`] from the header
    /// - [`RiffError::ChunkOverrun`] if `source` is bounded and too short for the payload
    /// - [`RiffError::DataTruncated`] if a materialized payload is cut short
    /// - [`RiffError::NotSeekable`] for streaming mode over a forward-only source
    pub fn decode(source: &SharedSource<S>, mode: ReadMode) -> Result<Self> {
        Self::decode_with(source, mode, &TransferOptions::default())
    }

    pub fn decode_with(source: &SharedSource<S>, mode: ReadMode, options: &TransferOptions) -> Result<Self> {
        let mut guard = source.lock()?;
        let header = header::decode(&mut *guard)?;
        Self::from_header(source, &mut *guard, header, mode, options)
    }

    /// Carves the payload and pad of a chunk whose header was just read from `source`.
    pub(crate) fn from_header(
        handle: &SharedSource<S>,
        source: &mut S,
        header: ChunkHeader,
        mode: ReadMode,
        options: &TransferOptions,
    ) -> Result<Self> {
        if let Some(available) = source.remaining()
            && u64::from(header.size) > available
        {
            return Err(RiffError::ChunkOverrun {
                tag: header.tag,
                declared: header.size,
                available,
            });
        }

        let data = BoundedView::carve(handle, source, u64::from(header.size), mode, options)?;

        let pad = if !header.padded() {
            PadState::NotPadded
        } else {
            match mode {
                ReadMode::Materialized => {
                    let mut byte = [0u8; 1];
                    let captured = (utils::read_up_to(source, &mut byte)? == 1).then_some(byte[0]);
                    trace!("Captured pad byte: {:?}", captured);
                    PadState::Pending(PadSource::Captured(captured))
                }
                ReadMode::Streaming => {
                    let offset = source.position()?;
                    source.seek_to(offset.saturating_add(1))?;
                    PadState::Pending(PadSource::Live {
                        source: handle.clone(),
                        offset,
                    })
                }
            }
        };

        debug!("Decoded chunk '{}' ({} bytes, {:?}, pad {:?})", header.tag, header.size, mode, pad);
        Ok(Self { header, data, pad })
    }

    /// Reads the pad byte after the payload has been consumed.
    ///
    /// Returns `Some(byte)` the first time a pad is resolved and `None` if the
    /// chunk is not padded or the pad was already read or skipped.
    ///
    /// # Errors
    /// - [`RiffError::DataNotConsumed`] if payload bytes remain
    /// - [`RiffError::PadTruncated`] if the pad byte is missing from the source
    pub fn read_pad(&mut self) -> Result<Option<u8>> {
        self.pad.consume(self.data.remaining())
    }

    /// Same as [`read_pad`](Self::read_pad), discarding the byte.
    pub fn skip_pad(&mut self) -> Result<()> {
        self.pad.consume(self.data.remaining()).map(|_| ())
    }

    /// Skips whatever is left of the payload, then the pad.
    pub fn skip(&mut self) -> Result<()> {
        self.data.skip_all()?;
        self.skip_pad()
    }

    /// Writes header, payload and pad to `sink`, returning the bytes written.
    ///
    /// The payload is copied through a buffer of `options.buffer_size` bytes and
    /// is left fully consumed afterwards. The pad state is not changed.
    ///
    /// # Errors
    /// - [`RiffError::ChunkPartiallyConsumed`] if any payload byte was already
    ///   read. Checked before anything is written.
    /// - [`RiffError::DataTruncated`] if a streaming payload runs short. The
    ///   header and the payload bytes copied so far are already in `sink`.
    pub fn encode<W: Write + ?Sized>(&mut self, sink: &mut W, options: &TransferOptions) -> Result<u64> {
        let position = self.data.tell();
        if position != 0 {
            return Err(RiffError::ChunkPartiallyConsumed { position });
        }

        header::encode(&self.header, sink)?;

        let buf_len = usize::try_from(self.data.size())
            .unwrap_or(usize::MAX)
            .min(options.buffer_len());
        let mut buf = vec![0u8; buf_len];
        while !self.data.is_exhausted() {
            let n = self.data.read_into(&mut buf)?;
            sink.write_all(&buf[..n])?;
        }

        if self.header.padded() {
            sink.write_all(&[self.pad.recorded_byte()?])?;
        }

        trace!("Encoded chunk '{}' as {} bytes", self.header.tag, self.header.encoded_len());
        Ok(self.header.encoded_len())
    }
}

impl<S> fmt::Debug for Chunk<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("tag", &self.header.tag)
            .field("size", &self.header.size)
            .field("data", &self.data)
            .field("pad", &self.pad)
            .finish()
    }
}

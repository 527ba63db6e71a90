//! Pad byte tracking for odd-sized chunks.
//!
//! Every chunk occupies an even number of bytes on the wire, so an odd-sized
//! payload is followed by one alignment byte. [`PadState`] makes sure that
//! byte is consumed at most once, and only after the payload itself.
//!
//! ```text
//! size even ──────────────────────────► NotPadded   (consumed from the start)
//! size odd  ──► Pending ──read/skip──► Consumed    (terminal)
//! ```

use std::fmt;

use log::{debug, trace};

use crate::riff::stream::source::{SharedSource, Source};
use crate::riff::types::error::{Result, RiffError};

/// Value written for a pad byte when no other byte was recorded.
pub const DEFAULT_PAD_BYTE: u8 = 0x00;

/// Where a pending pad byte comes from.
pub enum PadSource<S> {
    /// The chunk was built in memory; the pad is the default byte, no I/O.
    Default,
    /// Captured while materializing the chunk. `None` if the source ended
    /// before the pad byte.
    Captured(Option<u8>),
    /// Still in the source at this absolute offset, read on first consumption.
    Live { source: SharedSource<S>, offset: u64 },
}

/// Consumption state of a chunk's pad byte.
pub enum PadState<S> {
    /// Even-sized payload; there is no pad and nothing left to consume.
    NotPadded,
    Pending(PadSource<S>),
    /// The pad byte has been read or skipped. Holds the byte observed.
    Consumed(u8),
}

impl<S> PadState<S> {
    pub fn is_padded(&self) -> bool {
        !matches!(self, Self::NotPadded)
    }

    pub fn is_consumed(&self) -> bool {
        !matches!(self, Self::Pending(_))
    }
}

impl<S: Source> PadState<S> {
    pub fn for_size(size: u32, source: PadSource<S>) -> Self {
        if size % 2 == 0 {
            Self::NotPadded
        } else {
            Self::Pending(source)
        }
    }

    /// Resolves the pad byte once the payload has been fully consumed.
    ///
    /// Returns the byte on the resolving call and `None` on every later call,
    /// or when the chunk is not padded at all.
    ///
    /// # Errors
    /// - [`RiffError::DataNotConsumed`] if `payload_remaining` is not zero
    /// - [`RiffError::PadTruncated`] if a live source is missing the pad byte
    pub fn consume(&mut self, payload_remaining: u64) -> Result<Option<u8>> {
        if payload_remaining != 0 {
            return Err(RiffError::DataNotConsumed { remaining: payload_remaining });
        }
        let Self::Pending(source) = self else {
            return Ok(None);
        };
        let byte = match source {
            PadSource::Default => DEFAULT_PAD_BYTE,
            PadSource::Captured(byte) => byte.ok_or(RiffError::PadTruncated)?,
            PadSource::Live { source, offset } => {
                let mut guard = source.lock()?;
                fetch(&mut *guard, *offset)?.ok_or(RiffError::PadTruncated)?
            }
        };
        debug!("Pad byte consumed: {:#04x}", byte);
        *self = Self::Consumed(byte);
        Ok(Some(byte))
    }

    /// The byte to emit when re-encoding: whatever was observed, else the default.
    ///
    /// A live pad that has not been consumed yet is peeked without changing
    /// state; the source is put back where it was.
    pub fn recorded_byte(&self) -> Result<u8> {
        match self {
            Self::NotPadded | Self::Pending(PadSource::Default) => Ok(DEFAULT_PAD_BYTE),
            Self::Consumed(byte) => Ok(*byte),
            Self::Pending(PadSource::Captured(byte)) => Ok(byte.unwrap_or(DEFAULT_PAD_BYTE)),
            Self::Pending(PadSource::Live { source, offset }) => {
                let mut guard = source.lock()?;
                let restore = guard.position()?;
                let byte = fetch(&mut *guard, *offset)?;
                guard.seek_to(restore)?;
                Ok(byte.unwrap_or(DEFAULT_PAD_BYTE))
            }
        }
    }
}

fn fetch<S: Source + ?Sized>(source: &mut S, offset: u64) -> Result<Option<u8>> {
    if source.seek_to(offset)? != offset {
        trace!("Pad offset {} lies past the end of the source", offset);
        return Ok(None);
    }
    let mut byte = [0u8; 1];
    Ok(match source.read(&mut byte)? {
        0 => None,
        _ => Some(byte[0]),
    })
}

impl<S> fmt::Debug for PadState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPadded => f.write_str("NotPadded"),
            Self::Pending(PadSource::Default) => f.write_str("Pending(Default)"),
            Self::Pending(PadSource::Captured(byte)) => write!(f, "Pending(Captured({:?}))", byte),
            Self::Pending(PadSource::Live { offset, .. }) => write!(f, "Pending(Live @ {})", offset),
            Self::Consumed(byte) => write!(f, "Consumed({:#04x})", byte),
        }
    }
}

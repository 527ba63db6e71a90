//! Low-level byte reading utilities

use super::stream::source::Source;
use super::types::error::Result;

/// Fill as much of `buf` as the source can provide.
///
/// Keeps reading through short reads and stops only at end of data, so a
/// return value below `buf.len()` always means the source ran dry.
pub fn read_up_to<S: Source + ?Sized>(source: &mut S, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

/// Read up to `len` bytes into a fresh buffer, growing it `step` bytes at a time.
///
/// Used where `len` comes from an untrusted size field: a short source is
/// detected before the full declared length is ever allocated.
pub fn read_vec_up_to<S: Source + ?Sized>(source: &mut S, len: u64, step: usize) -> Result<Vec<u8>> {
    let step = step.max(1);
    let mut data = Vec::new();
    while (data.len() as u64) < len {
        let want = (len - data.len() as u64).min(step as u64) as usize;
        let start = data.len();
        data.resize(start + want, 0);
        let got = read_up_to(source, &mut data[start..])?;
        data.truncate(start + got);
        if got < want {
            break;
        }
    }
    Ok(data)
}

//! The four straight-line field codecs (spec §4.5): AUX, ID, PAIR, QUAL.
//!
//! Each concatenates one or more fields per record into a single buffer
//! with tab/newline separators, then hands the whole buffer to a framed
//! block (spec §4.3). AUX and PAIR use the zlib-framed layout; ID and QUAL
//! use the range-framed layout (fixed choices, spec §4.5).

pub mod aux;
pub mod id;
pub mod pair;
pub mod qual;

use std::io::{Read, Write};

use crate::error::{Error, FormatError, Result};
use crate::io::{read_u64_be, write_u64_be};

/// Writes the 8-byte ASCII magic + `u64` record count shared by every
/// sub-block (spec §4.5, §6).
pub(crate) fn write_sub_block_header<W: Write>(w: &mut W, magic: &[u8; 8], rec_cnt: u64) -> Result<()> {
    w.write_all(magic)?;
    write_u64_be(w, rec_cnt)?;
    Ok(())
}

/// Reads and validates a sub-block's magic + record count, returning the
/// record count.
pub(crate) fn read_sub_block_header<R: Read>(r: &mut R, expected: &'static str, offset: u64) -> Result<u64> {
    let mut magic = [0u8; 8];
    crate::io::read_exact_at(r, &mut magic, offset)?;
    if &magic != expected.as_bytes() {
        return Err(Error::Format(FormatError::BadSubBlockId {
            expected,
            found: String::from_utf8_lossy(&magic).into_owned(),
            offset,
        }));
    }
    read_u64_be(r, offset + 8)
}

/// Splits `buf` on `\n`, returning each line with the trailing separator
/// dropped. Used by the decoder side of every field codec.
pub(crate) fn split_lines(buf: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, &b) in buf.iter().enumerate() {
        if b == b'\n' {
            lines.push(&buf[start..i]);
            start = i + 1;
        }
    }
    lines
}

/// Parses a decimal ASCII integer field, defaulting an empty field to `0`
/// (spec §4.5: "empty integer fields decode to 0").
pub(crate) fn parse_decimal_or_zero<T>(text: &[u8]) -> T
where
    T: std::str::FromStr + Default,
{
    if text.is_empty() {
        return T::default();
    }
    std::str::from_utf8(text).ok().and_then(|s| s.parse::<T>().ok()).unwrap_or_default()
}

/// Returns `"*"` for an empty string field, per spec §4.5 ("empty strings
/// decode to `\"*\"`").
pub(crate) fn string_or_star(text: &[u8]) -> String {
    if text.is_empty() {
        "*".to_string()
    } else {
        String::from_utf8_lossy(text).into_owned()
    }
}

//! Framed block helpers (spec §4.3): the two on-disk layouts shared by the
//! field codecs (§4.5) and the NUC codec's thirteen streams (§4.6.6).

use std::io::{Read, Write};

use crate::entropy::range::{range_o1_compress, range_o1_decompress};
use crate::entropy::zlib::{zlib_compress, zlib_decompress};
use crate::error::{Error, FormatError, Result};
use crate::io::{read_u64_be, write_u64_be};

/// `u64 uncompressed_sz || u64 compressed_sz || u64 crc || bytes[compressed_sz]`
pub fn write_zlib_framed<W: Write>(w: &mut W, buf: &[u8]) -> Result<()> {
    let compressed = zlib_compress(buf)?;
    let crc = crate::io::crc64(&compressed);
    write_u64_be(w, buf.len() as u64)?;
    write_u64_be(w, compressed.len() as u64)?;
    write_u64_be(w, crc)?;
    w.write_all(&compressed)?;
    Ok(())
}

/// Reads back a buffer written by [`write_zlib_framed`], verifying its CRC.
pub fn read_zlib_framed<R: Read>(r: &mut R, offset: u64) -> Result<Vec<u8>> {
    let uncompressed_sz = read_u64_be(r, offset)?;
    let compressed_sz = read_u64_be(r, offset + 8)?;
    let crc = read_u64_be(r, offset + 16)?;
    let mut compressed = vec![0u8; compressed_sz as usize];
    crate::io::read_exact_at(r, &mut compressed, offset + 24)?;
    if crate::io::crc64(&compressed) != crc {
        return Err(Error::Format(FormatError::CrcMismatch { offset }));
    }
    zlib_decompress(&compressed, uncompressed_sz as usize)
}

/// `u64 compressed_sz || u64 crc || bytes[compressed_sz]` (the range coder's
/// output self-delimits its uncompressed length, so the frame doesn't need
/// to store it separately).
pub fn write_range_framed<W: Write>(w: &mut W, buf: &[u8]) -> Result<()> {
    let compressed = range_o1_compress(buf);
    let crc = crate::io::crc64(&compressed);
    write_u64_be(w, compressed.len() as u64)?;
    write_u64_be(w, crc)?;
    w.write_all(&compressed)?;
    Ok(())
}

/// Reads back a buffer written by [`write_range_framed`], verifying its CRC.
pub fn read_range_framed<R: Read>(r: &mut R, offset: u64) -> Result<Vec<u8>> {
    let compressed_sz = read_u64_be(r, offset)?;
    let crc = read_u64_be(r, offset + 8)?;
    let mut compressed = vec![0u8; compressed_sz as usize];
    crate::io::read_exact_at(r, &mut compressed, offset + 16)?;
    if crate::io::crc64(&compressed) != crc {
        return Err(Error::Format(FormatError::CrcMismatch { offset }));
    }
    let (out, _len) = range_o1_decompress(&compressed)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn zlib_framed_roundtrip() {
        let mut buf = Vec::new();
        write_zlib_framed(&mut buf, b"hello genomics world, repeated repeated repeated").unwrap();
        let mut cur = Cursor::new(buf);
        let out = read_zlib_framed(&mut cur, 0).unwrap();
        assert_eq!(out, b"hello genomics world, repeated repeated repeated");
    }

    #[test]
    fn range_framed_roundtrip() {
        let mut buf = Vec::new();
        write_range_framed(&mut buf, b"ACGTACGTACGTNNNN").unwrap();
        let mut cur = Cursor::new(buf);
        let out = read_range_framed(&mut cur, 0).unwrap();
        assert_eq!(out, b"ACGTACGTACGTNNNN");
    }

    #[test]
    fn zlib_framed_detects_corruption() {
        let mut buf = Vec::new();
        write_zlib_framed(&mut buf, b"some payload bytes for corruption testing").unwrap();
        // Flip a byte inside the compressed payload (after the 24-byte header).
        buf[30] ^= 0xFF;
        let mut cur = Cursor::new(buf);
        let err = read_zlib_framed(&mut cur, 0).unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::CrcMismatch { .. })));
    }

    #[test]
    fn range_framed_detects_corruption() {
        let mut buf = Vec::new();
        write_range_framed(&mut buf, b"some payload bytes for corruption testing").unwrap();
        buf[20] ^= 0xFF;
        let mut cur = Cursor::new(buf);
        let err = read_range_framed(&mut cur, 0).unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::CrcMismatch { .. })));
    }
}

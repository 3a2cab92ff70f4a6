//! `zlib_compress`/`zlib_decompress` (spec §4.2) backed by `flate2`'s
//! deflate implementation at a fixed compression level.

use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::Result;

/// Compresses `input` with deflate at a fixed level.
pub fn zlib_compress(input: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(input)?;
    Ok(encoder.finish()?)
}

/// Decompresses `input`, which must inflate to exactly `expected_uncompressed_len`
/// bytes (the framed-block layout stores that length out of band).
pub fn zlib_decompress(input: &[u8], expected_uncompressed_len: usize) -> Result<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(input);
    let mut out = Vec::with_capacity(expected_uncompressed_len);
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_empty() {
        let compressed = zlib_compress(b"").unwrap();
        let out = zlib_decompress(&compressed, 0).unwrap();
        assert_eq!(out, b"");
    }

    #[test]
    fn roundtrip_repetitive() {
        let input = b"ACGTACGTACGTACGTACGTACGTACGTACGT".repeat(100);
        let compressed = zlib_compress(&input).unwrap();
        assert!(compressed.len() < input.len());
        let out = zlib_decompress(&compressed, input.len()).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn roundtrip_random_bytes() {
        let input: Vec<u8> = (0..4096u32).map(|i| (i * 2654435761) as u8).collect();
        let compressed = zlib_compress(&input).unwrap();
        let out = zlib_decompress(&compressed, input.len()).unwrap();
        assert_eq!(out, input);
    }
}

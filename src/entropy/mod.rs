//! Entropy layer: two opaque byte-in/byte-out compressors (spec §4.2).
//!
//! The core never inspects what's inside a stream buffer; it just hands a
//! byte slice to one of these two codecs and stores the result. `zlib`
//! wraps `flate2`'s deflate; `range` is a hand-written adaptive order-1
//! range coder. Both round-trip losslessly, which is their only contract.

pub mod range;
pub mod zlib;

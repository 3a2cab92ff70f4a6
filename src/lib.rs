//! `samtsc`: a lossless compressor/decompressor for tab-separated SAM
//! alignment records.
//!
//! Records are grouped into blocks and each block is split into five
//! independently-coded streams — ID, AUX, NUC, PAIR, QUAL (spec §2). The
//! NUC codec, a sliding-window consensus reference with three-way record
//! classification and a thirteen-stream decomposition, is the core of the
//! crate (spec §4.6).

pub mod cli;
pub mod codec;
pub mod entropy;
pub mod error;
pub mod file;
pub mod framing;
pub mod io;
pub mod nuc;
pub mod sam;
pub mod stats;

pub use error::{Error, Result};
pub use file::{Decoder, Encoder, DEFAULT_BLOCK_SIZE};

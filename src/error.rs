//! Crate-wide error type.
//!
//! Errors are grouped by kind rather than by call site (spec §7): I/O,
//! Format (bad magic, CRC mismatch, truncation) and Input (malformed SAM,
//! unsorted records, unknown CIGAR ops). All are fatal — there is no
//! partial-decode recovery path; a whole block is the atom of correctness.

use std::fmt;
use std::io;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Short read/write, unseekable stream, or any other OS-level I/O failure.
    Io(io::Error),
    /// Malformed on-disk structure: bad magic, bad sub-block id, truncated
    /// block, or a CRC64 mismatch.
    Format(FormatError),
    /// Malformed SAM input: missing field, non-numeric integer field,
    /// unsorted records, or an unrecognized CIGAR operator.
    Input(InputError),
}

#[derive(Debug)]
pub enum FormatError {
    BadMagic { expected: &'static str, offset: u64 },
    BadSubBlockId { expected: &'static str, found: String, offset: u64 },
    UnexpectedEof { offset: u64 },
    CrcMismatch { offset: u64 },
}

#[derive(Debug)]
pub enum InputError {
    MissingField { record_index: u64, field: &'static str },
    NotInteger { record_index: u64, field: &'static str, text: String },
    IntOverflow { record_index: u64, field: &'static str, text: String },
    Unsorted { record_index: u64, rname: String, pos: u32, pos_prev: u32 },
    UnknownCigarOp { record_index: u64, op: char },
    UnknownNucSymbol { record_index: u64, symbol: char },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "i/o error: {e}"),
            Error::Format(e) => write!(f, "format error: {e}"),
            Error::Input(e) => write!(f, "input error: {e}"),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::BadMagic { expected, offset } => {
                write!(f, "bad magic (expected {expected:?}) at byte offset {offset}")
            }
            FormatError::BadSubBlockId { expected, found, offset } => {
                write!(
                    f,
                    "bad sub-block id (expected {expected:?}, found {found:?}) at byte offset {offset}"
                )
            }
            FormatError::UnexpectedEof { offset } => {
                write!(f, "unexpected EOF at byte offset {offset}")
            }
            FormatError::CrcMismatch { offset } => {
                write!(f, "CRC64 mismatch for block at byte offset {offset}")
            }
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::MissingField { record_index, field } => {
                write!(f, "record {record_index}: missing field {field}")
            }
            InputError::NotInteger { record_index, field, text } => {
                write!(f, "record {record_index}: field {field} is not an integer: {text:?}")
            }
            InputError::IntOverflow { record_index, field, text } => {
                write!(f, "record {record_index}: field {field} overflows its integer width: {text:?}")
            }
            InputError::Unsorted { record_index, rname, pos, pos_prev } => {
                write!(
                    f,
                    "record {record_index}: unsorted input (rname={rname}, pos={pos} < previous pos={pos_prev})"
                )
            }
            InputError::UnknownCigarOp { record_index, op } => {
                write!(f, "record {record_index}: unknown CIGAR operator {op:?}")
            }
            InputError::UnknownNucSymbol { record_index, symbol } => {
                write!(f, "record {record_index}: symbol {symbol:?} outside the NUC alphabet {{A,C,G,T,N,?}}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<FormatError> for Error {
    fn from(e: FormatError) -> Self {
        Error::Format(e)
    }
}

impl From<InputError> for Error {
    fn from(e: InputError) -> Self {
        Error::Input(e)
    }
}

//! CIGAR expansion/contraction (spec §4.6.2): `expand` splits a read's
//! `(cigar, seq)` pair into EXS (reference-span-length expansion of `seq`),
//! STOGY (the CIGAR re-emitted byte-for-byte into its own stream) and
//! INSERTS (the concatenation of inserted/soft-clipped bases). `contract`
//! is its inverse, used by the decoder to recover `seq` from EXS + STOGY +
//! INSERTS.

use crate::error::{Error, InputError, Result};

/// Output of [`expand`].
pub(crate) struct Expanded {
    pub exs: Vec<u8>,
    pub stogy: String,
    pub inserts: Vec<u8>,
}

/// Iterates `cigar` as `(op_len, op_char)` pairs, routing `seq` bytes to
/// EXS or INSERTS per the spec §4.6.2 table and re-emitting the op into
/// STOGY unchanged. `record_index` is only used to locate a fatal error.
pub(crate) fn expand(cigar: &str, seq: &str, record_index: u64) -> Result<Expanded> {
    let seq_bytes = seq.as_bytes();
    let mut exs = Vec::new();
    let mut stogy = String::new();
    let mut inserts = Vec::new();
    let mut op_len: usize = 0;
    let mut seq_idx: usize = 0;

    for ch in cigar.chars() {
        if let Some(d) = ch.to_digit(10) {
            op_len = op_len * 10 + d as usize;
            continue;
        }
        stogy.push_str(&op_len.to_string());
        stogy.push(ch);
        match ch {
            'M' | '=' | 'X' => {
                exs.extend_from_slice(&seq_bytes[seq_idx..seq_idx + op_len]);
                seq_idx += op_len;
            }
            'I' | 'S' => {
                inserts.extend_from_slice(&seq_bytes[seq_idx..seq_idx + op_len]);
                seq_idx += op_len;
            }
            'D' | 'N' => {
                exs.extend(std::iter::repeat(b'?').take(op_len));
            }
            'H' | 'P' => {}
            _ => return Err(Error::Input(InputError::UnknownCigarOp { record_index, op: ch })),
        }
        op_len = 0;
    }

    Ok(Expanded { exs, stogy, inserts })
}

/// Inverse of [`expand`]: reconstructs `seq` from EXS, STOGY and INSERTS.
/// STOGY is trusted (it was produced by `expand` or read back verbatim
/// from the NUC stream), so no op can be unrecognized here.
pub(crate) fn contract(exs: &[u8], stogy: &str, inserts: &[u8]) -> String {
    let mut seq = String::new();
    let mut op_len: usize = 0;
    let mut exs_idx: usize = 0;
    let mut inserts_idx: usize = 0;

    for ch in stogy.chars() {
        if let Some(d) = ch.to_digit(10) {
            op_len = op_len * 10 + d as usize;
            continue;
        }
        match ch {
            'M' | '=' | 'X' => {
                seq.push_str(std::str::from_utf8(&exs[exs_idx..exs_idx + op_len]).unwrap());
                exs_idx += op_len;
            }
            'I' | 'S' => {
                seq.push_str(std::str::from_utf8(&inserts[inserts_idx..inserts_idx + op_len]).unwrap());
                inserts_idx += op_len;
            }
            'D' | 'N' => {
                exs_idx += op_len;
            }
            'H' | 'P' => {}
            _ => unreachable!("STOGY carries only ops expand() already validated"),
        }
        op_len = 0;
    }

    seq
}

/// Counts the EXS-stream bytes a STOGY/CIGAR string consumes (`M`/`=`/`X`/`D`/`N`).
pub(crate) fn exs_len(stogy: &str) -> usize {
    let mut op_len: usize = 0;
    let mut total = 0;
    for ch in stogy.chars() {
        if let Some(d) = ch.to_digit(10) {
            op_len = op_len * 10 + d as usize;
            continue;
        }
        if matches!(ch, 'M' | '=' | 'X' | 'D' | 'N') {
            total += op_len;
        }
        op_len = 0;
    }
    total
}

/// Counts the INSERTS-stream bytes a STOGY/CIGAR string consumes (`I`/`S`).
pub(crate) fn inserts_len(stogy: &str) -> usize {
    let mut op_len: usize = 0;
    let mut total = 0;
    for ch in stogy.chars() {
        if let Some(d) = ch.to_digit(10) {
            op_len = op_len * 10 + d as usize;
            continue;
        }
        if matches!(ch, 'I' | 'S') {
            total += op_len;
        }
        op_len = 0;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_simple_match() {
        let e = expand("5M", "ACGTA", 0).unwrap();
        assert_eq!(e.exs, b"ACGTA");
        assert_eq!(e.stogy, "5M");
        assert!(e.inserts.is_empty());
    }

    #[test]
    fn expand_with_insertion_and_deletion() {
        // 3M2I2D3M: seq is 3 (match) + 2 (insert) + 3 (match) = 8 bases.
        let e = expand("3M2I2D3M", "ACGTTACG", 0).unwrap();
        assert_eq!(e.exs, b"ACG??ACG");
        assert_eq!(e.inserts, b"TT");
        assert_eq!(e.stogy, "3M2I2D3M");
    }

    #[test]
    fn expand_soft_clip_and_hard_clip() {
        let e = expand("2S3M2H", "TTACG", 0).unwrap();
        assert_eq!(e.exs, b"ACG");
        assert_eq!(e.inserts, b"TT");
        assert_eq!(e.stogy, "2S3M2H");
    }

    #[test]
    fn expand_rejects_unknown_op() {
        let err = expand("5Q", "ACGTA", 3).unwrap_err();
        match err {
            Error::Input(InputError::UnknownCigarOp { record_index, op }) => {
                assert_eq!(record_index, 3);
                assert_eq!(op, 'Q');
            }
            other => panic!("expected UnknownCigarOp, got {other:?}"),
        }
    }

    #[test]
    fn contract_is_inverse_of_expand() {
        let cigar = "3M2I2D3M";
        let seq = "ACGTTACG";
        let e = expand(cigar, seq, 0).unwrap();
        let roundtrip = contract(&e.exs, &e.stogy, &e.inserts);
        assert_eq!(roundtrip, seq);
    }

    #[test]
    fn exs_len_and_inserts_len_match_expand() {
        let cigar = "4M3I2D5S";
        assert_eq!(exs_len(cigar), 4 + 2);
        assert_eq!(inserts_len(cigar), 3 + 5);
    }
}

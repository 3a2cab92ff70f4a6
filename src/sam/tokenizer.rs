//! Tab-splitting SAM tokenizer (spec §4.4).
//!
//! Reads a text stream line by line. `@`-prefixed lines are captured
//! verbatim into a header buffer (retrievable once via [`SamTokenizer::take_header`]);
//! the first non-`@` line ends the header and is parsed as the first
//! record. Fewer than 11 tab-separated fields is a fatal
//! `Error::Input::MissingField`; a 12th field (which may itself contain
//! tabs) becomes `opt` verbatim.
//!
//! Spec §4.4 names fields 1,3,4,5,7,8,9 (1-indexed) as integer fields, but
//! that list is inconsistent with the data model in spec §3, which types
//! `cigar` (field 6) and `seq` (field 10) as strings. We follow §3 and the
//! original implementation's `samparser.c`, which parses exactly `flag`,
//! `pos`, `mapq`, `pnext`, `tlen` as integers (see DESIGN.md).

use std::io::BufRead;

use crate::error::{Error, InputError, Result};
use crate::sam::record::SamRecord;

pub struct SamTokenizer<R> {
    reader: R,
    header: Vec<u8>,
    pending_first_line: Option<String>,
    record_index: u64,
}

impl<R: BufRead> SamTokenizer<R> {
    /// Constructs a tokenizer, eagerly consuming the `@`-prefixed header
    /// block and buffering the first data line for the subsequent call to
    /// [`next_record`](Self::next_record).
    pub fn new(mut reader: R) -> Result<Self> {
        let mut header = Vec::new();
        let mut pending_first_line = None;
        loop {
            let mut line = String::new();
            let n = reader.read_line(&mut line)?;
            if n == 0 {
                break;
            }
            if line.starts_with('@') {
                header.extend_from_slice(line.as_bytes());
            } else {
                pending_first_line = Some(line);
                break;
            }
        }
        Ok(SamTokenizer { reader, header, pending_first_line, record_index: 0 })
    }

    /// Returns the captured header block, consuming it (subsequent calls
    /// return an empty buffer).
    pub fn take_header(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.header)
    }

    /// Reads and parses the next record, or `None` at end of input.
    pub fn next_record(&mut self) -> Result<Option<SamRecord>> {
        let line = if let Some(line) = self.pending_first_line.take() {
            line
        } else {
            let mut line = String::new();
            let n = self.reader.read_line(&mut line)?;
            if n == 0 {
                return Ok(None);
            }
            line
        };
        let record = self.parse_line(&line)?;
        self.record_index += 1;
        Ok(Some(record))
    }

    fn parse_line(&self, line: &str) -> Result<SamRecord> {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        let mut fields: Vec<&str> = trimmed.splitn(12, '\t').collect();
        if fields.len() < 11 {
            return Err(Error::Input(InputError::MissingField {
                record_index: self.record_index,
                field: field_name(fields.len()),
            }));
        }
        // `splitn(12, ...)` leaves any tabs inside the 12th (opt) field intact.
        let opt = if fields.len() == 12 { fields.pop().unwrap() } else { "" };

        let qname = fields[0].to_string();
        let flag = self.parse_int::<u16>(fields[1], "flag")?;
        let rname = fields[2].to_string();
        let pos = self.parse_int::<u32>(fields[3], "pos")?;
        let mapq = self.parse_int::<u8>(fields[4], "mapq")?;
        let cigar = fields[5].to_string();
        let rnext = fields[6].to_string();
        let pnext = self.parse_int::<u32>(fields[7], "pnext")?;
        let tlen = self.parse_int::<i64>(fields[8], "tlen")?;
        let seq = fields[9].to_string();
        let qual = fields[10].to_string();

        Ok(SamRecord {
            qname,
            flag,
            rname,
            pos,
            mapq,
            cigar,
            rnext,
            pnext,
            tlen,
            seq,
            qual,
            opt: opt.to_string(),
        })
    }

    fn parse_int<T>(&self, text: &str, field: &'static str) -> Result<T>
    where
        T: std::str::FromStr,
    {
        text.parse::<T>().map_err(|_| {
            // Distinguish "not a number at all" from "a number that doesn't
            // fit the field's width" so overflow is reported precisely
            // (spec §9: overflow must be fatal, not silently truncated).
            if text.chars().all(|c| c.is_ascii_digit() || c == '-' || c == '+') && !text.is_empty()
            {
                Error::Input(InputError::IntOverflow {
                    record_index: self.record_index,
                    field,
                    text: text.to_string(),
                })
            } else {
                Error::Input(InputError::NotInteger {
                    record_index: self.record_index,
                    field,
                    text: text.to_string(),
                })
            }
        })
    }
}

fn field_name(count: usize) -> &'static str {
    const NAMES: [&str; 12] = [
        "qname", "flag", "rname", "pos", "mapq", "cigar", "rnext", "pnext", "tlen", "seq", "qual",
        "opt",
    ];
    NAMES.get(count).copied().unwrap_or("opt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn tok(s: &str) -> SamTokenizer<Cursor<&[u8]>> {
        SamTokenizer::new(Cursor::new(s.as_bytes())).unwrap()
    }

    #[test]
    fn parses_header_and_records() {
        let mut t = tok("@HD\tVN:1.6\n@SQ\tSN:chr1\tLN:100\nr1\t4\t*\t0\t0\t*\t*\t0\t0\t*\t*\n");
        let header = t.take_header();
        assert_eq!(header, b"@HD\tVN:1.6\n@SQ\tSN:chr1\tLN:100\n");
        let rec = t.next_record().unwrap().unwrap();
        assert_eq!(rec.qname, "r1");
        assert_eq!(rec.flag, 4);
        assert_eq!(rec.rname, "*");
        assert!(t.next_record().unwrap().is_none());
    }

    #[test]
    fn missing_opt_defaults_to_empty() {
        let mut t = tok("r1\t0\tchr1\t100\t60\t5M\t*\t0\t0\tACGTA\tIIIII\n");
        let rec = t.next_record().unwrap().unwrap();
        assert_eq!(rec.opt, "");
    }

    #[test]
    fn opt_field_may_contain_tabs() {
        let mut t = tok("r1\t0\tchr1\t100\t60\t5M\t*\t0\t0\tACGTA\tIIIII\tNM:i:0\tAS:i:5\n");
        let rec = t.next_record().unwrap().unwrap();
        assert_eq!(rec.opt, "NM:i:0\tAS:i:5");
    }

    #[test]
    fn too_few_fields_is_fatal() {
        let mut t = tok("r1\t0\tchr1\t100\t60\n");
        let err = t.next_record().unwrap_err();
        assert!(matches!(err, Error::Input(InputError::MissingField { .. })));
    }

    #[test]
    fn non_numeric_flag_is_fatal() {
        let mut t = tok("r1\tXX\tchr1\t100\t60\t5M\t*\t0\t0\tACGTA\tIIIII\n");
        let err = t.next_record().unwrap_err();
        assert!(matches!(err, Error::Input(InputError::NotInteger { .. })));
    }

    #[test]
    fn overflowing_pos_is_fatal() {
        let mut t = tok("r1\t0\tchr1\t99999999999999999999\t60\t5M\t*\t0\t0\tACGTA\tIIIII\n");
        let err = t.next_record().unwrap_err();
        assert!(matches!(err, Error::Input(InputError::IntOverflow { .. })));
    }

    #[test]
    fn strips_trailing_crlf() {
        let mut t = tok("r1\t0\tchr1\t100\t60\t5M\t*\t0\t0\tACGTA\tIIIII\r\n");
        let rec = t.next_record().unwrap().unwrap();
        assert_eq!(rec.qual, "IIIII");
    }
}

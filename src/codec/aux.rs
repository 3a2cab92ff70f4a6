//! AUX codec: `flag \t mapq \t opt \n` per record, zlib-framed (spec §4.5).

use std::io::{Read, Write};

use super::{parse_decimal_or_zero, read_sub_block_header, write_sub_block_header};
use crate::error::Result;
use crate::framing::{read_zlib_framed, write_zlib_framed};
use crate::sam::SamRecord;

const MAGIC: &[u8; 8] = b"aux----\0";

pub struct AuxFields {
    pub flag: u16,
    pub mapq: u8,
    pub opt: String,
}

#[derive(Default)]
pub struct AuxCodec {
    buf: Vec<u8>,
    rec_cnt: u64,
}

impl AuxCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rec: &SamRecord) {
        self.buf.extend_from_slice(rec.flag.to_string().as_bytes());
        self.buf.push(b'\t');
        self.buf.extend_from_slice(rec.mapq.to_string().as_bytes());
        self.buf.push(b'\t');
        self.buf.extend_from_slice(rec.opt.as_bytes());
        self.buf.push(b'\n');
        self.rec_cnt += 1;
    }

    pub fn write_block<W: Write>(&mut self, w: &mut W) -> Result<()> {
        write_sub_block_header(w, MAGIC, self.rec_cnt)?;
        write_zlib_framed(w, &self.buf)?;
        self.buf.clear();
        self.rec_cnt = 0;
        Ok(())
    }

    pub fn read_block<R: Read>(r: &mut R, offset: u64) -> Result<(u64, Vec<AuxFields>)> {
        let rec_cnt = read_sub_block_header(r, "aux----\0", offset)?;
        let buf = read_zlib_framed(r, offset + 16)?;
        let mut out = Vec::new();
        for line in super::split_lines(&buf) {
            let mut parts = line.splitn(3, |&b| b == b'\t');
            let flag = parse_decimal_or_zero::<u16>(parts.next().unwrap_or(b""));
            let mapq = parse_decimal_or_zero::<u8>(parts.next().unwrap_or(b""));
            let opt_bytes = parts.next().unwrap_or(b"");
            // opt keeps an empty string as "", not "*" — spec §3 allows opt to be empty.
            let opt = String::from_utf8_lossy(opt_bytes).into_owned();
            out.push(AuxFields { flag, mapq, opt });
        }
        Ok((rec_cnt, out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn rec(flag: u16, mapq: u8, opt: &str) -> SamRecord {
        SamRecord {
            qname: "r".into(),
            flag,
            rname: "*".into(),
            pos: 0,
            mapq,
            cigar: "*".into(),
            rnext: "*".into(),
            pnext: 0,
            tlen: 0,
            seq: "*".into(),
            qual: "*".into(),
            opt: opt.into(),
        }
    }

    #[test]
    fn roundtrip() {
        let mut codec = AuxCodec::new();
        codec.push(&rec(4, 0, ""));
        codec.push(&rec(0, 60, "NM:i:0\tAS:i:5"));
        let mut buf = Vec::new();
        codec.write_block(&mut buf).unwrap();
        let mut cur = Cursor::new(buf);
        let (rec_cnt, fields) = AuxCodec::read_block(&mut cur, 0).unwrap();
        assert_eq!(rec_cnt, 2);
        assert_eq!(fields[0].flag, 4);
        assert_eq!(fields[0].opt, "");
        assert_eq!(fields[1].mapq, 60);
        assert_eq!(fields[1].opt, "NM:i:0\tAS:i:5");
    }
}

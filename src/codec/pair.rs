//! PAIR codec: `rnext \t pnext \t tlen \n` per record, zlib-framed (spec §4.5).

use std::io::{Read, Write};

use super::{parse_decimal_or_zero, read_sub_block_header, string_or_star, write_sub_block_header};
use crate::error::Result;
use crate::framing::{read_zlib_framed, write_zlib_framed};
use crate::sam::SamRecord;

const MAGIC: &[u8; 8] = b"pair---\0";

pub struct PairFields {
    pub rnext: String,
    pub pnext: u32,
    pub tlen: i64,
}

#[derive(Default)]
pub struct PairCodec {
    buf: Vec<u8>,
    rec_cnt: u64,
}

impl PairCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rec: &SamRecord) {
        self.buf.extend_from_slice(rec.rnext.as_bytes());
        self.buf.push(b'\t');
        self.buf.extend_from_slice(rec.pnext.to_string().as_bytes());
        self.buf.push(b'\t');
        self.buf.extend_from_slice(rec.tlen.to_string().as_bytes());
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

    pub fn read_block<R: Read>(r: &mut R, offset: u64) -> Result<(u64, Vec<PairFields>)> {
        let rec_cnt = read_sub_block_header(r, "pair---\0", offset)?;
        let buf = read_zlib_framed(r, offset + 16)?;
        let mut out = Vec::new();
        for line in super::split_lines(&buf) {
            let mut parts = line.splitn(3, |&b| b == b'\t');
            let rnext = string_or_star(parts.next().unwrap_or(b""));
            let pnext = parse_decimal_or_zero::<u32>(parts.next().unwrap_or(b""));
            let tlen = parse_decimal_or_zero::<i64>(parts.next().unwrap_or(b""));
            out.push(PairFields { rnext, pnext, tlen });
        }
        Ok((rec_cnt, out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn rec(rnext: &str, pnext: u32, tlen: i64) -> SamRecord {
        SamRecord {
            qname: "r".into(),
            flag: 0,
            rname: "*".into(),
            pos: 0,
            mapq: 0,
            cigar: "*".into(),
            rnext: rnext.into(),
            pnext,
            tlen,
            seq: "*".into(),
            qual: "*".into(),
            opt: "".into(),
        }
    }

    #[test]
    fn roundtrip() {
        let mut codec = PairCodec::new();
        codec.push(&rec("*", 0, 0));
        codec.push(&rec("chr1", 200, 150));
        codec.push(&rec("=", 500, -150));
        let mut buf = Vec::new();
        codec.write_block(&mut buf).unwrap();
        let mut cur = Cursor::new(buf);
        let (rec_cnt, fields) = PairCodec::read_block(&mut cur, 0).unwrap();
        assert_eq!(rec_cnt, 3);
        assert_eq!(fields[1].rnext, "chr1");
        assert_eq!(fields[1].pnext, 200);
        assert_eq!(fields[2].tlen, -150);
    }
}

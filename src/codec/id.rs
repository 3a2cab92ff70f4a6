//! ID codec: `qname \n` per record, range-framed (spec §4.5).

use std::io::{Read, Write};

use super::{read_sub_block_header, split_lines, write_sub_block_header};
use crate::error::Result;
use crate::framing::{read_range_framed, write_range_framed};
use crate::sam::SamRecord;

const MAGIC: &[u8; 8] = b"id-----\0";

#[derive(Default)]
pub struct IdCodec {
    buf: Vec<u8>,
    rec_cnt: u64,
}

impl IdCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rec: &SamRecord) {
        self.buf.extend_from_slice(rec.qname.as_bytes());
        self.buf.push(b'\n');
        self.rec_cnt += 1;
    }

    pub fn write_block<W: Write>(&mut self, w: &mut W) -> Result<()> {
        write_sub_block_header(w, MAGIC, self.rec_cnt)?;
        write_range_framed(w, &self.buf)?;
        self.buf.clear();
        self.rec_cnt = 0;
        Ok(())
    }

    pub fn read_block<R: Read>(r: &mut R, offset: u64) -> Result<(u64, Vec<String>)> {
        let rec_cnt = read_sub_block_header(r, "id-----\0", offset)?;
        let buf = read_range_framed(r, offset + 16)?;
        let qnames = split_lines(&buf).into_iter().map(|l| String::from_utf8_lossy(l).into_owned()).collect();
        Ok((rec_cnt, qnames))
    }
}

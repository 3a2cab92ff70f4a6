//! NUC decoder: inverse of [`super::encoder::NucEncoder`] (spec §4.6.7).

use std::io::Read;

use super::cigar::{contract, exs_len, inserts_len};
use super::window::SlidingWindow;
use crate::codec::read_sub_block_header;
use crate::error::{Error, FormatError, Result};
use crate::framing::{read_range_framed, read_zlib_framed};

/// One decoded record's NUC-codec-owned fields; the caller (the file-level
/// decoder) zips these with the AUX/ID/PAIR/QUAL codecs' output to build a
/// complete [`crate::sam::SamRecord`].
pub struct NucDecodedRecord {
    pub rname: String,
    pub pos: u32,
    pub cigar: String,
    pub seq: String,
    /// The originating record class (`'m'`, `'i'`, or `'p'`); exposed only
    /// for ambient stats reporting (SPEC_FULL.md §4.10), not decode logic.
    pub class: u8,
}

/// A read cursor over one already-decompressed stream buffer.
struct Cursor<'a> {
    buf: &'a [u8],
    idx: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, idx: 0 }
    }

    fn read_until(&mut self, delim: u8) -> &'a [u8] {
        let start = self.idx;
        while self.buf[self.idx] != delim {
            self.idx += 1;
        }
        let out = &self.buf[start..self.idx];
        self.idx += 1; // consume delimiter
        out
    }

    fn read_u16_be(&mut self) -> u16 {
        let v = u16::from_be_bytes([self.buf[self.idx], self.buf[self.idx + 1]]);
        self.idx += 2;
        v
    }

    fn take(&mut self, n: usize) -> &'a [u8] {
        let out = &self.buf[self.idx..self.idx + n];
        self.idx += n;
        out
    }
}

#[derive(Default)]
pub struct NucDecoder {
    window: SlidingWindow,
    rname_prev: String,
    pos_prev: u32,
}

impl NucDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads one NUC sub-block (header + thirteen framed streams) and
    /// decodes all its records.
    pub fn read_block<R: Read>(&mut self, r: &mut R, offset: u64) -> Result<Vec<NucDecodedRecord>> {
        let rec_cnt = read_sub_block_header(r, "nuc----\0", offset)?;

        // The framed-block readers only use `offset` to locate a CRC/format
        // error in a message; each stream's true offset isn't known ahead of
        // time (compressed sizes vary), so every call is tagged with the
        // sub-block's starting offset rather than its own exact position.
        let stream_off = offset + 16;
        let ctrl = read_zlib_framed(r, stream_off)?;
        let rname = read_zlib_framed(r, stream_off)?;
        let pos = read_zlib_framed(r, stream_off)?;
        let seq = read_zlib_framed(r, stream_off)?;
        let seqlen = read_range_framed(r, stream_off)?;
        let exs = read_zlib_framed(r, stream_off)?;
        let posoff = read_range_framed(r, stream_off)?;
        let stogy = read_zlib_framed(r, stream_off)?;
        let inserts = read_zlib_framed(r, stream_off)?;
        let modcnt = read_range_framed(r, stream_off)?;
        let modpos = read_range_framed(r, stream_off)?;
        let modbases = read_zlib_framed(r, stream_off)?;
        let trail = read_zlib_framed(r, stream_off)?;

        let mut c_rname = Cursor::new(&rname);
        let mut c_pos = Cursor::new(&pos);
        let mut c_seq = Cursor::new(&seq);
        let mut c_seqlen = Cursor::new(&seqlen);
        let mut c_exs = Cursor::new(&exs);
        let mut c_posoff = Cursor::new(&posoff);
        let mut c_stogy = Cursor::new(&stogy);
        let mut c_inserts = Cursor::new(&inserts);
        let mut c_modcnt = Cursor::new(&modcnt);
        let mut c_modpos = Cursor::new(&modpos);
        let mut c_modbases = Cursor::new(&modbases);
        let mut c_trail = Cursor::new(&trail);

        let mut out = Vec::with_capacity(rec_cnt as usize);

        for (record_idx, &tag) in ctrl.iter().enumerate() {
            let record_index = record_idx as u64;
            match tag {
                b'm' => {
                    let mut rname_s = String::from_utf8_lossy(c_rname.read_until(b':')).into_owned();
                    if rname_s.is_empty() {
                        rname_s = "*".to_string();
                    }
                    let pos_bytes = c_pos.read_until(b':');
                    let pos_val = parse_decimal_u32(pos_bytes);
                    let mut cigar = String::from_utf8_lossy(c_stogy.read_until(b':')).into_owned();
                    if cigar.is_empty() {
                        cigar = "*".to_string();
                    }
                    let seqlen_val = c_seqlen.read_u16_be() as usize;
                    let mut seq_s = String::from_utf8_lossy(c_seq.take(seqlen_val)).into_owned();
                    if seq_s.is_empty() {
                        seq_s = "*".to_string();
                    }
                    out.push(NucDecodedRecord { rname: rname_s, pos: pos_val, cigar, seq: seq_s, class: b'm' });
                }
                b'i' => {
                    let rname_s = String::from_utf8_lossy(c_rname.read_until(b':')).into_owned();
                    let pos_bytes = c_pos.read_until(b':');
                    let pos_val = parse_decimal_u32(pos_bytes);
                    let stogy_s = String::from_utf8_lossy(c_stogy.read_until(b':')).into_owned();

                    let exs_n = exs_len(&stogy_s);
                    let inserts_n = inserts_len(&stogy_s);
                    let exs_bytes = c_exs.take(exs_n).to_vec();
                    let inserts_bytes = c_inserts.take(inserts_n);

                    let seq_s = contract(&exs_bytes, &stogy_s, inserts_bytes);

                    self.window.reset();
                    self.window.push(pos_val, exs_bytes, record_index)?;
                    self.rname_prev = rname_s.clone();
                    self.pos_prev = pos_val;

                    out.push(NucDecodedRecord { rname: rname_s, pos: pos_val, cigar: stogy_s, seq: seq_s, class: b'i' });
                }
                b'p' => {
                    let pos_off = c_posoff.read_u16_be();
                    let stogy_s = String::from_utf8_lossy(c_stogy.read_until(b':')).into_owned();
                    let inserts_n = inserts_len(&stogy_s);
                    let inserts_bytes = c_inserts.take(inserts_n);

                    let modcnt_val = c_modcnt.read_u16_be();
                    let mut modpos_deltas = Vec::with_capacity(modcnt_val as usize);
                    for _ in 0..modcnt_val {
                        modpos_deltas.push(c_modpos.read_u16_be());
                    }
                    let modbases_bytes = c_modbases.take(modcnt_val as usize);

                    let pos_val = self.pos_prev + pos_off as u32;
                    let exs_n = exs_len(&stogy_s);
                    let exs_pos_max = pos_val as u64 + exs_n as u64 - 1;
                    let trail_len = exs_pos_max.saturating_sub(self.window.ref_pos_max as u64) as usize;
                    let trail_bytes = c_trail.take(trail_len);

                    let exs_bytes = alike(exs_n, &self.window, pos_val, &modpos_deltas, modbases_bytes, trail_bytes);
                    let seq_s = contract(&exs_bytes, &stogy_s, inserts_bytes);

                    self.window.push(pos_val, exs_bytes, record_index)?;
                    self.pos_prev = pos_val;

                    out.push(NucDecodedRecord { rname: self.rname_prev.clone(), pos: pos_val, cigar: stogy_s, seq: seq_s, class: b'p' });
                }
                other => {
                    return Err(Error::Format(FormatError::BadSubBlockId {
                        expected: "'m'|'i'|'p' ctrl byte",
                        found: (other as char).to_string(),
                        offset,
                    }));
                }
            }
        }

        Ok(out)
    }
}

/// Inverse of `diff`: reconstructs EXS from the consensus reference, the
/// modification list, and the trailing suffix (spec §4.6.7, `alike`).
fn alike(exs_len: usize, window: &SlidingWindow, pos: u32, modpos_deltas: &[u16], modbases: &[u8], trail: &[u8]) -> Vec<u8> {
    let ref_off = (pos - window.ref_pos_min) as usize;
    let available = window.reference.len().saturating_sub(ref_off);
    let match_len = available.min(exs_len);

    let mut exs = window.reference[ref_off..ref_off + match_len].to_vec();

    let mut running = 0usize;
    for (i, &delta) in modpos_deltas.iter().enumerate() {
        running += delta as usize;
        exs[running] = modbases[i];
    }

    exs.extend_from_slice(trail);
    exs
}

fn parse_decimal_u32(bytes: &[u8]) -> u32 {
    let mut v: u32 = 0;
    for &b in bytes {
        v = v * 10 + (b - b'0') as u32;
    }
    v
}

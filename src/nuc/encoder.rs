//! NUC encoder: per-read classification (I/M/P, spec §4.6.4) and the
//! thirteen-stream write-out (spec §4.6.5, §4.6.6).

use std::io::Write;

use super::cigar::expand;
use super::window::SlidingWindow;
use crate::codec::write_sub_block_header;
use crate::error::Result;
use crate::framing::{write_range_framed, write_zlib_framed};
use crate::io::write_u16_be;
use crate::sam::SamRecord;

const MAGIC: &[u8; 8] = b"nuc----\0";

#[derive(Default)]
struct Streams {
    ctrl: Vec<u8>,
    rname: Vec<u8>,
    pos: Vec<u8>,
    seq: Vec<u8>,
    seqlen: Vec<u8>,
    exs: Vec<u8>,
    posoff: Vec<u8>,
    stogy: Vec<u8>,
    inserts: Vec<u8>,
    modcnt: Vec<u8>,
    modpos: Vec<u8>,
    modbases: Vec<u8>,
    trail: Vec<u8>,
}

impl Streams {
    fn clear(&mut self) {
        self.ctrl.clear();
        self.rname.clear();
        self.pos.clear();
        self.seq.clear();
        self.seqlen.clear();
        self.exs.clear();
        self.posoff.clear();
        self.stogy.clear();
        self.inserts.clear();
        self.modcnt.clear();
        self.modpos.clear();
        self.modbases.clear();
        self.trail.clear();
    }
}

pub struct NucEncoder {
    window: SlidingWindow,
    rname_prev: String,
    pos_prev: u32,
    first: bool,
    record_cnt: u64,
    streams: Streams,
    i_count: u64,
    m_count: u64,
    p_count: u64,
}

impl Default for NucEncoder {
    fn default() -> Self {
        NucEncoder {
            window: SlidingWindow::new(),
            rname_prev: String::new(),
            pos_prev: 0,
            first: true,
            record_cnt: 0,
            streams: Streams::default(),
            i_count: 0,
            m_count: 0,
            p_count: 0,
        }
    }
}

/// Computes the modification list of EXS against the current consensus
/// reference (spec §4.6.4 step 5, `diff`). Returns `None` when the
/// modification count would exceed the encoder's limits, signalling the
/// caller to reclassify the record as an M-record.
fn diff(exs: &[u8], window: &SlidingWindow, pos: u32) -> Option<(u16, Vec<u16>, Vec<u8>, Vec<u8>)> {
    let reference = &window.reference;
    let mut idx_exs = 0usize;
    let mut idx_ref = (pos - window.ref_pos_min) as usize;
    let mut idx_prev = 0usize;
    let mut modcnt: u32 = 0;
    let mut modpos = Vec::new();
    let mut modbases = Vec::new();

    while idx_exs < exs.len() && idx_ref < reference.len() {
        if exs[idx_exs] != reference[idx_ref] {
            let delta = idx_exs - idx_prev;
            idx_prev = idx_exs;
            modcnt += 1;
            if modcnt as usize > exs.len() / 2 || modcnt > u16::MAX as u32 {
                return None;
            }
            modpos.push(delta as u16);
            modbases.push(exs[idx_exs]);
        }
        idx_exs += 1;
        idx_ref += 1;
    }

    let trail = exs[idx_exs..].to_vec();
    Some((modcnt as u16, modpos, modbases, trail))
}

impl NucEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-class record counts accumulated in the current block, `(i, m, p)`
    /// (ambient stats reporting, spec.md §9 / SPEC_FULL.md §4.10).
    pub fn counts(&self) -> (u64, u64, u64) {
        (self.i_count, self.m_count, self.p_count)
    }

    /// Classifies and appends one record's contribution to the thirteen
    /// streams (spec §4.6.4-§4.6.5). `record_index` identifies the record
    /// in fatal error messages.
    pub fn push(&mut self, rec: &SamRecord, record_index: u64) -> Result<()> {
        self.record_cnt += 1;

        if rec.is_nuc_unmapped() {
            self.push_m(&rec.rname, rec.pos, &rec.cigar, &rec.seq);
            return Ok(());
        }

        let expanded = expand(&rec.cigar, &rec.seq, record_index)?;

        if self.first {
            self.first = false;
            self.push_i(&rec.rname, rec.pos, &expanded.exs, &expanded.stogy, &expanded.inserts, record_index)?;
            return Ok(());
        }

        if rec.rname != self.rname_prev {
            // A reference switch resets the ordering constraint: pos is only
            // required to be non-decreasing within a single rname run.
            self.push_i(&rec.rname, rec.pos, &expanded.exs, &expanded.stogy, &expanded.inserts, record_index)?;
            return Ok(());
        }

        let pos_off = rec.pos as i64 - self.pos_prev as i64;
        if pos_off < 0 {
            return Err(crate::error::Error::Input(crate::error::InputError::Unsorted {
                record_index,
                rname: rec.rname.clone(),
                pos: rec.pos,
                pos_prev: self.pos_prev,
            }));
        }
        if rec.pos > self.window.ref_pos_max || pos_off > 65535 {
            self.push_i(&rec.rname, rec.pos, &expanded.exs, &expanded.stogy, &expanded.inserts, record_index)?;
            return Ok(());
        }

        match diff(&expanded.exs, &self.window, rec.pos) {
            Some((modcnt, modpos, modbases, trail)) => {
                self.push_p(pos_off as u16, &expanded.stogy, &expanded.inserts, modcnt, &modpos, &modbases, &trail, rec.pos, &expanded.exs, record_index)?;
            }
            None => {
                self.push_m(&rec.rname, rec.pos, &rec.cigar, &rec.seq);
            }
        }
        Ok(())
    }

    fn push_m(&mut self, rname: &str, pos: u32, cigar: &str, seq: &str) {
        self.m_count += 1;
        let s = &mut self.streams;
        s.ctrl.push(b'm');
        s.rname.extend_from_slice(rname.as_bytes());
        s.rname.push(b':');
        s.pos.extend_from_slice(pos.to_string().as_bytes());
        s.pos.push(b':');
        s.stogy.extend_from_slice(cigar.as_bytes());
        s.stogy.push(b':');
        write_u16_be(&mut s.seqlen, seq.len() as u16).expect("Vec<u8> write cannot fail");
        s.seq.extend_from_slice(seq.as_bytes());
    }

    #[allow(clippy::too_many_arguments)]
    fn push_i(&mut self, rname: &str, pos: u32, exs: &[u8], stogy: &str, inserts: &[u8], record_index: u64) -> Result<()> {
        self.i_count += 1;
        let s = &mut self.streams;
        s.ctrl.push(b'i');
        s.rname.extend_from_slice(rname.as_bytes());
        s.rname.push(b':');
        s.pos.extend_from_slice(pos.to_string().as_bytes());
        s.pos.push(b':');
        s.exs.extend_from_slice(exs);
        s.stogy.extend_from_slice(stogy.as_bytes());
        s.stogy.push(b':');
        s.inserts.extend_from_slice(inserts);

        self.window.reset();
        self.window.push(pos, exs.to_vec(), record_index)?;
        self.rname_prev = rname.to_string();
        self.pos_prev = pos;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn push_p(
        &mut self,
        pos_off: u16,
        stogy: &str,
        inserts: &[u8],
        modcnt: u16,
        modpos: &[u16],
        modbases: &[u8],
        trail: &[u8],
        pos: u32,
        exs: &[u8],
        record_index: u64,
    ) -> Result<()> {
        self.p_count += 1;
        let s = &mut self.streams;
        s.ctrl.push(b'p');
        write_u16_be(&mut s.posoff, pos_off).expect("Vec<u8> write cannot fail");
        s.stogy.extend_from_slice(stogy.as_bytes());
        s.stogy.push(b':');
        s.inserts.extend_from_slice(inserts);
        write_u16_be(&mut s.modcnt, modcnt).expect("Vec<u8> write cannot fail");
        for &d in modpos {
            write_u16_be(&mut s.modpos, d).expect("Vec<u8> write cannot fail");
        }
        s.modbases.extend_from_slice(modbases);
        s.trail.extend_from_slice(trail);

        self.window.push(pos, exs.to_vec(), record_index)?;
        // rname is unchanged (P-records only occur when rname == rname_prev).
        self.pos_prev = pos;
        Ok(())
    }

    /// Writes the block header and all thirteen streams, then resets all
    /// per-block state (spec §4.6.6).
    pub fn write_block<W: Write>(&mut self, w: &mut W) -> Result<()> {
        write_sub_block_header(w, MAGIC, self.record_cnt)?;

        write_zlib_framed(w, &self.streams.ctrl)?;
        write_zlib_framed(w, &self.streams.rname)?;
        write_zlib_framed(w, &self.streams.pos)?;
        write_zlib_framed(w, &self.streams.seq)?;
        write_range_framed(w, &self.streams.seqlen)?;
        write_zlib_framed(w, &self.streams.exs)?;
        write_range_framed(w, &self.streams.posoff)?;
        write_zlib_framed(w, &self.streams.stogy)?;
        write_zlib_framed(w, &self.streams.inserts)?;
        write_range_framed(w, &self.streams.modcnt)?;
        write_range_framed(w, &self.streams.modpos)?;
        write_zlib_framed(w, &self.streams.modbases)?;
        write_zlib_framed(w, &self.streams.trail)?;

        self.streams.clear();
        self.window.reset();
        self.rname_prev.clear();
        self.pos_prev = 0;
        self.first = true;
        self.record_cnt = 0;
        self.i_count = 0;
        self.m_count = 0;
        self.p_count = 0;
        Ok(())
    }
}

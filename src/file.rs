//! File framing (spec §6/§7): `FileHeader`, `SamHeader`, `BlockHeader`, and
//! the top-level [`Encoder`]/[`Decoder`] that drive the tokenizer and the
//! five per-block sub-codecs (AUX, ID, NUC, PAIR, QUAL).

use std::io::{BufRead, Read, Seek, SeekFrom, Write};

use crate::codec::aux::AuxCodec;
use crate::codec::id::IdCodec;
use crate::codec::pair::PairCodec;
use crate::codec::qual::QualCodec;
use crate::error::{Error, FormatError, Result};
use crate::io::{read_exact_at, read_u64_be, read_u8, write_u64_be, write_u8, CountingReader};
use crate::nuc::{NucDecoder, NucEncoder};
use crate::sam::{SamRecord, SamTokenizer};
use crate::stats::Report;

const MAGIC: &[u8; 4] = b"tsc\0";
const FLAG_SAM: u8 = 0b0000_0001;
const SUB_BLOCK_COUNT: u64 = 5;

/// Default block size in records (`-b` flag), spec §5.
pub const DEFAULT_BLOCK_SIZE: u64 = 10_000;

/// Fixed byte offset of `rec_n` in `FileHeader`: 4-byte magic + 1-byte flags.
const REC_N_OFFSET: u64 = 5;
/// Fixed byte offset of `blk_n`: `rec_n` is 8 bytes wide.
const BLK_N_OFFSET: u64 = REC_N_OFFSET + 8;

/// `FileHeader` (spec §6): `magic[4] || flags || rec_n || blk_n || sblk_n`.
pub struct FileHeader {
    pub flags: u8,
    pub rec_n: u64,
    pub blk_n: u64,
    pub sblk_n: u64,
}

impl FileHeader {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(MAGIC)?;
        write_u8(w, self.flags)?;
        write_u64_be(w, self.rec_n)?;
        write_u64_be(w, self.blk_n)?;
        write_u64_be(w, self.sblk_n)?;
        Ok(())
    }

    pub(crate) fn read<R: Read>(r: &mut R, offset: u64) -> Result<Self> {
        let mut magic = [0u8; 4];
        read_exact_at(r, &mut magic, offset)?;
        if &magic != MAGIC {
            return Err(Error::Format(FormatError::BadMagic { expected: "\"tsc\\0\"", offset }));
        }
        let flags = read_u8(r, offset + 4)?;
        let rec_n = read_u64_be(r, offset + 5)?;
        let blk_n = read_u64_be(r, offset + 13)?;
        let sblk_n = read_u64_be(r, offset + 21)?;
        Ok(FileHeader { flags, rec_n, blk_n, sblk_n })
    }
}

/// `BlockHeader` (spec §6): eight `u64` fields preceding a block's five
/// sub-blocks.
#[derive(Debug, Clone)]
pub struct BlockHeader {
    pub fpos: u64,
    pub fpos_nxt: u64,
    pub blk_cnt: u64,
    pub rec_cnt: u64,
    pub rec_max: u64,
    pub rname: u64,
    pub pos_min: u64,
    pub pos_max: u64,
}

impl BlockHeader {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        write_u64_be(w, self.fpos)?;
        write_u64_be(w, self.fpos_nxt)?;
        write_u64_be(w, self.blk_cnt)?;
        write_u64_be(w, self.rec_cnt)?;
        write_u64_be(w, self.rec_max)?;
        write_u64_be(w, self.rname)?;
        write_u64_be(w, self.pos_min)?;
        write_u64_be(w, self.pos_max)?;
        Ok(())
    }

    pub(crate) fn read<R: Read>(r: &mut R, offset: u64) -> Result<Self> {
        Ok(BlockHeader {
            fpos: read_u64_be(r, offset)?,
            fpos_nxt: read_u64_be(r, offset + 8)?,
            blk_cnt: read_u64_be(r, offset + 16)?,
            rec_cnt: read_u64_be(r, offset + 24)?,
            rec_max: read_u64_be(r, offset + 32)?,
            rname: read_u64_be(r, offset + 40)?,
            pos_min: read_u64_be(r, offset + 48)?,
            pos_max: read_u64_be(r, offset + 56)?,
        })
    }
}

/// The size in bytes of one on-disk `BlockHeader` (eight `u64` fields).
const BLOCK_HEADER_SIZE: u64 = 64;

/// Drives a `SamTokenizer` and the five per-block sub-codecs, writing a
/// complete `tsc` file to a seekable sink. Seekability is required to
/// back-patch each block's `fpos_nxt` pointer and the file header's
/// `rec_n`/`blk_n` totals, which aren't known until encoding finishes
/// (spec §6, "back-patched after each block by seeking to the previous
/// header").
pub struct Encoder<W> {
    writer: W,
    block_sz: u64,
}

impl<W: Write + Seek> Encoder<W> {
    pub fn new(writer: W, block_sz: u64) -> Self {
        Encoder { writer, block_sz }
    }

    /// Reads every record from `input`, encodes it in blocks of up to
    /// `block_sz`, and writes the finished file. Returns accumulated stats.
    pub fn compress<R: BufRead>(mut self, input: R) -> Result<Report> {
        let mut tokenizer = SamTokenizer::new(input)?;
        let header = tokenizer.take_header();

        FileHeader { flags: FLAG_SAM, rec_n: 0, blk_n: 0, sblk_n: SUB_BLOCK_COUNT }.write(&mut self.writer)?;
        write_u64_be(&mut self.writer, header.len() as u64)?;
        self.writer.write_all(&header)?;

        let mut report = Report::default();
        let mut uncompressed_bytes = header.len() as u64;
        let mut rec_n = 0u64;
        let mut blk_n = 0u64;
        let mut prev_fpos_nxt_field: Option<u64> = None;
        let mut record_index = 0u64;
        let mut pending = Vec::new();

        loop {
            pending.clear();
            while (pending.len() as u64) < self.block_sz {
                match tokenizer.next_record()? {
                    Some(rec) => {
                        uncompressed_bytes += rec.to_line().len() as u64 + 1;
                        pending.push(rec);
                    }
                    None => break,
                }
            }
            if pending.is_empty() {
                break;
            }

            let fpos = self.writer.stream_position()?;
            if let Some(field_off) = prev_fpos_nxt_field {
                let resume = self.writer.stream_position()?;
                self.writer.seek(SeekFrom::Start(field_off))?;
                write_u64_be(&mut self.writer, fpos)?;
                self.writer.seek(SeekFrom::Start(resume))?;
            }

            let (rec_cnt, i, m, p) = self.write_block(&pending, blk_n, &mut record_index)?;
            report.add_block(rec_cnt, i, m, p);
            rec_n += rec_cnt;
            blk_n += 1;
            prev_fpos_nxt_field = Some(fpos + 8);
        }

        let end = self.writer.stream_position()?;
        self.writer.seek(SeekFrom::Start(REC_N_OFFSET))?;
        write_u64_be(&mut self.writer, rec_n)?;
        self.writer.seek(SeekFrom::Start(BLK_N_OFFSET))?;
        write_u64_be(&mut self.writer, blk_n)?;
        self.writer.seek(SeekFrom::Start(end))?;
        self.writer.flush()?;

        report.uncompressed_bytes = uncompressed_bytes;
        report.compressed_bytes = end;
        Ok(report)
    }

    fn write_block(&mut self, records: &[SamRecord], blk_cnt: u64, record_index: &mut u64) -> Result<(u64, u64, u64, u64)> {
        let mut aux = AuxCodec::new();
        let mut id = IdCodec::new();
        let mut pair = PairCodec::new();
        let mut qual = QualCodec::new();
        let mut nuc = NucEncoder::new();

        let mut pos_min = u64::MAX;
        let mut pos_max = 0u64;
        for rec in records {
            id.push(rec);
            aux.push(rec);
            pair.push(rec);
            qual.push(rec);
            nuc.push(rec, *record_index)?;
            *record_index += 1;
            if rec.pos != 0 {
                pos_min = pos_min.min(rec.pos as u64);
                pos_max = pos_max.max(rec.pos as u64);
            }
        }
        if pos_min == u64::MAX {
            pos_min = 0;
        }

        let fpos = self.writer.stream_position()?;
        BlockHeader {
            fpos,
            fpos_nxt: 0,
            blk_cnt,
            rec_cnt: records.len() as u64,
            rec_max: self.block_sz,
            rname: 0,
            pos_min,
            pos_max,
        }
        .write(&mut self.writer)?;

        aux.write_block(&mut self.writer)?;
        id.write_block(&mut self.writer)?;
        let (i, m, p) = nuc.counts();
        nuc.write_block(&mut self.writer)?;
        pair.write_block(&mut self.writer)?;
        qual.write_block(&mut self.writer)?;

        Ok((records.len() as u64, i, m, p))
    }
}

/// Drives the inverse pipeline: reads a `tsc` file sequentially (no
/// seeking required, per spec §6, "decoders may read blocks sequentially")
/// and reconstructs byte-identical SAM text.
pub struct Decoder<R> {
    reader: CountingReader<R>,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Decoder { reader: CountingReader::new(reader) }
    }

    pub fn decompress<W: Write>(self, output: &mut W) -> Result<Report> {
        let (_file_header, report, _headers) = self.run(Some(output))?;
        Ok(report)
    }

    /// Reads the file and block headers without writing any SAM text
    /// (spec §6, `-i`/`--info`): every sub-block is still fully decoded
    /// and CRC-checked, matching the whole-block-is-the-atom-of-correctness
    /// guarantee (spec §7) — it just discards the reconstructed records.
    pub fn info(self) -> Result<(FileHeader, Vec<BlockHeader>, Report)> {
        let mut sink = std::io::sink();
        let (file_header, report, headers) = self.run(Some(&mut sink))?;
        Ok((file_header, headers, report))
    }

    fn run<W: Write>(mut self, mut output: Option<&mut W>) -> Result<(FileHeader, Report, Vec<BlockHeader>)> {
        let start = self.reader.position();
        let file_header = FileHeader::read(&mut self.reader, start)?;

        let header_len = read_u64_be(&mut self.reader, self.reader.position())?;
        let mut header = vec![0u8; header_len as usize];
        read_exact_at(&mut self.reader, &mut header, self.reader.position())?;
        if let Some(w) = output.as_deref_mut() {
            w.write_all(&header)?;
        }

        let mut report = Report::default();
        let mut uncompressed_bytes = header.len() as u64;
        let mut headers = Vec::with_capacity(file_header.blk_n as usize);
        for _ in 0..file_header.blk_n {
            let block_offset = self.reader.position();
            let block_header = BlockHeader::read(&mut self.reader, block_offset)?;

            let (aux_rec_cnt, aux_fields) = AuxCodec::read_block(&mut self.reader, self.reader.position())?;
            let (_id_rec_cnt, qnames) = IdCodec::read_block(&mut self.reader, self.reader.position())?;
            let mut nuc = NucDecoder::new();
            let nuc_records = nuc.read_block(&mut self.reader, self.reader.position())?;
            let (_pair_rec_cnt, pair_fields) = PairCodec::read_block(&mut self.reader, self.reader.position())?;
            let (_qual_rec_cnt, quals) = QualCodec::read_block(&mut self.reader, self.reader.position())?;

            let mut i = 0u64;
            let mut m = 0u64;
            let mut p = 0u64;

            for idx in 0..aux_rec_cnt as usize {
                let aux = &aux_fields[idx];
                let nuc_rec = &nuc_records[idx];
                let pair = &pair_fields[idx];
                match nuc_rec.class {
                    b'i' => i += 1,
                    b'p' => p += 1,
                    _ => m += 1,
                }
                if let Some(w) = output.as_deref_mut() {
                    let record = SamRecord {
                        qname: qnames[idx].clone(),
                        flag: aux.flag,
                        rname: nuc_rec.rname.clone(),
                        pos: nuc_rec.pos,
                        mapq: aux.mapq,
                        cigar: nuc_rec.cigar.clone(),
                        rnext: pair.rnext.clone(),
                        pnext: pair.pnext,
                        tlen: pair.tlen,
                        seq: nuc_rec.seq.clone(),
                        qual: quals[idx].clone(),
                        opt: aux.opt.clone(),
                    };
                    let line = record.to_line();
                    uncompressed_bytes += line.len() as u64 + 1;
                    w.write_all(line.as_bytes())?;
                    w.write_all(b"\n")?;
                }
            }

            report.add_block(aux_rec_cnt, i, m, p);
            headers.push(block_header);
        }

        report.uncompressed_bytes = uncompressed_bytes;
        report.compressed_bytes = self.reader.position();
        Ok((file_header, report, headers))
    }
}

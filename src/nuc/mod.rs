//! The NUC codec (spec §4.6): the core of the core. A sliding-window
//! majority-vote consensus reference, three-way per-read classification
//! (I/M/P), and a thirteen-stream decomposition that lets each stream be
//! entropy-coded by whichever of the two coders in [`crate::entropy`] fits
//! its statistics.

mod cigar;
mod encoder;
mod decoder;
mod window;

pub use decoder::{NucDecodedRecord, NucDecoder};
pub use encoder::NucEncoder;

pub use window::WINDOW_SIZE;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sam::SamRecord;
    use std::io::Cursor;

    fn rec(rname: &str, pos: u32, cigar: &str, seq: &str) -> SamRecord {
        SamRecord {
            qname: "r".into(),
            flag: 0,
            rname: rname.into(),
            pos,
            mapq: 60,
            cigar: cigar.into(),
            rnext: "*".into(),
            pnext: 0,
            tlen: 0,
            seq: seq.into(),
            qual: "IIIII".into(),
            opt: "".into(),
        }
    }

    fn unmapped(qname: &str) -> SamRecord {
        SamRecord {
            qname: qname.into(),
            flag: 4,
            rname: "*".into(),
            pos: 0,
            mapq: 0,
            cigar: "*".into(),
            rnext: "*".into(),
            pnext: 0,
            tlen: 0,
            seq: "*".into(),
            qual: "*".into(),
            opt: "".into(),
        }
    }

    fn roundtrip(records: &[SamRecord]) -> Vec<(String, u32, String, String)> {
        let mut enc = NucEncoder::new();
        for (i, r) in records.iter().enumerate() {
            enc.push(r, i as u64).unwrap();
        }
        let mut buf = Vec::new();
        enc.write_block(&mut buf).unwrap();

        let mut dec = NucDecoder::new();
        let mut cur = Cursor::new(buf);
        let decoded = dec.read_block(&mut cur, 0).unwrap();
        decoded.into_iter().map(|r| (r.rname, r.pos, r.cigar, r.seq)).collect()
    }

    #[test]
    fn single_unmapped_record_roundtrips() {
        // spec §8 scenario 1.
        let recs = vec![unmapped("r1")];
        let decoded = roundtrip(&recs);
        assert_eq!(decoded, vec![("*".to_string(), 0, "*".to_string(), "*".to_string())]);
    }

    #[test]
    fn two_overlapping_reads_roundtrip() {
        // spec §8 scenario 2.
        let recs = vec![rec("chr1", 100, "5M", "ACGTA"), rec("chr1", 102, "5M", "GTAAC")];
        let decoded = roundtrip(&recs);
        assert_eq!(decoded[0], ("chr1".to_string(), 100, "5M".to_string(), "ACGTA".to_string()));
        assert_eq!(decoded[1], ("chr1".to_string(), 102, "5M".to_string(), "GTAAC".to_string()));
    }

    #[test]
    fn reference_switch_triggers_new_i_record() {
        // spec §8 scenario 3.
        let recs = vec![
            rec("chr1", 100, "4M", "ACGT"),
            rec("chr1", 101, "4M", "CGTA"),
            rec("chr2", 50, "4M", "TTTT"),
        ];
        let decoded = roundtrip(&recs);
        assert_eq!(decoded[2].0, "chr2");
        assert_eq!(decoded[2].1, 50);
        assert_eq!(decoded[2].3, "TTTT");
    }

    #[test]
    fn insertions_and_deletions_roundtrip() {
        let recs = vec![
            rec("chr1", 100, "10M", "ACGTACGTAC"),
            rec("chr1", 105, "3M2I3M", "ACGTTAGT"),
            rec("chr1", 110, "2M3D3M", "ACTAG"),
        ];
        let decoded = roundtrip(&recs);
        assert_eq!(decoded[1].3, "ACGTTAGT");
        assert_eq!(decoded[2].3, "ACTAG");
    }

    #[test]
    fn large_position_jump_forces_i_record() {
        let recs = vec![rec("chr1", 100, "4M", "ACGT"), rec("chr1", 100_000, "4M", "TTTT")];
        let decoded = roundtrip(&recs);
        assert_eq!(decoded[1], ("chr1".to_string(), 100_000, "4M".to_string(), "TTTT".to_string()));
    }

    #[test]
    fn unsorted_input_is_fatal() {
        let mut enc = NucEncoder::new();
        enc.push(&rec("chr1", 200, "4M", "ACGT"), 0).unwrap();
        let err = enc.push(&rec("chr1", 100, "4M", "TTTT"), 1).unwrap_err();
        assert!(matches!(err, crate::error::Error::Input(crate::error::InputError::Unsorted { .. })));
    }

    #[test]
    fn heavily_mismatched_read_reclassifies_to_m() {
        // After establishing a consensus, a read that disagrees with more
        // than half its bases must fall back to an M-record rather than
        // producing an invalid P-record.
        let recs = vec![
            rec("chr1", 100, "10M", "AAAAAAAAAA"),
            rec("chr1", 100, "10M", "CCCCCCCCCC"),
        ];
        let decoded = roundtrip(&recs);
        assert_eq!(decoded[1].3, "CCCCCCCCCC");
    }

    #[test]
    fn many_reads_roundtrip_through_full_window() {
        let mut recs = Vec::new();
        for i in 0..25u32 {
            let seq = format!("ACGT{}", "A".repeat((i % 4) as usize + 1));
            let cigar = format!("{}M", seq.len());
            recs.push(rec("chr1", 100 + i, &cigar, &seq));
        }
        let decoded = roundtrip(&recs);
        assert_eq!(decoded.len(), 25);
        for (i, d) in decoded.iter().enumerate() {
            assert_eq!(d.1, 100 + i as u32);
        }
    }
}

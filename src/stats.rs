//! Stats reporting (ambient: SPEC_FULL.md §4.10, tied to the CLI's `-s`
//! flag). Accumulated by the file-level [`crate::file::Encoder`]/
//! [`crate::file::Decoder`] as they run; printing one is purely diagnostic
//! and has no bearing on round-trip correctness (spec.md §9, "Line
//! context").

use std::fmt;

/// Running totals over an entire compress or decompress pass.
#[derive(Debug, Default, Clone)]
pub struct Report {
    pub records: u64,
    pub blocks: u64,
    pub i_records: u64,
    pub m_records: u64,
    pub p_records: u64,
    pub uncompressed_bytes: u64,
    pub compressed_bytes: u64,
}

impl Report {
    pub(crate) fn add_block(&mut self, rec_cnt: u64, i: u64, m: u64, p: u64) {
        self.blocks += 1;
        self.records += rec_cnt;
        self.i_records += i;
        self.m_records += m;
        self.p_records += p;
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "records:            {}", self.records)?;
        writeln!(f, "blocks:             {}", self.blocks)?;
        writeln!(f, "  I-records:        {}", self.i_records)?;
        writeln!(f, "  M-records:        {}", self.m_records)?;
        writeln!(f, "  P-records:        {}", self.p_records)?;
        writeln!(f, "uncompressed bytes: {}", self.uncompressed_bytes)?;
        writeln!(f, "compressed bytes:   {}", self.compressed_bytes)?;
        if self.uncompressed_bytes > 0 {
            let ratio = self.compressed_bytes as f64 / self.uncompressed_bytes as f64;
            write!(f, "ratio:              {ratio:.4}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_block_accumulates_class_counts() {
        let mut r = Report::default();
        r.add_block(10, 1, 2, 7);
        r.add_block(5, 1, 0, 4);
        assert_eq!(r.records, 15);
        assert_eq!(r.blocks, 2);
        assert_eq!(r.i_records, 2);
        assert_eq!(r.m_records, 2);
        assert_eq!(r.p_records, 11);
    }

    #[test]
    fn display_includes_ratio_when_nonzero() {
        let mut r = Report::default();
        r.uncompressed_bytes = 1000;
        r.compressed_bytes = 250;
        let text = r.to_string();
        assert!(text.contains("ratio:"));
        assert!(text.contains("0.2500"));
    }
}

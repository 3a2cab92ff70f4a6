//! Operation mode selection (spec §6): compress (default), decompress
//! (`-d`), or info (`-i`, dump block headers without decoding records).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpMode {
    Compress,
    Decompress,
    Info,
}

/// Returns the default output path for `input` under `mode`, per spec §6:
/// `.sam -> .sam.tsc` on compress, `.tsc -> .sam` on decompress. Any other
/// input extension is accepted for compression (treated as SAM); info mode
/// never needs an output path.
pub fn default_output_path(mode: OpMode, input: &str) -> Option<String> {
    match mode {
        OpMode::Compress => Some(format!("{input}.tsc")),
        OpMode::Decompress => input.strip_suffix(".tsc").map(|base| format!("{base}.sam")),
        OpMode::Info => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_appends_tsc_suffix() {
        assert_eq!(default_output_path(OpMode::Compress, "reads.sam"), Some("reads.sam.tsc".to_string()));
    }

    #[test]
    fn compress_accepts_any_extension() {
        assert_eq!(default_output_path(OpMode::Compress, "reads.txt"), Some("reads.txt.tsc".to_string()));
    }

    #[test]
    fn decompress_strips_tsc_suffix() {
        assert_eq!(default_output_path(OpMode::Decompress, "reads.sam.tsc"), Some("reads.sam".to_string()));
    }

    #[test]
    fn decompress_without_tsc_suffix_has_no_default() {
        assert_eq!(default_output_path(OpMode::Decompress, "reads.bin"), None);
    }

    #[test]
    fn info_never_has_a_default_output() {
        assert_eq!(default_output_path(OpMode::Info, "reads.sam.tsc"), None);
    }
}

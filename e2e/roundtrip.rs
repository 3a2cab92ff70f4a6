//! End-to-end roundtrip tests: generates larger, more varied SAM inputs
//! (multiple reference sequences, indels, unmapped reads, varying block
//! sizes) and checks the `tsc` binary reproduces them byte-for-byte.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn tsc_bin() -> &'static str {
    env!("CARGO_BIN_EXE_tsc")
}

fn run(args: &[&str], cwd: &std::path::Path) -> std::process::Output {
    Command::new(tsc_bin()).args(args).current_dir(cwd).output().expect("failed to run tsc")
}

fn roundtrip(sam: &str, block_size: Option<&str>) -> String {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.sam");
    fs::write(&input, sam).unwrap();

    let mut compress_args = vec!["-f"];
    if let Some(b) = block_size {
        compress_args.push("-b");
        compress_args.push(b);
    }
    compress_args.push("reads.sam");
    let out = run(&compress_args, dir.path());
    assert!(out.status.success(), "compress failed: {}", String::from_utf8_lossy(&out.stderr));

    let out = run(&["-d", "-f", "reads.sam.tsc"], dir.path());
    assert!(out.status.success(), "decompress failed: {}", String::from_utf8_lossy(&out.stderr));

    fs::read_to_string(dir.path().join("reads.sam")).unwrap()
}

fn header_only_sam() -> String {
    "@HD\tVN:1.6\n@SQ\tSN:chr1\tLN:248956422\n".to_string()
}

fn generated_sam(n: usize) -> String {
    let mut out = header_only_sam();
    out.push_str("@SQ\tSN:chr2\tLN:242193529\n");
    let bases = [b'A', b'C', b'G', b'T'];
    for i in 0..n {
        let rname = if i % 7 == 0 { "chr2" } else { "chr1" };
        let pos = 100 + i as u64 * 3;
        let seq: String = (0..20).map(|j| bases[(i + j) % 4] as char).collect();
        let qual = "I".repeat(20);
        let cigar = if i % 11 == 0 {
            "8M2I10M"
        } else if i % 13 == 0 {
            "10M2D8M"
        } else {
            "20M"
        };
        out.push_str(&format!(
            "r{i}\t{flag}\t{rname}\t{pos}\t60\t{cigar}\t*\t0\t0\t{seq}\t{qual}\tNM:i:0\n",
            flag = if i % 17 == 0 { 4 } else { 0 },
        ));
    }
    out
}

#[test]
fn header_only_file_roundtrips() {
    let sam = header_only_sam();
    assert_eq!(roundtrip(&sam, None), sam);
}

#[test]
fn single_unmapped_record_roundtrips() {
    let sam = format!("{}r1\t4\t*\t0\t0\t*\t*\t0\t0\t*\t*\n", header_only_sam());
    assert_eq!(roundtrip(&sam, None), sam);
}

#[test]
fn two_hundred_records_default_block_size() {
    let sam = generated_sam(200);
    assert_eq!(roundtrip(&sam, None), sam);
}

#[test]
fn small_block_size_forces_many_blocks() {
    let sam = generated_sam(50);
    assert_eq!(roundtrip(&sam, Some("5")), sam);
}

#[test]
fn block_size_of_one_splits_every_record() {
    let sam = generated_sam(10);
    assert_eq!(roundtrip(&sam, Some("1")), sam);
}

#[test]
fn mixed_indels_and_reference_switches_roundtrip() {
    let sam = generated_sam(120);
    assert_eq!(roundtrip(&sam, Some("17")), sam);
}

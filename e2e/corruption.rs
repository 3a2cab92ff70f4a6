//! Corruption-detection tests: flips bytes in a compressed `.tsc` file and
//! checks the `tsc` binary refuses to decompress it (CRC64 check, spec §7)
//! instead of silently producing wrong output.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn tsc_bin() -> &'static str {
    env!("CARGO_BIN_EXE_tsc")
}

fn sam_text() -> &'static str {
    "@HD\tVN:1.6\n\
r1\t0\tchr1\t100\t60\t5M\t*\t0\t0\tACGTA\tIIIII\tNM:i:0\n\
r2\t0\tchr1\t102\t60\t5M\t*\t0\t0\tGTAAC\tIIIII\n\
r3\t0\tchr1\t104\t60\t5M\t*\t0\t0\tAACGG\tIIIII\n"
}

#[test]
fn flipped_byte_in_compressed_body_is_rejected_on_decompress() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.sam");
    fs::write(&input, sam_text()).unwrap();

    let status = Command::new(tsc_bin())
        .arg(input.to_str().unwrap())
        .current_dir(dir.path())
        .status()
        .expect("failed to run tsc compress");
    assert!(status.success());

    let compressed_path = dir.path().join("reads.sam.tsc");
    let mut bytes = fs::read(&compressed_path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    fs::write(&compressed_path, &bytes).unwrap();

    let output = Command::new(tsc_bin())
        .args(["-d", "-f", "reads.sam.tsc"])
        .current_dir(dir.path())
        .output()
        .expect("failed to run tsc decompress");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.is_empty());
}

#[test]
fn truncated_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.sam");
    fs::write(&input, sam_text()).unwrap();

    Command::new(tsc_bin())
        .arg(input.to_str().unwrap())
        .current_dir(dir.path())
        .status()
        .expect("failed to run tsc compress");

    let compressed_path = dir.path().join("reads.sam.tsc");
    let bytes = fs::read(&compressed_path).unwrap();
    let truncated = &bytes[..bytes.len() / 2];
    fs::write(&compressed_path, truncated).unwrap();

    let status = Command::new(tsc_bin())
        .args(["-d", "-f", "reads.sam.tsc"])
        .current_dir(dir.path())
        .status()
        .expect("failed to run tsc decompress");
    assert!(!status.success());
}

#[test]
fn bad_magic_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.sam");
    fs::write(&input, sam_text()).unwrap();

    Command::new(tsc_bin())
        .arg(input.to_str().unwrap())
        .current_dir(dir.path())
        .status()
        .expect("failed to run tsc compress");

    let compressed_path = dir.path().join("reads.sam.tsc");
    let mut bytes = fs::read(&compressed_path).unwrap();
    bytes[0] = b'X';
    fs::write(&compressed_path, &bytes).unwrap();

    let status = Command::new(tsc_bin())
        .args(["-d", "-f", "reads.sam.tsc"])
        .current_dir(dir.path())
        .status()
        .expect("failed to run tsc decompress");
    assert!(!status.success());
}

//! CLI integration tests: drives the `tsc` binary end-to-end with
//! `std::process::Command`, covering argument dispatch, exit codes, and the
//! on-disk compress/decompress/info flow.

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
r3\t4\t*\t0\t0\t*\t*\t0\t0\t*\t*\n"
}

fn make_temp_sam() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.sam");
    fs::write(&input, sam_text()).unwrap();
    (dir, input)
}

#[test]
fn compress_then_decompress_default_output_names() {
    let (dir, input) = make_temp_sam();

    let status = Command::new(tsc_bin())
        .arg(input.to_str().unwrap())
        .current_dir(dir.path())
        .status()
        .expect("failed to run tsc compress");
    assert!(status.success());

    let compressed = dir.path().join("reads.sam.tsc");
    assert!(compressed.exists());

    let status = Command::new(tsc_bin())
        .args(["-d", compressed.to_str().unwrap()])
        .current_dir(dir.path())
        .status()
        .expect("failed to run tsc decompress");
    assert!(status.success());

    let recovered = fs::read_to_string(dir.path().join("reads.sam")).unwrap();
    assert_eq!(recovered, sam_text());
}

#[test]
fn explicit_output_path_is_honored() {
    let (dir, input) = make_temp_sam();
    let output = dir.path().join("out.bin");

    let status = Command::new(tsc_bin())
        .args(["-o", output.to_str().unwrap(), input.to_str().unwrap()])
        .status()
        .expect("failed to run tsc compress");
    assert!(status.success());
    assert!(output.exists());
}

#[test]
fn existing_output_without_force_is_rejected() {
    let (dir, input) = make_temp_sam();
    let compressed = dir.path().join("reads.sam.tsc");
    fs::write(&compressed, b"stale").unwrap();

    let status = Command::new(tsc_bin())
        .arg(input.to_str().unwrap())
        .current_dir(dir.path())
        .status()
        .expect("failed to run tsc compress");
    assert!(!status.success());
    assert_eq!(fs::read(&compressed).unwrap(), b"stale");
}

#[test]
fn force_flag_overwrites_existing_output() {
    let (dir, input) = make_temp_sam();
    let compressed = dir.path().join("reads.sam.tsc");
    fs::write(&compressed, b"stale").unwrap();

    let status = Command::new(tsc_bin())
        .args(["-f", input.to_str().unwrap()])
        .current_dir(dir.path())
        .status()
        .expect("failed to run tsc compress");
    assert!(status.success());
    assert_ne!(fs::read(&compressed).unwrap(), b"stale");
}

#[test]
fn info_mode_prints_block_summary_without_creating_output() {
    let (dir, input) = make_temp_sam();
    Command::new(tsc_bin())
        .arg(input.to_str().unwrap())
        .current_dir(dir.path())
        .status()
        .expect("failed to run tsc compress");
    let compressed = dir.path().join("reads.sam.tsc");

    let output = Command::new(tsc_bin())
        .args(["-i", compressed.to_str().unwrap()])
        .output()
        .expect("failed to run tsc info");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("records:"));
    assert!(stdout.contains("block 0:"));
}

#[test]
fn info_mode_rejects_force_flag() {
    let (dir, input) = make_temp_sam();
    Command::new(tsc_bin())
        .arg(input.to_str().unwrap())
        .current_dir(dir.path())
        .status()
        .unwrap();
    let compressed = dir.path().join("reads.sam.tsc");

    let status = Command::new(tsc_bin())
        .args(["-i", "-f", compressed.to_str().unwrap()])
        .status()
        .expect("failed to run tsc");
    assert!(!status.success());
}

#[test]
fn version_flag_exits_zero() {
    let output = Command::new(tsc_bin())
        .arg("--version")
        .output()
        .expect("failed to run tsc --version");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("tsc"));
}

#[test]
fn missing_input_file_exits_nonzero() {
    let status = Command::new(tsc_bin()).status().expect("failed to run tsc");
    assert!(!status.success());
}

#[test]
fn nonexistent_input_path_exits_nonzero() {
    let status = Command::new(tsc_bin())
        .arg("/nonexistent/path/reads.sam")
        .status()
        .expect("failed to run tsc");
    assert!(!status.success());
}

//! Usage/version banners (spec §6 CLI surface).

use crate::cli::constants::{AUTHOR, PROGRAM_NAME, VERSION};

pub fn print_version() {
    println!("{PROGRAM_NAME} {VERSION}");
    println!("a lossless compressor for SAM alignment records");
    println!("contact: {AUTHOR}");
}

pub fn print_usage(exe_name: &str) {
    eprintln!("Usage:");
    eprintln!("  Compress  : {exe_name} [-b N] [-o output] [-fs] <file.sam>");
    eprintln!("  Decompress: {exe_name} -d [-o output] [-fs] <file.tsc>");
    eprintln!("  Info      : {exe_name} -i <file.tsc>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -b, --blocksz N   Records per block (default 10000)");
    eprintln!("  -d, --decompress  Decompress");
    eprintln!("  -f, --force       Overwrite an existing output file");
    eprintln!("  -h, --help        Print this help");
    eprintln!("  -i, --info        Print block header information, don't decode");
    eprintln!("  -o, --output PATH Specify output file");
    eprintln!("  -s, --stats       Print (de)compression statistics");
    eprintln!("  -v, --version     Display program version");
}

/// Prints a usage error and the short usage banner, mirroring the
/// teacher's `badusage`. The caller is responsible for exiting with a
/// non-zero code.
pub fn print_bad_usage(exe_name: &str, msg: &str) {
    eprintln!("{exe_name}: {msg}");
    print_usage(exe_name);
}

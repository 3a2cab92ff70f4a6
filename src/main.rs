//! Binary entry point for the `tsc` command-line tool.
//!
//! Parses arguments, resolves the default output path when `-o` is absent,
//! checks for an existing output file (unless `-f`/`--force`), and dispatches
//! to compress, decompress, or info mode.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use samtsc::cli::args::{parse_args, ParsedArgs};
use samtsc::cli::help::print_bad_usage;
use samtsc::cli::op_mode::{default_output_path, OpMode};
use samtsc::displaylevel;
use samtsc::file::{Decoder, Encoder};

fn run(exe_name: &str, args: ParsedArgs) -> i32 {
    let output_path = match &args.output {
        Some(path) => Some(path.clone()),
        None => default_output_path(args.mode, &args.input),
    };

    if args.mode != OpMode::Info && output_path.is_none() {
        print_bad_usage(exe_name, "cannot determine an output filename, use -o");
        return 1;
    }

    if let Some(ref path) = output_path {
        if !args.force && Path::new(path).exists() {
            print_bad_usage(exe_name, &format!("output file already exists: {path} (use -f to overwrite)"));
            return 1;
        }
    }

    let result = match args.mode {
        OpMode::Compress => compress(&args, output_path.as_deref().unwrap()),
        OpMode::Decompress => decompress(&args, output_path.as_deref().unwrap()),
        OpMode::Info => info(&args.input),
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{exe_name}: {e}");
            1
        }
    }
}

fn compress(args: &ParsedArgs, output_path: &str) -> anyhow::Result<()> {
    displaylevel!(2, "compressing {} -> {output_path} (block size {})", args.input, args.block_size);
    let input = BufReader::new(File::open(&args.input)?);
    let output = BufWriter::new(File::create(output_path)?);
    let report = Encoder::new(output, args.block_size).compress(input)?;
    displaylevel!(2, "done: {} records in {} blocks", report.records, report.blocks);
    if args.stats {
        println!("{report}");
    }
    Ok(())
}

fn decompress(args: &ParsedArgs, output_path: &str) -> anyhow::Result<()> {
    displaylevel!(2, "decompressing {} -> {output_path}", args.input);
    let input = BufReader::new(File::open(&args.input)?);
    let mut output = BufWriter::new(File::create(output_path)?);
    let report = Decoder::new(input).decompress(&mut output)?;
    displaylevel!(2, "done: {} records in {} blocks", report.records, report.blocks);
    if args.stats {
        println!("{report}");
    }
    Ok(())
}

fn info(input_path: &str) -> anyhow::Result<()> {
    let input = BufReader::new(File::open(input_path)?);
    let (file_header, blocks, report) = Decoder::new(input).info()?;
    println!("records:  {}", file_header.rec_n);
    println!("blocks:   {}", file_header.blk_n);
    println!("streams:  {}", file_header.sblk_n);
    for (idx, block) in blocks.iter().enumerate() {
        println!(
            "block {idx}: records={} range=[{}, {}]",
            block.rec_cnt, block.pos_min, block.pos_max
        );
    }
    let _ = report;
    Ok(())
}

fn main() {
    let mut argv = std::env::args();
    let exe_path = argv.next().unwrap_or_else(|| "tsc".to_owned());
    let exe_name = Path::new(&exe_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or(exe_path);
    let rest: Vec<String> = argv.collect();

    let args = match parse_args(&exe_name, &rest) {
        Ok(a) => a,
        Err(e) => {
            print_bad_usage(&exe_name, &e.to_string());
            std::process::exit(1);
        }
    };

    if args.exit_early {
        std::process::exit(0);
    }

    std::process::exit(run(&exe_name, args));
}

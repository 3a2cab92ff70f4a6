//! Command-line argument parsing for the `tsc` binary (spec §6).
//!
//! A hand-rolled short-option loop mirroring the original `tsc.c`'s
//! `getopt_long` dispatch rather than a declarative parser: short options
//! may be aggregated (`-fs`), long options take `--opt=value` or
//! `--opt value`, and exactly one positional argument (the input path) is
//! allowed.

use anyhow::{anyhow, Result};

use crate::cli::op_mode::OpMode;
use crate::file::DEFAULT_BLOCK_SIZE;

#[derive(Debug)]
pub struct ParsedArgs {
    pub mode: OpMode,
    pub block_size: u64,
    pub force: bool,
    pub stats: bool,
    pub output: Option<String>,
    pub input: String,
    /// Set when `-h`/`--help` or `-v`/`--version` already printed their
    /// banner; the caller should exit 0 without touching any files.
    pub exit_early: bool,
}

pub fn parse_args(exe_name: &str, argv: &[String]) -> Result<ParsedArgs> {
    let mut mode = OpMode::Compress;
    let mut block_size: Option<u64> = None;
    let mut force = false;
    let mut stats = false;
    let mut output: Option<String> = None;
    let mut input: Option<String> = None;

    let mut idx = 0usize;
    while idx < argv.len() {
        let arg = &argv[idx];

        if arg == "--" {
            idx += 1;
            while idx < argv.len() {
                set_input(&mut input, &argv[idx])?;
                idx += 1;
            }
            break;
        }

        if let Some(long) = arg.strip_prefix("--") {
            let (name, inline_value) = match long.split_once('=') {
                Some((n, v)) => (n, Some(v.to_string())),
                None => (long, None),
            };
            match name {
                "decompress" => mode = OpMode::Decompress,
                "info" => mode = OpMode::Info,
                "force" => force = true,
                "stats" => stats = true,
                "help" => {
                    crate::cli::help::print_usage(exe_name);
                    return finish(mode, block_size, force, stats, output, input, true);
                }
                "version" => {
                    crate::cli::help::print_version();
                    return finish(mode, block_size, force, stats, output, input, true);
                }
                "blocksz" => {
                    let value = take_value(inline_value, argv, &mut idx, "--blocksz")?;
                    block_size = Some(parse_block_size(&value)?);
                    idx += 1;
                    continue;
                }
                "output" => {
                    let value = take_value(inline_value, argv, &mut idx, "--output")?;
                    output = Some(value);
                    idx += 1;
                    continue;
                }
                other => return Err(anyhow!("unknown option: --{other}")),
            }
            idx += 1;
            continue;
        }

        if arg.starts_with('-') && arg.len() > 1 {
            let flags = &arg[1..];
            let mut chars = flags.chars().peekable();
            while let Some(c) = chars.next() {
                match c {
                    'd' => mode = OpMode::Decompress,
                    'i' => mode = OpMode::Info,
                    'f' => force = true,
                    's' => stats = true,
                    'h' => {
                        crate::cli::help::print_usage(exe_name);
                        return finish(mode, block_size, force, stats, output, input, true);
                    }
                    'v' => {
                        crate::cli::help::print_version();
                        return finish(mode, block_size, force, stats, output, input, true);
                    }
                    'b' | 'o' => {
                        // Consumes the rest of this argument (if any) as the
                        // value, else the next argv entry — matches getopt's
                        // `required_argument` behaviour for aggregated flags
                        // like `-b10000`.
                        let rest: String = chars.collect();
                        let value = if !rest.is_empty() {
                            rest
                        } else {
                            idx += 1;
                            argv.get(idx).cloned().ok_or_else(|| anyhow!("-{c} requires an argument"))?
                        };
                        if c == 'b' {
                            block_size = Some(parse_block_size(&value)?);
                        } else {
                            output = Some(value);
                        }
                        break;
                    }
                    other => return Err(anyhow!("unknown option: -{other}")),
                }
            }
            idx += 1;
            continue;
        }

        set_input(&mut input, arg)?;
        idx += 1;
    }

    finish(mode, block_size, force, stats, output, input, false)
}

fn set_input(input: &mut Option<String>, arg: &str) -> Result<()> {
    if input.is_some() {
        return Err(anyhow!("only one input file is allowed, got unexpected argument: {arg}"));
    }
    *input = Some(arg.to_string());
    Ok(())
}

/// Resolves a long option's value either from an inline `--opt=value` or
/// by consuming the next argv entry.
fn take_value(inline: Option<String>, argv: &[String], idx: &mut usize, name: &str) -> Result<String> {
    if let Some(v) = inline {
        return Ok(v);
    }
    *idx += 1;
    argv.get(*idx).cloned().ok_or_else(|| anyhow!("{name} requires an argument"))
}

fn parse_block_size(text: &str) -> Result<u64> {
    let n: u64 = text.parse().map_err(|_| anyhow!("block size must be a positive integer, got {text:?}"))?;
    if n == 0 {
        return Err(anyhow!("block size must be positive"));
    }
    Ok(n)
}

fn finish(
    mode: OpMode,
    block_size: Option<u64>,
    force: bool,
    stats: bool,
    output: Option<String>,
    input: Option<String>,
    exit_early: bool,
) -> Result<ParsedArgs> {
    if exit_early {
        return Ok(ParsedArgs {
            mode,
            block_size: block_size.unwrap_or(DEFAULT_BLOCK_SIZE),
            force,
            stats,
            output,
            input: input.unwrap_or_default(),
            exit_early,
        });
    }

    let input = input.ok_or_else(|| anyhow!("input file missing"))?;

    if mode != OpMode::Compress && block_size.is_some() {
        return Err(anyhow!("-b/--blocksz is only valid when compressing"));
    }
    if mode == OpMode::Info && (force || stats || output.is_some()) {
        return Err(anyhow!("-f, -o, and -s are not valid with -i/--info"));
    }

    Ok(ParsedArgs {
        mode,
        block_size: block_size.unwrap_or(DEFAULT_BLOCK_SIZE),
        force,
        stats,
        output,
        input,
        exit_early,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_to_compress_with_default_block_size() {
        let parsed = parse_args("tsc", &argv(&["reads.sam"])).unwrap();
        assert_eq!(parsed.mode, OpMode::Compress);
        assert_eq!(parsed.block_size, DEFAULT_BLOCK_SIZE);
        assert_eq!(parsed.input, "reads.sam");
        assert!(!parsed.force);
        assert!(!parsed.stats);
    }

    #[test]
    fn decompress_flag_sets_mode() {
        let parsed = parse_args("tsc", &argv(&["-d", "reads.sam.tsc"])).unwrap();
        assert_eq!(parsed.mode, OpMode::Decompress);
    }

    #[test]
    fn aggregated_short_flags() {
        let parsed = parse_args("tsc", &argv(&["-fs", "reads.sam"])).unwrap();
        assert!(parsed.force);
        assert!(parsed.stats);
    }

    #[test]
    fn explicit_block_size_short_flag_separate_arg() {
        let parsed = parse_args("tsc", &argv(&["-b", "500", "reads.sam"])).unwrap();
        assert_eq!(parsed.block_size, 500);
    }

    #[test]
    fn explicit_block_size_short_flag_attached() {
        let parsed = parse_args("tsc", &argv(&["-b500", "reads.sam"])).unwrap();
        assert_eq!(parsed.block_size, 500);
    }

    #[test]
    fn long_block_size_with_equals() {
        let parsed = parse_args("tsc", &argv(&["--blocksz=42", "reads.sam"])).unwrap();
        assert_eq!(parsed.block_size, 42);
    }

    #[test]
    fn output_flag_sets_path() {
        let parsed = parse_args("tsc", &argv(&["-o", "out.tsc", "reads.sam"])).unwrap();
        assert_eq!(parsed.output, Some("out.tsc".to_string()));
    }

    #[test]
    fn missing_input_is_an_error() {
        assert!(parse_args("tsc", &argv(&["-f"])).is_err());
    }

    #[test]
    fn two_positional_arguments_is_an_error() {
        assert!(parse_args("tsc", &argv(&["a.sam", "b.sam"])).is_err());
    }

    #[test]
    fn zero_block_size_is_rejected() {
        assert!(parse_args("tsc", &argv(&["-b", "0", "reads.sam"])).is_err());
    }

    #[test]
    fn block_size_with_decompress_is_rejected() {
        assert!(parse_args("tsc", &argv(&["-d", "-b", "10", "reads.tsc"])).is_err());
    }

    #[test]
    fn info_mode_rejects_force_stats_output() {
        assert!(parse_args("tsc", &argv(&["-i", "-f", "reads.tsc"])).is_err());
    }

    #[test]
    fn help_flag_exits_early_without_requiring_input() {
        let parsed = parse_args("tsc", &argv(&["-h"])).unwrap();
        assert!(parsed.exit_early);
    }

    #[test]
    fn version_flag_exits_early_without_requiring_input() {
        let parsed = parse_args("tsc", &argv(&["--version"])).unwrap();
        assert!(parsed.exit_early);
    }

    #[test]
    fn unknown_short_option_is_rejected() {
        assert!(parse_args("tsc", &argv(&["-z", "reads.sam"])).is_err());
    }

    #[test]
    fn unknown_long_option_is_rejected() {
        assert!(parse_args("tsc", &argv(&["--bogus", "reads.sam"])).is_err());
    }
}

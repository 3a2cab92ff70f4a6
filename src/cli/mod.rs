//! CLI front-end for the `tsc` binary (spec §6, SPEC_FULL.md §4.8):
//! argument parsing, mode dispatch, and the display-level diagnostic
//! global.

pub mod args;
pub mod constants;
pub mod help;
pub mod op_mode;

//! CLI-wide constants and the display-level diagnostic global.
//!
//! Mirrors the teacher's `DISPLAYLEVEL` macro family: a single file-scoped
//! verbosity knob gates progress/stat output on stderr, rather than
//! threading a verbosity argument through every call site.

use std::sync::atomic::{AtomicU32, Ordering};

pub const PROGRAM_NAME: &str = "tsc";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = "Jan Voges";

/// Default output extension used when compressing a file with no `.sam`
/// suffix to strip (spec §6).
pub const TSC_EXTENSION: &str = ".tsc";
pub const SAM_EXTENSION: &str = ".sam";

/// 0 = silent; 1 = errors only; 2 = normal (default); 3 = verbose.
pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Conditionally print to stderr at or above `level` — equivalent to the
/// teacher's `DISPLAYLEVEL(l, ...)` macro.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_level_default_is_two() {
        assert_eq!(display_level(), 2);
    }

    #[test]
    fn display_level_round_trips() {
        let prev = display_level();
        set_display_level(0);
        assert_eq!(display_level(), 0);
        set_display_level(prev);
    }

    #[test]
    fn extension_constants() {
        assert_eq!(SAM_EXTENSION, ".sam");
        assert_eq!(TSC_EXTENSION, ".tsc");
    }
}

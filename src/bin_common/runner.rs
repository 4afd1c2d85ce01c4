//! Binary runner utilities
//!
//! Turns the outcome of a one-shot command into process output and an exit
//! code: the result on stdout and 0, or the error on stderr and 1.

use std::fmt::Debug;
use std::io::Write;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Write `result` to `out` / `err` and return the exit code
///
/// Success values are printed with `{:?}` so transaction hashes come out in
/// full (`Display` on hashes abbreviates them).
pub fn report<T: Debug>(
    result: anyhow::Result<T>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> i32 {
    match result {
        Ok(value) => {
            // Nothing sensible to do if stdout is gone
            let _ = writeln!(out, "{:?}", value);
            EXIT_SUCCESS
        }
        Err(e) => {
            let _ = writeln!(err, "Error merging positions: {:#}", e);
            EXIT_FAILURE
        }
    }
}

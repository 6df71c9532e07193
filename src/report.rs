//! Status lines written to the output channel.
//!
//! The channel is any [`core::fmt::Write`]. It is treated as best effort: a
//! failed write is dropped, never turned into control flow.

use core::fmt::Write;

/// Line printed once a mismatch has been seen.
pub const GLITCH_LINE: &str = "Glitch detected";

/// Writes `Iteration <counter> - Sum = <sum>`.
pub fn iteration<W: Write>(out: &mut W, counter: u8, sum: u32) {
    let _ = writeln!(out, "Iteration {counter} - Sum = {sum}");
}

/// Writes the glitch line.
pub fn glitch_detected<W: Write>(out: &mut W) {
    let _ = writeln!(out, "{GLITCH_LINE}");
}

use std::io::{self, BufRead, Write};

use crossterm::queue;
use crossterm::style::Print;

use super::theme;

/// Ask for one form field on `out` and read the answer from `input`.
///
/// Returns `None` at end of input. The answer is trimmed; an empty answer is
/// returned as-is so the caller's validation decides what to do with it.
pub fn prompt_field<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    queue!(
        out,
        Print(theme::prompt_style().apply(label)),
        Print(theme::dim().apply(": ")),
    )?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

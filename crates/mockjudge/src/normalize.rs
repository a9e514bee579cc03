//! Output normalization
//!
//! Program output and expected output are canonicalized the same way before
//! any comparison:
//!
//! - Carriage returns directly before a line feed are dropped (CRLF becomes LF)
//! - Trailing whitespace at the very end of the text is removed, including
//!   trailing newlines
//!
//! Leading whitespace and whitespace inside the text are kept verbatim.

/// Canonicalize line endings and trailing whitespace
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_cr = 0usize;

    for c in text.chars() {
        match c {
            '\r' => pending_cr += 1,
            '\n' => {
                // every CR in a run ending at LF belongs to the line ending
                pending_cr = 0;
                out.push('\n');
            }
            _ => {
                out.extend(std::iter::repeat_n('\r', pending_cr));
                pending_cr = 0;
                out.push(c);
            }
        }
    }
    out.extend(std::iter::repeat_n('\r', pending_cr));

    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out
}

/// Compare two outputs after normalization, byte for byte
pub fn outputs_match(expected: &str, actual: &str) -> bool {
    normalize(expected) == normalize(actual)
}

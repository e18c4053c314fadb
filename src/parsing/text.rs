//! Character-offset slicing for positional report columns.
//!
//! Report offsets count characters, not bytes: a decoded latin-1 line may
//! hold multi-byte characters (`Ñ`, `º`) before a numeric column. None of
//! these helpers can panic; ranges past the end of a line yield `""`.

/// Returns the characters at offsets `[start, end)` of `line`.
///
/// # Example
///
/// ```
/// use payroll_consolidator::parsing::slice_chars;
///
/// assert_eq!(slice_chars("Núm. Personal", 5, 13), "Personal");
/// assert_eq!(slice_chars("short", 50, 70), "");
/// assert_eq!(slice_chars("short", 2, 70), "ort");
/// ```
pub fn slice_chars(line: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let mut boundaries = line
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()));
    let Some(from) = boundaries.nth(start) else {
        return "";
    };
    let to = boundaries.nth(end - start - 1).unwrap_or(line.len());
    &line[from..to]
}

/// Returns the last `count` characters of `line` (all of it if shorter).
pub fn last_chars(line: &str, count: usize) -> &str {
    let length = line.chars().count();
    slice_chars(line, length.saturating_sub(count), length)
}

/// Converts a byte offset of `line` into a character offset.
pub(crate) fn char_offset(line: &str, byte_offset: usize) -> usize {
    line[..byte_offset].chars().count()
}

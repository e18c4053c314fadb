//! Concept code recognition.
//!
//! A concept line starts with a short class code. The code is recognized by
//! trying an ordered list of token shapes against the start of the line; the
//! first shape that matches wins and its match end is where the label begins.
//! When no shape matches, the first whitespace-delimited token is taken.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::text::char_offset;

/// The token shapes a concept code may take, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeShape {
    /// `/5` followed by digits (e.g. `/560`).
    SlashFive,
    /// `Y` or `Z` followed by exactly three digits (e.g. `Y200`).
    LetterPrefixed,
    /// Four digits (e.g. `9100`).
    FourDigits,
    /// Three to five digits (e.g. `210`, `20150`).
    DigitRun,
}

impl CodeShape {
    /// All shapes, in the order they are tried.
    pub const PRECEDENCE: [CodeShape; 4] = [
        CodeShape::SlashFive,
        CodeShape::LetterPrefixed,
        CodeShape::FourDigits,
        CodeShape::DigitRun,
    ];

    fn pattern(self) -> &'static Regex {
        static SLASH_FIVE: Lazy<Regex> = Lazy::new(|| shape_regex(r"/5\d+"));
        static LETTER_PREFIXED: Lazy<Regex> = Lazy::new(|| shape_regex(r"[YZ]\d{3}"));
        static FOUR_DIGITS: Lazy<Regex> = Lazy::new(|| shape_regex(r"\d{4}"));
        static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| shape_regex(r"\d{3,5}"));

        match self {
            CodeShape::SlashFive => &*SLASH_FIVE,
            CodeShape::LetterPrefixed => &*LETTER_PREFIXED,
            CodeShape::FourDigits => &*FOUR_DIGITS,
            CodeShape::DigitRun => &*DIGIT_RUN,
        }
    }

    /// Matches this shape at the start of `text`, after optional whitespace.
    ///
    /// Returns the code and the byte offset where the match ends.
    pub fn match_start(self, text: &str) -> Option<(&str, usize)> {
        let captures = self.pattern().captures(text)?;
        let code = captures.get(1)?;
        Some((code.as_str(), code.end()))
    }
}

// Shapes are anchored at the line start and may be preceded by whitespace.
fn shape_regex(body: &str) -> Regex {
    Regex::new(&format!(r"^\s*({})", body))
        .expect("built-in code shapes are valid patterns")
}

/// A recognized concept code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCode {
    /// The code token.
    pub code: String,
    /// Character offset where the code ends and the label begins.
    pub end: usize,
    /// The shape that matched, `None` for the first-token fallback.
    pub shape: Option<CodeShape>,
}

/// Recognizes the concept code at the start of `line`.
///
/// Tabs are read as single spaces. Shapes are tried in
/// [`CodeShape::PRECEDENCE`] order; without a match, the first
/// whitespace-delimited token is the code and ends at its first occurrence.
///
/// # Example
///
/// ```
/// use payroll_consolidator::parsing::{extract_code, CodeShape};
///
/// let code = extract_code("Y200 Auxilio de Transporte");
/// assert_eq!(code.code, "Y200");
/// assert_eq!(code.end, 4);
/// assert_eq!(code.shape, Some(CodeShape::LetterPrefixed));
///
/// let fallback = extract_code("  Total General:  1.000");
/// assert_eq!(fallback.code, "Total");
/// assert_eq!(fallback.shape, None);
/// ```
pub fn extract_code(line: &str) -> ExtractedCode {
    let text = line.replace('\t', " ");

    for shape in CodeShape::PRECEDENCE {
        if let Some((code, end)) = shape.match_start(&text) {
            return ExtractedCode {
                code: code.to_string(),
                end: char_offset(&text, end),
                shape: Some(shape),
            };
        }
    }

    let code = text.split_whitespace().next().unwrap_or("");
    let end = if code.is_empty() {
        0
    } else {
        text.find(code)
            .map_or(0, |start| char_offset(&text, start + code.len()))
    };
    ExtractedCode {
        code: code.to_string(),
        end,
        shape: None,
    }
}

//! Positional field extraction.
//!
//! Concept lines combine pattern-anchored code recognition with fixed
//! character offsets for the numeric columns. The quantity column `[50, 70)`
//! and value column `[69, 89)` overlap by one character in the export
//! layout; that overlap is reproduced as-is.

use crate::config::{ConceptLayout, NetTotalLayout};

use super::code_shape::extract_code;
use super::text::{last_chars, slice_chars};

/// Raw text fields of a concept line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptFields<'l> {
    /// Class code.
    pub code: String,
    /// Label between the code and the quantity column, trimmed.
    pub label: String,
    /// Quantity column text, trimmed.
    pub quantity: &'l str,
    /// Value column text, trimmed.
    pub value: &'l str,
}

/// Raw text fields of a net-total line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetTotalFields<'l> {
    /// Label column text, trimmed.
    pub label: &'l str,
    /// Trailing value field text, trimmed.
    pub value: &'l str,
}

/// Splits classified lines into their text fields.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    concept: ConceptLayout,
    net_total: NetTotalLayout,
}

impl FieldExtractor {
    /// Creates an extractor for the given layouts.
    pub fn new(concept: ConceptLayout, net_total: NetTotalLayout) -> Self {
        Self { concept, net_total }
    }

    /// Extracts code, label, quantity and value from a concept line.
    ///
    /// The label never reads past the label boundary, even when the real
    /// description is longer. Columns past the end of the line are empty.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_consolidator::config::{ConceptLayout, NetTotalLayout};
    /// use payroll_consolidator::parsing::FieldExtractor;
    ///
    /// let extractor = FieldExtractor::new(ConceptLayout::default(), NetTotalLayout::default());
    /// let line = format!("{:<50}{:<19}{:>20}", "Y200 Auxilio de Transporte", "30", "140.606");
    /// let fields = extractor.extract_concept(&line);
    /// assert_eq!(fields.code, "Y200");
    /// assert_eq!(fields.label, "Auxilio de Transporte");
    /// assert_eq!(fields.quantity, "30");
    /// assert_eq!(fields.value, "140.606");
    /// ```
    pub fn extract_concept<'l>(&self, line: &'l str) -> ConceptFields<'l> {
        let code = extract_code(line);
        let text = line.replace('\t', " ");
        let label = slice_chars(&text, code.end, self.concept.label_end)
            .trim()
            .to_string();
        let quantity = slice_chars(line, self.concept.quantity.start, self.concept.quantity.end);
        let value = slice_chars(line, self.concept.value.start, self.concept.value.end);

        ConceptFields {
            code: code.code,
            label,
            quantity: quantity.trim(),
            value: value.trim(),
        }
    }

    /// Extracts label and value from a (trimmed) net-total line.
    ///
    /// The value is measured back from the end of the line, so net-total
    /// lines of varying length still yield their amount.
    pub fn extract_net_total<'l>(&self, line: &'l str) -> NetTotalFields<'l> {
        let label = slice_chars(line, self.net_total.label.start, self.net_total.label.end);
        let value = last_chars(line, self.net_total.value_width);
        NetTotalFields {
            label: label.trim(),
            value: value.trim(),
        }
    }
}

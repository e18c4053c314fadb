//! Cell values shared by master data and result sheets.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A single typed cell of a master data row or a result sheet.
///
/// Master data is an open-ended table; this is the explicit optional-field
/// representation of each of its cells. `Empty` is the null of a left join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CellValue {
    /// Missing value.
    #[default]
    Empty,
    /// Free text.
    Text(String),
    /// A number.
    Number(Decimal),
    /// A boolean flag.
    Bool(bool),
    /// A calendar date.
    Date(NaiveDate),
}

impl CellValue {
    /// Infers the type of a raw delimited-text cell.
    ///
    /// Blank text is `Empty`, a plain decimal literal (`2450000`, `-12.5`) is
    /// a `Number`, everything else stays `Text`. Locale-formatted amounts such
    /// as `2.450.000,00` stay text here; the numeric normalizer handles them.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_consolidator::models::CellValue;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(CellValue::infer("  "), CellValue::Empty);
    /// assert_eq!(CellValue::infer("12345"), CellValue::Number(Decimal::from(12345)));
    /// assert_eq!(
    ///     CellValue::infer("2.450.000,00"),
    ///     CellValue::Text("2.450.000,00".to_string())
    /// );
    /// ```
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        match Decimal::from_str(trimmed) {
            Ok(number) => CellValue::Number(number),
            Err(_) => CellValue::Text(raw.to_string()),
        }
    }

    /// Returns true for the null cell.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Returns the text content, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the number, if this is a numeric cell.
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            CellValue::Number(number) => Some(*number),
            _ => None,
        }
    }
}

impl From<Option<u64>> for CellValue {
    fn from(value: Option<u64>) -> Self {
        value.map_or(CellValue::Empty, |v| CellValue::Number(Decimal::from(v)))
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => write!(f, "{}", text),
            CellValue::Number(number) => write!(f, "{}", number),
            CellValue::Bool(flag) => write!(f, "{}", flag),
            CellValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

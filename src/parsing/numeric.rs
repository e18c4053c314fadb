//! Numeric normalization for locale-formatted report values.
//!
//! The liquidation export writes amounts with `.` as thousands separator and
//! `,` as decimal separator (`1.234.567,89`). Conversion is best effort: the
//! report layout is not contractually stable, so a value that cannot be read
//! becomes [`DEFAULT_NUMBER`] instead of aborting the run.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Value returned for blank, missing or unparsable numeric text.
pub const DEFAULT_NUMBER: Decimal = Decimal::ZERO;

/// Parses locale-formatted numeric text, falling back to [`DEFAULT_NUMBER`].
///
/// Every `.` is dropped, then `,` becomes the decimal point. Surrounding
/// whitespace is ignored.
///
/// # Example
///
/// ```
/// use payroll_consolidator::parsing::{parse_or_default, DEFAULT_NUMBER};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(
///     parse_or_default(Some("1.234.567,89")),
///     Decimal::from_str("1234567.89").unwrap()
/// );
/// assert_eq!(parse_or_default(Some("")), DEFAULT_NUMBER);
/// assert_eq!(parse_or_default(None), DEFAULT_NUMBER);
/// assert_eq!(parse_or_default(Some("N/A")), DEFAULT_NUMBER);
/// ```
pub fn parse_or_default(text: Option<&str>) -> Decimal {
    let Some(text) = text else {
        return DEFAULT_NUMBER;
    };
    let normalized = text.trim().replace('.', "").replace(',', ".");
    if normalized.is_empty() {
        return DEFAULT_NUMBER;
    }
    Decimal::from_str(&normalized).unwrap_or(DEFAULT_NUMBER)
}

/// Shorthand for [`parse_or_default`] on present text.
pub fn to_number(text: &str) -> Decimal {
    parse_or_default(Some(text))
}

/// Coerces a personnel number to a nullable identifier.
///
/// Unlike amounts, an unreadable identifier is `None`, never zero: zero
/// looks valid but would join against the wrong employee.
pub fn parse_identifier(text: Option<&str>) -> Option<u64> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .and_then(|t| t.parse().ok())
}

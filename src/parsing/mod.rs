//! Liquidation report parsing.
//!
//! The report is a fixed-width text export. Parsing happens in stages:
//! - Line splitting and personnel identifier propagation
//! - Line classification (concept, net total, both or neither)
//! - Positional field extraction
//! - Numeric normalization of the locale-formatted amounts

mod builder;
mod classifier;
mod code_shape;
mod extractor;
mod identifier;
mod numeric;
mod text;

pub use builder::{ReportParser, split_lines};
pub use classifier::{LineClass, LineClassifier};
pub use code_shape::{CodeShape, ExtractedCode, extract_code};
pub use extractor::{ConceptFields, FieldExtractor, NetTotalFields};
pub use identifier::{HeaderMatcher, IdentifierContext, propagate_identifiers};
pub use numeric::{DEFAULT_NUMBER, parse_identifier, parse_or_default, to_number};
pub use text::{last_chars, slice_chars};

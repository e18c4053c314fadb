//! Report reading and decoding.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::Encoding;
use tracing::{debug, warn};

use crate::error::{ConsolidationError, ConsolidationResult};

// WHATWG maps these labels to windows-1252; the export is true ISO-8859-1.
const LATIN1_LABELS: [&str; 6] = ["latin1", "latin-1", "l1", "iso-8859-1", "iso8859-1", "iso_8859-1"];

/// The character encoding of a liquidation report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportEncoding {
    /// ISO-8859-1: every byte is the code point of the same value.
    Latin1,
    /// Any other WHATWG encoding.
    Whatwg(&'static Encoding),
}

impl ReportEncoding {
    /// Looks up an encoding by label, `None` when the label is unknown.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_consolidator::io::ReportEncoding;
    ///
    /// assert_eq!(ReportEncoding::from_label("latin1"), Some(ReportEncoding::Latin1));
    /// assert!(ReportEncoding::from_label("utf-8").is_some());
    /// assert!(ReportEncoding::from_label("klingon-8").is_none());
    /// ```
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        if LATIN1_LABELS.contains(&label.as_str()) {
            return Some(ReportEncoding::Latin1);
        }
        Encoding::for_label(label.as_bytes()).map(ReportEncoding::Whatwg)
    }

    /// Decodes report bytes. Never fails: malformed sequences become U+FFFD.
    pub fn decode<'b>(&self, bytes: &'b [u8]) -> Cow<'b, str> {
        match self {
            ReportEncoding::Latin1 => encoding_rs::mem::decode_latin1(bytes),
            ReportEncoding::Whatwg(encoding) => {
                let (text, _, had_errors) = encoding.decode(bytes);
                if had_errors {
                    warn!(
                        encoding = encoding.name(),
                        "Report contains malformed sequences; replaced"
                    );
                }
                text
            }
        }
    }
}

/// Reads and decodes the report at `path`.
///
/// # Returns
///
/// The decoded text, or an error if:
/// - The encoding label is unknown (`InvalidConfig`)
/// - The file cannot be read (`ReportRead`)
pub fn read_report<P: AsRef<Path>>(path: P, encoding: &str) -> ConsolidationResult<String> {
    let path = path.as_ref();
    let encoding =
        ReportEncoding::from_label(encoding).ok_or_else(|| ConsolidationError::InvalidConfig {
            field: "report.encoding".to_string(),
            message: format!("unknown encoding label '{}'", encoding),
        })?;

    let bytes = fs::read(path).map_err(|e| ConsolidationError::ReportRead {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let text = encoding.decode(&bytes).into_owned();

    debug!(
        path = %path.display(),
        bytes = bytes.len(),
        "Decoded liquidation report"
    );
    Ok(text)
}

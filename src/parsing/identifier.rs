//! Personnel identifier detection and forward propagation.
//!
//! Each employee section of the report opens with a header line such as
//! `Núm. Personal........12345`. The identifier declared there applies to
//! every following line until the next header declares another one.

use regex::Regex;

use crate::error::{ConsolidationError, ConsolidationResult};
use crate::models::ReportLine;

/// Recognizes identifier header lines.
///
/// A header contains one of the configured labels. The personnel number is
/// the digit run after the label's last word and a run of filler dots,
/// wherever that appears on the header line. Several label spellings are
/// accepted because the legacy encoding drops accents.
#[derive(Debug, Clone)]
pub struct HeaderMatcher {
    labels: Vec<String>,
    anchors: Vec<Regex>,
}

impl HeaderMatcher {
    /// Builds a matcher for the given label spellings.
    pub fn new(labels: &[String]) -> ConsolidationResult<Self> {
        let labels: Vec<String> = labels
            .iter()
            .filter(|label| !label.trim().is_empty())
            .cloned()
            .collect();

        let mut words: Vec<&str> = Vec::new();
        for word in labels.iter().filter_map(|label| label.split_whitespace().last()) {
            if !words.contains(&word) {
                words.push(word);
            }
        }
        let anchors = words
            .into_iter()
            .map(|word| {
                Regex::new(&format!(r"{}\.+(\d+)", regex::escape(word))).map_err(|e| {
                    ConsolidationError::InvalidConfig {
                        field: "report.header_labels".to_string(),
                        message: e.to_string(),
                    }
                })
            })
            .collect::<ConsolidationResult<Vec<_>>>()?;

        Ok(Self { labels, anchors })
    }

    /// Returns true if `line` carries a header label, with or without digits.
    pub fn is_header(&self, line: &str) -> bool {
        self.labels.iter().any(|label| line.contains(label.as_str()))
    }

    /// Returns the identifier declared on `line`, if it is a header with digits.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_consolidator::parsing::HeaderMatcher;
    ///
    /// let matcher = HeaderMatcher::new(&["Núm. Personal".to_string(), "Nm. Personal".to_string()])?;
    /// assert_eq!(matcher.identifier("Núm. Personal.......12345  Juan"), Some("12345"));
    /// assert_eq!(matcher.identifier("Nm. Personal...678"), Some("678"));
    /// assert_eq!(matcher.identifier("Y200 Auxilio de Transporte"), None);
    /// # Ok::<(), payroll_consolidator::error::ConsolidationError>(())
    /// ```
    pub fn identifier<'l>(&self, line: &'l str) -> Option<&'l str> {
        if !self.is_header(line) {
            return None;
        }
        self.anchors
            .iter()
            .find_map(|regex| regex.captures(line)?.get(1))
            .map(|digits| digits.as_str())
    }
}

/// Carries the identifier in force while lines are scanned top to bottom.
///
/// A header without digits leaves the current identifier unchanged; lines
/// before the first header have none.
#[derive(Debug)]
pub struct IdentifierContext<'m> {
    matcher: &'m HeaderMatcher,
    current: Option<String>,
}

impl<'m> IdentifierContext<'m> {
    /// Starts a scan with no identifier in force.
    pub fn new(matcher: &'m HeaderMatcher) -> Self {
        Self {
            matcher,
            current: None,
        }
    }

    /// Observes the next line and returns the identifier in force for it.
    pub fn advance(&mut self, line: &str) -> Option<&str> {
        if let Some(identifier) = self.matcher.identifier(line) {
            self.current = Some(identifier.to_string());
        }
        self.current.as_deref()
    }

    /// The identifier currently in force.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

/// Pairs every line with the identifier in force for it.
pub fn propagate_identifiers<'l>(
    lines: &'l [ReportLine],
    matcher: &HeaderMatcher,
) -> Vec<(&'l ReportLine, Option<String>)> {
    let mut context = IdentifierContext::new(matcher);
    lines
        .iter()
        .map(|line| {
            let identifier = context.advance(&line.text).map(str::to_string);
            (line, identifier)
        })
        .collect()
}

//! Line classification.
//!
//! Concept and net-total detection are independent predicates over the same
//! line stream. By default a line may satisfy both; the concept layout's
//! `exclude_net_totals` switch removes net-total lines from the concept pass.

use crate::config::{ConceptLayout, NetTotalLayout};

use super::code_shape::extract_code;

/// How a line was classified. Both flags may be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineClass {
    /// The line is a payroll concept.
    pub concept: bool,
    /// The line is a net-total summary.
    pub net_total: bool,
}

/// Decides which record sets a report line belongs to.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    concept: ConceptLayout,
    net_total: NetTotalLayout,
}

impl LineClassifier {
    /// Creates a classifier for the given layouts.
    pub fn new(concept: ConceptLayout, net_total: NetTotalLayout) -> Self {
        Self { concept, net_total }
    }

    /// True if the line carries the net-total marker.
    pub fn is_net_total(&self, line: &str) -> bool {
        line.contains(self.net_total.marker.as_str())
    }

    /// True if the line is a payroll concept.
    ///
    /// The trimmed line must not contain the currency footer, must be longer
    /// than the minimum length, and its code must start with an accepted
    /// prefix.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_consolidator::config::{ConceptLayout, NetTotalLayout};
    /// use payroll_consolidator::parsing::LineClassifier;
    ///
    /// let classifier = LineClassifier::new(ConceptLayout::default(), NetTotalLayout::default());
    /// assert!(classifier.is_concept("Y200 Auxilio de Transporte                        30"));
    /// assert!(!classifier.is_concept("Y200 Auxilio"));
    /// assert!(!classifier.is_concept("1500 Salario basico                               30"));
    /// ```
    pub fn is_concept(&self, line: &str) -> bool {
        let trimmed = line.trim();
        if !self.concept.boilerplate.is_empty() && trimmed.contains(self.concept.boilerplate.as_str())
        {
            return false;
        }
        if trimmed.chars().count() <= self.concept.min_length {
            return false;
        }
        if self.concept.exclude_net_totals && self.is_net_total(trimmed) {
            return false;
        }
        let code = extract_code(trimmed);
        self.has_accepted_prefix(&code.code)
    }

    /// True if `code` starts with one of the accepted class prefixes.
    pub fn has_accepted_prefix(&self, code: &str) -> bool {
        self.concept
            .code_prefixes
            .iter()
            .any(|prefix| code.starts_with(prefix.as_str()))
    }

    /// Runs both predicates.
    pub fn classify(&self, line: &str) -> LineClass {
        LineClass {
            concept: self.is_concept(line),
            net_total: self.is_net_total(line),
        }
    }
}

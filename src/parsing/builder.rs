//! Record building: from report text to concept and net-total records.

use tracing::{debug, trace};

use crate::config::ReportLayout;
use crate::error::ConsolidationResult;
use crate::models::{ConceptRecord, NetTotalRecord, ParsedReport, ReportLine};

use super::classifier::LineClassifier;
use super::extractor::FieldExtractor;
use super::identifier::{HeaderMatcher, propagate_identifiers};
use super::numeric::{parse_identifier, to_number};

/// Splits report text into its non-blank lines.
///
/// Lines are split on `\n` and carriage returns are removed from both ends.
/// Other leading whitespace is kept: concept columns are positional.
///
/// # Example
///
/// ```
/// use payroll_consolidator::parsing::split_lines;
///
/// let lines = split_lines("HEADER\r\n\r\n   \n  Y200 Aux\r\n");
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[1].text, "  Y200 Aux");
/// assert_eq!(lines[1].line_number, 4);
/// ```
pub fn split_lines(text: &str) -> Vec<ReportLine> {
    text.split('\n')
        .enumerate()
        .map(|(index, raw)| (index + 1, raw.trim_matches('\r')))
        .filter(|(_, raw)| !raw.trim().is_empty())
        .map(|(line_number, raw)| ReportLine {
            line_number,
            text: raw.to_string(),
        })
        .collect()
}

/// Parses a decoded liquidation report into concept and net-total records.
///
/// Runs the whole parsing stage in one sequential pass: identifier
/// propagation, classification, field extraction and numeric normalization.
#[derive(Debug, Clone)]
pub struct ReportParser {
    headers: HeaderMatcher,
    classifier: LineClassifier,
    extractor: FieldExtractor,
}

impl ReportParser {
    /// Creates a parser for the given report layout.
    pub fn new(layout: &ReportLayout) -> ConsolidationResult<Self> {
        Ok(Self {
            headers: HeaderMatcher::new(&layout.header_labels)?,
            classifier: LineClassifier::new(layout.concept.clone(), layout.net_total.clone()),
            extractor: FieldExtractor::new(layout.concept.clone(), layout.net_total.clone()),
        })
    }

    /// Parses report text into both record sets, in file order.
    ///
    /// Lines matching neither predicate are skipped; unreadable numbers
    /// become zero. This never fails.
    pub fn parse(&self, text: &str) -> ParsedReport {
        let lines = split_lines(text);
        let mut report = ParsedReport::default();

        for (line, identifier) in propagate_identifiers(&lines, &self.headers) {
            let employee_id = parse_identifier(identifier.as_deref());
            let class = self.classifier.classify(&line.text);
            trace!(
                line_number = line.line_number,
                concept = class.concept,
                net_total = class.net_total,
                "Classified report line"
            );

            if class.concept {
                report
                    .concepts
                    .push(self.build_concept(line, employee_id));
            }
            if class.net_total {
                report
                    .net_totals
                    .push(self.build_net_total(line, employee_id));
            }
        }

        debug!(
            lines = lines.len(),
            concepts = report.concepts.len(),
            net_totals = report.net_totals.len(),
            "Parsed liquidation report"
        );
        report
    }

    fn build_concept(&self, line: &ReportLine, employee_id: Option<u64>) -> ConceptRecord {
        let fields = self.extractor.extract_concept(&line.text);
        ConceptRecord {
            code: fields.code,
            label: fields.label,
            quantity: to_number(fields.quantity),
            value: to_number(fields.value),
            employee_id,
            line_number: line.line_number,
        }
    }

    fn build_net_total(&self, line: &ReportLine, employee_id: Option<u64>) -> NetTotalRecord {
        let fields = self.extractor.extract_net_total(line.text.trim());
        NetTotalRecord {
            label: fields.label.to_string(),
            value: to_number(fields.value),
            employee_id,
            line_number: line.line_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn create_test_parser() -> ReportParser {
        ReportParser::new(&ReportLayout::default()).unwrap()
    }

    fn concept_line(code_and_label: &str, quantity: &str, value: &str) -> String {
        format!("{:<50}{:<19}{:>20}", code_and_label, quantity, value)
    }

    fn net_line(value: &str) -> String {
        format!("{:<40}{:>20}", "Total General:", value)
    }

    fn create_test_report() -> String {
        [
            "JERONIMO MARTINS COLOMBIA - LIQUIDACION DE NOMINA".to_string(),
            "Núm. Personal.........12345   PEREZ GOMEZ JUAN".to_string(),
            concept_line("Y200 Auxilio de Transporte", "30", "140.606"),
            concept_line("Z105 Aporte Salud", "", "-98.000"),
            "DOS MILLONES CUATROCIENTOS CINCUENTA MIL PESOS CON 00/100".to_string(),
            net_line("2.450.000"),
            "".to_string(),
            "Nm. Personal.........67890   RUIZ ANA".to_string(),
            concept_line("9100 Salario basico", "30", "3.000.000,50"),
            net_line("2.900.000"),
        ]
        .join("\r\n")
    }

    #[test]
    fn test_parse_recovers_concepts_with_identifiers() {
        let report = create_test_parser().parse(&create_test_report());
        assert_eq!(report.concepts.len(), 3);

        let first = &report.concepts[0];
        assert_eq!(first.code, "Y200");
        assert_eq!(first.label, "Auxilio de Transporte");
        assert_eq!(first.quantity, Decimal::from(30));
        assert_eq!(first.value, Decimal::from(140606));
        assert_eq!(first.employee_id, Some(12345));
        assert_eq!(first.line_number, 3);

        assert_eq!(report.concepts[1].value, Decimal::from(-98000));
        assert_eq!(report.concepts[1].quantity, Decimal::ZERO);
        assert_eq!(report.concepts[2].employee_id, Some(67890));
        assert_eq!(report.concepts[2].value, Decimal::new(300000050, 2));
    }

    #[test]
    fn test_parse_recovers_net_totals_per_section() {
        let report = create_test_parser().parse(&create_test_report());
        let nets: Vec<(Option<u64>, Decimal)> = report
            .net_totals
            .iter()
            .map(|n| (n.employee_id, n.value))
            .collect();
        assert_eq!(
            nets,
            vec![
                (Some(12345), Decimal::from(2450000)),
                (Some(67890), Decimal::from(2900000)),
            ]
        );
        assert_eq!(report.net_totals[0].label, "Total General:");
    }

    #[test]
    fn test_records_before_first_header_have_no_identifier() {
        let text = [concept_line("Y300 Bono", "1", "10.000"), net_line("10.000")].join("\n");
        let report = create_test_parser().parse(&text);
        assert_eq!(report.concepts[0].employee_id, None);
        assert_eq!(report.net_totals[0].employee_id, None);
    }

    #[test]
    fn test_unparsable_columns_become_zero() {
        let text = concept_line("Y200 Auxilio de Transporte", "N/A", "ERROR");
        let report = create_test_parser().parse(&text);
        assert_eq!(report.concepts[0].quantity, Decimal::ZERO);
        assert_eq!(report.concepts[0].value, Decimal::ZERO);
    }

    #[test]
    fn test_unrelated_text_yields_empty_report() {
        let report = create_test_parser().parse("hello\nworld\n\n");
        assert!(report.is_empty());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = create_test_parser();
        let text = create_test_report();
        assert_eq!(parser.parse(&text), parser.parse(&text));
    }

    #[test]
    fn test_split_lines_drops_blank_and_keeps_numbering() {
        let lines = split_lines("a\n\n\r\nb");
        let numbers: Vec<usize> = lines.iter().map(|l| l.line_number).collect();
        assert_eq!(numbers, vec![1, 4]);
    }
}

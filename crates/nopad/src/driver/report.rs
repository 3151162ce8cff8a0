//! Output of findings: codespan diagnostics or JSON

use serde::Serialize;

use super::LintRun;
use crate::common::{DiagnosticReporter, LintResult};

/// One finding in machine-readable form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonFinding {
    pub file: String,
    pub line: usize,
    pub column: usize,
    #[serde(rename = "struct")]
    pub struct_name: Option<String>,
    pub actual_size: u64,
    pub reference_size: u64,
    pub padding: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_order: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_size: Option<u64>,
}

/// Build a reporter that knows every source file of the run, in file index order
pub fn reporter_for(run: &LintRun, reporter: DiagnosticReporter) -> DiagnosticReporter {
    let mut reporter = reporter;
    for file in &run.files {
        reporter.add_file(file.path.display().to_string(), file.source.clone());
    }
    reporter
}

/// Report source and I/O errors
pub fn emit_errors(run: &LintRun, reporter: &DiagnosticReporter) {
    for (file, error) in &run.errors {
        match file {
            Some(id) if error.span().is_some() => reporter.report_error(*id, error),
            _ => reporter.report_plain(error),
        }
    }
}

/// Report findings as warnings
pub fn emit_text(run: &LintRun, reporter: &DiagnosticReporter) {
    for report in &run.reports {
        reporter.report_finding(report.file, report);
    }
}

/// Findings with 1-based line and column of their `struct` keyword
pub fn json_findings(run: &LintRun, reporter: &DiagnosticReporter) -> Vec<JsonFinding> {
    run.reports
        .iter()
        .map(|report| {
            let (line, column) = reporter.location(report.file, report.span.start).unwrap_or((0, 0));
            JsonFinding {
                file: run.files[report.file].path.display().to_string(),
                line,
                column,
                struct_name: report.struct_name.clone(),
                actual_size: report.finding.actual_size,
                reference_size: report.finding.reference_size,
                padding: report.finding.padding(),
                suggested_order: report.suggestion.as_ref().map(|s| s.order.clone()),
                suggested_size: report.suggestion.as_ref().map(|s| s.size),
            }
        })
        .collect()
}

pub fn to_json(findings: &[JsonFinding]) -> LintResult<String> {
    Ok(serde_json::to_string_pretty(findings)?)
}

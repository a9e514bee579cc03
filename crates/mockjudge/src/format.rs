//! Plain-text rendering of grade outcomes

use std::fmt::Write;

use crate::grade::{BatchReport, CaseReport};
use crate::types::{GradeDetail, GradeMode};

const EXPECTED_HEADER: &str = "[expected]";
const ACTUAL_HEADER: &str = "[actual]";
const COLUMN_GAP: &str = " | ";

/// Flat diagnostic text for a detail payload
pub fn render_detail(detail: &GradeDetail) -> String {
    match detail {
        GradeDetail::None => String::new(),
        GradeDetail::Mismatch { expected, actual } => {
            format!("{EXPECTED_HEADER}\n{expected}\n\n{ACTUAL_HEADER}\n{actual}")
                .trim()
                .to_owned()
        }
        GradeDetail::Output { stdout, stderr } => {
            let mut text = format!("[stdout]\n{stdout}");
            if !stderr.is_empty() {
                let _ = write!(text, "\n\n[stderr]\n{stderr}");
            }
            text.trim().to_owned()
        }
        GradeDetail::Diagnostic { text } => text.clone(),
    }
}

/// Expected and actual output as two aligned columns
pub fn side_by_side(expected: &str, actual: &str) -> String {
    let left: Vec<&str> = expected.lines().collect();
    let right: Vec<&str> = actual.lines().collect();
    let width = left
        .iter()
        .map(|line| line.chars().count())
        .chain(std::iter::once(EXPECTED_HEADER.len()))
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    push_row(&mut out, EXPECTED_HEADER, ACTUAL_HEADER, width);
    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).copied().unwrap_or_default();
        let r = right.get(i).copied().unwrap_or_default();
        push_row(&mut out, l, r, width);
    }
    out.truncate(out.trim_end().len());
    out
}

fn push_row(out: &mut String, left: &str, right: &str, width: usize) {
    let _ = writeln!(out, "{left:<width$}{COLUMN_GAP}{right}");
}

/// Title line of a case, e.g. `example 2: FAIL (wrong answer)`
pub fn case_title(case: &CaseReport) -> String {
    let outcome = &case.outcome;
    let status = match (outcome.mode, outcome.ok) {
        (GradeMode::Compare, true) => "PASS",
        (GradeMode::Compare, false) => "FAIL",
        (GradeMode::Informational, true) => "RAN",
        (GradeMode::Informational, false) => "ERROR",
    };
    match outcome.failure {
        Some(kind) => format!("example {}: {status} ({})", case.number, kind.label()),
        None => format!("example {}: {status}", case.number),
    }
}

/// Full report of a batch, one block per case and a summary line
pub fn render_report(report: &BatchReport) -> String {
    let mut out = String::new();
    for case in &report.cases {
        let _ = writeln!(out, "{}", case_title(case));
        let body = match &case.outcome.detail {
            GradeDetail::Mismatch { expected, actual } => side_by_side(expected, actual),
            detail => render_detail(detail),
        };
        if !body.is_empty() {
            for line in body.lines() {
                let _ = writeln!(out, "  {line}");
            }
        }
    }

    let verdict = if report.all_passed { "PASSED" } else { "FAILED" };
    let _ = write!(
        out,
        "{verdict}: {}/{} examples passed",
        report.passed(),
        report.compared()
    );
    out
}

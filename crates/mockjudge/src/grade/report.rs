use serde::Serialize;

use crate::types::{GradeMode, GradeOutcome};

/// Where a case in a batch came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseOrigin {
    Sample,
    Custom,
}

/// One graded case of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    /// 1-based position in the batch, samples first
    pub number: usize,
    pub origin: CaseOrigin,
    pub outcome: GradeOutcome,
}

/// Outcomes of a batch, in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub cases: Vec<CaseReport>,

    /// True when every compare-mode case passed.
    /// Informational cases never affect it.
    pub all_passed: bool,
}

impl BatchReport {
    pub fn new(cases: Vec<CaseReport>) -> Self {
        let all_passed = cases
            .iter()
            .filter(|c| c.outcome.mode == GradeMode::Compare)
            .all(|c| c.outcome.ok);
        Self { cases, all_passed }
    }

    /// Number of compare-mode cases
    pub fn compared(&self) -> usize {
        self.cases
            .iter()
            .filter(|c| c.outcome.mode == GradeMode::Compare)
            .count()
    }

    /// Number of compare-mode cases that passed
    pub fn passed(&self) -> usize {
        self.cases
            .iter()
            .filter(|c| c.outcome.mode == GradeMode::Compare && c.outcome.ok)
            .count()
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &GradeOutcome> {
        self.cases.iter().map(|c| &c.outcome)
    }
}

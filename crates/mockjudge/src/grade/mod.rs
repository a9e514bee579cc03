//! Grading engine
//!
//! Runs a submission through the pipeline once per test case and classifies
//! each result. Cases are processed one at a time, in order, and a failing
//! case never stops the batch.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, instrument};

pub use crate::grade::report::{BatchReport, CaseOrigin, CaseReport};
pub use crate::grade::verdict::{judge, report};

mod report;
mod verdict;

use crate::config::Config;
use crate::language::LanguageSpec;
use crate::problem::ProblemPayload;
use crate::runner::{ExecutionRequest, RequestError, Runner};
use crate::types::{GradeOutcome, TestCase};

/// The program under test
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    pub language: &'a dyn LanguageSpec,
    pub source: &'a Path,
    /// Directory for compile artifacts and the program's working directory
    pub work_dir: &'a Path,
    /// Run budget per case
    pub timeout: Duration,
}

impl<'a> Submission<'a> {
    pub fn new(
        language: &'a dyn LanguageSpec,
        source: &'a Path,
        work_dir: &'a Path,
        timeout: Duration,
    ) -> Self {
        Self {
            language,
            source,
            work_dir,
            timeout,
        }
    }

    fn request(&self, stdin: &str) -> ExecutionRequest {
        ExecutionRequest::new(self.source, self.work_dir)
            .stdin(stdin)
            .timeout(self.timeout)
    }
}

/// Grades submissions against test cases
#[derive(Debug, Clone, Default)]
pub struct Grader {
    runner: Runner,
}

impl Grader {
    pub fn new(config: Config) -> Self {
        Self {
            runner: Runner::new(config),
        }
    }

    pub fn with_runner(runner: Runner) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    /// Run once and compare against the case's expected output.
    ///
    /// A case without expected output is compared against empty output.
    #[instrument(skip_all, fields(language = submission.language.id()))]
    pub async fn grade_one(
        &self,
        submission: &Submission<'_>,
        case: &TestCase,
    ) -> Result<GradeOutcome, RequestError> {
        let result = self
            .runner
            .run_program(submission.language, &submission.request(&case.input))
            .await?;
        let expected = case.expected.as_deref().unwrap_or_default();
        Ok(judge(&result, expected, submission.timeout))
    }

    /// Run once and report the captured output without comparing
    #[instrument(skip_all, fields(language = submission.language.id()))]
    pub async fn run_only(
        &self,
        submission: &Submission<'_>,
        input: &str,
    ) -> Result<GradeOutcome, RequestError> {
        let result = self
            .runner
            .run_program(submission.language, &submission.request(input))
            .await?;
        Ok(report(&result, submission.timeout))
    }

    /// Grade samples, then custom cases, sequentially.
    ///
    /// Cases with expected output are compared; cases without it are run in
    /// informational mode. Every case is run, whatever happened before it.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the submission itself cannot be executed.
    #[instrument(
        skip_all,
        fields(
            language = submission.language.id(),
            samples = samples.len(),
            custom = custom.len()
        )
    )]
    pub async fn grade_all(
        &self,
        submission: &Submission<'_>,
        samples: &[TestCase],
        custom: &[TestCase],
    ) -> Result<BatchReport, RequestError> {
        submission.request("").validate()?;

        let ordered = samples
            .iter()
            .map(|case| (CaseOrigin::Sample, case))
            .chain(custom.iter().map(|case| (CaseOrigin::Custom, case)));

        let mut cases = Vec::with_capacity(samples.len() + custom.len());
        for (origin, case) in ordered {
            let number = cases.len() + 1;
            let outcome = if case.is_compare() {
                self.grade_one(submission, case).await?
            } else {
                self.run_only(submission, &case.input).await?
            };
            debug!(
                number,
                ?origin,
                ok = outcome.ok,
                failure = ?outcome.failure,
                "case graded"
            );
            cases.push(CaseReport {
                number,
                origin,
                outcome,
            });
        }

        let report = BatchReport::new(cases);
        info!(
            passed = report.passed(),
            compared = report.compared(),
            all_passed = report.all_passed,
            "batch graded"
        );
        Ok(report)
    }

    /// Grade a problem's samples followed by custom cases
    pub async fn grade_problem(
        &self,
        submission: &Submission<'_>,
        problem: &ProblemPayload,
        custom: &[TestCase],
    ) -> Result<BatchReport, RequestError> {
        self.grade_all(submission, &problem.test_cases(), custom)
            .await
    }
}

//! Problem data supplied by the discovery collaborator
//!
//! Problems are fetched and scraped elsewhere; this module only defines the
//! shape they arrive in and turns their samples into test cases.

use serde::{Deserialize, Serialize};

use crate::types::TestCase;

/// Base URL of problem pages
pub const PROBLEM_BASE_URL: &str = "https://www.acmicpc.net/problem";

/// Link to a problem page
pub fn problem_url(id: u32) -> String {
    format!("{PROBLEM_BASE_URL}/{id}")
}

/// Entry in a list of discovered problems
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemSummary {
    #[serde(alias = "problemId")]
    pub id: u32,
    pub title: String,
}

/// A sample input/output pair as published with the problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCase {
    pub input: String,
    pub output: String,
}

/// Full problem payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemPayload {
    #[serde(alias = "problemId")]
    pub id: u32,
    pub title: String,

    #[serde(default)]
    pub url: String,

    #[serde(default, alias = "descHtml")]
    pub description: String,

    #[serde(default, alias = "inputHtml")]
    pub input_spec: String,

    #[serde(default, alias = "outputHtml")]
    pub output_spec: String,

    #[serde(default, alias = "samples")]
    pub sample_test_cases: Vec<SampleCase>,
}

impl ProblemPayload {
    /// Samples as compare-mode test cases, in published order
    pub fn test_cases(&self) -> Vec<TestCase> {
        self.sample_test_cases
            .iter()
            .map(|s| TestCase::sample(s.input.clone(), s.output.clone()))
            .collect()
    }

    pub fn summary(&self) -> ProblemSummary {
        ProblemSummary {
            id: self.id,
            title: self.title.clone(),
        }
    }
}

/// A user-entered case as stored by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCase {
    pub input: String,

    #[serde(default)]
    pub output: Option<String>,
}

impl From<CustomCase> for TestCase {
    fn from(case: CustomCase) -> Self {
        TestCase::custom(case.input, case.output.as_deref())
    }
}

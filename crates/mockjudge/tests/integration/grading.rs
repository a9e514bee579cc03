use std::time::Duration;

use mockjudge::grade::{CaseOrigin, Grader, Submission};
use mockjudge::problem::ProblemPayload;
use mockjudge::types::{FailureKind, GradeDetail, GradeMode, TestCase};

use super::{SHELL, SHELL_BUILD, SUM_BUILD_SCRIPT, SUM_SCRIPT, Workspace};

const BUDGET: Duration = Duration::from_millis(2_000);

#[tokio::test]
async fn test_grade_one_passes() {
    let workspace = Workspace::new();
    let source = workspace.write("main.sh", SUM_SCRIPT);
    let submission = Submission::new(&SHELL, &source, workspace.path(), BUDGET);

    let outcome = Grader::default()
        .grade_one(&submission, &TestCase::sample("1 2\n", "3\n"))
        .await
        .unwrap();

    assert!(outcome.ok);
    assert_eq!(outcome.mode, GradeMode::Compare);
    assert_eq!(outcome.detail_text(), "");
}

#[tokio::test]
async fn test_grade_one_wrong_answer() {
    let workspace = Workspace::new();
    let source = workspace.write("main.sh", "echo 4\n");
    let submission = Submission::new(&SHELL, &source, workspace.path(), BUDGET);

    let outcome = Grader::default()
        .grade_one(&submission, &TestCase::sample("1 2\n", "3\n"))
        .await
        .unwrap();

    assert!(!outcome.ok);
    assert_eq!(outcome.failure, Some(FailureKind::OutputMismatch));
    assert_eq!(
        outcome.detail,
        GradeDetail::Mismatch {
            expected: "3".to_owned(),
            actual: "4".to_owned(),
        }
    );
}

#[tokio::test]
async fn test_grade_one_compile_failure() {
    let workspace = Workspace::new();
    let source = workspace.write("build.sh", "echo 'error: oops' >&2\nexit 1\n");
    let submission = Submission::new(&SHELL_BUILD, &source, workspace.path(), BUDGET);

    let outcome = Grader::default()
        .grade_one(&submission, &TestCase::sample("", "3"))
        .await
        .unwrap();

    assert!(!outcome.ok);
    assert_eq!(outcome.failure, Some(FailureKind::CompileFailure));
    assert_eq!(outcome.detail_text(), "compilation failed\nerror: oops");
}

#[tokio::test]
async fn test_grade_one_time_limit() {
    let workspace = Workspace::new();
    let source = workspace.write("main.sh", "while :; do :; done\n");
    let submission = Submission::new(
        &SHELL,
        &source,
        workspace.path(),
        Duration::from_millis(200),
    );

    let outcome = Grader::default()
        .grade_one(&submission, &TestCase::sample("", "3"))
        .await
        .unwrap();

    assert!(!outcome.ok);
    assert_eq!(outcome.failure, Some(FailureKind::RunTimeout));
    assert!(outcome.detail_text().starts_with("time limit exceeded (200ms)"));
}

#[tokio::test]
async fn test_grade_one_runtime_error() {
    let workspace = Workspace::new();
    let source = workspace.write("main.sh", "echo 'division by zero' >&2\nexit 1\n");
    let submission = Submission::new(&SHELL, &source, workspace.path(), BUDGET);

    let outcome = Grader::default()
        .grade_one(&submission, &TestCase::sample("", "3"))
        .await
        .unwrap();

    assert!(!outcome.ok);
    assert_eq!(outcome.failure, Some(FailureKind::RuntimeError));
    assert_eq!(outcome.detail_text(), "runtime error\ndivision by zero");
}

#[tokio::test]
async fn test_run_only_reports_output() {
    let workspace = Workspace::new();
    let source = workspace.write("main.sh", "cat\necho note >&2\n");
    let submission = Submission::new(&SHELL, &source, workspace.path(), BUDGET);

    let outcome = Grader::default()
        .run_only(&submission, "hello\r\n")
        .await
        .unwrap();

    assert!(outcome.ok);
    assert_eq!(outcome.mode, GradeMode::Informational);
    assert_eq!(outcome.detail_text(), "[stdout]\nhello\n\n[stderr]\nnote");
}

#[tokio::test]
async fn test_grade_all_keeps_order_and_continues_after_failure() {
    let workspace = Workspace::new();
    let source = workspace.write("build.sh", SUM_BUILD_SCRIPT);
    let submission = Submission::new(&SHELL_BUILD, &source, workspace.path(), BUDGET);

    let samples = [
        TestCase::sample("1 2\n", "3\n"),
        TestCase::sample("2 2\n", "5\n"),
        TestCase::sample("10 20\n", "30"),
    ];
    let custom = [
        TestCase::custom("7 8\n", Some("15")),
        TestCase::custom("100 1\n", Some("   ")),
    ];

    let report = Grader::default()
        .grade_all(&submission, &samples, &custom)
        .await
        .unwrap();

    let numbers: Vec<usize> = report.cases.iter().map(|c| c.number).collect();
    assert_eq!(numbers, [1, 2, 3, 4, 5]);
    let origins: Vec<CaseOrigin> = report.cases.iter().map(|c| c.origin).collect();
    assert_eq!(
        origins,
        [
            CaseOrigin::Sample,
            CaseOrigin::Sample,
            CaseOrigin::Sample,
            CaseOrigin::Custom,
            CaseOrigin::Custom,
        ]
    );

    let ok: Vec<bool> = report.outcomes().map(|o| o.ok).collect();
    assert_eq!(ok, [true, false, true, true, true]);
    assert_eq!(report.cases[4].outcome.mode, GradeMode::Informational);
    assert_eq!(report.cases[4].outcome.detail_text(), "[stdout]\n101");

    assert!(!report.all_passed);
    assert_eq!(report.passed(), 3);
    assert_eq!(report.compared(), 4);
}

#[tokio::test]
async fn test_informational_failure_does_not_fail_batch() {
    let workspace = Workspace::new();
    let source = workspace.write(
        "main.sh",
        "read a b\nif [ \"$a\" = 0 ]; then exit 3; fi\necho $((a + b))\n",
    );
    let submission = Submission::new(&SHELL, &source, workspace.path(), BUDGET);

    let report = Grader::default()
        .grade_all(
            &submission,
            &[TestCase::sample("1 1\n", "2")],
            &[TestCase::custom("0 1\n", None)],
        )
        .await
        .unwrap();

    assert!(report.all_passed);
    let custom = &report.cases[1].outcome;
    assert!(!custom.ok);
    assert_eq!(custom.failure, Some(FailureKind::RuntimeError));
}

#[tokio::test]
async fn test_grade_problem_samples() {
    let payload: ProblemPayload = serde_json::from_str(
        r#"{
            "id": 1000,
            "title": "A+B",
            "sampleTestCases": [
                { "input": "1 2\n", "output": "3\n" },
                { "input": "3 4\n", "output": "7\n" }
            ]
        }"#,
    )
    .unwrap();

    let workspace = Workspace::new();
    let source = workspace.write("main.sh", SUM_SCRIPT);
    let submission = Submission::new(&SHELL, &source, workspace.path(), BUDGET);

    let report = Grader::default()
        .grade_problem(&submission, &payload, &[])
        .await
        .unwrap();

    assert_eq!(report.cases.len(), 2);
    assert!(report.all_passed);
}

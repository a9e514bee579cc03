use std::time::Duration;

use mockjudge::config::Config;
use mockjudge::runner::{CompileOutcome, ExecutionRequest, RequestError, Runner};
use mockjudge::types::StageFailure;

use super::{
    BUILD_ARTIFACT, SHELL, SHELL_BUILD, SUM_BUILD_SCRIPT, SUM_SCRIPT, Shell, ShellBuild,
    Workspace,
};

#[tokio::test]
async fn test_interpreted_program_reads_stdin() {
    let workspace = Workspace::new();
    let source = workspace.write("main.sh", SUM_SCRIPT);
    let runner = Runner::with_defaults();

    let request = ExecutionRequest::new(&source, workspace.path()).stdin("1 2\n");
    let result = runner.run_program(&SHELL, &request).await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.stdout, "3\n");
    assert_eq!(result.failure, None);
}

#[tokio::test]
async fn test_compiled_program_runs_artifact() {
    let workspace = Workspace::new();
    let source = workspace.write("build.sh", SUM_BUILD_SCRIPT);
    let runner = Runner::with_defaults();

    let request = ExecutionRequest::new(&source, workspace.path()).stdin("20 22\n");
    let result = runner.run_program(&SHELL_BUILD, &request).await.unwrap();

    assert!(result.is_success(), "unexpected result: {result:?}");
    // the build script's own output is not part of the program's output
    assert_eq!(result.stdout, "42\n");
    assert!(workspace.path().join(BUILD_ARTIFACT).is_file());
}

#[tokio::test]
async fn test_compile_step_alone() {
    let workspace = Workspace::new();
    let source = workspace.write("build.sh", SUM_BUILD_SCRIPT);
    let runner = Runner::with_defaults();

    let outcome = runner
        .compile(&SHELL_BUILD, &source, workspace.path())
        .await;
    match outcome {
        CompileOutcome::Built { artifact, result } => {
            assert_eq!(artifact, Some(workspace.path().join(BUILD_ARTIFACT)));
            assert_eq!(result.stdout, "built\n");
        }
        other => panic!("expected a build, got {other:?}"),
    }

    let interpreted = runner.compile(&SHELL, &source, workspace.path()).await;
    assert_eq!(interpreted, CompileOutcome::NotRequired);
}

#[tokio::test]
async fn test_compile_failure_skips_run() {
    let workspace = Workspace::new();
    let source = workspace.write(
        "build.sh",
        "echo 'build.sh:1: expected ;' >&2\nexit 1\n",
    );
    let runner = Runner::with_defaults();

    let request = ExecutionRequest::new(&source, workspace.path());
    let result = runner.run_program(&SHELL_BUILD, &request).await.unwrap();

    assert_eq!(result.failure, Some(StageFailure::CompileFailed));
    assert_eq!(result.exit_code, Some(1));
    assert!(!result.timed_out);
    assert_eq!(result.stderr, "compilation failed\nbuild.sh:1: expected ;");
    assert!(!workspace.path().join(BUILD_ARTIFACT).exists());
}

#[tokio::test]
async fn test_compile_timeout_from_config() {
    let workspace = Workspace::new();
    let source = workspace.write("build.sh", "exec sleep 10\n");
    let config = Config::parse_toml("[timeouts]\ncompile_ms = 300\n").unwrap();
    let runner = Runner::new(config);

    let request = ExecutionRequest::new(&source, workspace.path());
    let result = runner.run_program(&SHELL_BUILD, &request).await.unwrap();

    assert_eq!(result.failure, Some(StageFailure::CompileTimedOut));
    assert!(result.timed_out);
    assert_eq!(result.exit_code, None);
    assert_eq!(result.stderr, "compilation timed out (300ms)");
    assert!(result.wall_time < Duration::from_secs(5));
}

#[tokio::test]
async fn test_compile_timeout_from_language() {
    let workspace = Workspace::new();
    let source = workspace.write("build.sh", "exec sleep 10\n");
    let language = ShellBuild {
        timeout_ms: Some(200),
        ..SHELL_BUILD
    };

    let request = ExecutionRequest::new(&source, workspace.path());
    let result = Runner::with_defaults()
        .run_program(&language, &request)
        .await
        .unwrap();

    assert_eq!(result.failure, Some(StageFailure::CompileTimedOut));
    assert_eq!(result.stderr, "compilation timed out (200ms)");
}

#[tokio::test]
async fn test_missing_compiler_is_toolchain_unavailable() {
    let workspace = Workspace::new();
    let source = workspace.write("build.sh", SUM_BUILD_SCRIPT);
    let language = ShellBuild {
        compiler: "mockjudge-no-such-compiler",
        ..SHELL_BUILD
    };

    let request = ExecutionRequest::new(&source, workspace.path());
    let result = Runner::with_defaults()
        .run_program(&language, &request)
        .await
        .unwrap();

    assert_eq!(
        result.failure,
        Some(StageFailure::ToolchainUnavailable {
            program: "mockjudge-no-such-compiler".to_owned()
        })
    );
    assert_eq!(result.exit_code, None);
    assert!(result.stderr.contains("mockjudge-no-such-compiler"));
}

#[tokio::test]
async fn test_missing_interpreter_is_toolchain_unavailable() {
    let workspace = Workspace::new();
    let source = workspace.write("main.sh", SUM_SCRIPT);
    let language = Shell {
        interpreter: "mockjudge-no-such-interpreter",
        ..SHELL
    };

    let request = ExecutionRequest::new(&source, workspace.path());
    let result = Runner::with_defaults()
        .run_program(&language, &request)
        .await
        .unwrap();

    assert!(matches!(
        result.failure,
        Some(StageFailure::ToolchainUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_runtime_override_replaces_interpreter() {
    let workspace = Workspace::new();
    let source = workspace.write("main.py", SUM_SCRIPT);
    // a language registered as `py` whose default interpreter is missing
    let language = Shell {
        id: "py",
        interpreter: "mockjudge-no-such-python",
    };
    let config = Config::parse_toml("[toolchains.py]\nruntime = \"sh\"\n").unwrap();

    let request = ExecutionRequest::new(&source, workspace.path()).stdin("2 3\n");
    let result = Runner::new(config)
        .run_program(&language, &request)
        .await
        .unwrap();

    assert!(result.is_success(), "unexpected result: {result:?}");
    assert_eq!(result.stdout, "5\n");
}

#[tokio::test]
async fn test_compiler_override_replaces_compiler() {
    let workspace = Workspace::new();
    let source = workspace.write("main.cpp", SUM_BUILD_SCRIPT);
    let language = ShellBuild {
        id: "cpp",
        compiler: "mockjudge-no-such-gxx",
        timeout_ms: None,
    };
    let config = Config::parse_toml("[toolchains.cpp]\ncompiler = \"sh\"\n").unwrap();

    let request = ExecutionRequest::new(&source, workspace.path()).stdin("4 5\n");
    let result = Runner::new(config)
        .run_program(&language, &request)
        .await
        .unwrap();

    assert!(result.is_success(), "unexpected result: {result:?}");
    assert_eq!(result.stdout, "9\n");
}

#[tokio::test]
async fn test_run_timeout_keeps_partial_output() {
    let workspace = Workspace::new();
    let source = workspace.write("main.sh", "echo started\nexec sleep 10\n");

    let request = ExecutionRequest::new(&source, workspace.path())
        .timeout(Duration::from_millis(200));
    let result = Runner::with_defaults()
        .run_program(&SHELL, &request)
        .await
        .unwrap();

    assert!(result.timed_out);
    assert_eq!(result.exit_code, None);
    assert_eq!(result.failure, None);
    assert_eq!(result.stdout, "started\n");
    assert!(result.wall_time < Duration::from_secs(5));
}

#[tokio::test]
async fn test_program_runs_in_work_dir() {
    let workspace = Workspace::new();
    let source = workspace.write("main.sh", "pwd\n");

    let request = ExecutionRequest::new(&source, workspace.path());
    let result = Runner::with_defaults()
        .run_program(&SHELL, &request)
        .await
        .unwrap();

    let expected = workspace.path().canonicalize().unwrap();
    let actual = std::path::Path::new(result.stdout.trim())
        .canonicalize()
        .unwrap();
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_missing_work_dir_is_rejected() {
    let workspace = Workspace::new();
    let source = workspace.write("main.sh", SUM_SCRIPT);
    let missing = workspace.path().join("missing");

    let request = ExecutionRequest::new(&source, &missing);
    let result = Runner::with_defaults().run_program(&SHELL, &request).await;

    assert_eq!(result, Err(RequestError::WorkDirNotFound(missing)));
}

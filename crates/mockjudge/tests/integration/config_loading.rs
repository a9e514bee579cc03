use mockjudge::config::{Config, ConfigError, EXAMPLE_CONFIG};
use mockjudge::language::LanguageId;

use super::Workspace;

#[test]
fn test_load_from_file() {
    let workspace = Workspace::new();
    let path = workspace.write(
        "mockjudge.toml",
        r#"
default_language = "py"

[timeouts]
run_ms = 1500

[toolchains.java]
compiler = "/usr/lib/jvm/bin/javac"
runtime = "/usr/lib/jvm/bin/java"
"#,
    );

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.default_language, Some(LanguageId::Python));
    assert_eq!(config.timeouts.run_ms, 1_500);
    assert_eq!(config.timeouts.compile_ms, 12_000);
    assert_eq!(config.compiler_for("java"), Some("/usr/lib/jvm/bin/javac"));
    assert_eq!(config.runtime_for("java"), Some("/usr/lib/jvm/bin/java"));
}

#[test]
fn test_example_config_round_trips_through_file() {
    let workspace = Workspace::new();
    let path = workspace.write("mockjudge.toml", EXAMPLE_CONFIG);

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.timeouts.run_ms, 2_000);
    assert!(config.default_language.is_none());
}

#[test]
fn test_malformed_file_is_parse_error() {
    let workspace = Workspace::new();
    let path = workspace.write("mockjudge.toml", "[timeouts\nrun_ms = ");

    let result = Config::from_file(&path);
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_directory_is_not_a_config_file() {
    let workspace = Workspace::new();

    let result = Config::from_file(workspace.path());
    assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
}

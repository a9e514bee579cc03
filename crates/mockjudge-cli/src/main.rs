//! Mockjudge CLI
//!
//! A command-line tool for running and grading solutions against problem
//! samples with the toolchains installed locally.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mockjudge::format::render_report;
use mockjudge::language::{self, LanguageId, LanguageSpec};
use mockjudge::problem::{CustomCase, ProblemPayload};
use mockjudge::{
    ALL_LANGUAGES, Config, EXAMPLE_CONFIG, ExecutionRequest, Grader, Runner, Submission, TestCase,
};
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

/// Directory next to the source file that receives compile artifacts
const WORK_DIR_NAME: &str = ".mockjudge";

#[derive(Parser)]
#[command(name = "mockjudge")]
#[command(about = "Compile, run and grade solutions against sample test cases")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new configuration file
    Init {
        /// Output path (default: mockjudge.toml)
        #[arg(short, long, default_value = "mockjudge.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Run a program once (compile if needed) and print its output
    Run {
        /// Source file to run
        #[arg(value_name = "FILE")]
        source: PathBuf,

        #[command(flatten)]
        target: Target,

        /// Input file (default: empty input)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Grade a program against problem samples and custom cases
    Grade {
        /// Source file to grade
        #[arg(value_name = "FILE")]
        source: PathBuf,

        #[command(flatten)]
        target: Target,

        /// Problem JSON with sample test cases
        #[arg(short, long)]
        problem: Option<PathBuf>,

        /// JSON array of custom cases: [{"input": "...", "output": "..."}]
        #[arg(long)]
        cases: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a starter source file
    Template {
        /// Language ID (e.g., py, cpp, java)
        #[arg(value_name = "LANGUAGE")]
        language: String,

        /// Problem JSON whose number and title go in the header
        #[arg(short, long)]
        problem: Option<PathBuf>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available languages
    Languages,

    /// Show effective configuration
    ShowConfig,
}

#[derive(clap::Args)]
struct Target {
    /// Language ID (default: inferred from the file extension)
    #[arg(short, long)]
    language: Option<String>,

    /// Time limit per run in milliseconds
    #[arg(short, long)]
    time_limit: Option<u64>,

    /// Directory for build artifacts (default: .mockjudge next to the source)
    #[arg(short, long)]
    work_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = if let Some(ref path) = cli.config {
        info!(?path, "loading configuration");
        Config::from_file(path).context("failed to load configuration")?
    } else {
        debug!("using default configuration");
        Config::new()
    };

    match cli.command {
        Commands::Init { output, force } => init_config(&output, force).await,
        Commands::Run {
            source,
            target,
            input,
        } => run_once(&config, &source, &target, input.as_deref()).await,
        Commands::Grade {
            source,
            target,
            problem,
            cases,
            json,
        } => {
            grade(
                &config,
                &source,
                &target,
                problem.as_deref(),
                cases.as_deref(),
                json,
            )
            .await
        }
        Commands::Template {
            language,
            problem,
            output,
        } => write_template(&language, problem.as_deref(), output.as_deref()).await,
        Commands::Languages => {
            list_languages();
            Ok(())
        }
        Commands::ShowConfig => {
            show_config(&config);
            Ok(())
        }
    }
}

/// Resolve the language from the flag, the file extension or the config default
fn resolve_language(
    config: &Config,
    source: &Path,
    requested: Option<&str>,
) -> Result<&'static dyn LanguageSpec> {
    if let Some(id) = requested {
        return language::describe(id).context("unknown language");
    }
    match (LanguageId::from_path(source), config.default_language) {
        (Ok(id), _) | (Err(_), Some(id)) => Ok(id.spec()),
        (Err(e), None) => Err(e).context("cannot infer language, pass --language"),
    }
}

async fn prepare_work_dir(source: &Path, requested: Option<&Path>) -> Result<PathBuf> {
    let work_dir = match requested {
        Some(dir) => dir.to_path_buf(),
        None => source
            .parent()
            .unwrap_or(Path::new("."))
            .join(WORK_DIR_NAME),
    };
    tokio::fs::create_dir_all(&work_dir)
        .await
        .with_context(|| format!("failed to create work directory '{}'", work_dir.display()))?;
    Ok(work_dir)
}

fn time_limit(config: &Config, target: &Target) -> Duration {
    target
        .time_limit
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.timeouts.run())
}

async fn run_once(
    config: &Config,
    source: &Path,
    target: &Target,
    input: Option<&Path>,
) -> Result<()> {
    let language = resolve_language(config, source, target.language.as_deref())?;
    let work_dir = prepare_work_dir(source, target.work_dir.as_deref()).await?;

    let stdin = match input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .context("failed to read input file")?,
        None => String::new(),
    };

    info!(language = language.label(), "running program");

    let request = ExecutionRequest::new(source, &work_dir)
        .stdin(stdin)
        .timeout(time_limit(config, target));
    let runner = Runner::new(config.clone());
    let result = runner
        .run_program(language, &request)
        .await
        .context("execution failed")?;

    print!("{}", result.stdout);
    if !result.stderr.is_empty() {
        eprintln!("{}", result.stderr.trim_end());
    }

    info!(
        exit_code = result.exit_code,
        signal = result.signal,
        timed_out = result.timed_out,
        wall_time = format_args!("{:.3}s", result.wall_time.as_secs_f64()),
        "execution result"
    );

    if result.timed_out && result.failure.is_none() {
        eprintln!("time limit exceeded ({}ms)", request.timeout.as_millis());
    }

    if result.is_success() {
        Ok(())
    } else {
        std::process::exit(result.exit_code.filter(|&c| c != 0).unwrap_or(1));
    }
}

async fn grade(
    config: &Config,
    source: &Path,
    target: &Target,
    problem: Option<&Path>,
    cases: Option<&Path>,
    json: bool,
) -> Result<()> {
    let language = resolve_language(config, source, target.language.as_deref())?;
    let work_dir = prepare_work_dir(source, target.work_dir.as_deref()).await?;

    let samples = match problem {
        Some(path) => read_problem(path).await?.test_cases(),
        None => Vec::new(),
    };
    let custom: Vec<TestCase> = match cases {
        Some(path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .context("failed to read custom cases")?;
            let cases: Vec<CustomCase> =
                serde_json::from_str(&content).context("failed to parse custom cases")?;
            cases.into_iter().map(TestCase::from).collect()
        }
        None => Vec::new(),
    };

    if samples.is_empty() && custom.is_empty() {
        anyhow::bail!("no test cases: pass --problem and/or --cases");
    }

    info!(
        language = language.label(),
        samples = samples.len(),
        custom = custom.len(),
        "grading"
    );

    let submission = Submission::new(language, source, &work_dir, time_limit(config, target));
    let grader = Grader::new(config.clone());
    let report = grader
        .grade_all(&submission, &samples, &custom)
        .await
        .context("grading failed")?;

    if json {
        let text = serde_json::to_string_pretty(&report).context("failed to encode report")?;
        println!("{text}");
    } else {
        println!("{}", render_report(&report));
    }

    if !report.all_passed {
        std::process::exit(1);
    }
    Ok(())
}

async fn read_problem(path: &Path) -> Result<ProblemPayload> {
    let content = tokio::fs::read_to_string(path)
        .await
        .context("failed to read problem file")?;
    serde_json::from_str(&content).context("failed to parse problem file")
}

async fn write_template(
    language_id: &str,
    problem: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let id: LanguageId = language_id.parse().context("unknown language")?;
    let summary = match problem {
        Some(path) => Some(read_problem(path).await?.summary()),
        None => None,
    };
    let text = language::template(id, summary.as_ref());

    match output {
        Some(path) => {
            tokio::fs::write(path, text)
                .await
                .context("failed to write template")?;
            println!("Created {} starter at '{}'", id.spec().label(), path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn list_languages() {
    println!("Available languages:\n");

    for id in ALL_LANGUAGES {
        let spec = id.spec();
        let lang_type = if spec.is_compiled() {
            "compiled"
        } else {
            "interpreted"
        };
        println!(
            "  {:<6} {:<12} {:<10} ({})",
            id,
            spec.label(),
            spec.source_name(),
            lang_type
        );
    }
}

fn show_config(config: &Config) {
    println!("Timeouts:");
    println!("  Compile: {} ms", config.timeouts.compile_ms);
    println!("  Run: {} ms", config.timeouts.run_ms);
    println!();
    match config.default_language {
        Some(id) => println!("Default language: {id}"),
        None => println!("Default language: inferred from file extension"),
    }

    if config.toolchains.is_empty() {
        return;
    }
    println!();
    println!("Toolchain overrides:");
    for id in ALL_LANGUAGES {
        if let Some(compiler) = config.compiler_for(id.as_str()) {
            println!("  {id} compiler: {compiler}");
        }
        if let Some(runtime) = config.runtime_for(id.as_str()) {
            println!("  {id} runtime: {runtime}");
        }
    }
}

async fn init_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at '{}'. Use --force to overwrite.",
            output.display()
        );
    }

    tokio::fs::write(output, EXAMPLE_CONFIG)
        .await
        .context("failed to write configuration file")?;

    println!("Created configuration file at '{}'", output.display());
    Ok(())
}

use std::path::Path;

use crate::language::{CompileCommand, LanguageSpec, RunCommand};

/// Output of `g++`/`gcc` inside the working directory
const NATIVE_ARTIFACT: &str = "a.out";

/// Output of `kotlinc` inside the working directory
const KOTLIN_JAR: &str = "main.jar";

#[derive(Debug, Clone, Copy, Default)]
pub struct Python;

impl LanguageSpec for Python {
    fn id(&self) -> &str {
        "py"
    }

    fn label(&self) -> &str {
        "Python"
    }

    fn source_name(&self) -> &str {
        "main.py"
    }

    fn comment_prefix(&self) -> &str {
        "#"
    }

    fn runtime(&self) -> Option<&str> {
        Some("python3")
    }

    fn run(&self, source: &Path, _work_dir: &Path, _artifact: Option<&Path>) -> RunCommand {
        RunCommand::new("python3").path_arg(source)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JavaScript;

impl LanguageSpec for JavaScript {
    fn id(&self) -> &str {
        "js"
    }

    fn label(&self) -> &str {
        "JavaScript"
    }

    fn source_name(&self) -> &str {
        "main.js"
    }

    fn runtime(&self) -> Option<&str> {
        Some("node")
    }

    fn run(&self, source: &Path, _work_dir: &Path, _artifact: Option<&Path>) -> RunCommand {
        RunCommand::new("node").path_arg(source)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Kotlin;

impl LanguageSpec for Kotlin {
    fn id(&self) -> &str {
        "kt"
    }

    fn label(&self) -> &str {
        "Kotlin"
    }

    fn source_name(&self) -> &str {
        "Main.kt"
    }

    fn runtime(&self) -> Option<&str> {
        Some("java")
    }

    fn compile(&self, source: &Path, work_dir: &Path) -> Option<CompileCommand> {
        let jar = work_dir.join(KOTLIN_JAR);
        Some(
            CompileCommand::new("kotlinc")
                .path_arg(source)
                .arg("-include-runtime")
                .arg("-d")
                .path_arg(&jar)
                .artifact(jar),
        )
    }

    fn run(&self, _source: &Path, _work_dir: &Path, artifact: Option<&Path>) -> RunCommand {
        let jar = artifact.unwrap_or(Path::new(KOTLIN_JAR));
        RunCommand::new("java").arg("-jar").path_arg(jar)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Java;

impl LanguageSpec for Java {
    fn id(&self) -> &str {
        "java"
    }

    fn label(&self) -> &str {
        "Java"
    }

    fn source_name(&self) -> &str {
        "Main.java"
    }

    fn runtime(&self) -> Option<&str> {
        Some("java")
    }

    // javac writes Main.class into the working directory; there is no single artifact path
    fn compile(&self, source: &Path, work_dir: &Path) -> Option<CompileCommand> {
        Some(
            CompileCommand::new("javac")
                .arg("-encoding")
                .arg("UTF-8")
                .arg("-d")
                .path_arg(work_dir)
                .path_arg(source),
        )
    }

    fn run(&self, _source: &Path, work_dir: &Path, _artifact: Option<&Path>) -> RunCommand {
        RunCommand::new("java")
            .arg("-cp")
            .path_arg(work_dir)
            .arg("Main")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Cpp;

impl LanguageSpec for Cpp {
    fn id(&self) -> &str {
        "cpp"
    }

    fn label(&self) -> &str {
        "C++"
    }

    fn source_name(&self) -> &str {
        "main.cpp"
    }

    fn compile(&self, source: &Path, work_dir: &Path) -> Option<CompileCommand> {
        Some(native_compile("g++", "-std=c++17", source, work_dir))
    }

    fn run(&self, _source: &Path, _work_dir: &Path, artifact: Option<&Path>) -> RunCommand {
        native_run(artifact)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct C;

impl LanguageSpec for C {
    fn id(&self) -> &str {
        "c"
    }

    fn label(&self) -> &str {
        "C"
    }

    fn source_name(&self) -> &str {
        "main.c"
    }

    fn compile(&self, source: &Path, work_dir: &Path) -> Option<CompileCommand> {
        Some(native_compile("gcc", "-std=c11", source, work_dir))
    }

    fn run(&self, _source: &Path, _work_dir: &Path, artifact: Option<&Path>) -> RunCommand {
        native_run(artifact)
    }
}

fn native_compile(compiler: &str, standard: &str, source: &Path, work_dir: &Path) -> CompileCommand {
    let out = work_dir.join(NATIVE_ARTIFACT);
    CompileCommand::new(compiler)
        .arg(standard)
        .arg("-O2")
        .arg("-pipe")
        .path_arg(source)
        .arg("-o")
        .path_arg(&out)
        .artifact(out)
}

fn native_run(artifact: Option<&Path>) -> RunCommand {
    match artifact {
        Some(path) => RunCommand::new(path.to_string_lossy()),
        None => RunCommand::new(format!("./{NATIVE_ARTIFACT}")),
    }
}

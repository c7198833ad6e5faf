//! Snippet execution
//!
//! Every run writes the snippet to a temporary file next to its working
//! directory and hands that file to the language's interpreter. The file is
//! always removed afterwards; isolated runs also get (and lose) their own
//! scratch directory.

use regex::Regex;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{file_extension_for_language, ExecutionMode, Snippet, AUTO_LANGUAGE};

static PHP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<\?php").unwrap());
static GO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^package\s+\w+|func\s+main\s*\(\)").unwrap());
static PYTHON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(def\s+\w+\s*\(.*\)\s*:|import\s+\w+|from\s+[\w.]+\s+import\s|print\()")
        .unwrap()
});
static JAVASCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"console\.log\(|\b(const|let)\s+\w+\s*=|require\(['\x22]|=>\s*\{").unwrap()
});
static RUBY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(puts\s|require\s+['\x22]|end\s*$)").unwrap());

/// Fallback when nothing identifies the language
pub const DEFAULT_LANGUAGE: &str = "bash";

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Command '{command}' not found. Please install it first.")]
    CommandNotFound { command: String },

    #[error("Failed to prepare snippet file: {0}")]
    TempFile(#[source] io::Error),

    #[error("Invalid working directory '{}': {source}", path.display())]
    WorkingDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Interpreter command line for a language, without the script path
pub fn executor_for(language: &str) -> Option<&'static [&'static str]> {
    let cmd: &'static [&'static str] = match language.to_lowercase().as_str() {
        "python" | "python3" => &["python3"],
        "bash" | "shell" => &["bash"],
        "sh" => &["sh"],
        "javascript" | "js" => &["node"],
        "typescript" | "ts" => &["ts-node"],
        "ruby" | "rb" => &["ruby"],
        "go" => &["go", "run"],
        "rust" => &["rust-script"],
        "php" => &["php"],
        "perl" => &["perl"],
        "lua" => &["lua"],
        "r" => &["Rscript"],
        _ => return None,
    };
    Some(cmd)
}

/// Languages with an executor, for help output and tests
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "python", "python3", "bash", "sh", "shell", "javascript", "js", "typescript", "ts", "ruby",
    "rb", "go", "rust", "php", "perl", "lua", "r",
];

/// How a single run should behave
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Explicit working directory; wins over the execution mode
    pub cwd: Option<PathBuf>,
    /// Capture stdout/stderr instead of inheriting the terminal
    pub capture_output: bool,
    /// Replace the snippet's stored execution mode for this run
    pub mode: Option<ExecutionMode>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            cwd: None,
            capture_output: true,
            mode: None,
        }
    }
}

/// Exit status plus captured output (empty when output was not captured)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub language: String,
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SnippetRunner;

impl SnippetRunner {
    pub fn new() -> Self {
        Self
    }

    /// Stored language, else shebang, else content heuristics, else bash
    pub fn detect_language(&self, snippet: &Snippet) -> String {
        let language = snippet.language.trim().to_lowercase();
        if !language.is_empty() && language != AUTO_LANGUAGE {
            return language;
        }

        let content = snippet.content.trim();
        if let Some(first_line) = content.lines().next() {
            if let Some(shebang) = first_line.strip_prefix("#!") {
                if let Some(lang) = language_from_shebang(shebang.trim()) {
                    return lang.to_string();
                }
            }
        }

        guess_language(content)
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string()
    }

    /// Ok when the language has an executor and its interpreter is on PATH
    pub fn can_execute(&self, language: &str) -> Result<&'static [&'static str], RunnerError> {
        let language = language.to_lowercase();
        let executor =
            executor_for(&language).ok_or_else(|| RunnerError::UnsupportedLanguage(language))?;

        let command = executor[0];
        if which::which(command).is_err() {
            return Err(RunnerError::CommandNotFound {
                command: command.to_string(),
            });
        }

        Ok(executor)
    }

    /// Execute a snippet and wait for it to finish
    pub fn run(&self, snippet: &Snippet, options: &RunOptions) -> Result<RunOutput, RunnerError> {
        let language = self.detect_language(snippet);
        let executor = self.can_execute(&language)?;
        let mode = options.mode.unwrap_or(snippet.execution_mode);

        // Held until the end of the run; dropping it removes the directory
        let mut scratch_dir = None;
        let cwd = match &options.cwd {
            Some(dir) => dir.clone(),
            None => match mode {
                ExecutionMode::Isolated => {
                    let dir = tempfile::Builder::new()
                        .prefix("fredo_")
                        .tempdir()
                        .map_err(RunnerError::TempFile)?;
                    let path = dir.path().to_path_buf();
                    scratch_dir = Some(dir);
                    path
                }
                ExecutionMode::Current => {
                    std::env::current_dir().map_err(|source| RunnerError::WorkingDirectory {
                        path: PathBuf::from("."),
                        source,
                    })?
                }
            },
        };
        // The script path must stay valid after the child changes directory
        let cwd = cwd
            .canonicalize()
            .map_err(|source| RunnerError::WorkingDirectory {
                path: cwd.clone(),
                source,
            })?;

        let script = write_script(snippet, &language, &cwd)?;

        info!(
            "Running snippet '{}' as {} in {} ({} mode)",
            snippet.name,
            language,
            cwd.display(),
            mode
        );

        let mut command = Command::new(executor[0]);
        command.args(&executor[1..]).arg(&script).current_dir(&cwd);

        let display_command = executor.join(" ");
        let output = if options.capture_output {
            let output = command
                .stdin(Stdio::null())
                .output()
                .map_err(|source| RunnerError::Spawn {
                    command: display_command,
                    source,
                })?;
            RunOutput {
                language,
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
        } else {
            let status = command.status().map_err(|source| RunnerError::Spawn {
                command: display_command,
                source,
            })?;
            RunOutput {
                language,
                exit_code: status.code(),
                stdout: String::new(),
                stderr: String::new(),
            }
        };

        debug!("Snippet '{}' exited with {:?}", snippet.name, output.exit_code);

        drop(script);
        drop(scratch_dir);
        Ok(output)
    }
}

fn language_from_shebang(shebang: &str) -> Option<&'static str> {
    if shebang.contains("python") {
        Some("python")
    } else if shebang.contains("bash") || shebang.contains("sh") {
        Some("bash")
    } else if shebang.contains("node") {
        Some("javascript")
    } else if shebang.contains("ruby") {
        Some("ruby")
    } else {
        None
    }
}

/// Cheap content sniffing for snippets stored as `auto`
fn guess_language(content: &str) -> Option<&'static str> {
    if PHP_RE.is_match(content) {
        Some("php")
    } else if GO_RE.is_match(content) {
        Some("go")
    } else if PYTHON_RE.is_match(content) {
        Some("python")
    } else if JAVASCRIPT_RE.is_match(content) {
        Some("javascript")
    } else if RUBY_RE.is_match(content) {
        Some("ruby")
    } else {
        None
    }
}

/// Write the snippet into `dir`; the returned path deletes the file on drop
fn write_script(
    snippet: &Snippet,
    language: &str,
    dir: &Path,
) -> Result<tempfile::TempPath, RunnerError> {
    let mut file = tempfile::Builder::new()
        .prefix("fredo_")
        .suffix(file_extension_for_language(language))
        .tempfile_in(dir)
        .map_err(RunnerError::TempFile)?;

    file.write_all(snippet.content.as_bytes())
        .and_then(|_| file.flush())
        .map_err(RunnerError::TempFile)?;

    let path = file.into_temp_path();

    #[cfg(unix)]
    if matches!(language, "bash" | "sh" | "shell") {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .map_err(RunnerError::TempFile)?;
    }

    Ok(path)
}

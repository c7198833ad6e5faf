//! External editor integration for composing and editing snippet content

use std::fs;
use std::io::{self, Write};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Invalid editor command: '{0}'")]
    InvalidCommand(String),

    #[error("Failed to create editor buffer: {0}")]
    TempFile(#[source] io::Error),

    #[error("Failed to launch editor '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read editor buffer: {0}")]
    Read(#[source] io::Error),
}

/// Marks instruction lines so they can be told apart from snippet comments
const HEADER_MARKER: &str = "fredo:";

/// Line-comment prefix for the instruction header, keyed by file extension
pub fn comment_prefix(extension: &str) -> &'static str {
    match extension.trim_start_matches('.').to_lowercase().as_str() {
        "py" | "sh" | "bash" | "rb" | "r" | "yaml" | "yml" | "toml" => "#",
        "js" | "ts" | "java" | "c" | "cpp" | "cs" | "go" | "rs" | "php" => "//",
        "sql" | "lua" => "--",
        "html" => "<!--",
        "css" => "/*",
        _ => "#",
    }
}

/// Opens a temp file in the user's editor and reads it back
#[derive(Debug, Clone)]
pub struct EditorManager {
    editor: String,
}

impl EditorManager {
    /// `editor` is a full command line, e.g. `code --wait`
    pub fn new(editor: impl Into<String>) -> Self {
        Self {
            editor: editor.into(),
        }
    }

    /// Edit `content` and return the result.
    ///
    /// When `message` is given it is written above the content as comment
    /// lines and stripped again afterwards. Returns `None` when the saved
    /// buffer is empty, otherwise the trimmed text with a trailing newline.
    pub fn edit_content(
        &self,
        content: &str,
        extension: &str,
        message: Option<&str>,
    ) -> Result<Option<String>, EditorError> {
        let argv = shlex::split(&self.editor)
            .filter(|argv| !argv.is_empty())
            .ok_or_else(|| EditorError::InvalidCommand(self.editor.clone()))?;

        let prefix = comment_prefix(extension);
        let header = message.map(|m| render_header(m, prefix));

        let suffix = if extension.is_empty() || extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{}", extension)
        };
        let mut file = tempfile::Builder::new()
            .prefix("fredo_")
            .suffix(&suffix)
            .tempfile()
            .map_err(EditorError::TempFile)?;

        if let Some(header) = &header {
            file.write_all(header.as_bytes())
                .map_err(EditorError::TempFile)?;
        }
        file.write_all(content.as_bytes())
            .and_then(|_| file.flush())
            .map_err(EditorError::TempFile)?;

        let path = file.into_temp_path();
        debug!("Opening {} with '{}'", path.display(), self.editor);

        let status = Command::new(&argv[0])
            .args(&argv[1..])
            .arg(&path)
            .status()
            .map_err(|source| EditorError::Launch {
                command: self.editor.clone(),
                source,
            })?;
        // Some editors exit non-zero after a normal save, so the buffer is read regardless
        if !status.success() {
            warn!("Editor '{}' exited with {:?}", self.editor, status.code());
        }

        let edited = fs::read_to_string(&path).map_err(EditorError::Read)?;
        let body = match &header {
            Some(_) => strip_header(&edited, prefix),
            None => edited,
        };

        let body = body.trim();
        if body.is_empty() {
            return Ok(None);
        }
        Ok(Some(format!("{}\n", body)))
    }
}

fn render_header(message: &str, prefix: &str) -> String {
    let mut header = String::new();
    for line in message.lines() {
        header.push_str(&header_tag(prefix));
        header.push(' ');
        header.push_str(line);
        header.push('\n');
    }
    header.push('\n');
    header
}

/// Start of every header line, e.g. `# fredo:`
fn header_tag(prefix: &str) -> String {
    format!("{} {}", prefix, HEADER_MARKER)
}

/// Drop the leading marked header lines, then leading blank lines. Comments
/// that belong to the snippet carry no marker and are kept.
fn strip_header(text: &str, prefix: &str) -> String {
    let tag = header_tag(prefix);
    let mut lines = text.lines().peekable();
    while lines.next_if(|line| line.trim_start().starts_with(&tag)).is_some() {}
    while lines.next_if(|line| line.trim().is_empty()).is_some() {}
    lines.collect::<Vec<_>>().join("\n")
}

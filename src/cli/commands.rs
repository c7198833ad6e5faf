/// Command implementations behind the `fredo` binary
///
/// Each command takes an open database and an [`OutputWriter`], so the same
/// code runs against stdout in the binary and an in-memory buffer in tests.
use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::output::OutputWriter;
use crate::config::ConfigManager;
use crate::database::{SnippetDatabase, SnippetFilter};
use crate::editor::EditorManager;
use crate::models::{file_extension_for_language, ExecutionMode, NewSnippet, Snippet};
use crate::runner::{RunOptions, RunOutput, SnippetRunner};
use crate::search::{SearchEngine, SearchRequest};

/// Where new snippet content comes from
#[derive(Debug, Clone)]
pub enum ContentSource {
    /// Given on the command line
    Inline(String),
    /// Read from a file; `-` means stdin
    File(PathBuf),
    /// Composed interactively
    Editor(EditorManager),
}

impl ContentSource {
    /// Resolve to content, `None` when nothing usable was provided.
    ///
    /// `initial` seeds the editor buffer and is ignored by the other sources.
    pub fn read(&self, initial: &str, extension: &str, message: &str) -> Result<Option<String>> {
        let content = match self {
            ContentSource::Inline(text) => text.clone(),
            ContentSource::File(path) if path.as_os_str() == "-" => {
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read snippet content from stdin")?;
                buffer
            }
            ContentSource::File(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {:?}", path))?,
            ContentSource::Editor(editor) => {
                return Ok(editor.edit_content(initial, extension, Some(message))?);
            }
        };

        Ok((!content.trim().is_empty()).then_some(content))
    }
}

/// Metadata for `fredo add`
#[derive(Debug, Clone, Default)]
pub struct AddArgs {
    pub name: String,
    pub language: Option<String>,
    pub tags: Vec<String>,
    pub mode: ExecutionMode,
}

/// Arguments for `fredo search`
#[derive(Debug, Clone, Default)]
pub struct SearchArgs {
    pub query: Option<String>,
    pub language: Option<String>,
    pub tags: Vec<String>,
    /// Signed so a negative value reaches the engine and is rejected there
    pub limit: Option<i64>,
    pub show_scores: bool,
}

fn require_snippet(db: &SnippetDatabase, name: &str) -> Result<Snippet> {
    db.get_by_name(name)?
        .ok_or_else(|| anyhow!("Snippet '{}' not found", name))
}

/// Create the config file and database if missing
pub fn init<W: Write>(
    config: &mut ConfigManager,
    db_path: &Path,
    out: &mut OutputWriter<W>,
) -> Result<()> {
    config.load()?;
    let db = SnippetDatabase::new(db_path)
        .with_context(|| format!("Failed to open database: {:?}", db_path))?;
    info!("Initialized database at {}", db.file_path().display());

    out.line("Fredo initialized successfully")?;
    out.line("")?;
    out.line(format!("Database: {}", db_path.display()))?;
    out.line(format!("Config: {}", config.config_file().display()))?;
    Ok(())
}

/// Returns the stored snippet, or `None` when no content was provided
pub fn add<W: Write>(
    db: &SnippetDatabase,
    args: AddArgs,
    source: &ContentSource,
    out: &mut OutputWriter<W>,
) -> Result<Option<Snippet>> {
    // Checked before the editor opens so nobody types into a doomed buffer
    if db.get_by_name(&args.name)?.is_some() {
        bail!("Snippet '{}' already exists", args.name);
    }

    let extension = args
        .language
        .as_deref()
        .map(file_extension_for_language)
        .unwrap_or(".txt");
    let message = format!(
        "Enter content for snippet '{}'\nDelete these lines when done.",
        args.name
    );
    let Some(content) = source.read("", extension, &message)? else {
        out.line("Canceled: No content provided")?;
        return Ok(None);
    };

    let mut builder = NewSnippet::new(args.name, content)
        .tags(&args.tags)
        .execution_mode(args.mode);
    if let Some(language) = args.language {
        builder = builder.language(language);
    }
    let snippet = builder.build()?;

    db.create(&snippet)?;
    out.line(format!("Snippet '{}' created successfully", snippet.name))?;
    Ok(Some(snippet))
}

/// Replace a snippet's content. Returns whether anything changed.
pub fn edit<W: Write>(
    db: &SnippetDatabase,
    name: &str,
    source: &ContentSource,
    out: &mut OutputWriter<W>,
) -> Result<bool> {
    let mut snippet = require_snippet(db, name)?;

    let message = format!("Editing snippet '{}'\nDelete these lines when done.", name);
    let content = source.read(&snippet.content, snippet.file_extension(), &message)?;

    match content {
        Some(content) if content != snippet.content => {
            snippet.content = content;
            db.update(&mut snippet)?;
            out.line(format!("Snippet '{}' updated successfully", name))?;
            Ok(true)
        }
        _ => {
            out.line("Canceled: No changes made")?;
            Ok(false)
        }
    }
}

pub fn show<W: Write>(
    db: &SnippetDatabase,
    name: &str,
    raw: bool,
    out: &mut OutputWriter<W>,
) -> Result<()> {
    let snippet = require_snippet(db, name)?;
    if raw {
        out.raw(&snippet.content)
    } else {
        out.write_snippet(&snippet)
    }
}

pub fn list<W: Write>(
    db: &SnippetDatabase,
    language: Option<String>,
    tag: Option<String>,
    out: &mut OutputWriter<W>,
) -> Result<Vec<Snippet>> {
    let mut filter = SnippetFilter::new();
    if let Some(language) = language {
        filter = filter.language(language.to_lowercase());
    }
    if let Some(tag) = tag {
        filter = filter.tags(vec![tag.to_lowercase()]);
    }

    let snippets = db.find(&filter)?;
    out.write_snippets(&snippets)?;
    Ok(snippets)
}

/// Ask a yes/no question; anything but `y`/`yes` is a no
pub fn confirm<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "{} [y/N]: ", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Delete a snippet once `confirmed`; returns whether it was removed
pub fn delete<W: Write>(
    db: &SnippetDatabase,
    name: &str,
    confirmed: bool,
    out: &mut OutputWriter<W>,
) -> Result<bool> {
    require_snippet(db, name)?;

    if !confirmed {
        out.line("Canceled")?;
        return Ok(false);
    }

    db.delete_by_name(name)?;
    out.line(format!("Snippet '{}' deleted", name))?;
    Ok(true)
}

/// Run a snippet. Captured output is replayed through `out`; the banner,
/// captured stderr and exit status go to `status`.
pub fn run<W: Write, E: Write>(
    db: &SnippetDatabase,
    name: &str,
    options: &RunOptions,
    out: &mut OutputWriter<W>,
    status: &mut E,
) -> Result<RunOutput> {
    let snippet = require_snippet(db, name)?;
    let runner = SnippetRunner::new();

    let language = runner.detect_language(&snippet);
    writeln!(status, "Running {} ({})...\n", snippet.name, language)?;
    status.flush()?;

    let output = runner.run(&snippet, options)?;
    if options.capture_output {
        out.raw(&output.stdout)?;
        status.write_all(output.stderr.as_bytes())?;
    }

    match output.exit_code {
        Some(0) => writeln!(status, "\nCompleted successfully")?,
        Some(code) => writeln!(status, "\nExited with code {}", code)?,
        None => writeln!(status, "\nTerminated by signal")?,
    }
    status.flush()?;
    Ok(output)
}

pub fn search<W: Write>(
    db: &SnippetDatabase,
    args: SearchArgs,
    default_limit: usize,
    out: &mut OutputWriter<W>,
) -> Result<()> {
    let mut request = SearchRequest::new();
    if let Some(query) = args.query {
        request = request.query(query);
    }
    if let Some(language) = args.language {
        request = request.language(language.to_lowercase());
    }
    if !args.tags.is_empty() {
        request = request.tags(args.tags.iter().map(|t| t.to_lowercase()).collect());
    }
    request = match args.limit {
        Some(limit) => request.try_limit(limit)?,
        None => request.limit(default_limit),
    };
    debug!("Search request: {:?}", request);

    let results = SearchEngine::new(db).search(&request)?;
    out.write_results(&results, args.show_scores)
}

/// Returns how many tags were new
pub fn tag_add<W: Write>(
    db: &SnippetDatabase,
    name: &str,
    tags: &[String],
    out: &mut OutputWriter<W>,
) -> Result<usize> {
    let mut snippet = require_snippet(db, name)?;
    let added = snippet.add_tags(tags);
    db.update(&mut snippet)?;
    out.line(format!("Tags added to '{}'", name))?;
    Ok(added)
}

/// Returns how many tags were removed
pub fn tag_remove<W: Write>(
    db: &SnippetDatabase,
    name: &str,
    tags: &[String],
    out: &mut OutputWriter<W>,
) -> Result<usize> {
    let mut snippet = require_snippet(db, name)?;
    let removed = snippet.remove_tags(tags);
    db.update(&mut snippet)?;
    out.line(format!("Tags removed from '{}'", name))?;
    Ok(removed)
}

pub fn tag_list<W: Write>(db: &SnippetDatabase, out: &mut OutputWriter<W>) -> Result<()> {
    let tags = db.get_all_tags()?;
    out.write_tags(&tags)
}

pub fn config_show<W: Write>(config: &mut ConfigManager, out: &mut OutputWriter<W>) -> Result<()> {
    let file = config.config_file();
    let loaded = config.load()?;
    out.write_config(loaded, &file)
}

pub fn config_set<W: Write>(
    config: &mut ConfigManager,
    key: &str,
    value: &str,
    out: &mut OutputWriter<W>,
) -> Result<()> {
    config.set(key, value)?;
    out.line(format!("Configuration updated: {} = {}", key, value))
}

/// Output formatting for the fredo CLI
///
/// Two formats:
/// - Text: aligned columns for humans
/// - Json: pretty-printed JSON for scripts (`--json`)
use crate::config::FredoConfig;
use crate::database::TagCount;
use crate::models::Snippet;
use crate::search::ScoreResult;
use anyhow::Result;
use chrono::Local;
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Aligned text tables
    #[default]
    Text,

    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json { OutputFormat::Json } else { OutputFormat::Text }
    }
}

pub struct OutputWriter<W: Write = io::Stdout> {
    format: OutputFormat,
    writer: W,
}

impl OutputWriter<io::Stdout> {
    /// Writer on stdout
    pub fn new(format: OutputFormat) -> Self {
        Self::with_writer(format, io::stdout())
    }
}

impl<W: Write> OutputWriter<W> {
    pub fn with_writer(format: OutputFormat, writer: W) -> Self {
        Self { format, writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Plain status line, written in either format
    pub fn line(&mut self, message: impl AsRef<str>) -> Result<()> {
        writeln!(self.writer, "{}", message.as_ref())?;
        Ok(())
    }

    /// Raw text without any framing
    pub fn raw(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            writeln!(self.writer)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn json<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        writeln!(self.writer, "{}", serde_json::to_string_pretty(value)?)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_snippet(&mut self, snippet: &Snippet) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(snippet);
        }

        let tags = if snippet.tags.is_empty() {
            "none".to_string()
        } else {
            snippet.tags.join(", ")
        };
        writeln!(self.writer, "{}", snippet.name)?;
        writeln!(
            self.writer,
            "Language: {} | Tags: {} | Mode: {}",
            snippet.language, tags, snippet.execution_mode
        )?;
        writeln!(self.writer)?;

        let lines: Vec<&str> = snippet.content.lines().collect();
        let width = lines.len().to_string().len();
        for (number, line) in lines.iter().enumerate() {
            writeln!(self.writer, "{:>width$} | {}", number + 1, line, width = width)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_snippets(&mut self, snippets: &[Snippet]) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(snippets);
        }
        if snippets.is_empty() {
            return self.line("No snippets found");
        }

        let rows: Vec<Vec<String>> = snippets
            .iter()
            .map(|s| {
                vec![
                    s.name.clone(),
                    s.language.clone(),
                    tag_list(&s.tags),
                    s.updated_at
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M")
                        .to_string(),
                ]
            })
            .collect();
        self.table(&["Name", "Language", "Tags", "Updated"], &[], &rows)?;
        writeln!(self.writer, "\nTotal: {} snippet(s)", snippets.len())?;
        Ok(())
    }

    /// Ranked results; the score column is only shown with `show_scores`
    pub fn write_results(&mut self, results: &[ScoreResult], show_scores: bool) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(results);
        }
        if results.is_empty() {
            return self.line("No snippets found");
        }

        let rows: Vec<Vec<String>> = results
            .iter()
            .map(|r| {
                let mut row = Vec::with_capacity(4);
                if show_scores {
                    row.push(r.score.to_string());
                }
                row.push(r.snippet.name.clone());
                row.push(r.snippet.language.clone());
                row.push(tag_list(&r.snippet.tags));
                row
            })
            .collect();

        if show_scores {
            self.table(&["Score", "Name", "Language", "Tags"], &[0], &rows)?;
        } else {
            self.table(&["Name", "Language", "Tags"], &[], &rows)?;
        }
        writeln!(self.writer, "\nFound: {} snippet(s)", results.len())?;
        Ok(())
    }

    pub fn write_tags(&mut self, tags: &[TagCount]) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(tags);
        }
        if tags.is_empty() {
            return self.line("No tags found");
        }

        let rows: Vec<Vec<String>> = tags
            .iter()
            .map(|t| vec![t.tag.clone(), t.count.to_string()])
            .collect();
        self.table(&["Tag", "Count"], &[1], &rows)?;
        writeln!(self.writer, "\nTotal: {} tag(s)", tags.len())?;
        Ok(())
    }

    pub fn write_config(&mut self, config: &FredoConfig, config_file: &Path) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(config);
        }

        let rows = vec![
            vec!["Database Path".to_string(), config.database_path.clone()],
            vec![
                "Editor".to_string(),
                config
                    .editor
                    .clone()
                    .unwrap_or_else(|| "(auto-detect)".to_string()),
            ],
            vec![
                "Default Execution Mode".to_string(),
                config.default_execution_mode.to_string(),
            ],
            vec![
                "Default Search Limit".to_string(),
                config.default_search_limit.to_string(),
            ],
        ];
        self.table(&["Setting", "Value"], &[], &rows)?;
        writeln!(self.writer, "\nConfig file: {}", config_file.display())?;
        Ok(())
    }

    /// Left-aligned columns separated by two spaces; `right` lists right-aligned columns
    fn table(&mut self, headers: &[&str], right: &[usize], rows: &[Vec<String>]) -> Result<()> {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        self.table_row(&header, &widths, right)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        self.table_row(&rule, &widths, right)?;
        for row in rows {
            self.table_row(row, &widths, right)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn table_row(&mut self, cells: &[String], widths: &[usize], right: &[usize]) -> Result<()> {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            let pad = widths[i].saturating_sub(cell.chars().count());
            if right.contains(&i) {
                line.push_str(&" ".repeat(pad));
                line.push_str(cell);
            } else {
                line.push_str(cell);
                line.push_str(&" ".repeat(pad));
            }
        }
        writeln!(self.writer, "{}", line.trim_end())?;
        Ok(())
    }
}

fn tag_list(tags: &[String]) -> String {
    if tags.is_empty() {
        "-".to_string()
    } else {
        tags.join(", ")
    }
}

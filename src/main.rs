/// fredo: personal code snippet manager
///
/// Stores named snippets in SQLite, ranks them with fuzzy search and runs
/// them through the matching interpreter.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fredo::cli::commands;
use fredo::cli::{AddArgs, ContentSource, OutputFormat, OutputWriter, SearchArgs};
use fredo::config::ConfigManager;
use fredo::database::SnippetDatabase;
use fredo::editor::EditorManager;
use fredo::models::ExecutionMode;
use fredo::runner::RunOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser)]
#[command(name = "fredo")]
#[command(about = "A CLI tool for managing and running code snippets", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite database path (overrides the configured one)
    #[arg(short = 'b', long, global = true)]
    db: Option<PathBuf>,

    /// Optional log file path for debug logging
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config file and database
    Init,

    /// Add a new snippet (opens the editor unless --file or --content is given)
    Add {
        name: String,

        /// Language of the snippet
        #[arg(short = 'l', long = "lang")]
        language: Option<String>,

        /// Tag to attach (repeatable)
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,

        /// Execution mode (current or isolated)
        #[arg(short, long)]
        mode: Option<ExecutionMode>,

        /// Read content from a file ('-' for stdin)
        #[arg(short, long, conflicts_with = "content")]
        file: Option<PathBuf>,

        /// Content given inline
        #[arg(short, long)]
        content: Option<String>,
    },

    /// Edit an existing snippet's content
    Edit {
        name: String,

        /// Read new content from a file ('-' for stdin)
        #[arg(short, long, conflicts_with = "content")]
        file: Option<PathBuf>,

        /// New content given inline
        #[arg(short, long)]
        content: Option<String>,
    },

    /// Show a snippet
    Show {
        name: String,

        /// Print the content only
        #[arg(short, long)]
        raw: bool,

        /// Print as JSON
        #[arg(long, conflicts_with = "raw")]
        json: bool,
    },

    /// List snippets, most recently updated first
    List {
        /// Filter by language
        #[arg(short = 'l', long = "lang")]
        language: Option<String>,

        /// Filter by tag
        #[arg(short = 't', long)]
        tag: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a snippet
    Delete {
        name: String,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Run a snippet
    Run {
        name: String,

        /// Override the execution mode
        #[arg(short, long)]
        mode: Option<ExecutionMode>,

        /// Working directory (overrides the execution mode)
        #[arg(short = 'C', long)]
        cwd: Option<PathBuf>,
    },

    /// Fuzzy search snippets by name, tags and content
    Search {
        query: Option<String>,

        /// Filter by language
        #[arg(short = 'l', long = "lang")]
        language: Option<String>,

        /// Filter by tag (repeatable, any match)
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,

        /// Maximum results (defaults to the configured limit)
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Show relevance scores
        #[arg(short, long)]
        scores: bool,
    },

    /// Manage snippet tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum TagCommands {
    /// Add tags to a snippet
    Add {
        name: String,
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Remove tags from a snippet
    Remove {
        name: String,
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// List all tags with counts
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a configuration value
    Set { key: String, value: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log.as_ref()) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }

    match dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with optional file output
fn init_logging(log_path: Option<&PathBuf>) -> Result<()> {
    use tracing_subscriber::fmt::writer::MakeWriterExt;

    if let Some(log_file) = log_path {
        // With log file: debug+ to file, warn+ to stderr
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fredo=debug"));

        let file_appender = tracing_appender::rolling::never(
            log_file.parent().unwrap_or_else(|| Path::new(".")),
            log_file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("fredo.log"),
        );

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_ansi(false)
            .with_writer(file_appender.and(std::io::stderr.with_max_level(tracing::Level::WARN)))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    } else {
        // No log file: warn+ to stderr only (unless RUST_LOG overrides)
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    }

    Ok(())
}

fn content_source(
    file: Option<PathBuf>,
    content: Option<String>,
    config: &mut ConfigManager,
) -> Result<ContentSource> {
    Ok(match (file, content) {
        (Some(path), _) => ContentSource::File(path),
        (None, Some(text)) => ContentSource::Inline(text),
        (None, None) => ContentSource::Editor(EditorManager::new(config.get_editor()?)),
    })
}

fn open_database(path: &Path) -> Result<SnippetDatabase> {
    SnippetDatabase::new(path).with_context(|| format!("Failed to open database: {:?}", path))
}

fn dispatch(cli: Cli) -> Result<ExitCode> {
    let mut config = ConfigManager::new()?;
    let db_path = match cli.db {
        Some(path) => path,
        None => config.load()?.database_path(),
    };
    debug!("Using database {}", db_path.display());

    let mut out = OutputWriter::new(OutputFormat::Text);

    match cli.command {
        Commands::Init => commands::init(&mut config, &db_path, &mut out)?,
        Commands::Add {
            name,
            language,
            tags,
            mode,
            file,
            content,
        } => {
            let db = open_database(&db_path)?;
            let mode = match mode {
                Some(mode) => mode,
                None => config.load()?.default_execution_mode,
            };
            let source = content_source(file, content, &mut config)?;
            let args = AddArgs {
                name,
                language,
                tags,
                mode,
            };
            commands::add(&db, args, &source, &mut out)?;
        }
        Commands::Edit {
            name,
            file,
            content,
        } => {
            let db = open_database(&db_path)?;
            let source = content_source(file, content, &mut config)?;
            commands::edit(&db, &name, &source, &mut out)?;
        }
        Commands::Show { name, raw, json } => {
            let db = open_database(&db_path)?;
            let mut out = OutputWriter::new(OutputFormat::from_json_flag(json));
            commands::show(&db, &name, raw, &mut out)?;
        }
        Commands::List {
            language,
            tag,
            json,
        } => {
            let db = open_database(&db_path)?;
            let mut out = OutputWriter::new(OutputFormat::from_json_flag(json));
            commands::list(&db, language, tag, &mut out)?;
        }
        Commands::Delete { name, yes } => {
            let db = open_database(&db_path)?;
            let confirmed = yes
                || commands::confirm(
                    &format!("Delete snippet '{}'?", name),
                    &mut std::io::stdin().lock(),
                    &mut std::io::stderr(),
                )?;
            commands::delete(&db, &name, confirmed, &mut out)?;
        }
        Commands::Run { name, mode, cwd } => {
            let db = open_database(&db_path)?;
            let options = RunOptions {
                cwd,
                capture_output: false,
                mode,
            };
            let output =
                commands::run(&db, &name, &options, &mut out, &mut std::io::stderr())?;
            return Ok(match output.exit_code {
                Some(0) => ExitCode::SUCCESS,
                Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
                None => ExitCode::FAILURE,
            });
        }
        Commands::Search {
            query,
            language,
            tags,
            limit,
            json,
            scores,
        } => {
            let db = open_database(&db_path)?;
            let default_limit = config.load()?.default_search_limit;
            let mut out = OutputWriter::new(OutputFormat::from_json_flag(json));
            let args = SearchArgs {
                query,
                language,
                tags,
                limit,
                show_scores: scores,
            };
            commands::search(&db, args, default_limit, &mut out)?;
        }
        Commands::Tag { command } => {
            let db = open_database(&db_path)?;
            match command {
                TagCommands::Add { name, tags } => {
                    commands::tag_add(&db, &name, &tags, &mut out)?;
                }
                TagCommands::Remove { name, tags } => {
                    commands::tag_remove(&db, &name, &tags, &mut out)?;
                }
                TagCommands::List { json } => {
                    let mut out = OutputWriter::new(OutputFormat::from_json_flag(json));
                    commands::tag_list(&db, &mut out)?;
                }
            }
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show { json } => {
                let mut out = OutputWriter::new(OutputFormat::from_json_flag(json));
                commands::config_show(&mut config, &mut out)?;
            }
            ConfigCommands::Set { key, value } => {
                commands::config_set(&mut config, &key, &value, &mut out)?;
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

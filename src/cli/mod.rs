/// CLI layer for the `fredo` binary
///
/// Modules:
/// - commands: one function per subcommand, writing through an OutputWriter
/// - output: text tables and JSON rendering
pub mod commands;
pub mod output;

pub use commands::{AddArgs, ContentSource, SearchArgs};
pub use output::{OutputFormat, OutputWriter};

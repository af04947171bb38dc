pub mod completions;
pub mod id;
pub mod list;
pub mod parse;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::config::{Manifest, NoteConfig};
use crate::error::{NoteError, Result};
use crate::parser::span::location_to_offset;

/// cardblock - flashcard notes in plain text
#[derive(Parser, Debug)]
#[command(name = "cardblock")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a cardblock.yaml manifest (default: ./cardblock.yaml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Show debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse the note at a position and print its fields
    Parse(parse::ParseArgs),

    /// Parse every note in a file
    List(list::ListArgs),

    /// Write an id option into a note's header
    SetId(id::SetIdArgs),

    /// Remove the id option from a note's header
    DeleteId(id::DeleteIdArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// A position in a file, as a line (and column) or a byte offset.
#[derive(Args, Debug, Clone)]
pub struct PositionArgs {
    /// Line number (1-indexed) inside the note
    #[arg(long, required_unless_present = "offset", conflicts_with = "offset")]
    pub line: Option<u32>,

    /// Column number (1-indexed) on that line
    #[arg(long, requires = "line")]
    pub column: Option<u32>,

    /// Byte offset inside the note
    #[arg(long)]
    pub offset: Option<usize>,
}

impl PositionArgs {
    /// Resolve to a byte offset in `source`.
    pub fn resolve(&self, source: &str) -> usize {
        match (self.offset, self.line) {
            (Some(offset), _) => offset,
            (None, Some(line)) => location_to_offset(source, line, self.column.unwrap_or(1)),
            (None, None) => 0,
        }
    }
}

/// Load the manifest and build the runtime configuration.
pub fn load_config(explicit: Option<&Path>) -> Result<NoteConfig> {
    let cwd = std::env::current_dir()?;
    Manifest::discover(explicit, &cwd)?.into_config()
}

/// Read a notes file.
pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| NoteError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read file: {}", e),
    })
}

/// Write a notes file back after editing.
pub fn write_source(path: &Path, source: &str) -> Result<()> {
    fs::write(path, source).map_err(|e| NoteError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write file: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_set_id() {
        let cli = Cli::try_parse_from([
            "cardblock", "set-id", "notes.txt", "--line", "3", "1712",
        ])
        .unwrap();

        match cli.command {
            Commands::SetId(args) => {
                assert_eq!(args.id, "1712");
                assert_eq!(args.position.line, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_requires_position() {
        let result = Cli::try_parse_from(["cardblock", "parse", "notes.txt"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_line_and_offset() {
        let result = Cli::try_parse_from([
            "cardblock", "parse", "notes.txt", "--line", "1", "--offset", "4",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_position_resolve() {
        let source = "one\ntwo\nthree";
        let by_line = PositionArgs {
            line: Some(2),
            column: Some(2),
            offset: None,
        };
        let by_offset = PositionArgs {
            line: None,
            column: None,
            offset: Some(9),
        };

        assert_eq!(by_line.resolve(source), 5);
        assert_eq!(by_offset.resolve(source), 9);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

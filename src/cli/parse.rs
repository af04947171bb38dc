//! Parse command implementation.
//!
//! Parses the note around a position and prints its fields.

use std::path::PathBuf;

use clap::Args;

use crate::config::NoteConfig;
use crate::error::{NoteError, Result};
use crate::output::{display_path, Printer};
use crate::parser::parse_at;
use crate::sync::NoTags;

use super::{read_source, PositionArgs};

/// Parse the note at a position and print its fields
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// File containing the note
    pub file: PathBuf,

    #[command(flatten)]
    pub position: PositionArgs,

    /// Print the note as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ParseArgs, config: &NoteConfig, printer: &Printer) -> Result<()> {
    let source = read_source(&args.file)?;
    let pos = args.position.resolve(&source);
    let note = parse_at(&source, pos, config, &NoTags)?;

    if args.json {
        println!("{}", to_json(&note)?);
        return Ok(());
    }

    printer.info(
        "Parsed",
        &format!("{}:{}", display_path(&args.file), printer.note_summary(&source, &note)),
    );
    for field in &note.fields {
        println!("{}: {}", field.name, field.content);
    }

    Ok(())
}

pub(crate) fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| NoteError::Validation {
        message: format!("Failed to serialize note: {}", e),
        help: None,
    })
}

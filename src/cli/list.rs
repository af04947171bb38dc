//! List command implementation.
//!
//! Parses every note in a file and prints an inventory. Notes that fail to
//! parse are reported with their line, and make the command fail.

use std::path::PathBuf;

use clap::Args;
use tracing::warn;

use crate::config::NoteConfig;
use crate::error::{NoteError, Result};
use crate::output::{display_path, plural, Printer};
use crate::parser::parse_all;
use crate::parser::span::offset_to_location;
use crate::sync::NoTags;

use super::parse::to_json;
use super::read_source;

/// Parse every note in a file
#[derive(Args, Debug)]
pub struct ListArgs {
    /// File to scan for notes
    pub file: PathBuf,

    /// Print parsed notes as a JSON array on stdout
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ListArgs, config: &NoteConfig, printer: &Printer) -> Result<()> {
    let source = read_source(&args.file)?;
    let path = display_path(&args.file);

    let mut notes = Vec::new();
    let mut failed = 0;

    for (marker, result) in parse_all(&source, config, &NoTags) {
        match result {
            Ok(note) => {
                if !args.json {
                    printer.info("Note", &printer.note_summary(&source, &note));
                }
                notes.push(note);
            }
            Err(e) => {
                let at = offset_to_location(&source, marker);
                warn!(%at, error = %e, "skipping note");
                printer.error("Failed", &format!("{}:{} {}", path, at, e));
                failed += 1;
            }
        }
    }

    if args.json {
        println!("{}", to_json(&notes)?);
    }

    if failed > 0 {
        return Err(NoteError::Validation {
            message: format!(
                "{} in {} could not be parsed",
                plural(failed, "note", "notes"),
                path
            ),
            help: Some("Run `cardblock parse --line <n>` on a failing note for details".to_string()),
        });
    }

    printer.status("Finished", &format!("{} in {}", plural(notes.len(), "note", "notes"), path));
    Ok(())
}

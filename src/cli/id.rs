//! `set-id` and `delete-id` command implementations.
//!
//! Edit the `id` option of the note at a position and write the file back.

use std::path::PathBuf;

use clap::Args;

use crate::config::NoteConfig;
use crate::error::{NoteError, Result};
use crate::output::{display_path, Printer};
use crate::parser::span::offset_to_location;
use crate::parser::{delete_option, insert_option, locate, parse_header, ID_OPTION};

use super::{read_source, write_source, PositionArgs};

/// Write an id option into a note's header
#[derive(Args, Debug)]
pub struct SetIdArgs {
    /// File containing the note
    pub file: PathBuf,

    #[command(flatten)]
    pub position: PositionArgs,

    /// Identifier to record
    pub id: String,
}

/// Remove the id option from a note's header
#[derive(Args, Debug)]
pub struct DeleteIdArgs {
    /// File containing the note
    pub file: PathBuf,

    #[command(flatten)]
    pub position: PositionArgs,
}

pub fn run_set(args: SetIdArgs, config: &NoteConfig, printer: &Printer) -> Result<()> {
    let mut source = read_source(&args.file)?;
    let block = locate(&source, args.position.resolve(&source))?;

    let header = parse_header(&source, block.start, config);
    if let Some(existing) = header.options.get(ID_OPTION) {
        return Err(NoteError::Validation {
            message: format!("Note already has id '{}'", existing),
            help: Some("Run `cardblock delete-id` first to replace it".to_string()),
        });
    }

    insert_option(&mut source, block.start, &config.prefix, ID_OPTION, &args.id)?;
    write_source(&args.file, &source)?;

    let at = offset_to_location(&source, block.start);
    printer.status(
        "Inserted",
        &format!("id: {} at {}:{}", args.id, display_path(&args.file), at),
    );
    Ok(())
}

pub fn run_delete(args: DeleteIdArgs, config: &NoteConfig, printer: &Printer) -> Result<()> {
    let mut source = read_source(&args.file)?;
    let block = locate(&source, args.position.resolve(&source))?;

    delete_option(&mut source, block.start, &config.prefix, ID_OPTION)?;
    write_source(&args.file, &source)?;

    let at = offset_to_location(&source, block.start);
    printer.status("Removed", &format!("id at {}:{}", display_path(&args.file), at));
    Ok(())
}

//! Seams to the note service.
//!
//! The engine never talks to the network itself. A push service turns a
//! `NoteRecord` into a new identifier, which is written back into the
//! note's header; a delete service forgets an identifier, after which the
//! `id` option is removed. Tags come from a caller-supplied `TagSource`.

use std::ops::Range;

use tracing::info;

use crate::config::NoteConfig;
use crate::error::{NoteError, Result};
use crate::parser::{
    delete_option, for_each_note_in, insert_option, locate, parse_at, parse_header, Block,
    NoteRecord, ID_OPTION,
};

/// Supplies tags for the block a note lives in.
pub trait TagSource {
    fn tags_at(&self, doc: &str, block: &Block) -> Vec<String>;
}

/// A tag source that never supplies tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTags;

impl TagSource for NoTags {
    fn tags_at(&self, _doc: &str, _block: &Block) -> Vec<String> {
        Vec::new()
    }
}

/// The same tags for every note.
impl TagSource for Vec<String> {
    fn tags_at(&self, _doc: &str, _block: &Block) -> Vec<String> {
        self.clone()
    }
}

/// Creates notes in the external service.
pub trait PushService {
    /// Store a new note and return its identifier.
    fn push(&mut self, note: &NoteRecord) -> Result<String>;
}

/// Deletes notes from the external service.
pub trait DeleteService {
    fn delete(&mut self, id: &str) -> Result<()>;
}

/// What happened to a note during a push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// The service assigned this identifier; it is now in the header.
    Created(String),
    /// The note already had this identifier and was left alone.
    Skipped(String),
}

/// Identifiers touched by `push_region`, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushSummary {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
}

/// Push the note at `pos` unless it already has an identifier.
///
/// On success the new identifier is inserted into the header as `id`.
pub fn push_note_at<T, P>(
    doc: &mut String,
    pos: usize,
    config: &NoteConfig,
    tags: &T,
    service: &mut P,
) -> Result<PushOutcome>
where
    T: TagSource + ?Sized,
    P: PushService + ?Sized,
{
    let record = parse_at(doc, pos, config, tags)?;

    if let Some(id) = &record.id {
        info!(%id, "note already pushed, skipping");
        return Ok(PushOutcome::Skipped(id.clone()));
    }

    let id = service.push(&record)?;
    insert_option(doc, record.block.start, &config.prefix, ID_OPTION, &id)?;

    info!(%id, deck = %record.deck, "pushed note");
    Ok(PushOutcome::Created(id))
}

/// Push every note whose marker lies in `region`.
///
/// Stops at the first error. Identifiers already written before the error
/// stay in the document.
pub fn push_region<T, P>(
    doc: &mut String,
    region: Range<usize>,
    config: &NoteConfig,
    tags: &T,
    service: &mut P,
) -> Result<PushSummary>
where
    T: TagSource + ?Sized,
    P: PushService + ?Sized,
{
    let mut summary = PushSummary::default();

    for_each_note_in(doc, region, &config.prefix, |doc, pos| {
        match push_note_at(doc, pos, config, tags, service)? {
            PushOutcome::Created(id) => summary.created.push(id),
            PushOutcome::Skipped(id) => summary.skipped.push(id),
        }
        Ok(())
    })?;

    Ok(summary)
}

/// Delete the note at `pos` from the service, then drop its `id` option.
///
/// The document is only edited after the service confirms the delete.
/// Returns the deleted identifier.
pub fn delete_note_at<D>(
    doc: &mut String,
    pos: usize,
    config: &NoteConfig,
    service: &mut D,
) -> Result<String>
where
    D: DeleteService + ?Sized,
{
    let block = locate(doc, pos)?;
    let header = parse_header(doc, block.start, config);

    let id = header
        .options
        .get_non_empty(ID_OPTION)
        .map(str::to_string)
        .ok_or_else(|| NoteError::FieldNotFound {
            name: ID_OPTION.to_string(),
        })?;

    service.delete(&id)?;
    delete_option(doc, block.start, &config.prefix, ID_OPTION)?;

    info!(%id, "deleted note");
    Ok(id)
}

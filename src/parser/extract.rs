//! Field extractors, keyed by note type.
//!
//! An extractor receives the document and the byte range of the note body
//! (the block minus its header line) and returns the note's fields in order.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use tracing::debug;

use crate::error::{NoteError, Result};

use super::types::Field;

/// A field extractor for one note type.
pub type Extractor = Arc<dyn Fn(&str, Range<usize>) -> Result<Vec<Field>> + Send + Sync>;

/// Note type names registered by `ExtractorRegistry::with_builtins`.
pub const BASIC: &str = "Basic";
pub const BASIC_REVERSED: &str = "Basic (and reversed card)";
pub const CLOZE: &str = "Cloze";

const QUESTION_MARKERS: [&str; 2] = ["Q: ", "Q:\n"];
const ANSWER_MARKERS: [&str; 2] = ["A: ", "A:\n"];

/// Maps note type names to field extractors.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<String, Extractor>,
}

impl ExtractorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the builtin Basic and Cloze extractors.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register(BASIC, basic)
            .register(BASIC_REVERSED, basic)
            .register(CLOZE, cloze);
        registry
    }

    /// Register an extractor, replacing any earlier one with the same name.
    pub fn register<F>(&mut self, note_type: impl Into<String>, extractor: F) -> &mut Self
    where
        F: Fn(&str, Range<usize>) -> Result<Vec<Field>> + Send + Sync + 'static,
    {
        self.extractors.insert(note_type.into(), Arc::new(extractor));
        self
    }

    /// Register `alias` as another name for an already registered type.
    pub fn alias(&mut self, alias: impl Into<String>, target: &str) -> Result<&mut Self> {
        let extractor = self
            .extractors
            .get(target)
            .cloned()
            .ok_or_else(|| NoteError::UnknownNoteType {
                note_type: target.to_string(),
            })?;
        self.extractors.insert(alias.into(), extractor);
        Ok(self)
    }

    /// Check whether a note type has an extractor.
    pub fn contains(&self, note_type: &str) -> bool {
        self.extractors.contains_key(note_type)
    }

    /// Get all registered note type names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.extractors.keys().map(|s| s.as_str())
    }

    /// Run the extractor registered for `note_type` over `content`.
    ///
    /// Marker errors name `note_type`, not the extractor it is an alias of.
    pub fn extract(&self, note_type: &str, doc: &str, content: Range<usize>) -> Result<Vec<Field>> {
        let extractor = self
            .extractors
            .get(note_type)
            .ok_or_else(|| NoteError::UnknownNoteType {
                note_type: note_type.to_string(),
            })?;

        let fields = extractor(doc, content).map_err(|e| match e {
            NoteError::MissingRequiredMarker { marker, .. } => NoteError::MissingRequiredMarker {
                note_type: note_type.to_string(),
                marker,
            },
            other => other,
        })?;
        debug!(note_type, fields = fields.len(), "extracted fields");
        Ok(fields)
    }
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("ExtractorRegistry")
            .field("types", &names)
            .finish()
    }
}

/// Cloze notes: the whole body is the `Text` field, markup untouched.
pub fn cloze(doc: &str, content: Range<usize>) -> Result<Vec<Field>> {
    Ok(vec![Field::from_range("Text", doc, content)])
}

/// Basic notes: `Front` from a `Q:` line, `Back` from a later `A:` line.
///
/// The front runs from the end of the `Q:` marker up to the newline that
/// ends the line before `A:`. The back runs to the end of the body.
pub fn basic(doc: &str, content: Range<usize>) -> Result<Vec<Field>> {
    let missing = |marker| NoteError::MissingRequiredMarker {
        note_type: BASIC.to_string(),
        marker,
    };

    let (_, question_end) =
        find_line_marker(doc, content.clone(), &QUESTION_MARKERS).ok_or_else(|| missing("Q:"))?;
    let (answer_start, answer_end) =
        find_line_marker(doc, question_end..content.end, &ANSWER_MARKERS)
            .ok_or_else(|| missing("A:"))?;

    let front_end = if answer_start > question_end && doc[..answer_start].ends_with('\n') {
        answer_start - 1
    } else {
        answer_start
    };

    Ok(vec![
        Field::from_range("Front", doc, question_end..front_end),
        Field::from_range("Back", doc, answer_end..content.end),
    ])
}

/// Find the first line in `range` that starts with one of `markers`.
///
/// Returns the marker's start and end offsets. A line counts when it begins
/// at `range.start` or right after a newline.
fn find_line_marker(doc: &str, range: Range<usize>, markers: &[&str]) -> Option<(usize, usize)> {
    let text = &doc[range.clone()];
    let at_range_start = range.start == 0 || doc[..range.start].ends_with('\n');

    let first = at_range_start.then_some(0);
    let line_starts = first
        .into_iter()
        .chain(text.match_indices('\n').map(|(i, _)| i + 1));

    line_starts
        .filter_map(|line_start| {
            markers
                .iter()
                .find(|m| text[line_start..].starts_with(**m))
                .map(|m| (range.start + line_start, range.start + line_start + m.len()))
        })
        .next()
}

//! Common types for parsed notes.

use std::ops::Range;

use serde::Serialize;

/// A named field extracted from a note body.
///
/// `content` is the verbatim slice of the document at `range`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub content: String,
    pub range: Range<usize>,
}

impl Field {
    /// Build a field from a byte range of the document.
    pub fn from_range(name: impl Into<String>, doc: &str, range: Range<usize>) -> Self {
        Self {
            name: name.into(),
            content: doc[range.clone()].to_string(),
            range,
        }
    }
}

/// A fully assembled note, ready to hand to a push or delete service.
///
/// Built fresh on every parse; nothing holds on to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteRecord {
    /// Identifier assigned by the note service, from the `id` option
    pub id: Option<String>,

    /// Note type, used to pick the field extractor
    pub note_type: String,

    /// Target deck
    pub deck: String,

    /// Extracted fields, in extractor order
    pub fields: Vec<Field>,

    /// Tags supplied by the caller's tag source
    pub tags: Vec<String>,

    /// Byte range of the enclosing block
    pub block: Range<usize>,
}

impl NoteRecord {
    /// Get a field's content by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.content.as_str())
    }

    /// Whether the note service has already seen this note.
    pub fn is_pushed(&self) -> bool {
        self.id.is_some()
    }
}

//! Block boundary detection.
//!
//! A block is the text between blank-line separators. A separator is a run
//! of two or more consecutive newlines; a longer run counts as one separator.

use std::ops::Range;

use tracing::debug;

use crate::error::{NoteError, Result};

use super::span::{floor_char_boundary, Span};

const SEPARATOR: &str = "\n\n";

/// A located block of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Byte offset of the first character of the block
    pub start: usize,
    /// Byte offset just past the last character of the block
    pub end: usize,
}

impl Block {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The block's text.
    pub fn text<'a>(&self, doc: &'a str) -> &'a str {
        &doc[self.range()]
    }

    /// Line/column span of the block. Scans from the document start.
    pub fn span(&self, doc: &str) -> Span {
        Span::from_offsets(doc, self.start, self.end)
    }
}

/// Find the block enclosing `pos`.
///
/// An offset on the second or later newline of a separator resolves to the
/// block that follows it. Only the text between `pos` and the nearest
/// separators is scanned. Fails only when the document is empty.
pub fn locate(doc: &str, pos: usize) -> Result<Block> {
    if doc.is_empty() {
        return Err(NoteError::NoEnclosingBlock);
    }

    let pos = skip_separator(doc, floor_char_boundary(doc, pos));

    let start = doc[..pos]
        .rfind(SEPARATOR)
        .map(|i| i + SEPARATOR.len())
        .unwrap_or(0);

    let end = doc[pos..]
        .find(SEPARATOR)
        .map(|i| pos + i)
        .unwrap_or(doc.len());

    debug!(pos, start, end, "located block");

    Ok(Block { start, end })
}

/// Move an offset that sits past the first newline of a separator run to
/// the end of the run. The first newline still closes the preceding block.
fn skip_separator(doc: &str, pos: usize) -> usize {
    let bytes = doc.as_bytes();
    let inside_run = match pos {
        0 => doc.starts_with(SEPARATOR),
        _ => bytes[pos - 1] == b'\n' && bytes.get(pos) == Some(&b'\n'),
    };

    if inside_run {
        pos + doc[pos..].len() - doc[pos..].trim_start_matches('\n').len()
    } else {
        pos
    }
}

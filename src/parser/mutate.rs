//! In-place edits to a note's header line.
//!
//! Only the header line is touched. Everything else in the document keeps
//! its exact bytes.

use tracing::info;

use crate::error::{NoteError, Result};

use super::header::{find_key, option_value, HeaderLine};
use super::span::offset_to_location;

/// Append `name: value` to the header line of the block at `block_start`.
///
/// Options are appended after a `", "` separator. A header with nothing but
/// the marker becomes `<marker> name: value`, and a header ending in a comma
/// gets the option after that comma. Names and values must be single tokens:
/// anything the header parser would cut short is rejected before editing.
pub fn insert_option(
    doc: &mut String,
    block_start: usize,
    prefix: &str,
    name: &str,
    value: &str,
) -> Result<()> {
    if name.is_empty() || name.contains(':') || !is_token(name) || !is_token(value) {
        return Err(NoteError::InvalidOption {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    let header = HeaderLine::find(doc, block_start, prefix);
    let options_start = header
        .options_start
        .ok_or_else(|| not_a_header(doc.as_str(), header.line.start))?;
    let line_end = header.line.end;
    let options = doc[options_start..line_end].trim_end();

    if options.is_empty() {
        doc.replace_range(options_start..line_end, &format!(" {}: {}", name, value));
    } else if options.ends_with(',') {
        let at = options_start + options.len();
        doc.replace_range(at..line_end, &format!(" {}: {}", name, value));
    } else {
        doc.insert_str(line_end, &format!(", {}: {}", name, value));
    }

    info!(name, value, line_start = header.line.start, "inserted header option");
    Ok(())
}

/// Remove option `name` from the header line of the block at `block_start`.
///
/// One adjacent separator goes with it: the trailing `", "` if there is one,
/// otherwise the leading one. Removing the last option leaves the bare marker.
pub fn delete_option(doc: &mut String, block_start: usize, prefix: &str, name: &str) -> Result<()> {
    let header = HeaderLine::find(doc, block_start, prefix);
    let options_start = header
        .options_start
        .ok_or_else(|| not_a_header(doc.as_str(), header.line.start))?;
    let text = &doc[options_start..header.line.end];

    let key = find_key(text, name, ":").ok_or_else(|| NoteError::FieldNotFound {
        name: name.to_string(),
    })?;

    let mut end = key + name.len() + 1;
    if text[end..].starts_with(' ') {
        end += 1;
    }
    end += option_value(&text[end..]).len();

    let removal = if text[end..].starts_with(", ") {
        key..end + 2
    } else if text[end..].starts_with(',') {
        key..end + 1
    } else if text[..key].ends_with(", ") {
        key - 2..end
    } else if text[..key].ends_with(',') {
        key - 1..end
    } else {
        key..end
    };

    let line_end = header.line.end - removal.len();
    doc.replace_range(
        options_start + removal.start..options_start + removal.end,
        "",
    );

    if doc[options_start..line_end].trim().is_empty() {
        doc.replace_range(options_start..line_end, "");
    }

    info!(name, line_start = header.line.start, "deleted header option");
    Ok(())
}

fn is_token(text: &str) -> bool {
    !text.contains([' ', ',', '\n', '\r'])
}

fn not_a_header(doc: &str, line_start: usize) -> NoteError {
    NoteError::NotAHeader {
        line: offset_to_location(doc, line_start).line,
    }
}

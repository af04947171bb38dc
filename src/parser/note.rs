//! Note assembly.
//!
//! Ties the locator, header parser and extractors together into a single
//! "parse the note at this offset" operation, and walks every note marker in
//! a region.

use std::ops::Range;

use tracing::{debug, trace};

use crate::config::NoteConfig;
use crate::error::{NoteError, Result};
use crate::sync::TagSource;

use super::block::locate;
use super::header::{parse_header, HeaderOptions};
use super::span::floor_char_boundary;
use super::types::NoteRecord;

/// Header option holding the target deck.
pub const DECK_OPTION: &str = "deck";
/// Header option holding the note type.
pub const TYPE_OPTION: &str = "type";
/// Header option holding the service-assigned identifier.
pub const ID_OPTION: &str = "id";

/// Parse the note in the block enclosing `pos`.
///
/// `deck` and `type` must be present and non-empty. The extractor for the
/// note type must succeed; a malformed body is an error, never a record
/// with missing fields.
pub fn parse_at<T>(doc: &str, pos: usize, config: &NoteConfig, tags: &T) -> Result<NoteRecord>
where
    T: TagSource + ?Sized,
{
    let block = locate(doc, pos)?;
    let header = parse_header(doc, block.start, config);

    let deck = require(&header.options, DECK_OPTION)?;
    let note_type = require(&header.options, TYPE_OPTION)?;

    let content = header.content_start.min(block.end)..block.end;
    let fields = config.extractors.extract(&note_type, doc, content)?;

    debug!(%deck, %note_type, block_start = block.start, "parsed note");

    Ok(NoteRecord {
        id: header.options.get_non_empty(ID_OPTION).map(str::to_string),
        note_type,
        deck,
        fields,
        tags: tags.tags_at(doc, &block),
        block: block.range(),
    })
}

/// Visit every prefix marker inside `region`, left to right.
///
/// `visit` gets the document and the marker offset and may edit the
/// document at or after the marker's line. After each visit the region end
/// moves by the change in document length, and the scan resumes at the end
/// of the visited marker's block, so each block is visited at most once even
/// when its body quotes the marker. Returns the number of markers visited;
/// the first visitor error stops the walk.
pub fn for_each_note_in<F>(
    doc: &mut String,
    region: Range<usize>,
    prefix: &str,
    mut visit: F,
) -> Result<usize>
where
    F: FnMut(&mut String, usize) -> Result<()>,
{
    if prefix.is_empty() {
        return Ok(0);
    }

    let mut cursor = floor_char_boundary(doc, region.start);
    let mut end = floor_char_boundary(doc, region.end);
    let mut visited = 0;

    while let Some(marker) = next_marker(doc, cursor, end, prefix) {
        let before = doc.len();
        visit(doc, marker)?;
        visited += 1;

        let after = doc.len();
        end = if after >= before {
            end + (after - before)
        } else {
            end.saturating_sub(before - after)
        };
        end = floor_char_boundary(doc, end);
        cursor = resume_after(doc, marker, prefix).min(end);
    }

    debug!(visited, "walked note markers");
    Ok(visited)
}

/// Parse every note in `doc`: one `(marker offset, result)` pair per block
/// that contains a marker.
pub fn parse_all<T>(doc: &str, config: &NoteConfig, tags: &T) -> Vec<(usize, Result<NoteRecord>)>
where
    T: TagSource + ?Sized,
{
    let mut results = Vec::new();
    if config.prefix.is_empty() {
        return results;
    }

    let mut cursor = 0;
    while let Some(marker) = next_marker(doc, cursor, doc.len(), &config.prefix) {
        results.push((marker, parse_at(doc, marker, config, tags)));
        cursor = resume_after(doc, marker, &config.prefix);
    }

    results
}

fn require(options: &HeaderOptions, name: &str) -> Result<String> {
    options
        .get_non_empty(name)
        .map(str::to_string)
        .ok_or_else(|| NoteError::MissingRequiredOption {
            option: name.to_string(),
        })
}

/// Offset of the next marker that fits entirely inside `cursor..end`.
fn next_marker(doc: &str, cursor: usize, end: usize, prefix: &str) -> Option<usize> {
    if cursor >= end {
        return None;
    }

    let marker = doc[cursor..end].find(prefix).map(|i| cursor + i);
    trace!(cursor, end, ?marker, "scanned for marker");
    marker
}

/// Where to continue scanning after visiting the marker at `marker`: the end
/// of its block in the current document.
fn resume_after(doc: &str, marker: usize, prefix: &str) -> usize {
    let past_marker = floor_char_boundary(doc, marker + prefix.len());
    match locate(doc, marker) {
        Ok(block) => block.end.max(past_marker),
        Err(_) => past_marker,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::insert_option;
    use crate::sync::NoTags;
    use pretty_assertions::assert_eq;

    fn config() -> NoteConfig {
        NoteConfig::default()
    }

    #[test]
    fn test_parse_basic_note() {
        let doc = ">>> deck: D, type: Basic\nQ: foo\nA: bar";

        let record = parse_at(doc, 0, &config(), &NoTags).unwrap();

        assert_eq!(record.deck, "D");
        assert_eq!(record.note_type, "Basic");
        assert_eq!(record.id, None);
        assert_eq!(record.field("Front"), Some("foo"));
        assert_eq!(record.field("Back"), Some("bar"));
        assert_eq!(record.block, 0..doc.len());
    }

    #[test]
    fn test_parse_cloze_note_from_inside_body() {
        let doc = "notes\n\n>>> deck: D, type: Cloze, id: 77\nPlease {{c1::x}} it\n\nmore";
        let pos = doc.find("{{").unwrap();

        let record = parse_at(doc, pos, &config(), &NoTags).unwrap();

        assert_eq!(record.id.as_deref(), Some("77"));
        assert_eq!(record.fields.len(), 1);
        assert_eq!(record.field("Text"), Some("Please {{c1::x}} it"));
    }

    #[test]
    fn test_parse_header_only_note() {
        let doc = ">>> deck: D, type: Cloze\n\nnext";

        let record = parse_at(doc, 0, &config(), &NoTags).unwrap();

        assert_eq!(record.field("Text"), Some(""));
    }

    #[test]
    fn test_parse_missing_deck() {
        let doc = ">>> type: Basic\nQ: a\nA: b";

        let result = parse_at(doc, 0, &config(), &NoTags);

        assert!(matches!(
            result,
            Err(NoteError::MissingRequiredOption { option }) if option == "deck"
        ));
    }

    #[test]
    fn test_parse_missing_type() {
        let doc = ">>> deck: D\nQ: a\nA: b";

        let result = parse_at(doc, 0, &config(), &NoTags);

        assert!(matches!(
            result,
            Err(NoteError::MissingRequiredOption { option }) if option == "type"
        ));
    }

    #[test]
    fn test_parse_plain_block_is_not_a_note() {
        let doc = "just a paragraph of text";

        let result = parse_at(doc, 3, &config(), &NoTags);

        assert!(matches!(result, Err(NoteError::MissingRequiredOption { .. })));
    }

    #[test]
    fn test_parse_malformed_basic_note() {
        let doc = ">>> deck: D, type: Basic\nQ: a question with no answer";

        let result = parse_at(doc, 0, &config(), &NoTags);

        assert!(matches!(result, Err(NoteError::MissingRequiredMarker { .. })));
    }

    #[test]
    fn test_parse_unknown_type() {
        let doc = ">>> deck: D, type: Occlusion\nbody";

        let result = parse_at(doc, 0, &config(), &NoTags);

        assert!(matches!(
            result,
            Err(NoteError::UnknownNoteType { note_type }) if note_type == "Occlusion"
        ));
    }

    #[test]
    fn test_parse_empty_document() {
        let result = parse_at("", 0, &config(), &NoTags);

        assert!(matches!(result, Err(NoteError::NoEnclosingBlock)));
    }

    #[test]
    fn test_parse_attaches_tags() {
        let doc = ">>> deck: D, type: Cloze\ntext";
        let tags = vec!["spanish".to_string(), "verbs".to_string()];

        let record = parse_at(doc, 0, &config(), &tags).unwrap();

        assert_eq!(record.tags, vec!["spanish", "verbs"]);
    }

    #[test]
    fn test_for_each_visits_in_order() {
        let mut doc = ">>> a\n\n>>> b\n\n>>> c".to_string();
        let region = 0..doc.len();
        let mut seen = Vec::new();

        let count = for_each_note_in(&mut doc, region, ">>>", |d, pos| {
            seen.push(d[pos..pos + 5].to_string());
            Ok(())
        })
        .unwrap();

        assert_eq!(count, 3);
        assert_eq!(seen, vec![">>> a", ">>> b", ">>> c"]);
    }

    #[test]
    fn test_for_each_tolerates_insertions() {
        let mut doc = String::from(
            ">>> deck: D, type: Cloze\none\n\n>>> deck: D, type: Cloze\ntwo\n\n>>> deck: D, type: Cloze\nthree",
        );
        let region = 0..doc.len();
        let mut positions = Vec::new();
        let mut next_id = 0;

        let count = for_each_note_in(&mut doc, region, ">>>", |d, pos| {
            positions.push(pos);
            next_id += 1;
            insert_option(d, pos, ">>>", "id", &next_id.to_string())
        })
        .unwrap();

        assert_eq!(count, 3);
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(
            doc,
            ">>> deck: D, type: Cloze, id: 1\none\n\n>>> deck: D, type: Cloze, id: 2\ntwo\n\n>>> deck: D, type: Cloze, id: 3\nthree"
        );
    }

    #[test]
    fn test_for_each_skips_marker_quoted_in_body() {
        let mut doc = ">>> deck: D, type: Cloze\nquoted >>> arrow\n\n>>> deck: D, type: Cloze\nx"
            .to_string();
        let region = 0..doc.len();
        let mut seen = Vec::new();

        let count = for_each_note_in(&mut doc, region, ">>>", |_, pos| {
            seen.push(pos);
            Ok(())
        })
        .unwrap();

        assert_eq!(count, 2);
        assert_eq!(seen, vec![0, 43]);
    }

    #[test]
    fn test_for_each_resumes_after_edited_block() {
        let mut doc = ">>> deck: D, type: Cloze\na >>> b\n\n>>> deck: D, type: Cloze\nc".to_string();
        let region = 0..doc.len();
        let mut seen = Vec::new();

        for_each_note_in(&mut doc, region, ">>>", |d, pos| {
            seen.push(pos);
            insert_option(d, pos, ">>>", "id", "12345")
        })
        .unwrap();

        assert_eq!(seen, vec![0, 45]);
        assert_eq!(
            doc,
            ">>> deck: D, type: Cloze, id: 12345\na >>> b\n\n>>> deck: D, type: Cloze, id: 12345\nc"
        );
    }

    #[test]
    fn test_for_each_respects_region() {
        let mut doc = ">>> a\n\n>>> b\n\n>>> c".to_string();
        let region = 7..12; // only the second marker
        let mut seen = Vec::new();

        let count = for_each_note_in(&mut doc, region, ">>>", |_, pos| {
            seen.push(pos);
            Ok(())
        })
        .unwrap();

        assert_eq!(count, 1);
        assert_eq!(seen, vec![7]);
    }

    #[test]
    fn test_for_each_marker_must_fit_region() {
        let mut doc = "text >>> cut".to_string();

        let count = for_each_note_in(&mut doc, 0..7, ">>>", |_, _| Ok(())).unwrap();

        assert_eq!(count, 0);
    }

    #[test]
    fn test_for_each_stops_on_visitor_error() {
        let mut doc = ">>> a\n\n>>> b".to_string();
        let mut calls = 0;

        let result = for_each_note_in(&mut doc, 0..12, ">>>", |_, _| {
            calls += 1;
            Err(NoteError::Service {
                message: "offline".to_string(),
            })
        });

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_parse_all() {
        let doc = ">>> deck: D, type: Basic\nQ: a\nA: b\n\nplain text\n\n>>> deck: D, type: Basic\nQ: only";

        let results = parse_all(doc, &config(), &NoTags);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 0);
        assert_eq!(results[0].1.as_ref().unwrap().field("Back"), Some("b"));
        assert_eq!(results[1].0, doc.rfind(">>>").unwrap());
        assert!(matches!(
            results[1].1,
            Err(NoteError::MissingRequiredMarker { .. })
        ));
    }

    #[test]
    fn test_parse_all_one_result_per_block() {
        let doc = ">>> deck: D, type: Cloze\nuse >>> for headers\n\n>>> deck: E, type: Cloze\nx";

        let results = parse_all(doc, &config(), &NoTags);

        let decks: Vec<_> = results
            .iter()
            .map(|(_, r)| r.as_ref().unwrap().deck.as_str())
            .collect();
        assert_eq!(decks, vec!["D", "E"]);
    }
}

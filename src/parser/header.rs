//! Note header parsing.
//!
//! A header is the line of a block that carries the prefix marker, followed
//! by comma-separated `key: value` options:
//!
//! ```text
//! >>> deck: Spanish, type: Basic, id: 1712345678
//! ```

use std::collections::HashMap;
use std::ops::Range;

use tracing::debug;

use crate::config::NoteConfig;

use super::span::floor_char_boundary;

/// Characters that end an option value.
const VALUE_TERMINATORS: [char; 3] = [' ', ',', '\n'];

/// Recognized header options and their values.
///
/// Only options named in the configuration are stored; a missing key means
/// the option is absent from the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderOptions {
    values: HashMap<String, String>,
}

impl HeaderOptions {
    /// Get an option value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|v| v.as_str())
    }

    /// Get an option value, treating an empty value as absent.
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn insert(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }
}

/// Result of parsing a block's header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Parsed options (empty when the line has no prefix marker)
    pub options: HeaderOptions,
    /// Byte range of the header line, without its newline
    pub line: Range<usize>,
    /// Byte offset where the note body begins
    pub content_start: usize,
    /// Whether the line carries the prefix marker
    pub has_marker: bool,
}

/// The physical line containing `start`, and where its options begin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeaderLine {
    pub line: Range<usize>,
    /// Offset just past the prefix marker, if the line carries one
    pub options_start: Option<usize>,
}

impl HeaderLine {
    pub fn find(doc: &str, start: usize, prefix: &str) -> Self {
        let start = floor_char_boundary(doc, start);
        let line_start = doc[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = doc[start..]
            .find('\n')
            .map(|i| start + i)
            .unwrap_or(doc.len());

        let options_start = if prefix.is_empty() {
            None
        } else {
            doc[line_start..line_end]
                .find(prefix)
                .map(|i| line_start + i + prefix.len())
        };

        Self {
            line: line_start..line_end,
            options_start,
        }
    }
}

/// Parse the header line of the block starting at `start`.
///
/// Never fails: a line without the prefix marker yields empty options, which
/// callers read as "not a note header".
pub fn parse_header(doc: &str, start: usize, config: &NoteConfig) -> Header {
    let header_line = HeaderLine::find(doc, start, &config.prefix);
    let line = header_line.line.clone();
    let content_start = if line.end < doc.len() { line.end + 1 } else { line.end };

    let mut options = HeaderOptions::default();

    if let Some(options_start) = header_line.options_start {
        let text = &doc[options_start..line.end];
        for name in &config.option_names {
            if let Some(key) = find_key(text, name, ": ") {
                let value_start = key + name.len() + 2;
                options.insert(name, option_value(&text[value_start..]));
            }
        }
    }

    debug!(
        line_start = line.start,
        options = options.len(),
        has_marker = header_line.options_start.is_some(),
        "parsed header"
    );

    Header {
        options,
        line,
        content_start,
        has_marker: header_line.options_start.is_some(),
    }
}

/// Find the first `<name><suffix>` in `text` that starts a token.
///
/// A token starts at the beginning of the text or after a space or comma,
/// so `id` does not match inside `cardid`.
pub(crate) fn find_key(text: &str, name: &str, suffix: &str) -> Option<usize> {
    if name.is_empty() {
        return None;
    }

    text.match_indices(name).map(|(i, _)| i).find(|&i| {
        let at_boundary = text[..i]
            .chars()
            .next_back()
            .map_or(true, |c| c == ' ' || c == ',');
        at_boundary && text[i + name.len()..].starts_with(suffix)
    })
}

/// Read a value up to the next terminator or the end of the text.
pub(crate) fn option_value(text: &str) -> &str {
    let end = text.find(VALUE_TERMINATORS).unwrap_or(text.len());
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NoteConfig {
        NoteConfig::default()
    }

    #[test]
    fn test_parse_simple_header() {
        let doc = ">>> deck: Spanish, type: Basic\nQ: hola\nA: hello";

        let header = parse_header(doc, 0, &config());

        assert!(header.has_marker);
        assert_eq!(header.options.get("deck"), Some("Spanish"));
        assert_eq!(header.options.get("type"), Some("Basic"));
        assert_eq!(header.options.get("id"), None);
        assert_eq!(header.line, 0..30);
        assert_eq!(header.content_start, 31);
    }

    #[test]
    fn test_parse_header_order_irrelevant() {
        let doc = ">>> id: 42, type: Cloze, deck: Verbs";

        let header = parse_header(doc, 0, &config());

        assert_eq!(header.options.get("deck"), Some("Verbs"));
        assert_eq!(header.options.get("type"), Some("Cloze"));
        assert_eq!(header.options.get("id"), Some("42"));
    }

    #[test]
    fn test_parse_header_value_stops_at_space() {
        let doc = ">>> deck: Two Words, type: Basic";

        let header = parse_header(doc, 0, &config());

        assert_eq!(header.options.get("deck"), Some("Two"));
    }

    #[test]
    fn test_parse_header_value_runs_to_line_end() {
        let doc = ">>> deck: D, type: Basic\nbody with type: Other";

        let header = parse_header(doc, 0, &config());

        assert_eq!(header.options.get("type"), Some("Basic"));
        assert_eq!(header.line, 0..24);
    }

    #[test]
    fn test_parse_header_first_match_wins() {
        let doc = ">>> deck: First, deck: Second, type: Basic";

        let header = parse_header(doc, 0, &config());

        assert_eq!(header.options.get("deck"), Some("First"));
    }

    #[test]
    fn test_parse_header_ignores_unknown_options() {
        let doc = ">>> deck: D, color: red, type: Basic";

        let header = parse_header(doc, 0, &config());

        assert_eq!(header.options.len(), 2);
        assert!(!header.options.contains("color"));
    }

    #[test]
    fn test_parse_header_requires_token_boundary() {
        let doc = ">>> cardid: 9, deck: D, type: Basic";

        let header = parse_header(doc, 0, &config());

        assert_eq!(header.options.get("id"), None);
    }

    #[test]
    fn test_parse_header_without_marker() {
        let doc = "deck: D, type: Basic\nQ: x\nA: y";

        let header = parse_header(doc, 0, &config());

        assert!(!header.has_marker);
        assert!(header.options.is_empty());
    }

    #[test]
    fn test_parse_header_empty_value() {
        let doc = ">>> deck: , type: Basic";

        let header = parse_header(doc, 0, &config());

        assert_eq!(header.options.get("deck"), Some(""));
        assert_eq!(header.options.get_non_empty("deck"), None);
    }

    #[test]
    fn test_parse_header_from_offset_inside_line() {
        let doc = "intro\n\n>>> deck: D, type: Cloze\ntext";

        let header = parse_header(doc, 12, &config());

        assert_eq!(header.line, 7..31);
        assert_eq!(header.options.get("type"), Some("Cloze"));
    }

    #[test]
    fn test_parse_header_last_line_content_start() {
        let doc = ">>> deck: D, type: Cloze";

        let header = parse_header(doc, 0, &config());

        assert_eq!(header.content_start, doc.len());
    }

    #[test]
    fn test_parse_header_custom_prefix() {
        let config = NoteConfig {
            prefix: "%%".to_string(),
            ..NoteConfig::default()
        };
        let doc = "%% deck: D, type: Basic";

        let header = parse_header(doc, 0, &config);

        assert_eq!(header.options.get("deck"), Some("D"));
    }

    #[test]
    fn test_find_key_suffix() {
        assert_eq!(find_key("deck: D, id:", "id", ":"), Some(9));
        assert_eq!(find_key("deck: D, id:", "id", ": "), None);
        assert_eq!(find_key("valid: x", "id", ":"), None);
    }

    #[test]
    fn test_parse_header_offset_inside_multibyte_char() {
        let doc = ">>> deck: Dé, type: Basic\nQ: a\nA: b";
        let inside = doc.find('é').unwrap() + 1;

        let header = parse_header(doc, inside, &config());

        assert_eq!(header.line, 0..doc.find('\n').unwrap());
        assert_eq!(header.options.get("deck"), Some("Dé"));
    }
}

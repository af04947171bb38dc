//! Note parsing and header editing.
//!
//! Notes live in blocks of text separated by blank lines. A note block
//! starts with a header line carrying the prefix marker and its options;
//! the rest of the block is the body, split into fields by the extractor
//! registered for the note's type.
//!
//! # Document Structure
//!
//! ```text
//! >>> deck: Spanish, type: Basic, id: 1712345678
//! Q: hola
//! A: hello
//!
//! >>> deck: Spanish, type: Cloze
//! Yo {{c1::tengo}} hambre
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use cardblock::config::NoteConfig;
//! use cardblock::parser::parse_at;
//! use cardblock::sync::NoTags;
//!
//! let source = std::fs::read_to_string("spanish.txt")?;
//! let note = parse_at(&source, cursor, &NoteConfig::default(), &NoTags)?;
//! println!("{} -> {:?}", note.deck, note.field("Front"));
//! ```

mod block;
mod extract;
mod header;
mod mutate;
mod note;
pub mod span;
pub mod types;

// Re-export main entry points
pub use block::{locate, Block};
pub use extract::{basic, cloze, Extractor, ExtractorRegistry, BASIC, BASIC_REVERSED, CLOZE};
pub use header::{parse_header, Header, HeaderOptions};
pub use mutate::{delete_option, insert_option};
pub use note::{for_each_note_in, parse_all, parse_at, DECK_OPTION, ID_OPTION, TYPE_OPTION};
pub use span::{Location, Span};
pub use types::{Field, NoteRecord};

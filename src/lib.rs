//! cardblock - flashcard notes in plain text
//!
//! A library for finding flashcard notes in blank-line-separated text,
//! extracting their fields, and editing their header options in place.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod sync;

pub use config::{Manifest, NoteConfig};
pub use error::{NoteError, Result};
pub use parser::{
    delete_option, for_each_note_in, insert_option, locate, parse_all, parse_at, parse_header,
    Block, ExtractorRegistry, Field, Header, HeaderOptions, NoteRecord,
};
pub use sync::{
    delete_note_at, push_note_at, push_region, DeleteService, NoTags, PushOutcome, PushService,
    PushSummary, TagSource,
};

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for cardblock operations
#[derive(Error, Diagnostic, Debug)]
pub enum NoteError {
    #[error("No enclosing block: document is empty")]
    #[diagnostic(code(cardblock::locate))]
    NoEnclosingBlock,

    #[error("Note header is missing required option '{option}'")]
    #[diagnostic(
        code(cardblock::header),
        help("Add `deck: <name>` and `type: <name>` to the note's header line")
    )]
    MissingRequiredOption { option: String },

    #[error("Unknown note type '{note_type}'")]
    #[diagnostic(
        code(cardblock::note_type),
        help("Register an extractor for this type or alias it under `types:` in cardblock.yaml")
    )]
    UnknownNoteType { note_type: String },

    #[error("{note_type} note is missing the '{marker}' marker")]
    #[diagnostic(
        code(cardblock::extract),
        help("Basic notes need a `Q:` line followed by an `A:` line")
    )]
    MissingRequiredMarker {
        note_type: String,
        marker: &'static str,
    },

    #[error("Option '{name}' not found in note header")]
    #[diagnostic(code(cardblock::mutate))]
    FieldNotFound { name: String },

    #[error("Line {line} is not a note header")]
    #[diagnostic(
        code(cardblock::mutate),
        help("Header lines start with the configured prefix marker")
    )]
    NotAHeader { line: u32 },

    #[error("Cannot write option '{name}' with value '{value}'")]
    #[diagnostic(
        code(cardblock::mutate),
        help("Option names and values cannot contain spaces, commas or line breaks")
    )]
    InvalidOption { name: String, value: String },

    #[error("Note service error: {message}")]
    #[diagnostic(code(cardblock::service))]
    Service { message: String },

    #[error("Validation error: {message}")]
    #[diagnostic(code(cardblock::validate))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("IO error: {0}")]
    #[diagnostic(code(cardblock::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(cardblock::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(cardblock::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, NoteError>;

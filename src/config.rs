//! Configuration: the `cardblock.yaml` manifest and the runtime `NoteConfig`.
//!
//! The manifest names the header prefix marker, the recognized option keys
//! and any note type aliases. It is turned into a `NoteConfig`, which every
//! parse and mutation entry point takes explicitly.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NoteError, Result};
use crate::parser::ExtractorRegistry;

/// Default manifest file name, looked up in the working directory.
pub const MANIFEST_FILE: &str = "cardblock.yaml";

/// Default header prefix marker.
pub const DEFAULT_PREFIX: &str = ">>>";

/// Default recognized header options.
pub const DEFAULT_OPTIONS: [&str; 4] = ["deck", "type", "id", "title"];

/// Project manifest loaded from cardblock.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Marker that starts a note header line.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Recognized header option names, in scan order.
    #[serde(default = "default_options")]
    pub options: Vec<String>,

    /// Extra note type names mapped to a builtin type (e.g. `Q&A: Basic`).
    #[serde(default)]
    pub types: BTreeMap<String, String>,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_options() -> Vec<String> {
    DEFAULT_OPTIONS.iter().map(|s| s.to_string()).collect()
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            options: default_options(),
            types: BTreeMap::new(),
        }
    }
}

impl Manifest {
    /// Load manifest from a cardblock.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| NoteError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Load an explicit manifest, or `cardblock.yaml` from `dir` if present,
    /// or fall back to defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading manifest");
            return Self::load(path);
        }

        let path: PathBuf = dir.join(MANIFEST_FILE);
        if path.is_file() {
            debug!(path = %path.display(), "loading manifest");
            Self::load(&path)
        } else {
            debug!("no manifest found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| NoteError::Config {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check cardblock.yaml syntax".to_string()),
        })
    }

    /// Build the runtime configuration, registering type aliases.
    pub fn into_config(self) -> Result<NoteConfig> {
        if self.prefix.trim().is_empty() {
            return Err(NoteError::Config {
                message: "Prefix marker must not be empty".to_string(),
                help: Some(format!("Use the default: prefix: \"{}\"", DEFAULT_PREFIX)),
            });
        }

        let mut extractors = ExtractorRegistry::with_builtins();
        for (alias, target) in &self.types {
            extractors.alias(alias.as_str(), target).map_err(|_| NoteError::Config {
                message: format!("Type alias '{}' points to unknown type '{}'", alias, target),
                help: Some("Alias targets must be Basic, Basic (and reversed card) or Cloze".to_string()),
            })?;
        }

        Ok(NoteConfig {
            prefix: self.prefix,
            option_names: self.options,
            extractors,
        })
    }
}

/// Immutable configuration passed to every parse and mutation.
#[derive(Debug, Clone)]
pub struct NoteConfig {
    /// Marker that starts a note header line
    pub prefix: String,
    /// Recognized header options, in scan order
    pub option_names: Vec<String>,
    /// Field extractors by note type
    pub extractors: ExtractorRegistry,
}

impl Default for NoteConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            option_names: default_options(),
            extractors: ExtractorRegistry::with_builtins(),
        }
    }
}

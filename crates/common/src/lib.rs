//! Common types and utilities for protodoc
//!
//! This crate contains the error taxonomy, output format selection, plugin
//! configuration, and the naming rules shared by the parser, generator, and
//! CLI components.

mod options;

pub use options::PluginOptions;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Name prefix of the files shipped with protoc (well-known types and friends).
pub const WELL_KNOWN_PREFIX: &str = "google";

/// Errors that can occur during documentation generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Failed to decode protobuf input: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Field `{field}` has unknown type code {code}")]
    UnknownFieldType { field: String, code: i32 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for protodoc operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Output document format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocFormat {
    #[default]
    #[serde(alias = "md")]
    Markdown,
    #[serde(alias = "htm")]
    Html,
    Json,
}

impl DocFormat {
    /// File extension (without the dot) for documents in this format
    pub fn extension(self) -> &'static str {
        match self {
            DocFormat::Markdown => "md",
            DocFormat::Html => "html",
            DocFormat::Json => "json",
        }
    }
}

impl fmt::Display for DocFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocFormat::Markdown => write!(f, "markdown"),
            DocFormat::Html => write!(f, "html"),
            DocFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for DocFormat {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(DocFormat::Markdown),
            "html" | "htm" => Ok(DocFormat::Html),
            "json" => Ok(DocFormat::Json),
            other => Err(GeneratorError::Config(format!(
                "Unknown output format `{}` (expected markdown, html or json)",
                other
            ))),
        }
    }
}

/// Whether a proto file belongs to the library shipped with protoc
///
/// The check is a case-insensitive prefix match on the declared file name.
pub fn is_well_known(file_name: &str) -> bool {
    file_name
        .get(..WELL_KNOWN_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(WELL_KNOWN_PREFIX))
}

/// Derive the output document name for a proto file
///
/// # Examples
/// ```
/// use protodoc_common::{output_file_name, DocFormat};
///
/// assert_eq!(output_file_name("api/v1/user.proto", DocFormat::Markdown), "user.md");
/// assert_eq!(output_file_name("user.proto", DocFormat::Html), "user.html");
/// ```
pub fn output_file_name(proto_name: &str, format: DocFormat) -> String {
    let base = proto_name
        .rsplit_once('/')
        .map_or(proto_name, |(_, tail)| tail);
    let stem = base.rsplit_once('.').map_or(base, |(head, _)| head);
    format!("{}.{}", stem, format.extension())
}

/// Anchor id used for a qualified message or enum name in rendered pages
pub fn anchor_id(qualified_name: &str) -> String {
    qualified_name
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '-'
            }
        })
        .collect()
}

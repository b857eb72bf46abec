//! Unified Error Model
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChangeLogError {
    #[error("Unexpected tag: {found} (wanted: {wanted})")]
    UnexpectedTag { found: String, wanted: &'static str },

    // A missing `versioncode` is reported under the `version` label as well.
    #[error("Missing attribute: {0}")]
    MissingAttribute(&'static str),

    #[error("<release> tag must contain at least one <change> element")]
    EmptyRelease,

    #[error("Expected text")]
    ExpectedText,

    #[error("Expected </{0}>")]
    ExpectedEndTag(&'static str),

    #[error("Unexpected text: {0}")]
    UnexpectedText(String),

    #[error("Expected <changelog> root element")]
    MissingRoot,

    #[error("Unexpected end of document")]
    UnexpectedEof,

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid UTF-8 in change log document: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Error parsing XML resource: {name}")]
    InvalidDocument {
        name: String,
        #[source]
        source: Box<ChangeLogError>,
    },

    #[error("Failed to open change log document {name}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("missing {0} change log source")]
    MissingSource(&'static str),

    #[error("Version store error: {0}")]
    Store(String),

    #[error("Failed to load config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ChangeLogError>;

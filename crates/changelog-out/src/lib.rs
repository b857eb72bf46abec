//! Changelog Out: renders merged change logs for presentation
//!
//! # Example
//!
//! ```
//! use changelog_core::ReleaseItem;
//! use changelog_out::{ChangeLogRenderer, OutputFormat};
//!
//! let releases = vec![
//!     ReleaseItem::new(1, "1.0", None, vec!["First release".to_string()]).unwrap(),
//! ];
//!
//! let renderer = ChangeLogRenderer::new().unwrap();
//! let html = renderer.render(&releases, OutputFormat::Html).unwrap();
//! assert!(html.contains("<h1>Version 1.0</h1>"));
//! ```

pub mod renderer;
pub mod templates;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use renderer::ChangeLogRenderer;
pub use templates::TemplateSet;

/// Errors that can occur during rendering
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template load failed: {0}")]
    Template(String),
    #[error("Render failed: {0}")]
    Render(String),
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Html,
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Html => write!(f, "html"),
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(RenderError::UnknownFormat(other.to_string())),
        }
    }
}

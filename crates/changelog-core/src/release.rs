//! Release Record: one version's metadata and change list
use serde::Serialize;

use crate::error::{ChangeLogError, Result};

/// Version code used for "no version": unset, or not parseable as an integer.
pub const NO_VERSION: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ReleaseItem {
    version_code: i32,
    version_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    changes: Vec<String>,
}

impl ReleaseItem {
    /// Build a release, rejecting an empty version name or an empty change list.
    pub fn new(
        version_code: i32,
        version_name: impl Into<String>,
        date: Option<String>,
        changes: Vec<String>,
    ) -> Result<Self> {
        let version_name = version_name.into();
        if version_name.is_empty() {
            return Err(ChangeLogError::MissingAttribute("version"));
        }
        if changes.is_empty() {
            return Err(ChangeLogError::EmptyRelease);
        }

        Ok(Self {
            version_code,
            version_name,
            date,
            changes,
        })
    }

    pub fn version_code(&self) -> i32 {
        self.version_code
    }

    /// `false` when the version code is the [`NO_VERSION`] sentinel.
    pub fn has_version_code(&self) -> bool {
        self.version_code != NO_VERSION
    }

    pub fn version_name(&self) -> &str {
        &self.version_name
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// Never empty.
    pub fn changes(&self) -> &[String] {
        &self.changes
    }
}

/// Parse a `versioncode` attribute value, falling back to [`NO_VERSION`].
/// Surrounding whitespace makes the value unparseable.
pub fn parse_version_code(text: &str) -> i32 {
    text.parse().unwrap_or(NO_VERSION)
}

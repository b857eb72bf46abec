//! Configuration loading for change log hosts.
//!
//! Supports a `changelog.yaml` file such as:
//!
//! ```yaml
//! master: res/changelog_master.xml
//! localized: res/changelog_de.xml
//! state_file: .changelog-state.json
//! version_format: "Version {version}"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ChangeLogError, Result};
use crate::merged::MergedSource;
use crate::source::{ChangeLogSource, FileDocument, XmlSource};

/// Default placeholder-based heading for a release.
pub const DEFAULT_VERSION_FORMAT: &str = "Version {version}";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChangeLogConfig {
    /// Master change log, authoritative for the set of versions.
    pub master: PathBuf,
    /// Optional translated change log preferred per version.
    #[serde(default)]
    pub localized: Option<PathBuf>,
    /// JSON file holding the last seen version code.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default = "default_version_format")]
    pub version_format: String,
    #[serde(default)]
    pub css: String,
}

fn default_state_file() -> PathBuf {
    PathBuf::from(".changelog-state.json")
}

fn default_version_format() -> String {
    DEFAULT_VERSION_FORMAT.to_string()
}

impl ChangeLogConfig {
    /// Configuration with defaults for everything but the master document.
    pub fn new(master: impl Into<PathBuf>) -> Self {
        Self {
            master: master.into(),
            localized: None,
            state_file: default_state_file(),
            version_format: default_version_format(),
            css: String::new(),
        }
    }

    /// Load from a YAML file. Relative document paths are resolved against
    /// the directory containing the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ChangeLogError::Config(format!("{}: {}", path.display(), e)))?;
        let mut config = Self::from_yaml(&content)?;

        if let Some(base) = path.parent() {
            config.master = base.join(&config.master);
            config.localized = config.localized.map(|p| base.join(p));
            config.state_file = base.join(&config.state_file);
        }
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| ChangeLogError::Config(e.to_string()))
    }

    /// Source for the configured documents: the master alone, or the master
    /// merged with the localized document when one is configured.
    pub fn build_source(&self) -> Box<dyn ChangeLogSource> {
        let master = XmlSource::new(FileDocument::new(&self.master));
        match &self.localized {
            Some(localized) => Box::new(MergedSource::new(
                master,
                XmlSource::new(FileDocument::new(localized)),
            )),
            None => Box::new(master),
        }
    }
}

//! "What's new" tracking: remembers the last version the user has seen.
use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ChangeLogError, Result};
use crate::release::{ReleaseItem, NO_VERSION};
use crate::source::ChangeLogSource;

/// Key under which the last seen version code is stored.
pub const LAST_VERSION_KEY: &str = "changelog_last_version_code";

/// Persistence for the last seen version code.
pub trait VersionStore {
    /// The stored version code, or [`NO_VERSION`] if nothing was stored yet.
    fn load(&self) -> Result<i32>;

    fn save(&mut self, version_code: i32) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct MemoryVersionStore {
    version_code: i32,
}

impl MemoryVersionStore {
    pub fn new() -> Self {
        Self {
            version_code: NO_VERSION,
        }
    }

    pub fn with_version(version_code: i32) -> Self {
        Self { version_code }
    }
}

impl Default for MemoryVersionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionStore for MemoryVersionStore {
    fn load(&self) -> Result<i32> {
        Ok(self.version_code)
    }

    fn save(&mut self, version_code: i32) -> Result<()> {
        self.version_code = version_code;
        Ok(())
    }
}

/// Stores the version code in a JSON object file, leaving other keys intact.
#[derive(Debug, Clone)]
pub struct JsonVersionStore {
    path: PathBuf,
}

impl JsonVersionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| ChangeLogError::Store(format!("{}: {}", self.path.display(), e)))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| ChangeLogError::Store(format!("{}: {}", self.path.display(), e)))
    }
}

impl VersionStore for JsonVersionStore {
    fn load(&self) -> Result<i32> {
        let entries = self.read_entries()?;
        let version_code = entries
            .get(LAST_VERSION_KEY)
            .and_then(Value::as_i64)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(NO_VERSION);
        Ok(version_code)
    }

    fn save(&mut self, version_code: i32) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(LAST_VERSION_KEY.to_string(), Value::from(version_code));

        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| ChangeLogError::Store(e.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|e| ChangeLogError::Store(format!("{}: {}", self.path.display(), e)))
    }
}

/// Version of the running application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppVersion {
    pub code: i32,
    pub name: String,
}

impl AppVersion {
    pub fn new(code: i32, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
        }
    }
}

/// Full or partial ("what's new") change log for the running application.
pub struct ChangeLog<S, V> {
    source: S,
    store: V,
    current: AppVersion,
    last_version_code: i32,
}

impl<S: ChangeLogSource, V: VersionStore> ChangeLog<S, V> {
    /// Reads the last seen version code from `store` once, up front.
    pub fn new(source: S, store: V, current: AppVersion) -> Result<Self> {
        let last_version_code = store.load()?;
        debug!(
            last_version_code,
            current_version_code = current.code,
            "Loaded change log state"
        );

        Ok(Self {
            source,
            store,
            current,
            last_version_code,
        })
    }

    pub fn last_version_code(&self) -> i32 {
        self.last_version_code
    }

    pub fn current_version_code(&self) -> i32 {
        self.current.code
    }

    pub fn current_version_name(&self) -> &str {
        &self.current.name
    }

    /// `true` the first time this version of the application runs.
    pub fn is_first_run(&self) -> bool {
        self.last_version_code < self.current.code
    }

    /// `true` if no version was ever recorded.
    pub fn is_first_run_ever(&self) -> bool {
        self.last_version_code == NO_VERSION
    }

    /// Record the current version as seen. The in-memory last version code
    /// is left untouched, so `recent_changes` keeps answering for this run.
    pub fn write_current_version(&mut self) -> Result<()> {
        self.store.save(self.current.code)?;
        info!(version_code = self.current.code, "Stored current version");
        Ok(())
    }

    pub fn full_log(&self) -> Result<Vec<ReleaseItem>> {
        self.source.full_log()
    }

    /// Releases newer than the last seen version.
    pub fn recent_changes(&self) -> Result<Vec<ReleaseItem>> {
        self.source.log_since(self.last_version_code)
    }

    pub fn store(&self) -> &V {
        &self.store
    }
}

//! Change log sources: anything that can hand out the full log or the
//! releases newer than a given version code.
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ChangeLogError, Result};
use crate::parser;
use crate::release::{ReleaseItem, NO_VERSION};

/// Capability shared by every change log provider.
pub trait ChangeLogSource {
    /// All releases of this change log.
    fn full_log(&self) -> Result<Vec<ReleaseItem>>;

    /// Releases with a version code strictly greater than `last_version_code`.
    fn log_since(&self, last_version_code: i32) -> Result<Vec<ReleaseItem>>;
}

impl<T: ChangeLogSource + ?Sized> ChangeLogSource for &T {
    fn full_log(&self) -> Result<Vec<ReleaseItem>> {
        (**self).full_log()
    }

    fn log_since(&self, last_version_code: i32) -> Result<Vec<ReleaseItem>> {
        (**self).log_since(last_version_code)
    }
}

impl<T: ChangeLogSource + ?Sized> ChangeLogSource for Box<T> {
    fn full_log(&self) -> Result<Vec<ReleaseItem>> {
        (**self).full_log()
    }

    fn log_since(&self, last_version_code: i32) -> Result<Vec<ReleaseItem>> {
        (**self).log_since(last_version_code)
    }
}

impl<T: ChangeLogSource + ?Sized> ChangeLogSource for Arc<T> {
    fn full_log(&self) -> Result<Vec<ReleaseItem>> {
        (**self).full_log()
    }

    fn log_since(&self, last_version_code: i32) -> Result<Vec<ReleaseItem>> {
        (**self).log_since(last_version_code)
    }
}

// ============================================================================
// Documents
// ============================================================================

/// Supplier of raw XML. Every call to `open` yields a fresh stream.
pub trait Document {
    type Reader: BufRead;

    /// Human-readable name used in diagnostics.
    fn name(&self) -> Cow<'_, str>;

    fn open(&self) -> std::io::Result<Self::Reader>;
}

/// A change log file on disk.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Document for FileDocument {
    type Reader = BufReader<File>;

    fn name(&self) -> Cow<'_, str> {
        self.path.to_string_lossy()
    }

    fn open(&self) -> std::io::Result<Self::Reader> {
        File::open(&self.path).map(BufReader::new)
    }
}

/// A change log compiled into the binary, e.g. via `include_str!`.
#[derive(Debug, Clone, Copy)]
pub struct BundledDocument {
    name: &'static str,
    content: &'static [u8],
}

impl BundledDocument {
    pub const fn new(name: &'static str, content: &'static str) -> Self {
        Self {
            name,
            content: content.as_bytes(),
        }
    }
}

impl Document for BundledDocument {
    type Reader = &'static [u8];

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.name)
    }

    fn open(&self) -> std::io::Result<Self::Reader> {
        Ok(self.content)
    }
}

/// Source that re-reads and re-parses its document on every call.
#[derive(Debug, Clone)]
pub struct XmlSource<D> {
    document: D,
}

impl<D: Document> XmlSource<D> {
    pub fn new(document: D) -> Self {
        Self { document }
    }

    fn read(&self, last_version_code: i32) -> Result<Vec<ReleaseItem>> {
        let name = self.document.name();
        debug!(document = %name, last_version_code, "Reading change log");

        // The stream is dropped on every path out of this function.
        let reader = self.document.open().map_err(|source| ChangeLogError::Io {
            name: name.to_string(),
            source,
        })?;

        // Grammar errors pass through unchanged; only reader failures are wrapped.
        parser::parse_since(reader, last_version_code).map_err(|e| match e {
            ChangeLogError::Xml(_) | ChangeLogError::Utf8(_) => ChangeLogError::InvalidDocument {
                name: name.to_string(),
                source: Box::new(e),
            },
            grammar => grammar,
        })
    }
}

impl<D: Document> ChangeLogSource for XmlSource<D> {
    fn full_log(&self) -> Result<Vec<ReleaseItem>> {
        self.read(NO_VERSION)
    }

    fn log_since(&self, last_version_code: i32) -> Result<Vec<ReleaseItem>> {
        self.read(last_version_code)
    }
}

// ============================================================================
// In-memory source
// ============================================================================

/// Source backed by an already built list of releases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseList {
    releases: Vec<ReleaseItem>,
}

impl ReleaseList {
    pub fn new(releases: Vec<ReleaseItem>) -> Self {
        Self { releases }
    }

    pub fn builder() -> ReleaseListBuilder {
        ReleaseListBuilder::default()
    }

    pub fn releases(&self) -> &[ReleaseItem] {
        &self.releases
    }
}

impl ChangeLogSource for ReleaseList {
    fn full_log(&self) -> Result<Vec<ReleaseItem>> {
        Ok(self.releases.clone())
    }

    fn log_since(&self, last_version_code: i32) -> Result<Vec<ReleaseItem>> {
        if last_version_code == NO_VERSION {
            return self.full_log();
        }
        Ok(self
            .releases
            .iter()
            .filter(|r| r.version_code() > last_version_code)
            .cloned()
            .collect())
    }
}

/// Fluent builder for [`ReleaseList`]; releases keep insertion order.
#[derive(Debug, Default)]
pub struct ReleaseListBuilder {
    releases: Vec<ReleaseItem>,
}

impl ReleaseListBuilder {
    pub fn version(
        mut self,
        version_code: i32,
        version_name: &str,
        date: Option<&str>,
        changes: &[&str],
    ) -> Result<Self> {
        let release = ReleaseItem::new(
            version_code,
            version_name,
            date.map(str::to_string),
            changes.iter().map(|c| c.to_string()).collect(),
        )?;
        self.releases.push(release);
        Ok(self)
    }

    pub fn build(self) -> ReleaseList {
        ReleaseList::new(self.releases)
    }
}

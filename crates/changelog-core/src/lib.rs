//! Changelog Core: release notes parser, sources and merge engine
//!
//! Reads versioned release notes from a small XML dialect and answers
//! "what changed overall" and "what changed since version X". A master
//! change log can be overlaid with a localized one.
//!
//! # Example
//!
//! ```
//! use changelog_core::{BundledDocument, ChangeLogSource, MergedSource, XmlSource};
//!
//! let master = XmlSource::new(BundledDocument::new(
//!     "master",
//!     r#"<changelog>
//!         <release version="1.1" versioncode="2"><change>New feature</change></release>
//!         <release version="1.0" versioncode="1"><change>First release</change></release>
//!     </changelog>"#,
//! ));
//! let localized = XmlSource::new(BundledDocument::new(
//!     "de",
//!     r#"<changelog>
//!         <release version="1.0" versioncode="1"><change>Erste Version</change></release>
//!     </changelog>"#,
//! ));
//!
//! let log = MergedSource::new(master, localized).full_log().unwrap();
//! assert_eq!(log[0].changes()[0], "New feature");
//! assert_eq!(log[1].changes()[0], "Erste Version");
//! ```

pub mod config;
pub mod error;
pub mod merged;
pub mod parser;
pub mod release;
pub mod source;
pub mod tracker;

pub use config::ChangeLogConfig;
pub use error::{ChangeLogError, Result};
pub use merged::{merge, MergedSource};
pub use parser::{parse, parse_since, parse_str};
pub use release::{ReleaseItem, NO_VERSION};
pub use source::{
    BundledDocument, ChangeLogSource, Document, FileDocument, ReleaseList, ReleaseListBuilder,
    XmlSource,
};
pub use tracker::{AppVersion, ChangeLog, JsonVersionStore, MemoryVersionStore, VersionStore};

//! Merge of a master change log with a localized override layer.
//!
//! The master source defines which versions exist. For each of them the
//! localized release is used when present, the master release otherwise.
//! Versions only present in the localized source are dropped.
use std::collections::HashMap;

use tracing::debug;

use crate::error::{ChangeLogError, Result};
use crate::release::ReleaseItem;
use crate::source::ChangeLogSource;

/// Combine two release sequences, newest version code first.
pub fn merge(master: Vec<ReleaseItem>, localized: Vec<ReleaseItem>) -> Vec<ReleaseItem> {
    let localized_count = localized.len();
    let by_code: HashMap<i32, ReleaseItem> = localized
        .into_iter()
        .map(|release| (release.version_code(), release))
        .collect();

    let mut merged: Vec<ReleaseItem> = master
        .into_iter()
        .map(|release| match by_code.get(&release.version_code()) {
            Some(localized) => localized.clone(),
            None => release,
        })
        .collect();

    merged.sort_by(|a, b| b.version_code().cmp(&a.version_code()));

    debug!(
        merged = merged.len(),
        localized = localized_count,
        "Merged change logs"
    );
    merged
}

/// Source decorator merging a master and a localized source.
#[derive(Debug, Clone)]
pub struct MergedSource<M, L> {
    master: M,
    localized: L,
}

impl<M: ChangeLogSource, L: ChangeLogSource> MergedSource<M, L> {
    pub fn new(master: M, localized: L) -> Self {
        Self { master, localized }
    }

    /// Fails eagerly when either source is absent.
    pub fn try_new(master: Option<M>, localized: Option<L>) -> Result<Self> {
        let master = master.ok_or(ChangeLogError::MissingSource("master"))?;
        let localized = localized.ok_or(ChangeLogError::MissingSource("localized"))?;
        Ok(Self::new(master, localized))
    }
}

impl<M: ChangeLogSource, L: ChangeLogSource> ChangeLogSource for MergedSource<M, L> {
    fn full_log(&self) -> Result<Vec<ReleaseItem>> {
        let master = self.master.full_log()?;
        let localized = self.localized.full_log()?;
        Ok(merge(master, localized))
    }

    fn log_since(&self, last_version_code: i32) -> Result<Vec<ReleaseItem>> {
        let master = self.master.log_since(last_version_code)?;
        let localized = self.localized.log_since(last_version_code)?;
        Ok(merge(master, localized))
    }
}

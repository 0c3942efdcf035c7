use std::sync::{Mutex, PoisonError};

use crate::listing::{MergeRequest, MergedListing, ResultEntry};

/// Shared accumulator for merged requests, keyed by project name.
///
/// The lock is held across the whole lookup-and-push so concurrent writers
/// never lose an entry.
#[derive(Debug, Default)]
pub struct Aggregator {
    entries: Mutex<MergedListing>,
}

impl Aggregator {
    pub fn record(&self, project_name: &str, merge_request: &MergeRequest) {
        let entry = ResultEntry::from(merge_request);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(project_name.to_owned())
            .or_default()
            .push(entry);
    }

    pub fn into_listing(self) -> MergedListing {
        self.entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

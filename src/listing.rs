use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{MergedListrError, Result};

/// Merged requests keyed by project display name.
///
/// Entries within one project carry no ordering guarantee.
pub type MergedListing = BTreeMap<String, Vec<ResultEntry>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub group_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    pub id: u64,
    pub project_id: u64,
    pub title: String,
    pub merged_at: DateTime<Utc>,
    pub author: String,
    pub web_url: Option<String>,
}

/// One row of the final listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    pub title: String,
    pub merged_at: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
}

impl From<&MergeRequest> for ResultEntry {
    fn from(mr: &MergeRequest) -> Self {
        Self {
            title: mr.title.clone(),
            merged_at: format_timestamp(mr.merged_at),
            author: mr.author.clone(),
            web_url: mr.web_url.clone(),
        }
    }
}

/// Formats a timestamp the way it appears in the listing, e.g. `2024-03-05T10:00:00Z`.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Projects discovered across all watched groups, keyed by project id.
///
/// A project shared by several groups is stored once; the first group to
/// report it wins.
#[derive(Debug, Default, Clone)]
pub struct ProjectSet {
    projects: IndexMap<u64, Project>,
}

impl ProjectSet {
    /// Inserts a project, returning `false` if its id was already present.
    pub fn insert(&mut self, project: Project) -> bool {
        if self.projects.contains_key(&project.id) {
            return false;
        }
        self.projects.insert(project.id, project);
        true
    }

    pub fn get(&self, id: u64) -> Option<&Project> {
        self.projects.get(&id)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }
}

impl FromIterator<Project> for ProjectSet {
    fn from_iter<I: IntoIterator<Item = Project>>(iter: I) -> Self {
        let mut set = Self::default();
        for project in iter {
            set.insert(project);
        }
        set
    }
}

/// Time range a merge must fall into to be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(from: DateTime<Utc>, until: DateTime<Utc>) -> Result<Self> {
        if from >= until {
            return Err(MergedListrError::Config(format!(
                "time window start {} is not before its end {}",
                format_timestamp(from),
                format_timestamp(until)
            )));
        }
        Ok(Self { from, until })
    }

    /// Window covering whole calendar days, `first` through `last` inclusive.
    ///
    /// `from` is `first` at midnight UTC, `until` is midnight after `last`.
    pub fn from_dates(first: NaiveDate, last: NaiveDate) -> Result<Self> {
        let until_day = last
            .succ_opt()
            .ok_or_else(|| MergedListrError::Config(format!("date out of range: {last}")))?;
        Self::new(midnight_utc(first), midnight_utc(until_day))
    }

    /// `true` iff `timestamp` lies strictly between `from` and `until`.
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp > self.from && timestamp < self.until
    }

    /// Same window grown by `margin` on both ends.
    pub fn widened(&self, margin: Duration) -> Self {
        Self {
            from: self.from - margin,
            until: self.until + margin,
        }
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

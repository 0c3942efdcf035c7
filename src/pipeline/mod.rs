//! Three-stage discovery of merged requests.
//!
//! Each phase fans out one request per input item and joins them all before
//! the next phase starts, since a phase consumes the previous one's full
//! output:
//!
//! 1. Resolve watch-list fragments to groups
//! 2. Expand groups to their de-duplicated projects
//! 3. Fetch merged requests per project and aggregate them by project name
//!
//! Any failed request ends the run; there are no partial results.

mod aggregator;
#[cfg(test)]
mod fake;
mod groups;
mod merge_requests;
mod projects;

use std::fmt;

use log::{debug, info, warn};

use crate::error::Result;
use crate::listing::{MergedListing, TimeWindow};
use crate::output::PhaseProgress;
use crate::providers::DirectoryClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ResolveGroups,
    ExpandProjects,
    FetchMergeRequests,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ResolveGroups => "resolve groups",
            Self::ExpandProjects => "expand projects",
            Self::FetchMergeRequests => "fetch merge requests",
        };
        f.write_str(name)
    }
}

pub struct Pipeline<'a, C> {
    client: &'a C,
    show_progress: bool,
}

impl<'a, C: DirectoryClient> Pipeline<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            show_progress: false,
        }
    }

    /// Draws a phase spinner on stderr while running.
    pub fn show_progress(mut self, visible: bool) -> Self {
        self.show_progress = visible;
        self
    }

    pub async fn run(&self, watch_list: &[String], window: &TimeWindow) -> Result<MergedListing> {
        info!(
            "Looking for merge requests merged between {} and {}...",
            window.from.format("%Y-%m-%d %H:%M:%S"),
            window.until.format("%Y-%m-%d %H:%M:%S")
        );

        let progress = PhaseProgress::start_phase_1(self.show_progress, watch_list.len());

        debug!("Phase: {}", Phase::ResolveGroups);
        let groups = groups::resolve_groups(self.client, watch_list).await?;
        info!("Found {} groups", groups.len());
        if groups.is_empty() {
            warn!("No group matched the watch list");
        }

        let progress = progress.finish_phase_1_start_phase_2(groups.len());

        debug!("Phase: {}", Phase::ExpandProjects);
        let projects = projects::expand_projects(self.client, &groups).await?;
        info!("Found {} projects", projects.len());

        let progress = progress.finish_phase_2_start_phase_3(projects.len());

        debug!("Phase: {}", Phase::FetchMergeRequests);
        let listing = merge_requests::fetch_merged(self.client, &projects, window).await?;
        let merge_request_count: usize = listing.values().map(Vec::len).sum();
        info!(
            "Found {merge_request_count} merged requests across {} projects",
            listing.len()
        );

        progress.finish_phase_3(merge_request_count);

        Ok(listing)
    }
}

mod gitlab;

pub use gitlab::{ClientOptions, GitLabProvider};

use crate::error::Result;
use crate::listing::{Group, MergeRequest, Project, TimeWindow};

/// Read-only view of a code-collaboration platform's directory.
///
/// Every call returns at most one page of records.
pub trait DirectoryClient {
    /// Groups whose name or path matches `query`. No match is an empty list, not an error.
    async fn search_groups(&self, query: &str) -> Result<Vec<Group>>;

    /// Non-archived projects belonging to `group_id`.
    async fn list_group_projects(&self, group_id: u64) -> Result<Vec<Project>>;

    /// Merged requests of `project_id` last updated inside `updated`, newest update first.
    async fn list_merged_requests(
        &self,
        project_id: u64,
        updated: &TimeWindow,
    ) -> Result<Vec<MergeRequest>>;
}

mod core;
mod groups;
mod merge_requests;
mod projects;

pub use self::core::{ClientOptions, GitLabClient};

use crate::error::Result;
use crate::listing::{Group, MergeRequest, Project, TimeWindow};
use crate::providers::DirectoryClient;

impl DirectoryClient for GitLabClient {
    async fn search_groups(&self, query: &str) -> Result<Vec<Group>> {
        self.fetch_groups(query).await
    }

    async fn list_group_projects(&self, group_id: u64) -> Result<Vec<Project>> {
        self.fetch_group_projects(group_id).await
    }

    async fn list_merged_requests(
        &self,
        project_id: u64,
        updated: &TimeWindow,
    ) -> Result<Vec<MergeRequest>> {
        self.fetch_merged_requests(project_id, updated).await
    }
}

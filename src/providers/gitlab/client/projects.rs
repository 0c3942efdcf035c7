use log::debug;

use super::core::GitLabClient;
use crate::error::Result;
use crate::listing::Project;
use crate::providers::gitlab::types::GitLabProject;

impl GitLabClient {
    /// Lists the active projects of a group. Archived projects are filtered
    /// server-side and skipped again should any slip through.
    pub async fn fetch_group_projects(&self, group_id: u64) -> Result<Vec<Project>> {
        let projects: Vec<GitLabProject> = self
            .get_first_page(
                &format!("groups/{group_id}/projects"),
                &[("archived", "false".to_string())],
            )
            .await?;

        Ok(projects
            .into_iter()
            .filter(|project| !project.archived)
            .inspect(|project| debug!("Found project {} in group {group_id}", project.name))
            .map(|project| project.into_project(group_id))
            .collect())
    }
}

use log::debug;

use super::core::GitLabClient;
use crate::error::Result;
use crate::listing::{format_timestamp, MergeRequest, TimeWindow};
use crate::providers::gitlab::types::GitLabMergeRequest;

impl GitLabClient {
    /// Lists merged requests of a project whose last update falls in `updated`.
    ///
    /// GitLab cannot filter on merge time, so callers re-filter locally.
    pub async fn fetch_merged_requests(
        &self,
        project_id: u64,
        updated: &TimeWindow,
    ) -> Result<Vec<MergeRequest>> {
        let merge_requests: Vec<GitLabMergeRequest> = self
            .get_first_page(
                &format!("projects/{project_id}/merge_requests"),
                &[
                    ("state", "merged".to_string()),
                    ("order_by", "updated_at".to_string()),
                    ("scope", "all".to_string()),
                    ("updated_after", format_timestamp(updated.from)),
                    ("updated_before", format_timestamp(updated.until)),
                ],
            )
            .await?;

        Ok(merge_requests
            .into_iter()
            .inspect(|mr| {
                debug!(
                    "Found merge request !{} titled {} on project {project_id}",
                    mr.iid, mr.title
                );
            })
            .filter_map(GitLabMergeRequest::into_merge_request)
            .collect())
    }
}

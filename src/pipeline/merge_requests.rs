use chrono::Duration;
use futures::future::try_join_all;
use log::debug;

use super::aggregator::Aggregator;
use crate::error::{MergedListrError, Result};
use crate::listing::{MergedListing, ProjectSet, TimeWindow};
use crate::providers::DirectoryClient;

/// GitLab filters on last update rather than merge time. Merging is an
/// update, so the server-side range is padded by this many days per side.
const UPDATE_MARGIN_DAYS: i64 = 1;

/// Fetches each project's merged requests concurrently and keeps those
/// merged strictly inside `window`.
pub async fn fetch_merged<C: DirectoryClient>(
    client: &C,
    projects: &ProjectSet,
    window: &TimeWindow,
) -> Result<MergedListing> {
    let updated = window.widened(Duration::days(UPDATE_MARGIN_DAYS));
    let aggregator = Aggregator::default();

    let fetches = projects.iter().map(|project| {
        let aggregator = &aggregator;
        let updated = &updated;
        async move {
            debug!("Looking for merge requests in project: {}", project.name);
            let merge_requests = client.list_merged_requests(project.id, updated).await?;
            debug!(
                "Found {} merge requests in project {}",
                merge_requests.len(),
                project.name
            );

            for merge_request in merge_requests
                .iter()
                .filter(|mr| window.contains(mr.merged_at))
            {
                aggregator.record(&project.name, merge_request);
            }
            Ok::<_, MergedListrError>(())
        }
    });

    try_join_all(fetches).await?;

    Ok(aggregator.into_listing())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{MergeRequest, Project};
    use crate::pipeline::fake::{Call, FakeDirectory};
    use chrono::{DateTime, Utc};

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn merged(id: u64, project_id: u64, merged_at: &str) -> MergeRequest {
        MergeRequest {
            id,
            project_id,
            title: format!("MR {id}"),
            merged_at: at(merged_at),
            author: "Alice".into(),
            web_url: None,
        }
    }

    fn project_set(ids: &[(u64, &str)]) -> ProjectSet {
        ids.iter()
            .map(|(id, name)| Project { id: *id, name: (*name).into(), group_id: 1 })
            .collect()
    }

    fn day_window() -> TimeWindow {
        TimeWindow::new(at("2024-01-01T00:00:00Z"), at("2024-01-02T00:00:00Z")).unwrap()
    }

    #[tokio::test]
    async fn test_keeps_only_merges_strictly_inside_window() {
        let directory = FakeDirectory::default()
            .with_merge_request(merged(1, 10, "2024-01-01T00:00:00Z"))
            .with_merge_request(merged(2, 10, "2024-01-01T12:00:00Z"))
            .with_merge_request(merged(3, 10, "2024-01-02T00:00:00Z"))
            .with_merge_request(merged(4, 10, "2023-12-31T23:00:00Z"));

        let listing = fetch_merged(&directory, &project_set(&[(10, "svc-x")]), &day_window())
            .await
            .unwrap();

        let titles: Vec<&str> = listing["svc-x"].iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["MR 2"]);
    }

    #[tokio::test]
    async fn test_queries_update_range_widened_by_one_day() {
        let directory = FakeDirectory::default();

        fetch_merged(&directory, &project_set(&[(10, "svc-x")]), &day_window())
            .await
            .unwrap();

        let windows = directory.updated_windows();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].from, at("2023-12-31T00:00:00Z"));
        assert_eq!(windows[0].until, at("2024-01-03T00:00:00Z"));
    }

    #[tokio::test]
    async fn test_project_without_qualifying_merges_has_no_key() {
        let directory = FakeDirectory::default()
            .with_merge_request(merged(1, 10, "2024-01-01T08:00:00Z"))
            .with_merge_request(merged(2, 11, "2024-01-05T08:00:00Z"));

        let listing = fetch_merged(
            &directory,
            &project_set(&[(10, "svc-x"), (11, "svc-y")]),
            &day_window(),
        )
        .await
        .unwrap();

        assert!(listing.contains_key("svc-x"));
        assert!(!listing.contains_key("svc-y"));
    }

    #[tokio::test]
    async fn test_one_failing_project_aborts_all_fetches() {
        let mut directory = FakeDirectory::default()
            .with_random_latency(20)
            .failing(Call::ListMergedRequests(13));
        for id in 10..20 {
            directory = directory.with_merge_request(merged(id, id, "2024-01-01T08:00:00Z"));
        }
        let projects: ProjectSet = (10..20)
            .map(|id| Project { id, name: format!("p{id}"), group_id: 1 })
            .collect();

        let result = fetch_merged(&directory, &projects, &day_window()).await;

        assert!(matches!(result, Err(MergedListrError::Api { .. })));
        // Siblings were still sleeping when the failure surfaced and got dropped.
        assert_eq!(directory.completed_calls(), 0);
    }
}

//! In-memory directory used by the pipeline tests.

use std::collections::hash_map::RandomState;
use std::collections::{HashMap, HashSet};
use std::hash::{BuildHasher, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{MergedListrError, Result};
use crate::listing::{Group, MergeRequest, Project, TimeWindow};
use crate::providers::DirectoryClient;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Call {
    SearchGroups(String),
    ListGroupProjects(u64),
    ListMergedRequests(u64),
}

/// Canned responses with optional random latency and error injection.
///
/// Injected failures return immediately, without latency.
#[derive(Default)]
pub struct FakeDirectory {
    groups: HashMap<String, Vec<Group>>,
    projects: HashMap<u64, Vec<Project>>,
    merge_requests: HashMap<u64, Vec<MergeRequest>>,
    failures: HashSet<Call>,
    max_latency_ms: u64,
    completed_calls: AtomicUsize,
    updated_windows: Mutex<Vec<TimeWindow>>,
}

impl FakeDirectory {
    pub fn with_group(mut self, query: &str, group: Group) -> Self {
        self.groups.entry(query.to_owned()).or_default().push(group);
        self
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.projects.entry(project.group_id).or_default().push(project);
        self
    }

    pub fn with_merge_request(mut self, merge_request: MergeRequest) -> Self {
        self.merge_requests
            .entry(merge_request.project_id)
            .or_default()
            .push(merge_request);
        self
    }

    pub fn failing(mut self, call: Call) -> Self {
        self.failures.insert(call);
        self
    }

    /// Delays every successful call by 1 to `max_ms` milliseconds.
    pub fn with_random_latency(mut self, max_ms: u64) -> Self {
        self.max_latency_ms = max_ms;
        self
    }

    /// Number of calls that returned a response.
    pub fn completed_calls(&self) -> usize {
        self.completed_calls.load(Ordering::SeqCst)
    }

    /// Update-time windows passed to `list_merged_requests`.
    pub fn updated_windows(&self) -> Vec<TimeWindow> {
        self.updated_windows.lock().unwrap().clone()
    }

    async fn respond<T: Clone>(&self, call: Call, records: Option<&Vec<T>>) -> Result<Vec<T>> {
        if self.failures.contains(&call) {
            return Err(MergedListrError::Api {
                status: 500,
                message: format!("injected failure for {call:?}"),
            });
        }

        if self.max_latency_ms > 0 {
            let mut hasher = RandomState::new().build_hasher();
            hasher.write_usize(self.completed_calls.load(Ordering::SeqCst));
            let delay = 1 + hasher.finish() % self.max_latency_ms;
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        self.completed_calls.fetch_add(1, Ordering::SeqCst);
        Ok(records.cloned().unwrap_or_default())
    }
}

impl DirectoryClient for FakeDirectory {
    async fn search_groups(&self, query: &str) -> Result<Vec<Group>> {
        self.respond(Call::SearchGroups(query.to_owned()), self.groups.get(query))
            .await
    }

    async fn list_group_projects(&self, group_id: u64) -> Result<Vec<Project>> {
        self.respond(Call::ListGroupProjects(group_id), self.projects.get(&group_id))
            .await
    }

    async fn list_merged_requests(
        &self,
        project_id: u64,
        updated: &TimeWindow,
    ) -> Result<Vec<MergeRequest>> {
        self.updated_windows.lock().unwrap().push(*updated);
        self.respond(
            Call::ListMergedRequests(project_id),
            self.merge_requests.get(&project_id),
        )
        .await
    }
}

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::listing::{Group, MergeRequest, Project};

/// A group as returned by `GET /groups`.
#[derive(Debug, Deserialize)]
pub struct GitLabGroup {
    pub id: u64,
    pub name: String,
    /// Full namespace path (e.g., "org/team")
    #[serde(default)]
    pub full_path: String,
}

/// A project as returned by `GET /groups/:id/projects`.
#[derive(Debug, Deserialize)]
pub struct GitLabProject {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub archived: bool,
}

/// A merge request as returned by `GET /projects/:id/merge_requests`.
#[derive(Debug, Deserialize)]
pub struct GitLabMergeRequest {
    pub id: u64,
    /// Project-scoped number shown in the UI (e.g., !42)
    pub iid: u64,
    pub project_id: u64,
    pub title: String,
    /// Null for requests merged before GitLab tracked merge times
    pub merged_at: Option<DateTime<Utc>>,
    pub author: GitLabUser,
    pub web_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GitLabUser {
    pub name: String,
}

impl From<GitLabGroup> for Group {
    fn from(group: GitLabGroup) -> Self {
        Self {
            id: group.id,
            name: group.name,
        }
    }
}

impl GitLabProject {
    pub fn into_project(self, group_id: u64) -> Project {
        Project {
            id: self.id,
            name: self.name,
            group_id,
        }
    }
}

impl GitLabMergeRequest {
    /// Converts to the domain record, or `None` when no merge time is known.
    pub fn into_merge_request(self) -> Option<MergeRequest> {
        let merged_at = self.merged_at?;
        Some(MergeRequest {
            id: self.id,
            project_id: self.project_id,
            title: self.title,
            merged_at,
            author: self.author.name,
            web_url: self.web_url,
        })
    }
}

use futures::future::try_join_all;
use log::debug;

use crate::error::{MergedListrError, Result};
use crate::listing::{Group, ProjectSet};
use crate::providers::DirectoryClient;

/// Lists the projects of every group concurrently and merges them by id.
pub async fn expand_projects<C: DirectoryClient>(client: &C, groups: &[Group]) -> Result<ProjectSet> {
    let listings = groups.iter().map(|group| async move {
        let projects = client.list_group_projects(group.id).await?;
        debug!("Found {} projects in group {}", projects.len(), group.name);
        Ok::<_, MergedListrError>(projects)
    });

    let mut projects = ProjectSet::default();
    for project in try_join_all(listings).await?.into_iter().flatten() {
        let (id, name) = (project.id, project.name.clone());
        if !projects.insert(project) {
            debug!("Project {name} ({id}) already listed by another group");
        }
    }

    Ok(projects)
}

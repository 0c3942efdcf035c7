use futures::future::try_join_all;
use indexmap::IndexMap;
use log::{debug, warn};

use crate::error::{MergedListrError, Result};
use crate::listing::Group;
use crate::providers::DirectoryClient;

/// Resolves every watch-list fragment to the groups matching it.
///
/// Searches run concurrently, one per fragment. A group matched by several
/// fragments is returned once. The first failed search aborts the rest.
pub async fn resolve_groups<C: DirectoryClient>(
    client: &C,
    watch_list: &[String],
) -> Result<Vec<Group>> {
    let searches = watch_list.iter().map(|fragment| async move {
        let found = client.search_groups(fragment).await?;
        if found.is_empty() {
            warn!("No group matches '{fragment}'");
        }
        Ok::<_, MergedListrError>(found)
    });

    let mut groups: IndexMap<u64, Group> = IndexMap::new();
    for group in try_join_all(searches).await?.into_iter().flatten() {
        debug!("Found group: {}", group.name);
        groups.entry(group.id).or_insert(group);
    }

    Ok(groups.into_values().collect())
}

use log::debug;

use super::core::GitLabClient;
use crate::error::Result;
use crate::listing::Group;
use crate::providers::gitlab::types::GitLabGroup;

impl GitLabClient {
    /// Searches groups by name or path fragment.
    pub async fn fetch_groups(&self, search: &str) -> Result<Vec<Group>> {
        let groups: Vec<GitLabGroup> = self
            .get_first_page("groups", &[("search", search.to_string())])
            .await?;

        for group in &groups {
            debug!("Found group: {} ({})", group.name, group.full_path);
        }

        Ok(groups.into_iter().map(Group::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::gitlab::client::ClientOptions;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_fetch_groups_passes_search_fragment() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/groups")
            .match_query(Matcher::UrlEncoded("search".into(), "team A".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id": 1, "name": "team A", "full_path": "org/team-a"},
                    {"id": 2, "name": "team A legacy", "full_path": "org/team-a-legacy"}
                ]"#,
            )
            .create_async()
            .await;

        let client = GitLabClient::new(&server.url(), None, &ClientOptions::default()).unwrap();
        let groups = client.fetch_groups("team A").await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            groups,
            vec![
                Group { id: 1, name: "team A".into() },
                Group { id: 2, name: "team A legacy".into() },
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_groups_without_match_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v4/groups")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = GitLabClient::new(&server.url(), None, &ClientOptions::default()).unwrap();
        let groups = client.fetch_groups("nobody").await.unwrap();

        assert!(groups.is_empty());
    }
}

use log::{info, warn};

use crate::auth::Token;
use crate::error::Result;
use crate::listing::{MergedListing, TimeWindow};
use crate::pipeline::Pipeline;

use super::client::{ClientOptions, GitLabClient};

/// Lists merged GitLab merge requests across watched groups.
///
/// Runs the group → project → merge request discovery pipeline against the
/// GitLab REST API (v4).
pub struct GitLabProvider {
    client: GitLabClient,
    show_progress: bool,
}

impl GitLabProvider {
    /// Creates a new GitLab provider.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitLab instance base URL (e.g., <https://gitlab.com>)
    /// * `token` - Optional personal access token
    /// * `options` - Request timeout, concurrency ceiling and page size
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL cannot be built or the options are invalid.
    pub fn new(base_url: &str, token: Option<Token>, options: &ClientOptions) -> Result<Self> {
        if token.is_none() {
            warn!("No GitLab token configured; only public groups will be visible");
        }

        let client = GitLabClient::new(base_url, token, options)?;
        info!("Using GitLab API at {}", client.api_url());

        Ok(Self {
            client,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, visible: bool) -> Self {
        self.show_progress = visible;
        self
    }

    /// Collects merge requests merged inside `window` for every project of
    /// every group matching a `watch_list` fragment.
    ///
    /// # Errors
    ///
    /// Returns the first failed API call; nothing is returned for the other
    /// requests of that run.
    pub async fn list_merged(
        &self,
        watch_list: &[String],
        window: &TimeWindow,
    ) -> Result<MergedListing> {
        Pipeline::new(&self.client)
            .show_progress(self.show_progress)
            .run(watch_list, window)
            .await
    }
}

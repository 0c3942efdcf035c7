use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

use crate::auth::Token;
use crate::error::{MergedListrError, Result};

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 50;
/// GitLab caps `per_page` at 100.
const DEFAULT_PAGE_SIZE: usize = 100;

/// Tuning knobs for the REST client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Deadline applied to every single request
    pub timeout: Duration,
    /// Ceiling on requests in flight at once
    pub max_concurrent_requests: usize,
    /// Size of the one page fetched per listing call
    pub per_page: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

pub struct GitLabClient {
    client: Client,
    api_url: Url,
    token: Option<Token>,
    per_page: usize,
    semaphore: Arc<Semaphore>,
}

impl GitLabClient {
    pub fn new(base_url: &str, token: Option<Token>, options: &ClientOptions) -> Result<Self> {
        if options.max_concurrent_requests == 0 {
            return Err(MergedListrError::Config(
                "max-concurrent-requests must be at least 1".to_string(),
            ));
        }
        if options.per_page == 0 {
            return Err(MergedListrError::Config(
                "per-page must be at least 1".to_string(),
            ));
        }

        let client = Client::builder()
            .user_agent(concat!("mergedlistr/", env!("CARGO_PKG_VERSION")))
            .timeout(options.timeout)
            .build()
            .map_err(|e| MergedListrError::Config(format!("Failed to create HTTP client: {e}")))?;

        let mut base = Url::parse(base_url)
            .map_err(|e| MergedListrError::Config(format!("Invalid base URL: {e}")))?;

        // Without a trailing slash `join` would drop the last path segment.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let api_url = base
            .join("api/v4/")
            .map_err(|e| MergedListrError::Config(format!("Invalid API base URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            token,
            per_page: options.per_page,
            semaphore: Arc::new(Semaphore::new(options.max_concurrent_requests)),
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.token {
            request.bearer_auth(token.as_str())
        } else {
            request
        }
    }

    /// Fetches the first page of a list endpoint.
    ///
    /// There is no traversal past page one; a full page is logged since
    /// anything beyond it is silently lost.
    pub(super) async fn get_first_page<T>(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let url = self
            .api_url
            .join(path)
            .map_err(|e| MergedListrError::Config(format!("Invalid API path {path}: {e}")))?;

        // One permit per logical request
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| MergedListrError::Config(format!("Request limiter unavailable: {e}")))?;

        debug!("GET {url}");

        let request = self.auth_request(
            self.client
                .get(url)
                .query(query)
                .query(&[("page", "1".to_string()), ("per_page", self.per_page.to_string())]),
        );

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                MergedListrError::Auth {
                    status: status.as_u16(),
                    message,
                }
            } else {
                MergedListrError::Api {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let body = response.bytes().await?;
        let records: Vec<T> = serde_json::from_slice(&body)?;

        if records.len() >= self.per_page {
            warn!(
                "{path} returned a full page of {} records; later pages are not fetched",
                records.len()
            );
        }

        Ok(records)
    }
}

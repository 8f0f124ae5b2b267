//! HTTP implementation of [`SectionRepository`].

use crate::error::{RepositoryError, RepositoryResult};
use crate::repository::SectionRepository;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storefront_model::{RawSection, SectionId, SectionInput, SectionPatch};
use tracing::{debug, warn};

/// Where the section API lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpRepositoryConfig {
    /// Scheme, host and port of the API server.
    pub base_url: String,
    /// Path of the section collection.
    pub sections_path: String,
    /// Per-request timeout, after which the store counts as unavailable.
    pub timeout_secs: u64,
}

impl Default for HttpRepositoryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            sections_path: "/api/homepage-sections".to_string(),
            timeout_secs: 30,
        }
    }
}

/// List responses come either as a bare array or wrapped in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListResponse {
    Bare(Vec<RawSection>),
    Wrapped { sections: Vec<RawSection> },
}

#[derive(Serialize)]
struct ReorderRequest<'a> {
    ids: &'a [SectionId],
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Talks to the section API over HTTP.
pub struct HttpSectionRepository {
    config: HttpRepositoryConfig,
    client: Client,
}

impl HttpSectionRepository {
    /// Creates a repository with its own HTTP client.
    pub fn new(config: HttpRepositoryConfig) -> RepositoryResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                RepositoryError::Unavailable(format!("failed to create HTTP client: {e}"))
            })?;
        Ok(Self::with_client(config, client))
    }

    /// Creates a repository sharing an existing client.
    pub fn with_client(config: HttpRepositoryConfig, client: Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &HttpRepositoryConfig {
        &self.config
    }

    fn collection_url(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.sections_path
        )
    }

    fn section_url(&self, id: &SectionId) -> String {
        format!(
            "{}/{}",
            self.collection_url(),
            urlencoding::encode(id.as_str())
        )
    }

    /// Sends a request and turns any non-success status into an error.
    async fn send(&self, request: RequestBuilder, what: &str) -> RepositoryResult<Response> {
        let response = request.send().await.map_err(|e| {
            warn!("{} failed: {}", what, e);
            RepositoryError::Unavailable(format!("{what} failed: {e}"))
        })?;

        let status = response.status();
        if status.is_success() {
            debug!("{} -> {}", what, status);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(&body, status);
        warn!("{} -> {}: {}", what, status, detail);

        Err(match status {
            StatusCode::NOT_FOUND => RepositoryError::NotFound(detail),
            s if s.is_client_error() => RepositoryError::Rejected {
                status: s.as_u16(),
                detail,
            },
            _ => RepositoryError::Unavailable(format!("{what} returned {status}: {detail}")),
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> RepositoryResult<T> {
        response.json().await.map_err(|e| {
            RepositoryError::Unavailable(format!("{what} returned a malformed body: {e}"))
        })
    }
}

/// Uses the server's `{"error": ...}` message when there is one.
fn error_detail(body: &str, status: StatusCode) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("no detail")
            .to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl SectionRepository for HttpSectionRepository {
    async fn list(&self, include_inactive: bool) -> RepositoryResult<Vec<RawSection>> {
        let request = self
            .client
            .get(self.collection_url())
            .query(&[("includeInactive", include_inactive)]);
        let response = self.send(request, "list sections").await?;
        let sections = match Self::read_json::<ListResponse>(response, "list sections").await? {
            ListResponse::Bare(sections) | ListResponse::Wrapped { sections } => sections,
        };
        debug!("Listed {} sections", sections.len());
        Ok(sections)
    }

    async fn create(&self, input: &SectionInput) -> RepositoryResult<RawSection> {
        let request = self.client.post(self.collection_url()).json(input);
        let response = self.send(request, "create section").await?;
        Self::read_json(response, "create section").await
    }

    async fn update(&self, id: &SectionId, patch: &SectionPatch) -> RepositoryResult<RawSection> {
        let request = self.client.put(self.section_url(id)).json(patch);
        let response = self.send(request, "update section").await?;
        Self::read_json(response, "update section").await
    }

    async fn delete(&self, id: &SectionId) -> RepositoryResult<()> {
        let request = self.client.delete(self.section_url(id));
        self.send(request, "delete section").await?;
        Ok(())
    }

    async fn reorder(&self, ids: &[SectionId]) -> RepositoryResult<()> {
        let request = self
            .client
            .post(format!("{}/reorder", self.collection_url()))
            .json(&ReorderRequest { ids });
        self.send(request, "reorder sections").await?;
        Ok(())
    }
}

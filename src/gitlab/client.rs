//! Authenticated, read-only HTTP access to the GitLab REST API.

use http::header::{ACCEPT, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::ClientSettings;

use super::error::GitLabError;
use super::error_mapping::{map_http_error, map_transport_error};
use super::pagination::{Page, PageInfo, PerPage};

const USER_AGENT_VALUE: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper over a reqwest client that only ever issues `GET`.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: Client,
    settings: ClientSettings,
}

impl GitLabClient {
    /// Builds a client honouring the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError::Configuration`] when the HTTP client cannot be
    /// constructed.
    pub fn new(settings: ClientSettings) -> Result<Self, GitLabError> {
        let mut default_headers = http::HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let http = Client::builder()
            .timeout(settings.request_timeout())
            .default_headers(default_headers)
            .build()
            .map_err(|error| GitLabError::Configuration {
                message: format!("failed to configure GitLab HTTP client: {error}"),
            })?;

        Ok(Self { http, settings })
    }

    /// Fetches one page of a collection endpoint.
    ///
    /// `path` is the absolute API path (starting with `/api/v4`).
    ///
    /// # Errors
    ///
    /// Returns a classified [`GitLabError`] for non-success statuses,
    /// transport failures, timeouts, and undecodable bodies.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        page: u32,
        per_page: PerPage,
        correlation_id: &str,
    ) -> Result<Page<T>, GitLabError> {
        let url = self.settings.api_url(path);
        let timeout_ms = duration_millis(&self.settings);

        tracing::debug!(
            operation,
            path,
            page,
            per_page = per_page.get(),
            correlation_id,
            "requesting GitLab page"
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.settings.token().value())
            .query(&[("per_page", u32::from(per_page.get())), ("page", page)])
            .send()
            .await
            .map_err(|error| map_transport_error(operation, &error, timeout_ms))?;

        let status = response.status();
        let headers = response.headers().clone();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(operation, status, &headers, &body));
        }

        let items: Vec<T> = response
            .json()
            .await
            .map_err(|error| map_transport_error(operation, &error, timeout_ms))?;
        let info = PageInfo::from_headers(&headers, page, per_page.get());

        tracing::debug!(
            operation,
            page = info.current_page(),
            items = items.len(),
            total = info.total(),
            total_pages = info.total_pages(),
            next_page = info.next_page(),
            correlation_id,
            "received GitLab page"
        );

        Ok(Page { items, info })
    }
}

fn duration_millis(settings: &ClientSettings) -> u64 {
    u64::try_from(settings.request_timeout().as_millis()).unwrap_or(u64::MAX)
}

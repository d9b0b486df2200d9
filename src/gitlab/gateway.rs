//! Gateways for loading merge request discussions and notes.
//!
//! The trait-based design enables mocking in tests while [`GitLabGateway`]
//! walks the real paginated endpoints.

use async_trait::async_trait;

use super::client::GitLabClient;
use super::error::GitLabError;
use super::locator::MergeRequestLocator;
use super::models::{RawDiscussion, RawNote};
use super::pagination::{PerPage, collect_pages};

/// Gateway that can load every comment record of a merge request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MergeRequestGateway: Send + Sync {
    /// Fetch all discussion threads, walking every page.
    async fn discussions(
        &self,
        locator: &MergeRequestLocator,
        per_page: PerPage,
        correlation_id: &str,
    ) -> Result<Vec<RawDiscussion>, GitLabError>;

    /// Fetch all standalone notes, walking every page.
    async fn notes(
        &self,
        locator: &MergeRequestLocator,
        per_page: PerPage,
        correlation_id: &str,
    ) -> Result<Vec<RawNote>, GitLabError>;
}

/// Gateway backed by the GitLab REST API.
#[derive(Debug, Clone)]
pub struct GitLabGateway {
    client: GitLabClient,
}

impl GitLabGateway {
    /// Creates a gateway over an existing client.
    #[must_use]
    pub const fn new(client: GitLabClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MergeRequestGateway for GitLabGateway {
    async fn discussions(
        &self,
        locator: &MergeRequestLocator,
        per_page: PerPage,
        correlation_id: &str,
    ) -> Result<Vec<RawDiscussion>, GitLabError> {
        let path = locator.discussions_path();
        let discussions = collect_pages(|page| {
            self.client
                .get_page("list discussions", &path, page, per_page, correlation_id)
        })
        .await?;

        tracing::info!(
            project = locator.project().as_str(),
            mr = locator.iid().get(),
            discussions = discussions.len(),
            correlation_id,
            "fetched merge request discussions"
        );
        Ok(discussions)
    }

    async fn notes(
        &self,
        locator: &MergeRequestLocator,
        per_page: PerPage,
        correlation_id: &str,
    ) -> Result<Vec<RawNote>, GitLabError> {
        let path = locator.notes_path();
        let notes = collect_pages(|page| {
            self.client
                .get_page("list notes", &path, page, per_page, correlation_id)
        })
        .await?;

        tracing::info!(
            project = locator.project().as_str(),
            mr = locator.iid().get(),
            notes = notes.len(),
            correlation_id,
            "fetched merge request notes"
        );
        Ok(notes)
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;

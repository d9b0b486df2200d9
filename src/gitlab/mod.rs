//! Read-only access to GitLab merge request discussions and notes.
//!
//! This module wraps reqwest to walk GitLab's paginated v4 endpoints with a
//! personal access token. Failures are mapped into classified
//! [`GitLabError`] variants so that callers can decide whether to retry and
//! what to tell the user without inspecting HTTP details.

pub mod client;
pub mod error;
mod error_mapping;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod rate_limit;

pub use client::GitLabClient;
pub use error::{ErrorKind, GitLabError};
pub use gateway::{GitLabGateway, MergeRequestGateway};
pub use locator::{MergeRequestIid, MergeRequestLocator, PersonalAccessToken, ProjectPath};
pub use models::{RawDiscussion, RawNote, RawPosition, RawUser};
pub use pagination::{PageInfo, PerPage};
pub use rate_limit::RateLimitInfo;

#[cfg(test)]
pub use gateway::MockMergeRequestGateway;

//! Inclusion filters and chronological ordering.
//!
//! Filters are AND-composed boolean predicates. Surviving comments are
//! sorted by `created_at` with a stable sort, so equal timestamps keep their
//! input order. Timestamps that do not parse as RFC 3339 sort after every
//! parseable one, again keeping their relative order.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::gitlab::error::GitLabError;

use super::model::Comment;

/// Which resolution states to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolutionFilter {
    /// Keep every comment.
    #[default]
    Any,
    /// Keep resolvable comments that are resolved.
    OnlyResolved,
    /// Keep resolvable comments that are not yet resolved.
    OnlyUnresolved,
}

/// Filter options for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Keep automated system events.
    pub include_system: bool,
    /// Resolution predicate.
    pub resolution: ResolutionFilter,
}

impl FilterOptions {
    /// Builds options from the three tool flags.
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError::Validation`] when both `only_resolved` and
    /// `only_unresolved` are set.
    pub fn from_flags(
        include_system: bool,
        only_resolved: bool,
        only_unresolved: bool,
    ) -> Result<Self, GitLabError> {
        let resolution = match (only_resolved, only_unresolved) {
            (true, true) => {
                return Err(GitLabError::validation(
                    "onlyResolved and onlyUnresolved cannot both be true",
                ));
            }
            (true, false) => ResolutionFilter::OnlyResolved,
            (false, true) => ResolutionFilter::OnlyUnresolved,
            (false, false) => ResolutionFilter::Any,
        };
        Ok(Self {
            include_system,
            resolution,
        })
    }

    /// Returns true when `comment` passes every predicate.
    #[must_use]
    pub const fn accepts(&self, comment: &Comment) -> bool {
        if comment.system && !self.include_system {
            return false;
        }
        match self.resolution {
            ResolutionFilter::Any => true,
            ResolutionFilter::OnlyResolved => {
                comment.resolvable && matches!(comment.resolved, Some(true))
            }
            ResolutionFilter::OnlyUnresolved => {
                comment.resolvable && matches!(comment.resolved, Some(false))
            }
        }
    }
}

/// Returns the comments that pass `options`, oldest first.
///
/// The input slice is left untouched.
#[must_use]
pub fn filter_and_sort(comments: &[Comment], options: &FilterOptions) -> Vec<Comment> {
    let mut keyed: Vec<(Option<DateTime<Utc>>, &Comment)> = comments
        .iter()
        .filter(|comment| options.accepts(comment))
        .map(|comment| (comment.created_instant(), comment))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_instants(a.as_ref(), b.as_ref()));

    keyed.into_iter().map(|(_, comment)| comment.clone()).collect()
}

/// Compares two optional instants, sorting `None` after `Some`.
fn compare_instants(a: Option<&DateTime<Utc>>, b: Option<&DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a_val), Some(b_val)) => a_val.cmp(b_val),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

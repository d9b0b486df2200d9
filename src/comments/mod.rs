//! Comment normalization, filtering, and digest rendering.
//!
//! Raw discussions and notes are flattened into one [`Comment`] model, then
//! filtered and sorted chronologically, and finally rendered as a Markdown
//! digest when requested. Everything here is pure apart from the injected
//! [`Clock`].

pub mod clock;
pub mod digest;
pub mod filter;
pub mod model;
pub mod normalize;

pub use clock::{Clock, SystemClock};
pub use digest::{DigestContext, render_digest};
pub use filter::{FilterOptions, ResolutionFilter, filter_and_sort};
pub use model::{Comment, CommentAuthor, CommentSource, DiffPosition};
pub use normalize::normalize_comments;

#[cfg(any(test, feature = "test-support"))]
pub use clock::FixedClock;

//! # Reader Trait
//!
//! The `Reader` trait is the seam between the fetch machine and whatever actually
//! performs the read (an HTTP GET, a file load, a mock in tests). The machine treats
//! a read as an opaque asynchronous operation: it hands over a resource locator and
//! waits for either a payload or a failure.
//!
//! # Associated Types
//! - `Resource`: the locator. Compared by value to decide whether a new attempt is needed.
//! - `Output`: the decoded payload published on success.
//! - `Error`: the failure published on error. Transport, status and decode failures
//!   are all expected to surface through this single type.

use async_trait::async_trait;
use std::fmt::{Debug, Display};

#[async_trait]
pub trait Reader: Send + Sync + 'static {
    /// The locator of the thing to read (e.g. a URL string).
    type Resource: Clone + PartialEq + Send + Sync + Debug + Display + 'static;

    /// The payload produced by a successful read.
    type Output: Clone + Send + Sync + Debug + 'static;

    /// The failure produced by an unsuccessful read.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Performs one read of `resource`.
    ///
    /// Called exactly once per attempt. Implementations should not retry.
    async fn read(&self, resource: &Self::Resource) -> Result<Self::Output, Self::Error>;
}

/// The snapshot type published for a given reader.
pub type SnapshotOf<R> = crate::state::FetchSnapshot<
    <R as Reader>::Resource,
    <R as Reader>::Output,
    <R as Reader>::Error,
>;

/// The state type published for a given reader.
pub type StateOf<R> = crate::state::FetchState<<R as Reader>::Output, <R as Reader>::Error>;

//! Reference data provider boundary
//!
//! The engine never talks to the remote source directly; it goes through
//! [`ReferenceDataProvider`], one async fetch per entity type, optionally
//! scoped to a parent id. Results come back ordered by name; an empty list
//! is a valid answer and distinct from an error.

pub mod http;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::levels::FilterLevel;
use crate::model::ReferenceOption;

/// A single reference list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceQuery {
    /// Which entity type to fetch.
    pub level: FilterLevel,
    /// Optional scoping parent id (e.g. projects for one manager).
    pub scope_id: Option<String>,
}

impl ReferenceQuery {
    /// Unscoped fetch of the full list for `level`.
    pub fn root(level: FilterLevel) -> Self {
        Self {
            level,
            scope_id: None,
        }
    }

    /// Fetch of `level` scoped to a parent id.
    pub fn scoped(level: FilterLevel, scope_id: impl Into<String>) -> Self {
        Self {
            level,
            scope_id: Some(scope_id.into()),
        }
    }
}

/// Remote source of id/name reference rows.
///
/// Implementations must be idempotent in effect: fetching the same query
/// twice may hit the wire twice but must describe the same logical list.
/// No partial or streamed results: a query either yields the whole list
/// or fails.
#[async_trait]
pub trait ReferenceDataProvider: Send + Sync {
    async fn fetch(&self, query: ReferenceQuery) -> Result<Vec<ReferenceOption>, ProviderError>;
}

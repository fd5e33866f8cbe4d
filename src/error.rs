//! Error taxonomy for the filter engine
//!
//! Nothing in this crate throws across the engine's public boundary: fetch
//! errors are caught at the loader and converted into retained state plus a
//! [`LoadFailure`] signal for external presentation.

use thiserror::Error;

use crate::levels::FilterLevel;

/// Failure surfaced by a reference data provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The request never produced a usable response (connection, timeout,
    /// malformed body).
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The provider answered but refused or failed the query.
    #[error("query failed: {message}")]
    Query { message: String },
}

impl ProviderError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Payload delivered to failure subscribers when a current load fails.
///
/// Stale-result discards are normal operation and are never signalled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub level: FilterLevel,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::transport("connection refused");
        assert_eq!(err.to_string(), "transport error: connection refused");
        let err = ProviderError::query("relation does not exist");
        assert_eq!(err.to_string(), "query failed: relation does not exist");
    }
}

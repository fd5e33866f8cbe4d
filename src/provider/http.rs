//! HTTP reference data provider
//!
//! Thin reqwest client over the reporting backend's reference endpoints:
//! `GET {base}/reference/{level}?scope_id=…&order_by=name` returning a JSON
//! array of `{id, name, parent_id?, department_id?}` rows.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{ReferenceDataProvider, ReferenceQuery};
use crate::error::ProviderError;
use crate::model::ReferenceOption;

const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Reference data provider backed by the reporting backend's REST API.
pub struct HttpReferenceProvider {
    http: Client,
    base_url: String,
}

impl HttpReferenceProvider {
    /// Create a provider for the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build the endpoint URL for a query.
    fn endpoint(&self, query: &ReferenceQuery) -> Result<Url, ProviderError> {
        let raw = format!("{}/reference/{}", self.base_url, query.level.as_str());
        let mut url = Url::parse(&raw).map_err(|err| {
            ProviderError::transport(format!("invalid endpoint url '{raw}': {err}"))
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(scope_id) = &query.scope_id {
                pairs.append_pair("scope_id", scope_id);
            }
            pairs.append_pair("order_by", "name");
        }
        Ok(url)
    }
}

#[async_trait]
impl ReferenceDataProvider for HttpReferenceProvider {
    async fn fetch(&self, query: ReferenceQuery) -> Result<Vec<ReferenceOption>, ProviderError> {
        let url = self.endpoint(&query)?;

        let response = self
            .http
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| ProviderError::transport(format!("GET {url} failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::query(format!(
                "{} returned {}: {}",
                query.level,
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response.json::<Vec<ReferenceOption>>().await.map_err(|err| {
            ProviderError::query(format!("malformed {} response: {err}", query.level))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::FilterLevel;

    #[test]
    fn test_endpoint_for_root_query() {
        let provider = HttpReferenceProvider::new("https://reports.local/api/").unwrap();
        let url = provider
            .endpoint(&ReferenceQuery::root(FilterLevel::Manager))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://reports.local/api/reference/manager?order_by=name"
        );
    }

    #[test]
    fn test_endpoint_for_scoped_query() {
        let provider = HttpReferenceProvider::new("https://reports.local/api").unwrap();
        let url = provider
            .endpoint(&ReferenceQuery::scoped(FilterLevel::Stage, "proj 7"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://reports.local/api/reference/stage?scope_id=proj+7&order_by=name"
        );
    }
}

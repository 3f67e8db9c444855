use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::app::{SearchError, SearchTransport};
use crate::config::SearchSettings;
use crate::models::{Preferences, Product, SearchResponse};

/// Search transport talking to the catalog search API
///
/// Issues `GET {endpoint}/search` with the preferences as query parameters.
/// No retries; a failed request is reported as is.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: String,
    client: Client,
}

impl HttpTransport {
    /// Create a new transport
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn from_settings(settings: &SearchSettings) -> Result<Self, SearchError> {
        Self::new(settings.endpoint.clone(), Duration::from_secs(settings.timeout_secs))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.endpoint.trim_end_matches('/'))
    }
}

/// Query pairs for a search request
fn query_params(preferences: &Preferences) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("lat", preferences.origin.lat.to_string()),
        ("lng", preferences.origin.lng.to_string()),
        ("radius", preferences.radius_meters.to_string()),
        ("count", preferences.result_count.to_string()),
    ];
    if !preferences.tags.is_empty() {
        params.push(("tags", preferences.tags.join(",")));
    }
    params
}

#[async_trait(?Send)]
impl SearchTransport for HttpTransport {
    async fn search(&self, preferences: Preferences) -> Result<Vec<Product>, SearchError> {
        let url = self.search_url();
        tracing::debug!("Searching {}", url);

        let response = self
            .client
            .get(&url)
            .query(&query_params(&preferences))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Search request failed: {} - {}", status, body);
            return Err(SearchError::Api(format!("Search failed: {}", status)));
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| SearchError::InvalidResponse(format!("Failed to parse products: {}", e)))?;

        Ok(parsed.products)
    }
}

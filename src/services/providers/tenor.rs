/// Tenor v2 search provider
///
/// Fetches a single illustrative media URL per query. Absence of results is
/// not an error; the caller simply renders no media line.
use crate::{
    error::{AppError, AppResult},
    services::providers::MediaSearcher,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    media_formats: HashMap<String, MediaFormat>,
}

#[derive(Debug, Deserialize)]
struct MediaFormat {
    url: String,
}

#[derive(Clone)]
pub struct TenorSearcher {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TenorSearcher {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl MediaSearcher for TenorSearcher {
    async fn search(&self, query: &str) -> AppResult<Option<String>> {
        let url = format!("{}/v2/search", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("q", query),
                ("key", self.api_key.as_str()),
                ("limit", "1"),
                ("media_filter", "minimal"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Media search API returned status {}: {}",
                status, body
            )));
        }

        let search: SearchResponse = response.json().await?;

        let media_url = search
            .results
            .first()
            .and_then(|result| result.media_formats.get("gif"))
            .map(|format| format.url.clone());

        tracing::debug!(
            query = %query,
            found = media_url.is_some(),
            provider = "tenor",
            "Media search completed"
        );

        Ok(media_url)
    }
}

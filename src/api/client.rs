use anyhow::{Context, Result, bail};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ApiError;
use super::models::*;

#[derive(Clone)]
pub struct FilmClient {
    client: Client,
    base_url: Url,
    base_display: String,
}

impl FilmClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            bail!("API base URL must start with http:// or https://: {}", base_url);
        }

        let parsed = Url::parse(trimmed)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;

        let client = Client::builder()
            .user_agent("filmdeck")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: parsed,
            base_display: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_display
    }

    /// Interactive API documentation served by the backend.
    pub fn docs_url(&self) -> String {
        docs_url(&self.base_display)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::request("Invalid API base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, &self.base_display))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.bytes().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        Ok(resp)
    }

    async fn decode<T: DeserializeOwned>(&self, resp: Response) -> Result<T, ApiError> {
        let body = resp
            .bytes()
            .await
            .map_err(|e| ApiError::from_transport(e, &self.base_display))?;
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::request(format!("Unexpected response from server: {e}")))
    }

    pub async fn list_films(&self, query: &ListQuery) -> Result<FilmPage, ApiError> {
        let url = self.endpoint(&["films"])?;
        debug!(page = query.page, sort_by = ?query.sort_by, order = %query.sort_order, "Listing films");
        let resp = self.send(self.client.get(url).query(query)).await?;
        let page: FilmPage = self.decode(resp).await?;
        debug!(count = page.items.len(), total = page.total, "Fetched film page");
        Ok(page)
    }

    /// `None` when the server answers with an empty (`null`) body.
    pub async fn get_film(&self, id: i64) -> Result<Option<Film>, ApiError> {
        let url = self.endpoint(&["films", &id.to_string()])?;
        debug!(id, "Fetching film");
        let resp = self.send(self.client.get(url)).await?;
        self.decode(resp).await
    }

    pub async fn create_film(&self, payload: &FilmPayload) -> Result<Film, ApiError> {
        let url = self.endpoint(&["films"])?;
        debug!(title = %payload.title, "Creating film");
        let resp = self.send(self.client.post(url).json(payload)).await?;
        self.decode(resp).await
    }

    pub async fn update_film(&self, id: i64, payload: &FilmPayload) -> Result<Film, ApiError> {
        let url = self.endpoint(&["films", &id.to_string()])?;
        debug!(id, "Updating film");
        let resp = self.send(self.client.put(url).json(payload)).await?;
        self.decode(resp).await
    }

    pub async fn delete_film(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&["films", &id.to_string()])?;
        debug!(id, "Deleting film");
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    pub async fn search_films(&self, query: &str, page: u32, size: u32) -> Result<FilmPage, ApiError> {
        let url = self.endpoint(&["films", "search", query])?;
        debug!(query, page, "Searching films by title");
        let resp = self
            .send(self.client.get(url).query(&[("page", page), ("size", size)]))
            .await?;
        self.decode(resp).await
    }

    pub async fn fetch_stats(&self) -> Result<FilmStats, ApiError> {
        let url = self.endpoint(&["films", "stats", "overview"])?;
        debug!("Fetching catalog stats");
        let resp = self.send(self.client.get(url)).await?;
        self.decode(resp).await
    }
}

/// Docs page for an API base URL without a trailing slash.
pub fn docs_url(base_url: &str) -> String {
    format!("{base_url}/docs")
}

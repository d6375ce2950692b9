//! Google Books client (primary catalog)

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{endpoint_url, CatalogClient, CatalogError};
use crate::{
    config::CatalogConfig,
    models::{book::non_blank, BookSource, NormalizedBook, SearchPage},
};

/// Largest page the volumes endpoint accepts
pub const MAX_RESULTS_LIMIT: u32 = 40;

/// `GET /volumes` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub items: Vec<Volume>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: String,
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub industry_identifiers: Vec<IndustryIdentifier>,
    pub page_count: Option<u32>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub image_links: Option<ImageLinks>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
    pub small_thumbnail: Option<String>,
}

/// Map a volume into the canonical record
pub fn normalize_volume(volume: Volume) -> NormalizedBook {
    let info = volume.volume_info;
    let isbn = pick_isbn(&info.industry_identifiers);
    let thumbnail_url = info
        .image_links
        .and_then(|links| non_blank(links.thumbnail).or(non_blank(links.small_thumbnail)))
        .map(|url| force_https(&url));

    let mut book = NormalizedBook::new(volume.id, BookSource::Google)
        .with_title(info.title)
        .with_authors(info.authors)
        .with_categories(info.categories);
    book.published_date = non_blank(info.published_date);
    book.description = non_blank(info.description);
    book.thumbnail_url = thumbnail_url;
    book.page_count = info.page_count.filter(|&count| count > 0);
    book.language = non_blank(info.language);
    book.isbn = isbn;
    book.publisher = non_blank(info.publisher);
    book
}

/// Map a volumes listing into a search page
pub fn normalize_volumes(response: VolumesResponse) -> SearchPage {
    SearchPage {
        books: response.items.into_iter().map(normalize_volume).collect(),
        total_items: response.total_items,
        source: BookSource::Google,
    }
}

/// ISBN-13 when present, otherwise ISBN-10
fn pick_isbn(identifiers: &[IndustryIdentifier]) -> Option<String> {
    ["ISBN_13", "ISBN_10"].iter().find_map(|kind| {
        identifiers
            .iter()
            .find(|id| id.kind == *kind)
            .map(|id| id.identifier.clone())
    })
}

fn force_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

/// Google Books API client
pub struct GoogleBooksClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.google_books_url.trim_end_matches('/').to_string(),
            api_key: config.google_books_api_key.clone(),
        })
    }

    fn api_key(&self) -> Result<&str, CatalogError> {
        self.api_key.as_deref().ok_or(CatalogError::NotConfigured)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: reqwest::Url,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let response = self.http_client.get(url.clone()).query(params).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[async_trait]
impl CatalogClient for GoogleBooksClient {
    async fn search(&self, query: &str, offset: u32, limit: u32) -> Result<SearchPage, CatalogError> {
        let key = self.api_key()?;
        let url = endpoint_url(&self.base_url, ["volumes"])?;
        tracing::debug!(query = %query, offset, limit, "Querying Google Books");

        let params = [
            ("q", query.to_string()),
            ("startIndex", offset.to_string()),
            ("maxResults", limit.min(MAX_RESULTS_LIMIT).to_string()),
            ("key", key.to_string()),
        ];
        let response: VolumesResponse = self.get_json(url, &params).await?;
        Ok(normalize_volumes(response))
    }

    async fn get_book(&self, id: &str) -> Result<NormalizedBook, CatalogError> {
        let key = self.api_key()?;
        let url = endpoint_url(&self.base_url, ["volumes", id])?;
        tracing::debug!(id = %id, "Looking up Google Books volume");

        let volume: Volume = self.get_json(url, &[("key", key.to_string())]).await?;
        Ok(normalize_volume(volume))
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

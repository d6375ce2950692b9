//! Open Library client (secondary catalog)
//!
//! Search goes through `search.json`; single lookups use the hierarchical
//! work resource (`/works/{id}.json`), whose authors are only references and
//! are resolved through `/authors/{key}.json`.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

use super::{endpoint_url, CatalogClient, CatalogError};
use crate::{
    config::CatalogConfig,
    models::{book::non_blank, BookSource, NormalizedBook, SearchPage},
};

/// Authors resolved per work lookup
const MAX_AUTHOR_LOOKUPS: usize = 3;

/// `GET /search.json` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchDoc {
    pub key: String,
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Vec<String>,
    pub first_publish_year: Option<i32>,
    pub cover_i: Option<i64>,
    #[serde(default)]
    pub subject: Vec<String>,
    pub number_of_pages_median: Option<u32>,
    #[serde(default)]
    pub language: Vec<String>,
    #[serde(default)]
    pub isbn: Vec<String>,
    #[serde(default)]
    pub publisher: Vec<String>,
}

/// `GET /works/{id}.json` response
#[derive(Debug, Clone, Deserialize)]
pub struct Work {
    pub key: String,
    pub title: Option<String>,
    pub description: Option<TextValue>,
    #[serde(default)]
    pub covers: Vec<i64>,
    #[serde(default)]
    pub subjects: Vec<String>,
    pub first_publish_date: Option<String>,
    #[serde(default)]
    pub authors: Vec<WorkAuthor>,
}

/// Text fields appear either bare or wrapped as `{"type": ..., "value": ...}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Plain(String),
    Typed { value: String },
}

impl TextValue {
    pub fn into_string(self) -> String {
        match self {
            TextValue::Plain(text) | TextValue::Typed { value: text } => text,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkAuthor {
    pub author: Option<KeyRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyRef {
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub name: Option<String>,
}

/// Last path segment of an Open Library key (`/works/OL45883W` -> `OL45883W`)
pub fn key_to_id(key: &str) -> String {
    key.rsplit('/').next().unwrap_or(key).to_string()
}

fn cover_url(covers_base: &str, cover_id: i64) -> Option<String> {
    // Negative ids mark removed covers
    (cover_id > 0).then(|| format!("{}/b/id/{}-M.jpg", covers_base, cover_id))
}

/// Map a search document into the canonical record
pub fn normalize_search_doc(doc: SearchDoc, covers_base: &str) -> NormalizedBook {
    let mut book = NormalizedBook::new(key_to_id(&doc.key), BookSource::OpenLibrary)
        .with_title(doc.title)
        .with_authors(doc.author_name)
        .with_categories(doc.subject);
    book.published_date = doc.first_publish_year.map(|year| year.to_string());
    book.thumbnail_url = doc.cover_i.and_then(|id| cover_url(covers_base, id));
    book.page_count = doc.number_of_pages_median.filter(|&count| count > 0);
    book.language = doc.language.into_iter().next();
    book.isbn = doc.isbn.into_iter().next();
    book.publisher = doc.publisher.into_iter().next();
    book
}

/// Map a search response into a search page
pub fn normalize_search(response: SearchResponse, covers_base: &str) -> SearchPage {
    SearchPage {
        books: response
            .docs
            .into_iter()
            .map(|doc| normalize_search_doc(doc, covers_base))
            .collect(),
        total_items: response.num_found,
        source: BookSource::OpenLibrary,
    }
}

/// Map a work plus its resolved author names into the canonical record
pub fn normalize_work(work: Work, author_names: Vec<String>, covers_base: &str) -> NormalizedBook {
    let mut book = NormalizedBook::new(key_to_id(&work.key), BookSource::OpenLibrary)
        .with_title(work.title)
        .with_authors(author_names)
        .with_categories(work.subjects);
    book.description = non_blank(work.description.map(TextValue::into_string));
    book.published_date = non_blank(work.first_publish_date);
    book.thumbnail_url = work
        .covers
        .into_iter()
        .find_map(|id| cover_url(covers_base, id));
    book
}

/// Open Library API client
pub struct OpenLibraryClient {
    http_client: reqwest::Client,
    base_url: String,
    covers_url: String,
    request_timeout: Duration,
}

impl OpenLibraryClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let request_timeout = Duration::from_secs(config.request_timeout_secs);
        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.open_library_url.trim_end_matches('/').to_string(),
            covers_url: config.open_library_covers_url.trim_end_matches('/').to_string(),
            request_timeout,
        })
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

    /// `/authors/OL1A` becomes `{base}/authors/OL1A.json`, one path segment per key part
    fn author_url(&self, key: &str) -> Result<reqwest::Url, CatalogError> {
        let mut segments: Vec<String> = key
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        match segments.last_mut() {
            Some(last) => last.push_str(".json"),
            None => return Err(CatalogError::InvalidUrl(key.to_string())),
        }
        endpoint_url(&self.base_url, segments)
    }

    /// Best effort: names resolved before `deadline` are kept, the rest are dropped
    async fn resolve_author_names(&self, authors: &[WorkAuthor], deadline: Instant) -> Vec<String> {
        let mut names = Vec::new();
        let keys = authors
            .iter()
            .filter_map(|a| a.author.as_ref())
            .take(MAX_AUTHOR_LOOKUPS);

        for key_ref in keys {
            let url = match self.author_url(&key_ref.key) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Skipping author {}: {}", key_ref.key, e);
                    continue;
                }
            };
            match timeout_at(deadline, self.get_json::<Author>(url, &[])).await {
                Ok(Ok(author)) => names.extend(non_blank(author.name)),
                Ok(Err(e)) => tracing::debug!("Skipping author {}: {}", key_ref.key, e),
                Err(_) => {
                    tracing::debug!("Author lookup deadline reached after {} names", names.len());
                    break;
                }
            }
        }
        names
    }
}

#[async_trait]
impl CatalogClient for OpenLibraryClient {
    async fn search(&self, query: &str, offset: u32, limit: u32) -> Result<SearchPage, CatalogError> {
        let url = endpoint_url(&self.base_url, ["search.json"])?;
        tracing::debug!(query = %query, offset, limit, "Querying Open Library");

        let params = [
            ("q", query.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        let response: SearchResponse = self.get_json(url, &params).await?;
        Ok(normalize_search(response, &self.covers_url))
    }

    /// The work fetch and its author lookups share one request timeout
    async fn get_book(&self, id: &str) -> Result<NormalizedBook, CatalogError> {
        let file_name = format!("{}.json", id);
        let url = endpoint_url(&self.base_url, ["works", file_name.as_str()])?;
        tracing::debug!(id = %id, "Looking up Open Library work");

        let deadline = Instant::now() + self.request_timeout;
        let work: Work = timeout_at(deadline, self.get_json(url, &[]))
            .await
            .map_err(|_| CatalogError::Timeout)??;
        let author_names = self.resolve_author_names(&work.authors, deadline).await;
        Ok(normalize_work(work, author_names, &self.covers_url))
    }
}

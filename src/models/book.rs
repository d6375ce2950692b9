//! Normalized book record and catalog result types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Title used when an upstream record carries none
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Sole author used when an upstream record lists none
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
/// Upper bound on categories kept per book
pub const MAX_CATEGORIES: usize = 5;

/// Which catalog answered a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookSource {
    /// Google Books (primary, credentialed)
    Google,
    /// Open Library (secondary, fallback)
    OpenLibrary,
}

impl std::fmt::Display for BookSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookSource::Google => write!(f, "google"),
            BookSource::OpenLibrary => write!(f, "openlibrary"),
        }
    }
}

/// Canonical book record shared by both catalogs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedBook {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub categories: Vec<String>,
    pub page_count: Option<u32>,
    pub language: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub source: BookSource,
}

impl NormalizedBook {
    /// Start a record with sentinel title/author; normalizers fill in the rest
    pub fn new(id: impl Into<String>, source: BookSource) -> Self {
        Self {
            id: id.into(),
            title: UNKNOWN_TITLE.to_string(),
            authors: vec![UNKNOWN_AUTHOR.to_string()],
            published_date: None,
            description: None,
            thumbnail_url: None,
            categories: Vec::new(),
            page_count: None,
            language: None,
            isbn: None,
            publisher: None,
            source,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        if let Some(title) = non_blank(title) {
            self.title = title;
        }
        self
    }

    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        let authors: Vec<String> = authors
            .into_iter()
            .filter_map(|a| non_blank(Some(a)))
            .collect();
        if !authors.is_empty() {
            self.authors = authors;
        }
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories.into_iter().take(MAX_CATEGORIES).collect();
        self
    }
}

/// Drop empty or whitespace-only strings
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// One page of search results as returned by a catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub books: Vec<NormalizedBook>,
    /// Raw hit count reported upstream; page counts are derived from it on read
    pub total_items: u64,
    pub source: BookSource,
}

impl SearchPage {
    /// Number of pages of `page_size` needed to cover `total_items`
    pub fn total_pages(&self, page_size: u32) -> u64 {
        if page_size == 0 {
            return 0;
        }
        self.total_items.div_ceil(u64::from(page_size))
    }
}

/// Result of a single-book lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookLookup {
    pub book: NormalizedBook,
    pub source: BookSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_applied() {
        let book = NormalizedBook::new("x", BookSource::Google)
            .with_title(Some("   ".to_string()))
            .with_authors(vec![String::new()]);
        assert_eq!(book.title, UNKNOWN_TITLE);
        assert_eq!(book.authors, vec![UNKNOWN_AUTHOR.to_string()]);
    }

    #[test]
    fn test_categories_truncated() {
        let categories = (0..8).map(|i| format!("c{}", i)).collect();
        let book = NormalizedBook::new("x", BookSource::OpenLibrary).with_categories(categories);
        assert_eq!(book.categories.len(), MAX_CATEGORIES);
        assert_eq!(book.categories[4], "c4");
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let mut page = SearchPage {
            books: Vec::new(),
            total_items: 21,
            source: BookSource::Google,
        };
        assert_eq!(page.total_pages(10), 3);
        page.total_items = 20;
        assert_eq!(page.total_pages(10), 2);
        page.total_items = 0;
        assert_eq!(page.total_pages(10), 0);
    }

    #[test]
    fn test_source_serialization() {
        assert_eq!(serde_json::to_string(&BookSource::Google).unwrap(), "\"google\"");
        assert_eq!(
            serde_json::to_string(&BookSource::OpenLibrary).unwrap(),
            "\"openlibrary\""
        );
    }

    #[test]
    fn test_camel_case_fields() {
        let book = NormalizedBook::new("abc", BookSource::Google);
        let json = serde_json::to_value(&book).unwrap();
        assert!(json.get("publishedDate").is_some());
        assert!(json.get("thumbnailUrl").is_some());
        assert!(json.get("pageCount").is_some());
    }
}

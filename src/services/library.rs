//! Personal library ledger: owned books and active borrows
//!
//! State lives in memory only and is lost on restart.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::fetcher::CatalogFetcher;
use crate::{
    error::{AppError, AppResult},
    models::{BorrowRecord, NormalizedBook},
};

#[derive(Default)]
struct Ledger {
    /// Owned books keyed by identifier, in insertion order
    books: IndexMap<String, NormalizedBook>,
    /// At most one active borrow per owned book
    borrowed: IndexMap<String, BorrowRecord>,
}

#[derive(Clone)]
pub struct LibraryService {
    ledger: Arc<RwLock<Ledger>>,
    fetcher: CatalogFetcher,
}

impl LibraryService {
    pub fn new(fetcher: CatalogFetcher) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(Ledger::default())),
            fetcher,
        }
    }

    /// All owned books
    pub async fn list_books(&self) -> Vec<NormalizedBook> {
        self.ledger.read().await.books.values().cloned().collect()
    }

    /// All active borrows
    pub async fn list_borrowed(&self) -> Vec<BorrowRecord> {
        self.ledger.read().await.borrowed.values().cloned().collect()
    }

    /// Number of owned books and active borrows
    pub async fn counts(&self) -> (usize, usize) {
        let ledger = self.ledger.read().await;
        (ledger.books.len(), ledger.borrowed.len())
    }

    /// Resolve a book through the catalogs and add it to the library
    pub async fn add(&self, book_id: &str) -> AppResult<NormalizedBook> {
        if self.ledger.read().await.books.contains_key(book_id) {
            return Err(AppError::Conflict(format!("Book {} is already in the library", book_id)));
        }

        // Resolved straight from the catalogs, not the search cache
        let lookup = self.fetcher.get_book(book_id).await?;
        let mut book = lookup.book;
        book.id = book_id.to_string();

        // Another add for the same id may have completed while we were fetching
        let mut ledger = self.ledger.write().await;
        if ledger.books.contains_key(book_id) {
            return Err(AppError::Conflict(format!("Book {} is already in the library", book_id)));
        }
        ledger.books.insert(book_id.to_string(), book.clone());

        tracing::info!("Added book {} ({}) from {}", book_id, book.title, lookup.source);
        Ok(book)
    }

    /// Remove a book, along with any active borrow of it
    pub async fn remove(&self, book_id: &str) -> AppResult<()> {
        let mut ledger = self.ledger.write().await;
        if ledger.books.shift_remove(book_id).is_none() {
            return Err(AppError::NotFound(format!("Book {} is not in the library", book_id)));
        }
        if ledger.borrowed.shift_remove(book_id).is_some() {
            tracing::info!("Removed active borrow of book {}", book_id);
        }

        tracing::info!("Removed book {} from library", book_id);
        Ok(())
    }

    /// Borrow an owned book for the standard loan period
    pub async fn borrow(&self, book_id: &str) -> AppResult<BorrowRecord> {
        self.borrow_at(book_id, Utc::now()).await
    }

    async fn borrow_at(&self, book_id: &str, now: DateTime<Utc>) -> AppResult<BorrowRecord> {
        let mut ledger = self.ledger.write().await;
        if !ledger.books.contains_key(book_id) {
            return Err(AppError::NotFound(format!("Book {} is not in the library", book_id)));
        }
        if ledger.borrowed.contains_key(book_id) {
            return Err(AppError::Conflict(format!("Book {} is already borrowed", book_id)));
        }

        let record = BorrowRecord::new(book_id, now);
        ledger.borrowed.insert(book_id.to_string(), record.clone());

        tracing::info!("Borrowed book {} until {}", book_id, record.due_date);
        Ok(record)
    }

    /// End the active borrow of a book
    pub async fn return_book(&self, book_id: &str) -> AppResult<BorrowRecord> {
        let mut ledger = self.ledger.write().await;
        let record = ledger
            .borrowed
            .shift_remove(book_id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} is not borrowed", book_id)))?;

        if record.is_overdue(Utc::now()) {
            tracing::info!("Book {} returned after its due date {}", book_id, record.due_date);
        } else {
            tracing::info!("Book {} returned", book_id);
        }
        Ok(record)
    }
}

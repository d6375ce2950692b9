//! Data models for Shelfwise

pub mod book;
pub mod library;

// Re-export commonly used types
pub use book::{BookLookup, BookSource, NormalizedBook, SearchPage};
pub use library::{BookIdRequest, BorrowRecord, MessageResponse};

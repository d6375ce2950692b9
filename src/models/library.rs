//! Library and borrow models

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::error::AppResult;

/// Loan period applied to every borrow
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Active borrow of a book held in the library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    pub book_id: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

impl BorrowRecord {
    pub fn new(book_id: impl Into<String>, borrow_date: DateTime<Utc>) -> Self {
        Self {
            book_id: book_id.into(),
            borrow_date,
            due_date: borrow_date + Duration::days(LOAN_PERIOD_DAYS),
        }
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        now > self.due_date
    }
}

/// Request body naming a book by identifier
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookIdRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub book_id: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::from("bookId is required")));
    }
    Ok(())
}

impl BookIdRequest {
    /// Validated, trimmed identifier
    pub fn into_book_id(self) -> AppResult<String> {
        self.validate()?;
        Ok(self.book_id.trim().to_string())
    }
}

/// Plain confirmation body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

//! Shelfwise
//!
//! A REST JSON server for searching books across two upstream catalogs
//! (Google Books first, Open Library as fallback) and keeping a personal,
//! in-memory library with borrow tracking.

use std::sync::Arc;

pub mod api;
pub mod catalogs;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(config: AppConfig, services: services::Services) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}

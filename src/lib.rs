//! Bestseller Shelf library
//!
//! Browse the current bestseller lists, save books to a personal list, rate
//! and review them, and follow other readers.

pub mod api;
pub mod auth;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod forms;
pub mod models;
pub mod routes;
pub mod security;
pub mod session;
pub mod views;

pub use config::Config;
pub use error::{AppError, Result};

use sqlx::SqlitePool;
use std::sync::Arc;

use api::BookSource;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    /// Bestseller data, the live API client outside of tests
    pub books: Arc<dyn BookSource>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config, books: Arc<dyn BookSource>) -> Self {
        Self {
            pool,
            config,
            books,
        }
    }
}

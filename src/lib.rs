//! Library circulation server
//!
//! Book inventory, student registry and borrow/return transactions over a
//! REST JSON API, backed by a PostgreSQL table store.

use std::sync::Arc;

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
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
    pub fn new(config: AppConfig, store: repository::SharedStore) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(store)),
        }
    }
}

//! Library summary service

use crate::{error::AppResult, models::LibrarySummary, repository::SharedStore};

#[derive(Clone)]
pub struct StatsService {
    store: SharedStore,
}

impl StatsService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn summary(&self) -> AppResult<LibrarySummary> {
        self.store.summary().await
    }
}

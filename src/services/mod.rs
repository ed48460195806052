//! Business logic services

pub mod catalog;
pub mod circulation;
pub mod stats;
pub mod students;

use crate::{
    error::{AppError, AppResult},
    repository::SharedStore,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub students: students::StudentService,
    pub circulation: circulation::CirculationService,
    pub stats: stats::StatsService,
    store: SharedStore,
}

impl Services {
    /// Create all services on top of the given store handle
    pub fn new(store: SharedStore) -> Self {
        Self {
            catalog: catalog::CatalogService::new(store.clone()),
            students: students::StudentService::new(store.clone()),
            circulation: circulation::CirculationService::new(store.clone()),
            stats: stats::StatsService::new(store.clone()),
            store,
        }
    }

    /// Check that the store is reachable
    pub async fn ready(&self) -> AppResult<()> {
        self.store.ping().await
    }

    /// Release the store handle
    pub async fn shutdown(&self) {
        self.store.close().await;
    }
}

/// Trim a required text field, rejecting blank values
pub(crate) fn required_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field, mapping blank values to `None`
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("Title", "  Dune ").unwrap(), "Dune");
        assert!(matches!(required_text("Title", "   "), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(Some(" 978-0441013593 ")), Some("978-0441013593".to_string()));
        assert_eq!(optional_text(Some("  ")), None);
        assert_eq!(optional_text(None), None);
    }
}

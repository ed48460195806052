//! Library summary figures

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Inventory and circulation totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LibrarySummary {
    /// Number of distinct books
    pub titles: i64,
    pub total_copies: i64,
    pub available_copies: i64,
    pub students: i64,
    /// Records still in status `borrowed`
    pub active_loans: i64,
}

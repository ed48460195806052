//! Borrow record (circulation) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

/// Lifecycle of a borrow record. `Borrowed -> Returned` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "borrow_status", rename_all = "lowercase")]
pub enum BorrowStatus {
    Borrowed,
    Returned,
}

impl BorrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::Borrowed => "borrowed",
            BorrowStatus::Returned => "returned",
        }
    }
}

impl fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BorrowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "borrowed" => Ok(BorrowStatus::Borrowed),
            "returned" => Ok(BorrowStatus::Returned),
            other => Err(format!("Unknown borrow status '{}'", other)),
        }
    }
}

/// Borrow record row from the `borrow_records` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: i64,
    pub student_id: i64,
    pub book_id: i64,
    pub borrow_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: BorrowStatus,
}

/// Borrow request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BorrowRequest {
    pub student_id: i64,
    pub book_id: i64,
}

/// Return request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReturnRequest {
    pub record_id: i64,
}

/// Query string for listing borrow records
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BorrowRecordQuery {
    /// `borrowed` or `returned`; empty means no filter
    pub status: Option<String>,
}

impl BorrowRecordQuery {
    /// Parse the optional status filter, treating an empty value as absent
    pub fn status_filter(&self) -> Result<Option<BorrowStatus>, String> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some),
        }
    }
}

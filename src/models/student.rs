//! Student (borrower) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Student row from the `students` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Create student request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudent {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Normalized student ready to be written to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
}

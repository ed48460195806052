//! Book (inventory entry) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book row from the `books` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    /// Number of lendable copies owned by the library
    pub total_copies: i32,
    /// Copies currently on the shelf (0..=total_copies)
    pub available_copies: i32,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    pub isbn: Option<String>,
    #[validate(range(min = 1, message = "Total copies must be at least 1"))]
    pub total_copies: i32,
    /// Defaults to `total_copies` when omitted
    #[validate(range(min = 0, message = "Available copies cannot be negative"))]
    pub available_copies: Option<i32>,
}

/// Update book request (administrative edit)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: Option<String>,
    pub isbn: Option<String>,
    #[validate(range(min = 1, message = "Total copies must be at least 1"))]
    pub total_copies: Option<i32>,
    #[validate(range(min = 0, message = "Available copies cannot be negative"))]
    pub available_copies: Option<i32>,
}

/// Normalized book ready to be written to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
}

impl Book {
    /// Whether the copy counts satisfy `0 <= available <= total` with `total >= 1`
    pub fn copies_consistent(&self) -> bool {
        self.total_copies >= 1 && (0..=self.total_copies).contains(&self.available_copies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(total: i32, available: i32) -> Book {
        Book {
            id: 1,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            isbn: None,
            total_copies: total,
            available_copies: available,
        }
    }

    #[test]
    fn test_copies_consistent() {
        assert!(book(3, 0).copies_consistent());
        assert!(book(3, 3).copies_consistent());
        assert!(!book(3, 4).copies_consistent());
        assert!(!book(3, -1).copies_consistent());
        assert!(!book(0, 0).copies_consistent());
    }

    #[test]
    fn test_create_book_validation() {
        let mut data = CreateBook {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            isbn: None,
            total_copies: 1,
            available_copies: None,
        };
        assert!(data.validate().is_ok());

        data.total_copies = 0;
        let errors = data.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("total_copies"));
    }
}

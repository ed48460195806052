//! Tagged results for circulation transactions.
//!
//! Business-rule failures are values, not errors: a caller branches on
//! [`Outcome`] while store failures travel separately as `AppError`.

use serde::Serialize;
use utoipa::ToSchema;

/// Why a borrow or return was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    StudentNotFound,
    BookNotFound,
    RecordNotFound,
    NoCopiesAvailable,
    AlreadyReturned,
}

impl RejectionKind {
    pub fn message(&self) -> &'static str {
        match self {
            RejectionKind::StudentNotFound => "Student does not exist",
            RejectionKind::BookNotFound => "Book does not exist",
            RejectionKind::RecordNotFound => "Record not found",
            RejectionKind::NoCopiesAvailable => "No copies available",
            RejectionKind::AlreadyReturned => "Book already returned",
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            RejectionKind::StudentNotFound => "student_not_found",
            RejectionKind::BookNotFound => "book_not_found",
            RejectionKind::RecordNotFound => "record_not_found",
            RejectionKind::NoCopiesAvailable => "no_copies_available",
            RejectionKind::AlreadyReturned => "already_returned",
        }
    }
}

/// A refused transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Rejection {
    pub kind: RejectionKind,
    pub message: String,
}

impl From<RejectionKind> for Rejection {
    fn from(kind: RejectionKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
        }
    }
}

/// Result of a borrow or return transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Completed { message: String, value: T },
    Rejected(Rejection),
}

impl<T> Outcome<T> {
    pub fn completed(message: impl Into<String>, value: T) -> Self {
        Outcome::Completed {
            message: message.into(),
            value,
        }
    }

    pub fn rejected(kind: RejectionKind) -> Self {
        Outcome::Rejected(kind.into())
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed { .. })
    }

    /// Kind of rejection, if any
    pub fn rejection_kind(&self) -> Option<RejectionKind> {
        match self {
            Outcome::Completed { .. } => None,
            Outcome::Rejected(rejection) => Some(rejection.kind),
        }
    }
}

//! Data models for the circulation server

pub mod book;
pub mod borrow_record;
pub mod outcome;
pub mod stats;
pub mod student;

// Re-export commonly used types
pub use book::{Book, CreateBook, NewBook, UpdateBook};
pub use borrow_record::{BorrowRecord, BorrowStatus};
pub use outcome::{Outcome, Rejection, RejectionKind};
pub use stats::LibrarySummary;
pub use student::{CreateStudent, NewStudent, Student};

//! Repository layer: the table store behind the circulation services.
//!
//! Services never talk to a database directly. They receive a [`SharedStore`]
//! at construction time, which lets tests swap [`memory::MemoryStore`] or a
//! mock in for [`postgres::PgStore`].
//!
//! Lookups by id return `Ok(None)` on absence. Every `Err` is a transport or
//! query failure of the store itself.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    error::AppResult,
    models::{Book, BorrowRecord, BorrowStatus, LibrarySummary, NewBook, NewStudent, Student},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store handle shared by all services
pub type SharedStore = Arc<dyn LibraryStore>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// Check that the store answers queries
    async fn ping(&self) -> AppResult<()>;

    /// Release connections; the handle must not be used afterwards
    async fn close(&self);

    async fn get_book(&self, id: i64) -> AppResult<Option<Book>>;

    /// All books ordered by title
    async fn list_books(&self) -> AppResult<Vec<Book>>;

    async fn insert_book(&self, book: &NewBook) -> AppResult<Book>;

    /// Overwrite every column of an existing book
    async fn update_book(&self, id: i64, book: &NewBook) -> AppResult<Option<Book>>;

    async fn get_student(&self, id: i64) -> AppResult<Option<Student>>;

    /// All students ordered by name
    async fn list_students(&self) -> AppResult<Vec<Student>>;

    /// Fails with `AppError::Conflict` when the email is already registered
    async fn insert_student(&self, student: &NewStudent) -> AppResult<Student>;

    async fn get_borrow_record(&self, id: i64) -> AppResult<Option<BorrowRecord>>;

    /// Records ordered by borrow date, newest first
    async fn list_borrow_records(&self, status: Option<BorrowStatus>) -> AppResult<Vec<BorrowRecord>>;

    /// Atomically take one copy of `book_id` off the shelf and record the loan.
    ///
    /// Returns `Ok(None)` without writing anything when no copy is left.
    async fn checkout(
        &self,
        student_id: i64,
        book_id: i64,
        borrow_date: NaiveDate,
    ) -> AppResult<Option<BorrowRecord>>;

    /// Atomically mark a `borrowed` record as returned and put the copy back,
    /// never exceeding `total_copies`.
    ///
    /// Returns `Ok(None)` without writing anything when the record is not
    /// currently borrowed.
    async fn checkin(&self, record_id: i64, return_date: NaiveDate) -> AppResult<Option<BorrowRecord>>;

    async fn summary(&self) -> AppResult<LibrarySummary>;
}

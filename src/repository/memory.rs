//! In-process table store for tests and local runs.
//!
//! Each operation runs under one lock acquisition, so `checkout` and
//! `checkin` are atomic exactly like their SQL transactions.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use super::LibraryStore;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BorrowRecord, BorrowStatus, LibrarySummary, NewBook, NewStudent, Student},
};

#[derive(Default)]
struct Tables {
    books: BTreeMap<i64, Book>,
    students: BTreeMap<i64, Student>,
    borrow_records: BTreeMap<i64, BorrowRecord>,
    next_book_id: i64,
    next_student_id: i64,
    next_record_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// Table store kept in memory. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LibraryStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn close(&self) {}

    async fn get_book(&self, id: i64) -> AppResult<Option<Book>> {
        Ok(self.tables.read().await.books.get(&id).cloned())
    }

    async fn list_books(&self) -> AppResult<Vec<Book>> {
        let mut books: Vec<Book> = self.tables.read().await.books.values().cloned().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    async fn insert_book(&self, book: &NewBook) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        let id = Tables::next_id(&mut tables.next_book_id);
        let row = Book {
            id,
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            total_copies: book.total_copies,
            available_copies: book.available_copies,
        };
        tables.books.insert(id, row.clone());
        Ok(row)
    }

    async fn update_book(&self, id: i64, book: &NewBook) -> AppResult<Option<Book>> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.books.get_mut(&id) else {
            return Ok(None);
        };
        row.title = book.title.clone();
        row.author = book.author.clone();
        row.isbn = book.isbn.clone();
        row.total_copies = book.total_copies;
        row.available_copies = book.available_copies;
        Ok(Some(row.clone()))
    }

    async fn get_student(&self, id: i64) -> AppResult<Option<Student>> {
        Ok(self.tables.read().await.students.get(&id).cloned())
    }

    async fn list_students(&self) -> AppResult<Vec<Student>> {
        let mut students: Vec<Student> = self.tables.read().await.students.values().cloned().collect();
        students.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(students)
    }

    async fn insert_student(&self, student: &NewStudent) -> AppResult<Student> {
        let mut tables = self.tables.write().await;
        if tables.students.values().any(|s| s.email == student.email) {
            return Err(AppError::Conflict(format!(
                "A student with email {} already exists",
                student.email
            )));
        }
        let id = Tables::next_id(&mut tables.next_student_id);
        let row = Student {
            id,
            name: student.name.clone(),
            email: student.email.clone(),
        };
        tables.students.insert(id, row.clone());
        Ok(row)
    }

    async fn get_borrow_record(&self, id: i64) -> AppResult<Option<BorrowRecord>> {
        Ok(self.tables.read().await.borrow_records.get(&id).cloned())
    }

    async fn list_borrow_records(&self, status: Option<BorrowStatus>) -> AppResult<Vec<BorrowRecord>> {
        let mut records: Vec<BorrowRecord> = self
            .tables
            .read()
            .await
            .borrow_records
            .values()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.borrow_date.cmp(&a.borrow_date).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn checkout(
        &self,
        student_id: i64,
        book_id: i64,
        borrow_date: NaiveDate,
    ) -> AppResult<Option<BorrowRecord>> {
        let mut tables = self.tables.write().await;

        match tables.books.get_mut(&book_id) {
            Some(book) if book.available_copies > 0 => book.available_copies -= 1,
            _ => return Ok(None),
        }

        let id = Tables::next_id(&mut tables.next_record_id);
        let record = BorrowRecord {
            id,
            student_id,
            book_id,
            borrow_date,
            return_date: None,
            status: BorrowStatus::Borrowed,
        };
        tables.borrow_records.insert(id, record.clone());
        Ok(Some(record))
    }

    async fn checkin(&self, record_id: i64, return_date: NaiveDate) -> AppResult<Option<BorrowRecord>> {
        let mut tables = self.tables.write().await;

        let record = match tables.borrow_records.get_mut(&record_id) {
            Some(record) if record.status == BorrowStatus::Borrowed => {
                record.status = BorrowStatus::Returned;
                record.return_date = Some(return_date);
                record.clone()
            }
            _ => return Ok(None),
        };

        if let Some(book) = tables.books.get_mut(&record.book_id) {
            book.available_copies = (book.available_copies + 1).min(book.total_copies);
        }
        Ok(Some(record))
    }

    async fn summary(&self) -> AppResult<LibrarySummary> {
        let tables = self.tables.read().await;
        Ok(LibrarySummary {
            titles: tables.books.len() as i64,
            total_copies: tables.books.values().map(|b| i64::from(b.total_copies)).sum(),
            available_copies: tables.books.values().map(|b| i64::from(b.available_copies)).sum(),
            students: tables.students.len() as i64,
            active_loans: tables
                .borrow_records
                .values()
                .filter(|r| r.status == BorrowStatus::Borrowed)
                .count() as i64,
        })
    }
}

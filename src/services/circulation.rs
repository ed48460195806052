//! Borrow/return transactions and borrow record queries.
//!
//! Preconditions are checked against freshly read rows so callers get a
//! precise rejection. The write itself goes through the store's atomic
//! `checkout`/`checkin`, which re-checks availability and status, so a
//! concurrent request cannot over-lend a book or return a record twice.

use chrono::{NaiveDate, Utc};

use crate::{
    error::AppResult,
    models::{BorrowRecord, BorrowStatus, Outcome, RejectionKind},
    repository::SharedStore,
};

pub const BORROWED_MESSAGE: &str = "Book borrowed successfully";
pub const RETURNED_MESSAGE: &str = "Book returned successfully";

#[derive(Clone)]
pub struct CirculationService {
    store: SharedStore,
}

impl CirculationService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    pub async fn get_borrow_record(&self, id: i64) -> AppResult<Option<BorrowRecord>> {
        self.store.get_borrow_record(id).await
    }

    /// List records newest first, optionally filtered by status
    pub async fn list_borrow_records(&self, status: Option<BorrowStatus>) -> AppResult<Vec<BorrowRecord>> {
        self.store.list_borrow_records(status).await
    }

    /// Lend one copy of a book to a student
    pub async fn borrow_book(&self, student_id: i64, book_id: i64) -> AppResult<Outcome<BorrowRecord>> {
        if self.store.get_student(student_id).await?.is_none() {
            return Ok(Outcome::rejected(RejectionKind::StudentNotFound));
        }

        let Some(book) = self.store.get_book(book_id).await? else {
            return Ok(Outcome::rejected(RejectionKind::BookNotFound));
        };

        if book.available_copies <= 0 {
            return Ok(Outcome::rejected(RejectionKind::NoCopiesAvailable));
        }

        match self.store.checkout(student_id, book_id, Self::today()).await? {
            Some(record) => {
                tracing::info!(record_id = record.id, student_id, book_id, "Book borrowed");
                Ok(Outcome::completed(BORROWED_MESSAGE, record))
            }
            None => {
                tracing::warn!(student_id, book_id, "Last copy taken by a concurrent borrow");
                Ok(Outcome::rejected(RejectionKind::NoCopiesAvailable))
            }
        }
    }

    /// Close a borrow record and put the copy back on the shelf
    pub async fn return_book(&self, record_id: i64) -> AppResult<Outcome<BorrowRecord>> {
        let Some(record) = self.store.get_borrow_record(record_id).await? else {
            return Ok(Outcome::rejected(RejectionKind::RecordNotFound));
        };

        if record.status == BorrowStatus::Returned {
            return Ok(Outcome::rejected(RejectionKind::AlreadyReturned));
        }

        if self.store.get_book(record.book_id).await?.is_none() {
            return Ok(Outcome::rejected(RejectionKind::BookNotFound));
        }

        match self.store.checkin(record_id, Self::today()).await? {
            Some(record) => {
                tracing::info!(record_id, book_id = record.book_id, "Book returned");
                Ok(Outcome::completed(RETURNED_MESSAGE, record))
            }
            None => {
                tracing::warn!(record_id, "Record closed by a concurrent return");
                Ok(Outcome::rejected(RejectionKind::AlreadyReturned))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        error::AppError,
        models::{Book, NewBook, NewStudent, Student},
        repository::{LibraryStore, MemoryStore, MockLibraryStore},
    };

    struct Fixture {
        store: Arc<MemoryStore>,
        service: CirculationService,
    }

    impl Fixture {
        fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            Self {
                service: CirculationService::new(store.clone()),
                store,
            }
        }

        async fn book(&self, copies: i32) -> Book {
            self.store
                .insert_book(&NewBook {
                    title: "The Left Hand of Darkness".to_string(),
                    author: "Ursula K. Le Guin".to_string(),
                    isbn: None,
                    total_copies: copies,
                    available_copies: copies,
                })
                .await
                .unwrap()
        }

        async fn student(&self, name: &str) -> i64 {
            self.store
                .insert_student(&NewStudent {
                    name: name.to_string(),
                    email: format!("{}@example.com", name.to_lowercase()),
                })
                .await
                .unwrap()
                .id
        }

        async fn available(&self, book_id: i64) -> i32 {
            self.store.get_book(book_id).await.unwrap().unwrap().available_copies
        }
    }

    fn completed(outcome: Outcome<BorrowRecord>) -> BorrowRecord {
        match outcome {
            Outcome::Completed { value, .. } => value,
            Outcome::Rejected(rejection) => panic!("unexpected rejection: {}", rejection.message),
        }
    }

    #[tokio::test]
    async fn test_single_copy_scenario() {
        let fx = Fixture::new();
        let book = fx.book(1).await;
        let first = fx.student("Ada").await;
        let second = fx.student("Grace").await;

        let outcome = fx.service.borrow_book(first, book.id).await.unwrap();
        assert!(matches!(&outcome, Outcome::Completed { message, .. } if message == BORROWED_MESSAGE));
        let record = completed(outcome);
        assert_eq!(record.status, BorrowStatus::Borrowed);
        assert_eq!(record.borrow_date, Utc::now().date_naive());
        assert_eq!(fx.available(book.id).await, 0);

        let outcome = fx.service.borrow_book(second, book.id).await.unwrap();
        assert_eq!(outcome.rejection_kind(), Some(RejectionKind::NoCopiesAvailable));
        assert_eq!(fx.store.list_borrow_records(None).await.unwrap().len(), 1);

        let returned = completed(fx.service.return_book(record.id).await.unwrap());
        assert_eq!(returned.status, BorrowStatus::Returned);
        assert!(returned.return_date.is_some());
        assert_eq!(fx.available(book.id).await, 1);
    }

    #[tokio::test]
    async fn test_borrow_then_return_restores_count() {
        let fx = Fixture::new();
        let book = fx.book(4).await;
        let student = fx.student("Ada").await;

        let record = completed(fx.service.borrow_book(student, book.id).await.unwrap());
        assert_eq!(fx.available(book.id).await, 3);
        completed(fx.service.return_book(record.id).await.unwrap());
        assert_eq!(fx.available(book.id).await, 4);
    }

    #[tokio::test]
    async fn test_unknown_student_and_book() {
        let fx = Fixture::new();
        let book = fx.book(1).await;
        let student = fx.student("Ada").await;

        let outcome = fx.service.borrow_book(999999, book.id).await.unwrap();
        assert_eq!(outcome.rejection_kind(), Some(RejectionKind::StudentNotFound));

        let outcome = fx.service.borrow_book(student, 999999).await.unwrap();
        assert_eq!(outcome.rejection_kind(), Some(RejectionKind::BookNotFound));
        match outcome {
            Outcome::Rejected(rejection) => assert_eq!(rejection.message, "Book does not exist"),
            Outcome::Completed { .. } => unreachable!(),
        }

        assert_eq!(fx.available(book.id).await, 1);
        assert!(fx.store.list_borrow_records(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_double_return_is_rejected() {
        let fx = Fixture::new();
        let book = fx.book(2).await;
        let student = fx.student("Ada").await;
        let record = completed(fx.service.borrow_book(student, book.id).await.unwrap());
        completed(fx.service.return_book(record.id).await.unwrap());

        let outcome = fx.service.return_book(record.id).await.unwrap();
        assert_eq!(outcome.rejection_kind(), Some(RejectionKind::AlreadyReturned));
        assert_eq!(fx.available(book.id).await, 2);
    }

    #[tokio::test]
    async fn test_return_unknown_record() {
        let fx = Fixture::new();
        let outcome = fx.service.return_book(12345).await.unwrap();
        assert_eq!(outcome.rejection_kind(), Some(RejectionKind::RecordNotFound));
    }

    #[tokio::test]
    async fn test_copy_counts_stay_in_range() {
        let fx = Fixture::new();
        let book = fx.book(2).await;
        let student = fx.student("Ada").await;

        let mut open = Vec::new();
        for _ in 0..4 {
            if let Outcome::Completed { value, .. } = fx.service.borrow_book(student, book.id).await.unwrap() {
                open.push(value.id);
            }
            let current = fx.store.get_book(book.id).await.unwrap().unwrap();
            assert!(current.copies_consistent());
        }
        assert_eq!(open.len(), 2);

        for id in open.iter().chain(open.iter()) {
            fx.service.return_book(*id).await.unwrap();
            let current = fx.store.get_book(book.id).await.unwrap().unwrap();
            assert!(current.copies_consistent());
        }
        assert_eq!(fx.available(book.id).await, 2);
    }

    #[tokio::test]
    async fn test_concurrent_borrows_never_over_lend() {
        let fx = Fixture::new();
        let book = fx.book(1).await;
        let mut students = Vec::new();
        for name in ["Ada", "Grace", "Barbara", "Radia"] {
            students.push(fx.student(name).await);
        }

        let book_id = book.id;
        let handles: Vec<_> = students
            .into_iter()
            .map(|student| {
                let service = fx.service.clone();
                tokio::spawn(async move { service.borrow_book(student, book_id).await })
            })
            .collect();

        let mut completed_count = 0;
        for handle in handles {
            let outcome = handle.await.unwrap().unwrap();
            match outcome.rejection_kind() {
                None => completed_count += 1,
                Some(kind) => assert_eq!(kind, RejectionKind::NoCopiesAvailable),
            }
        }

        assert_eq!(completed_count, 1);
        assert_eq!(fx.available(book.id).await, 0);
        assert_eq!(fx.store.list_borrow_records(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_lost_race_is_reported_as_no_copies() {
        let mut store = MockLibraryStore::new();
        store
            .expect_get_student()
            .returning(|id| Ok(Some(Student { id, name: "Ada".into(), email: "ada@example.com".into() })));
        store.expect_get_book().returning(|id| {
            Ok(Some(Book {
                id,
                title: "Dune".into(),
                author: "Frank Herbert".into(),
                isbn: None,
                total_copies: 1,
                available_copies: 1,
            }))
        });
        store.expect_checkout().times(1).returning(|_, _, _| Ok(None));

        let service = CirculationService::new(Arc::new(store));
        let outcome = service.borrow_book(1, 1).await.unwrap();
        assert_eq!(outcome.rejection_kind(), Some(RejectionKind::NoCopiesAvailable));
    }

    #[tokio::test]
    async fn test_no_copies_skips_write() {
        let mut store = MockLibraryStore::new();
        store
            .expect_get_student()
            .returning(|id| Ok(Some(Student { id, name: "Ada".into(), email: "ada@example.com".into() })));
        store.expect_get_book().returning(|id| {
            Ok(Some(Book {
                id,
                title: "Dune".into(),
                author: "Frank Herbert".into(),
                isbn: None,
                total_copies: 1,
                available_copies: 0,
            }))
        });
        store.expect_checkout().times(0);

        let service = CirculationService::new(Arc::new(store));
        let outcome = service.borrow_book(1, 1).await.unwrap();
        assert_eq!(outcome.rejection_kind(), Some(RejectionKind::NoCopiesAvailable));
    }

    #[tokio::test]
    async fn test_store_failure_is_an_error_not_a_rejection() {
        let mut store = MockLibraryStore::new();
        store
            .expect_get_student()
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        store.expect_checkout().times(0);

        let service = CirculationService::new(Arc::new(store));
        let err = service.borrow_book(1, 1).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_return_store_failure_propagates() {
        let mut store = MockLibraryStore::new();
        store.expect_get_borrow_record().returning(|id| {
            Ok(Some(BorrowRecord {
                id,
                student_id: 1,
                book_id: 1,
                borrow_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                return_date: None,
                status: BorrowStatus::Borrowed,
            }))
        });
        store.expect_get_book().returning(|_| Err(AppError::Database(sqlx::Error::PoolClosed)));
        store.expect_checkin().times(0);

        let service = CirculationService::new(Arc::new(store));
        assert!(matches!(service.return_book(7).await, Err(AppError::Database(_))));
    }
}

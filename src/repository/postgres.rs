//! PostgreSQL table store

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use super::LibraryStore;
use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
    models::{Book, BorrowRecord, BorrowStatus, LibrarySummary, NewBook, NewStudent, Student},
};

const BOOK_COLUMNS: &str = "id, title, author, isbn, total_copies, available_copies";
const STUDENT_COLUMNS: &str = "id, name, email";
const RECORD_COLUMNS: &str = "id, student_id, book_id, borrow_date, return_date, status";

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Open a connection pool from configuration
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply the bundled schema migrations
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(sqlx::Error::from)?;
        Ok(())
    }
}

#[async_trait]
impl LibraryStore for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    async fn get_book(&self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn list_books(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books ORDER BY title, id", BOOK_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn insert_book(&self, book: &NewBook) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, isbn, total_copies, available_copies)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.total_copies)
        .bind(book.available_copies)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_book(&self, id: i64, book: &NewBook) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $2, author = $3, isbn = $4, total_copies = $5, available_copies = $6
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.total_copies)
        .bind(book.available_copies)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_student(&self, id: i64) -> AppResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!("SELECT {} FROM students WHERE id = $1", STUDENT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(student)
    }

    async fn list_students(&self) -> AppResult<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(&format!("SELECT {} FROM students ORDER BY name, id", STUDENT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        Ok(students)
    }

    async fn insert_student(&self, student: &NewStudent) -> AppResult<Student> {
        sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO students (name, email) VALUES ($1, $2) RETURNING {}",
            STUDENT_COLUMNS
        ))
        .bind(&student.name)
        .bind(&student.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(format!("A student with email {} already exists", student.email))
            }
            other => AppError::Database(other),
        })
    }

    async fn get_borrow_record(&self, id: i64) -> AppResult<Option<BorrowRecord>> {
        let record = sqlx::query_as::<_, BorrowRecord>(&format!(
            "SELECT {} FROM borrow_records WHERE id = $1",
            RECORD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn list_borrow_records(&self, status: Option<BorrowStatus>) -> AppResult<Vec<BorrowRecord>> {
        let records = sqlx::query_as::<_, BorrowRecord>(&format!(
            r#"
            SELECT {} FROM borrow_records
            WHERE ($1::borrow_status IS NULL OR status = $1)
            ORDER BY borrow_date DESC, id DESC
            "#,
            RECORD_COLUMNS
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn checkout(
        &self,
        student_id: i64,
        book_id: i64,
        borrow_date: NaiveDate,
    ) -> AppResult<Option<BorrowRecord>> {
        let mut tx = self.pool.begin().await?;

        // Conditional decrement: the row lock serializes concurrent borrowers
        let taken = sqlx::query(
            "UPDATE books SET available_copies = available_copies - 1 WHERE id = $1 AND available_copies > 0",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

        if taken.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let record = sqlx::query_as::<_, BorrowRecord>(&format!(
            r#"
            INSERT INTO borrow_records (student_id, book_id, borrow_date, status)
            VALUES ($1, $2, $3, 'borrowed')
            RETURNING {}
            "#,
            RECORD_COLUMNS
        ))
        .bind(student_id)
        .bind(book_id)
        .bind(borrow_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(record))
    }

    async fn checkin(&self, record_id: i64, return_date: NaiveDate) -> AppResult<Option<BorrowRecord>> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, BorrowRecord>(&format!(
            r#"
            UPDATE borrow_records
            SET status = 'returned', return_date = $2
            WHERE id = $1 AND status = 'borrowed'
            RETURNING {}
            "#,
            RECORD_COLUMNS
        ))
        .bind(record_id)
        .bind(return_date)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(record) = record else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            "UPDATE books SET available_copies = LEAST(available_copies + 1, total_copies) WHERE id = $1",
        )
        .bind(record.book_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(record))
    }

    async fn summary(&self) -> AppResult<LibrarySummary> {
        let summary = sqlx::query_as::<_, LibrarySummary>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM books) AS titles,
                (SELECT COALESCE(SUM(total_copies), 0)::bigint FROM books) AS total_copies,
                (SELECT COALESCE(SUM(available_copies), 0)::bigint FROM books) AS available_copies,
                (SELECT COUNT(*) FROM students) AS students,
                (SELECT COUNT(*) FROM borrow_records WHERE status = 'borrowed') AS active_loans
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(summary)
    }
}

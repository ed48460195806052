//! Book inventory service

use validator::Validate;

use super::{optional_text, required_text};
use crate::{
    error::{AppError, AppResult},
    models::{Book, CreateBook, NewBook, UpdateBook},
    repository::SharedStore,
};

#[derive(Clone)]
pub struct CatalogService {
    store: SharedStore,
}

impl CatalogService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// List all books ordered by title
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.store.list_books().await
    }

    pub async fn get_book(&self, id: i64) -> AppResult<Option<Book>> {
        self.store.get_book(id).await
    }

    /// Add a book to the inventory. Nothing is written when validation fails.
    pub async fn add_book(&self, data: CreateBook) -> AppResult<Book> {
        data.validate()?;

        let available_copies = data.available_copies.unwrap_or(data.total_copies);
        if available_copies > data.total_copies {
            return Err(AppError::Validation(
                "Available copies cannot exceed total copies".to_string(),
            ));
        }

        let book = NewBook {
            title: required_text("Title", &data.title)?,
            author: required_text("Author", &data.author)?,
            isbn: optional_text(data.isbn.as_deref()),
            total_copies: data.total_copies,
            available_copies,
        };

        let created = self.store.insert_book(&book).await?;
        tracing::info!(book_id = created.id, title = %created.title, "Book added");
        Ok(created)
    }

    /// Administrative edit of a book.
    ///
    /// Changing `total_copies` without an explicit `available_copies` shifts
    /// the shelf count by the same amount, so copies on loan stay on loan.
    pub async fn update_book(&self, id: i64, data: UpdateBook) -> AppResult<Book> {
        data.validate()?;

        let current = self
            .store
            .get_book(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        let total_copies = data.total_copies.unwrap_or(current.total_copies);
        let available_copies = match data.available_copies {
            Some(available) => available,
            // available <= total on the stored row, so this cannot overflow
            None => (current.available_copies - current.total_copies + total_copies).max(0),
        };

        if available_copies > total_copies {
            return Err(AppError::Validation(format!(
                "Available copies ({}) cannot exceed total copies ({})",
                available_copies, total_copies
            )));
        }

        let book = NewBook {
            title: match data.title.as_deref() {
                Some(title) => required_text("Title", title)?,
                None => current.title,
            },
            author: match data.author.as_deref() {
                Some(author) => required_text("Author", author)?,
                None => current.author,
            },
            isbn: match data.isbn.as_deref() {
                Some(isbn) => optional_text(Some(isbn)),
                None => current.isbn,
            },
            total_copies,
            available_copies,
        };

        let updated = self
            .store
            .update_book(id, &book)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;
        tracing::info!(book_id = id, "Book updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repository::{LibraryStore, MemoryStore, MockLibraryStore};

    fn create(total: i32) -> CreateBook {
        CreateBook {
            title: " Dune ".to_string(),
            author: "Frank Herbert".to_string(),
            isbn: Some("".to_string()),
            total_copies: total,
            available_copies: None,
        }
    }

    #[tokio::test]
    async fn test_add_book_initializes_available_copies() {
        let service = CatalogService::new(Arc::new(MemoryStore::new()));
        let book = service.add_book(create(3)).await.unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.isbn, None);
        assert_eq!(book.total_copies, 3);
        assert_eq!(book.available_copies, 3);
    }

    #[tokio::test]
    async fn test_add_book_rejects_zero_copies_without_writing() {
        let mut store = MockLibraryStore::new();
        store.expect_insert_book().times(0);
        let service = CatalogService::new(Arc::new(store));

        let err = service.add_book(create(0)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_add_book_rejects_excess_available() {
        let service = CatalogService::new(Arc::new(MemoryStore::new()));
        let mut data = create(2);
        data.available_copies = Some(3);
        assert!(matches!(service.add_book(data).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_book_rejects_blank_title() {
        let service = CatalogService::new(Arc::new(MemoryStore::new()));
        let mut data = create(1);
        data.title = "   ".to_string();
        assert!(matches!(service.add_book(data).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_total_shifts_available() {
        let store = Arc::new(MemoryStore::new());
        let service = CatalogService::new(store.clone());
        let book = service.add_book(create(3)).await.unwrap();
        store
            .checkout(1, book.id, chrono::Utc::now().date_naive())
            .await
            .unwrap();

        let updated = service
            .update_book(book.id, UpdateBook { total_copies: Some(5), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.total_copies, 5);
        assert_eq!(updated.available_copies, 4);
        assert_eq!(updated.title, "Dune");
    }

    #[tokio::test]
    async fn test_update_to_huge_total_keeps_loans() {
        let store = Arc::new(MemoryStore::new());
        let service = CatalogService::new(store.clone());
        let book = service.add_book(create(2)).await.unwrap();
        store
            .checkout(1, book.id, chrono::Utc::now().date_naive())
            .await
            .unwrap();

        let updated = service
            .update_book(book.id, UpdateBook { total_copies: Some(i32::MAX), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.total_copies, i32::MAX);
        assert_eq!(updated.available_copies, i32::MAX - 1);
    }

    #[tokio::test]
    async fn test_update_to_huge_total_on_full_shelf() {
        let service = CatalogService::new(Arc::new(MemoryStore::new()));
        let book = service.add_book(create(1)).await.unwrap();

        let updated = service
            .update_book(book.id, UpdateBook { total_copies: Some(i32::MAX), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.available_copies, i32::MAX);
    }

    #[tokio::test]
    async fn test_update_rejects_inconsistent_counts() {
        let service = CatalogService::new(Arc::new(MemoryStore::new()));
        let book = service.add_book(create(2)).await.unwrap();
        let err = service
            .update_book(book.id, UpdateBook { available_copies: Some(3), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(service.get_book(book.id).await.unwrap().unwrap().available_copies, 2);
    }

    #[tokio::test]
    async fn test_update_missing_book() {
        let service = CatalogService::new(Arc::new(MemoryStore::new()));
        let err = service.update_book(42, UpdateBook::default()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

pub use in_memory_books_repository::InMemoryBooksRepository;
pub use postgres_books_repository::{PostgresBooksRepository, PostgresBooksRepositoryConfig};

use crate::api::{Book, BookUpdate, Isbn};

mod in_memory_books_repository;
mod postgres_books_repository;

#[derive(thiserror::Error, Debug)]
pub enum BookRepositoryError {
    #[error("Book {0} not found")]
    NotFound(Isbn),

    #[error("Book {0} already exists")]
    AlreadyExists(Isbn),

    #[error("DatabaseFailure failure {0}")]
    DatabaseFailure(#[from] tokio_postgres::Error),

    #[error("Other error {0}")]
    Other(String),
}

#[async_trait::async_trait]
pub trait BookRepository: Send + Sync {
    /// Adds book to repository, fails with AlreadyExists if isbn is taken
    async fn add_book(&self, book: Book) -> Result<Book, BookRepositoryError>;
    /// Lists all books in the repository
    async fn list_books(&self) -> Result<Vec<Book>, BookRepositoryError>;
    /// Retrieves the book with given isbn
    async fn get_book(&self, isbn: &str) -> Result<Book, BookRepositoryError>;
    /// Replaces all mutable fields of the book, returns the book as stored after the update
    async fn update_book(&self, isbn: &str, update: BookUpdate)
        -> Result<Book, BookRepositoryError>;
    /// Removes the book with given isbn
    async fn delete_book(&self, isbn: &str) -> Result<(), BookRepositoryError>;
}

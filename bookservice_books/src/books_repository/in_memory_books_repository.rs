use crate::api::{Book, BookUpdate};
use crate::books_repository::{BookRepository, BookRepositoryError};

/// Keeps books in insertion order
#[derive(Default)]
pub struct InMemoryBooksRepository {
    books: parking_lot::RwLock<Vec<Book>>,
}

#[async_trait::async_trait]
impl BookRepository for InMemoryBooksRepository {
    async fn add_book(&self, book: Book) -> Result<Book, BookRepositoryError> {
        let mut locked_books = self.books.write();
        if locked_books.iter().any(|stored| stored.isbn == book.isbn) {
            return Err(BookRepositoryError::AlreadyExists(book.isbn));
        }
        locked_books.push(book.clone());
        Ok(book)
    }

    async fn list_books(&self) -> Result<Vec<Book>, BookRepositoryError> {
        Ok(self.books.read().clone())
    }

    async fn get_book(&self, isbn: &str) -> Result<Book, BookRepositoryError> {
        self.books
            .read()
            .iter()
            .find(|book| book.isbn == isbn)
            .cloned()
            .ok_or_else(|| BookRepositoryError::NotFound(isbn.to_string()))
    }

    async fn update_book(
        &self,
        isbn: &str,
        update: BookUpdate,
    ) -> Result<Book, BookRepositoryError> {
        let mut locked_books = self.books.write();
        let book = locked_books
            .iter_mut()
            .find(|book| book.isbn == isbn)
            .ok_or_else(|| BookRepositoryError::NotFound(isbn.to_string()))?;
        *book = book.clone().with_update(update);
        Ok(book.clone())
    }

    async fn delete_book(&self, isbn: &str) -> Result<(), BookRepositoryError> {
        let mut locked_books = self.books.write();
        let position = locked_books
            .iter()
            .position(|book| book.isbn == isbn)
            .ok_or_else(|| BookRepositoryError::NotFound(isbn.to_string()))?;
        locked_books.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod in_memory_book_repository_tests {
    use crate::api::{Book, BookUpdate};
    use crate::books_repository::{BookRepository, BookRepositoryError, InMemoryBooksRepository};

    fn sample_book(isbn: &str, title: &str) -> Book {
        Book {
            isbn: isbn.to_string(),
            amazon_url: "https://amazon.com/bookish".to_string(),
            author: "Happy Gilmore".to_string(),
            language: "English".to_string(),
            pages: 1072,
            publisher: "Pottermore".to_string(),
            title: title.to_string(),
            year: 2012,
        }
    }

    #[tokio::test]
    /// Tests if add_book and get_book work correctly
    async fn test_add_book_and_get_it() {
        let repo = InMemoryBooksRepository::default();

        let book_not_found = repo.get_book("999").await;
        assert!(matches!(
            book_not_found,
            Err(BookRepositoryError::NotFound(..))
        ));

        let book = sample_book("27464539", "Along came Darrel");
        let added = repo.add_book(book.clone()).await.expect("Failed to add book");
        assert_eq!(added, book);

        let fetched = repo.get_book("27464539").await.expect("Failed to get book");
        assert_eq!(fetched, book);

        let duplicate = repo.add_book(sample_book("27464539", "Other")).await;
        assert!(matches!(
            duplicate,
            Err(BookRepositoryError::AlreadyExists(isbn)) if isbn == "27464539"
        ));
    }

    #[tokio::test]
    /// Tests if list_books keeps insertion order
    async fn test_add_books_and_list_them() {
        let repo = InMemoryBooksRepository::default();

        let list = repo.list_books().await.expect("Failed to list books");
        assert_eq!(list, vec![]);

        let book1 = sample_book("1", "title1");
        let book2 = sample_book("2", "title2");
        repo.add_book(book1.clone()).await.expect("Failed to add book");
        repo.add_book(book2.clone()).await.expect("Failed to add book");

        let list = repo.list_books().await.expect("Failed to list books");
        assert_eq!(list, vec![book1, book2]);
    }

    #[tokio::test]
    /// Tests if update_book replaces every mutable field and keeps isbn
    async fn test_add_book_update_and_get_it() {
        let repo = InMemoryBooksRepository::default();
        let update = BookUpdate {
            amazon_url: "https://taco.com".to_string(),
            author: "mctest".to_string(),
            language: "english".to_string(),
            pages: 1000,
            publisher: "yeah right".to_string(),
            title: "UPDATED BOOK".to_string(),
            year: 2000,
        };

        let result = repo.update_book("2000", update.clone()).await;
        assert!(matches!(result, Err(BookRepositoryError::NotFound(..))));

        repo.add_book(sample_book("27464539", "Along came Darrel"))
            .await
            .expect("Failed to add book");

        let updated = repo
            .update_book("27464539", update)
            .await
            .expect("Failed to update");
        let expected = Book {
            isbn: "27464539".to_string(),
            amazon_url: "https://taco.com".to_string(),
            author: "mctest".to_string(),
            language: "english".to_string(),
            pages: 1000,
            publisher: "yeah right".to_string(),
            title: "UPDATED BOOK".to_string(),
            year: 2000,
        };
        assert_eq!(updated, expected);
        assert_eq!(repo.get_book("27464539").await.unwrap(), expected);
    }

    #[tokio::test]
    /// Tests if delete_book removes only the requested book
    async fn test_delete_book() {
        let repo = InMemoryBooksRepository::default();

        let result = repo.delete_book("1245758674").await;
        assert!(matches!(result, Err(BookRepositoryError::NotFound(..))));

        repo.add_book(sample_book("1", "title1")).await.unwrap();
        repo.add_book(sample_book("2", "title2")).await.unwrap();

        repo.delete_book("1").await.expect("Failed to delete");

        assert!(matches!(
            repo.get_book("1").await,
            Err(BookRepositoryError::NotFound(..))
        ));
        assert_eq!(
            repo.list_books().await.unwrap(),
            vec![sample_book("2", "title2")]
        );
    }
}

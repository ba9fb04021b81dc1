use serde::{Deserialize, Serialize};

pub type Isbn = String;

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
/// Struct representing a single book stored in the service
pub struct Book {
    pub isbn: Isbn,
    #[serde(alias = "amazon-url")]
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    pub pages: i32,
    pub publisher: String,
    pub title: String,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
/// Struct representing a full replacement of the mutable fields of a book.
/// Isbn is taken from the path and cannot be changed.
pub struct BookUpdate {
    #[serde(alias = "amazon-url")]
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    pub pages: i32,
    pub publisher: String,
    pub title: String,
    pub year: i32,
}

impl Book {
    /// Returns the book with all mutable fields taken from the update
    pub fn with_update(self, update: BookUpdate) -> Book {
        Book {
            isbn: self.isbn,
            amazon_url: update.amazon_url,
            author: update.author,
            language: update.language,
            pages: update.pages,
            publisher: update.publisher,
            title: update.title,
            year: update.year,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
/// Body of POST /books
pub struct CreateBookRequest {
    pub book: Book,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct BookResponse {
    pub book: Book,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ErrorMessage {
    Single(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetails {
    pub status: u16,
    pub message: ErrorMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Error envelope returned by every failing endpoint
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetails {
                status,
                message: ErrorMessage::Single(message.into()),
            },
        }
    }

    pub fn with_messages(status: u16, messages: Vec<String>) -> Self {
        Self {
            error: ErrorDetails {
                status,
                message: ErrorMessage::List(messages),
            },
        }
    }
}

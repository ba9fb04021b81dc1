use std::sync::Arc;

use actix_web::web::Data;
use actix_web::{web, Error, HttpResponse};

use crate::api::{BookResponse, BooksResponse, ErrorResponse, MessageResponse};
use crate::books_repository::{BookRepository, BookRepositoryError};
use crate::schema_validator::{validate_create_request, validate_update_request, ValidationErrors};

fn validation_failed(errors: ValidationErrors) -> HttpResponse {
    tracing::info!("Rejected request: {}", errors);
    HttpResponse::BadRequest().json(ErrorResponse::with_messages(400, errors.0))
}

fn book_not_found(isbn: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        404,
        format!("There is no book with an isbn '{}'", isbn),
    ))
}

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new(500, "Internal server error"))
}

pub async fn health() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().finish())
}

pub async fn not_found() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::NotFound().json(ErrorResponse::new(404, "Not Found")))
}

pub async fn get_all_books(
    books_repository: Data<Arc<dyn BookRepository>>,
) -> Result<HttpResponse, Error> {
    Ok(match books_repository.list_books().await {
        Ok(books) => HttpResponse::Ok().json(BooksResponse { books }),
        Err(err) => {
            tracing::error!("Get all books failed {}", err);
            internal_error()
        }
    })
}

pub async fn add_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, Error> {
    let book = match validate_create_request(&body) {
        Ok(book) => book,
        Err(errors) => return Ok(validation_failed(errors)),
    };

    Ok(match books_repository.add_book(book).await {
        Ok(book) => {
            tracing::info!("Added book {}", book.isbn);
            HttpResponse::Created().json(BookResponse { book })
        }
        Err(err) => {
            tracing::error!("Add book failed {}", err);
            internal_error()
        }
    })
}

pub async fn get_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    isbn: web::Path<String>,
) -> Result<HttpResponse, Error> {
    Ok(match books_repository.get_book(&isbn).await {
        Ok(book) => HttpResponse::Ok().json(BookResponse { book }),
        Err(BookRepositoryError::NotFound(_)) => book_not_found(&isbn),
        Err(err) => {
            tracing::error!("Get book failed {}", err);
            internal_error()
        }
    })
}

pub async fn update_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    isbn: web::Path<String>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, Error> {
    let update = match validate_update_request(&body) {
        Ok(update) => update,
        Err(errors) => return Ok(validation_failed(errors)),
    };

    Ok(match books_repository.update_book(&isbn, update).await {
        Ok(book) => HttpResponse::Created().json(BookResponse { book }),
        Err(BookRepositoryError::NotFound(_)) => book_not_found(&isbn),
        Err(err) => {
            tracing::error!("Update book failed {}", err);
            internal_error()
        }
    })
}

pub async fn delete_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    isbn: web::Path<String>,
) -> Result<HttpResponse, Error> {
    Ok(match books_repository.delete_book(&isbn).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse {
            message: "Book deleted".to_string(),
        }),
        Err(BookRepositoryError::NotFound(_)) => book_not_found(&isbn),
        Err(err) => {
            tracing::error!("Delete book failed {}", err);
            internal_error()
        }
    })
}

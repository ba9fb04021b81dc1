use anyhow::{anyhow, bail, Context};
use reqwest::{StatusCode, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

use crate::api::{
    Book, BookResponse, BookUpdate, BooksResponse, CreateBookRequest, ErrorResponse,
    MessageResponse,
};

pub struct BookServiceBooksClient {
    url: Url,
    client: ClientWithMiddleware,
}

/// Result of a call that the service may reject with 400
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Done(T),
    Rejected(ErrorResponse),
}

impl BookServiceBooksClient {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let url = Url::parse(url).context("Invalid service url")?;
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        Ok(Self { url, client })
    }

    /// Appends segments to the service url, each one percent-encoded
    fn url_with_segments(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Url {} cannot be a base", self.url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn books_url(&self) -> anyhow::Result<Url> {
        self.url_with_segments(&["books"])
    }

    fn book_url(&self, isbn: &str) -> anyhow::Result<Url> {
        self.url_with_segments(&["books", isbn])
    }

    /// Calls POST /books endpoint
    /// Returns the book as stored or the validation errors reported by the service
    pub async fn add_book(&self, book: Book) -> anyhow::Result<Outcome<Book>> {
        let response = self
            .client
            .post(self.books_url()?)
            .json(&CreateBookRequest { book })
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => Ok(Outcome::Done(
                response.json::<BookResponse>().await?.book,
            )),
            StatusCode::BAD_REQUEST => Ok(Outcome::Rejected(response.json().await?)),
            status => {
                let error = response.text().await.unwrap_or_default();
                bail!("Failed to add book {} {}", status, error)
            }
        }
    }

    /// Calls GET /books endpoint
    pub async fn list_books(&self) -> anyhow::Result<Vec<Book>> {
        let response = self.client.get(self.books_url()?).send().await?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            bail!("Failed to list books {}", error)
        }

        Ok(response.json::<BooksResponse>().await?.books)
    }

    /// Calls GET /books/{isbn} endpoint
    /// Returns None if book was not in the service
    pub async fn get_book(&self, isbn: &str) -> anyhow::Result<Option<Book>> {
        let response = self.client.get(self.book_url(isbn)?).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else if response.status().is_success() {
            Ok(Some(response.json::<BookResponse>().await?.book))
        } else {
            let error = response.text().await.unwrap_or_default();
            bail!("Failed to get book {}", error)
        }
    }

    /// Calls PUT /books/{isbn} endpoint
    /// Returns None if book was not in the service
    pub async fn update_book(
        &self,
        isbn: &str,
        update: &BookUpdate,
    ) -> anyhow::Result<Option<Outcome<Book>>> {
        self.put_raw(isbn, &serde_json::to_value(update)?).await
    }

    /// Calls PUT /books/{isbn} with an arbitrary body, used to check server side validation
    pub async fn put_raw(
        &self,
        isbn: &str,
        body: &serde_json::Value,
    ) -> anyhow::Result<Option<Outcome<Book>>> {
        let response = self
            .client
            .put(self.book_url(isbn)?)
            .json(body)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => Ok(Some(Outcome::Done(
                response.json::<BookResponse>().await?.book,
            ))),
            StatusCode::BAD_REQUEST => Ok(Some(Outcome::Rejected(response.json().await?))),
            StatusCode::NOT_FOUND => Ok(None),
            status => {
                let error = response.text().await.unwrap_or_default();
                bail!("Failed to update book {} {}", status, error)
            }
        }
    }

    /// Calls DELETE /books/{isbn} endpoint
    /// Returns false if book was not in the service
    pub async fn delete_book(&self, isbn: &str) -> anyhow::Result<bool> {
        let response = self.client.delete(self.book_url(isbn)?).send().await?;

        match response.status() {
            StatusCode::OK => {
                let message: MessageResponse = response.json().await?;
                if message.message != "Book deleted" {
                    bail!("Unexpected delete response {}", message.message)
                }
                Ok(true)
            }
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                let error = response.text().await.unwrap_or_default();
                bail!("Failed to delete book {} {}", status, error)
            }
        }
    }
}

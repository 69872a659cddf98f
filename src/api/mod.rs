pub mod authors;
pub mod books;
pub mod categories;
pub mod countries;
pub mod dto;
pub mod error;
pub mod health;
pub mod reviewers;
pub mod reviews;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::{header, request::Parts, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::domain::DomainError;
use crate::infrastructure::AppState;

pub use error::{ApiError, ApiResult};

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Authors
        .route(
            "/authors",
            get(authors::list_authors).post(authors::create_author),
        )
        .route(
            "/authors/:id",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        .route("/authors/:id/books", get(authors::books_of_author))
        .route("/authors/:id/authors", get(authors::authors_of_book)) // id is a book id
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/books/isbn/:isbn", get(books::get_book_by_isbn))
        .route("/books/:id/rating", get(books::get_rating))
        // Categories
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/categories/:id/books", get(categories::books_of_category))
        .route("/categories/books/:id", get(categories::categories_of_book)) // id is a book id
        // Countries
        .route(
            "/countries",
            get(countries::list_countries).post(countries::create_country),
        )
        .route(
            "/countries/:id",
            get(countries::get_country)
                .put(countries::update_country)
                .delete(countries::delete_country),
        )
        .route("/countries/:id/authors", get(countries::authors_of_country))
        .route("/countries/authors/:id", get(countries::country_of_author)) // id is an author id
        // Reviewers
        .route(
            "/reviewers",
            get(reviewers::list_reviewers).post(reviewers::create_reviewer),
        )
        .route(
            "/reviewers/:id",
            get(reviewers::get_reviewer)
                .put(reviewers::update_reviewer)
                .delete(reviewers::delete_reviewer),
        )
        .route("/reviewers/:id/reviews", get(reviewers::reviews_of_reviewer))
        .route("/reviewers/:id/reviewer", get(reviewers::reviewer_of_review)) // id is a review id
        // Reviews
        .route(
            "/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/reviews/:id",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route("/reviews/:id/reviews", get(reviews::reviews_of_book)) // id is a book id
        .route("/reviews/:id/book", get(reviews::book_of_review))
        .with_state(state)
}

/// 201 with a `Location` pointing at the new record's get-by-id route
pub(crate) fn created<T: Serialize>(family: &str, id: i32, body: T) -> impl IntoResponse {
    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/{}/{}", family, id))],
        Json(body),
    )
}

/// Map a list of records to their transfer objects
pub(crate) fn to_dtos<T, D: From<T>>(records: Vec<T>) -> Json<Vec<D>> {
    Json(records.into_iter().map(D::from).collect())
}

/// Unwrap an optional lookup, reporting `NotFound` with `message` when absent
pub(crate) fn found<T>(record: Option<T>, message: impl FnOnce() -> String) -> Result<T, ApiError> {
    record.ok_or_else(|| DomainError::not_found(message()).into())
}

/// Integer record id taken from the `:id` path segment.
///
/// Parse failures are reported through `ApiError` as a 400 with the usual
/// `{"errors": [...]}` body.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state).await?;
        Ok(IdPath(id))
    }
}

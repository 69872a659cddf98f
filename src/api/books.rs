use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, RawQuery, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::dto::{BookBody, BookDto, RatingDto};
use super::{created, found, to_dtos, ApiResult, IdPath};
use crate::domain::validation::{book_shape, ids_match, Violations};
use crate::domain::{DomainError, Repository};
use crate::infrastructure::AppState;

/// Author and category ids carried as repeated `authId` / `catId` query parameters
#[derive(Debug, Default, PartialEq)]
pub struct LinkIds {
    pub author_ids: Vec<i32>,
    pub category_ids: Vec<i32>,
}

impl LinkIds {
    /// Parameter names match case-insensitively; other parameters are ignored.
    pub fn parse(query: Option<&str>) -> Result<Self, DomainError> {
        let mut ids = LinkIds::default();
        let mut violations = Violations::new();

        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            let target = if key.eq_ignore_ascii_case("authId") {
                &mut ids.author_ids
            } else if key.eq_ignore_ascii_case("catId") {
                &mut ids.category_ids
            } else {
                continue;
            };

            match value.trim().parse::<i32>() {
                Ok(id) => target.push(id),
                Err(_) => violations.check(
                    false,
                    format!("{} must be an integer, got '{}'", key, value),
                ),
            }
        }

        violations.finish(DomainError::Validation)?;
        Ok(ids)
    }
}

/// Every requested author and category must exist; all missing ids are reported together.
async fn check_links(state: &AppState, links: &LinkIds) -> Result<(), DomainError> {
    let mut missing = Violations::new();

    for &author_id in &links.author_ids {
        missing.check(
            state.author_repo.exists(author_id).await?,
            format!("Author {} not found", author_id),
        );
    }
    for &category_id in &links.category_ids {
        missing.check(
            state.category_repo.exists(category_id).await?,
            format!("Category {} not found", category_id),
        );
    }

    missing.finish(DomainError::NotFound)
}

async fn check_isbn_free(
    state: &AppState,
    exclude_id: Option<i32>,
    isbn: &str,
) -> Result<(), DomainError> {
    if state.book_repo.is_duplicate_isbn(exclude_id, isbn).await? {
        return Err(DomainError::Duplicate(format!(
            "A book with ISBN {} already exists",
            isbn.trim()
        )));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/books",
    responses(
        (status = 200, description = "All books ordered by title", body = [BookDto])
    )
)]
pub async fn list_books(State(state): State<AppState>) -> ApiResult<Json<Vec<BookDto>>> {
    let books = state.book_repo.find_all().await?;
    Ok(to_dtos(books))
}

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book found", body = BookDto),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<BookDto>> {
    let book = found(state.book_repo.find_by_id(id).await?, || {
        format!("Book {} not found", id)
    })?;
    Ok(Json(book.into()))
}

#[utoipa::path(
    get,
    path = "/api/books/isbn/{isbn}",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 200, description = "Book found", body = BookDto),
        (status = 404, description = "No book with this ISBN")
    )
)]
pub async fn get_book_by_isbn(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<BookDto>> {
    let Path(isbn) = path?;
    let book = found(state.book_repo.find_by_isbn(&isbn).await?, || {
        format!("Book with ISBN {} not found", isbn)
    })?;
    Ok(Json(book.into()))
}

#[utoipa::path(
    get,
    path = "/api/books/{id}/rating",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Mean review rating, 0 without reviews", body = RatingDto),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_rating(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<RatingDto>> {
    if !state.book_repo.exists(id).await? {
        return Err(DomainError::not_found(format!("Book {} not found", id)).into());
    }

    let rating = state.book_repo.rating(id).await?;
    Ok(Json(RatingDto { rating }))
}

#[utoipa::path(
    post,
    path = "/api/books",
    params(
        ("authId" = Vec<i32>, Query, description = "Author ids, repeated"),
        ("catId" = Vec<i32>, Query, description = "Category ids, repeated")
    ),
    request_body = BookBody,
    responses(
        (status = 201, description = "Book created", body = BookDto),
        (status = 400, description = "Invalid book or missing authors/categories"),
        (status = 404, description = "Author or category not found"),
        (status = 422, description = "ISBN already in use")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    payload: Result<Json<BookBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = payload?;
    let links = LinkIds::parse(query.as_deref())?;
    let book = body.into_book(0);
    book_shape(&book, &links.author_ids, &links.category_ids)?;

    check_isbn_free(&state, None, &book.isbn).await?;
    check_links(&state, &links).await?;

    let book = state
        .book_repo
        .create_with_links(&links.author_ids, &links.category_ids, book)
        .await?;
    tracing::info!(
        book_id = book.id,
        authors = links.author_ids.len(),
        categories = links.category_ids.len(),
        "Book created"
    );

    Ok(created("books", book.id, BookDto::from(book)))
}

#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(
        ("id" = i32, Path, description = "Book id"),
        ("authId" = Vec<i32>, Query, description = "Author ids, repeated"),
        ("catId" = Vec<i32>, Query, description = "Category ids, repeated")
    ),
    request_body = BookBody,
    responses(
        (status = 204, description = "Book and its links replaced"),
        (status = 400, description = "Invalid book or id mismatch"),
        (status = 404, description = "Book, author or category not found"),
        (status = 422, description = "ISBN already in use")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    RawQuery(query): RawQuery,
    payload: Result<Json<BookBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(body) = payload?;
    let links = LinkIds::parse(query.as_deref())?;
    let body_id = body.id;
    let book = body.into_book(id);
    book_shape(&book, &links.author_ids, &links.category_ids)?;
    ids_match(id, body_id)?;

    if !state.book_repo.exists(id).await? {
        return Err(DomainError::not_found(format!("Book {} not found", id)).into());
    }

    check_isbn_free(&state, Some(id), &book.isbn).await?;
    check_links(&state, &links).await?;

    state
        .book_repo
        .update_with_links(&links.author_ids, &links.category_ids, book)
        .await?;
    tracing::info!(book_id = id, "Book updated");

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 204, description = "Book, its links and its reviews deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    if !state.book_repo.exists(id).await? {
        return Err(DomainError::not_found(format!("Book {} not found", id)).into());
    }

    state.book_repo.delete(id).await?;
    tracing::info!(book_id = id, "Book deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_ids_accept_repeated_params_in_any_case() {
        let links = LinkIds::parse(Some("authId=1&AUTHID=2&catid=3&other=x")).unwrap();
        assert_eq!(links.author_ids, vec![1, 2]);
        assert_eq!(links.category_ids, vec![3]);
    }

    #[test]
    fn link_ids_reject_non_integers() {
        let err = LinkIds::parse(Some("authId=one&catId=2")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn missing_query_yields_no_links() {
        assert_eq!(LinkIds::parse(None).unwrap(), LinkIds::default());
    }
}

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::dto::{AuthorBody, AuthorDto, BookDto};
use super::{created, found, to_dtos, ApiResult, IdPath};
use crate::domain::validation::{author_shape, ids_match, Violations};
use crate::domain::{DomainError, Repository};
use crate::infrastructure::AppState;

#[utoipa::path(
    get,
    path = "/api/authors",
    responses(
        (status = 200, description = "All authors ordered by last name", body = [AuthorDto])
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> ApiResult<Json<Vec<AuthorDto>>> {
    let authors = state.author_repo.find_all().await?;
    Ok(to_dtos(authors))
}

#[utoipa::path(
    get,
    path = "/api/authors/{id}",
    params(("id" = i32, Path, description = "Author id")),
    responses(
        (status = 200, description = "Author found", body = AuthorDto),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<AuthorDto>> {
    let author = found(state.author_repo.find_by_id(id).await?, || {
        format!("Author {} not found", id)
    })?;
    Ok(Json(author.into()))
}

#[utoipa::path(
    get,
    path = "/api/authors/{id}/books",
    params(("id" = i32, Path, description = "Author id")),
    responses(
        (status = 200, description = "Books written by the author", body = [BookDto]),
        (status = 404, description = "Author not found")
    )
)]
pub async fn books_of_author(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Vec<BookDto>>> {
    if !state.author_repo.exists(id).await? {
        return Err(DomainError::not_found(format!("Author {} not found", id)).into());
    }

    let books = state.author_repo.books_of_author(id).await?;
    Ok(to_dtos(books))
}

#[utoipa::path(
    get,
    path = "/api/authors/{id}/authors",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Authors of the book", body = [AuthorDto]),
        (status = 404, description = "Book not found")
    )
)]
pub async fn authors_of_book(
    State(state): State<AppState>,
    IdPath(book_id): IdPath,
) -> ApiResult<Json<Vec<AuthorDto>>> {
    if !state.book_repo.exists(book_id).await? {
        return Err(DomainError::not_found(format!("Book {} not found", book_id)).into());
    }

    let authors = state.author_repo.authors_of_book(book_id).await?;
    Ok(to_dtos(authors))
}

#[utoipa::path(
    post,
    path = "/api/authors",
    request_body = AuthorBody,
    responses(
        (status = 201, description = "Author created", body = AuthorDto),
        (status = 400, description = "Invalid author"),
        (status = 404, description = "Country not found"),
        (status = 422, description = "An author with this name already exists")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    payload: Result<Json<AuthorBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = payload?;
    let author = body.into_author(0);
    author_shape(&author)?;

    if state
        .author_repo
        .find_by_name(&author.first_name, &author.last_name)
        .await?
        .is_some()
    {
        return Err(DomainError::Duplicate(format!(
            "Author {} {} already exists",
            author.first_name.trim(),
            author.last_name.trim()
        ))
        .into());
    }

    if !state.country_repo.exists(author.country_id).await? {
        return Err(
            DomainError::not_found(format!("Country {} not found", author.country_id)).into(),
        );
    }

    let author = state.author_repo.create(author).await?;
    tracing::info!(author_id = author.id, "Author created");

    Ok(created("authors", author.id, AuthorDto::from(author)))
}

#[utoipa::path(
    put,
    path = "/api/authors/{id}",
    params(("id" = i32, Path, description = "Author id")),
    request_body = AuthorBody,
    responses(
        (status = 204, description = "Author updated"),
        (status = 400, description = "Invalid author or id mismatch"),
        (status = 404, description = "Author or country not found")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    payload: Result<Json<AuthorBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(body) = payload?;
    let body_id = body.id;
    let author = body.into_author(id);
    author_shape(&author)?;
    ids_match(id, body_id)?;

    let mut missing = Violations::new();
    missing.check(
        state.author_repo.exists(id).await?,
        format!("Author {} not found", id),
    );
    missing.check(
        state.country_repo.exists(author.country_id).await?,
        format!("Country {} not found", author.country_id),
    );
    missing.finish(DomainError::NotFound)?;

    state.author_repo.update(author).await?;
    tracing::info!(author_id = id, "Author updated");

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/authors/{id}",
    params(("id" = i32, Path, description = "Author id")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Author still has books")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    if !state.author_repo.exists(id).await? {
        return Err(DomainError::not_found(format!("Author {} not found", id)).into());
    }

    if !state.author_repo.books_of_author(id).await?.is_empty() {
        return Err(DomainError::Conflict(format!(
            "Author {} cannot be deleted because it has at least one book",
            id
        ))
        .into());
    }

    state.author_repo.delete(id).await?;
    tracing::info!(author_id = id, "Author deleted");

    Ok(StatusCode::NO_CONTENT)
}

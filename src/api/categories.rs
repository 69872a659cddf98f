use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::dto::{BookDto, CategoryDto, NameBody};
use super::{created, found, to_dtos, ApiResult, IdPath};
use crate::domain::validation::{category_shape, ids_match};
use crate::domain::{Category, DomainError, Repository};
use crate::infrastructure::AppState;

async fn check_name_free(
    state: &AppState,
    exclude_id: Option<i32>,
    name: &str,
) -> Result<(), DomainError> {
    if state.category_repo.is_duplicate_name(exclude_id, name).await? {
        return Err(DomainError::Duplicate(format!(
            "Category {} already exists",
            name.trim()
        )));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "All categories ordered by name", body = [CategoryDto])
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CategoryDto>>> {
    let categories = state.category_repo.find_all().await?;
    Ok(to_dtos(categories))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = CategoryDto),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<CategoryDto>> {
    let category = found(state.category_repo.find_by_id(id).await?, || {
        format!("Category {} not found", id)
    })?;
    Ok(Json(category.into()))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}/books",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Books in the category", body = [BookDto]),
        (status = 404, description = "Category not found")
    )
)]
pub async fn books_of_category(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Vec<BookDto>>> {
    if !state.category_repo.exists(id).await? {
        return Err(DomainError::not_found(format!("Category {} not found", id)).into());
    }

    let books = state.category_repo.books_of_category(id).await?;
    Ok(to_dtos(books))
}

#[utoipa::path(
    get,
    path = "/api/categories/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Categories of the book", body = [CategoryDto]),
        (status = 404, description = "Book not found")
    )
)]
pub async fn categories_of_book(
    State(state): State<AppState>,
    IdPath(book_id): IdPath,
) -> ApiResult<Json<Vec<CategoryDto>>> {
    if !state.book_repo.exists(book_id).await? {
        return Err(DomainError::not_found(format!("Book {} not found", book_id)).into());
    }

    let categories = state.category_repo.categories_of_book(book_id).await?;
    Ok(to_dtos(categories))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = NameBody,
    responses(
        (status = 201, description = "Category created", body = CategoryDto),
        (status = 400, description = "Invalid category"),
        (status = 422, description = "Category name already in use")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<NameBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = payload?;
    let category = Category {
        id: 0,
        name: body.name,
    };
    category_shape(&category)?;
    check_name_free(&state, None, &category.name).await?;

    let category = state.category_repo.create(category).await?;
    tracing::info!(category_id = category.id, "Category created");

    Ok(created("categories", category.id, CategoryDto::from(category)))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    request_body = NameBody,
    responses(
        (status = 204, description = "Category updated"),
        (status = 400, description = "Invalid category or id mismatch"),
        (status = 404, description = "Category not found"),
        (status = 422, description = "Category name already in use")
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    payload: Result<Json<NameBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(body) = payload?;
    let category = Category {
        id,
        name: body.name,
    };
    category_shape(&category)?;
    ids_match(id, body.id)?;

    if !state.category_repo.exists(id).await? {
        return Err(DomainError::not_found(format!("Category {} not found", id)).into());
    }

    check_name_free(&state, Some(id), &category.name).await?;

    state.category_repo.update(category).await?;
    tracing::info!(category_id = id, "Category updated");

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category still used by a book")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    if !state.category_repo.exists(id).await? {
        return Err(DomainError::not_found(format!("Category {} not found", id)).into());
    }

    if !state.category_repo.books_of_category(id).await?.is_empty() {
        return Err(DomainError::Conflict(format!(
            "Category {} cannot be deleted because it is used by at least one book",
            id
        ))
        .into());
    }

    state.category_repo.delete(id).await?;
    tracing::info!(category_id = id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}

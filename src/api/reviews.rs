use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::dto::{BookDto, ReviewBody, ReviewDto};
use super::{created, found, to_dtos, ApiResult, IdPath};
use crate::domain::validation::{ids_match, review_shape, Violations};
use crate::domain::{DomainError, Repository, Review};
use crate::infrastructure::AppState;

/// Book and reviewer are re-resolved from the store; both misses are reported together.
async fn check_references(state: &AppState, review: &Review) -> Result<(), DomainError> {
    let mut missing = Violations::new();
    missing.check(
        state.book_repo.exists(review.book_id).await?,
        format!("Book {} not found", review.book_id),
    );
    missing.check(
        state.reviewer_repo.exists(review.reviewer_id).await?,
        format!("Reviewer {} not found", review.reviewer_id),
    );
    missing.finish(DomainError::NotFound)
}

#[utoipa::path(
    get,
    path = "/api/reviews",
    responses(
        (status = 200, description = "All reviews", body = [ReviewDto])
    )
)]
pub async fn list_reviews(State(state): State<AppState>) -> ApiResult<Json<Vec<ReviewDto>>> {
    let reviews = state.review_repo.find_all().await?;
    Ok(to_dtos(reviews))
}

#[utoipa::path(
    get,
    path = "/api/reviews/{id}",
    params(("id" = i32, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review found", body = ReviewDto),
        (status = 404, description = "Review not found")
    )
)]
pub async fn get_review(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ReviewDto>> {
    let review = found(state.review_repo.find_by_id(id).await?, || {
        format!("Review {} not found", id)
    })?;
    Ok(Json(review.into()))
}

#[utoipa::path(
    get,
    path = "/api/reviews/{id}/reviews",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Reviews of the book", body = [ReviewDto]),
        (status = 404, description = "Book not found")
    )
)]
pub async fn reviews_of_book(
    State(state): State<AppState>,
    IdPath(book_id): IdPath,
) -> ApiResult<Json<Vec<ReviewDto>>> {
    if !state.book_repo.exists(book_id).await? {
        return Err(DomainError::not_found(format!("Book {} not found", book_id)).into());
    }

    let reviews = state.review_repo.reviews_of_book(book_id).await?;
    Ok(to_dtos(reviews))
}

#[utoipa::path(
    get,
    path = "/api/reviews/{id}/book",
    params(("id" = i32, Path, description = "Review id")),
    responses(
        (status = 200, description = "Reviewed book", body = BookDto),
        (status = 404, description = "Review not found")
    )
)]
pub async fn book_of_review(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<BookDto>> {
    let book = found(state.review_repo.book_of_review(id).await?, || {
        format!("Review {} not found", id)
    })?;
    Ok(Json(book.into()))
}

#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = ReviewBody,
    responses(
        (status = 201, description = "Review created", body = ReviewDto),
        (status = 400, description = "Invalid review"),
        (status = 404, description = "Book or reviewer not found")
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    payload: Result<Json<ReviewBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = payload?;
    let review = body.into_review(0);
    review_shape(&review)?;
    check_references(&state, &review).await?;

    let review = state.review_repo.create(review).await?;
    tracing::info!(
        review_id = review.id,
        book_id = review.book_id,
        reviewer_id = review.reviewer_id,
        "Review created"
    );

    Ok(created("reviews", review.id, ReviewDto::from(review)))
}

#[utoipa::path(
    put,
    path = "/api/reviews/{id}",
    params(("id" = i32, Path, description = "Review id")),
    request_body = ReviewBody,
    responses(
        (status = 204, description = "Review updated"),
        (status = 400, description = "Invalid review or id mismatch"),
        (status = 404, description = "Review, book or reviewer not found")
    )
)]
pub async fn update_review(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    payload: Result<Json<ReviewBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(body) = payload?;
    let body_id = body.id;
    let review = body.into_review(id);
    review_shape(&review)?;
    ids_match(id, body_id)?;

    if !state.review_repo.exists(id).await? {
        return Err(DomainError::not_found(format!("Review {} not found", id)).into());
    }

    check_references(&state, &review).await?;

    state.review_repo.update(review).await?;
    tracing::info!(review_id = id, "Review updated");

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    params(("id" = i32, Path, description = "Review id")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn delete_review(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    if !state.review_repo.exists(id).await? {
        return Err(DomainError::not_found(format!("Review {} not found", id)).into());
    }

    state.review_repo.delete(id).await?;
    tracing::info!(review_id = id, "Review deleted");

    Ok(StatusCode::NO_CONTENT)
}

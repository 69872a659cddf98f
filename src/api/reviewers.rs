use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::dto::{ReviewDto, ReviewerBody, ReviewerDto};
use super::{created, found, to_dtos, ApiResult, IdPath};
use crate::domain::validation::{ids_match, reviewer_shape};
use crate::domain::{DomainError, Repository};
use crate::infrastructure::AppState;

#[utoipa::path(
    get,
    path = "/api/reviewers",
    responses(
        (status = 200, description = "All reviewers ordered by last name", body = [ReviewerDto])
    )
)]
pub async fn list_reviewers(State(state): State<AppState>) -> ApiResult<Json<Vec<ReviewerDto>>> {
    let reviewers = state.reviewer_repo.find_all().await?;
    Ok(to_dtos(reviewers))
}

#[utoipa::path(
    get,
    path = "/api/reviewers/{id}",
    params(("id" = i32, Path, description = "Reviewer id")),
    responses(
        (status = 200, description = "Reviewer found", body = ReviewerDto),
        (status = 404, description = "Reviewer not found")
    )
)]
pub async fn get_reviewer(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ReviewerDto>> {
    let reviewer = found(state.reviewer_repo.find_by_id(id).await?, || {
        format!("Reviewer {} not found", id)
    })?;
    Ok(Json(reviewer.into()))
}

#[utoipa::path(
    get,
    path = "/api/reviewers/{id}/reviews",
    params(("id" = i32, Path, description = "Reviewer id")),
    responses(
        (status = 200, description = "Reviews written by the reviewer", body = [ReviewDto]),
        (status = 404, description = "Reviewer not found")
    )
)]
pub async fn reviews_of_reviewer(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Vec<ReviewDto>>> {
    if !state.reviewer_repo.exists(id).await? {
        return Err(DomainError::not_found(format!("Reviewer {} not found", id)).into());
    }

    let reviews = state.reviewer_repo.reviews_of_reviewer(id).await?;
    Ok(to_dtos(reviews))
}

#[utoipa::path(
    get,
    path = "/api/reviewers/{id}/reviewer",
    params(("id" = i32, Path, description = "Review id")),
    responses(
        (status = 200, description = "Author of the review", body = ReviewerDto),
        (status = 404, description = "Review not found")
    )
)]
pub async fn reviewer_of_review(
    State(state): State<AppState>,
    IdPath(review_id): IdPath,
) -> ApiResult<Json<ReviewerDto>> {
    let reviewer = found(
        state.reviewer_repo.reviewer_of_review(review_id).await?,
        || format!("Review {} not found", review_id),
    )?;
    Ok(Json(reviewer.into()))
}

#[utoipa::path(
    post,
    path = "/api/reviewers",
    request_body = ReviewerBody,
    responses(
        (status = 201, description = "Reviewer created", body = ReviewerDto),
        (status = 400, description = "Invalid reviewer"),
        (status = 422, description = "A reviewer with this name already exists")
    )
)]
pub async fn create_reviewer(
    State(state): State<AppState>,
    payload: Result<Json<ReviewerBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = payload?;
    let reviewer = body.into_reviewer(0);
    reviewer_shape(&reviewer)?;

    if state
        .reviewer_repo
        .find_by_name(&reviewer.first_name, &reviewer.last_name)
        .await?
        .is_some()
    {
        return Err(DomainError::Duplicate(format!(
            "Reviewer {} {} already exists",
            reviewer.first_name.trim(),
            reviewer.last_name.trim()
        ))
        .into());
    }

    let reviewer = state.reviewer_repo.create(reviewer).await?;
    tracing::info!(reviewer_id = reviewer.id, "Reviewer created");

    Ok(created("reviewers", reviewer.id, ReviewerDto::from(reviewer)))
}

#[utoipa::path(
    put,
    path = "/api/reviewers/{id}",
    params(("id" = i32, Path, description = "Reviewer id")),
    request_body = ReviewerBody,
    responses(
        (status = 204, description = "Reviewer updated"),
        (status = 400, description = "Invalid reviewer or id mismatch"),
        (status = 404, description = "Reviewer not found")
    )
)]
pub async fn update_reviewer(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    payload: Result<Json<ReviewerBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(body) = payload?;
    let body_id = body.id;
    let reviewer = body.into_reviewer(id);
    reviewer_shape(&reviewer)?;
    ids_match(id, body_id)?;

    if !state.reviewer_repo.exists(id).await? {
        return Err(DomainError::not_found(format!("Reviewer {} not found", id)).into());
    }

    state.reviewer_repo.update(reviewer).await?;
    tracing::info!(reviewer_id = id, "Reviewer updated");

    Ok(StatusCode::NO_CONTENT)
}

/// Removes the reviewer together with every review they wrote.
#[utoipa::path(
    delete,
    path = "/api/reviewers/{id}",
    params(("id" = i32, Path, description = "Reviewer id")),
    responses(
        (status = 204, description = "Reviewer and their reviews deleted"),
        (status = 404, description = "Reviewer not found")
    )
)]
pub async fn delete_reviewer(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    if !state.reviewer_repo.exists(id).await? {
        return Err(DomainError::not_found(format!("Reviewer {} not found", id)).into());
    }

    state.reviewer_repo.delete(id).await?;
    tracing::info!(reviewer_id = id, "Reviewer deleted");

    Ok(StatusCode::NO_CONTENT)
}

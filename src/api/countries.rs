use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::dto::{AuthorDto, CountryDto, NameBody};
use super::{created, found, to_dtos, ApiResult, IdPath};
use crate::domain::validation::{country_shape, ids_match};
use crate::domain::{Country, DomainError, Repository};
use crate::infrastructure::AppState;

async fn check_name_free(
    state: &AppState,
    exclude_id: Option<i32>,
    name: &str,
) -> Result<(), DomainError> {
    if state.country_repo.is_duplicate_name(exclude_id, name).await? {
        return Err(DomainError::Duplicate(format!(
            "Country {} already exists",
            name.trim()
        )));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/countries",
    responses(
        (status = 200, description = "All countries ordered by name", body = [CountryDto])
    )
)]
pub async fn list_countries(State(state): State<AppState>) -> ApiResult<Json<Vec<CountryDto>>> {
    let countries = state.country_repo.find_all().await?;
    Ok(to_dtos(countries))
}

#[utoipa::path(
    get,
    path = "/api/countries/{id}",
    params(("id" = i32, Path, description = "Country id")),
    responses(
        (status = 200, description = "Country found", body = CountryDto),
        (status = 404, description = "Country not found")
    )
)]
pub async fn get_country(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<CountryDto>> {
    let country = found(state.country_repo.find_by_id(id).await?, || {
        format!("Country {} not found", id)
    })?;
    Ok(Json(country.into()))
}

#[utoipa::path(
    get,
    path = "/api/countries/{id}/authors",
    params(("id" = i32, Path, description = "Country id")),
    responses(
        (status = 200, description = "Authors from the country", body = [AuthorDto]),
        (status = 404, description = "Country not found")
    )
)]
pub async fn authors_of_country(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Vec<AuthorDto>>> {
    if !state.country_repo.exists(id).await? {
        return Err(DomainError::not_found(format!("Country {} not found", id)).into());
    }

    let authors = state.country_repo.authors_of_country(id).await?;
    Ok(to_dtos(authors))
}

#[utoipa::path(
    get,
    path = "/api/countries/authors/{id}",
    params(("id" = i32, Path, description = "Author id")),
    responses(
        (status = 200, description = "Country of the author", body = CountryDto),
        (status = 404, description = "Author not found")
    )
)]
pub async fn country_of_author(
    State(state): State<AppState>,
    IdPath(author_id): IdPath,
) -> ApiResult<Json<CountryDto>> {
    let country = found(state.country_repo.country_of_author(author_id).await?, || {
        format!("Author {} not found", author_id)
    })?;
    Ok(Json(country.into()))
}

#[utoipa::path(
    post,
    path = "/api/countries",
    request_body = NameBody,
    responses(
        (status = 201, description = "Country created", body = CountryDto),
        (status = 400, description = "Invalid country"),
        (status = 422, description = "Country name already in use")
    )
)]
pub async fn create_country(
    State(state): State<AppState>,
    payload: Result<Json<NameBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = payload?;
    let country = Country {
        id: 0,
        name: body.name,
    };
    country_shape(&country)?;
    check_name_free(&state, None, &country.name).await?;

    let country = state.country_repo.create(country).await?;
    tracing::info!(country_id = country.id, "Country created");

    Ok(created("countries", country.id, CountryDto::from(country)))
}

#[utoipa::path(
    put,
    path = "/api/countries/{id}",
    params(("id" = i32, Path, description = "Country id")),
    request_body = NameBody,
    responses(
        (status = 204, description = "Country updated"),
        (status = 400, description = "Invalid country or id mismatch"),
        (status = 404, description = "Country not found"),
        (status = 422, description = "Country name already in use")
    )
)]
pub async fn update_country(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    payload: Result<Json<NameBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(body) = payload?;
    let country = Country {
        id,
        name: body.name,
    };
    country_shape(&country)?;
    ids_match(id, body.id)?;

    if !state.country_repo.exists(id).await? {
        return Err(DomainError::not_found(format!("Country {} not found", id)).into());
    }

    check_name_free(&state, Some(id), &country.name).await?;

    state.country_repo.update(country).await?;
    tracing::info!(country_id = id, "Country updated");

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/countries/{id}",
    params(("id" = i32, Path, description = "Country id")),
    responses(
        (status = 204, description = "Country deleted"),
        (status = 404, description = "Country not found"),
        (status = 409, description = "Country still has authors")
    )
)]
pub async fn delete_country(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    if !state.country_repo.exists(id).await? {
        return Err(DomainError::not_found(format!("Country {} not found", id)).into());
    }

    if !state.country_repo.authors_of_country(id).await?.is_empty() {
        return Err(DomainError::Conflict(format!(
            "Country {} cannot be deleted because at least one author comes from it",
            id
        ))
        .into());
    }

    state.country_repo.delete(id).await?;
    tracing::info!(country_id = id, "Country deleted");

    Ok(StatusCode::NO_CONTENT)
}

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use common::types::Created;
use models::Identifier;

use crate::errors::JsonApiError;
use crate::serializers::{Deleted, SkillInput, SkillOut};
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    /// Substring of the skill name.
    pub term: Option<String>,
}

#[utoipa::path(
    get, path = "/v1/skills", tag = "skills",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching skills", body = [SkillOut]),
        (status = 400, description = "Empty term", body = crate::errors::ErrorBody)
    )
)]
pub async fn search(State(state): State<AppState>, Query(q): Query<SearchQuery>) -> Result<Json<Vec<SkillOut>>, JsonApiError> {
    let found = state.skills.search_by_term(q.term.as_deref().unwrap_or_default()).await?;
    Ok(Json(found.iter().map(SkillOut::from).collect()))
}

#[utoipa::path(
    get, path = "/v1/skills/{id}", tag = "skills",
    params(("id" = String, Path, description = "Skill id")),
    responses(
        (status = 200, description = "OK", body = SkillOut),
        (status = 404, description = "Not Found", body = crate::errors::ErrorBody)
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<SkillOut>, JsonApiError> {
    if !Identifier::is_valid(&id) {
        return Err(JsonApiError::not_found("skill not found"));
    }
    match state.skills.retrieve(&id).await? {
        Some(s) => Ok(Json(SkillOut::from(&s))),
        None => Err(JsonApiError::not_found("skill not found")),
    }
}

#[utoipa::path(
    post, path = "/v1/skills", tag = "skills",
    request_body = SkillInput,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error", body = crate::errors::ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<SkillInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Created>), JsonApiError> {
    let Json(input) = body?;
    let id = match input.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(Identifier::parse(raw).map_err(|e| JsonApiError::bad_request(e.to_string()))?),
        None => None,
    };
    let mut skill = input.into_skill(id)?;
    if !state.skills.save(&mut skill).await? {
        return Err(JsonApiError::bad_request("skill not saved"));
    }
    let id = skill.id.map(Identifier::into_inner).unwrap_or_default();
    info!(id = %id, "skill_create_request");
    Ok((StatusCode::CREATED, Json(Created { id })))
}

#[utoipa::path(
    put, path = "/v1/skills/{id}", tag = "skills",
    params(("id" = String, Path, description = "Skill id")),
    request_body = SkillInput,
    responses(
        (status = 200, description = "Saved", body = SkillOut),
        (status = 400, description = "Validation Error", body = crate::errors::ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<SkillInput>, JsonRejection>,
) -> Result<Json<SkillOut>, JsonApiError> {
    let id = Identifier::parse(&id).map_err(|e| JsonApiError::bad_request(e.to_string()))?;
    let Json(input) = body?;
    let mut skill = input.into_skill(Some(id.clone()))?;
    if !state.skills.save(&mut skill).await? {
        return Err(JsonApiError::bad_request("skill not saved"));
    }
    // re-read: an update keeps the stored `added`
    let stored = state.skills.retrieve(id.as_str()).await?.unwrap_or(skill);
    Ok(Json(SkillOut::from(&stored)))
}

#[utoipa::path(
    delete, path = "/v1/skills/{id}", tag = "skills",
    params(("id" = String, Path, description = "Skill id")),
    responses(
        (status = 200, description = "Deleted", body = Deleted),
        (status = 404, description = "Not Found", body = crate::errors::ErrorBody)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Deleted>, JsonApiError> {
    if !Identifier::is_valid(&id) || !state.skills.delete(&id).await? {
        return Err(JsonApiError::not_found("skill not found"));
    }
    Ok(Json(Deleted { id }))
}

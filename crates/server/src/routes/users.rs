use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use common::types::Created;
use models::Identifier;

use crate::errors::JsonApiError;
use crate::serializers::{
    Deleted, PartnershipOut, SkillOut, UserDetailOut, UserInput, UserOut, UserPartnershipsOut, UserSkillsOut,
};
use crate::state::AppState;

#[utoipa::path(
    get, path = "/v1/users", tag = "users",
    responses((status = 200, description = "All users by name", body = [UserOut]))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<UserOut>>, JsonApiError> {
    let users = state.users.retrieve_all().await?;
    Ok(Json(users.iter().map(UserOut::from).collect()))
}

#[utoipa::path(
    get, path = "/v1/users/{id}", tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User with skills and partnerships", body = UserDetailOut),
        (status = 404, description = "Not Found", body = crate::errors::ErrorBody)
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<UserDetailOut>, JsonApiError> {
    let user = state.users.require(&id).await?;
    let teaching = state.skills.retrieve_by_ids(&user.teaching).await?;
    let learning = state.skills.retrieve_by_ids(&user.learning).await?;
    let mentoring = state.partnerships.retrieve_by_mentor(&id).await?;
    let apprenticing = state.partnerships.retrieve_by_apprentice(&id).await?;
    Ok(Json(UserDetailOut {
        user: UserOut::from(&user),
        skills: UserSkillsOut {
            teaching: teaching.iter().map(SkillOut::from).collect(),
            learning: learning.iter().map(SkillOut::from).collect(),
        },
        partnerships: UserPartnershipsOut {
            mentoring: mentoring.iter().map(PartnershipOut::from).collect(),
            apprenticing: apprenticing.iter().map(PartnershipOut::from).collect(),
        },
    }))
}

#[utoipa::path(
    post, path = "/v1/users", tag = "users",
    request_body = UserInput,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error", body = crate::errors::ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<UserInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Created>), JsonApiError> {
    let Json(input) = body?;
    let id = match input.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(Identifier::parse(raw).map_err(|e| JsonApiError::bad_request(e.to_string()))?),
        None => None,
    };
    let mut user = input.into_user(id)?;
    if !state.users.create(&mut user).await? {
        return Err(JsonApiError::bad_request("user id already taken"));
    }
    let id = user.id.map(Identifier::into_inner).unwrap_or_default();
    info!(id = %id, "user_create_request");
    Ok((StatusCode::CREATED, Json(Created { id })))
}

#[utoipa::path(
    put, path = "/v1/users/{id}", tag = "users",
    params(("id" = String, Path, description = "User id")),
    request_body = UserInput,
    responses(
        (status = 200, description = "Updated", body = UserOut),
        (status = 400, description = "Validation Error", body = crate::errors::ErrorBody),
        (status = 404, description = "Not Found", body = crate::errors::ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UserInput>, JsonRejection>,
) -> Result<Json<UserOut>, JsonApiError> {
    let id = Identifier::parse(&id).map_err(|e| JsonApiError::bad_request(e.to_string()))?;
    let Json(input) = body?;
    let user = input.into_user(Some(id))?;
    if !state.users.update(&user).await? {
        return Err(JsonApiError::not_found("user not found"));
    }
    Ok(Json(UserOut::from(&user)))
}

#[utoipa::path(
    delete, path = "/v1/users/{id}", tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted", body = Deleted),
        (status = 404, description = "Not Found", body = crate::errors::ErrorBody)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Deleted>, JsonApiError> {
    if !Identifier::is_valid(&id) || !state.users.delete(&id).await? {
        return Err(JsonApiError::not_found("user not found"));
    }
    Ok(Json(Deleted { id }))
}

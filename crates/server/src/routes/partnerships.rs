use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::error;

use common::types::Created;
use models::Identifier;
use service::partnership::Role;

use crate::errors::JsonApiError;
use crate::serializers::{Deleted, PartnershipInput, PartnershipOut};
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct RoleQuery {
    /// `mentor` or `apprentice`; otherwise `id` is a partnership id.
    pub role: Option<String>,
}

#[utoipa::path(
    get, path = "/v1/partnerships/{id}", tag = "partnerships",
    params(("id" = String, Path, description = "User id, or partnership id without a role"), RoleQuery),
    responses(
        (status = 200, description = "Matching partnerships", body = [PartnershipOut]),
        (status = 404, description = "Nothing matched", body = crate::errors::ErrorBody)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<RoleQuery>,
) -> Result<Json<Vec<PartnershipOut>>, JsonApiError> {
    if !Identifier::is_valid(&id) {
        return Err(JsonApiError::not_found("no partnership found"));
    }
    let role = q.role.as_deref().and_then(Role::parse);
    let found = state.partnerships.retrieve_by_role(role, &id).await?;
    if found.is_empty() {
        return Err(JsonApiError::not_found("no partnership found"));
    }
    Ok(Json(found.iter().map(PartnershipOut::from).collect()))
}

#[utoipa::path(
    post, path = "/v1/partnerships", tag = "partnerships",
    request_body = PartnershipInput,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error", body = crate::errors::ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<PartnershipInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Created>), JsonApiError> {
    let Json(input) = body?;
    match state.partnerships.create(input.mentor.trim(), input.apprentice.trim()).await? {
        Some(id) => Ok((StatusCode::CREATED, Json(Created { id: id.into_inner() }))),
        None => {
            error!(mentor = %input.mentor, apprentice = %input.apprentice, "partnership upsert wrote no row");
            Err(JsonApiError::internal())
        }
    }
}

#[utoipa::path(
    delete, path = "/v1/partnerships/{id}", tag = "partnerships",
    params(("id" = String, Path, description = "Partnership id")),
    responses(
        (status = 200, description = "Deleted", body = Deleted),
        (status = 400, description = "Malformed id", body = crate::errors::ErrorBody),
        (status = 404, description = "Not Found", body = crate::errors::ErrorBody)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Deleted>, JsonApiError> {
    if !Identifier::is_valid(&id) {
        return Err(JsonApiError::bad_request("malformed partnership id"));
    }
    if !state.partnerships.delete(&id).await? {
        return Err(JsonApiError::not_found("partnership not found"));
    }
    Ok(Json(Deleted { id }))
}

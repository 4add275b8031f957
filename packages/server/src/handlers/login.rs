use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::login;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::Identity;
use crate::extractors::json::AppJson;
use crate::models::login::{LoginPayload, LoginResponse, UpdateLoginRequest};
use crate::models::shared::{DeleteResponse, InsertResponse, UpdateResponse};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Logins",
    operation_id = "listLogins",
    summary = "List the caller's credential records",
    description = "Returns every record owned by the authenticated identity. \
        No pagination; store order.",
    responses(
        (status = 200, description = "Credential records", body = [LoginResponse]),
        (status = 401, description = "Unauthenticated (UNAUTHENTICATED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(identity, state), fields(owner = %identity.user.external_id))]
pub async fn list_logins(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<LoginResponse>>, AppError> {
    let records = login::Entity::find()
        .filter(login::Column::OwnerId.eq(&identity.user.external_id))
        .all(&state.db)
        .await?;

    Ok(Json(records.into_iter().map(LoginResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Logins",
    operation_id = "createLogins",
    summary = "Create credential records (batch)",
    description = "Body is a non-empty JSON array of records. The owner id is \
        stamped server-side on every element; the batch is written in a single \
        insert, all-or-nothing.",
    request_body = [LoginPayload],
    responses(
        (status = 201, description = "Records created", body = InsertResponse),
        (status = 400, description = "Empty or malformed batch (INVALID_INPUT)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (UNAUTHENTICATED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(identity, state, payload), fields(owner = %identity.user.external_id))]
pub async fn create_logins(
    identity: Identity,
    State(state): State<AppState>,
    AppJson(payload): AppJson<Vec<LoginPayload>>,
) -> Result<(StatusCode, Json<InsertResponse>), AppError> {
    if payload.is_empty() {
        return Err(AppError::Validation("No data to insert".into()));
    }

    let owner = identity.user.external_id;
    let count = payload.len() as u64;

    let models: Vec<login::ActiveModel> = payload
        .into_iter()
        .map(|item| login::ActiveModel {
            id: Set(Uuid::now_v7()),
            record_id: Set(item.id.unwrap_or_else(|| Uuid::new_v4().to_string())),
            owner_id: Set(owner.clone()),
            site: Set(item.site),
            username: Set(item.username),
            password: Set(item.password),
            strength: Set(item.strength),
        })
        .collect();

    login::Entity::insert_many(models).exec(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(InsertResponse {
            success: true,
            inserted_count: count,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Logins",
    operation_id = "updateLogin",
    summary = "Update a credential record",
    description = "Field-level merge on the record matching the id and the caller. \
        A zero-match update silently succeeds with `modifiedCount: 0`.",
    params(("id" = String, Path, description = "Client-generated record id")),
    request_body = UpdateLoginRequest,
    responses(
        (status = 200, description = "Update result", body = UpdateResponse),
        (status = 401, description = "Unauthenticated (UNAUTHENTICATED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(identity, state, payload), fields(owner = %identity.user.external_id, record_id = %id))]
pub async fn update_login(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateLoginRequest>,
) -> Result<Json<UpdateResponse>, AppError> {
    let mut changes = login::ActiveModel {
        ..Default::default()
    };
    if let Some(site) = payload.site {
        changes.site = Set(site);
    }
    if let Some(username) = payload.username {
        changes.username = Set(username);
    }
    if let Some(password) = payload.password {
        changes.password = Set(password);
    }
    if let Some(strength) = payload.strength {
        changes.strength = Set(Some(strength));
    }

    if !changes.is_changed() {
        return Ok(Json(UpdateResponse {
            success: true,
            modified_count: 0,
        }));
    }

    let result = login::Entity::update_many()
        .set(changes)
        .filter(login::Column::RecordId.eq(&id))
        .filter(login::Column::OwnerId.eq(&identity.user.external_id))
        .exec(&state.db)
        .await?;

    Ok(Json(UpdateResponse {
        success: true,
        modified_count: result.rows_affected,
    }))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Logins",
    operation_id = "deleteLogin",
    summary = "Delete a credential record",
    description = "Deletes the record matching the id and the caller. A zero-match \
        delete silently succeeds with `deletedCount: 0`.",
    params(("id" = String, Path, description = "Client-generated record id")),
    responses(
        (status = 200, description = "Delete result", body = DeleteResponse),
        (status = 401, description = "Unauthenticated (UNAUTHENTICATED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(identity, state), fields(owner = %identity.user.external_id, record_id = %id))]
pub async fn delete_login(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let result = login::Entity::delete_many()
        .filter(login::Column::RecordId.eq(&id))
        .filter(login::Column::OwnerId.eq(&identity.user.external_id))
        .exec(&state.db)
        .await?;

    Ok(Json(DeleteResponse {
        success: true,
        deleted_count: result.rows_affected,
    }))
}

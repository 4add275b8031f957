use axum::extract::State;
use axum::Json;
use serde_json::Value;
use tracing::instrument;

use crate::clients::passwords;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::Identity;
use crate::extractors::json::AppJson;
use crate::models::password::StrengthRequest;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/passwords",
    tag = "Passwords",
    operation_id = "classifyPassword",
    summary = "Classify password strength",
    description = "Forwards the candidate secret to the external strength \
        classifier and returns its response verbatim. No retry on failure.",
    request_body = StrengthRequest,
    responses(
        (status = 200, description = "Classifier response, passed through"),
        (status = 400, description = "Missing password (INVALID_INPUT)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (UNAUTHENTICATED)", body = ErrorBody),
        (status = 502, description = "Classifier failure (UPSTREAM_FAILURE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, payload), fields(owner = %_identity.user.external_id))]
pub async fn classify_password(
    _identity: Identity,
    State(state): State<AppState>,
    AppJson(payload): AppJson<StrengthRequest>,
) -> Result<Json<Value>, AppError> {
    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation("Missing password".into()))?;

    let verdict =
        passwords::classify_strength(&state.http, &state.config.passwords, &password).await?;

    Ok(Json(verdict))
}

#[utoipa::path(
    get,
    path = "/generatePassword",
    tag = "Passwords",
    operation_id = "generatePassword",
    summary = "Generate a random password",
    description = "Calls the external generator service and returns its response \
        verbatim. Used by the client to prefill the secret field.",
    responses(
        (status = 200, description = "Generator response, passed through"),
        (status = 502, description = "Generator failure (UPSTREAM_FAILURE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn generate_password(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let generated = passwords::generate(&state.http, &state.config.passwords).await?;
    Ok(Json(generated))
}

use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use sea_orm::*;
use serde::Deserialize;
use tracing::instrument;

use crate::clients::google;
use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::MaybeIdentity;
use crate::models::auth::{AuthStatusResponse, LogoutResponse};
use crate::sessions;
use crate::state::AppState;
use crate::utils::token;

/// Query parameters the provider sends to the callback.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[utoipa::path(
    get,
    path = "/google",
    tag = "Auth",
    operation_id = "beginGoogleLogin",
    summary = "Begin federated login",
    description = "Redirects the browser to the identity provider with scopes \
        `openid profile email`. If provider credentials are not configured, \
        redirects back to the client with an error marker instead.",
    responses((status = 307, description = "Redirect to the identity provider")),
)]
#[instrument(skip(state))]
pub async fn google_login(State(state): State<AppState>) -> Redirect {
    if !google::is_configured(&state.config.auth) {
        tracing::warn!("Login attempted but identity provider is not configured");
        return client_redirect(&state, "error", "provider_not_configured");
    }

    Redirect::temporary(&google::authorize_url(&state.config.auth))
}

#[utoipa::path(
    get,
    path = "/google/callback",
    tag = "Auth",
    operation_id = "completeGoogleLogin",
    summary = "Complete federated login",
    description = "Exchanges the provider's code, finds or creates the local user, \
        establishes the server-side session, and redirects to the client with the \
        bearer token as a `token` query parameter. Every failure redirects to the \
        client with an `error` marker; no raw error page is ever shown.",
    params(
        ("code" = Option<String>, Query, description = "Authorization code"),
        ("error" = Option<String>, Query, description = "Provider-side error marker"),
    ),
    responses((status = 307, description = "Redirect to the client application")),
)]
#[instrument(skip(state, jar, params))]
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> (CookieJar, Redirect) {
    if let Some(provider_error) = params.error {
        tracing::warn!("Provider returned error: {provider_error}");
        return (jar, client_redirect(&state, "error", "access_denied"));
    }

    let Some(code) = params.code else {
        return (jar, client_redirect(&state, "error", "missing_code"));
    };

    let existing_session = jar
        .get(sessions::SESSION_COOKIE)
        .map(|c| c.value().to_owned());

    match complete_login(&state, &code, existing_session.as_deref()).await {
        Ok((bearer, session_id)) => {
            let jar = jar.add(sessions::build_cookie(&state.config, session_id));
            (jar, client_redirect(&state, "token", &bearer))
        }
        Err(err) => {
            let marker = match &err {
                AppError::Validation(_) => "profile_incomplete",
                AppError::Upstream(_) => "provider_error",
                _ => "login_failed",
            };
            tracing::warn!("Login failed: {err:?}");
            (jar, client_redirect(&state, "error", marker))
        }
    }
}

#[utoipa::path(
    get,
    path = "/logout",
    tag = "Auth",
    operation_id = "logout",
    summary = "End the server-side session",
    description = "Destroys the session and clears the cookie. An already-issued \
        bearer token cannot be revoked and stays valid until its 30-day window \
        closes; this is a documented limitation.",
    responses(
        (status = 200, description = "Session ended", body = LogoutResponse),
        (status = 500, description = "Session store failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<LogoutResponse>), AppError> {
    if let Some(cookie) = jar.get(sessions::SESSION_COOKIE) {
        sessions::destroy(&state.db, cookie.value()).await?;
    }

    Ok((
        jar.remove(sessions::removal_cookie()),
        Json(LogoutResponse {
            message: "Logged out successfully",
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/user",
    tag = "Auth",
    operation_id = "currentUser",
    summary = "Current authentication status",
    description = "Resolves the caller's identity (bearer token, then session) and \
        returns it. Unauthenticated callers get `user: null` rather than a 401.",
    responses((status = 200, description = "Authentication status", body = AuthStatusResponse)),
    security((), ("jwt" = [])),
)]
#[instrument(skip(identity))]
pub async fn current_user(MaybeIdentity(identity): MaybeIdentity) -> Json<AuthStatusResponse> {
    let is_authenticated = identity.is_some();
    Json(AuthStatusResponse {
        user: identity.map(Into::into),
        is_authenticated,
    })
}

/// Run the provider exchange and establish local state.
///
/// Returns the minted bearer token and the session id (reused when the
/// browser already holds a live session).
async fn complete_login(
    state: &AppState,
    code: &str,
    existing_session: Option<&str>,
) -> Result<(String, String), AppError> {
    let access_token = google::exchange_code(&state.http, &state.config.auth, code).await?;
    let profile = google::fetch_profile(&state.http, &state.config.auth, &access_token).await?;

    let user = find_or_create_user(&state.db, profile).await?;

    let bearer = token::sign(&user.external_id, &state.config.auth.token_secret)
        .map_err(|e| AppError::Internal(format!("Token sign error: {e}")))?;
    let session =
        sessions::establish(&state.db, existing_session, &user.external_id, &bearer).await?;

    Ok((bearer, session.id))
}

/// Look up a user by provider subject id, creating the row on first login.
///
/// A provider profile without an email cannot create a user.
async fn find_or_create_user(
    db: &DatabaseConnection,
    profile: google::Profile,
) -> Result<user::Model, AppError> {
    if let Some(existing) = user::Entity::find_by_id(&profile.sub).one(db).await? {
        return Ok(existing);
    }

    let email = profile
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Validation("Provider profile has no email".into()))?;

    let new_user = user::ActiveModel {
        external_id: Set(profile.sub.clone()),
        email: Set(email),
        name: Set(profile.name.unwrap_or_default()),
        picture: Set(profile.picture),
        created_at: Set(Utc::now()),
    };

    match new_user.insert(db).await {
        Ok(created) => Ok(created),
        // Two callbacks for the same subject racing: the other insert won.
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            user::Entity::find_by_id(&profile.sub)
                .one(db)
                .await?
                .ok_or_else(|| AppError::Internal("user missing after conflicting insert".into()))
        }
        Err(e) => Err(e.into()),
    }
}

fn client_redirect(state: &AppState, key: &str, value: &str) -> Redirect {
    Redirect::temporary(&format!("{}?{key}={value}", state.config.client.url))
}

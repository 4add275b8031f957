use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use sea_orm::EntityTrait;

use crate::entity::user;
use crate::error::AppError;
use crate::sessions;
use crate::state::AppState;
use crate::utils::token;

/// Authenticated caller, resolved once per request.
///
/// This is the single enforcement point for the record API: every `/api`
/// handler takes it as a parameter, so unauthenticated calls are refused
/// before any store access. Resolution order: bearer token in the
/// `Authorization` header, then the server-side session cookie.
#[derive(Debug)]
pub struct Identity {
    pub user: user::Model,
}

/// Tolerant variant for `/auth/user`: resolution failures become `None`
/// instead of a 401.
pub struct MaybeIdentity(pub Option<user::Model>);

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = resolve(parts, state).await?.ok_or(AppError::Unauthenticated)?;
        Ok(Identity { user })
    }
}

impl FromRequestParts<AppState> for MaybeIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(resolve(parts, state).await.unwrap_or(None)))
    }
}

/// Resolve the caller's identity, if any.
///
/// A present-but-invalid bearer token (bad signature, outside the 30-day
/// window, or issued in the future) is a hard rejection; there is no
/// fallback to the session for such requests.
async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<user::Model>, AppError> {
    let bearer = parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if let Some(raw) = bearer {
        let claims = token::verify(raw, &state.config.auth.token_secret)
            .map_err(|_| AppError::Unauthenticated)?;
        return Ok(user::Entity::find_by_id(&claims.sub)
            .one(&state.db)
            .await?);
    }

    let jar = CookieJar::from_headers(&parts.headers);
    let Some(cookie) = jar.get(sessions::SESSION_COOKIE) else {
        return Ok(None);
    };

    let Some(session) = sessions::resolve(&state.db, cookie.value()).await? else {
        return Ok(None);
    };

    Ok(user::Entity::find_by_id(&session.user_id)
        .one(&state.db)
        .await?)
}

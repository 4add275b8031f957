use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use sea_orm::*;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::entity::session;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "passbank-session";

/// Sessions (and their cookie) live this long.
pub const SESSION_TTL_DAYS: i64 = 12;

/// Record a completed login and return the session.
///
/// When the browser already holds a live session its row is reused: the
/// identity, token, and expiry are refreshed and `login_count` goes up by
/// one. Otherwise a fresh session is created.
pub async fn establish<C: ConnectionTrait>(
    db: &C,
    existing_id: Option<&str>,
    user_id: &str,
    token: &str,
) -> Result<session::Model, DbErr> {
    let now = Utc::now();
    let expiry = now + Duration::days(SESSION_TTL_DAYS);

    if let Some(id) = existing_id {
        if let Some(current) = resolve(db, id).await? {
            let mut active: session::ActiveModel = current.clone().into();
            active.user_id = Set(user_id.to_owned());
            active.token = Set(token.to_owned());
            active.login_count = Set(current.login_count + 1);
            active.expiry_date = Set(expiry);
            return active.update(db).await;
        }
    }

    let model = session::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id.to_owned()),
        token: Set(token.to_owned()),
        login_count: Set(1),
        expiry_date: Set(expiry),
        created_at: Set(now),
    };
    model.insert(db).await
}

/// Look up an unexpired session by id.
pub async fn resolve<C: ConnectionTrait>(
    db: &C,
    session_id: &str,
) -> Result<Option<session::Model>, DbErr> {
    let found = session::Entity::find_by_id(session_id).one(db).await?;
    Ok(found.filter(|s| s.expiry_date > Utc::now()))
}

/// Remove a session. Removing an unknown id is a no-op.
pub async fn destroy<C: ConnectionTrait>(db: &C, session_id: &str) -> Result<(), DbErr> {
    session::Entity::delete_by_id(session_id).exec(db).await?;
    Ok(())
}

/// Build the session cookie: httpOnly, path `/`, 12-day max-age. `SameSite`
/// and `Secure` depend on whether the deployment is cross-site HTTPS.
pub fn build_cookie(config: &AppConfig, session_id: String) -> Cookie<'static> {
    let secure = config.auth.secure_cookies;
    Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .same_site(if secure { SameSite::None } else { SameSite::Lax })
        .secure(secure)
        .build()
}

/// An expired clone of the session cookie, for logout.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie
}

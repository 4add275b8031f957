use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::user;

/// Public view of a user record.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Identity provider's subject id.
    #[schema(example = "104378912345678901234")]
    pub external_id: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "Alice")]
    pub name: String,
    pub picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            external_id: user.external_id,
            email: user.email,
            name: user.name,
            picture: user.picture,
            created_at: user.created_at,
        }
    }
}

/// `GET /auth/user` payload. Never an error response: an unauthenticated
/// caller gets `user: null` and `isAuthenticated: false`.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatusResponse {
    pub user: Option<UserResponse>,
    pub is_authenticated: bool,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LogoutResponse {
    #[schema(example = "Logged out successfully")]
    pub message: &'static str,
}

use serde::{Deserialize, Serialize};

use crate::entity::login;

/// One element of the batch create body.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginPayload {
    /// Client-generated record id. Generated server-side when absent.
    #[schema(example = "3b36c295-6dd9-4b46-9e60-48f4e0be0c74")]
    pub id: Option<String>,
    #[schema(example = "https://example.com")]
    pub site: String,
    #[schema(example = "alice")]
    pub username: String,
    pub password: String,
    /// Optional label from the strength classifier.
    pub strength: Option<String>,
}

/// Partial update body; absent fields are left untouched.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateLoginRequest {
    pub site: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub strength: Option<String>,
}

/// A stored credential as returned to its owner.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// Client-generated record id.
    pub id: String,
    #[serde(rename = "userId")]
    pub owner_id: String,
    pub site: String,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
}

impl From<login::Model> for LoginResponse {
    fn from(model: login::Model) -> Self {
        Self {
            id: model.record_id,
            owner_id: model.owner_id,
            site: model.site,
            username: model.username,
            password: model.password,
            strength: model.strength,
        }
    }
}

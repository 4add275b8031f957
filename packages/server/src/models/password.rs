use serde::Deserialize;

/// Body of `POST /api/passwords`.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct StrengthRequest {
    /// Candidate secret to classify.
    pub password: Option<String>,
}

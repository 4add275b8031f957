use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::entity::document;

/// A document metadata row as returned to its owner.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: Uuid,
    #[schema(example = "tax-return-2025.pdf")]
    pub original_name: String,
    /// Size in bytes.
    pub size: i64,
    #[schema(example = "application/pdf")]
    pub mime_type: String,
    pub upload_date: DateTime<Utc>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub bucket: String,
}

impl From<document::Model> for DocumentResponse {
    fn from(model: document::Model) -> Self {
        Self {
            id: model.id,
            original_name: model.original_name,
            size: model.size,
            mime_type: model.mime_type,
            upload_date: model.upload_date,
            description: model.description,
            location: model.location,
            bucket: model.bucket,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub document: DocumentResponse,
}

/// Pre-signed retrieval link; the client opens it directly against the
/// object store.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub success: bool,
    pub download_url: String,
    pub file_name: String,
}

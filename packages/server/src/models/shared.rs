use serde::Serialize;

/// Envelope for batch credential inserts.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    pub success: bool,
    /// Number of records written.
    pub inserted_count: u64,
}

/// Envelope for credential updates. Zero-match updates report
/// `modifiedCount: 0` and still succeed.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub success: bool,
    pub modified_count: u64,
}

/// Envelope for deletes. For credentials, zero-match deletes report
/// `deletedCount: 0` and still succeed.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_count: u64,
}

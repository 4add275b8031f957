use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::document;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::Identity;
use crate::models::document::{DocumentResponse, DownloadResponse, UploadResponse};
use crate::models::shared::DeleteResponse;
use crate::state::AppState;
use crate::utils::filetype;

pub fn document_upload_body_limit() -> DefaultBodyLimit {
    // Slightly above the document cap for multipart framing overhead.
    DefaultBodyLimit::max(11 * 1024 * 1024)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Documents",
    operation_id = "listDocuments",
    summary = "List the caller's documents",
    responses(
        (status = 200, description = "Document metadata rows", body = [DocumentResponse]),
        (status = 401, description = "Unauthenticated (UNAUTHENTICATED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(identity, state), fields(owner = %identity.user.external_id))]
pub async fn list_documents(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentResponse>>, AppError> {
    let rows = document::Entity::find()
        .filter(document::Column::OwnerId.eq(&identity.user.external_id))
        .order_by_desc(document::Column::UploadDate)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(DocumentResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "Documents",
    operation_id = "uploadDocument",
    summary = "Upload a document",
    description = "Multipart upload with a required `document` field and an optional \
        `description`. Files above 10 MB or outside the allow-list (images, PDF, \
        office documents, text, archives) are rejected before any object-store call. \
        The object-store write and the metadata insert are not transactional; a \
        failed insert can leave an orphan blob behind.",
    request_body(content_type = "multipart/form-data", description = "Document upload"),
    responses(
        (status = 201, description = "Document stored", body = UploadResponse),
        (status = 400, description = "Missing file or over the size cap (INVALID_INPUT)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (UNAUTHENTICATED)", body = ErrorBody),
        (status = 415, description = "Disallowed file type (UNSUPPORTED_TYPE)", body = ErrorBody),
        (status = 502, description = "Object store failure (UPSTREAM_FAILURE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(identity, state, multipart), fields(owner = %identity.user.external_id))]
pub async fn upload_document(
    identity: Identity,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let max_size = state.config.storage.max_document_size;

    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("document") => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::Validation("Document field must have a filename".into())
                    })?;

                let declared_mime = field
                    .content_type()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| {
                        mime_guess::from_path(&filename)
                            .first_or_octet_stream()
                            .to_string()
                    });

                // Filter on name and declared type before touching the bytes.
                if !filetype::is_allowed_extension(&filename) {
                    return Err(AppError::UnsupportedType(format!(
                        "File type not allowed: {filename}"
                    )));
                }
                if !filetype::is_allowed_mime(&declared_mime) {
                    return Err(AppError::UnsupportedType(format!(
                        "MIME type not allowed: {declared_mime}"
                    )));
                }

                let bytes = read_field_capped(field, max_size).await?;
                file = Some((filename, declared_mime, bytes));
            }
            Some("description") => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read description: {e}"))
                })?;
                if !text.trim().is_empty() {
                    description = Some(text);
                }
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let (filename, mime, bytes) =
        file.ok_or_else(|| AppError::Validation("Missing 'document' field".into()))?;

    let owner = identity.user.external_id;
    let storage_key = format!(
        "documents/{owner}/{}-{}",
        Uuid::new_v4(),
        safe_key_component(&filename)
    );

    state.store.put(&storage_key, &bytes, &mime).await?;

    // Metadata insert after the byte upload. A failure here orphans the blob;
    // that is tolerated, the reverse (a row without bytes) is not.
    let row = document::ActiveModel {
        id: Set(Uuid::now_v7()),
        owner_id: Set(owner),
        original_name: Set(filename),
        location: Set(state.store.location(&storage_key)),
        storage_key: Set(storage_key),
        size: Set(i64::try_from(bytes.len()).unwrap_or(i64::MAX)),
        mime_type: Set(mime),
        upload_date: Set(Utc::now()),
        description: Set(description),
        bucket: Set(state.config.storage.bucket.clone()),
    };
    let saved = row.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            document: DocumentResponse::from(saved),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/download/{id}",
    tag = "Documents",
    operation_id = "downloadDocument",
    summary = "Request a download link",
    description = "Verifies ownership, then returns a pre-signed retrieval URL \
        (1 hour by default) naming the original filename. Bytes are never proxied \
        through this server.",
    params(("id" = String, Path, description = "Document id")),
    responses(
        (status = 200, description = "Pre-signed URL", body = DownloadResponse),
        (status = 401, description = "Unauthenticated (UNAUTHENTICATED)", body = ErrorBody),
        (status = 404, description = "Document not found (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Object store failure (UPSTREAM_FAILURE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(identity, state), fields(owner = %identity.user.external_id, document_id = %id))]
pub async fn download_document(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DownloadResponse>, AppError> {
    let doc = find_owned_document(&state.db, &id, &identity.user.external_id).await?;

    let url = state
        .store
        .presign_get(
            &doc.storage_key,
            state.config.storage.presign_expiry_secs,
            Some(&doc.original_name),
        )
        .await?;

    Ok(Json(DownloadResponse {
        success: true,
        download_url: url,
        file_name: doc.original_name,
    }))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Documents",
    operation_id = "deleteDocument",
    summary = "Delete a document",
    description = "Verifies ownership, best-effort deletes the backing bytes \
        (failures are logged and ignored), then removes the metadata row \
        unconditionally.",
    params(("id" = String, Path, description = "Document id")),
    responses(
        (status = 200, description = "Delete result", body = DeleteResponse),
        (status = 401, description = "Unauthenticated (UNAUTHENTICATED)", body = ErrorBody),
        (status = 404, description = "Document not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(identity, state), fields(owner = %identity.user.external_id, document_id = %id))]
pub async fn delete_document(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let doc = find_owned_document(&state.db, &id, &identity.user.external_id).await?;

    if let Err(e) = state.store.delete(&doc.storage_key).await {
        tracing::warn!("Object delete failed for {}: {e}", doc.storage_key);
    }

    let result = document::Entity::delete_by_id(doc.id).exec(&state.db).await?;

    Ok(Json(DeleteResponse {
        success: true,
        deleted_count: result.rows_affected,
    }))
}

async fn find_owned_document<C: ConnectionTrait>(
    db: &C,
    id: &str,
    owner_id: &str,
) -> Result<document::Model, AppError> {
    let doc_id =
        Uuid::parse_str(id).map_err(|_| AppError::Validation("Invalid document id".into()))?;

    document::Entity::find_by_id(doc_id)
        .one(db)
        .await?
        .filter(|doc| doc.owner_id == owner_id)
        .ok_or_else(|| AppError::NotFound("Document not found".into()))
}

/// Read a multipart field, rejecting it once it crosses the size cap.
async fn read_field_capped(
    mut field: axum::extract::multipart::Field<'_>,
    max_size: u64,
) -> Result<Vec<u8>, AppError> {
    let mut bytes: Vec<u8> = Vec::new();

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        if (bytes.len() + chunk.len()) as u64 > max_size {
            return Err(AppError::Validation(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

/// Flatten a filename into something safe inside an object key.
fn safe_key_component(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Metadata for an uploaded document.
///
/// The bytes live in the external object store under `storage_key`; this row
/// is the only pointer to them.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning user's external id.
    pub owner_id: String,

    /// Original upload filename.
    pub original_name: String,

    /// Object-store key, namespaced by owner.
    pub storage_key: String,

    /// Public object URL, when the backend exposes one.
    pub location: Option<String>,

    pub size: i64,
    pub mime_type: String,
    pub upload_date: DateTimeUtc,
    pub description: Option<String>,

    /// Bucket the bytes were written to.
    pub bucket: String,
}

impl ActiveModelBehavior for ActiveModel {}

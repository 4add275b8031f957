use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A stored website credential.
///
/// `record_id` is the client-generated id the API addresses records by;
/// `owner_id` scopes every read and write to the authenticated caller.
/// Per-owner uniqueness of `site` is deliberately not enforced here.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "login")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Client-generated record id.
    pub record_id: String,

    /// Owning user's external id.
    pub owner_id: String,

    pub site: String,
    pub username: String,

    /// Secret as submitted. No server-side encryption.
    pub password: String,

    /// Strength label from the external classifier, when the client sent one.
    pub strength: Option<String>,
}

impl ActiveModelBehavior for ActiveModel {}

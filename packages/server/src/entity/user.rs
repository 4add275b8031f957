use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Local user record, created on first federated login.
///
/// Keyed by the identity provider's stable subject id. There is no update or
/// delete path; the row is immutable after creation.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    /// Stable subject id issued by the identity provider.
    #[sea_orm(primary_key, auto_increment = false)]
    pub external_id: String,

    pub email: String,
    pub name: String,
    pub picture: Option<String>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

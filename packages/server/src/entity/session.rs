use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Server-side session, keyed by the opaque id delivered in the session
/// cookie.
///
/// Populated at login with the resolved identity and the bearer token minted
/// for that login; removed at logout. Expired rows are simply ignored by
/// lookups.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "session")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// External id of the authenticated user.
    pub user_id: String,

    /// Bearer token issued at login completion.
    pub token: String,

    /// Number of logins completed on this session.
    pub login_count: i32,

    pub expiry_date: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/api", record_routes())
        .routes(routes!(handlers::password::generate_password))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::google_login))
        .routes(routes!(handlers::auth::google_callback))
        .routes(routes!(handlers::auth::logout))
        .routes(routes!(handlers::auth::current_user))
}

/// Everything under `/api` sits behind the identity gate.
fn record_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/logins", login_routes())
        .nest("/documents", document_routes())
        .routes(routes!(handlers::password::classify_password))
}

fn login_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::login::list_logins,
            handlers::login::create_logins
        ))
        .routes(routes!(
            handlers::login::update_login,
            handlers::login::delete_login
        ))
}

fn document_routes() -> OpenApiRouter<AppState> {
    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::document::upload_document))
        .layer(handlers::document::document_upload_body_limit());

    OpenApiRouter::new()
        .routes(routes!(handlers::document::list_documents))
        .routes(routes!(handlers::document::download_document))
        .routes(routes!(handlers::document::delete_document))
        .merge(upload)
}

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use common::storage::{ObjectStore, StorageError};
use reqwest::Client;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use serde_json::{Value, json};

use server::config::{
    AppConfig, AuthConfig, ClientConfig, CorsConfig, DatabaseConfig, PasswordsConfig,
    ServerConfig, StorageConfig,
};
use server::entity::user;
use server::state::AppState;
use server::utils::token;

/// Where auth redirects land in tests.
pub const CLIENT_URL: &str = "http://client.test";

pub const TOKEN_SECRET: &str = "test-secret-for-integration-tests";

pub mod routes {
    pub const GOOGLE_LOGIN: &str = "/auth/google";
    pub const LOGOUT: &str = "/auth/logout";
    pub const AUTH_USER: &str = "/auth/user";
    pub const LOGINS: &str = "/api/logins";
    pub const DOCUMENTS: &str = "/api/documents";
    pub const DOCUMENTS_UPLOAD: &str = "/api/documents/upload";
    pub const PASSWORDS: &str = "/api/passwords";
    pub const GENERATE_PASSWORD: &str = "/generatePassword";

    pub fn login(id: &str) -> String {
        format!("/api/logins/{id}")
    }

    pub fn document(id: &str) -> String {
        format!("/api/documents/{id}")
    }

    pub fn document_download(id: &str) -> String {
        format!("/api/documents/download/{id}")
    }

    pub fn google_callback(code: &str) -> String {
        format!("/auth/google/callback?code={code}")
    }
}

/// In-memory stand-in for the external object store.
#[derive(Default)]
pub struct MemoryStore {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Simulate the backing bytes disappearing behind the metadata row.
    pub fn clear(&self) {
        self.objects.lock().unwrap().clear();
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, key: &str, data: &[u8], _content_type: &str) -> Result<(), StorageError> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_owned(), data.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        // Deleting a missing object is not an error, matching S3 semantics.
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn presign_get(
        &self,
        key: &str,
        expiry_secs: u32,
        download_name: Option<&str>,
    ) -> Result<String, StorageError> {
        Ok(format!(
            "http://store.test/{key}?expires={expiry_secs}&filename={}",
            download_name.unwrap_or("")
        ))
    }

    fn location(&self, key: &str) -> Option<String> {
        Some(format!("http://store.test/{key}"))
    }
}

/// Shared state of the stub identity provider / password services.
#[derive(Clone)]
struct StubState {
    profile: Arc<Mutex<Value>>,
}

/// Spawn a stub server standing in for every external HTTP dependency:
/// provider token + userinfo endpoints, strength classifier, and generator.
async fn spawn_stub_services(profile: Arc<Mutex<Value>>) -> SocketAddr {
    let state = StubState { profile };

    let app = Router::new()
        .route(
            "/token",
            post(|| async { Json(json!({"access_token": "stub-access-token"})) }),
        )
        .route(
            "/userinfo",
            get(|State(state): State<StubState>| async move {
                Json(state.profile.lock().unwrap().clone())
            }),
        )
        .route(
            "/strength",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == "boom" {
                    Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
                } else {
                    Ok(Json(json!({"strength": "Strong"})))
                }
            }),
        )
        .route(
            "/generate",
            get(|| async { Json(json!({"password": "r4nd0m-Pa55"})) }),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub services");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub store: Arc<MemoryStore>,
    /// Profile the stub provider's userinfo endpoint returns.
    profile: Arc<Mutex<Value>>,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// `Location` header, for redirect assertions.
    pub location: Option<String>,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let location = res
            .headers()
            .get("Location")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            location,
            text,
            body,
        }
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1);
        let db = Database::connect(opts)
            .await
            .expect("Failed to open in-memory SQLite");
        server::database::sync_schema(&db)
            .await
            .expect("Failed to sync schema");

        let profile = Arc::new(Mutex::new(json!({
            "sub": "u1",
            "email": "a@b.com",
            "name": "A",
            "picture": "http://pics.test/u1.png"
        })));
        let stub_addr = spawn_stub_services(profile.clone()).await;

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![CLIENT_URL.to_string()],
                    max_age: 3600,
                },
            },
            client: ClientConfig {
                url: CLIENT_URL.to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
            },
            auth: AuthConfig {
                token_secret: TOKEN_SECRET.to_string(),
                google_client_id: "test-client-id".to_string(),
                google_client_secret: "test-client-secret".to_string(),
                google_callback_url: "http://localhost/auth/google/callback".to_string(),
                authorize_url: format!("http://{stub_addr}/authorize"),
                token_url: format!("http://{stub_addr}/token"),
                userinfo_url: format!("http://{stub_addr}/userinfo"),
                secure_cookies: false,
            },
            storage: StorageConfig {
                region: "us-east-1".to_string(),
                bucket: "test-bucket".to_string(),
                access_key: String::new(),
                secret_key: String::new(),
                endpoint: None,
                max_document_size: 10 * 1024 * 1024,
                presign_expiry_secs: 3600,
            },
            passwords: PasswordsConfig {
                strength_url: format!("http://{stub_addr}/strength"),
                generator_url: format!("http://{stub_addr}/generate"),
                generator_api_key: "test-key".to_string(),
            },
        };

        let store = Arc::new(MemoryStore::default());

        let state = AppState {
            db: db.clone(),
            config,
            store: store.clone(),
            http: reqwest::Client::new(),
        };

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build test client");

        Self {
            addr,
            client,
            db,
            store,
            profile,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn set_provider_profile(&self, profile: Value) {
        *self.profile.lock().unwrap() = profile;
    }

    /// Seed a user row directly and mint a bearer token for it.
    pub async fn create_authenticated_user(&self, external_id: &str, email: &str) -> String {
        user::ActiveModel {
            external_id: Set(external_id.to_string()),
            email: Set(email.to_string()),
            name: Set("Test User".to_string()),
            picture: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed user");

        token::sign(external_id, TOKEN_SECRET).expect("Failed to mint token")
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn put_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn upload_with_token(
        &self,
        file_name: &str,
        mime: &str,
        file_bytes: Vec<u8>,
        description: Option<&str>,
        token: &str,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .expect("Failed to set MIME type");
        let mut form = reqwest::multipart::Form::new().part("document", part);
        if let Some(description) = description {
            form = form.text("description", description.to_string());
        }

        let res = self
            .client
            .post(self.url(routes::DOCUMENTS_UPLOAD))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    /// Run the provider callback and return the redirect response.
    pub async fn oauth_callback(&self, code: &str) -> TestResponse {
        self.get_without_token(&routes::google_callback(code)).await
    }

    /// Complete a full stubbed login and return the token embedded in the
    /// redirect back to the client.
    pub async fn oauth_login(&self, profile: Value) -> String {
        self.set_provider_profile(profile);
        let res = self.oauth_callback("test-code").await;
        assert_eq!(res.status, 307, "callback did not redirect: {}", res.text);
        let location = res.location.expect("callback redirect has no Location");
        location
            .split_once("token=")
            .unwrap_or_else(|| panic!("no token in redirect: {location}"))
            .1
            .to_string()
    }
}

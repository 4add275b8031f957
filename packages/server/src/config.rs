use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

/// The browser application this backend serves; auth redirects land here.
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// HMAC secret for bearer tokens.
    pub token_secret: String,

    /// Identity-provider client credentials. Empty means the login subsystem
    /// is not configured; the process still starts and `/auth/google`
    /// redirects back to the client with an error marker.
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_callback_url: String,

    /// Provider endpoints. Defaults target Google; overridable so tests can
    /// point them at a stub.
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,

    /// Marks the session cookie `Secure` and `SameSite=None` (cross-site
    /// deployments behind HTTPS).
    pub secure_cookies: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    /// Custom endpoint for S3-compatible stores.
    pub endpoint: Option<String>,
    /// Upload size cap in bytes.
    pub max_document_size: u64,
    /// Lifetime of pre-signed download URLs.
    pub presign_expiry_secs: u32,
}

/// External password services: the strength classifier and the generator.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordsConfig {
    pub strength_url: String,
    pub generator_url: String,
    pub generator_api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub passwords: PasswordsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", vec!["http://localhost:5173"])?
            .set_default("server.cors.max_age", 3600)?
            .set_default("client.url", "http://localhost:5173")?
            .set_default("database.url", "postgres://localhost/passbank")?
            .set_default("auth.token_secret", "change-me")?
            .set_default("auth.google_client_id", "")?
            .set_default("auth.google_client_secret", "")?
            .set_default(
                "auth.google_callback_url",
                "http://localhost:3000/auth/google/callback",
            )?
            .set_default(
                "auth.authorize_url",
                "https://accounts.google.com/o/oauth2/v2/auth",
            )?
            .set_default("auth.token_url", "https://oauth2.googleapis.com/token")?
            .set_default(
                "auth.userinfo_url",
                "https://openidconnect.googleapis.com/v1/userinfo",
            )?
            .set_default("auth.secure_cookies", false)?
            .set_default("storage.region", "us-east-1")?
            .set_default("storage.bucket", "passbank-documents")?
            .set_default("storage.access_key", "")?
            .set_default("storage.secret_key", "")?
            .set_default("storage.max_document_size", 10 * 1024 * 1024)?
            .set_default("storage.presign_expiry_secs", 3600)?
            .set_default("passwords.strength_url", "")?
            .set_default("passwords.generator_url", "")?
            .set_default("passwords.generator_api_key", "")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., PASSBANK__AUTH__TOKEN_SECRET)
            .add_source(Environment::with_prefix("PASSBANK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

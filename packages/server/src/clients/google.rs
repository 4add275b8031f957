use serde::Deserialize;

use crate::config::AuthConfig;
use crate::error::AppError;

/// Userinfo profile returned by the provider after code exchange.
#[derive(Debug, Deserialize)]
pub struct Profile {
    /// Stable subject id.
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub fn is_configured(cfg: &AuthConfig) -> bool {
    !cfg.google_client_id.is_empty() && !cfg.google_client_secret.is_empty()
}

/// Build the provider authorization URL the browser is redirected to.
pub fn authorize_url(cfg: &AuthConfig) -> String {
    format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=online",
        cfg.authorize_url,
        urlencoded(&cfg.google_client_id),
        urlencoded(&cfg.google_callback_url),
        urlencoded("openid profile email"),
    )
}

/// Exchange an authorization code for an access token.
pub async fn exchange_code(
    http: &reqwest::Client,
    cfg: &AuthConfig,
    code: &str,
) -> Result<String, AppError> {
    let resp = http
        .post(&cfg.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", &cfg.google_client_id),
            ("client_secret", &cfg.google_client_secret),
            ("redirect_uri", &cfg.google_callback_url),
        ])
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(AppError::Upstream(format!(
            "token exchange returned {status}: {body}"
        )));
    }

    let token: TokenResponse = resp
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("token response parse failed: {e}")))?;

    Ok(token.access_token)
}

/// Fetch the user's profile with the access token.
pub async fn fetch_profile(
    http: &reqwest::Client,
    cfg: &AuthConfig,
    access_token: &str,
) -> Result<Profile, AppError> {
    let resp = http
        .get(&cfg.userinfo_url)
        .bearer_auth(access_token)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(AppError::Upstream(format!(
            "userinfo returned {status}: {body}"
        )));
    }

    resp.json()
        .await
        .map_err(|e| AppError::Upstream(format!("userinfo parse failed: {e}")))
}

fn urlencoded(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(ch),
            _ => {
                let mut buf = [0u8; 4];
                let encoded = ch.encode_utf8(&mut buf);
                for byte in encoded.bytes() {
                    result.push('%');
                    result.push_str(&format!("{byte:02X}"));
                }
            }
        }
    }
    result
}

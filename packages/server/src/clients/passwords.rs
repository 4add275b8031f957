use serde_json::Value;

use crate::config::PasswordsConfig;
use crate::error::AppError;

/// Classify a candidate secret with the external strength service.
///
/// The classifier's JSON response is passed through verbatim; no retry on
/// failure.
pub async fn classify_strength(
    http: &reqwest::Client,
    cfg: &PasswordsConfig,
    password: &str,
) -> Result<Value, AppError> {
    if cfg.strength_url.is_empty() {
        return Err(AppError::Upstream(
            "strength classifier not configured".into(),
        ));
    }

    let resp = http
        .post(&cfg.strength_url)
        .json(&serde_json::json!({ "password": password }))
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(AppError::Upstream(format!(
            "strength classifier returned {}",
            resp.status()
        )));
    }

    resp.json()
        .await
        .map_err(|e| AppError::Upstream(format!("strength response parse failed: {e}")))
}

/// Fetch a random password from the external generator service.
pub async fn generate(http: &reqwest::Client, cfg: &PasswordsConfig) -> Result<Value, AppError> {
    if cfg.generator_url.is_empty() {
        return Err(AppError::Upstream("password generator not configured".into()));
    }

    let resp = http
        .get(&cfg.generator_url)
        .header("X-Api-Key", &cfg.generator_api_key)
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(AppError::Upstream(format!(
            "password generator returned {}",
            resp.status()
        )));
    }

    resp.json()
        .await
        .map_err(|e| AppError::Upstream(format!("generator response parse failed: {e}")))
}

use anyhow::{Result, bail};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Bearer tokens stay valid this long after issue. Logout does not revoke
/// them; an issued token works until this window closes.
pub const VALIDITY_DAYS: i64 = 30;

/// Bearer token claims: the identity and its issue/expiry instants.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User's external id.
    pub sub: String,
    /// Issue timestamp (seconds).
    pub iat: i64,
    /// Expiration timestamp (seconds).
    pub exp: i64,
}

/// Sign a new bearer token for a user.
pub fn sign(external_id: &str, secret: &str) -> Result<String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::days(VALIDITY_DAYS))
        .ok_or_else(|| anyhow::anyhow!("expiry timestamp overflow"))?;

    let claims = Claims {
        sub: external_id.to_owned(),
        iat: now.timestamp(),
        exp: expiration.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a bearer token.
///
/// Rejects bad signatures and tokens outside the validity window, including
/// tokens claiming a future issue instant (negative age).
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    let claims = token_data.claims;

    if claims.iat > Utc::now().timestamp() + 60 {
        bail!("token issued in the future");
    }

    Ok(claims)
}

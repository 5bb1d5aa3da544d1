//! Bearer token signing and verification.
//!
//! Tokens are compact HS256 JWTs built by hand from hmac + sha2 + base64.
//! Signature checks go through `Mac::verify_slice`, which compares in
//! constant time.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;
use study_core::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

const HEADER: &[u8] = br#"{"alg":"HS256","typ":"JWT"}"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub name: String,
    pub email: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

impl Claims {
    pub fn new(
        sub: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        ttl_secs: i64,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: sub.into(),
            name: name.into(),
            email: email.into(),
            iat: now,
            exp: now + ttl_secs,
        }
    }
}

fn mac_for(secret: &str) -> Result<HmacSha256> {
    HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| Error::Auth("invalid signing key".into()))
}

/// Sign claims into a compact token.
pub fn sign_token(claims: &Claims, secret: &str) -> Result<String> {
    let header = URL_SAFE_NO_PAD.encode(HEADER);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);
    let signing_input = format!("{}.{}", header, payload);

    let mut mac = mac_for(secret)?;
    mac.update(signing_input.as_bytes());
    let tag = mac.finalize().into_bytes();

    Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(tag)))
}

/// Verify a compact token and return its claims.
///
/// Every failure mode collapses into `Error::Auth`.
pub fn verify_token(
    token: &str,
    secret: &str,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<Claims> {
    let mut parts = token.split('.');
    let (header, payload, signature) = match (parts.next(), parts.next(), parts.next(), parts.next())
    {
        (Some(h), Some(p), Some(s), None) => (h, p, s),
        _ => return Err(Error::Auth("malformed token".into())),
    };

    let tag = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| Error::Auth("malformed token".into()))?;

    let mut mac = mac_for(secret)?;
    mac.update(format!("{}.{}", header, payload).as_bytes());
    mac.verify_slice(&tag)
        .map_err(|_| Error::Auth("invalid token signature".into()))?;

    let payload = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| Error::Auth("malformed token".into()))?;
    let claims: Claims =
        serde_json::from_slice(&payload).map_err(|_| Error::Auth("malformed token".into()))?;

    if claims.exp <= now.timestamp() {
        return Err(Error::Auth("token expired".into()));
    }

    Ok(claims)
}

/// Extractor for `Authorization: Bearer <token>`.
///
/// Handlers taking an `AuthUser` reject unauthenticated requests before
/// touching any store.
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> std::result::Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::from(Error::Auth("missing bearer token".into())))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::from(Error::Auth("missing bearer token".into())))?;

        let claims = verify_token(token, &state.config.jwt_secret, chrono::Utc::now())?;
        Ok(AuthUser(claims))
    }
}

//! JWT identity handling
//!
//! Token issuance (login/registration) lives in the account service; the
//! gateway only consumes an already-issued token and extracts the user
//! identity from it, or observes its absence.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Contents of the JWT issued to a user.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub id: i32,
    pub username: String,
}

pub fn encode_jwt(
    username: &str,
    id: i32,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expire = Duration::hours(24);
    let claims = Claims {
        exp: (now + expire).timestamp() as usize,
        iat: now.timestamp() as usize,
        id,
        username: username.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn decode_jwt(
    token: &str,
    secret: &str,
) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
    decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
}

/// The resolved identity behind a connection attempt: the user id when a
/// valid token was presented, `None` otherwise. The gateway treats
/// `None` as an unauthenticated connect.
pub fn resolve_identity(token: Option<&str>, secret: &str) -> Option<i32> {
    let token = token?;
    match decode_jwt(token, secret) {
        Ok(data) => Some(data.claims.id),
        Err(err) => {
            debug!("failed to decode connection token: {err}");
            None
        }
    }
}

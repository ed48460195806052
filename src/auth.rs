//! Bearer token verification.
//!
//! Sign-in happens at the external identity provider. This module only
//! checks the HS256 access tokens it hands out, so mutating routes can be
//! restricted to signed-in staff.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Claims carried by an identity provider access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user id at the identity provider)
    pub sub: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub aud: String,
    pub exp: usize,
}

impl TokenClaims {
    /// Verify signature, expiry and audience of a token
    pub fn verify(token: &str, secret: &str, audience: &str) -> AppResult<Self> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);

        decode::<TokenClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Authentication(format!("Invalid token: {}", e)))
    }
}

//! Admin authentication for Sourcecast.
//!
//! Bearer tokens are stateless, signed HS256 JWTs carrying the admin
//! identity and an absolute expiry. There is no server-side revocation:
//! logout is purely a client-side action that discards the token.
//! Passwords are stored as bcrypt hashes, salted and deliberately slow.

use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Token lifetime: 24 hours from issuance.
const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Identity claims embedded in a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub user_id: String,
    pub username: String,
    pub email: String,

    /// Absolute expiry, unix seconds.
    pub exp: i64,
}

/// Issues and validates signed bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    /// Build a service signing with `secret`.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token asserting the given identity, valid for 24 hours.
    pub fn issue(
        &self,
        user_id: &str,
        username: &str,
        email: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = TokenClaims {
            user_id: user_id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            exp: unix_seconds() + TOKEN_TTL_SECS,
        };

        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Validate a token and return the identity it asserts.
    ///
    /// Fails closed: structural corruption, a bad signature, or an
    /// expiry in the past all yield `None`, never a partial identity.
    pub fn validate(&self, token: &str) -> Option<TokenClaims> {
        decode::<TokenClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .ok()
    }
}

/// Extract the bearer token from the `Authorization` header.
///
/// A missing header or a non-Bearer scheme yields `None` ("no token",
/// as opposed to "invalid token"); callers treat both as
/// unauthenticated.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Hash a password for storage.
pub fn hash_password(plaintext: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plaintext, bcrypt::DEFAULT_COST)
}

/// Compare a login candidate against a stored hash.
///
/// Never a plaintext comparison; a malformed stored hash counts as a
/// failed match rather than an error.
pub fn verify_password(candidate: &str, stored_hash: &str) -> bool {
    bcrypt::verify(candidate, stored_hash).unwrap_or(false)
}

fn unix_seconds() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

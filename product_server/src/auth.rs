//! Access token issuance and verification.
//!
//! Access tokens are HS256 JWTs signed with the server secret (see [`AuthConfig`]). The claims carry the identity id in
//! `sub`, the identity's email, and the usual `iat`/`exp` timestamps. Tokens are not stored anywhere; a token is valid
//! for as long as its signature checks out and `exp` has not passed.
//!
//! The [`crate::middleware::BearerAuthMiddlewareFactory`] validates the `Authorization: Bearer <token>` header on
//! protected routes and places the resulting [`JwtClaims`] in the request extensions, from where handlers pick them up
//! by taking a `JwtClaims` argument.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use product_engine::db_types::Identity;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The identity id, as a string.
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl JwtClaims {
    pub fn for_identity(identity: &Identity, ttl: Duration) -> Self {
        let now = Utc::now().timestamp();
        Self { sub: identity.id.to_string(), email: identity.email.clone(), iat: now, exp: now + ttl.num_seconds() }
    }

    /// The identity id in `sub`, if it is a valid id.
    pub fn identity_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<JwtClaims>().cloned().ok_or_else(|| {
            warn!("🔐️ No JWT claims found in request extensions. Is the route missing the bearer auth middleware?");
            ServerError::AuthenticationError(AuthError::MissingToken)
        });
        ready(claims)
    }
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.reveal().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: config.token_ttl,
        }
    }

    /// Issue a new access token for the given identity.
    /// This method DOES NOT check the identity's credentials. That must be done prior to calling `issue_token`.
    pub fn issue_token(&self, identity: &Identity) -> Result<String, AuthError> {
        let claims = JwtClaims::for_identity(identity, self.ttl);
        self.sign_claims(&claims)
    }

    /// Signs arbitrary claims. Normally you want [`TokenIssuer::issue_token`].
    pub fn sign_claims(&self, claims: &JwtClaims) -> Result<String, AuthError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::CouldNotIssueToken(e.to_string()))
    }

    /// Checks the token signature and expiry, and returns the claims it carries.
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        jsonwebtoken::decode::<JwtClaims>(token, &self.decoding_key, &validation).map(|data| data.claims).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken(e.to_string()),
            },
        )
    }
}

/// Extracts the token from an `Authorization` header value of the form `Bearer <token>`. The scheme is matched
/// case-insensitively.
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or_else(|| AuthError::MalformedToken("Expected 'Bearer <token>'".to_string()))?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::MalformedToken("Expected 'Bearer <token>'".to_string()));
    }
    Ok(token)
}

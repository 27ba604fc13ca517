use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use zeroize::Zeroizing;

use govgate_core::TokenConfig;

use crate::bearer::parse_bearer;
use crate::error::AuthError;
use crate::identity::Identity;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub aud: String,
    pub exp: u64,
    pub jti: String,
    pub iat: u64,
    pub iss: String,
    pub nbf: u64,
    pub sub: String,
    pub can: Permissions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub actions: Vec<String>,
}

/// Issues and verifies HS256 session tokens.
pub struct SessionTokenIssuer {
    secret: Zeroizing<Vec<u8>>,
    issuer: String,
    ttl: Duration,
    leeway_secs: u64,
}

impl SessionTokenIssuer {
    pub fn new(config: &TokenConfig) -> Result<Self, AuthError> {
        let secret = Zeroizing::new(config.secret_bytes()?.to_vec());
        let ttl_secs = i64::try_from(config.ttl_secs)
            .map_err(|_| AuthError::TokenIssue(format!("ttl too large: {}", config.ttl_secs)))?;
        Ok(Self {
            secret,
            issuer: config.issuer.clone(),
            ttl: Duration::seconds(ttl_secs),
            leeway_secs: config.leeway_secs,
        })
    }

    /// Issue a token for `identity`, valid from now for the configured TTL.
    pub fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, AuthError> {
        let issued = unix(now);
        let claims = SessionClaims {
            aud: identity.subject().to_string(),
            exp: unix(now + self.ttl),
            jti: Uuid::new_v4().to_string(),
            iat: issued,
            iss: self.issuer.clone(),
            nbf: issued,
            sub: identity.subject().to_string(),
            can: Permissions {
                actions: identity.authorized_actions().iter().cloned().collect(),
            },
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| AuthError::TokenIssue(e.to_string()))?;

        tracing::debug!(sub = %claims.sub, jti = %claims.jti, exp = claims.exp, "session token issued");
        Ok(token)
    }

    /// Verify a token and rebuild the identity it carries.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        validation.validate_aud = false;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        let data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken(e.to_string()),
        })?;

        let claims = data.claims;
        Ok(Identity::new(
            claims.sub,
            claims.can.actions.into_iter().collect(),
        ))
    }

    /// Verify the token of an `Authorization` header value.
    pub fn verify_header(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let token = parse_bearer(header)?;
        self.verify(token)
    }
}

impl fmt::Debug for SessionTokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokenIssuer")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("ttl_secs", &self.ttl.num_seconds())
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

fn unix(t: DateTime<Utc>) -> u64 {
    u64::try_from(t.timestamp()).unwrap_or(0)
}

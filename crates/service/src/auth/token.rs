use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::domain::AuthContext;
use crate::errors::ServiceError;
use crate::role::Role;
use configs::AuthConfig;

/// JWT claims carried by access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub role: Role,
    /// Unique token id.
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub token_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates HS256 access tokens.
///
/// Key, issuer, audience and lifetime are fixed at construction.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(cfg: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[cfg.issuer.as_str()]);
        validation.set_audience(&[cfg.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iat", "sub", "iss", "aud"]);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            validation,
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            lifetime: Duration::hours(cfg.token_lifetime_hours),
        }
    }

    pub fn lifetime(&self) -> Duration { self.lifetime }

    /// Issue a token valid from now for the configured lifetime.
    ///
    /// # Examples
    /// ```
    /// use configs::AuthConfig;
    /// use service::auth::TokenService;
    /// use service::role::Role;
    /// let tokens = TokenService::new(&AuthConfig { jwt_secret: "secret".into(), ..AuthConfig::default() });
    /// let issued = tokens.issue(7, Role::Manager).unwrap();
    /// let ctx = tokens.validate(&issued.token).unwrap();
    /// assert_eq!((ctx.user_id, ctx.role), (7, Role::Manager));
    /// ```
    pub fn issue(&self, user_id: i32, role: Role) -> Result<IssuedToken, ServiceError> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issue a token as if it had been created at `issued_at`.
    pub fn issue_at(&self, user_id: i32, role: Role, issued_at: DateTime<Utc>) -> Result<IssuedToken, ServiceError> {
        let expires_at = issued_at + self.lifetime;
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            jti: Uuid::new_v4().to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ServiceError::Unexpected(format!("token signing failed: {e}")))?;
        Ok(IssuedToken { token, token_id: claims.jti, issued_at, expires_at })
    }

    /// Decode and check signature, issuer, audience and expiry.
    pub fn decode_claims(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "token_rejected");
                ServiceError::invalid_token()
            })
    }

    pub fn validate(&self, token: &str) -> Result<AuthContext, ServiceError> {
        let claims = self.decode_claims(token)?;
        let user_id = claims.sub.parse::<i32>().map_err(|_| ServiceError::invalid_token())?;
        Ok(AuthContext { user_id, role: claims.role })
    }
}

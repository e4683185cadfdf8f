use crate::error::AppError;
use crate::models::{Role, User};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The decoded identity of a request: who is calling and in which role.
///
/// Handlers and the profile logic receive this as a plain argument. The role
/// comes from the token, not the store, so a role change only takes effect
/// once the token is reissued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub subject: Uuid,
    pub role: Role,
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self {
            subject: user.id,
            role: user.role,
        }
    }
}

/// Represents the claims encoded within a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token, the user's id.
    pub sub: Uuid,
    /// Role of the user at issue time.
    pub role: Role,
    /// Issued at (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

impl Claims {
    pub fn session(&self) -> Session {
        Session {
            subject: self.sub,
            role: self.role,
        }
    }
}

/// Signs and verifies HS256 session tokens with a fixed lifetime.
#[derive(Clone)]
pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token carrying exactly the session's subject and role.
    pub fn issue(&self, session: &Session) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: session.subject,
            role: session.role,
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature and expiry and returns the embedded session.
    /// Any failure is `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Session, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims.session())
    }
}

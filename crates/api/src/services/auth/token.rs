//! Signed access tokens (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use incubator_core::{AccountKind, AdminRole};

use crate::models::{CurrentAccount, CurrentAdmin, CurrentStartup};

/// Errors raised while issuing or verifying tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token's `exp` is in the past.
    #[error("token expired")]
    Expired,

    /// Bad signature, malformed token or inconsistent claims.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Signing failed.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Claims carried by every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Database ID of the admin or startup.
    pub sub: i32,
    /// Which table `sub` refers to.
    pub kind: AccountKind,
    /// Admin role; absent for startups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<AdminRole>,
    /// Issued-at (seconds since the epoch).
    pub iat: i64,
    /// Expiry (seconds since the epoch).
    pub exp: i64,
}

impl Claims {
    /// Convert verified claims into the account they describe.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` if an admin token has no role.
    pub fn account(&self) -> Result<CurrentAccount, TokenError> {
        match self.kind {
            AccountKind::Admin => {
                let role = self
                    .role
                    .ok_or_else(|| TokenError::Invalid("admin token without role".to_owned()))?;
                Ok(CurrentAccount::Admin(CurrentAdmin {
                    id: self.sub.into(),
                    role,
                }))
            }
            AccountKind::Startup => Ok(CurrentAccount::Startup(CurrentStartup {
                id: self.sub.into(),
            })),
        }
    }
}

/// A freshly signed token and its expiry.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies access tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("keys", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service signing with `secret`; tokens live for `ttl_hours`.
    #[must_use]
    pub fn new(secret: &SecretString, ttl_hours: i64) -> Self {
        let key = secret.expose_secret().as_bytes();

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation: Validation::new(Algorithm::HS256),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Sign a token for the given account.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(
        &self,
        subject_id: i32,
        kind: AccountKind,
        role: Option<AdminRole>,
    ) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: subject_id,
            kind,
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for expired tokens and
    /// `TokenError::Invalid` for anything else that fails validation.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&SecretString::from(secret.to_owned()), 24)
    }

    const SECRET: &str = "kP9#vL2$mQ8@xR5!nT3&wY7*zA4^bC6%";

    #[test]
    fn test_issue_then_verify_admin() {
        let tokens = service(SECRET);
        let issued = tokens
            .issue(7, AccountKind::Admin, Some(AdminRole::SuperAdmin))
            .unwrap();

        let claims = tokens.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.kind, AccountKind::Admin);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert_eq!(
            claims.account().unwrap(),
            CurrentAccount::Admin(CurrentAdmin {
                id: 7.into(),
                role: AdminRole::SuperAdmin,
            })
        );
    }

    #[test]
    fn test_startup_claims_have_no_role() {
        let tokens = service(SECRET);
        let issued = tokens.issue(3, AccountKind::Startup, None).unwrap();

        let claims = tokens.verify(&issued.token).unwrap();
        assert_eq!(claims.role, None);
        assert_eq!(
            claims.account().unwrap(),
            CurrentAccount::Startup(CurrentStartup { id: 3.into() })
        );
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issued = service(SECRET)
            .issue(1, AccountKind::Startup, None)
            .unwrap();

        let other = service("Zx8!Qw2@Er4#Ty6$Ui8%Op0^As2&Df4*");
        assert!(matches!(
            other.verify(&issued.token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = service(SECRET);
        let past = Utc::now().timestamp() - 7200;
        let claims = Claims {
            sub: 1,
            kind: AccountKind::Startup,
            role: None,
            iat: past - 3600,
            exp: past,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(tokens.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let tokens = service(SECRET);
        assert!(matches!(
            tokens.verify("not.a.jwt"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_admin_claims_without_role_are_invalid() {
        let claims = Claims {
            sub: 1,
            kind: AccountKind::Admin,
            role: None,
            iat: 0,
            exp: 0,
        };
        assert!(claims.account().is_err());
    }
}

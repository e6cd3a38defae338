//! Authentication service.
//!
//! Password login and registration for admins and startups, plus the
//! token service used to authenticate subsequent requests.

mod error;
pub mod token;

pub use error::AuthError;
pub use token::{Claims, IssuedToken, TokenError, TokenService};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use incubator_core::{AccountKind, AdminRole, Email, StartupStatus};

use crate::db::{AdminRepository, RepositoryError, StartupRepository};
use crate::models::{Admin, NewAdmin, NewStartup, Startup, StartupProfile};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// A logged-in admin and their access token.
#[derive(Debug)]
pub struct AdminSession {
    pub admin: Admin,
    pub token: IssuedToken,
}

/// A logged-in startup and its access token.
#[derive(Debug)]
pub struct StartupSession {
    pub startup: Startup,
    pub token: IssuedToken,
}

/// Data submitted by a startup applying to the incubator.
#[derive(Debug, Clone)]
pub struct RegisterStartup {
    pub email: String,
    pub password: String,
    pub profile: StartupProfile,
}

/// Authentication service.
pub struct AuthService<'a> {
    admins: AdminRepository<'a>,
    startups: StartupRepository<'a>,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenService) -> Self {
        Self {
            admins: AdminRepository::new(pool),
            startups: StartupRepository::new(pool),
            tokens,
        }
    }

    // =========================================================================
    // Admins
    // =========================================================================

    /// Login as an admin.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login_admin(&self, email: &str, password: &str) -> Result<AdminSession, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (admin, password_hash) = self
            .admins
            .get_credentials_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = self
            .tokens
            .issue(admin.id.as_i32(), AccountKind::Admin, Some(admin.role))?;

        Ok(AdminSession { admin, token })
    }

    /// Create a new admin account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::AdminAlreadyExists` if the email is already registered.
    pub async fn register_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: AdminRole,
    ) -> Result<Admin, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let new = NewAdmin {
            name: name.trim().to_owned(),
            email,
            password_hash,
            role,
        };

        self.admins.create(&new).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::AdminAlreadyExists,
            other => AuthError::Repository(other),
        })
    }

    // =========================================================================
    // Startups
    // =========================================================================

    /// Submit a startup application. The new startup is `pending`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::StartupAlreadyExists` if the email is already registered.
    pub async fn register_startup(&self, registration: RegisterStartup) -> Result<Startup, AuthError> {
        let email = Email::parse(&registration.email)?;
        validate_password(&registration.password)?;
        let password_hash = hash_password(&registration.password)?;

        let new = NewStartup {
            email,
            password_hash,
            profile: registration.profile,
        };

        self.startups.create(&new).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::StartupAlreadyExists,
            other => AuthError::Repository(other),
        })
    }

    /// Login as a startup. Only approved startups receive a token.
    ///
    /// The password is checked before the status, so callers without the
    /// password learn nothing about the application.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::ApprovalPending` if the application is still pending.
    /// Returns `AuthError::ApplicationRejected` if the application was rejected.
    pub async fn login_startup(
        &self,
        email: &str,
        password: &str,
    ) -> Result<StartupSession, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (startup, password_hash) = self
            .startups
            .get_credentials_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;
        ensure_can_login(startup.status)?;

        let token = self
            .tokens
            .issue(startup.id.as_i32(), AccountKind::Startup, None)?;

        Ok(StartupSession { startup, token })
    }
}

/// Map a startup's review status to a login decision.
fn ensure_can_login(status: StartupStatus) -> Result<(), AuthError> {
    if status.can_login() {
        return Ok(());
    }

    Err(match status {
        StartupStatus::Rejected => AuthError::ApplicationRejected,
        StartupStatus::Pending | StartupStatus::Approved => AuthError::ApprovalPending,
    })
}

/// Validate password meets requirements.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` describing the first rule that fails.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    let length = password.chars().count();

    if length < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    if length > MAX_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password doesn't match or
/// the stored hash can't be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse battery", &hash).is_ok());
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(matches!(
            verify_password("wrong horse battery", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_corrupt_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("whatever1", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate_password_bounds() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("exactly8").is_ok());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_LENGTH)).is_ok());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_password_counts_characters() {
        // 8 characters, 16 bytes
        assert!(validate_password("éééééééé").is_ok());
    }

    #[test]
    fn test_ensure_can_login() {
        assert!(ensure_can_login(StartupStatus::Approved).is_ok());
        assert!(matches!(
            ensure_can_login(StartupStatus::Pending),
            Err(AuthError::ApprovalPending)
        ));
        assert!(matches!(
            ensure_can_login(StartupStatus::Rejected),
            Err(AuthError::ApplicationRejected)
        ));
    }
}

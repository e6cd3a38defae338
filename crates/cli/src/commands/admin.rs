//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Bootstrap the first super admin with a generated password
//! incubator-cli admin create -e admin@example.com -n "Admin Name" -r super_admin
//!
//! # Create an admin with a chosen password
//! incubator-cli admin create -e staff@example.com -n "Staff" -p 'a long passphrase'
//! ```
//!
//! # Environment Variables
//!
//! - `INCUBATOR_DATABASE_URL` - `PostgreSQL` connection string

use rand::Rng;
use rand::distr::Alphanumeric;
use thiserror::Error;

use incubator_api::db::{AdminRepository, RepositoryError};
use incubator_api::models::NewAdmin;
use incubator_api::services::auth::{self, AuthError};
use incubator_core::{AdminRole, Email, EmailError};

/// Length of generated passwords.
const GENERATED_PASSWORD_LENGTH: usize = 24;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: super_admin, admin")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password rejected or hashing failed.
    #[error("Password error: {0}")]
    Password(#[from] AuthError),

    /// User already exists.
    #[error("Admin user already exists with email: {0}")]
    UserExists(String),
}

/// Generate a random alphanumeric password.
fn generate_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

/// Create a new admin user.
///
/// # Arguments
///
/// * `email` - Admin's email address
/// * `name` - Admin's display name
/// * `role` - Admin's role (`super_admin` or `admin`)
/// * `password` - Password to set; a random one is generated and logged when `None`
///
/// # Returns
///
/// The ID of the created admin user.
///
/// # Errors
///
/// Returns an error if the input is invalid, the email is taken, or the
/// database is unreachable.
pub async fn create_user(
    email: &str,
    name: &str,
    role: &str,
    password: Option<String>,
) -> Result<i32, AdminError> {
    let role: AdminRole = role
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;
    let email = Email::parse(email)?;

    let generated = password.is_none();
    let password = password.unwrap_or_else(generate_password);
    auth::validate_password(&password)?;
    let password_hash = auth::hash_password(&password)?;

    let database_url = super::database_url().map_err(AdminError::MissingEnvVar)?;

    tracing::info!("Connecting to database...");
    let pool = incubator_api::db::create_pool(&database_url).await?;

    tracing::info!("Creating admin user: {} ({})", email, role);

    let admin = AdminRepository::new(&pool)
        .create(&NewAdmin {
            name: name.trim().to_owned(),
            email: email.clone(),
            password_hash,
            role,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(email.to_string()),
            other => other.into(),
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}, Role: {}",
        admin.id,
        admin.email,
        admin.role
    );
    if generated {
        tracing::warn!("Generated password (shown once): {}", password);
    }

    Ok(admin.id.as_i32())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_passes_rules() {
        let password = generate_password();
        assert_eq!(password.len(), GENERATED_PASSWORD_LENGTH);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(auth::validate_password(&password).is_ok());
    }

    #[test]
    fn test_generated_passwords_differ() {
        assert_ne!(generate_password(), generate_password());
    }
}

//! Authentication extractors.
//!
//! Tokens are read from `Authorization: Bearer <jwt>` or, for older
//! clients, the `x-auth-token` header. Missing or invalid tokens are
//! rejected with 401; a valid token of the wrong kind or role with 403.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::{AppError, set_sentry_account};
use crate::models::{CurrentAccount, CurrentAdmin, CurrentStartup};
use crate::services::auth::TokenError;
use crate::state::AppState;

/// Legacy token header accepted alongside `Authorization`.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Pull the raw token out of the request headers.
fn token_from_parts(parts: &Parts) -> Option<&str> {
    let headers = &parts.headers;

    if let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token);
    }

    headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Verify the request's token and return the account it names.
fn authenticate(parts: &Parts, state: &AppState) -> Result<CurrentAccount, AppError> {
    let token = token_from_parts(parts)
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let claims = state.tokens().verify(token).map_err(|e| match e {
        TokenError::Expired => AppError::Unauthorized("Token expired".to_string()),
        _ => AppError::Unauthorized("Invalid token".to_string()),
    })?;

    let account = claims
        .account()
        .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

    set_sentry_account(&account);
    Ok(account)
}

/// Extractor for any authenticated account (admin or startup).
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAccount(account): RequireAccount) -> impl IntoResponse {
///     matches!(account, CurrentAccount::Admin(_)).to_string()
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAccount(pub CurrentAccount);

impl<S> FromRequestParts<S> for RequireAccount
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        authenticate(parts, &state).map(Self)
    }
}

/// Extractor that requires an admin token.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin(pub CurrentAdmin);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        match authenticate(parts, &state)? {
            CurrentAccount::Admin(admin) => Ok(Self(admin)),
            CurrentAccount::Startup(_) => Err(AppError::Forbidden("Admin access required".to_string())),
        }
    }
}

/// Extractor that requires a super admin token.
#[derive(Debug, Clone, Copy)]
pub struct RequireSuperAdmin(pub CurrentAdmin);

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAdmin(admin) = RequireAdmin::from_request_parts(parts, state).await?;

        if !admin.is_super_admin() {
            return Err(AppError::Forbidden(
                "Only super admins can access this resource".to_string(),
            ));
        }

        Ok(Self(admin))
    }
}

/// Extractor that requires a startup token.
#[derive(Debug, Clone, Copy)]
pub struct RequireStartup(pub CurrentStartup);

impl<S> FromRequestParts<S> for RequireStartup
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        match authenticate(parts, &state)? {
            CurrentAccount::Startup(startup) => Ok(Self(startup)),
            CurrentAccount::Admin(_) => {
                Err(AppError::Forbidden("Startup access required".to_string()))
            }
        }
    }
}

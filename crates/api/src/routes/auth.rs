//! Login and registration for admins and startups.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use incubator_core::AdminRole;

use super::extract::ApiJson;
use super::missing;
use super::startups::ProfileRequest;
use super::validation::{self, MAX_SHORT_TEXT, ValidationError};
use crate::db::AdminRepository;
use crate::error::Result;
use crate::middleware::{RequireAdmin, RequireSuperAdmin};
use crate::models::{Admin, Startup};
use crate::services::auth::{AuthService, RegisterStartup};
use crate::state::AppState;

/// Routes that log in or create accounts. These get the strict rate limiter.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/login", post(admin_login))
        .route("/api/admin/register", post(admin_register))
        .route("/api/startups/register", post(startup_register))
        .route("/api/startups/login", post(startup_login))
}

/// Authenticated account routes that are not rate limited as logins.
pub fn session_router() -> Router<AppState> {
    Router::new().route("/api/admin/me", get(admin_me))
}

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        validation::required_text("email", &self.email, MAX_SHORT_TEXT)?;
        if self.password.is_empty() {
            return Err(ValidationError::new("password", "password is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub admin: Admin,
}

#[derive(Debug, Serialize)]
pub struct StartupLoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub startup: Startup,
}

#[derive(Debug, Deserialize)]
pub struct RegisterAdminRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<AdminRole>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterStartupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(flatten)]
    pub profile: ProfileRequest,
}

// =============================================================================
// Admin
// =============================================================================

#[instrument(skip(state, body))]
async fn admin_login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<AdminLoginResponse>> {
    body.validate()?;

    let session = AuthService::new(state.pool(), state.tokens())
        .login_admin(&body.email, &body.password)
        .await?;

    info!(admin_id = %session.admin.id, "admin logged in");

    Ok(Json(AdminLoginResponse {
        token: session.token.token,
        expires_at: session.token.expires_at,
        admin: session.admin,
    }))
}

#[instrument(skip(state, body), fields(by = %by.id))]
async fn admin_register(
    RequireSuperAdmin(by): RequireSuperAdmin,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterAdminRequest>,
) -> Result<(StatusCode, Json<Admin>)> {
    let name = validation::required_text("name", &body.name, MAX_SHORT_TEXT)?;
    validation::email("email", &body.email)?;
    validation::password("password", &body.password)?;

    let admin = AuthService::new(state.pool(), state.tokens())
        .register_admin(
            &name,
            &body.email,
            &body.password,
            body.role.unwrap_or_default(),
        )
        .await?;

    info!(admin_id = %admin.id, role = %admin.role, "admin registered");

    Ok((StatusCode::CREATED, Json(admin)))
}

async fn admin_me(
    RequireAdmin(current): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Admin>> {
    let admin = AdminRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| missing("Admin"))?;

    Ok(Json(admin))
}

// =============================================================================
// Startup
// =============================================================================

#[instrument(skip(state, body))]
async fn startup_register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterStartupRequest>,
) -> Result<(StatusCode, Json<Startup>)> {
    validation::email("email", &body.email)?;
    validation::password("password", &body.password)?;
    let profile = body.profile.validate()?;

    let startup = AuthService::new(state.pool(), state.tokens())
        .register_startup(RegisterStartup {
            email: body.email,
            password: body.password,
            profile,
        })
        .await?;

    state.stats().invalidate().await;
    info!(startup_id = %startup.id, "startup application submitted");

    Ok((StatusCode::CREATED, Json(startup)))
}

#[instrument(skip(state, body))]
async fn startup_login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<StartupLoginResponse>> {
    body.validate()?;

    let session = AuthService::new(state.pool(), state.tokens())
        .login_startup(&body.email, &body.password)
        .await?;

    info!(startup_id = %session.startup.id, "startup logged in");

    Ok(Json(StartupLoginResponse {
        token: session.token.token,
        expires_at: session.token.expires_at,
        startup: session.startup,
    }))
}

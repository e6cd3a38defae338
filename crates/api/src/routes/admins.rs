//! Admin account management (super admin only).

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get},
};
use tracing::{info, instrument};

use incubator_core::AdminId;

use super::extract::ApiPath;
use super::not_found_as;
use crate::db::{AdminDeletion, AdminRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireSuperAdmin;
use crate::models::Admin;
use crate::state::AppState;

/// Build the admin management router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admins", get(list))
        .route("/api/admins/{id}", delete(destroy))
}

async fn list(
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Admin>>> {
    let admins = AdminRepository::new(state.pool()).list_all().await?;
    Ok(Json(admins))
}

#[instrument(skip(state), fields(by = %current.id))]
async fn destroy(
    RequireSuperAdmin(current): RequireSuperAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AdminId>,
) -> Result<StatusCode> {
    if id == current.id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }

    let outcome = AdminRepository::new(state.pool())
        .delete_keeping_super_admin(id)
        .await
        .map_err(not_found_as("Admin"))?;

    if outcome == AdminDeletion::LastSuperAdmin {
        return Err(AppError::BadRequest(
            "Cannot delete the last super admin".to_string(),
        ));
    }

    info!(admin_id = %id, "admin deleted");

    Ok(StatusCode::NO_CONTENT)
}

//! Dashboard statistics route.

use axum::{Json, Router, extract::State, routing::get};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::DashboardStats;
use crate::state::AppState;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/dashboard/stats", get(stats))
}

/// Aggregated statistics, served from the short-lived cache.
async fn stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>> {
    let stats = state.stats().get_or_compute(state.pool()).await?;
    Ok(Json(stats.as_ref().clone()))
}

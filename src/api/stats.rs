//! Statistics endpoint

use axum::{extract::State, Json};

use crate::{error::AppResult, models::stats::LibrarySummary, AppState};

/// Inventory and circulation totals
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Library summary", body = LibrarySummary)
    )
)]
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<LibrarySummary>> {
    let summary = state.services.stats.summary().await?;
    Ok(Json(summary))
}

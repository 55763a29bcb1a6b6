use axum::extract::State;
use axum::http::HeaderMap;

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::extract::Json;
use crate::errors::ServerError;
use crate::models::{ActivityPoint, StatsResponse};

pub async fn stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, ServerError> {
    require_admin(&state, &headers).await?;

    let total_companies = count(&state, "SELECT COUNT(*) FROM companies").await?;
    let active_companies =
        count(&state, "SELECT COUNT(*) FROM companies WHERE status = 'ACTIVE'").await?;
    let total_tenders = count(&state, "SELECT COUNT(*) FROM tenders").await?;
    let total_encumbrances = count(&state, "SELECT COUNT(*) FROM encumbrances").await?;

    let recent_activity = sqlx::query_as::<_, ActivityPoint>(
        "SELECT date(registration_date) AS date, COUNT(*) AS companies FROM companies \
         WHERE date(registration_date) >= date('now', '-7 days') \
         GROUP BY date(registration_date) ORDER BY date",
    )
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    Ok(Json(StatsResponse {
        total_companies,
        active_companies,
        total_tenders,
        total_encumbrances,
        recent_activity,
    }))
}

async fn count(state: &AppState, sql: &str) -> Result<i64, ServerError> {
    sqlx::query_scalar::<_, i64>(sql)
        .fetch_one(&state.db)
        .await
        .map_err(ServerError::internal)
}

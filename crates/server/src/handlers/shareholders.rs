use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, StatusCode};

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::extract::Json;
use crate::errors::ServerError;
use crate::handlers::companies::ensure_company;
use crate::models::{ShareholderRequest, ShareholderRow};
use crate::validate::{require_field, validate_percentage};

async fn fetch_shareholder(
    state: &AppState,
    shareholder_id: i64,
) -> Result<ShareholderRow, ServerError> {
    sqlx::query_as::<_, ShareholderRow>(
        "SELECT id, company_id, name, percentage, shares FROM shareholders WHERE id = ?1",
    )
    .bind(shareholder_id)
    .fetch_optional(&state.db)
    .await
    .map_err(ServerError::internal)?
    .ok_or_else(|| ServerError::new(StatusCode::NOT_FOUND, "shareholder not found"))
}

/// Company-wide shareholding may not exceed 100%. `exclude` carries the row
/// being updated so its current percentage is not double counted.
async fn check_total_percentage(
    state: &AppState,
    company_id: i64,
    added: f64,
    exclude: Option<i64>,
) -> Result<(), ServerError> {
    let existing = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(percentage), 0.0) FROM shareholders \
         WHERE company_id = ?1 AND id != COALESCE(?2, -1)",
    )
    .bind(company_id)
    .bind(exclude)
    .fetch_one(&state.db)
    .await
    .map_err(ServerError::internal)?;

    if existing + added > 100.0 {
        return Err(ServerError::new(
            StatusCode::BAD_REQUEST,
            "total shareholding cannot exceed 100%",
        ));
    }
    Ok(())
}

pub async fn list_shareholders(
    State(state): State<AppState>,
    AxumPath(company_id): AxumPath<i64>,
) -> Result<Json<Vec<ShareholderRow>>, ServerError> {
    ensure_company(&state, company_id).await?;

    let rows = sqlx::query_as::<_, ShareholderRow>(
        "SELECT id, company_id, name, percentage, shares FROM shareholders \
         WHERE company_id = ?1 ORDER BY percentage DESC, name",
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    Ok(Json(rows))
}

pub async fn create_shareholder(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(company_id): AxumPath<i64>,
    Json(payload): Json<ShareholderRequest>,
) -> Result<(StatusCode, Json<ShareholderRow>), ServerError> {
    require_admin(&state, &headers).await?;
    ensure_company(&state, company_id).await?;
    require_field(&payload.name, "name and percentage required")?;
    validate_percentage(payload.percentage)?;
    check_total_percentage(&state, company_id, payload.percentage, None).await?;

    let result = sqlx::query(
        "INSERT INTO shareholders (company_id, name, percentage, shares) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(company_id)
    .bind(payload.name.trim())
    .bind(payload.percentage)
    .bind(payload.shares)
    .execute(&state.db)
    .await
    .map_err(ServerError::internal)?;

    let row = fetch_shareholder(&state, result.last_insert_rowid()).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_shareholder(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath((company_id, shareholder_id)): AxumPath<(i64, i64)>,
    Json(payload): Json<ShareholderRequest>,
) -> Result<Json<ShareholderRow>, ServerError> {
    require_admin(&state, &headers).await?;
    require_field(&payload.name, "name and percentage required")?;
    validate_percentage(payload.percentage)?;
    check_total_percentage(&state, company_id, payload.percentage, Some(shareholder_id)).await?;

    let result = sqlx::query(
        "UPDATE shareholders SET name = ?1, percentage = ?2, shares = ?3 \
         WHERE id = ?4 AND company_id = ?5",
    )
    .bind(payload.name.trim())
    .bind(payload.percentage)
    .bind(payload.shares)
    .bind(shareholder_id)
    .bind(company_id)
    .execute(&state.db)
    .await
    .map_err(ServerError::internal)?;

    if result.rows_affected() == 0 {
        return Err(ServerError::new(
            StatusCode::NOT_FOUND,
            "shareholder not found",
        ));
    }

    let row = fetch_shareholder(&state, shareholder_id).await?;
    Ok(Json(row))
}

pub async fn delete_shareholder(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath((company_id, shareholder_id)): AxumPath<(i64, i64)>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query("DELETE FROM shareholders WHERE id = ?1 AND company_id = ?2")
        .bind(shareholder_id)
        .bind(company_id)
        .execute(&state.db)
        .await
        .map_err(ServerError::internal)?;

    if result.rows_affected() == 0 {
        return Err(ServerError::new(
            StatusCode::NOT_FOUND,
            "shareholder not found",
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

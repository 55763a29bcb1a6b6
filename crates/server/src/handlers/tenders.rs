use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, StatusCode};

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::extract::Json;
use crate::errors::ServerError;
use crate::handlers::companies::ensure_company;
use crate::models::{TenderRequest, TenderRow};
use crate::validate::{require_field, validate_non_negative};

fn validate_tender(payload: &TenderRequest) -> Result<(), ServerError> {
    require_field(&payload.project_name, "project name required")?;
    if let Some(amount) = payload.amount {
        validate_non_negative(amount, "amount cannot be negative")?;
    }
    Ok(())
}

async fn fetch_tender(state: &AppState, tender_id: i64) -> Result<TenderRow, ServerError> {
    sqlx::query_as::<_, TenderRow>(
        "SELECT id, company_id, project_name, amount, award_date, status, government_entity \
         FROM tenders WHERE id = ?1",
    )
    .bind(tender_id)
    .fetch_optional(&state.db)
    .await
    .map_err(ServerError::internal)?
    .ok_or_else(|| ServerError::new(StatusCode::NOT_FOUND, "tender not found"))
}

pub async fn list_tenders(
    State(state): State<AppState>,
    AxumPath(company_id): AxumPath<i64>,
) -> Result<Json<Vec<TenderRow>>, ServerError> {
    ensure_company(&state, company_id).await?;

    let rows = sqlx::query_as::<_, TenderRow>(
        "SELECT id, company_id, project_name, amount, award_date, status, government_entity \
         FROM tenders WHERE company_id = ?1 ORDER BY award_date DESC, id DESC",
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    Ok(Json(rows))
}

pub async fn create_tender(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(company_id): AxumPath<i64>,
    Json(payload): Json<TenderRequest>,
) -> Result<(StatusCode, Json<TenderRow>), ServerError> {
    require_admin(&state, &headers).await?;
    ensure_company(&state, company_id).await?;
    validate_tender(&payload)?;

    let result = sqlx::query(
        "INSERT INTO tenders (company_id, project_name, amount, award_date, status, \
         government_entity) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(company_id)
    .bind(payload.project_name.trim())
    .bind(payload.amount)
    .bind(&payload.award_date)
    .bind(&payload.status)
    .bind(&payload.government_entity)
    .execute(&state.db)
    .await
    .map_err(ServerError::internal)?;

    let row = fetch_tender(&state, result.last_insert_rowid()).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_tender(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath((company_id, tender_id)): AxumPath<(i64, i64)>,
    Json(payload): Json<TenderRequest>,
) -> Result<Json<TenderRow>, ServerError> {
    require_admin(&state, &headers).await?;
    validate_tender(&payload)?;

    let result = sqlx::query(
        "UPDATE tenders SET project_name = ?1, amount = ?2, award_date = ?3, status = ?4, \
         government_entity = ?5 WHERE id = ?6 AND company_id = ?7",
    )
    .bind(payload.project_name.trim())
    .bind(payload.amount)
    .bind(&payload.award_date)
    .bind(&payload.status)
    .bind(&payload.government_entity)
    .bind(tender_id)
    .bind(company_id)
    .execute(&state.db)
    .await
    .map_err(ServerError::internal)?;

    if result.rows_affected() == 0 {
        return Err(ServerError::new(StatusCode::NOT_FOUND, "tender not found"));
    }

    let row = fetch_tender(&state, tender_id).await?;
    Ok(Json(row))
}

pub async fn delete_tender(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath((company_id, tender_id)): AxumPath<(i64, i64)>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query("DELETE FROM tenders WHERE id = ?1 AND company_id = ?2")
        .bind(tender_id)
        .bind(company_id)
        .execute(&state.db)
        .await
        .map_err(ServerError::internal)?;

    if result.rows_affected() == 0 {
        return Err(ServerError::new(StatusCode::NOT_FOUND, "tender not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

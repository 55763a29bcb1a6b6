use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, StatusCode};

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::extract::Json;
use crate::errors::{map_db_error, ServerError};
use crate::handlers::companies::ensure_company;
use crate::models::{FinancialRequest, FinancialRow};
use crate::validate::validate_year;

async fn fetch_financial(state: &AppState, financial_id: i64) -> Result<FinancialRow, ServerError> {
    sqlx::query_as::<_, FinancialRow>(
        "SELECT id, company_id, year, revenue, profit, employee_count \
         FROM financials WHERE id = ?1",
    )
    .bind(financial_id)
    .fetch_optional(&state.db)
    .await
    .map_err(ServerError::internal)?
    .ok_or_else(|| ServerError::new(StatusCode::NOT_FOUND, "financial result not found"))
}

pub async fn list_financials(
    State(state): State<AppState>,
    AxumPath(company_id): AxumPath<i64>,
) -> Result<Json<Vec<FinancialRow>>, ServerError> {
    ensure_company(&state, company_id).await?;

    let rows = sqlx::query_as::<_, FinancialRow>(
        "SELECT id, company_id, year, revenue, profit, employee_count \
         FROM financials WHERE company_id = ?1 ORDER BY year DESC",
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    Ok(Json(rows))
}

pub async fn create_financial(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(company_id): AxumPath<i64>,
    Json(payload): Json<FinancialRequest>,
) -> Result<(StatusCode, Json<FinancialRow>), ServerError> {
    require_admin(&state, &headers).await?;
    ensure_company(&state, company_id).await?;
    validate_year(payload.year)?;

    let result = sqlx::query(
        "INSERT INTO financials (company_id, year, revenue, profit, employee_count) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(company_id)
    .bind(payload.year)
    .bind(payload.revenue)
    .bind(payload.profit)
    .bind(payload.employee_count)
    .execute(&state.db)
    .await
    .map_err(|e| map_db_error(e, "financial result for year already exists"))?;

    let row = fetch_financial(&state, result.last_insert_rowid()).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_financial(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath((company_id, financial_id)): AxumPath<(i64, i64)>,
    Json(payload): Json<FinancialRequest>,
) -> Result<Json<FinancialRow>, ServerError> {
    require_admin(&state, &headers).await?;
    validate_year(payload.year)?;

    let result = sqlx::query(
        "UPDATE financials SET year = ?1, revenue = ?2, profit = ?3, employee_count = ?4 \
         WHERE id = ?5 AND company_id = ?6",
    )
    .bind(payload.year)
    .bind(payload.revenue)
    .bind(payload.profit)
    .bind(payload.employee_count)
    .bind(financial_id)
    .bind(company_id)
    .execute(&state.db)
    .await
    .map_err(|e| map_db_error(e, "financial result for year already exists"))?;

    if result.rows_affected() == 0 {
        return Err(ServerError::new(
            StatusCode::NOT_FOUND,
            "financial result not found",
        ));
    }

    let row = fetch_financial(&state, financial_id).await?;
    Ok(Json(row))
}

pub async fn delete_financial(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath((company_id, financial_id)): AxumPath<(i64, i64)>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query("DELETE FROM financials WHERE id = ?1 AND company_id = ?2")
        .bind(financial_id)
        .bind(company_id)
        .execute(&state.db)
        .await
        .map_err(ServerError::internal)?;

    if result.rows_affected() == 0 {
        return Err(ServerError::new(
            StatusCode::NOT_FOUND,
            "financial result not found",
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

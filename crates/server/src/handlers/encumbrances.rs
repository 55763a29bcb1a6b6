use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, StatusCode};

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::extract::Json;
use crate::errors::ServerError;
use crate::handlers::companies::ensure_company;
use crate::models::{EncumbranceRequest, EncumbranceRow};
use crate::validate::{require_field, validate_non_negative};

fn validate_encumbrance(payload: &EncumbranceRequest) -> Result<(), ServerError> {
    require_field(&payload.kind, "type and amount required")?;
    validate_non_negative(payload.amount, "amount cannot be negative")?;
    Ok(())
}

async fn fetch_encumbrance(
    state: &AppState,
    encumbrance_id: i64,
) -> Result<EncumbranceRow, ServerError> {
    sqlx::query_as::<_, EncumbranceRow>(
        "SELECT id, company_id, kind, amount, registered_date, status \
         FROM encumbrances WHERE id = ?1",
    )
    .bind(encumbrance_id)
    .fetch_optional(&state.db)
    .await
    .map_err(ServerError::internal)?
    .ok_or_else(|| ServerError::new(StatusCode::NOT_FOUND, "encumbrance not found"))
}

pub async fn list_encumbrances(
    State(state): State<AppState>,
    AxumPath(company_id): AxumPath<i64>,
) -> Result<Json<Vec<EncumbranceRow>>, ServerError> {
    ensure_company(&state, company_id).await?;

    let rows = sqlx::query_as::<_, EncumbranceRow>(
        "SELECT id, company_id, kind, amount, registered_date, status \
         FROM encumbrances WHERE company_id = ?1 ORDER BY registered_date DESC, id DESC",
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    Ok(Json(rows))
}

pub async fn create_encumbrance(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(company_id): AxumPath<i64>,
    Json(payload): Json<EncumbranceRequest>,
) -> Result<(StatusCode, Json<EncumbranceRow>), ServerError> {
    require_admin(&state, &headers).await?;
    ensure_company(&state, company_id).await?;
    validate_encumbrance(&payload)?;

    let result = sqlx::query(
        "INSERT INTO encumbrances (company_id, kind, amount, registered_date, status) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(company_id)
    .bind(payload.kind.trim())
    .bind(payload.amount)
    .bind(&payload.registered_date)
    .bind(&payload.status)
    .execute(&state.db)
    .await
    .map_err(ServerError::internal)?;

    let row = fetch_encumbrance(&state, result.last_insert_rowid()).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_encumbrance(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath((company_id, encumbrance_id)): AxumPath<(i64, i64)>,
    Json(payload): Json<EncumbranceRequest>,
) -> Result<Json<EncumbranceRow>, ServerError> {
    require_admin(&state, &headers).await?;
    validate_encumbrance(&payload)?;

    let result = sqlx::query(
        "UPDATE encumbrances SET kind = ?1, amount = ?2, registered_date = ?3, status = ?4 \
         WHERE id = ?5 AND company_id = ?6",
    )
    .bind(payload.kind.trim())
    .bind(payload.amount)
    .bind(&payload.registered_date)
    .bind(&payload.status)
    .bind(encumbrance_id)
    .bind(company_id)
    .execute(&state.db)
    .await
    .map_err(ServerError::internal)?;

    if result.rows_affected() == 0 {
        return Err(ServerError::new(
            StatusCode::NOT_FOUND,
            "encumbrance not found",
        ));
    }

    let row = fetch_encumbrance(&state, encumbrance_id).await?;
    Ok(Json(row))
}

pub async fn delete_encumbrance(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath((company_id, encumbrance_id)): AxumPath<(i64, i64)>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query("DELETE FROM encumbrances WHERE id = ?1 AND company_id = ?2")
        .bind(encumbrance_id)
        .bind(company_id)
        .execute(&state.db)
        .await
        .map_err(ServerError::internal)?;

    if result.rows_affected() == 0 {
        return Err(ServerError::new(
            StatusCode::NOT_FOUND,
            "encumbrance not found",
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

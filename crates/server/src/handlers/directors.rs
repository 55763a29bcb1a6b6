use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, StatusCode};

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::extract::Json;
use crate::errors::ServerError;
use crate::handlers::companies::ensure_company;
use crate::models::{DirectorRequest, DirectorRow};
use crate::validate::require_field;

async fn fetch_director(state: &AppState, director_id: i64) -> Result<DirectorRow, ServerError> {
    sqlx::query_as::<_, DirectorRow>(
        "SELECT id, company_id, name, role, nationality, appointment_date, shares \
         FROM directors WHERE id = ?1",
    )
    .bind(director_id)
    .fetch_optional(&state.db)
    .await
    .map_err(ServerError::internal)?
    .ok_or_else(|| ServerError::new(StatusCode::NOT_FOUND, "director not found"))
}

pub async fn list_directors(
    State(state): State<AppState>,
    AxumPath(company_id): AxumPath<i64>,
) -> Result<Json<Vec<DirectorRow>>, ServerError> {
    ensure_company(&state, company_id).await?;

    let rows = sqlx::query_as::<_, DirectorRow>(
        "SELECT id, company_id, name, role, nationality, appointment_date, shares \
         FROM directors WHERE company_id = ?1 ORDER BY name",
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    Ok(Json(rows))
}

pub async fn create_director(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(company_id): AxumPath<i64>,
    Json(payload): Json<DirectorRequest>,
) -> Result<(StatusCode, Json<DirectorRow>), ServerError> {
    require_admin(&state, &headers).await?;
    ensure_company(&state, company_id).await?;
    require_field(&payload.name, "name required")?;

    let result = sqlx::query(
        "INSERT INTO directors (company_id, name, role, nationality, appointment_date, shares) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(company_id)
    .bind(payload.name.trim())
    .bind(&payload.role)
    .bind(&payload.nationality)
    .bind(&payload.appointment_date)
    .bind(payload.shares)
    .execute(&state.db)
    .await
    .map_err(ServerError::internal)?;

    let row = fetch_director(&state, result.last_insert_rowid()).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_director(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath((company_id, director_id)): AxumPath<(i64, i64)>,
    Json(payload): Json<DirectorRequest>,
) -> Result<Json<DirectorRow>, ServerError> {
    require_admin(&state, &headers).await?;
    require_field(&payload.name, "name required")?;

    let result = sqlx::query(
        "UPDATE directors SET name = ?1, role = ?2, nationality = ?3, \
         appointment_date = ?4, shares = ?5 WHERE id = ?6 AND company_id = ?7",
    )
    .bind(payload.name.trim())
    .bind(&payload.role)
    .bind(&payload.nationality)
    .bind(&payload.appointment_date)
    .bind(payload.shares)
    .bind(director_id)
    .bind(company_id)
    .execute(&state.db)
    .await
    .map_err(ServerError::internal)?;

    if result.rows_affected() == 0 {
        return Err(ServerError::new(StatusCode::NOT_FOUND, "director not found"));
    }

    let row = fetch_director(&state, director_id).await?;
    Ok(Json(row))
}

pub async fn delete_director(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath((company_id, director_id)): AxumPath<(i64, i64)>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query("DELETE FROM directors WHERE id = ?1 AND company_id = ?2")
        .bind(director_id)
        .bind(company_id)
        .execute(&state.db)
        .await
        .map_err(ServerError::internal)?;

    if result.rows_affected() == 0 {
        return Err(ServerError::new(StatusCode::NOT_FOUND, "director not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

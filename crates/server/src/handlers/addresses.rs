use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, StatusCode};

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::extract::Json;
use crate::errors::ServerError;
use crate::handlers::companies::ensure_company;
use crate::models::{AddressRequest, AddressRow};
use crate::validate::{require_field, validate_postal_code};

fn validate_address(payload: &AddressRequest) -> Result<(), ServerError> {
    require_field(&payload.street, "street, city and country required")?;
    require_field(&payload.city, "street, city and country required")?;
    require_field(&payload.country, "street, city and country required")?;
    if let Some(code) = payload.postal_code.as_deref() {
        if !code.trim().is_empty() {
            validate_postal_code(code)?;
        }
    }
    Ok(())
}

async fn fetch_address(state: &AppState, address_id: i64) -> Result<AddressRow, ServerError> {
    sqlx::query_as::<_, AddressRow>(
        "SELECT id, company_id, street, city, country, postal_code FROM addresses WHERE id = ?1",
    )
    .bind(address_id)
    .fetch_optional(&state.db)
    .await
    .map_err(ServerError::internal)?
    .ok_or_else(|| ServerError::new(StatusCode::NOT_FOUND, "address not found"))
}

pub async fn list_addresses(
    State(state): State<AppState>,
    AxumPath(company_id): AxumPath<i64>,
) -> Result<Json<Vec<AddressRow>>, ServerError> {
    ensure_company(&state, company_id).await?;

    let rows = sqlx::query_as::<_, AddressRow>(
        "SELECT id, company_id, street, city, country, postal_code \
         FROM addresses WHERE company_id = ?1 ORDER BY id",
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    Ok(Json(rows))
}

pub async fn create_address(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(company_id): AxumPath<i64>,
    Json(payload): Json<AddressRequest>,
) -> Result<(StatusCode, Json<AddressRow>), ServerError> {
    require_admin(&state, &headers).await?;
    ensure_company(&state, company_id).await?;
    validate_address(&payload)?;

    let result = sqlx::query(
        "INSERT INTO addresses (company_id, street, city, country, postal_code) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(company_id)
    .bind(payload.street.trim())
    .bind(payload.city.trim())
    .bind(payload.country.trim())
    .bind(&payload.postal_code)
    .execute(&state.db)
    .await
    .map_err(ServerError::internal)?;

    let row = fetch_address(&state, result.last_insert_rowid()).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_address(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath((company_id, address_id)): AxumPath<(i64, i64)>,
    Json(payload): Json<AddressRequest>,
) -> Result<Json<AddressRow>, ServerError> {
    require_admin(&state, &headers).await?;
    validate_address(&payload)?;

    let result = sqlx::query(
        "UPDATE addresses SET street = ?1, city = ?2, country = ?3, postal_code = ?4 \
         WHERE id = ?5 AND company_id = ?6",
    )
    .bind(payload.street.trim())
    .bind(payload.city.trim())
    .bind(payload.country.trim())
    .bind(&payload.postal_code)
    .bind(address_id)
    .bind(company_id)
    .execute(&state.db)
    .await
    .map_err(ServerError::internal)?;

    if result.rows_affected() == 0 {
        return Err(ServerError::new(StatusCode::NOT_FOUND, "address not found"));
    }

    let row = fetch_address(&state, address_id).await?;
    Ok(Json(row))
}

pub async fn delete_address(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath((company_id, address_id)): AxumPath<(i64, i64)>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query("DELETE FROM addresses WHERE id = ?1 AND company_id = ?2")
        .bind(address_id)
        .bind(company_id)
        .execute(&state.db)
        .await
        .map_err(ServerError::internal)?;

    if result.rows_affected() == 0 {
        return Err(ServerError::new(StatusCode::NOT_FOUND, "address not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

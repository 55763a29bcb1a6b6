use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, StatusCode};

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::extract::Json;
use crate::errors::ServerError;
use crate::handlers::companies::ensure_company;
use crate::models::{ContactRequest, ContactRow};
use crate::validate::{require_field, validate_email, validate_phone};

fn validate_contact(payload: &ContactRequest) -> Result<(), ServerError> {
    require_field(&payload.name, "name and role required")?;
    require_field(&payload.role, "name and role required")?;
    if let Some(email) = payload.email.as_deref() {
        if !email.trim().is_empty() {
            validate_email(email)?;
        }
    }
    if let Some(phone) = payload.phone.as_deref() {
        if !phone.trim().is_empty() {
            validate_phone(phone)?;
        }
    }
    Ok(())
}

async fn fetch_contact(state: &AppState, contact_id: i64) -> Result<ContactRow, ServerError> {
    sqlx::query_as::<_, ContactRow>(
        "SELECT id, company_id, name, role, email, phone, is_primary FROM contacts WHERE id = ?1",
    )
    .bind(contact_id)
    .fetch_optional(&state.db)
    .await
    .map_err(ServerError::internal)?
    .ok_or_else(|| ServerError::new(StatusCode::NOT_FOUND, "contact not found"))
}

pub async fn list_contacts(
    State(state): State<AppState>,
    AxumPath(company_id): AxumPath<i64>,
) -> Result<Json<Vec<ContactRow>>, ServerError> {
    ensure_company(&state, company_id).await?;

    let rows = sqlx::query_as::<_, ContactRow>(
        "SELECT id, company_id, name, role, email, phone, is_primary \
         FROM contacts WHERE company_id = ?1 ORDER BY is_primary DESC, name",
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    Ok(Json(rows))
}

pub async fn create_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(company_id): AxumPath<i64>,
    Json(payload): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactRow>), ServerError> {
    require_admin(&state, &headers).await?;
    ensure_company(&state, company_id).await?;
    validate_contact(&payload)?;

    let result = sqlx::query(
        "INSERT INTO contacts (company_id, name, role, email, phone, is_primary) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(company_id)
    .bind(payload.name.trim())
    .bind(payload.role.trim())
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(payload.is_primary)
    .execute(&state.db)
    .await
    .map_err(ServerError::internal)?;

    let row = fetch_contact(&state, result.last_insert_rowid()).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath((company_id, contact_id)): AxumPath<(i64, i64)>,
    Json(payload): Json<ContactRequest>,
) -> Result<Json<ContactRow>, ServerError> {
    require_admin(&state, &headers).await?;
    validate_contact(&payload)?;

    let result = sqlx::query(
        "UPDATE contacts SET name = ?1, role = ?2, email = ?3, phone = ?4, is_primary = ?5 \
         WHERE id = ?6 AND company_id = ?7",
    )
    .bind(payload.name.trim())
    .bind(payload.role.trim())
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(payload.is_primary)
    .bind(contact_id)
    .bind(company_id)
    .execute(&state.db)
    .await
    .map_err(ServerError::internal)?;

    if result.rows_affected() == 0 {
        return Err(ServerError::new(StatusCode::NOT_FOUND, "contact not found"));
    }

    let row = fetch_contact(&state, contact_id).await?;
    Ok(Json(row))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath((company_id, contact_id)): AxumPath<(i64, i64)>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query("DELETE FROM contacts WHERE id = ?1 AND company_id = ?2")
        .bind(contact_id)
        .bind(company_id)
        .execute(&state.db)
        .await
        .map_err(ServerError::internal)?;

    if result.rows_affected() == 0 {
        return Err(ServerError::new(StatusCode::NOT_FOUND, "contact not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, StatusCode};

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::extract::Json;
use crate::errors::{map_db_error, ServerError};
use crate::models::{CompanyRequest, CompanyRow};
use crate::validate::{require_field, validate_company_status, validate_compliance_status};

fn validate_company(payload: &CompanyRequest) -> Result<(), ServerError> {
    require_field(&payload.name, "name required")?;
    require_field(&payload.registration_number, "registration number required")?;
    require_field(&payload.registration_date, "registration date required")?;
    if let Some(status) = payload.status.as_deref() {
        validate_company_status(status)?;
    }
    if let Some(status) = payload.compliance_status.as_deref() {
        validate_compliance_status(status)?;
    }
    if let Some(capital) = payload.nominal_capital {
        if capital < 0.0 {
            return Err(ServerError::new(
                StatusCode::BAD_REQUEST,
                "nominal capital cannot be negative",
            ));
        }
    }
    if let Some(shares) = payload.shares_issued {
        if shares < 0 {
            return Err(ServerError::new(
                StatusCode::BAD_REQUEST,
                "shares issued cannot be negative",
            ));
        }
    }
    Ok(())
}

async fn fetch_company(state: &AppState, company_id: i64) -> Result<CompanyRow, ServerError> {
    sqlx::query_as::<_, CompanyRow>(
        "SELECT id, name, registration_number, registration_date, status, company_type, \
         description, industry_classification, nature_of_business, nominal_capital, \
         shares_issued, share_value, compliance_status, created_at, updated_at \
         FROM companies WHERE id = ?1",
    )
    .bind(company_id)
    .fetch_optional(&state.db)
    .await
    .map_err(ServerError::internal)?
    .ok_or_else(|| ServerError::new(StatusCode::NOT_FOUND, "company not found"))
}

pub async fn create_company(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CompanyRequest>,
) -> Result<(StatusCode, Json<CompanyRow>), ServerError> {
    require_admin(&state, &headers).await?;
    validate_company(&payload)?;

    let result = sqlx::query(
        "INSERT INTO companies (name, registration_number, registration_date, status, \
         company_type, description, industry_classification, nature_of_business, \
         nominal_capital, shares_issued, share_value, compliance_status, created_at, updated_at) \
         VALUES (?1, ?2, ?3, COALESCE(?4, 'ACTIVE'), ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, \
         datetime('now'), datetime('now'))",
    )
    .bind(payload.name.trim())
    .bind(payload.registration_number.trim())
    .bind(payload.registration_date.trim())
    .bind(&payload.status)
    .bind(&payload.company_type)
    .bind(&payload.description)
    .bind(&payload.industry_classification)
    .bind(&payload.nature_of_business)
    .bind(payload.nominal_capital)
    .bind(payload.shares_issued)
    .bind(payload.share_value)
    .bind(&payload.compliance_status)
    .execute(&state.db)
    .await
    .map_err(|e| map_db_error(e, "registration number already exists"))?;

    let company = fetch_company(&state, result.last_insert_rowid()).await?;
    tracing::info!(company_id = company.id, "company created");
    Ok((StatusCode::CREATED, Json(company)))
}

pub async fn update_company(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(company_id): AxumPath<i64>,
    Json(payload): Json<CompanyRequest>,
) -> Result<Json<CompanyRow>, ServerError> {
    require_admin(&state, &headers).await?;
    validate_company(&payload)?;

    let result = sqlx::query(
        "UPDATE companies SET name = ?1, registration_number = ?2, registration_date = ?3, \
         status = COALESCE(?4, status), company_type = ?5, description = ?6, \
         industry_classification = ?7, nature_of_business = ?8, nominal_capital = ?9, \
         shares_issued = ?10, share_value = ?11, compliance_status = ?12, \
         updated_at = datetime('now') WHERE id = ?13",
    )
    .bind(payload.name.trim())
    .bind(payload.registration_number.trim())
    .bind(payload.registration_date.trim())
    .bind(&payload.status)
    .bind(&payload.company_type)
    .bind(&payload.description)
    .bind(&payload.industry_classification)
    .bind(&payload.nature_of_business)
    .bind(payload.nominal_capital)
    .bind(payload.shares_issued)
    .bind(payload.share_value)
    .bind(&payload.compliance_status)
    .bind(company_id)
    .execute(&state.db)
    .await
    .map_err(|e| map_db_error(e, "registration number already exists"))?;

    if result.rows_affected() == 0 {
        return Err(ServerError::new(StatusCode::NOT_FOUND, "company not found"));
    }

    let company = fetch_company(&state, company_id).await?;
    Ok(Json(company))
}

pub async fn delete_company(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(company_id): AxumPath<i64>,
) -> Result<StatusCode, ServerError> {
    require_admin(&state, &headers).await?;

    let result = sqlx::query("DELETE FROM companies WHERE id = ?1")
        .bind(company_id)
        .execute(&state.db)
        .await
        .map_err(ServerError::internal)?;

    if result.rows_affected() == 0 {
        return Err(ServerError::new(StatusCode::NOT_FOUND, "company not found"));
    }

    tracing::info!(company_id, "company deleted");
    Ok(StatusCode::NO_CONTENT)
}

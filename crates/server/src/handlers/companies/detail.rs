use axum::extract::{Path as AxumPath, State};
use axum::http::StatusCode;

use crate::app_state::AppState;
use crate::extract::Json;
use crate::errors::ServerError;
use crate::models::{AddressRow, CompanyDetail, CompanyRow, ContactRow, DirectorRow, ShareholderRow};

pub async fn company_detail(
    State(state): State<AppState>,
    AxumPath(company_id): AxumPath<i64>,
) -> Result<Json<CompanyDetail>, ServerError> {
    let company = sqlx::query_as::<_, CompanyRow>(
        "SELECT id, name, registration_number, registration_date, status, company_type, \
         description, industry_classification, nature_of_business, nominal_capital, \
         shares_issued, share_value, compliance_status, created_at, updated_at \
         FROM companies WHERE id = ?1",
    )
    .bind(company_id)
    .fetch_optional(&state.db)
    .await
    .map_err(ServerError::internal)?
    .ok_or_else(|| ServerError::new(StatusCode::NOT_FOUND, "company not found"))?;

    let directors = sqlx::query_as::<_, DirectorRow>(
        "SELECT id, company_id, name, role, nationality, appointment_date, shares \
         FROM directors WHERE company_id = ?1 ORDER BY name",
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    let shareholders = sqlx::query_as::<_, ShareholderRow>(
        "SELECT id, company_id, name, percentage, shares \
         FROM shareholders WHERE company_id = ?1 ORDER BY percentage DESC, name",
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    let addresses = sqlx::query_as::<_, AddressRow>(
        "SELECT id, company_id, street, city, country, postal_code \
         FROM addresses WHERE company_id = ?1 ORDER BY id",
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    let contacts = sqlx::query_as::<_, ContactRow>(
        "SELECT id, company_id, name, role, email, phone, is_primary \
         FROM contacts WHERE company_id = ?1 ORDER BY is_primary DESC, name",
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    Ok(Json(CompanyDetail {
        company,
        directors,
        shareholders,
        addresses,
        contacts,
    }))
}

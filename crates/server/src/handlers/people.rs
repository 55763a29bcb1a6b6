use axum::extract::{Path as AxumPath, State};
use axum::http::StatusCode;

use crate::app_state::AppState;
use crate::extract::Json;
use crate::errors::ServerError;
use crate::models::{CompanySummary, PersonCompaniesResponse};

/// Companies where the person appears as a director or shareholder. The id
/// may come from either table; the match then widens to every record with
/// the same person name, deduplicated by company.
pub async fn person_companies(
    State(state): State<AppState>,
    AxumPath(person_id): AxumPath<i64>,
) -> Result<Json<PersonCompaniesResponse>, ServerError> {
    let name = sqlx::query_scalar::<_, String>("SELECT name FROM directors WHERE id = ?1")
        .bind(person_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ServerError::internal)?;

    let name = match name {
        Some(name) => name,
        None => sqlx::query_scalar::<_, String>("SELECT name FROM shareholders WHERE id = ?1")
            .bind(person_id)
            .fetch_optional(&state.db)
            .await
            .map_err(ServerError::internal)?
            .ok_or_else(|| ServerError::new(StatusCode::NOT_FOUND, "person not found"))?,
    };

    let companies = sqlx::query_as::<_, CompanySummary>(
        "SELECT DISTINCT c.id, c.name, c.registration_number, c.registration_date, c.status \
         FROM companies c WHERE c.id IN ( \
             SELECT company_id FROM directors WHERE name = ?1 \
             UNION \
             SELECT company_id FROM shareholders WHERE name = ?1 \
         ) ORDER BY c.name",
    )
    .bind(&name)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    Ok(Json(PersonCompaniesResponse { companies }))
}

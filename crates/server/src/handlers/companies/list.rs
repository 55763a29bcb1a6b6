use axum::extract::{Query, State};
use axum::http::StatusCode;
use sqlx::{QueryBuilder, Sqlite};

use crate::app_state::AppState;
use crate::extract::Json;
use crate::errors::ServerError;
use crate::models::{CompanyListQuery, CompanyListResponse, CompanySummary};

pub async fn list_companies(
    State(state): State<AppState>,
    Query(query): Query<CompanyListQuery>,
) -> Result<Json<CompanyListResponse>, ServerError> {
    let limit = query.limit.unwrap_or(50).min(200) as i64;
    let offset = query.offset.unwrap_or(0) as i64;

    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s @ ("ACTIVE" | "INACTIVE")) => Some(s.to_string()),
        Some(other) => {
            return Err(ServerError::new(
                StatusCode::BAD_REQUEST,
                format!("invalid status filter: {other}"),
            ));
        }
    };

    let mut count_builder =
        QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM companies");
    if let Some(status) = &status {
        count_builder.push(" WHERE status = ");
        count_builder.push_bind(status);
    }
    let total = count_builder
        .build_query_scalar::<i64>()
        .fetch_one(&state.db)
        .await
        .map_err(ServerError::internal)?;

    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT id, name, registration_number, registration_date, status FROM companies",
    );
    if let Some(status) = &status {
        builder.push(" WHERE status = ");
        builder.push_bind(status);
    }
    builder.push(" ORDER BY registration_date DESC, id DESC LIMIT ");
    builder.push_bind(limit);
    builder.push(" OFFSET ");
    builder.push_bind(offset);

    let companies = builder
        .build_query_as::<CompanySummary>()
        .fetch_all(&state.db)
        .await
        .map_err(ServerError::internal)?;

    Ok(Json(CompanyListResponse { total, companies }))
}

use axum::extract::{Query, State};

use crate::app_state::AppState;
use crate::extract::Json;
use crate::errors::ServerError;
use crate::models::{
    CompanySummary, DirectorRow, QuickSearchHit, QuickSearchResponse, SearchHit, SearchQuery,
    SearchResponse,
};

const SEARCH_CAP: i64 = 50;
const QUICK_SEARCH_CAP: i64 = 5;

/// Case-insensitive substring match over company name, registration number,
/// and director name. An empty query returns an empty result set rather than
/// an error, matching the search box behavior.
pub async fn search_companies(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ServerError> {
    let q = query.q.as_deref().unwrap_or_default().trim().to_string();

    if q.is_empty() {
        return Ok(Json(SearchResponse {
            query: q,
            count: 0,
            results: Vec::new(),
        }));
    }

    let pattern = format!("%{q}%");

    let companies = sqlx::query_as::<_, CompanySummary>(
        "SELECT DISTINCT c.id, c.name, c.registration_number, c.registration_date, c.status \
         FROM companies c LEFT JOIN directors d ON d.company_id = c.id \
         WHERE lower(c.name) LIKE lower(?1) \
            OR lower(c.registration_number) LIKE lower(?1) \
            OR lower(d.name) LIKE lower(?1) \
         ORDER BY c.name LIMIT ?2",
    )
    .bind(&pattern)
    .bind(SEARCH_CAP)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    let mut results = Vec::with_capacity(companies.len());
    for company in companies {
        let directors = sqlx::query_as::<_, DirectorRow>(
            "SELECT id, company_id, name, role, nationality, appointment_date, shares \
             FROM directors WHERE company_id = ?1 ORDER BY name",
        )
        .bind(company.id)
        .fetch_all(&state.db)
        .await
        .map_err(ServerError::internal)?;

        results.push(SearchHit { company, directors });
    }

    Ok(Json(SearchResponse {
        query: q,
        count: results.len(),
        results,
    }))
}

/// Typeahead variant: name and registration number only, capped at 5.
pub async fn quick_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<QuickSearchResponse>, ServerError> {
    let q = query.q.as_deref().unwrap_or_default().trim();

    if q.is_empty() {
        return Ok(Json(QuickSearchResponse { results: Vec::new() }));
    }

    let pattern = format!("%{q}%");

    let results = sqlx::query_as::<_, QuickSearchHit>(
        "SELECT id, name, registration_number FROM companies \
         WHERE lower(name) LIKE lower(?1) \
            OR lower(registration_number) LIKE lower(?1) \
         ORDER BY name LIMIT ?2",
    )
    .bind(&pattern)
    .bind(QUICK_SEARCH_CAP)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    Ok(Json(QuickSearchResponse { results }))
}

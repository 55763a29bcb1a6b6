use axum::extract::{Query, State};

use crate::app_state::AppState;
use crate::extract::Json;
use crate::errors::ServerError;
use crate::models::{GlobalSearchResult, SearchQuery};

const PER_TYPE_CAP: i64 = 5;

/// Global typed search for the navigation bar: company hits first, then
/// people (directors), each with a UI url.
pub async fn global_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<GlobalSearchResult>>, ServerError> {
    let q = query.q.as_deref().unwrap_or_default().trim();

    if q.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let pattern = format!("%{q}%");
    let mut results = Vec::new();

    let companies = sqlx::query_as::<_, (i64, String, String)>(
        "SELECT id, name, registration_number FROM companies \
         WHERE lower(name) LIKE lower(?1) \
            OR lower(registration_number) LIKE lower(?1) \
         ORDER BY name LIMIT ?2",
    )
    .bind(&pattern)
    .bind(PER_TYPE_CAP)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    for (id, name, registration_number) in companies {
        results.push(GlobalSearchResult {
            id,
            kind: "company".to_string(),
            title: name,
            subtitle: Some(format!("Registration: {registration_number}")),
            url: format!("/companies/{id}"),
        });
    }

    let people = sqlx::query_as::<_, (i64, String, String)>(
        "SELECT d.id, d.name, c.name FROM directors d \
         JOIN companies c ON c.id = d.company_id \
         WHERE lower(d.name) LIKE lower(?1) ORDER BY d.name LIMIT ?2",
    )
    .bind(&pattern)
    .bind(PER_TYPE_CAP)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    for (id, name, company_name) in people {
        results.push(GlobalSearchResult {
            id,
            kind: "person".to_string(),
            title: name,
            subtitle: Some(format!("Director at {company_name}")),
            url: format!("/people/{id}"),
        });
    }

    Ok(Json(results))
}

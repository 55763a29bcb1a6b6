mod crud;
mod detail;
mod list;
mod network;
mod search;

pub use crud::{create_company, delete_company, update_company};
pub use detail::company_detail;
pub use list::list_companies;
pub use network::company_network;
pub use search::{quick_search, search_companies};

use axum::http::StatusCode;

use crate::app_state::AppState;
use crate::errors::ServerError;

/// 404 guard shared by the per-company child collections.
pub async fn ensure_company(state: &AppState, company_id: i64) -> Result<(), ServerError> {
    let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM companies WHERE id = ?1")
        .bind(company_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ServerError::internal)?;

    if exists.is_none() {
        return Err(ServerError::new(StatusCode::NOT_FOUND, "company not found"));
    }
    Ok(())
}

use std::collections::HashMap;

use axum::extract::{Path as AxumPath, State};
use axum::http::StatusCode;

use crate::app_state::AppState;
use crate::extract::Json;
use crate::errors::ServerError;
use crate::models::{NetworkLink, NetworkNode, NetworkResponse};

/// Graph data for the force-directed relationship view: one node for the
/// company, one per distinct person, and a labeled link per role. People
/// appearing as both director and shareholder collapse into a single node.
pub async fn company_network(
    State(state): State<AppState>,
    AxumPath(company_id): AxumPath<i64>,
) -> Result<Json<NetworkResponse>, ServerError> {
    let company_name = sqlx::query_scalar::<_, String>("SELECT name FROM companies WHERE id = ?1")
        .bind(company_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ServerError::internal)?
        .ok_or_else(|| ServerError::new(StatusCode::NOT_FOUND, "company not found"))?;

    let directors = sqlx::query_as::<_, (i64, String)>(
        "SELECT id, name FROM directors WHERE company_id = ?1 ORDER BY id",
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    let shareholders = sqlx::query_as::<_, (i64, String)>(
        "SELECT id, name FROM shareholders WHERE company_id = ?1 ORDER BY id",
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await
    .map_err(ServerError::internal)?;

    let company_node_id = format!("company:{company_id}");
    let mut nodes = vec![NetworkNode {
        id: company_node_id.clone(),
        label: company_name,
        kind: "company".to_string(),
    }];
    let mut links = Vec::new();

    // keyed by person name so dual roles share one node
    let mut person_nodes: HashMap<String, String> = HashMap::new();

    for (relationship, people) in [("director", &directors), ("shareholder", &shareholders)] {
        for (id, name) in people {
            let node_id = person_nodes
                .entry(name.clone())
                .or_insert_with(|| {
                    let node_id = format!("person:{relationship}:{id}");
                    nodes.push(NetworkNode {
                        id: node_id.clone(),
                        label: name.clone(),
                        kind: "person".to_string(),
                    });
                    node_id
                })
                .clone();

            links.push(NetworkLink {
                source: node_id,
                target: company_node_id.clone(),
                relationship: relationship.to_string(),
            });
        }
    }

    Ok(Json(NetworkResponse { nodes, links }))
}

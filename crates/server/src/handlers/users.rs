use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use crate::app_state::AppState;
use crate::auth::{auth_user, hash_password, hash_token, require_admin, session_token, verify_password};
use crate::extract::Json;
use crate::errors::{map_db_error, ServerError};
use crate::models::{AuthUser, CreateUserRequest, PasswordChangeRequest};
use crate::validate::validate_email;

pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<AuthUser>), ServerError> {
    require_admin(&state, &headers).await?;

    let email = payload.email.trim();
    let password = payload.password.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ServerError::new(
            StatusCode::BAD_REQUEST,
            "email and password required",
        ));
    }
    validate_email(email)?;

    let password_hash = hash_password(password).map_err(ServerError::internal)?;

    let result = sqlx::query(
        "INSERT INTO users (email, name, password_hash, is_admin, created_at) \
         VALUES (?1, ?2, ?3, ?4, datetime('now'))",
    )
    .bind(email)
    .bind(&payload.name)
    .bind(&password_hash)
    .bind(payload.is_admin)
    .execute(&state.db)
    .await
    .map_err(|e| map_db_error(e, "email already registered"))?;

    let user = sqlx::query_as::<_, AuthUser>(
        "SELECT id, email, name, is_admin FROM users WHERE id = ?1",
    )
    .bind(result.last_insert_rowid())
    .fetch_one(&state.db)
    .await
    .map_err(ServerError::internal)?;

    tracing::info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Changes the caller's own password and revokes every other session so a
/// leaked cookie stops working.
pub async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PasswordChangeRequest>,
) -> Result<StatusCode, ServerError> {
    let user = auth_user(&state, &headers).await?;

    let current_password = payload.current_password.trim();
    let new_password = payload.new_password.trim();
    if current_password.is_empty() || new_password.is_empty() {
        return Err(ServerError::new(
            StatusCode::BAD_REQUEST,
            "current_password and new_password required",
        ));
    }

    let password_hash =
        sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = ?1")
            .bind(user.id)
            .fetch_one(&state.db)
            .await
            .map_err(ServerError::internal)?;

    verify_password(&password_hash, current_password)
        .map_err(|_| ServerError::new(StatusCode::UNAUTHORIZED, "invalid credentials"))?;

    let new_hash = hash_password(new_password).map_err(ServerError::internal)?;

    sqlx::query("UPDATE users SET password_hash = ?1 WHERE id = ?2")
        .bind(&new_hash)
        .bind(user.id)
        .execute(&state.db)
        .await
        .map_err(ServerError::internal)?;

    let current_token_hash = hash_token(&session_token(&headers)?);
    sqlx::query("DELETE FROM sessions WHERE user_id = ?1 AND token_hash != ?2")
        .bind(user.id)
        .bind(&current_token_hash)
        .execute(&state.db)
        .await
        .map_err(ServerError::internal)?;

    Ok(StatusCode::NO_CONTENT)
}

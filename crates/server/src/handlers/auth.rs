use axum::extract::State;
use axum::http::{header::SET_COOKIE, HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};

use crate::app_state::AppState;
use crate::auth::{
    auth_user, clear_session_cookie, generate_token, hash_token, session_cookie, session_token,
    verify_password,
};
use crate::extract::Json;
use crate::errors::ServerError;
use crate::models::{AuthUser, LoginRequest};

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let email = payload.email.trim();
    let password = payload.password.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ServerError::new(
            StatusCode::BAD_REQUEST,
            "email and password required",
        ));
    }

    let row = sqlx::query_as::<_, (i64, String)>(
        "SELECT id, password_hash FROM users WHERE email = ?1",
    )
    .bind(email)
    .fetch_optional(&state.db)
    .await
    .map_err(ServerError::internal)?
    .ok_or_else(|| ServerError::new(StatusCode::UNAUTHORIZED, "invalid credentials"))?;

    let (user_id, password_hash) = row;
    verify_password(&password_hash, password)
        .map_err(|_| ServerError::new(StatusCode::UNAUTHORIZED, "invalid credentials"))?;

    let token = generate_token();
    let token_hash = hash_token(&token);
    let ttl = state.session_ttl_seconds as i64;

    sqlx::query(
        "INSERT INTO sessions (user_id, token_hash, expires_at, created_at) \
         VALUES (?1, ?2, datetime('now', '+' || ?3 || ' seconds'), datetime('now'))",
    )
    .bind(user_id)
    .bind(&token_hash)
    .bind(ttl)
    .execute(&state.db)
    .await
    .map_err(ServerError::internal)?;

    let user = sqlx::query_as::<_, AuthUser>(
        "SELECT id, email, name, is_admin FROM users WHERE id = ?1",
    )
    .bind(user_id)
    .fetch_one(&state.db)
    .await
    .map_err(ServerError::internal)?;

    tracing::info!(user_id, "login");

    let cookie = session_cookie(&token, state.session_ttl_seconds);
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(user)))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServerError> {
    let token = session_token(&headers)?;
    let token_hash = hash_token(&token);

    sqlx::query("DELETE FROM sessions WHERE token_hash = ?1")
        .bind(&token_hash)
        .execute(&state.db)
        .await
        .map_err(ServerError::internal)?;

    Ok((
        StatusCode::NO_CONTENT,
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
    ))
}

pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AuthUser>, ServerError> {
    let user = auth_user(&state, &headers).await?;
    Ok(Json(user))
}

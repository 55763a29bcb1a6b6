use argon2::{
    password_hash::{rand_core::OsRng, rand_core::RngCore, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::http::{HeaderMap, StatusCode};
use sha2::{Digest, Sha256};

use crate::app_state::AppState;
use crate::errors::ServerError;
use crate::models::AuthUser;

pub const SESSION_COOKIE: &str = "session";

/// Resolves the calling user from the `session` cookie. Sessions are stored
/// hashed, so the raw cookie value never touches the database.
pub async fn auth_user(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, ServerError> {
    let token = session_token(headers)?;
    let token_hash = hash_token(&token);

    let user = sqlx::query_as::<_, AuthUser>(
        "SELECT u.id, u.email, u.name, u.is_admin FROM sessions s \
         JOIN users u ON u.id = s.user_id \
         WHERE s.token_hash = ?1 AND s.expires_at > datetime('now')",
    )
    .bind(&token_hash)
    .fetch_optional(&state.db)
    .await
    .map_err(ServerError::internal)?
    .ok_or_else(|| ServerError::new(StatusCode::UNAUTHORIZED, "invalid session"))?;

    Ok(user)
}

pub async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, ServerError> {
    let user = auth_user(state, headers).await?;
    if !user.is_admin {
        return Err(ServerError::new(StatusCode::FORBIDDEN, "admin required"));
    }
    Ok(user)
}

pub fn session_token(headers: &HeaderMap) -> Result<String, ServerError> {
    let cookies = headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    for pair in cookies.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        let name = parts.next().unwrap_or_default();
        let value = parts.next().unwrap_or_default().trim();
        if name == SESSION_COOKIE && !value.is_empty() {
            return Ok(value.to_string());
        }
    }

    Err(ServerError::new(
        StatusCode::UNAUTHORIZED,
        "missing session cookie",
    ))
}

pub fn session_cookie(token: &str, ttl_seconds: u64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}")
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| format!("password hash error: {e}"))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(hash: &str, password: &str) -> Result<(), String> {
    let parsed = PasswordHash::new(hash).map_err(|e| format!("password hash parse error: {e}"))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|e| format!("password verify error: {e}"))
}

pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;

    #[test]
    fn session_token_parses_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "theme=dark; session=abc123; lang=en".parse().unwrap());
        assert_eq!(session_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn session_token_rejects_missing_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "theme=dark".parse().unwrap());
        assert!(session_token(&headers).is_err());
        assert!(session_token(&HeaderMap::new()).is_err());
    }

    #[test]
    fn password_round_trip() {
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_password(&hash, "s3cret").is_ok());
        assert!(verify_password(&hash, "wrong").is_err());
    }

    #[test]
    fn tokens_are_unique_and_hash_is_stable() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(hash_token(&a), hash_token(&a));
        assert_ne!(hash_token(&a), hash_token(&b));
    }
}

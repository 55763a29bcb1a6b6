use std::sync::LazyLock;

use axum::http::StatusCode;
use regex::Regex;

use crate::errors::ServerError;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?[\d\s-]{8,}$").unwrap());

static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)[A-Z0-9\s-]{3,10}$").unwrap());

pub fn require_field(value: &str, message: &str) -> Result<(), ServerError> {
    if value.trim().is_empty() {
        return Err(ServerError::new(StatusCode::BAD_REQUEST, message));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ServerError> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err(ServerError::new(
            StatusCode::BAD_REQUEST,
            "invalid email format",
        ));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), ServerError> {
    if !PHONE_RE.is_match(phone.trim()) {
        return Err(ServerError::new(
            StatusCode::BAD_REQUEST,
            "invalid phone format",
        ));
    }
    Ok(())
}

pub fn validate_postal_code(code: &str) -> Result<(), ServerError> {
    if !POSTAL_CODE_RE.is_match(code.trim()) {
        return Err(ServerError::new(
            StatusCode::BAD_REQUEST,
            "invalid postal code format",
        ));
    }
    Ok(())
}

pub fn validate_percentage(percentage: f64) -> Result<(), ServerError> {
    if !(0.0..=100.0).contains(&percentage) {
        return Err(ServerError::new(
            StatusCode::BAD_REQUEST,
            "percentage must be between 0 and 100",
        ));
    }
    Ok(())
}

pub fn validate_non_negative(amount: f64, message: &str) -> Result<(), ServerError> {
    if amount < 0.0 {
        return Err(ServerError::new(StatusCode::BAD_REQUEST, message));
    }
    Ok(())
}

pub fn validate_year(year: i64) -> Result<(), ServerError> {
    if !(1800..=2100).contains(&year) {
        return Err(ServerError::new(StatusCode::BAD_REQUEST, "invalid year"));
    }
    Ok(())
}

pub fn validate_company_status(status: &str) -> Result<(), ServerError> {
    match status {
        "ACTIVE" | "INACTIVE" => Ok(()),
        other => Err(ServerError::new(
            StatusCode::BAD_REQUEST,
            format!("invalid status: {other}"),
        )),
    }
}

pub fn validate_compliance_status(status: &str) -> Result<(), ServerError> {
    match status {
        "COMPLIANT" | "NON_COMPLIANT" => Ok(()),
        other => Err(ServerError::new(
            StatusCode::BAD_REQUEST,
            format!("invalid compliance status: {other}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_format() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("a.b+c@mail.example.org").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a @b.co").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn phone_format() {
        assert!(validate_phone("+44 20 7946 0958").is_ok());
        assert!(validate_phone("020-7946-0958").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("call me maybe").is_err());
    }

    #[test]
    fn postal_code_format() {
        assert!(validate_postal_code("SW1A 1AA").is_ok());
        assert!(validate_postal_code("90210").is_ok());
        assert!(validate_postal_code("ab").is_err());
        assert!(validate_postal_code("TOO LONG POSTAL").is_err());
    }

    #[test]
    fn percentage_bounds() {
        assert!(validate_percentage(0.0).is_ok());
        assert!(validate_percentage(100.0).is_ok());
        assert!(validate_percentage(-0.1).is_err());
        assert!(validate_percentage(100.1).is_err());
    }

    #[test]
    fn year_bounds() {
        assert!(validate_year(1999).is_ok());
        assert!(validate_year(1700).is_err());
        assert!(validate_year(3000).is_err());
    }

    #[test]
    fn statuses() {
        assert!(validate_company_status("ACTIVE").is_ok());
        assert!(validate_company_status("active").is_err());
        assert!(validate_compliance_status("COMPLIANT").is_ok());
        assert!(validate_compliance_status("OK").is_err());
    }
}

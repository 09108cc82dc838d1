//! Disposable email and temporary phone checks
//!
//! Inputs are shape-checked here before they reach a detector; anything
//! malformed is answered with 400 and never touches the list caches.

use crate::routes::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use tempguard_core::phone;

/// RFC-lite address shape
static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email shape regex"));

/// Characters allowed in a submitted phone number
static PHONE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9\s\-()+]+$").expect("phone chars regex"));

const INVALID_PHONE: &str = "invalid phone number";

/// Build the check router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/check", get(check_email))
        .route("/check-phone", get(check_phone))
}

#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PhoneQuery {
    phone: Option<String>,
}

/// Unparseable query strings (repeated keys and the like) count as a missing value
fn query_or_default<T: Default>(query: Result<Query<T>, QueryRejection>) -> T {
    match query {
        Ok(Query(query)) => query,
        Err(e) => {
            tracing::debug!("Rejected query string: {}", e);
            T::default()
        }
    }
}

/// Check whether an email address uses a disposable domain
async fn check_email(
    State(state): State<AppState>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Response {
    let query = query_or_default(query);
    let Some(email) = query.email.filter(|e| EMAIL_SHAPE.is_match(e)) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "tempmail": null }))).into_response();
    };

    let verdict = state.email.check_email(&email).await;
    tracing::debug!("Email check verdict: {:?}", verdict);

    Json(json!({ "tempmail": verdict.is_disposable() })).into_response()
}

/// Check whether a phone number is a known temporary number
async fn check_phone(
    State(state): State<AppState>,
    query: Result<Query<PhoneQuery>, QueryRejection>,
) -> Response {
    let Some(phone) = query_or_default(query).phone else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "tempphone": null }))).into_response();
    };

    if !PHONE_CHARS.is_match(&phone) || !phone::is_e164_lite(&phone::clean(&phone)) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "tempphone": INVALID_PHONE }))).into_response();
    }

    let verdict = state.phone.check_phone(&phone).await;
    tracing::debug!("Phone check verdict: {:?}", verdict);

    Json(json!({ "tempphone": verdict.is_temp() })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(EMAIL_SHAPE.is_match("user@example.com"));
        assert!(!EMAIL_SHAPE.is_match("user@example"));
        assert!(!EMAIL_SHAPE.is_match("us er@example.com"));
        assert!(!EMAIL_SHAPE.is_match("a@b@example.com"));
    }

    #[test]
    fn test_phone_chars() {
        assert!(PHONE_CHARS.is_match("+1 (202) 555-0148"));
        assert!(!PHONE_CHARS.is_match("202.555.0148"));
        assert!(!PHONE_CHARS.is_match("call 2025550148"));
    }
}

//! Health check endpoint

use crate::routes::AppState;
use axum::{extract::State, response::IntoResponse, Json};

/// Liveness plus the state of both list caches
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let email = state.email.cache();
    let phone = state.phone.cache();

    Json(serde_json::json!({
        "status": "OK",
        "message": "TempMail Validator API is running",
        "email": {
            "ready": email.is_ready(),
            "entries": email.len(),
            "refreshes": email.cycles(),
        },
        "phone": {
            "ready": phone.is_ready(),
            "entries": phone.len(),
            "refreshes": phone.cycles(),
        }
    }))
}

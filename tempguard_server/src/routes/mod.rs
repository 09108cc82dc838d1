//! Route handlers for the Tempguard server

pub mod check;
pub mod health;

use axum::{routing::get, Router};
use std::sync::Arc;
use tempguard_core::{EmailDetector, PhoneDetector};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub email: Arc<EmailDetector>,
    pub phone: Arc<PhoneDetector>,
}

impl AppState {
    pub fn new(email: Arc<EmailDetector>, phone: Arc<PhoneDetector>) -> Self {
        Self { email, phone }
    }
}

/// Build the public router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(check::router())
        .with_state(state)
}

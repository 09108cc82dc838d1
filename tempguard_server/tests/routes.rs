//! In-process tests for the check endpoints.
//!
//! The router is driven with `tower::ServiceExt::oneshot`; detectors are
//! backed by in-memory fetchers and temporary snapshot directories, so no
//! test touches the network.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tempguard_core::{
    EmailDetector, PhoneDetector, SafePatterns, SnapshotFormat, SnapshotStore, Source, SourceFormat,
    StaticFetcher,
};
use tempguard_server::routes::{self, AppState};
use tower::ServiceExt; // oneshot

const DOMAINS: &str = "https://lists.test/domains.txt";
const NUMBERS: &str = "https://lists.test/number-list.json";

/// Router over detectors with 1200 listed domains and two listed numbers
fn make_router(dir: &std::path::Path) -> (axum::Router, Arc<StaticFetcher>) {
    let domains = (0..1200)
        .map(|i| format!("burner{i}.com"))
        .collect::<Vec<_>>()
        .join("\n");
    let fetcher = Arc::new(
        StaticFetcher::new()
            .with_body(DOMAINS, domains)
            .with_body(NUMBERS, r#"{"+12025550148": {}, "+447700900123": {}}"#),
    );

    let email = EmailDetector::new(
        fetcher.clone(),
        vec![Source::strong("domains", DOMAINS, SourceFormat::Lines)],
        SafePatterns::builtin(),
        SnapshotStore::new(dir.join("domains.txt"), SnapshotFormat::Lines),
        1000,
    );
    let phone = PhoneDetector::new(
        fetcher.clone(),
        vec![Source::strong("numbers", NUMBERS, SourceFormat::JsonKeys)],
        SnapshotStore::new(dir.join("phones.json"), SnapshotFormat::JsonRecord),
    );

    let state = AppState::new(Arc::new(email), Arc::new(phone));
    (routes::build_router(state), fetcher)
}

/// Send a GET and return (status, json body)
async fn get(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();
    (status, serde_json::from_slice(&body).expect("body is not valid JSON"))
}

// ---------------------------------------------------------------------------
// GET /check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn check_listed_domain() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = make_router(dir.path());

    let (status, json) = get(router, "/check?email=someone@burner17.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tempmail"], true);
}

#[tokio::test]
async fn check_pattern_domain() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = make_router(dir.path());

    let (status, json) = get(router, "/check?email=someone@guerrillamail.org").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tempmail"], true);
}

#[tokio::test]
async fn check_clean_domain() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = make_router(dir.path());

    let (status, json) = get(router, "/check?email=someone@gmail.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tempmail"], false);
}

#[tokio::test]
async fn check_rejects_malformed_email_without_fetching() {
    let dir = tempfile::tempdir().unwrap();

    for uri in ["/check", "/check?email=not-an-email", "/check?email=a@b"] {
        let (router, fetcher) = make_router(dir.path());
        let (status, json) = get(router, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(json["tempmail"].is_null());
        assert_eq!(fetcher.calls(), 0);
    }
}

#[tokio::test]
async fn check_repeated_email_is_treated_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    let (router, fetcher) = make_router(dir.path());

    let (status, json) = get(router, "/check?email=a@mailinator.com&email=b@example.com").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["tempmail"].is_null());
    assert_eq!(fetcher.calls(), 0);
}

// ---------------------------------------------------------------------------
// GET /check-phone
// ---------------------------------------------------------------------------

#[tokio::test]
async fn check_phone_listed() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = make_router(dir.path());

    let (status, json) = get(router, "/check-phone?phone=%2B1%20(202)%20555-0148").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tempphone"], true);
}

#[tokio::test]
async fn check_phone_suspicious_but_unlisted() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = make_router(dir.path());

    let (status, json) = get(router, "/check-phone?phone=5555550000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tempphone"], false);
}

#[tokio::test]
async fn check_phone_missing() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = make_router(dir.path());

    let (status, json) = get(router, "/check-phone").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["tempphone"].is_null());
}

#[tokio::test]
async fn check_phone_repeated_is_treated_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    let (router, fetcher) = make_router(dir.path());

    let (status, json) = get(router, "/check-phone?phone=2025550148&phone=2025550149").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["tempphone"].is_null());
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn check_phone_invalid() {
    let dir = tempfile::tempdir().unwrap();

    for uri in ["/check-phone?phone=call%20me", "/check-phone?phone=12345", "/check-phone?phone=0123456789"] {
        let (router, fetcher) = make_router(dir.path());
        let (status, json) = get(router, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json["tempphone"], "invalid phone number");
        assert_eq!(fetcher.calls(), 0);
    }
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_cold_caches() {
    let dir = tempfile::tempdir().unwrap();
    let (router, fetcher) = make_router(dir.path());

    let (status, json) = get(router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OK");
    assert_eq!(json["email"]["ready"], false);
    assert_eq!(json["phone"]["entries"], 0);
    // health never triggers a refresh
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn health_reports_warm_caches() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _) = make_router(dir.path());

    let (_, _) = get(router.clone(), "/check?email=someone@example.org").await;
    let (_, _) = get(router.clone(), "/check-phone?phone=2025550148").await;

    let (_, json) = get(router, "/health").await;
    assert_eq!(json["email"]["ready"], true);
    assert_eq!(json["email"]["entries"], 1200);
    assert_eq!(json["phone"]["entries"], 2);
    assert_eq!(json["phone"]["refreshes"], 1);
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::tariff_cache::tariff_cache_router;

fn router() -> Router {
    let (_, service) = service();
    tariff_cache_router(Arc::new(service))
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn clean_json(hs_code: &str) -> Value {
    serde_json::to_value(clean_record(hs_code)).expect("serialize record")
}

#[tokio::test]
async fn validate_accepts_a_single_record() {
    let body = json!({ "hs_code": "7326.9070", "mfn_rate": 25 });
    let response = router()
        .oneshot(post("/api/v1/tariff-cache/validate", body))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["valid"], json!(false));
    let codes: Vec<&str> = payload["errors"]
        .as_array()
        .expect("errors")
        .iter()
        .filter_map(|issue| issue["code"].as_str())
        .collect();
    assert!(codes.contains(&"INVALID_FORMAT"));
    assert!(codes.contains(&"LIKELY_PERCENTAGE"));
}

#[tokio::test]
async fn validate_reports_a_numeric_hs_code_as_a_type_error() {
    let body = json!({
        "hs_code": 73269070,
        "mfn_rate": 0.029,
        "data_source": "HTS 2025 Revision 3",
        "verified_date": today().format("%Y-%m-%d").to_string()
    });
    let response = router()
        .oneshot(post("/api/v1/tariff-cache/validate", body))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["valid"], json!(false));
    assert_eq!(payload["errors"][0]["field"], json!("hs_code"));
    assert_eq!(payload["errors"][0]["code"], json!("INVALID_TYPE"));
    assert_eq!(payload["errors"][0]["value"], json!("73269070"));
}

#[tokio::test]
async fn ingest_rejects_a_batch_with_unknown_rate_columns() {
    let mut row = clean_json("73269070");
    row["adder_rate"] = json!(0.1);
    let response = router()
        .oneshot(post("/api/v1/tariff-cache/records", json!([row])))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let payload = read_json_body(response).await;
    assert_eq!(payload["inserted"], json!(0));
    assert_eq!(
        payload["validation"]["results"][0]["result"]["errors"][0]["code"],
        json!("UNKNOWN_FIELD")
    );
}

#[tokio::test]
async fn validate_accepts_a_batch() {
    let body = json!([clean_json("73269070"), clean_json("7326")]);
    let response = router()
        .oneshot(post("/api/v1/tariff-cache/validate", body))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["valid_count"], json!(1));
    assert_eq!(payload["invalid_count"], json!(1));
}

#[tokio::test]
async fn ingest_then_lookup_and_estimate() {
    let router = router();

    let response = router
        .clone()
        .oneshot(post(
            "/api/v1/tariff-cache/records?mode=skip_invalid",
            json!([clean_json("73269070"), clean_json("bad")]),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["inserted"], json!(1));
    assert_eq!(payload["rejected"], json!(1));

    let response = router
        .clone()
        .oneshot(get("/api/v1/tariff-cache/records/7326907000"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["match_type"], json!("parent_8"));

    let response = router
        .clone()
        .oneshot(get(
            "/api/v1/tariff-cache/records/73269070/savings?annual_import_value=1000000",
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["estimate"]["mfn_rate"], json!(0.029));

    let response = router
        .oneshot(get("/api/v1/tariff-cache/health"))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], json!("healthy"));
}

#[tokio::test]
async fn all_or_nothing_ingest_is_unprocessable() {
    let response = router()
        .oneshot(post(
            "/api/v1/tariff-cache/records",
            json!([clean_json("73269070"), clean_json("bad")]),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["committed"], json!(false));
}

#[tokio::test]
async fn unknown_code_is_not_found() {
    let response = router()
        .oneshot(get("/api/v1/tariff-cache/records/99999999"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["kind"], json!("not_found"));
}

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::marketplace::domain::{BuyerId, ModerationDecision, SellerId};
use crate::marketplace::router::{error_response, submit_handler};
use crate::marketplace::{MarketplaceError, MarketplaceService};

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serializable")))
        .expect("valid request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

#[tokio::test]
async fn dimensions_route_lists_onboarding_questions() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request("/api/v1/playstyle/dimensions"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let dimensions = payload["dimensions"].as_array().expect("array");
    assert_eq!(dimensions.len(), 8);
    assert_eq!(dimensions[0]["key"], json!("shootVsDrive"));
    assert_eq!(dimensions[0]["low_label"], json!("Drive style"));
}

#[tokio::test]
async fn score_route_degrades_malformed_vectors_to_fallback() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/playstyle/score",
            json!({ "buyer": null, "build": [5, 5, 5, 5, 5, 5, 5, 5], "shooting": 80 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload,
        json!({
            "score": 70,
            "label": "Good Match",
            "strengths": [],
            "weaknesses": [],
            "predictedWinBoost": 5,
        })
    );
}

#[tokio::test]
async fn score_route_scores_identical_vectors() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/playstyle/score",
            json!({ "buyer": [1, 1, 1, 1, 1, 1, 1, 1], "build": [1, 1, 1, 1, 1, 1, 1, 1] }),
        ))
        .await
        .expect("route executes");

    let payload = read_json_body(response).await;
    assert_eq!(payload["score"], json!(100));
    assert_eq!(payload["label"], json!("Perfect Match"));
    assert_eq!(
        payload["strengths"],
        json!(["Fits your Drive style", "Fits your Squad play", "Fits your Offense-first approach"])
    );
}

#[tokio::test]
async fn playstyle_route_rejects_invalid_vectors() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/v1/buyers/buyer-7/playstyle",
            json!({ "playstyle": [5, 5, 5] }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("exactly 8"));
}

#[tokio::test]
async fn playstyle_route_saves_and_reads_back() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let saved = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/buyers/buyer-7/playstyle",
            json!([7, 2, 5, 9, 6, 4, 8, 3]),
        ))
        .await
        .expect("route executes");
    assert_eq!(saved.status(), StatusCode::OK);

    let fetched = router
        .oneshot(get_request("/api/v1/buyers/buyer-7/playstyle"))
        .await
        .expect("route executes");
    assert_eq!(fetched.status(), StatusCode::OK);
    let payload = read_json_body(fetched).await;
    assert_eq!(payload["playstyle"], json!([7, 2, 5, 9, 6, 4, 8, 3]));
}

#[tokio::test]
async fn submit_then_moderate_then_browse() {
    let (service, _, _, notices) = build_service();
    let router = router_with_service(service);

    let created = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/sellers/seller-1/builds",
            serde_json::to_value(sharpshooter_submission()).expect("serializable"),
        ))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);
    let listing = read_json_body(created).await;
    let build_id = listing["build_id"].as_str().expect("id").to_string();
    assert_eq!(listing["status"], json!("pending_review"));

    let pending = router
        .clone()
        .oneshot(get_request("/api/v1/admin/builds/pending"))
        .await
        .expect("route executes");
    let pending = read_json_body(pending).await;
    assert_eq!(pending["builds"].as_array().map(Vec::len), Some(1));

    let moderated = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/admin/builds/{build_id}/moderation"),
            serde_json::to_value(ModerationDecision::Approve).expect("serializable"),
        ))
        .await
        .expect("route executes");
    assert_eq!(moderated.status(), StatusCode::OK);
    assert_eq!(notices.events().len(), 1);

    let browse = router
        .oneshot(get_request("/api/v1/builds?game=nba2k26&max_price_cents=1000"))
        .await
        .expect("route executes");
    assert_eq!(browse.status(), StatusCode::OK);
    let payload = read_json_body(browse).await;
    let builds = payload["builds"].as_array().expect("array");
    assert_eq!(builds.len(), 1);
    assert_eq!(builds[0]["build_id"], json!(build_id));
    assert!(builds[0].get("compatibility").is_none());
}

#[tokio::test]
async fn compatibility_route_reports_missing_builds() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request(
            "/api/v1/builds/build-999999/compatibility?buyer_id=buyer-1",
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn compatibility_route_hides_pending_builds() {
    let (service, _, _, _) = build_service();
    service
        .save_playstyle(&BuyerId("buyer-1".to_string()), dna([7; 8]))
        .expect("save succeeds");
    let listing = service
        .submit_build(&SellerId("seller-1".to_string()), submission())
        .expect("submission succeeds");
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request(&format!(
            "/api/v1/builds/{}/compatibility?buyer_id=buyer-1",
            listing.build_id.0
        )))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert!(payload.get("score").is_none());
}

#[tokio::test]
async fn update_route_forbids_other_sellers() {
    let (service, _, _, _) = build_service();
    let listing = service
        .submit_build(&SellerId("seller-1".to_string()), submission())
        .expect("submission succeeds");
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/sellers/seller-2/builds/{}", listing.build_id.0),
            serde_json::to_value(submission()).expect("serializable"),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn submit_handler_returns_unprocessable_for_invalid_listing() {
    let (service, _, _, _) = build_service();
    let mut invalid = submission();
    invalid.title = String::new();

    let response =
        submit_handler::<MemoryBuilds, MemoryProfiles, MemoryNotices>(
            State(Arc::new(service)),
            Path("seller-1".to_string()),
            axum::Json(invalid),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(MarketplaceService::new(
        Arc::new(UnavailableBuilds),
        Arc::new(MemoryProfiles::default()),
        Arc::new(MemoryNotices::default()),
        &marketplace_config(),
    ));

    let response = submit_handler::<UnavailableBuilds, MemoryProfiles, MemoryNotices>(
        State(service),
        Path("seller-1".to_string()),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn submit_handler_returns_conflict_on_duplicate() {
    let service = Arc::new(MarketplaceService::new(
        Arc::new(ConflictBuilds),
        Arc::new(MemoryProfiles::default()),
        Arc::new(MemoryNotices::default()),
        &marketplace_config(),
    ));

    let response = submit_handler::<ConflictBuilds, MemoryProfiles, MemoryNotices>(
        State(service),
        Path("seller-1".to_string()),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn error_bodies_carry_messages() {
    let response = error_response(MarketplaceError::NotFound("build build-1".to_string()));

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "error": "build build-1 not found" }));
}

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use super::domain::{BrowseQuery, BuildId, BuildSubmission, BuyerId, ModerationDecision, SellerId};
use super::repository::{BuildRepository, NoticePublisher, PlaystyleRepository, RepositoryError};
use super::service::{MarketplaceError, MarketplaceService};
use crate::playstyle::{self, PlaystyleVector, DIMENSIONS};

const DEFAULT_PENDING_LIMIT: usize = 25;

/// Router builder exposing the marketplace endpoints.
pub fn marketplace_router<B, P, N>(service: Arc<MarketplaceService<B, P, N>>) -> Router
where
    B: BuildRepository + 'static,
    P: PlaystyleRepository + 'static,
    N: NoticePublisher + 'static,
{
    Router::new()
        .route("/api/v1/playstyle/dimensions", get(dimensions_handler))
        .route("/api/v1/playstyle/score", post(score_handler))
        .route(
            "/api/v1/buyers/:buyer_id/playstyle",
            put(save_playstyle_handler::<B, P, N>).get(playstyle_handler::<B, P, N>),
        )
        .route(
            "/api/v1/sellers/:seller_id/builds",
            post(submit_handler::<B, P, N>),
        )
        .route(
            "/api/v1/sellers/:seller_id/builds/:build_id",
            put(update_handler::<B, P, N>),
        )
        .route("/api/v1/builds", get(browse_handler::<B, P, N>))
        .route("/api/v1/builds/:build_id", get(detail_handler::<B, P, N>))
        .route(
            "/api/v1/builds/:build_id/compatibility",
            get(compatibility_handler::<B, P, N>),
        )
        .route(
            "/api/v1/admin/builds/pending",
            get(pending_handler::<B, P, N>),
        )
        .route(
            "/api/v1/admin/builds/:build_id/moderation",
            post(moderation_handler::<B, P, N>),
        )
        .with_state(service)
}

/// Loose input for the raw scorer: anything that is not an array of integers counts as absent.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ScoreRequest {
    #[serde(default)]
    pub(crate) buyer: Option<Value>,
    #[serde(default)]
    pub(crate) build: Option<Value>,
    #[serde(default)]
    pub(crate) shooting: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BuyerQuery {
    #[serde(default)]
    pub(crate) buyer_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LimitQuery {
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

pub(crate) async fn dimensions_handler() -> Response {
    (StatusCode::OK, Json(json!({ "dimensions": DIMENSIONS }))).into_response()
}

pub(crate) async fn score_handler(Json(request): Json<ScoreRequest>) -> Response {
    let buyer = request.buyer.as_ref().and_then(loose_ratings);
    let build = request.build.as_ref().and_then(loose_ratings);
    let result = playstyle::score(buyer.as_deref(), build.as_deref(), request.shooting);
    (StatusCode::OK, Json(result)).into_response()
}

fn loose_ratings(value: &Value) -> Option<Vec<i32>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_i64().and_then(|rating| i32::try_from(rating).ok()))
        .collect()
}

pub(crate) async fn save_playstyle_handler<B, P, N>(
    State(service): State<Arc<MarketplaceService<B, P, N>>>,
    Path(buyer_id): Path<String>,
    Json(payload): Json<Value>,
) -> Response
where
    B: BuildRepository + 'static,
    P: PlaystyleRepository + 'static,
    N: NoticePublisher + 'static,
{
    let raw = payload.get("playstyle").cloned().unwrap_or(payload);
    let vector: PlaystyleVector = match serde_json::from_value(raw) {
        Ok(vector) => vector,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    let buyer = BuyerId(buyer_id);
    match service.save_playstyle(&buyer, vector) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "buyer_id": buyer.0, "playstyle": vector })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn playstyle_handler<B, P, N>(
    State(service): State<Arc<MarketplaceService<B, P, N>>>,
    Path(buyer_id): Path<String>,
) -> Response
where
    B: BuildRepository + 'static,
    P: PlaystyleRepository + 'static,
    N: NoticePublisher + 'static,
{
    let buyer = BuyerId(buyer_id);
    match service.playstyle(&buyer) {
        Ok(vector) => (
            StatusCode::OK,
            Json(json!({ "buyer_id": buyer.0, "playstyle": vector })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_handler<B, P, N>(
    State(service): State<Arc<MarketplaceService<B, P, N>>>,
    Path(seller_id): Path<String>,
    Json(submission): Json<BuildSubmission>,
) -> Response
where
    B: BuildRepository + 'static,
    P: PlaystyleRepository + 'static,
    N: NoticePublisher + 'static,
{
    match service.submit_build(&SellerId(seller_id), submission) {
        Ok(listing) => (StatusCode::CREATED, Json(listing)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<B, P, N>(
    State(service): State<Arc<MarketplaceService<B, P, N>>>,
    Path((seller_id, build_id)): Path<(String, String)>,
    Json(submission): Json<BuildSubmission>,
) -> Response
where
    B: BuildRepository + 'static,
    P: PlaystyleRepository + 'static,
    N: NoticePublisher + 'static,
{
    match service.update_build(&SellerId(seller_id), &BuildId(build_id), submission) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn browse_handler<B, P, N>(
    State(service): State<Arc<MarketplaceService<B, P, N>>>,
    Query(query): Query<BrowseQuery>,
) -> Response
where
    B: BuildRepository + 'static,
    P: PlaystyleRepository + 'static,
    N: NoticePublisher + 'static,
{
    match service.browse(&query) {
        Ok(entries) => (StatusCode::OK, Json(json!({ "builds": entries }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn detail_handler<B, P, N>(
    State(service): State<Arc<MarketplaceService<B, P, N>>>,
    Path(build_id): Path<String>,
    Query(query): Query<BuyerQuery>,
) -> Response
where
    B: BuildRepository + 'static,
    P: PlaystyleRepository + 'static,
    N: NoticePublisher + 'static,
{
    let buyer = query.buyer_id.map(BuyerId);
    match service.build_detail(&BuildId(build_id), buyer.as_ref()) {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn compatibility_handler<B, P, N>(
    State(service): State<Arc<MarketplaceService<B, P, N>>>,
    Path(build_id): Path<String>,
    Query(query): Query<BuyerQuery>,
) -> Response
where
    B: BuildRepository + 'static,
    P: PlaystyleRepository + 'static,
    N: NoticePublisher + 'static,
{
    let buyer = query.buyer_id.map(BuyerId);
    match service.compatibility(&BuildId(build_id), buyer.as_ref()) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn pending_handler<B, P, N>(
    State(service): State<Arc<MarketplaceService<B, P, N>>>,
    Query(query): Query<LimitQuery>,
) -> Response
where
    B: BuildRepository + 'static,
    P: PlaystyleRepository + 'static,
    N: NoticePublisher + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_PENDING_LIMIT);
    match service.pending_reviews(limit) {
        Ok(listings) => (StatusCode::OK, Json(json!({ "builds": listings }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn moderation_handler<B, P, N>(
    State(service): State<Arc<MarketplaceService<B, P, N>>>,
    Path(build_id): Path<String>,
    Json(decision): Json<ModerationDecision>,
) -> Response
where
    B: BuildRepository + 'static,
    P: PlaystyleRepository + 'static,
    N: NoticePublisher + 'static,
{
    match service.moderate(&BuildId(build_id), decision) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) fn error_response(err: MarketplaceError) -> Response {
    let status = match &err {
        MarketplaceError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        MarketplaceError::Forbidden { .. } => StatusCode::FORBIDDEN,
        MarketplaceError::NotFound(_) | MarketplaceError::Repository(RepositoryError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        MarketplaceError::InvalidTransition { .. }
        | MarketplaceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        MarketplaceError::Repository(RepositoryError::Unavailable(_)) => {
            error!(error = %err, "marketplace storage unavailable");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}

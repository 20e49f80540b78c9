use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use buildmart::error::AppError;
use buildmart::marketplace::{
    marketplace_router, rank_catalog, read_catalog, BuildRepository, MarketplaceService,
    NoticePublisher, PlaystyleRepository, RankedEntry,
};
use buildmart::playstyle::PlaystyleVector;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogRankRequest {
    pub(crate) csv: String,
    pub(crate) buyer: Vec<i64>,
    #[serde(default)]
    pub(crate) top: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CatalogRankResponse {
    pub(crate) total_rows: usize,
    pub(crate) ranked: Vec<RankedEntry>,
}

pub(crate) fn with_marketplace_routes<B, P, N>(
    service: Arc<MarketplaceService<B, P, N>>,
) -> axum::Router
where
    B: BuildRepository + 'static,
    P: PlaystyleRepository + 'static,
    N: NoticePublisher + 'static,
{
    marketplace_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/catalog/rank",
            axum::routing::post(catalog_rank_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Ranks an uploaded seller spreadsheet without creating listings.
pub(crate) async fn catalog_rank_endpoint(
    Json(payload): Json<CatalogRankRequest>,
) -> Result<Json<CatalogRankResponse>, AppError> {
    let CatalogRankRequest { csv, buyer, top } = payload;

    let buyer = PlaystyleVector::try_from(buyer)?;
    let entries = read_catalog(Cursor::new(csv.into_bytes()))?;
    let mut ranked = rank_catalog(&entries, &buyer);
    if let Some(top) = top {
        ranked.truncate(top);
    }

    Ok(Json(CatalogRankResponse {
        total_rows: entries.len(),
        ranked,
    }))
}

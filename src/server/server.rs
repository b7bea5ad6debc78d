use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::state::*;
use crate::charts;
use crate::config::AppConfig;
use crate::credits_store::{PageRequest, ResolvedPerformer, ResolvedProducer};
use crate::network_graph;

#[derive(Deserialize, Debug)]
struct ListParams {
    page: Option<usize>,
    per_page: Option<usize>,
}

#[derive(Deserialize, Debug)]
struct SearchParams {
    q: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ProducerSelector {
    producer_id: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct PerformerSelector {
    performer_id: Option<i64>,
}

#[derive(Serialize)]
struct ProducerDetail {
    #[serde(flatten)]
    resolved: ResolvedProducer,
    related: Vec<i64>,
}

#[derive(Serialize)]
struct PerformerDetail {
    #[serde(flatten)]
    resolved: ResolvedPerformer,
    related: Vec<i64>,
}

fn storage_error(error: anyhow::Error) -> Response {
    error!("Storage error: {:#}", error);
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

fn page_request(params: &ListParams, config: &ServerConfig) -> PageRequest {
    PageRequest {
        page: params.page.unwrap_or(1).max(1),
        per_page: params.per_page.unwrap_or(config.per_page),
    }
}

async fn home(State(store): State<GuardedCreditsStore>) -> Response {
    match store.counts() {
        Ok(counts) => Json(counts).into_response(),
        Err(e) => storage_error(e),
    }
}

async fn list_producers(
    State(store): State<GuardedCreditsStore>,
    State(config): State<ServerConfig>,
    Query(params): Query<ListParams>,
) -> Response {
    match store.list_producers(page_request(&params, &config)) {
        Ok(page) => Json(page).into_response(),
        Err(e) => storage_error(e),
    }
}

async fn list_performers(
    State(store): State<GuardedCreditsStore>,
    State(config): State<ServerConfig>,
    Query(params): Query<ListParams>,
) -> Response {
    match store.list_performers(page_request(&params, &config)) {
        Ok(page) => Json(page).into_response(),
        Err(e) => storage_error(e),
    }
}

async fn list_songs(
    State(store): State<GuardedCreditsStore>,
    State(config): State<ServerConfig>,
    Query(params): Query<ListParams>,
) -> Response {
    match store.list_songs(page_request(&params, &config)) {
        Ok(page) => Json(page).into_response(),
        Err(e) => storage_error(e),
    }
}

async fn list_albums(
    State(store): State<GuardedCreditsStore>,
    State(config): State<ServerConfig>,
    Query(params): Query<ListParams>,
) -> Response {
    match store.list_albums(page_request(&params, &config)) {
        Ok(page) => Json(page).into_response(),
        Err(e) => storage_error(e),
    }
}

async fn get_producer(
    State(store): State<GuardedCreditsStore>,
    State(related): State<GuardedRelatedLookup>,
    Path(id): Path<i64>,
) -> Response {
    match store.get_resolved_producer(id) {
        Ok(Some(resolved)) => match related.related(id) {
            Ok(related) => Json(ProducerDetail { resolved, related }).into_response(),
            Err(e) => storage_error(e),
        },
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => storage_error(e),
    }
}

async fn get_performer(
    State(store): State<GuardedCreditsStore>,
    State(related): State<GuardedRelatedLookup>,
    Path(id): Path<i64>,
) -> Response {
    match store.get_resolved_performer(id) {
        Ok(Some(resolved)) => match related.related(id) {
            Ok(related) => Json(PerformerDetail { resolved, related }).into_response(),
            Err(e) => storage_error(e),
        },
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => storage_error(e),
    }
}

async fn get_song(State(store): State<GuardedCreditsStore>, Path(id): Path<i64>) -> Response {
    match store.get_resolved_song(id) {
        Ok(Some(resolved)) => Json(resolved).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => storage_error(e),
    }
}

async fn get_album(State(store): State<GuardedCreditsStore>, Path(id): Path<i64>) -> Response {
    match store.get_resolved_album(id) {
        Ok(Some(resolved)) => Json(resolved).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => storage_error(e),
    }
}

async fn get_album_producers(
    State(store): State<GuardedCreditsStore>,
    Path(id): Path<i64>,
) -> Response {
    match store.get_album(id) {
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => return storage_error(e),
        Ok(Some(_)) => {}
    }
    match store.album_production_summary(id) {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => storage_error(e),
    }
}

async fn search(
    State(store): State<GuardedCreditsStore>,
    Query(params): Query<SearchParams>,
) -> Response {
    let Some(term) = params.q else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    match store.search(&term) {
        Ok(results) => Json(results).into_response(),
        Err(e) => storage_error(e),
    }
}

async fn producer_frequency(
    State(store): State<GuardedCreditsStore>,
    Query(selector): Query<ProducerSelector>,
) -> Response {
    let Some(producer_id) = selector.producer_id else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    match store.get_producer(producer_id) {
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => return storage_error(e),
        Ok(Some(_)) => {}
    }
    match store.producer_performer_frequency(producer_id) {
        Ok(rows) => Json(charts::donut_chart(&rows)).into_response(),
        Err(e) => storage_error(e),
    }
}

async fn performer_frequency(
    State(store): State<GuardedCreditsStore>,
    Query(selector): Query<PerformerSelector>,
) -> Response {
    let Some(performer_id) = selector.performer_id else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    match store.get_performer(performer_id) {
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => return storage_error(e),
        Ok(Some(_)) => {}
    }
    match store.performer_producer_frequency(performer_id) {
        Ok(rows) => Json(charts::donut_chart(&rows)).into_response(),
        Err(e) => storage_error(e),
    }
}

async fn producer_productivity(
    State(store): State<GuardedCreditsStore>,
    Query(selector): Query<ProducerSelector>,
) -> Response {
    let Some(producer_id) = selector.producer_id else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    match store.get_producer(producer_id) {
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => return storage_error(e),
        Ok(Some(_)) => {}
    }
    match store.producer_productivity(producer_id) {
        Ok(rows) => Json(charts::productivity_chart(&rows)).into_response(),
        Err(e) => storage_error(e),
    }
}

async fn producer_bubbles(
    State(store): State<GuardedCreditsStore>,
    Query(selector): Query<PerformerSelector>,
) -> Response {
    let Some(performer_id) = selector.performer_id else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let performer = match store.get_performer(performer_id) {
        Ok(Some(performer)) => performer,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => return storage_error(e),
    };
    match store.performer_producer_frequency(performer_id) {
        Ok(rows) => Json(charts::producer_bubbles(&performer.name, &rows)).into_response(),
        Err(e) => storage_error(e),
    }
}

async fn performer_web(
    State(store): State<GuardedCreditsStore>,
    Query(selector): Query<PerformerSelector>,
) -> Response {
    let Some(performer_id) = selector.performer_id else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let performer = match store.get_performer(performer_id) {
        Ok(Some(performer)) => performer,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => return storage_error(e),
    };
    match store.performer_producer_frequency(performer_id) {
        Ok(rows) => Json(charts::producer_web_graph(
            &performer.name,
            performer.img_url.as_deref(),
            &rows,
        ))
        .into_response(),
        Err(e) => storage_error(e),
    }
}

async fn network_data(State(config): State<ServerConfig>) -> Response {
    let Some(ref csv_path) = config.network_csv else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match network_graph::load_graph(csv_path) {
        Ok(graph) => Json(graph).into_response(),
        Err(e) => storage_error(e),
    }
}

pub fn make_app(state: ServerState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/producers", get(list_producers))
        .route("/producers/{id}", get(get_producer))
        .route("/performers", get(list_performers))
        .route("/performers/{id}", get(get_performer))
        .route("/songs", get(list_songs))
        .route("/songs/{id}", get(get_song))
        .route("/albums", get(list_albums))
        .route("/albums/{id}", get(get_album))
        .route("/albums/{id}/producers.json", get(get_album_producers))
        .route("/search", get(search))
        .route("/producer-frequency.json", get(producer_frequency))
        .route("/performer-frequency.json", get(performer_frequency))
        .route("/producer-productivity.json", get(producer_productivity))
        .route("/producer-bubbles.json", get(producer_bubbles))
        .route("/performer-web.json", get(performer_web))
        .route("/data.json", get(network_data))
        .with_state(state)
}

pub async fn run_server(
    config: &AppConfig,
    store: GuardedCreditsStore,
    related: GuardedRelatedLookup,
) -> Result<()> {
    let server_config = ServerConfig {
        port: config.port,
        per_page: config.per_page,
        network_csv: config.network_csv.clone(),
    };
    let port = server_config.port;
    let app = make_app(ServerState {
        config: server_config,
        store,
        related,
    });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on port {}", port);

    Ok(axum::serve(listener, app).await?)
}

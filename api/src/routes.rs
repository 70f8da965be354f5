//! HTTP routes over the hadith store and reader state

use crate::config::ServerConfig;
use anyhow::anyhow;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use riwaya_lib::{
    AppState, Bookmark, Collection, CollectionLoad, Hadith, HadithQuery, PreferencesUpdate,
    RiwayaError, UserPreferences, DEFAULT_USER_ID,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

/// Arabic, English, Urdu and Roman Urdu
const LANGUAGE_COUNT: usize = 4;

// === Request/Response types ===

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HadithsParams {
    collection_id: Option<String>,
    search: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    q: Option<String>,
    collection: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookmarkRequest {
    hadith_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackVisitorRequest {
    visitor_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VisitorCount {
    count: u64,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    success: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    total_hadiths: usize,
    collections: usize,
    languages: usize,
    users: u64,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    hadiths: usize,
    collections: Vec<CollectionLoad>,
}

#[derive(Serialize)]
pub struct CacheStats {
    len: usize,
    capacity: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] RiwayaError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RiwayaError::NotFound(_) => StatusCode::NOT_FOUND,
            RiwayaError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            RiwayaError::Database(_) | RiwayaError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn required(value: Option<String>, what: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| RiwayaError::InvalidQuery(format!("{} is required", what)).into())
}

/// Run a store scan off the async workers
async fn run_query(state: Arc<AppState>, query: HadithQuery) -> ApiResult<Vec<Hadith>> {
    tokio::task::spawn_blocking(move || state.hadiths.list(&query))
        .await
        .map(Json)
        .map_err(|e| RiwayaError::Other(format!("Task join error: {}", e)).into())
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        hadiths: state.hadiths.store().len(),
        collections: state.load_report.collections.clone(),
    })
}

async fn list_collections(State(state): State<Arc<AppState>>) -> Json<Vec<Collection>> {
    Json(state.hadiths.store().collections().to_vec())
}

async fn get_collection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Collection> {
    state
        .hadiths
        .store()
        .collection(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| RiwayaError::NotFound("Collection not found".to_string()).into())
}

async fn list_hadiths(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HadithsParams>,
) -> ApiResult<Vec<Hadith>> {
    let query = HadithQuery {
        collection_id: params.collection_id,
        search: params.search,
        limit: params.limit,
        offset: params.offset,
    };
    tracing::debug!(?query, "Listing hadiths");
    run_query(state, query).await
}

async fn get_hadith(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Hadith> {
    state
        .hadiths
        .store()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| RiwayaError::NotFound("Hadith not found".to_string()).into())
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<Hadith>> {
    let term = required(params.q, "Search query")?;
    tracing::debug!(term = %term, collection = ?params.collection, "Searching hadiths");
    run_query(state, HadithQuery::search(&term, params.collection.as_deref())).await
}

async fn daily_hadith(State(state): State<Arc<AppState>>) -> Json<Option<Hadith>> {
    Json(state.hadiths.store().first().cloned())
}

async fn list_bookmarks(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Bookmark>> {
    Ok(Json(state.settings.bookmarks(DEFAULT_USER_ID)?))
}

async fn create_bookmark(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBookmarkRequest>,
) -> ApiResult<Bookmark> {
    let hadith_id = required(req.hadith_id, "hadithId")?;
    if state.hadiths.store().get(&hadith_id).is_none() {
        return Err(RiwayaError::NotFound("Hadith not found".to_string()).into());
    }
    Ok(Json(state.settings.add_bookmark(DEFAULT_USER_ID, &hadith_id)?))
}

async fn delete_bookmark(
    State(state): State<Arc<AppState>>,
    Path(hadith_id): Path<String>,
) -> ApiResult<DeleteResponse> {
    if !state.settings.remove_bookmark(DEFAULT_USER_ID, &hadith_id)? {
        return Err(RiwayaError::NotFound("Bookmark not found".to_string()).into());
    }
    Ok(Json(DeleteResponse { success: true }))
}

async fn get_preferences(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Option<UserPreferences>> {
    Ok(Json(state.settings.preferences(DEFAULT_USER_ID)?))
}

async fn update_preferences(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PreferencesUpdate>, JsonRejection>,
) -> ApiResult<UserPreferences> {
    let Json(update) = payload.map_err(|rejection| {
        tracing::debug!("Rejected preferences body: {}", rejection);
        RiwayaError::InvalidQuery("Invalid preferences data".to_string())
    })?;
    Ok(Json(state.settings.update_preferences(DEFAULT_USER_ID, update)?))
}

async fn track_visitor(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TrackVisitorRequest>,
) -> ApiResult<VisitorCount> {
    let visitor_id = required(req.visitor_id, "Visitor ID")?;
    Ok(Json(VisitorCount {
        count: state.visitors.track(&visitor_id),
    }))
}

async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let store = state.hadiths.store();
    Json(StatsResponse {
        total_hadiths: store.len(),
        collections: store.collections().len(),
        languages: LANGUAGE_COUNT,
        users: state.visitors.count(),
    })
}

async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    let (len, capacity) = state.hadiths.stats();
    Json(CacheStats { len, capacity })
}

pub fn router(state: Arc<AppState>, server: &ServerConfig) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/api/collections", get(list_collections))
        .route("/api/collections/:id", get(get_collection))
        .route("/api/hadiths", get(list_hadiths))
        .route("/api/hadiths/:id", get(get_hadith))
        .route("/api/search", get(search))
        .route("/api/daily-hadith", get(daily_hadith))
        .route("/api/bookmarks", get(list_bookmarks).post(create_bookmark))
        .route("/api/bookmarks/:hadith_id", axum::routing::delete(delete_bookmark))
        .route("/api/preferences", get(get_preferences).put(update_preferences))
        .route("/api/visitors/track", axum::routing::post(track_visitor))
        .route("/api/stats", get(stats))
        .route("/api/cache/stats", get(cache_stats))
        .layer(RequestBodyLimitLayer::new(server.body_limit_bytes))
        .layer(cors)
        .with_state(state);

    if let Some(limit) = &server.rate_limit {
        let config = Arc::new(
            GovernorConfigBuilder::default()
                .per_second(limit.per_second)
                .burst_size(limit.burst_size)
                .finish()
                .ok_or_else(|| anyhow!("rate_limit.per_second and burst_size must be non-zero"))?,
        );

        let limiter = config.limiter().clone();
        std::thread::spawn(move || loop {
            std::thread::sleep(Duration::from_secs(60));
            tracing::debug!("rate limiting storage size: {}", limiter.len());
            limiter.retain_recent();
        });

        app = app.layer(GovernorLayer { config });
    }

    Ok(app)
}

use crate::app::{AppError, RecommenderService};
use anyhow::Context;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::signal;

#[derive(Clone)]
struct SharedState {
    service: Arc<RecommenderService>,
}

pub fn router(service: Arc<RecommenderService>) -> Router {
    let shared_state = Arc::new(SharedState { service });

    Router::new()
        .route("/api/movies", get(movies))
        .route("/api/search", get(search))
        .route("/api/recommend", post(recommend))
        .route("/api/health", get(health))
        .route("/api/reload", post(reload))
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(shared_state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::warn!("shutting down");
}

async fn start_app(service: Arc<RecommenderService>, addr: &str) -> anyhow::Result<()> {
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("couldn't bind {addr}"))?;
    log::info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub fn start_daemon(service: Arc<RecommenderService>, addr: &str) -> anyhow::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(start_app(service, addr))
}

#[derive(Debug)]
struct HttpError(AppError);

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0 {
            AppError::Validation(_) => axum::http::StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => axum::http::StatusCode::NOT_FOUND,
            AppError::NotLoaded => axum::http::StatusCode::SERVICE_UNAVAILABLE,
            AppError::Load(_) => {
                log::error!("{self:?}");
                axum::http::StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({"error": self.0.to_string()}))).into_response()
    }
}

impl<E> From<E> for HttpError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Malformed request bodies and query strings are client errors with the
/// same JSON error body as every other failure.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoviesResponse {
    pub movies: Vec<String>,
}

async fn movies(
    State(state): State<Arc<SharedState>>,
) -> Result<Json<MoviesResponse>, HttpError> {
    let movies = state.service.list_titles()?;
    Ok(Json(MoviesResponse { movies }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

async fn search(
    State(state): State<Arc<SharedState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<MoviesResponse>, HttpError> {
    let Query(params) = params?;
    log::debug!("search: {params:?}");

    let movies = state.service.search(&params.q)?;
    Ok(Json(MoviesResponse { movies }))
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub movie_title: String,

    /// Number of recommendations.
    ///
    /// *Falls back to `default_recommendations` from the config*
    pub count: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub title: String,
    pub movie_id: u64,
    pub similarity_score: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub input_movie: String,
    pub recommendations: Vec<RecommendationResponse>,
}

async fn recommend(
    State(state): State<Arc<SharedState>>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, HttpError> {
    let Json(payload) = payload?;
    log::debug!("payload: {payload:?}");

    let recommendations = state
        .service
        .recommend(&payload.movie_title, payload.count)?
        .into_iter()
        .map(|rec| RecommendationResponse {
            title: rec.title,
            movie_id: rec.id,
            similarity_score: rec.score,
        })
        .collect();

    Ok(Json(RecommendResponse {
        input_movie: payload.movie_title.trim().to_string(),
        recommendations,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub data_loaded: bool,
    pub movies: usize,
}

async fn health(State(state): State<Arc<SharedState>>) -> Json<HealthResponse> {
    let movies = state
        .service
        .snapshot()
        .map(|catalog| catalog.len())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        data_loaded: state.service.is_loaded(),
        movies,
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub movies: usize,
}

async fn reload(
    State(state): State<Arc<SharedState>>,
) -> Result<Json<ReloadResponse>, HttpError> {
    let service = state.service.clone();

    tokio::task::block_in_place(move || {
        let movies = service.load()?;
        Ok(Json(ReloadResponse { movies }))
    })
}

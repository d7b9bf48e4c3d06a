mod config;
mod dto;
mod handlers;
mod media;
mod models;
mod repository;
mod service;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    routing::{delete, get, post},
};

use std::sync::Arc;

use handlers::rest;
use media::CloudinaryStore;
use repository::Registry;
use service::NoteService;

use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Uploads above this are rejected before the body is buffered.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    // Fetch env variables
    let cfg = config::load_from_env().unwrap_or_else(|e| {
        tracing::error!("Failed to load configuration: {e}");
        panic!("failed to load configuration: {e}");
    });

    // Registry lives for the process; nothing is persisted across restarts
    let registry = Arc::new(tokio::sync::Mutex::new(Registry::new()));
    let media = Arc::new(CloudinaryStore::new(&cfg));

    // Service creation
    let service = Arc::new(NoteService::new(registry, media));

    // Browser clients are served from anywhere, so allow any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    // API router config
    let api_router = Router::new()
        .route("/data", post(rest::upload_note))
        .route("/data", get(rest::get_all_notes))
        .route("/data/{id}", delete(rest::delete_note))
        .route("/notes", get(rest::health_check))
        .merge(
            SwaggerUi::new("/swagger-ui")
                .config(utoipa_swagger_ui::Config::new([
                    "/api/api-doc/openapi.json",
                ]))
                .url("/api-doc/openapi.json", rest::ApiDoc::openapi()),
        )
        .with_state(service)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Frontend is plain static files next to the binary
    let router = Router::new()
        .nest("/api", api_router)
        .fallback_service(ServeDir::new("static"));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", cfg.port))
        .await
        .expect("Failed to bind to address");
    let addr = listener.local_addr().unwrap();

    tracing::info!("CampusNotes server starting, listening on {}", addr);

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}

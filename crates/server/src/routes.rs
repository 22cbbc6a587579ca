use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::{OrderService, RecordStore, UserService};

use crate::openapi::ApiDoc;

pub mod orders;
pub mod users;

/// Shared handler state. Both services read and write through the same record store.
#[derive(Clone)]
pub struct ServerState {
    pub users: Arc<UserService>,
    pub orders: Arc<OrderService>,
}

impl ServerState {
    pub fn new(store: RecordStore) -> Self {
        Self {
            users: Arc::new(UserService::new(store.clone())),
            orders: Arc::new(OrderService::new(store)),
        }
    }
}

#[utoipa::path(get, path = "/api/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthDoc)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// API routes only, without static files or middleware.
pub fn api_router(state: ServerState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/users", get(users::list_users).post(users::register_user))
        .route("/api/users/:id", get(users::get_user))
        .route("/api/orders", get(orders::list_orders).post(orders::create_order))
        .route("/api/orders/:id", get(orders::get_order))
        .with_state(state)
}

/// Build the full application router: API, static storefront assets, CORS and tracing.
pub fn build_router(state: ServerState, cors: CorsLayer, static_dir: &str) -> Router {
    api_router(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
    routing::get,
};

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod config;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod storage;
pub mod views;

// Module for the declared route table (public vs. protected entries).
pub mod routes;

use std::sync::Arc;

// --- Public Re-exports ---

// Makes core state types easily accessible to the application entry point
// (main.rs) and to integration tests.
pub use config::AppConfig;
pub use registry::{RegistryError, RouteRegistry};
pub use storage::{MemoryTokenStore, MockTokenStore, TokenStoreState};

/// AppState
///
/// The single, thread-safe, immutable container holding the gateway's
/// services: the flattened route table, the injected token store, and the
/// loaded configuration. Shared across all incoming navigations.
#[derive(Clone)]
pub struct AppState {
    /// The flattened, indexed route table.
    pub registry: Arc<RouteRegistry>,
    /// Token storage: the guard's only external dependency.
    pub tokens: TokenStoreState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Let handlers and middleware pull individual components out of the shared
// state instead of the whole bundle.

impl FromRef<AppState> for Arc<RouteRegistry> {
    fn from_ref(app_state: &AppState) -> Arc<RouteRegistry> {
        app_state.registry.clone()
    }
}

impl FromRef<AppState> for TokenStoreState {
    fn from_ref(app_state: &AppState) -> TokenStoreState {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// build_registry
///
/// Flattens the declared route table under the configured base path.
/// Duplicate or unrooted paths surface here, before the server binds.
pub fn build_registry(config: &AppConfig) -> Result<RouteRegistry, RegistryError> {
    RouteRegistry::with_base(&config.base_path, routes::route_table())
}

/// create_router
///
/// Assembles the gateway's routing structure: one GET route per registry
/// record, all dispatching to the `navigate` handler, with the navigation
/// guard layered on exactly that set. `/health` and `/routes` sit outside
/// the guarded set; unregistered paths fall through to axum's default 404.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. View Routes, from the registry
    let mut view_routes = Router::<AppState>::new();
    for record in state.registry.iter() {
        view_routes = view_routes.route(record.full_path(), get(handlers::navigate));
    }

    // 3. Base Router Assembly
    let base_router = Router::new()
        // GET /health
        // Unauthenticated liveness endpoint for monitoring and load
        // balancer checks.
        .route("/health", get(|| async { "ok" }))
        // GET /routes
        // The route table manifest (path, name, requires_auth).
        .route("/routes", get(handlers::route_manifest))
        // Every navigation to a table route passes the guard before its
        // view handler runs.
        .merge(view_routes.route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::guard_middleware,
        )))
        .with_state(state);

    // 4. Observability and Correlation Layers (applied outermost)
    base_router
        .layer(
            ServiceBuilder::new()
                // 4a. Request ID generation: a unique UUID per navigation.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 4b. Request tracing: wraps the navigation lifecycle in a
                // span correlated by the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 4c. Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 5. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes `TraceLayer` span creation: includes the `x-request-id` header
/// alongside the method and URI so every log line of a navigation is
/// correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "navigation",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}

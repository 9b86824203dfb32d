use pac_gateway::{
    AppState, MemoryTokenStore, TokenStoreState, build_registry,
    config::{AppConfig, Env},
    create_router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point: loads configuration, initializes logging, flattens the route
/// table, and serves the navigation gateway.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (fail-fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // RUST_LOG wins; otherwise sensible local-development defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pac_gateway=debug,tower_http=info,axum=trace".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            // LOCAL: pretty output for human readability.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON output for centralized log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Gateway starting in {:?} mode", config.env);

    // 4. Route Table Construction (fail-fast)
    // Duplicate or unrooted paths are declaration bugs; refuse to start.
    let registry = Arc::new(
        build_registry(&config).expect("FATAL: invalid route table declaration."),
    );
    tracing::info!("Route table flattened: {} routes registered", registry.len());

    // 5. Token Store Initialization
    // Starts empty; the external login flow is the writer.
    let tokens = Arc::new(MemoryTokenStore::new()) as TokenStoreState;

    // 6. Unified State Assembly
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState {
        registry,
        tokens,
        config,
    };

    // 7. Router and Server Startup
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("FATAL: failed to bind {bind_addr}: {e}"));

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on {bind_addr}");
    tracing::info!("Route manifest available at: http://{bind_addr}/routes");

    axum::serve(listener, app)
        .await
        .expect("FATAL: server terminated unexpectedly.");
}

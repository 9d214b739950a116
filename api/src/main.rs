//! Believer Score API Server
//!
//! REST API serving the believer score report and per-token believers.

use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use axum::{routing::get, Router};
use scorer::{BelieverPipeline, GraphAccess, PgGraph, PipelineConfig};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod routes;

/// Application state shared across handlers
pub struct AppState<G> {
    pub pipeline: BelieverPipeline<G>,
    /// Upper bound on a single pipeline call
    pub request_timeout: Duration,
}

mod defaults {
    pub const API_PORT: &str = "8080";
    pub const API_HOST: &str = "0.0.0.0";
    pub const REQUEST_TIMEOUT_SECS: &str = "30";
}

/// Build the full router around a pipeline
pub fn app<G>(state: Arc<AppState<G>>) -> Router
where
    G: GraphAccess + Send + Sync + 'static,
{
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Root endpoint with API info
        .route("/", get(root))
        // Health check
        .route("/health", get(health_check))
        // API routes
        .nest("/api", routes::api_routes())
        // State and middleware
        .with_state(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,scorer=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Believer Score API Server...");

    // Initialize database connection
    let db_pool = believer_db::initialize_database().await?;
    let graph = PgGraph::new(db_pool);
    graph.health_check().await?;
    tracing::info!("Connected to database");

    let config = PipelineConfig::from_env()?;
    let timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
        .unwrap_or_else(|_| defaults::REQUEST_TIMEOUT_SECS.to_string())
        .parse::<u64>()?;
    tracing::info!(?config, timeout_secs, "Pipeline configured");

    // Create app state
    let state = Arc::new(AppState {
        pipeline: BelieverPipeline::new(graph, config),
        request_timeout: Duration::from_secs(timeout_secs),
    });

    // Get port from environment
    let port = env::var("API_PORT")
        .unwrap_or_else(|_| defaults::API_PORT.to_string())
        .parse::<u16>()
        .unwrap_or(8080);

    let host = env::var("API_HOST").unwrap_or_else(|_| defaults::API_HOST.to_string());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

/// Root endpoint - API information
async fn root() -> axum::response::Html<&'static str> {
    axum::response::Html(r#"
<!DOCTYPE html>
<html>
<head>
    <title>Believer Score API</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 800px; margin: 50px auto; padding: 20px; background: #1a1a2e; color: #eee; }
        h1 { color: #f5a623; }
        a { color: #4fc3f7; }
        code { background: #333; padding: 2px 6px; border-radius: 4px; }
        .endpoint { margin: 10px 0; padding: 10px; background: #252540; border-radius: 8px; }
        .method { color: #4caf50; font-weight: bold; }
    </style>
</head>
<body>
    <h1>Believer Score API</h1>
    <p>Tokens ranked by distinct, socially verified holders</p>

    <h2>Endpoints</h2>

    <div class="endpoint">
        <span class="method">GET</span> <a href="/health">/health</a> - Health check
    </div>

    <h3>Tokens</h3>
    <div class="endpoint">
        <span class="method">GET</span> <a href="/api/tokens">/api/tokens</a> - Believer score report
    </div>
    <div class="endpoint">
        <span class="method">GET</span> <code>/api/tokens/:address</code> - Score of one token
    </div>
    <div class="endpoint">
        <span class="method">GET</span> <code>/api/tokens/:address/believers?limit=25</code> - Credible believers
    </div>
</body>
</html>
    "#)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

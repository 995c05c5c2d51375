use ai_client::{FinancialAi, SharedNarrativeClient};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use configuration::SimulationSettings;
use core_types::TimeSeries;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    /// The loaded dataset. Read-only for the lifetime of the server.
    pub data: TimeSeries,
    /// Horizon and trial count used when a simulation request omits them.
    pub simulation: SimulationSettings,
    /// `None` when no API key is configured.
    pub ai: Option<FinancialAi<SharedNarrativeClient>>,
}

impl AppState {
    pub fn new(data: TimeSeries, simulation: SimulationSettings) -> Self {
        Self {
            data,
            simulation,
            ai: None,
        }
    }

    pub fn with_ai(mut self, ai: FinancialAi<SharedNarrativeClient>) -> Self {
        self.ai = Some(ai);
        self
    }
}

/// Builds the API router with CORS, request tracing and a body limit.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/indicators", get(handlers::list_indicators))
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/stats/:indicator", get(handlers::get_indicator_stats))
        .route("/api/trend/:indicator", get(handlers::get_indicator_trend))
        .route("/api/yoy", post(handlers::compare_years))
        .route("/api/simulation", post(handlers::run_simulation))
        .route("/api/analyze", post(handlers::analyze))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024 * 10))
}

/// Binds `addr` and serves the API until the process is stopped.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

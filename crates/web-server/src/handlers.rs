use crate::{error::AppError, AppState};
use ai_client::AnalysisRequest;
use analytics::{BudgetTrend, StatsEngine, StatsSummary};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use core_types::{group_by_year, indicator_categories, DateRange, IndicatorCategory, YoyMetrics};
use serde::{Deserialize, Serialize};
use simulator::{MonteCarloEngine, MonteCarloResult, SimulationParams};
use std::sync::Arc;

/// The upper bound used when a window has no `to`.
const OPEN_END: &str = "9999-12";

/// Optional `?from=YYYY-MM&to=YYYY-MM` window on per-indicator routes.
#[derive(Debug, Default, Deserialize)]
pub struct Window {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl Window {
    fn range(&self) -> DateRange {
        DateRange::new(
            self.from.clone().unwrap_or_default(),
            self.to.clone().unwrap_or_else(|| OPEN_END.to_string()),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct YoyRequest {
    pub indicators: Vec<String>,
    pub years: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SimulationRequest {
    pub values: Vec<f64>,
    pub periods: Option<usize>,
    pub simulations: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: String,
}

/// Chronological readings of `indicator` inside the window.
fn windowed_values(state: &AppState, indicator: &str, window: &Window) -> Result<Vec<f64>, AppError> {
    let series = state
        .data
        .get(indicator)
        .ok_or_else(|| AppError::NotFound(format!("Unknown indicator '{}'", indicator)))?;
    let range = window.range();
    Ok(series
        .iter()
        .filter(|(key, _)| range.contains(key))
        .map(|(_, value)| *value)
        .collect())
}

/// # GET /api/indicators
pub async fn list_indicators(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.data.keys().cloned().collect())
}

/// # GET /api/categories
pub async fn list_categories() -> Json<Vec<IndicatorCategory>> {
    Json(indicator_categories())
}

/// # GET /api/stats/:indicator
pub async fn get_indicator_stats(
    Path(indicator): Path<String>,
    Query(window): Query<Window>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsSummary>, AppError> {
    let values = windowed_values(&state, &indicator, &window)?;
    Ok(Json(StatsEngine::new().calculate_stats(&values)))
}

/// # GET /api/trend/:indicator
pub async fn get_indicator_trend(
    Path(indicator): Path<String>,
    Query(window): Query<Window>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<BudgetTrend>, AppError> {
    let values = windowed_values(&state, &indicator, &window)?;
    Ok(Json(StatsEngine::new().analyze_budget_trend(&values)))
}

/// # POST /api/yoy
pub async fn compare_years(
    State(state): State<Arc<AppState>>,
    Json(request): Json<YoyRequest>,
) -> Json<YoyMetrics> {
    let grouped = group_by_year(&state.data, &request.indicators, &request.years);
    let metrics = StatsEngine::new().compute_yoy_metrics(&grouped, &request.indicators, &request.years);
    Json(metrics)
}

/// # POST /api/simulation
/// Runs on the blocking pool; large trial counts would otherwise stall the reactor.
pub async fn run_simulation(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SimulationRequest>,
) -> Result<Json<MonteCarloResult>, AppError> {
    if request.values.len() < 2 {
        return Err(AppError::BadRequest(
            "Need at least 2 historical values for simulation".to_string(),
        ));
    }

    let params = SimulationParams::new(
        request.periods.unwrap_or(state.simulation.periods),
        request.simulations.unwrap_or(state.simulation.simulations),
    );
    if params.periods > state.simulation.max_periods {
        return Err(AppError::BadRequest(format!(
            "periods must not exceed {}",
            state.simulation.max_periods
        )));
    }
    if params.simulations > state.simulation.max_simulations {
        return Err(AppError::BadRequest(format!(
            "simulations must not exceed {}",
            state.simulation.max_simulations
        )));
    }
    let values = request.values;

    let result =
        tokio::task::spawn_blocking(move || MonteCarloEngine::new().run(&values, params)).await??;
    Ok(Json(result))
}

/// # POST /api/analyze
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let ai = state.ai.as_ref().ok_or(AppError::AiUnavailable)?;

    if request.financial_data.trim().is_empty() {
        return Err(AppError::BadRequest("Financial data is required".to_string()));
    }

    let analysis = ai.analyze_financial_data(&request).await;
    Ok(Json(AnalysisResponse { analysis }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_router;
    use ai_client::{AiError, FinancialAi, NarrativeClient};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use configuration::SimulationSettings;
    use core_types::TimeSeries;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct EchoClient;

    #[async_trait]
    impl NarrativeClient for EchoClient {
        async fn complete(&self, _system: &str, user_prompt: &str) -> Result<String, AiError> {
            Ok(format!("echo: {}", user_prompt.len()))
        }
    }

    fn dataset() -> TimeSeries {
        let mut data = TimeSeries::new();
        let revenue = data.entry("Ukupni Prihodi, Euro".to_string()).or_default();
        for (key, value) in [
            ("2023-01", 100.0),
            ("2023-02", 120.0),
            ("2024-01", 110.0),
            ("2024-02", 150.0),
        ] {
            revenue.insert(key.to_string(), value);
        }
        data
    }

    fn app() -> Router {
        let state = AppState::new(dataset(), SimulationSettings::default());
        create_router(Arc::new(state))
    }

    fn app_with_ai() -> Router {
        let state = AppState::new(dataset(), SimulationSettings::default())
            .with_ai(FinancialAi::new(EchoClient).into_shared());
        create_router(Arc::new(state))
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_check() {
        let response = app().oneshot(get("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn lists_indicators() {
        let response = app().oneshot(get("/api/indicators")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!(["Ukupni Prihodi, Euro"]));
    }

    #[tokio::test]
    async fn lists_categories() {
        let response = app().oneshot(get("/api/categories")).await.unwrap();
        let json = json_body(response).await;
        assert_eq!(json[0]["name"], "Prihodi");
    }

    #[tokio::test]
    async fn stats_for_known_indicator() {
        let response = app()
            .oneshot(get("/api/stats/Ukupni%20Prihodi,%20Euro"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["total"], 480.0);
        assert_eq!(json["average"], 120.0);
        assert_eq!(json["min"], 100.0);
        assert_eq!(json["max"], 150.0);
    }

    #[tokio::test]
    async fn stats_respect_window() {
        let response = app()
            .oneshot(get("/api/stats/Ukupni%20Prihodi,%20Euro?from=2024-01&to=2024-12"))
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["total"], 260.0);
    }

    #[tokio::test]
    async fn unknown_indicator_is_not_found() {
        let response = app().oneshot(get("/api/stats/Nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().contains("Nope"));
    }

    #[tokio::test]
    async fn short_trend_is_stable() {
        let response = app()
            .oneshot(get("/api/trend/Ukupni%20Prihodi,%20Euro"))
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["trend"], "stable");
        assert_eq!(json["volatility"], "low");
        assert_eq!(json["seasonal"], false);
    }

    #[tokio::test]
    async fn yoy_compares_consecutive_years() {
        let body = json!({
            "indicators": ["Ukupni Prihodi, Euro"],
            "years": ["2024", "2023"],
        });
        let response = app().oneshot(post("/api/yoy", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        let jan = &json["Ukupni Prihodi, Euro"]["01 (2023 vs 2024)"];
        assert_eq!(jan["delta"], 10.0);
        assert_eq!(jan["percentChange"], 10.0);
    }

    #[tokio::test]
    async fn simulation_needs_two_values() {
        let response = app()
            .oneshot(post("/api/simulation", json!({ "values": [100.0] })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            "Need at least 2 historical values for simulation"
        );
    }

    #[tokio::test]
    async fn engine_errors_are_unprocessable() {
        let response = app()
            .oneshot(post("/api/simulation", json!({ "values": [100.0, 110.0] })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().contains("at least 3"));
    }

    #[tokio::test]
    async fn oversized_simulation_is_rejected() {
        let body = json!({
            "values": [100.0, 110.0, 105.0],
            "periods": 1,
            "simulations": 1u64 << 42,
        });
        let response = app().oneshot(post("/api/simulation", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            "simulations must not exceed 100000"
        );

        let body = json!({ "values": [100.0, 110.0, 105.0], "periods": 100_000 });
        let response = app().oneshot(post("/api/simulation", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn simulation_returns_result() {
        let body = json!({
            "values": [100.0, 110.0, 105.0, 120.0],
            "periods": 6,
            "simulations": 500,
        });
        let response = app().oneshot(post("/api/simulation", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["simulations"].as_array().unwrap().len(), 500);
        assert!(json["percentile5"].as_f64().unwrap() <= json["percentile95"].as_f64().unwrap());
    }

    #[tokio::test]
    async fn analyze_without_client_is_unavailable() {
        let response = app()
            .oneshot(post("/api/analyze", json!({ "financialData": "{}" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["error"], "AI service not configured");
    }

    #[tokio::test]
    async fn analyze_rejects_empty_data() {
        let response = app_with_ai()
            .oneshot(post("/api/analyze", json!({ "financialData": "  " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn analyze_returns_narrative() {
        let response = app_with_ai()
            .oneshot(post(
                "/api/analyze",
                json!({ "financialData": "{\"a\":1}", "question": "Why?" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert!(json["analysis"].as_str().unwrap().starts_with("echo: "));
    }
}

use crate::client::{NarrativeClient, OpenRouterClient};
use crate::error::AiError;
use configuration::AiSettings;
use serde::{Deserialize, Serialize};
use serde_json::json;
use simulator::ForecastSummary;
use std::sync::Arc;

/// A type-erased client, for hosts that pick the implementation at runtime.
pub type SharedNarrativeClient = Arc<dyn NarrativeClient>;

/// Returned in place of an analysis whenever the service call fails.
pub const UNAVAILABLE_MESSAGE: &str =
    "AI analysis is temporarily unavailable. Please check your API configuration and try again.";

const SYSTEM_PROMPT: &str = "You are a financial analyst specialising in public finance and \
economic indicators. Give clear, practical insights that people without a finance background \
can follow. Focus on trends, risks, opportunities and practical implications. Use plain \
language while keeping analytical depth. Always structure the answer with clear sections and \
bullet points. Keep it as short and understandable as possible for ordinary readers. \
Answer in Montenegrin.";

const DEFAULT_QUESTION: &str = "Act as a state budget expert with IMF and World Bank experience \
in the government of an EU country. Provide a comprehensive analysis of this financial data";

const FORECAST_QUESTION: &str = "Based on this Monte Carlo simulation and historical data, what \
are the key insights and risks for this financial indicator?";

const FORECAST_CONTEXT: &str = "This is forecast analysis using Monte Carlo simulation.";

/// A request for narrative analysis of an already-serialized data payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub financial_data: String,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

impl AnalysisRequest {
    pub fn new(financial_data: impl Into<String>) -> Self {
        Self {
            financial_data: financial_data.into(),
            ..Self::default()
        }
    }

    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The user message: context, question and data, separated by blank lines.
    pub fn user_prompt(&self) -> String {
        let question = self
            .question
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .unwrap_or(DEFAULT_QUESTION);
        format!(
            "{}\n\nQuestion: {}\n\nFinancial Data:\n{}",
            self.context.as_deref().unwrap_or_default(),
            question,
            self.financial_data
        )
    }
}

/// Builds prompts for the narrative-text collaborator and absorbs its failures.
pub struct FinancialAi<C> {
    client: C,
}

impl<C: NarrativeClient> FinancialAi<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Erases the client type so the analyst can live in shared server state.
    pub fn into_shared(self) -> FinancialAi<SharedNarrativeClient>
    where
        C: 'static,
    {
        FinancialAi {
            client: Arc::new(self.client),
        }
    }

    /// Asks for an analysis of the given payload.
    ///
    /// Never fails: transport or service errors are logged and replaced by
    /// `UNAVAILABLE_MESSAGE`.
    pub async fn analyze_financial_data(&self, request: &AnalysisRequest) -> String {
        match self
            .client
            .complete(SYSTEM_PROMPT, &request.user_prompt())
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "AI analysis failed.");
                UNAVAILABLE_MESSAGE.to_string()
            }
        }
    }

    /// Asks for the risks and insights of a Monte Carlo forecast.
    pub async fn generate_forecast_insights(
        &self,
        indicator: &str,
        historical_values: &[f64],
        summary: &ForecastSummary,
    ) -> String {
        let payload = match forecast_payload(indicator, historical_values, summary) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build forecast payload.");
                return UNAVAILABLE_MESSAGE.to_string();
            }
        };

        let request = AnalysisRequest::new(payload)
            .with_question(FORECAST_QUESTION)
            .with_context(FORECAST_CONTEXT);
        self.analyze_financial_data(&request).await
    }
}

fn forecast_payload(
    indicator: &str,
    historical_values: &[f64],
    summary: &ForecastSummary,
) -> Result<String, AiError> {
    let payload = json!({
        "indicator": indicator,
        "historicalValues": historical_values,
        "monteCarloResults": summary,
    });
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Builds the production client, or `None` when no API key is configured.
///
/// Callers treat `None` as "AI features disabled".
pub fn create_ai_client(settings: &AiSettings) -> Option<FinancialAi<OpenRouterClient>> {
    if settings.api_key.as_deref().is_none_or(|key| key.trim().is_empty()) {
        tracing::warn!("OpenRouter API key not configured. AI features will be disabled.");
        return None;
    }

    match OpenRouterClient::new(settings) {
        Ok(client) => Some(FinancialAi::new(client)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build the AI client. AI features will be disabled.");
            None
        }
    }
}

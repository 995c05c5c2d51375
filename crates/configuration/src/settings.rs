use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; missing sections fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSettings,
    pub simulation: SimulationSettings,
    pub ai: AiSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

impl Config {
    /// Rejects settings the engines or the AI client cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "data.path must not be empty".to_string(),
            ));
        }
        if self.simulation.periods == 0 {
            return Err(ConfigError::ValidationError(
                "simulation.periods must be positive".to_string(),
            ));
        }
        if self.simulation.simulations == 0 {
            return Err(ConfigError::ValidationError(
                "simulation.simulations must be positive".to_string(),
            ));
        }
        if self.simulation.periods > self.simulation.max_periods {
            return Err(ConfigError::ValidationError(format!(
                "simulation.periods ({}) exceeds simulation.max_periods ({})",
                self.simulation.periods, self.simulation.max_periods
            )));
        }
        if self.simulation.simulations > self.simulation.max_simulations {
            return Err(ConfigError::ValidationError(format!(
                "simulation.simulations ({}) exceeds simulation.max_simulations ({})",
                self.simulation.simulations, self.simulation.max_simulations
            )));
        }
        if !(0.0..=2.0).contains(&self.ai.temperature) {
            return Err(ConfigError::ValidationError(format!(
                "ai.temperature must be within [0, 2], got {}",
                self.ai.temperature
            )));
        }
        Ok(())
    }
}

/// Where the dataset lives and how headline indicators are named in it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Path to the JSON resource with the monthly readings.
    pub path: PathBuf,
    /// Candidate names for total revenues, in order of preference.
    pub revenue_candidates: Vec<String>,
    /// Candidate names for total expenditures, in order of preference.
    pub expenditure_candidates: Vec<String>,
    /// Candidate names for tax revenues, in order of preference.
    pub tax_candidates: Vec<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data.json"),
            revenue_candidates: vec![
                "Ukupni Prihodi, Euro".to_string(),
                "Total Revenues, Euros".to_string(),
            ],
            expenditure_candidates: vec![
                "Ukupni Rashodi, Euro".to_string(),
                "Total Expenditures, Euros".to_string(),
            ],
            tax_candidates: vec!["Porezi, Euro".to_string(), "Taxes, Euros".to_string()],
        }
    }
}

/// Default horizon and trial count for Monte Carlo runs.
///
/// The maxima cap what HTTP clients may request; the engine itself is unbounded.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub periods: usize,
    pub simulations: usize,
    pub max_periods: usize,
    pub max_simulations: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            periods: 12,
            simulations: 10_000,
            max_periods: 120,
            max_simulations: 100_000,
        }
    }
}

/// Settings for the narrative-text collaborator.
///
/// AI features are disabled when `api_key` is absent.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Sent as the `HTTP-Referer` header.
    pub referer: String,
    /// Sent as the `X-Title` header.
    pub title: String,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            model: "deepseek/deepseek-chat-v3.1:free".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            timeout: Duration::from_secs(30),
            referer: "http://localhost:3000".to_string(),
            title: "Financial Dashboard AI Analysis".to_string(),
        }
    }
}

// Keeps the API key out of logs.
impl fmt::Debug for AiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("referer", &self.referer)
            .field("title", &self.title)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Full,
            directory: None,
            file_prefix: "budget-lens.log".to_string(),
        }
    }
}

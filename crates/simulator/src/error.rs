use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Not enough historical data: at least {required} values are required, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("No usable period-over-period returns could be derived from the historical values")]
    NoUsableReturns,

    #[error("Invalid simulation parameter: {0}")]
    InvalidParameter(String),

    #[error("Statistics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
}

impl SimulationError {
    /// Both insufficient-data conditions, as opposed to caller mistakes.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            SimulationError::InsufficientData { .. } | SimulationError::NoUsableReturns
        )
    }
}

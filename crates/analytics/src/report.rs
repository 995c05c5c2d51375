use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregate statistics for one indicator's series.
///
/// This struct is the output of `StatsEngine::calculate_stats` and is handed as-is to
/// renderers and to the narrative-text collaborator, hence the camelCase wire names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// Compound per-period growth between the first and last value, in percent,
    /// signed by whether the series kept its sign.
    pub growth_rate: f64,
    /// Sample standard deviation (divisor `n - 1`).
    pub standard_deviation: f64,
}

impl StatsSummary {
    /// The all-zero summary returned for an empty series.
    pub fn zeroed() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Volatility {
    Low,
    Moderate,
    High,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Stable => "stable",
        };
        f.write_str(label)
    }
}

impl fmt::Display for Volatility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Volatility::Low => "low",
            Volatility::Moderate => "moderate",
            Volatility::High => "high",
        };
        f.write_str(label)
    }
}

/// A coarse qualitative reading of a monthly series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetTrend {
    pub trend: Trend,
    pub volatility: Volatility,
    /// Whether quarterly averages differ by more than 20%.
    pub seasonal: bool,
}

impl Default for BudgetTrend {
    fn default() -> Self {
        Self {
            trend: Trend::Stable,
            volatility: Volatility::Low,
            seasonal: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_uses_dashboard_field_names() {
        let json = serde_json::to_value(StatsSummary::zeroed()).unwrap();
        for field in ["total", "average", "min", "max", "growthRate", "standardDeviation"] {
            assert_eq!(json[field], 0.0, "missing {field}");
        }
    }

    #[test]
    fn trend_serializes_lowercase() {
        let json = serde_json::to_string(&BudgetTrend::default()).unwrap();
        assert_eq!(
            json,
            r#"{"trend":"stable","volatility":"low","seasonal":false}"#
        );
    }

    #[test]
    fn labels_match_wire_names() {
        assert_eq!(Trend::Falling.to_string(), "falling");
        assert_eq!(Volatility::Moderate.to_string(), "moderate");
    }
}

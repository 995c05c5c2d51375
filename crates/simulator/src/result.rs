use serde::{Deserialize, Serialize};

/// How many terminal values are forwarded to the narrative-text collaborator.
const SUMMARY_SAMPLE: usize = 10;

/// The reduced outcome of a Monte Carlo run.
///
/// `mean`, `standard_deviation` and the percentiles cover every trial; `simulations`
/// holds only the lowest 1000 terminal values, ascending, for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonteCarloResult {
    pub mean: f64,
    pub standard_deviation: f64,
    pub percentile5: f64,
    pub percentile25: f64,
    pub percentile50: f64,
    pub percentile75: f64,
    pub percentile95: f64,
    pub simulations: Vec<f64>,
}

/// The compact view of a result that is sent out for narrative analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    pub mean: f64,
    pub percentile5: f64,
    pub percentile25: f64,
    pub percentile75: f64,
    pub percentile95: f64,
    /// Smallest value of the returned sample.
    pub min: f64,
    /// Largest value of the returned sample.
    pub max: f64,
    pub sample_simulations: Vec<f64>,
}

impl ForecastSummary {
    pub fn from_result(result: &MonteCarloResult) -> Self {
        let min = result.simulations.first().copied().unwrap_or_default();
        let max = result.simulations.last().copied().unwrap_or_default();

        Self {
            mean: result.mean,
            percentile5: result.percentile5,
            percentile25: result.percentile25,
            percentile75: result.percentile75,
            percentile95: result.percentile95,
            min,
            max,
            sample_simulations: result
                .simulations
                .iter()
                .take(SUMMARY_SAMPLE)
                .copied()
                .collect(),
        }
    }
}

impl From<&MonteCarloResult> for ForecastSummary {
    fn from(result: &MonteCarloResult) -> Self {
        Self::from_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> MonteCarloResult {
        MonteCarloResult {
            mean: 150.0,
            standard_deviation: 20.0,
            percentile5: 110.0,
            percentile25: 130.0,
            percentile50: 150.0,
            percentile75: 170.0,
            percentile95: 190.0,
            simulations: (0..50).map(|i| 100.0 + i as f64 * 2.0).collect(),
        }
    }

    #[test]
    fn result_uses_dashboard_field_names() {
        let json = serde_json::to_value(result()).unwrap();
        assert_eq!(json["standardDeviation"], 20.0);
        assert_eq!(json["percentile5"], 110.0);
        assert_eq!(json["percentile95"], 190.0);
        assert_eq!(json["simulations"].as_array().unwrap().len(), 50);
    }

    #[test]
    fn summary_keeps_ten_samples_and_sample_extremes() {
        let summary = ForecastSummary::from(&result());
        assert_eq!(summary.sample_simulations.len(), 10);
        assert_eq!(summary.sample_simulations[0], 100.0);
        assert_eq!(summary.min, 100.0);
        assert_eq!(summary.max, 198.0);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("sampleSimulations").is_some());
        assert!(json.get("percentile50").is_none());
    }
}

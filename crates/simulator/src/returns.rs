use crate::error::SimulationError;
use analytics::stats::{mean, remove_outliers, sample_std_dev};

/// Minimum number of historical values a simulation needs.
pub const MIN_HISTORY: usize = 3;

/// Previous values at or below this magnitude cannot anchor a return.
const RETURN_EPSILON: f64 = 0.01;

/// Per-period volatility used for simulation never exceeds 50%.
const MAX_VOLATILITY: f64 = 0.5;

/// The return distribution derived from an indicator's history.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnModel {
    /// History after IQR outlier removal, in original order.
    pub cleaned: Vec<f64>,
    /// Period-over-period relative changes of `cleaned`.
    pub returns: Vec<f64>,
    pub mean_return: f64,
    /// Sample standard deviation of `returns`, before capping.
    pub std_dev: f64,
}

impl ReturnModel {
    /// Builds the model from raw historical values.
    ///
    /// Fails with `InsufficientData` under three values and with `NoUsableReturns`
    /// when every adjacent pair was discarded.
    pub fn from_history(historical: &[f64]) -> Result<Self, SimulationError> {
        if historical.len() < MIN_HISTORY {
            return Err(SimulationError::InsufficientData {
                required: MIN_HISTORY,
                actual: historical.len(),
            });
        }

        let cleaned = remove_outliers(historical);
        let returns = period_returns(&cleaned);

        if returns.is_empty() {
            return Err(SimulationError::NoUsableReturns);
        }

        let mean_return = mean(&returns);
        let std_dev = sample_std_dev(&returns, mean_return);

        tracing::debug!(
            history = historical.len(),
            cleaned = cleaned.len(),
            returns = returns.len(),
            mean_return,
            std_dev,
            "Derived return model."
        );

        Ok(Self {
            cleaned,
            returns,
            mean_return,
            std_dev,
        })
    }

    /// The volatility actually fed into the simulation.
    pub fn capped_std_dev(&self) -> f64 {
        self.std_dev.min(MAX_VOLATILITY)
    }

    /// The starting level of every trajectory.
    pub fn last_value(&self) -> f64 {
        // `returns` is non-empty, so `cleaned` has at least two values.
        self.cleaned.last().copied().unwrap_or_default()
    }
}

/// `(current - previous) / |previous|` for each adjacent pair with a usable previous value.
fn period_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|pair| pair[0].abs() > RETURN_EPSILON)
        .map(|pair| (pair[1] - pair[0]) / pair[0].abs())
        .filter(|r| r.is_finite())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_history() {
        assert_eq!(
            ReturnModel::from_history(&[1.0, 2.0]),
            Err(SimulationError::InsufficientData {
                required: 3,
                actual: 2
            })
        );
        assert!(ReturnModel::from_history(&[]).is_err());
    }

    #[test]
    fn near_zero_history_has_no_returns() {
        assert_eq!(
            ReturnModel::from_history(&[0.0, 0.005, -0.01]),
            Err(SimulationError::NoUsableReturns)
        );
    }

    #[test]
    fn returns_skip_near_zero_denominators() {
        let returns = period_returns(&[100.0, 0.0, 50.0, 75.0]);
        assert_eq!(returns, vec![-1.0, 0.5]);
    }

    #[test]
    fn negative_bases_use_magnitude() {
        // -100 -> -50 is an improvement of half the magnitude
        assert_eq!(period_returns(&[-100.0, -50.0]), vec![0.5]);
    }

    #[test]
    fn model_statistics_use_sample_deviation() {
        let model = ReturnModel::from_history(&[100.0, 110.0, 99.0]).unwrap();
        assert_eq!(model.cleaned, vec![100.0, 110.0, 99.0]);
        assert_eq!(model.returns.len(), 2);
        assert!((model.returns[0] - 0.1).abs() < 1e-12);
        assert!((model.returns[1] + 0.1).abs() < 1e-12);
        assert!(model.mean_return.abs() < 1e-12);
        // two returns of +/-0.1 around zero: sqrt(0.02 / 1)
        assert!((model.std_dev - 0.02f64.sqrt()).abs() < 1e-12);
        assert_eq!(model.last_value(), 99.0);
    }

    #[test]
    fn outliers_are_removed_before_returns() {
        let model = ReturnModel::from_history(&[100.0, 102.0, 98.0, 101.0, 99.0, 1000.0, 103.0])
            .unwrap();
        assert!(!model.cleaned.contains(&1000.0));
        assert_eq!(model.returns.len(), 5);
        assert_eq!(model.last_value(), 103.0);
    }

    #[test]
    fn volatility_is_capped() {
        let model = ReturnModel::from_history(&[10.0, 100.0, 10.0, 100.0]).unwrap();
        assert!(model.std_dev > 0.5);
        assert_eq!(model.capped_std_dev(), 0.5);
    }
}

use crate::error::SimulationError;
use crate::result::MonteCarloResult;
use crate::returns::ReturnModel;
use analytics::stats::{mean, percentile, sample_std_dev};
use rand::rngs::ThreadRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const DEFAULT_PERIODS: usize = 12;
pub const DEFAULT_SIMULATIONS: usize = 10_000;

/// Per-period draws are clamped to -80% .. +200%.
const RETURN_FLOOR: f64 = -0.8;
const RETURN_CEILING: f64 = 2.0;

/// How many sorted terminal values are returned for rendering.
const SAMPLE_LIMIT: usize = 1000;

const PERCENTILES: [f64; 5] = [0.05, 0.25, 0.50, 0.75, 0.95];

/// Horizon and trial count for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Number of periods each trajectory is compounded forward.
    pub periods: usize,
    /// Number of independent trajectories.
    pub simulations: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            periods: DEFAULT_PERIODS,
            simulations: DEFAULT_SIMULATIONS,
        }
    }
}

impl SimulationParams {
    pub fn new(periods: usize, simulations: usize) -> Self {
        Self {
            periods,
            simulations,
        }
    }

    fn validate(&self) -> Result<(), SimulationError> {
        if self.periods == 0 {
            return Err(SimulationError::InvalidParameter(
                "periods must be positive".to_string(),
            ));
        }
        if self.simulations == 0 {
            return Err(SimulationError::InvalidParameter(
                "simulations must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Drives Monte Carlo forecasts over an injectable random source.
///
/// The engine holds no state besides its RNG; each `run` is independent.
#[derive(Debug, Clone)]
pub struct MonteCarloEngine<R = ThreadRng> {
    rng: R,
}

impl MonteCarloEngine<ThreadRng> {
    /// An engine backed by the thread-local generator. Results are not reproducible.
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for MonteCarloEngine<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> MonteCarloEngine<R> {
    /// An engine backed by the given generator, e.g. a seeded `StdRng`.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Simulates `params.simulations` trajectories of `params.periods` steps each.
    ///
    /// # Arguments
    ///
    /// * `historical` - The indicator's values in chronological order; at least three.
    /// * `params` - Horizon and trial count, both positive.
    ///
    /// # Returns
    ///
    /// A `MonteCarloResult` whose statistics cover every trial and whose
    /// `simulations` field holds at most the 1000 lowest terminal values.
    pub fn run(
        &mut self,
        historical: &[f64],
        params: SimulationParams,
    ) -> Result<MonteCarloResult, SimulationError> {
        params.validate()?;
        let model = ReturnModel::from_history(historical)?;

        let mean_return = model.mean_return;
        let volatility = model.capped_std_dev();
        let start = model.last_value();

        let mut terminal: Vec<f64> = (0..params.simulations)
            .map(|_| {
                let terminal = (0..params.periods).fold(start, |value, _| {
                    let drawn = self.normal(mean_return, volatility);
                    let bounded = drawn.clamp(RETURN_FLOOR, RETURN_CEILING);
                    (value * (1.0 + bounded)).max(0.0)
                });
                finite_or_zero(terminal)
            })
            .collect();

        terminal.sort_by(f64::total_cmp);

        let result = summarize(terminal)?;
        tracing::debug!(
            periods = params.periods,
            simulations = params.simulations,
            mean = result.mean,
            p50 = result.percentile50,
            "Monte Carlo simulation finished."
        );
        Ok(result)
    }

    /// One normal draw via the Box-Muller transform.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.open_unit();
        let u2 = self.open_unit();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        z * std_dev + mean
    }

    /// A uniform draw in (0, 1); exact zeros are redrawn.
    fn open_unit(&mut self) -> f64 {
        loop {
            let u: f64 = self.rng.r#gen();
            if u != 0.0 {
                return u;
            }
        }
    }
}

/// Overflowed trajectories and statistics are reported as 0.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Reduces ascending-sorted terminal values to the result shape.
fn summarize(mut sorted: Vec<f64>) -> Result<MonteCarloResult, SimulationError> {
    let mean = finite_or_zero(mean(&sorted));
    let standard_deviation = finite_or_zero(sample_std_dev(&sorted, mean));

    let [p5, p25, p50, p75, p95] = PERCENTILES;
    let percentile5 = percentile(&sorted, p5)?;
    let percentile25 = percentile(&sorted, p25)?;
    let percentile50 = percentile(&sorted, p50)?;
    let percentile75 = percentile(&sorted, p75)?;
    let percentile95 = percentile(&sorted, p95)?;

    sorted.truncate(SAMPLE_LIMIT);

    Ok(MonteCarloResult {
        mean,
        standard_deviation,
        percentile5,
        percentile25,
        percentile50,
        percentile75,
        percentile95,
        simulations: sorted,
    })
}

/// Runs a simulation on the thread-local generator.
///
/// Equivalent to `MonteCarloEngine::new().run(historical, SimulationParams::new(periods, simulations))`.
pub fn run_monte_carlo_simulation(
    historical: &[f64],
    periods: usize,
    simulations: usize,
) -> Result<MonteCarloResult, SimulationError> {
    MonteCarloEngine::new().run(historical, SimulationParams::new(periods, simulations))
}

//! # Budget Lens Simulator
//!
//! Monte Carlo forecasting for a single budget indicator. Historical monthly values
//! are turned into a period-over-period return model, outliers are filtered, and many
//! independent trajectories are compounded forward from the last observed value. The
//! terminal values are reduced to a mean, a sample standard deviation and five
//! nearest-rank percentiles.
//!
//! ## Public API
//!
//! - `MonteCarloEngine`: the simulation driver, generic over its random source.
//! - `run_monte_carlo_simulation`: convenience entry point on the thread-local RNG.
//! - `ReturnModel`: the cleaned history and its return statistics.
//! - `MonteCarloResult`, `ForecastSummary`: result shapes for renderers and the
//!   narrative-text collaborator.
//! - `SimulationError`: the insufficient-data and parameter errors.

pub mod error;
pub mod monte_carlo;
pub mod result;
pub mod returns;

pub use error::SimulationError;
pub use monte_carlo::{
    run_monte_carlo_simulation, MonteCarloEngine, SimulationParams, DEFAULT_PERIODS,
    DEFAULT_SIMULATIONS,
};
pub use result::{ForecastSummary, MonteCarloResult};
pub use returns::ReturnModel;

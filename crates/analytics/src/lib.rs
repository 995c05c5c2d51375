//! # Budget Lens Analytics
//!
//! Descriptive statistics over monthly budget series. This crate is the
//! `StatsEngine` of the workspace and also owns the small statistical primitives
//! (mean, sample standard deviation, IQR outlier filter, nearest-rank percentile)
//! that the Monte Carlo simulator reuses.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O and no shared state. Every call is a function of its inputs.
//! - **Never Fails on Degenerate Input:** Empty series, zero bases and zero denominators
//!   produce defined zeros instead of errors or NaN.
//!
//! ## Public API
//!
//! - `StatsEngine`: summary statistics, year-over-year metrics and trend classification.
//! - `StatsSummary`, `BudgetTrend`: the result structs handed to renderers.
//! - `stats`: the shared primitives.
//! - `AnalyticsError`: returned by the primitives that can be misused.

pub mod engine;
pub mod error;
pub mod report;
pub mod stats;

pub use engine::StatsEngine;
pub use error::AnalyticsError;
pub use report::{BudgetTrend, StatsSummary, Trend, Volatility};

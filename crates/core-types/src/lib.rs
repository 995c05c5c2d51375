//! # Budget Lens Core Types
//!
//! The shared data model for every crate in the workspace: the monthly time series,
//! its per-year grouping, the year-over-year metric record, and the selection
//! utilities the host applications use to slice a dataset before handing it to
//! the analytics and simulation engines.
//!
//! ## Public API
//!
//! - `TimeSeries`, `GroupedByYear`, `YoyMetric`: the data model.
//! - `PeriodKey`, `DateRange`: `YYYY-MM` keys and inclusive windows over them.
//! - `series`: grouping, filtering and indicator-key resolution.
//! - `catalogue`: the built-in indicator categories.

pub mod catalogue;
pub mod error;
pub mod period;
pub mod series;

// Re-export the core types to provide a clean public API.
pub use catalogue::{indicator_categories, IndicatorCategory};
pub use error::CoreError;
pub use period::{DateRange, PeriodKey};
pub use series::{
    available_date_range, available_months, available_years, default_selected_years,
    filter_by_date_range, group_by_year, indicator_values, latest_year_range,
    resolve_indicator_key, surplus_series, GroupedByYear, IndicatorSeries, TimeSeries,
    YoyMetric, YoyMetrics,
};

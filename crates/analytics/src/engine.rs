use crate::report::{BudgetTrend, StatsSummary, Trend, Volatility};
use crate::stats::{mean, sample_std_dev};
use core_types::{GroupedByYear, YoyMetric, YoyMetrics};
use std::collections::BTreeMap;

/// A stateless calculator for descriptive statistics over budget series.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatsEngine {}

impl StatsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the summary statistics for one indicator's ordered values.
    ///
    /// # Arguments
    ///
    /// * `values` - The indicator's readings in chronological order. May be empty.
    ///
    /// # Returns
    ///
    /// A `StatsSummary`. An empty input yields the all-zero summary; this function
    /// never fails.
    pub fn calculate_stats(&self, values: &[f64]) -> StatsSummary {
        if values.is_empty() {
            return StatsSummary::zeroed();
        }

        let total: f64 = values.iter().sum();
        let average = total / values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        StatsSummary {
            total,
            average,
            min,
            max,
            growth_rate: self.growth_rate(values),
            standard_deviation: sample_std_dev(values, average),
        }
    }

    /// Compound growth per period between the first and last value, in percent.
    fn growth_rate(&self, values: &[f64]) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }

        let first = values[0];
        let last = values[values.len() - 1];

        if first == 0.0 {
            return if last > 0.0 { 100.0 } else { 0.0 };
        }

        let periods = (values.len() - 1) as f64;
        let rate = ((last.abs() / first.abs()).powf(1.0 / periods) - 1.0) * 100.0;

        // A series that crossed zero is reported as shrinking.
        let same_sign = (first >= 0.0 && last >= 0.0) || (first < 0.0 && last < 0.0);
        let trend_multiplier = if same_sign { 1.0 } else { -1.0 };

        if rate.is_finite() {
            rate * trend_multiplier
        } else {
            0.0
        }
    }

    /// Compares each selected indicator month by month across consecutive selected years.
    ///
    /// Years are sorted ascending and only adjacent pairs are compared, so `k` years
    /// produce `k - 1` comparisons. Months are taken from the later year of each pair;
    /// a month missing from the earlier year counts as a zero baseline. Result keys
    /// read `"<month> (<prevYear> vs <currYear>)"`.
    ///
    /// Fewer than two selected years yields an empty mapping.
    pub fn compute_yoy_metrics<I, Y>(
        &self,
        grouped: &GroupedByYear,
        selected_indicators: &[I],
        selected_years: &[Y],
    ) -> YoyMetrics
    where
        I: AsRef<str>,
        Y: AsRef<str>,
    {
        let mut metrics = YoyMetrics::new();
        if selected_years.len() < 2 {
            return metrics;
        }

        let mut years: Vec<&str> = selected_years.iter().map(|y| y.as_ref()).collect();
        years.sort_unstable();

        for indicator in selected_indicators {
            let indicator = indicator.as_ref();
            let per_indicator = metrics.entry(indicator.to_string()).or_default();

            for pair in years.windows(2) {
                let (prev_year, curr_year) = (pair[0], pair[1]);

                let Some(current_months) = months_of(grouped, curr_year, indicator) else {
                    continue;
                };
                let previous_months = months_of(grouped, prev_year, indicator);

                for (month, current) in current_months {
                    let previous = previous_months
                        .and_then(|months| months.get(month))
                        .copied()
                        .unwrap_or(0.0);
                    per_indicator.insert(
                        format!("{} ({} vs {})", month, prev_year, curr_year),
                        YoyMetric::between(previous, *current),
                    );
                }
            }
        }

        tracing::debug!(
            indicators = metrics.len(),
            years = years.len(),
            "Computed year-over-year metrics."
        );
        metrics
    }

    /// Classifies a monthly series by direction, volatility and seasonality.
    ///
    /// Needs at least a year of data; shorter series are reported as stable, low
    /// volatility and not seasonal. Seasonality needs two full years.
    pub fn analyze_budget_trend(&self, values: &[f64]) -> BudgetTrend {
        if values.len() < 12 {
            return BudgetTrend::default();
        }

        let stats = self.calculate_stats(values);

        let trend = if stats.growth_rate.abs() > 5.0 {
            if stats.growth_rate > 0.0 {
                Trend::Rising
            } else {
                Trend::Falling
            }
        } else {
            Trend::Stable
        };

        let cv = stats.standard_deviation / stats.average.abs();
        let volatility = if cv > 0.3 {
            Volatility::High
        } else if cv > 0.15 {
            Volatility::Moderate
        } else {
            Volatility::Low
        };

        let seasonal = values.len() >= 24 && detect_seasonality(values);

        BudgetTrend {
            trend,
            volatility,
            seasonal,
        }
    }
}

fn months_of<'a>(
    grouped: &'a GroupedByYear,
    year: &str,
    indicator: &str,
) -> Option<&'a BTreeMap<String, f64>> {
    grouped.get(year).and_then(|by_indicator| by_indicator.get(indicator))
}

/// Compares quarterly averages over month-of-year buckets.
fn detect_seasonality(values: &[f64]) -> bool {
    let quarterly: Vec<f64> = (0..4)
        .filter_map(|q| {
            let quarter: Vec<f64> = values
                .iter()
                .enumerate()
                .filter(|(i, _)| (q * 3..(q + 1) * 3).contains(&(i % 12)))
                .map(|(_, v)| *v)
                .collect();
            (!quarter.is_empty()).then(|| mean(&quarter))
        })
        .collect();

    if quarterly.len() < 4 {
        return false;
    }

    let max = quarterly.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = quarterly.iter().copied().fold(f64::INFINITY, f64::min);
    let spread = (max - min) / min;

    spread.is_finite() && spread > 0.2
}

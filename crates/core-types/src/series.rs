use crate::period::DateRange;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Period key (`YYYY-MM`) to value for a single indicator.
pub type IndicatorSeries = BTreeMap<String, f64>;

/// Indicator name to its monthly readings.
///
/// `BTreeMap` keeps both levels ordered, so iterating an indicator yields its values
/// in chronological order.
pub type TimeSeries = BTreeMap<String, IndicatorSeries>;

/// Year (`YYYY`) -> indicator -> two-digit month (`MM`) -> value.
pub type GroupedByYear = BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>;

/// Indicator -> `"<month> (<prevYear> vs <currYear>)"` -> metric.
pub type YoyMetrics = BTreeMap<String, BTreeMap<String, YoyMetric>>;

/// The change of one indicator/month between two consecutive selected years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YoyMetric {
    pub delta: f64,
    /// Exactly `0.0` when the previous value is zero.
    pub percent_change: f64,
}

impl YoyMetric {
    pub fn between(previous: f64, current: f64) -> Self {
        let delta = current - previous;
        let percent_change = if previous != 0.0 {
            (delta / previous) * 100.0
        } else {
            0.0
        };
        Self {
            delta,
            percent_change,
        }
    }
}

/// All period keys present in any indicator, sorted ascending.
pub fn available_months(data: &TimeSeries) -> Vec<String> {
    let months: BTreeSet<&String> = data.values().flat_map(|series| series.keys()).collect();
    months.into_iter().cloned().collect()
}

/// Distinct years present in the dataset, newest first.
pub fn available_years(data: &TimeSeries) -> Vec<String> {
    let years: BTreeSet<&str> = data
        .values()
        .flat_map(|series| series.keys())
        .filter_map(|key| key.split_once('-').map(|(year, _)| year))
        .collect();
    years.into_iter().rev().map(str::to_string).collect()
}

/// The two most recent years, which is what the dashboard pre-selects.
pub fn default_selected_years(data: &TimeSeries) -> Vec<String> {
    available_years(data).into_iter().take(2).collect()
}

/// First and last period key of the dataset; empty bounds when there is no data.
pub fn available_date_range(data: &TimeSeries) -> DateRange {
    let months = available_months(data);
    match (months.first(), months.last()) {
        (Some(start), Some(end)) => DateRange::new(start.clone(), end.clone()),
        _ => DateRange::default(),
    }
}

/// First and last month of the most recent year in the dataset.
pub fn latest_year_range(data: &TimeSeries) -> Option<DateRange> {
    let latest = available_years(data).into_iter().next()?;
    let prefix = format!("{}-", latest);
    let months: Vec<String> = available_months(data)
        .into_iter()
        .filter(|month| month.starts_with(&prefix))
        .collect();
    Some(DateRange::new(months.first()?.clone(), months.last()?.clone()))
}

/// Keeps only readings whose key lies inside `[start, end]`.
///
/// Indicators left without any reading are dropped entirely.
pub fn filter_by_date_range(data: &TimeSeries, start: &str, end: &str) -> TimeSeries {
    let range = DateRange::new(start, end);
    data.iter()
        .filter_map(|(indicator, series)| {
            let kept: IndicatorSeries = series
                .iter()
                .filter(|(key, _)| range.contains(key))
                .map(|(key, value)| (key.clone(), *value))
                .collect();
            (!kept.is_empty()).then(|| (indicator.clone(), kept))
        })
        .collect()
}

/// Partitions the selected indicators' readings by year.
///
/// Every selected year gets an entry and every selected indicator an entry beneath
/// it, even when no month matched. Readings that are zero or non-finite are treated
/// as missing and left out; downstream year-over-year comparisons then use a zero
/// baseline for them.
pub fn group_by_year<I, Y>(data: &TimeSeries, indicators: &[I], years: &[Y]) -> GroupedByYear
where
    I: AsRef<str>,
    Y: AsRef<str>,
{
    let mut grouped = GroupedByYear::new();

    for year in years {
        let year = year.as_ref();
        let by_indicator = grouped.entry(year.to_string()).or_default();

        for indicator in indicators {
            let indicator = indicator.as_ref();
            let months = by_indicator.entry(indicator.to_string()).or_default();

            let Some(series) = data.get(indicator) else {
                continue;
            };

            for (key, value) in series {
                let Some((key_year, month)) = key.split_once('-') else {
                    continue;
                };
                if key_year == year && *value != 0.0 && value.is_finite() {
                    months.insert(month.to_string(), *value);
                }
            }
        }
    }

    grouped
}

/// Returns the first candidate name that exists as an indicator in `data`.
///
/// Datasets ship indicator names in more than one language; callers pass the
/// variants in order of preference and get back the key actually present.
pub fn resolve_indicator_key<'a, S: AsRef<str>>(
    data: &'a TimeSeries,
    candidates: &[S],
) -> Option<&'a str> {
    candidates.iter().find_map(|candidate| {
        data.get_key_value(candidate.as_ref())
            .map(|(key, _)| key.as_str())
    })
}

/// Chronological values of one indicator; empty when it is absent.
pub fn indicator_values(data: &TimeSeries, indicator: &str) -> Vec<f64> {
    data.get(indicator)
        .map(|series| series.values().copied().collect())
        .unwrap_or_default()
}

/// Revenue minus expenditure, aligned by position.
///
/// A revenue reading without a matching expenditure counts the expenditure as zero.
pub fn surplus_series(revenue: &[f64], expenditure: &[f64]) -> Vec<f64> {
    revenue
        .iter()
        .enumerate()
        .map(|(i, r)| r - expenditure.get(i).copied().unwrap_or(0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TimeSeries {
        let mut data = TimeSeries::new();
        data.insert(
            "Revenue".to_string(),
            [
                ("2022-11", 90.0),
                ("2023-01", 100.0),
                ("2023-02", 0.0),
                ("2024-01", 120.0),
                ("2024-02", 130.0),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        );
        data.insert(
            "Expenditure".to_string(),
            [("2023-01", 80.0), ("2024-03", 95.0)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        );
        data
    }

    #[test]
    fn yoy_metric_uses_zero_for_zero_baseline() {
        let metric = YoyMetric::between(0.0, 50.0);
        assert_eq!(metric.delta, 50.0);
        assert_eq!(metric.percent_change, 0.0);

        let metric = YoyMetric::between(100.0, 80.0);
        assert_eq!(metric.delta, -20.0);
        assert!((metric.percent_change + 20.0).abs() < 1e-12);
    }

    #[test]
    fn yoy_metric_serializes_camel_case() {
        let json = serde_json::to_value(YoyMetric::between(10.0, 15.0)).unwrap();
        assert_eq!(json["delta"], 5.0);
        assert_eq!(json["percentChange"], 50.0);
    }

    #[test]
    fn months_and_years_are_ordered() {
        let data = sample();
        assert_eq!(
            available_months(&data),
            vec!["2022-11", "2023-01", "2023-02", "2024-01", "2024-02", "2024-03"]
        );
        assert_eq!(available_years(&data), vec!["2024", "2023", "2022"]);
        assert_eq!(default_selected_years(&data), vec!["2024", "2023"]);
    }

    #[test]
    fn date_ranges_cover_dataset_and_latest_year() {
        let data = sample();
        assert_eq!(
            available_date_range(&data),
            DateRange::new("2022-11", "2024-03")
        );
        assert_eq!(
            latest_year_range(&data),
            Some(DateRange::new("2024-01", "2024-03"))
        );
        assert_eq!(available_date_range(&TimeSeries::new()), DateRange::default());
        assert_eq!(latest_year_range(&TimeSeries::new()), None);
    }

    #[test]
    fn filter_drops_indicators_without_readings() {
        let data = sample();
        let filtered = filter_by_date_range(&data, "2024-01", "2024-02");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered["Revenue"].len(), 2);
        assert!(!filtered.contains_key("Expenditure"));
    }

    #[test]
    fn group_by_year_only_holds_source_entries() {
        let data = sample();
        let grouped = group_by_year(&data, &["Revenue", "Missing"], &["2023", "2024"]);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["2023"]["Revenue"].get("01"), Some(&100.0));
        // zero readings are treated as missing
        assert_eq!(grouped["2023"]["Revenue"].get("02"), None);
        assert_eq!(grouped["2024"]["Revenue"].len(), 2);
        assert!(grouped["2024"]["Missing"].is_empty());

        for (year, indicators) in &grouped {
            for (indicator, months) in indicators {
                for (month, value) in months {
                    let key = format!("{}-{}", year, month);
                    assert_eq!(data[indicator].get(&key), Some(value));
                }
            }
        }
    }

    #[test]
    fn resolves_first_present_candidate() {
        let data = sample();
        assert_eq!(
            resolve_indicator_key(&data, &["Ukupni Prihodi, Euro", "Revenue"]),
            Some("Revenue")
        );
        assert_eq!(resolve_indicator_key(&data, &["Nope", "Also nope"]), None);
        let empty: [&str; 0] = [];
        assert_eq!(resolve_indicator_key(&data, &empty), None);
    }

    #[test]
    fn indicator_values_are_chronological() {
        let data = sample();
        assert_eq!(
            indicator_values(&data, "Revenue"),
            vec![90.0, 100.0, 0.0, 120.0, 130.0]
        );
        assert!(indicator_values(&data, "Missing").is_empty());
    }

    #[test]
    fn surplus_treats_missing_expenditure_as_zero() {
        assert_eq!(surplus_series(&[10.0, 20.0, 30.0], &[4.0, 25.0]), vec![6.0, -5.0, 30.0]);
        assert!(surplus_series(&[], &[1.0]).is_empty());
    }
}

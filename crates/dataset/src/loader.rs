use crate::error::DatasetError;
use core_types::{IndicatorSeries, PeriodKey, TimeSeries};
use serde_json::Value;
use std::path::Path;

/// The field holding the indicator name in every row.
pub const INDICATOR_NAME_FIELD: &str = "INDICATOR Name";

/// Reads and parses the dataset file at `path`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<TimeSeries, DatasetError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let data = parse_str(&contents)?;
    tracing::info!(
        path = %path.display(),
        indicators = data.len(),
        "Dataset loaded."
    );
    Ok(data)
}

/// Parses the dataset from its JSON text.
///
/// Values that are not numbers after stripping thousands separators, and keys that are
/// not `YYYY-MM` periods, are skipped with a warning rather than failing the load.
pub fn parse_str(json: &str) -> Result<TimeSeries, DatasetError> {
    let rows: Vec<Value> = serde_json::from_str(json)?;
    let mut data = TimeSeries::new();

    for (index, row) in rows.into_iter().enumerate() {
        let Value::Object(fields) = row else {
            return Err(DatasetError::InvalidRow(index));
        };

        let name = fields
            .get(INDICATOR_NAME_FIELD)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(DatasetError::MissingIndicatorName(index, INDICATOR_NAME_FIELD))?
            .to_string();

        let mut series = IndicatorSeries::new();
        for (key, value) in &fields {
            if key == INDICATOR_NAME_FIELD {
                continue;
            }

            let period = match key.trim().parse::<PeriodKey>() {
                Ok(period) => period,
                Err(e) => {
                    tracing::warn!(indicator = %name, key = %key, error = %e, "Skipping non-period column.");
                    continue;
                }
            };

            match parse_value(value) {
                Some(number) => {
                    series.insert(period.to_string(), number);
                }
                None => {
                    tracing::warn!(indicator = %name, period = %period, value = %value, "Skipping unparseable value.");
                }
            }
        }

        data.insert(name, series);
    }

    Ok(data)
}

/// Accepts JSON numbers and strings such as `"1,234,567.89"`.
fn parse_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.replace(',', "").trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"[
        {
            "INDICATOR Name": "Ukupni Prihodi, Euro",
            "2023-01": "1,234,567.5",
            "2023-02": "1,300,000",
            "2024-01": "-25,000"
        },
        {
            "INDICATOR Name": "  Kamata, Euro ",
            "2023-01": "n/a",
            "2023-02": 4500,
            "Unit": "EUR"
        }
    ]"#;

    #[test]
    fn parses_thousands_separated_values() {
        let data = parse_str(SAMPLE).unwrap();
        let revenue = &data["Ukupni Prihodi, Euro"];
        assert_eq!(revenue["2023-01"], 1_234_567.5);
        assert_eq!(revenue["2023-02"], 1_300_000.0);
        assert_eq!(revenue["2024-01"], -25_000.0);
    }

    #[test]
    fn skips_bad_values_and_non_period_columns() {
        let data = parse_str(SAMPLE).unwrap();
        let interest = &data["Kamata, Euro"];
        assert_eq!(interest.len(), 1);
        assert_eq!(interest["2023-02"], 4500.0);
    }

    #[test]
    fn missing_name_is_an_error() {
        let err = parse_str(r#"[{"2023-01": "1"}]"#).unwrap_err();
        assert!(matches!(err, DatasetError::MissingIndicatorName(0, _)));
    }

    #[test]
    fn non_object_rows_are_rejected() {
        let err = parse_str(r#"[{"INDICATOR Name": "A"}, 5]"#).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidRow(1)));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(parse_str("{"), Err(DatasetError::Json(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let data = load_from_path(file.path()).unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_from_path("/no/such/budget.json").unwrap_err();
        assert!(err.to_string().contains("/no/such/budget.json"));
    }
}

use crate::error::CoreError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated `YYYY-MM` period key.
///
/// The dataset keys every monthly reading by this string form. Because the year is
/// zero-padded to four digits and the month to two, lexicographic order on the
/// string equals chronological order, which the rest of the crate relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodKey {
    year: i32,
    month: u32,
}

impl PeriodKey {
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        let date = NaiveDate::from_ymd_opt(year, month, 1)
            .filter(|_| (0..=9999).contains(&year))
            .ok_or_else(|| CoreError::InvalidPeriodKey(format!("{}-{}", year, month)))?;
        Ok(Self {
            year: date.year(),
            month: date.month(),
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The four-digit year prefix, as used for grouping (`"2024"`).
    pub fn year_str(&self) -> String {
        format!("{:04}", self.year)
    }

    /// The two-digit month suffix, as used for grouping (`"03"`).
    pub fn month_str(&self) -> String {
        format!("{:02}", self.month)
    }
}

impl FromStr for PeriodKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidPeriodKey(s.to_string());

        let bytes = s.as_bytes();
        let digits = |range: &[u8]| range.iter().all(u8::is_ascii_digit);
        if bytes.len() != 7 || bytes[4] != b'-' || !digits(&bytes[..4]) || !digits(&bytes[5..]) {
            return Err(invalid());
        }

        // chrono accepts signed and variable-width years, so the shape is checked above
        // and the calendar check is delegated to it.
        let date = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .map_err(|_| invalid())?;

        Ok(Self {
            year: date.year(),
            month: date.month(),
        })
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PeriodKey> for String {
    fn from(key: PeriodKey) -> Self {
        key.to_string()
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// An inclusive window over period keys.
///
/// Empty `start`/`end` strings mean "no data", matching what the dashboard shows
/// before anything is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.end.is_empty()
    }

    /// String comparison on both bounds; valid for `YYYY-MM` keys.
    pub fn contains(&self, key: &str) -> bool {
        key >= self.start.as_str() && key <= self.end.as_str()
    }
}

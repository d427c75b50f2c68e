//! Calendar month keys
//!
//! Months key the per-month rate tables, budgets and time series. They are
//! written as `YYYY-MM` everywhere they are serialized.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LedgerError;

/// A calendar month (e.g., "2026-02")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month, returning `None` when `month` is outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month a date falls in
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current month in local time
    pub fn current() -> Self {
        Self::of(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        self.next().start_date() - Duration::days(1)
    }

    /// Number of days in the month
    pub fn days(&self) -> u32 {
        self.end_date().day()
    }

    /// Check if a date falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Shift by a signed number of months, rolling over year boundaries
    pub fn offset(&self, months: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + months;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Get the next month
    pub fn next(&self) -> Self {
        self.offset(1)
    }

    /// Get the previous month
    pub fn prev(&self) -> Self {
        self.offset(-1)
    }

    /// The `count` consecutive months ending at (and including) this one,
    /// oldest first
    ///
    /// Counts beyond `i32::MAX` are capped there.
    pub fn window_ending(&self, count: usize) -> Vec<Self> {
        let count = i32::try_from(count).unwrap_or(i32::MAX);
        (0..count).map(|i| self.offset(i - count + 1)).collect()
    }

    /// Parse a `YYYY-MM` month key
    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        let s = s.trim();
        let invalid = || LedgerError::InvalidMonth(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month).ok_or_else(invalid)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for Month {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Month {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, m: u32) -> Month {
        Month::new(year, m).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        let feb = month(2024, 2);
        assert_eq!(feb.start_date(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(feb.end_date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(feb.days(), 29);
        assert_eq!(month(2025, 12).days(), 31);
    }

    #[test]
    fn test_navigation_rolls_over_years() {
        assert_eq!(month(2025, 12).next(), month(2026, 1));
        assert_eq!(month(2026, 1).prev(), month(2025, 12));
        assert_eq!(month(2026, 3).offset(-14), month(2025, 1));
        assert_eq!(month(2026, 3).offset(22), month(2028, 1));
    }

    #[test]
    fn test_window_ending() {
        let window = month(2026, 3).window_ending(3);
        let labels: Vec<String> = window.iter().map(|m| m.to_string()).collect();
        assert_eq!(labels, vec!["2026-01", "2026-02", "2026-03"]);

        let across_year = month(2026, 2).window_ending(4);
        assert_eq!(across_year[0], month(2025, 11));
        assert_eq!(across_year[3], month(2026, 2));

        assert!(month(2026, 2).window_ending(0).is_empty());
    }

    #[test]
    fn test_contains() {
        let jan = month(2026, 1);
        assert!(jan.contains(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()));
        assert!(!jan.contains(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Month::parse("2026-02").unwrap(), month(2026, 2));
        assert!(Month::parse("2026-13").is_err());
        assert!(Month::parse("2026-2").is_err());
        assert!(Month::parse("202602").is_err());
        assert!(Month::parse("").is_err());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let mut months = vec![month(2026, 1), month(2025, 12), month(2025, 2)];
        months.sort();
        assert_eq!(months, vec![month(2025, 2), month(2025, 12), month(2026, 1)]);
    }

    #[test]
    fn test_serialization() {
        let m = month(2026, 2);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"2026-02\"");

        let deserialized: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
        assert!(serde_json::from_str::<Month>("\"2026-00\"").is_err());
    }
}

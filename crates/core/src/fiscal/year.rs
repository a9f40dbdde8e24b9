//! Fiscal year types.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use mizan_shared::types::FiscalYearId;

/// Status of a fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiscalYearStatus {
    /// Year is open for posting.
    Open,
    /// Year is closed, no new postings allowed.
    Closed,
}

impl FiscalYearStatus {
    /// Parses a status from its stored string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Returns the stored string form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Fiscal year definition.
///
/// Fiscal years follow the calendar year; the `year` field drives
/// per-year journal entry numbering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalYear {
    /// Unique identifier.
    pub id: FiscalYearId,
    /// Calendar year covered (e.g., 2026).
    pub year: i32,
    /// Display name (e.g., "Fiscal Year 2026").
    pub name: String,
    /// First day of the year.
    pub start_date: NaiveDate,
    /// Last day of the year.
    pub end_date: NaiveDate,
    /// Current status.
    pub status: FiscalYearStatus,
}

impl FiscalYear {
    /// Builds a calendar fiscal year spanning January 1 to December 31.
    ///
    /// Returns `None` for years `chrono` cannot represent.
    #[must_use]
    pub fn calendar(year: i32) -> Option<Self> {
        let start_date = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end_date = NaiveDate::from_ymd_opt(year, 12, 31)?;
        Some(Self {
            id: FiscalYearId::new(),
            year,
            name: format!("Fiscal Year {year}"),
            start_date,
            end_date,
            status: FiscalYearStatus::Open,
        })
    }

    /// Returns true if entries can be posted to this year.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == FiscalYearStatus::Open
    }

    /// Returns true if the given date falls within this year.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if this year accepts a posting dated `date`.
    #[must_use]
    pub fn accepts_posting(&self, date: NaiveDate) -> bool {
        self.is_open() && self.contains_date(date)
    }
}

/// Returns the calendar year an entry dated `date` is numbered under.
#[must_use]
pub fn numbering_year(date: NaiveDate) -> i32 {
    date.year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_year_bounds() {
        let year = FiscalYear::calendar(2026).unwrap();
        assert_eq!(year.start_date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(year.end_date, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
        assert_eq!(year.name, "Fiscal Year 2026");
        assert!(year.is_open());
    }

    #[test]
    fn test_contains_date() {
        let year = FiscalYear::calendar(2026).unwrap();
        assert!(year.contains_date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
        assert!(year.contains_date(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()));
        assert!(!year.contains_date(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
        assert!(!year.contains_date(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()));
    }

    #[test]
    fn test_closed_year_rejects_postings() {
        let mut year = FiscalYear::calendar(2026).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        assert!(year.accepts_posting(date));

        year.status = FiscalYearStatus::Closed;
        assert!(!year.accepts_posting(date));
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(FiscalYearStatus::parse("open"), Some(FiscalYearStatus::Open));
        assert_eq!(
            FiscalYearStatus::parse("closed"),
            Some(FiscalYearStatus::Closed)
        );
        assert_eq!(FiscalYearStatus::parse("active"), None);
        assert_eq!(FiscalYearStatus::Open.as_str(), "open");
    }

    #[test]
    fn test_numbering_year_follows_entry_date() {
        assert_eq!(
            numbering_year(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()),
            2026
        );
        assert_eq!(
            numbering_year(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()),
            2025
        );
    }
}

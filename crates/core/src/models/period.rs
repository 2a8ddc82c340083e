use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::errors::CoreError;

/// A reporting window: one calendar month of one year.
///
/// Display values (month name) are always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Period {
    // Field order matters for the derived ordering: year first.
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period. `month` is 1-based.
    pub fn new(month: u32, year: i32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::ValidationError(format!(
                "Month must be between 1 and 12, got {month}"
            )));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(CoreError::ValidationError(format!("Year {year} is out of range")));
        }
        Ok(Self { year, month })
    }

    /// The period containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The period containing today's local date.
    #[must_use]
    pub fn current() -> Self {
        Self::containing(chrono::Local::now().date_naive())
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// First calendar day of the period.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        // Constructors only admit (year, month) pairs chrono can represent.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Shift by `delta_months` using calendar month arithmetic, rolling over
    /// year boundaries in both directions. Saturates at chrono's date range.
    #[must_use]
    pub fn advance(self, delta_months: i32) -> Self {
        let first = self.first_day();
        let shifted = if delta_months >= 0 {
            first.checked_add_months(Months::new(delta_months.unsigned_abs()))
        } else {
            first.checked_sub_months(Months::new(delta_months.unsigned_abs()))
        };
        shifted.map(Self::containing).unwrap_or(self)
    }

    /// English month name, e.g. "January".
    #[must_use]
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| chrono::Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("")
    }

    /// `true` when this period is the month of `today` or later.
    /// Used to stop forward navigation past the current month.
    #[must_use]
    pub fn is_current_or_future(&self, today: NaiveDate) -> bool {
        *self >= Self::containing(today)
    }

    /// Does `(month, year)` as carried by a record fall in this period?
    #[must_use]
    pub fn matches(&self, month: u32, year: i32) -> bool {
        self.month == month && self.year == year
    }

    /// `month` and `year` query parameters for period-scoped endpoints.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [("month", self.month.to_string()), ("year", self.year.to_string())]
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

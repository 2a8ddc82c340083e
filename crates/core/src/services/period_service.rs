use chrono::NaiveDate;

use crate::models::period::Period;

/// Holds the active reporting period for the budget and dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSelector {
    current: Period,
}

impl PeriodSelector {
    pub fn new(initial: Period) -> Self {
        Self { current: initial }
    }

    /// Start at the month containing `today`.
    pub fn starting_at(today: NaiveDate) -> Self {
        Self::new(Period::containing(today))
    }

    #[must_use]
    pub fn current(&self) -> Period {
        self.current
    }

    /// Move by `delta_months` (negative goes back) and return the new period.
    pub fn advance(&mut self, delta_months: i32) -> Period {
        self.current = self.current.advance(delta_months);
        self.current
    }

    pub fn set(&mut self, period: Period) {
        self.current = period;
    }

    /// Forward navigation stops at the current month.
    #[must_use]
    pub fn can_advance(&self, today: NaiveDate) -> bool {
        !self.current.is_current_or_future(today)
    }
}

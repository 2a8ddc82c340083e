use crate::models::bill::Bill;
use crate::models::budget::Budget;

/// Totals shown above the budget and bill lists. Pure helpers over the
/// store contents; nothing here is cached.
pub struct SummaryService;

impl SummaryService {
    /// Sum of budget limits for the active period.
    #[must_use]
    pub fn total_budget(budgets: &[Budget]) -> f64 {
        budgets.iter().map(|b| b.amount).sum()
    }

    #[must_use]
    pub fn total_spent(budgets: &[Budget]) -> f64 {
        budgets.iter().map(|b| b.spent).sum()
    }

    /// Active bills not yet paid, in store order.
    #[must_use]
    pub fn upcoming_bills(bills: &[Bill]) -> Vec<&Bill> {
        bills.iter().filter(|b| b.is_upcoming()).collect()
    }

    #[must_use]
    pub fn paid_bills(bills: &[Bill]) -> Vec<&Bill> {
        bills.iter().filter(|b| b.is_paid).collect()
    }

    #[must_use]
    pub fn total_upcoming(bills: &[Bill]) -> f64 {
        bills.iter().filter(|b| b.is_upcoming()).map(|b| b.amount).sum()
    }
}

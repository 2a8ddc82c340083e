use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

use super::period::Period;
use super::wire::is_valid_amount;

/// A monthly spending limit for one expense category.
///
/// `spent`, `remaining` and `percentage` are computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,
    pub category_id: Uuid,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub category_color: String,
    #[serde(default)]
    pub category_icon: String,
    pub amount: f64,
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub remaining: f64,
    #[serde(default)]
    pub percentage: f64,
    pub month: u32,
    pub year: i32,
}

impl Budget {
    /// The period this budget belongs to, if its month/year are valid.
    #[must_use]
    pub fn period(&self) -> Option<Period> {
        Period::new(self.month, self.year).ok()
    }

    /// Spending has reached or passed the limit.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.spent >= self.amount
    }

    /// Reject records the rest of the core cannot reason about.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !is_valid_amount(self.amount) || !self.spent.is_finite() {
            return Err(CoreError::MalformedResponse(format!(
                "budget {} has a non-finite or negative amount",
                self.id
            )));
        }
        if self.period().is_none() {
            return Err(CoreError::MalformedResponse(format!(
                "budget {} has invalid period {}/{}",
                self.id, self.month, self.year
            )));
        }
        Ok(())
    }
}

/// Body of `POST /budgets`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub category_id: Uuid,
    pub amount: f64,
    pub month: u32,
    pub year: i32,
}

impl NewBudget {
    #[must_use]
    pub fn for_period(category_id: Uuid, amount: f64, period: Period) -> Self {
        Self {
            category_id,
            amount,
            month: period.month(),
            year: period.year(),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validate_budget_amount(self.amount)
    }
}

/// Budget limits must be at least 1.
pub fn validate_budget_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount < 1.0 {
        return Err(CoreError::ValidationError(
            "Budget amount must be at least 1".into(),
        ));
    }
    Ok(())
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

use super::category::EntryType;
use super::wire;

/// Read-only aggregate snapshot for one period, computed by the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardMetrics {
    pub total_spent_this_month: f64,
    pub total_spent_this_week: f64,
    pub budget_utilization_percentage: f64,
    /// Spending per category, as ranked by the backend
    pub top_categories: Vec<CategorySpend>,
    pub transaction_count: u64,
    pub average_daily_spend: f64,
    pub recent_transactions: Vec<RecentTransaction>,
    pub upcoming_bills_count: u32,
    pub upcoming_bills_total: f64,
    pub savings_rate: f64,
    pub cashflow: f64,
    /// One entry per day of the period, in date order
    pub daily_trends: Vec<DailyTrend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpend {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTransaction {
    pub id: Uuid,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    #[serde(with = "wire::date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub category_name: String,
    #[serde(rename = "type")]
    pub transaction_type: EntryType,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrend {
    #[serde(with = "wire::date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub day: u32,
    pub daily_amount: f64,
    #[serde(default)]
    pub cumulative_amount: f64,
}

impl DashboardMetrics {
    /// Overwrite category colors positionally from `palette`, wrapping when
    /// there are more categories than colors.
    pub fn apply_palette(&mut self, palette: &[&str]) {
        if palette.is_empty() {
            return;
        }
        for (index, category) in self.top_categories.iter_mut().enumerate() {
            category.color = palette[index % palette.len()].to_string();
        }
    }

    /// Reject snapshots carrying values the chart builder cannot use.
    pub fn validate(&self) -> Result<(), CoreError> {
        let scalars = [
            self.total_spent_this_month,
            self.total_spent_this_week,
            self.budget_utilization_percentage,
            self.average_daily_spend,
            self.upcoming_bills_total,
            self.savings_rate,
            self.cashflow,
        ];
        if scalars.iter().any(|v| !v.is_finite()) {
            return Err(CoreError::MalformedResponse(
                "dashboard metrics contain a non-finite value".into(),
            ));
        }
        if self.top_categories.iter().any(|c| !c.value.is_finite()) {
            return Err(CoreError::MalformedResponse(
                "dashboard category breakdown contains a non-finite value".into(),
            ));
        }
        if self
            .daily_trends
            .iter()
            .any(|t| !t.daily_amount.is_finite() || !t.cumulative_amount.is_finite())
        {
            return Err(CoreError::MalformedResponse(
                "dashboard daily trend contains a non-finite value".into(),
            ));
        }
        Ok(())
    }
}

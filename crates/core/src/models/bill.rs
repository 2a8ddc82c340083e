use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

use super::wire::{self, is_valid_amount};

/// How often a bill recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BillFrequency {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl std::fmt::Display for BillFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BillFrequency::Daily => "Daily",
            BillFrequency::Weekly => "Weekly",
            BillFrequency::Monthly => "Monthly",
            BillFrequency::Quarterly => "Quarterly",
            BillFrequency::Yearly => "Yearly",
        };
        f.write_str(label)
    }
}

/// A recurring bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub category_id: Uuid,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub category_icon: String,
    #[serde(default)]
    pub category_color: String,
    #[serde(with = "wire::date")]
    pub due_date: NaiveDate,
    pub frequency: BillFrequency,
    pub is_active: bool,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Bill {
    /// Active and not yet paid.
    #[must_use]
    pub fn is_upcoming(&self) -> bool {
        self.is_active && !self.is_paid
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !is_valid_amount(self.amount) {
            return Err(CoreError::MalformedResponse(format!(
                "bill {} has a non-finite or negative amount",
                self.id
            )));
        }
        Ok(())
    }
}

/// Body of `POST /bills` and `PUT /bills/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBill {
    pub name: String,
    pub amount: f64,
    pub category_id: Uuid,
    #[serde(with = "wire::date")]
    pub due_date: NaiveDate,
    pub frequency: BillFrequency,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewBill {
    /// Prefill from an existing bill for the edit form.
    #[must_use]
    pub fn from_bill(bill: &Bill) -> Self {
        Self {
            name: bill.name.clone(),
            amount: bill.amount,
            category_id: bill.category_id,
            due_date: bill.due_date,
            frequency: bill.frequency,
            is_active: bill.is_active,
            notes: bill.notes.clone(),
        }
    }

    /// Validate and normalize: trims the name, blank notes become `None`.
    pub fn validated(mut self) -> Result<Self, CoreError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(CoreError::ValidationError("Bill name is required".into()));
        }
        if !self.amount.is_finite() || self.amount < 0.01 {
            return Err(CoreError::ValidationError(
                "Bill amount must be at least 0.01".into(),
            ));
        }
        self.notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Ok(self)
    }
}

/// Body of `PATCH /bills/{id}/paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaidStatus {
    pub is_paid: bool,
}

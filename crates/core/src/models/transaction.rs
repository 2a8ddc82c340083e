use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

use super::category::EntryType;
use super::wire::{self, is_valid_amount, CodeOrName};

/// How a transaction was paid.
///
/// Serialized as the numeric code; deserialized from the code or the label.
/// Unknown labels fall back to `Cash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "CodeOrName", into = "u8")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Upi,
    BankTransfer,
}

impl PaymentMethod {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            PaymentMethod::Cash => 0,
            PaymentMethod::Card => 1,
            PaymentMethod::Upi => 2,
            PaymentMethod::BankTransfer => 3,
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Card" => PaymentMethod::Card,
            "UPI" => PaymentMethod::Upi,
            "BankTransfer" => PaymentMethod::BankTransfer,
            _ => PaymentMethod::Cash,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::BankTransfer => "BankTransfer",
        };
        f.write_str(label)
    }
}

impl From<PaymentMethod> for u8 {
    fn from(m: PaymentMethod) -> Self {
        m.code()
    }
}

impl TryFrom<CodeOrName> for PaymentMethod {
    type Error = String;

    fn try_from(value: CodeOrName) -> Result<Self, Self::Error> {
        match value {
            CodeOrName::Code(0) => Ok(PaymentMethod::Cash),
            CodeOrName::Code(1) => Ok(PaymentMethod::Card),
            CodeOrName::Code(2) => Ok(PaymentMethod::Upi),
            CodeOrName::Code(3) => Ok(PaymentMethod::BankTransfer),
            CodeOrName::Code(other) => Err(format!("unknown payment method code {other}")),
            CodeOrName::Name(name) => Ok(PaymentMethod::from_label(&name)),
        }
    }
}

/// A transaction as returned by `GET /transactions`.
///
/// The category is carried by name/icon/color; the read DTO is not guaranteed
/// to include the category identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub category_icon: String,
    #[serde(default)]
    pub category_color: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "wire::date")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub transaction_type: EntryType,
    #[serde(default)]
    pub merchant: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
}

impl Transaction {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !is_valid_amount(self.amount) {
            return Err(CoreError::MalformedResponse(format!(
                "transaction {} has a non-finite or negative amount",
                self.id
            )));
        }
        Ok(())
    }
}

/// An attached receipt image, sent as the `receiptImage` multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The transaction form as the user fills it in. Validated into a
/// [`NewTransaction`] before anything is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub amount: Option<f64>,
    pub category_id: Option<Uuid>,
    pub description: String,
    pub date: Option<NaiveDate>,
    transaction_type: EntryType,
    pub merchant: String,
    pub payment_method: PaymentMethod,
    pub is_recurring: bool,
    pub receipt: Option<Receipt>,
}

impl TransactionDraft {
    /// Empty form: today's date, expense, paid in cash.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            amount: None,
            category_id: None,
            description: String::new(),
            date: Some(today),
            transaction_type: EntryType::Expense,
            merchant: String::new(),
            payment_method: PaymentMethod::Cash,
            is_recurring: false,
            receipt: None,
        }
    }

    /// Prefill from an existing transaction. The category is left for the
    /// caller to resolve (`category_id` is only set when the DTO carried one).
    #[must_use]
    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            amount: Some(tx.amount),
            category_id: tx.category_id,
            description: tx.description.clone(),
            date: Some(tx.date),
            transaction_type: tx.transaction_type,
            merchant: tx.merchant.clone(),
            payment_method: tx.payment_method,
            is_recurring: tx.is_recurring,
            receipt: None,
        }
    }

    #[must_use]
    pub fn transaction_type(&self) -> EntryType {
        self.transaction_type
    }

    /// Switch between income and expense. Clears the selected category,
    /// since categories are type-specific.
    pub fn set_type(&mut self, transaction_type: EntryType) {
        if self.transaction_type != transaction_type {
            self.category_id = None;
        }
        self.transaction_type = transaction_type;
    }

    pub fn validate(&self) -> Result<NewTransaction, CoreError> {
        let amount = match self.amount {
            Some(a) if a.is_finite() && a >= 0.01 => a,
            _ => {
                return Err(CoreError::ValidationError(
                    "Amount must be at least 0.01".into(),
                ))
            }
        };
        let category_id = self
            .category_id
            .ok_or_else(|| CoreError::ValidationError("Category is required".into()))?;
        let description = self.description.trim();
        if description.is_empty() {
            return Err(CoreError::ValidationError("Description is required".into()));
        }
        let date = self
            .date
            .ok_or_else(|| CoreError::ValidationError("Date is required".into()))?;

        Ok(NewTransaction {
            amount,
            category_id,
            description: description.to_string(),
            date,
            transaction_type: self.transaction_type,
            merchant: self.merchant.trim().to_string(),
            payment_method: self.payment_method,
            is_recurring: self.is_recurring,
            receipt: self.receipt.clone(),
        })
    }
}

/// A validated transaction, ready for `POST`/`PUT /transactions`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub amount: f64,
    pub category_id: Uuid,
    pub description: String,
    pub date: NaiveDate,
    pub transaction_type: EntryType,
    pub merchant: String,
    pub payment_method: PaymentMethod,
    pub is_recurring: bool,
    pub receipt: Option<Receipt>,
}

impl NewTransaction {
    /// Text parts of the multipart body, in the order the backend lists them.
    /// The receipt (if any) is sent separately as a file part.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("amount", self.amount.to_string()),
            ("categoryId", self.category_id.to_string()),
            ("description", self.description.clone()),
            ("date", wire::to_iso(self.date)),
            ("type", self.transaction_type.code().to_string()),
            ("merchant", self.merchant.clone()),
            ("paymentMethod", self.payment_method.code().to_string()),
            ("isRecurring", self.is_recurring.to_string()),
        ]
    }
}

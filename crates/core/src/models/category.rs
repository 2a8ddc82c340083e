use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

use super::wire::CodeOrName;

/// Default categories seeded by the backend. These cannot be deleted.
pub const DEFAULT_CATEGORY_NAMES: [&str; 8] = [
    "Food",
    "Salary",
    "Rent",
    "Shopping",
    "Transport",
    "Entertainment",
    "Health",
    "Utilities",
];

/// Income or expense. Shared by categories and transactions.
///
/// Serialized as the numeric code (`Expense = 0`, `Income = 1`); deserialized
/// from either the code or the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "CodeOrName", into = "u8")]
pub enum EntryType {
    #[default]
    Expense,
    Income,
}

impl EntryType {
    /// Numeric code used in request bodies and query strings.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            EntryType::Expense => 0,
            EntryType::Income => 1,
        }
    }

    /// Map a read-DTO label back to a variant. Anything other than
    /// "Income" is treated as an expense, matching how the backend labels rows.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("income") {
            EntryType::Income
        } else {
            EntryType::Expense
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryType::Expense => write!(f, "Expense"),
            EntryType::Income => write!(f, "Income"),
        }
    }
}

impl From<EntryType> for u8 {
    fn from(t: EntryType) -> Self {
        t.code()
    }
}

impl TryFrom<CodeOrName> for EntryType {
    type Error = String;

    fn try_from(value: CodeOrName) -> Result<Self, Self::Error> {
        match value {
            CodeOrName::Code(0) => Ok(EntryType::Expense),
            CodeOrName::Code(1) => Ok(EntryType::Income),
            CodeOrName::Code(other) => Err(format!("unknown entry type code {other}")),
            CodeOrName::Name(name) => Ok(EntryType::from_label(&name)),
        }
    }
}

/// A user (or default) category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// Icon token, e.g. "restaurant"
    pub icon: String,
    /// Color token, e.g. "#EF4444"
    pub color: String,
    #[serde(rename = "type")]
    pub category_type: EntryType,
    /// Owner; `None` for the shared default categories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

impl Category {
    /// Default categories are protected from deletion.
    #[must_use]
    pub fn is_deletable(&self) -> bool {
        !DEFAULT_CATEGORY_NAMES.contains(&self.name.as_str())
    }
}

/// Body of `POST /categories`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(rename = "type")]
    pub category_type: EntryType,
}

impl Default for NewCategory {
    fn default() -> Self {
        Self {
            name: String::new(),
            icon: "restaurant".to_string(),
            color: "#EF4444".to_string(),
            category_type: EntryType::Expense,
        }
    }
}

impl NewCategory {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().chars().count() < 2 {
            return Err(CoreError::ValidationError(
                "Category name must be at least 2 characters".into(),
            ));
        }
        if self.icon.trim().is_empty() {
            return Err(CoreError::ValidationError("Category icon is required".into()));
        }
        if self.color.trim().is_empty() {
            return Err(CoreError::ValidationError("Category color is required".into()));
        }
        Ok(())
    }
}

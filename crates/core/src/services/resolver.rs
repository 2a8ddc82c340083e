use tracing::debug;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::bill::Bill;
use crate::models::budget::Budget;
use crate::models::category::{Category, EntryType};
use crate::models::dashboard::RecentTransaction;
use crate::models::transaction::Transaction;

/// Anything that refers to a category: by id when the record carries one,
/// otherwise by display name and entry type.
pub trait CategoryLink {
    fn category_id(&self) -> Option<Uuid>;
    fn category_name(&self) -> &str;
    /// The category type implied by the record, when it implies one.
    fn inferred_type(&self) -> Option<EntryType>;
}

impl CategoryLink for Transaction {
    fn category_id(&self) -> Option<Uuid> {
        self.category_id
    }
    fn category_name(&self) -> &str {
        &self.category_name
    }
    fn inferred_type(&self) -> Option<EntryType> {
        Some(self.transaction_type)
    }
}

impl CategoryLink for RecentTransaction {
    fn category_id(&self) -> Option<Uuid> {
        None
    }
    fn category_name(&self) -> &str {
        &self.category_name
    }
    fn inferred_type(&self) -> Option<EntryType> {
        Some(self.transaction_type)
    }
}

impl CategoryLink for Bill {
    fn category_id(&self) -> Option<Uuid> {
        Some(self.category_id)
    }
    fn category_name(&self) -> &str {
        &self.category_name
    }
    fn inferred_type(&self) -> Option<EntryType> {
        Some(EntryType::Expense)
    }
}

impl CategoryLink for Budget {
    fn category_id(&self) -> Option<Uuid> {
        Some(self.category_id)
    }
    fn category_name(&self) -> &str {
        &self.category_name
    }
    fn inferred_type(&self) -> Option<EntryType> {
        Some(EntryType::Expense)
    }
}

/// Joins records to their category. Borrows the category collection; owns
/// nothing.
///
/// The name+type fallback only succeeds on a unique match. Duplicate names
/// resolve to not-found and the caller must ask the user to pick again.
#[derive(Debug, Clone, Copy)]
pub struct CategoryResolver<'a> {
    categories: &'a [Category],
}

impl<'a> CategoryResolver<'a> {
    pub fn new(categories: &'a [Category]) -> Self {
        Self { categories }
    }

    #[must_use]
    pub fn by_id(&self, id: Uuid) -> Option<&'a Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// The single category named `name` of type `category_type`, if exactly one exists.
    #[must_use]
    pub fn by_name_and_type(&self, name: &str, category_type: EntryType) -> Option<&'a Category> {
        let mut matches = self
            .categories
            .iter()
            .filter(|c| c.name == name && c.category_type == category_type);
        let first = matches.next()?;
        if matches.next().is_some() {
            debug!(name, %category_type, "ambiguous category name, not resolving");
            return None;
        }
        Some(first)
    }

    /// Resolve by id when present (no fallback if the id is unknown),
    /// otherwise by unique name+type.
    #[must_use]
    pub fn resolve(&self, link: &impl CategoryLink) -> Option<&'a Category> {
        if let Some(id) = link.category_id() {
            return self.by_id(id);
        }
        let category_type = link.inferred_type()?;
        self.by_name_and_type(link.category_name(), category_type)
    }

    /// Like [`resolve`](Self::resolve) but as an error the caller can surface.
    pub fn require(&self, link: &impl CategoryLink) -> Result<&'a Category, CoreError> {
        self.resolve(link)
            .ok_or_else(|| CoreError::CategoryNotResolved(link.category_name().to_string()))
    }

    /// Categories of one type, sorted by name.
    #[must_use]
    pub fn of_type(&self, category_type: EntryType) -> Vec<&'a Category> {
        let mut list: Vec<&Category> = self
            .categories
            .iter()
            .filter(|c| c.category_type == category_type)
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    /// Expense categories that do not yet have a budget in `budgets`
    /// (which are the budgets of the active period).
    #[must_use]
    pub fn available_for_budget(&self, budgets: &[Budget]) -> Vec<&'a Category> {
        self.categories
            .iter()
            .filter(|c| c.category_type == EntryType::Expense)
            .filter(|c| !budgets.iter().any(|b| b.category_id == c.id))
            .collect()
    }
}

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::CoreError;

use super::category::EntryType;
use super::wire;

/// Normalized transaction filter. `None` / empty fields mean "no constraint".
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FilterCriteria {
    pub search_text: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category_ids: Vec<Uuid>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub transaction_type: Option<EntryType>,
}

impl FilterCriteria {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Filter criteria plus the page window: everything `GET /transactions` takes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionQuery {
    pub criteria: FilterCriteria,
    /// 1-based page number, as the backend counts
    pub page_number: u64,
    pub page_size: u64,
}

impl TransactionQuery {
    /// Query-string pairs. Optional fields are omitted when empty; category
    /// ids repeat the `categoryIds` key once per id.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let c = &self.criteria;
        let mut pairs = vec![
            ("pageNumber".to_string(), self.page_number.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        if let Some(text) = &c.search_text {
            pairs.push(("searchText".into(), text.clone()));
        }
        if let Some(start) = c.start_date {
            pairs.push(("startDate".into(), wire::to_iso(start)));
        }
        if let Some(end) = c.end_date {
            pairs.push(("endDate".into(), wire::to_iso(end)));
        }
        if let Some(min) = c.min_amount {
            pairs.push(("minAmount".into(), min.to_string()));
        }
        if let Some(max) = c.max_amount {
            pairs.push(("maxAmount".into(), max.to_string()));
        }
        if let Some(t) = c.transaction_type {
            pairs.push(("type".into(), t.code().to_string()));
        }
        for id in &c.category_ids {
            pairs.push(("categoryIds".into(), id.to_string()));
        }
        pairs
    }
}

/// A single edit to the filter form. Values are raw form text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEdit {
    SearchText(String),
    Category(String),
    Type(String),
    StartDate(String),
    EndDate(String),
    MinAmount(String),
    MaxAmount(String),
    Clear,
}

/// The filter form's raw state, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawFilterInput {
    pub search_text: String,
    pub category_id: String,
    pub transaction_type: String,
    pub start_date: String,
    pub end_date: String,
    pub min_amount: String,
    pub max_amount: String,
}

impl RawFilterInput {
    pub fn apply(&mut self, edit: FilterEdit) {
        match edit {
            FilterEdit::SearchText(v) => self.search_text = v,
            FilterEdit::Category(v) => self.category_id = v,
            FilterEdit::Type(v) => self.transaction_type = v,
            FilterEdit::StartDate(v) => self.start_date = v,
            FilterEdit::EndDate(v) => self.end_date = v,
            FilterEdit::MinAmount(v) => self.min_amount = v,
            FilterEdit::MaxAmount(v) => self.max_amount = v,
            FilterEdit::Clear => *self = Self::default(),
        }
    }

    /// Trim, drop blanks and parse every field.
    pub fn normalize(&self) -> Result<FilterCriteria, CoreError> {
        let search_text = non_blank(&self.search_text).map(str::to_string);

        let category_ids = match non_blank(&self.category_id) {
            Some(raw) => vec![Uuid::parse_str(raw).map_err(|_| {
                CoreError::ValidationError(format!("Invalid category '{raw}'"))
            })?],
            None => Vec::new(),
        };

        let transaction_type = match non_blank(&self.transaction_type) {
            None | Some("null") => None,
            Some("0") => Some(EntryType::Expense),
            Some("1") => Some(EntryType::Income),
            Some(raw) if raw.eq_ignore_ascii_case("expense") => Some(EntryType::Expense),
            Some(raw) if raw.eq_ignore_ascii_case("income") => Some(EntryType::Income),
            Some(raw) => {
                return Err(CoreError::ValidationError(format!(
                    "Invalid transaction type '{raw}'"
                )))
            }
        };

        let start_date = parse_optional_date(&self.start_date, "start date")?;
        let end_date = parse_optional_date(&self.end_date, "end date")?;
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(CoreError::ValidationError(format!(
                    "Start date ({start}) must not be after end date ({end})"
                )));
            }
        }

        let min_amount = parse_optional_amount(&self.min_amount, "minimum amount")?;
        let max_amount = parse_optional_amount(&self.max_amount, "maximum amount")?;
        if let (Some(min), Some(max)) = (min_amount, max_amount) {
            if min > max {
                return Err(CoreError::ValidationError(format!(
                    "Minimum amount ({min}) must not exceed maximum amount ({max})"
                )));
            }
        }

        Ok(FilterCriteria {
            search_text,
            start_date,
            end_date,
            category_ids,
            min_amount,
            max_amount,
            transaction_type,
        })
    }
}

fn non_blank(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn parse_optional_date(raw: &str, field: &str) -> Result<Option<NaiveDate>, CoreError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(value) => wire::parse_date(value)
            .map(Some)
            .ok_or_else(|| CoreError::ValidationError(format!("Invalid {field} '{value}'"))),
    }
}

fn parse_optional_amount(raw: &str, field: &str) -> Result<Option<f64>, CoreError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(value) => match value.parse::<f64>() {
            Ok(amount) if wire::is_valid_amount(amount) => Ok(Some(amount)),
            _ => Err(CoreError::ValidationError(format!("Invalid {field} '{value}'"))),
        },
    }
}
